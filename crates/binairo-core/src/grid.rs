use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a binary puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Zero,
    One,
}

impl Cell {
    /// Build a cell from the `null | 0 | 1` literal used by puzzle files.
    pub fn from_value(value: Option<u8>) -> Option<Cell> {
        match value {
            None => Some(Cell::Empty),
            Some(0) => Some(Cell::Zero),
            Some(1) => Some(Cell::One),
            Some(_) => None,
        }
    }

    /// Build a cell from its text form (`0`, `1`, `.` or `_`).
    pub fn from_char(ch: char) -> Option<Cell> {
        match ch {
            '.' | '_' => Some(Cell::Empty),
            '0' => Some(Cell::Zero),
            '1' => Some(Cell::One),
            _ => None,
        }
    }

    pub fn value(self) -> Option<u8> {
        match self {
            Cell::Empty => None,
            Cell::Zero => Some(0),
            Cell::One => Some(1),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn is_filled(self) -> bool {
        self != Cell::Empty
    }

    /// The complementary digit. `Empty` has no complement and maps to itself.
    pub fn opposite(self) -> Cell {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Zero => Cell::One,
            Cell::One => Cell::Zero,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Zero => '0',
            Cell::One => '1',
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The two digits in the order every solver tries them.
pub const DIGITS: [Cell; 2] = [Cell::Zero, Cell::One];

/// Position on the grid (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Column letter used in puzzle notation (`A` for the first column).
    pub fn col_letter(&self) -> char {
        (b'A' + (self.col % 26) as u8) as char
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col_letter(), self.row + 1)
    }
}

/// A square binary puzzle grid, stored row-major.
///
/// Serializes as the nested `null | 0 | 1` rows used by puzzle files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<u8>>>", into = "Vec<Vec<Option<u8>>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid of side `size`.
    pub fn new(size: usize) -> Result<Self, GridError> {
        check_size(size)?;
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Build a grid from the nested `null | 0 | 1` rows found in puzzle files.
    pub fn from_rows(rows: Vec<Vec<Option<u8>>>) -> Result<Self, GridError> {
        let size = rows.len();
        check_size(size)?;
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            for (col, value) in values.into_iter().enumerate() {
                let cell = Cell::from_value(value).ok_or(GridError::InvalidCell {
                    row,
                    col,
                    value: value.unwrap_or_default(),
                })?;
                cells.push(cell);
            }
        }
        Ok(Self { size, cells })
    }

    /// Parse a grid from text. Rows are separated by newlines or `/`; any
    /// other whitespace is ignored. A single line of N² cells is also accepted.
    pub fn from_string(s: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = s
            .split(&['\n', '/'][..])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut parsed: Vec<Vec<Cell>> = Vec::with_capacity(rows.len());
        for (row, line) in rows.iter().enumerate() {
            let mut cells = Vec::new();
            for (col, ch) in line.chars().filter(|c| !c.is_whitespace()).enumerate() {
                cells.push(Cell::from_char(ch).ok_or(GridError::InvalidChar { row, col, ch })?);
            }
            parsed.push(cells);
        }

        // One long line: reshape it into a square
        if parsed.len() == 1 {
            let flat = parsed.remove(0);
            let size = (flat.len() as f64).sqrt() as usize;
            if size * size != flat.len() {
                return Err(GridError::NotSquare {
                    row: 0,
                    expected: size,
                    found: flat.len(),
                });
            }
            check_size(size)?;
            return Ok(Self { size, cells: flat });
        }

        let size = parsed.len();
        check_size(size)?;
        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in parsed.into_iter().enumerate() {
            if line.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    expected: size,
                    found: line.len(),
                });
            }
            cells.extend(line);
        }
        Ok(Self { size, cells })
    }

    /// Side length N
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of each digit a complete line must hold (N/2)
    pub fn half(&self) -> usize {
        self.size / 2
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row * self.size + pos.col]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.row * self.size + pos.col] = cell;
    }

    pub fn clear(&mut self, pos: Position) {
        self.set(pos, Cell::Empty);
    }

    /// Cells of row `row`, left to right.
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Cells of column `col`, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).map(move |row| self.cells[row * self.size + col])
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.get(pos).is_empty()).collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn given_count(&self) -> usize {
        self.cells.len() - self.empty_count()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| c.is_filled())
    }

    /// Back to the nested `null | 0 | 1` shape.
    pub fn to_rows(&self) -> Vec<Vec<Option<u8>>> {
        (0..self.size)
            .map(|row| self.row(row).iter().map(|c| c.value()).collect())
            .collect()
    }

    /// Compact single-line form, rows joined by `/`.
    pub fn to_line_string(&self) -> String {
        (0..self.size)
            .map(|row| self.row(row).iter().map(|c| c.to_char()).collect::<String>())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl TryFrom<Vec<Vec<Option<u8>>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<Option<u8>>>) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Option<u8>>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

fn check_size(size: usize) -> Result<(), GridError> {
    if size == 0 {
        return Err(GridError::EmptyGrid);
    }
    if size % 2 != 0 {
        return Err(GridError::OddSize(size));
    }
    Ok(())
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = (0..self.size)
            .map(|col| Position::new(0, col).col_letter().to_string())
            .collect();
        writeln!(f, "   {}", header.join(" "))?;
        for row in 0..self.size {
            let cells: Vec<String> = self.row(row).iter().map(|c| c.to_string()).collect();
            writeln!(f, "{:>2} {}", row + 1, cells.join(" "))?;
        }
        Ok(())
    }
}
