//! Puzzle file validation: structure, metadata, duplicates and solvability.

use crate::render::Painter;
use binairo_core::{Grid, Solver};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const REQUIRED_FIELDS: [&str; 4] = ["id", "size", "difficulty", "puzzle"];
pub const OPTIONAL_FIELDS: [&str; 1] = ["puzzle_id"];
pub const VALID_SIZES: [&str; 4] = ["6x6", "8x8", "10x10", "14x14"];
pub const VALID_DIFFICULTIES: [&str; 2] = ["easy", "hard"];

/// Findings for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl FileReport {
    fn new(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, message: String) {
        self.valid = false;
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Validates files one after another, remembering IDs and grids across them.
pub struct Validator {
    solver: Solver,
    strict: bool,
    seen_ids: HashSet<u64>,
    seen_grids: HashMap<String, PathBuf>,
}

impl Validator {
    pub fn new(strict: bool) -> Self {
        Self {
            solver: Solver::new(),
            strict,
            seen_ids: HashSet::new(),
            seen_grids: HashMap::new(),
        }
    }

    pub fn validate_file(&mut self, path: &Path) -> FileReport {
        let mut report = FileReport::new(path);

        let data: Value = match fs::read_to_string(path)
            .map_err(|e| format!("Error reading file: {}", e))
            .and_then(|json| serde_json::from_str(&json).map_err(|e| format!("Invalid JSON: {}", e)))
        {
            Ok(data) => data,
            Err(message) => {
                report.error(message);
                return report;
            }
        };

        match &data {
            Value::Array(records) if records.is_empty() => {
                report.error("Empty puzzle array".to_string());
            }
            Value::Array(records) => {
                for (i, record) in records.iter().enumerate() {
                    let prefix = if records.len() > 1 {
                        format!("Puzzle {}: ", i)
                    } else {
                        String::new()
                    };
                    match record {
                        Value::Object(fields) => self.validate_record(fields, &prefix, &mut report),
                        _ => report.error(format!("Puzzle {} is not an object", i)),
                    }
                }
            }
            Value::Object(fields) => self.validate_record(fields, "", &mut report),
            _ => report.error("Root element must be an object or array".to_string()),
        }

        log::debug!(
            "{}: {} errors, {} warnings",
            path.display(),
            report.errors.len(),
            report.warnings.len()
        );
        report
    }

    fn validate_record(&mut self, fields: &Map<String, Value>, prefix: &str, report: &mut FileReport) {
        let errors_before = report.errors.len();

        for field in REQUIRED_FIELDS {
            if !fields.contains_key(field) {
                report.error(format!("{}Missing required field: {}", prefix, field));
            }
        }

        if let Some(id) = fields.get("id") {
            match id.as_u64().filter(|&id| id > 0) {
                Some(id) if !self.seen_ids.insert(id) => {
                    report.error(format!("{}Duplicate puzzle ID: {}", prefix, id));
                }
                Some(_) => {}
                None => report.error(format!("{}Field 'id' must be a positive integer", prefix)),
            }
        }

        let size = fields.get("size").and_then(Value::as_str);
        if fields.contains_key("size") && !size.is_some_and(|s| VALID_SIZES.contains(&s)) {
            report.error(format!(
                "{}Invalid size '{}'. Must be one of: {}",
                prefix,
                display_value(fields.get("size")),
                VALID_SIZES.join(", ")
            ));
        }

        if let Some(difficulty) = fields.get("difficulty") {
            if !difficulty
                .as_str()
                .is_some_and(|d| VALID_DIFFICULTIES.contains(&d))
            {
                report.error(format!(
                    "{}Invalid difficulty '{}'. Must be one of: {}",
                    prefix,
                    display_value(Some(difficulty)),
                    VALID_DIFFICULTIES.join(", ")
                ));
            }
        }

        if self.strict {
            let extra: Vec<&str> = fields
                .keys()
                .map(String::as_str)
                .filter(|k| !REQUIRED_FIELDS.contains(k) && !OPTIONAL_FIELDS.contains(k))
                .collect();
            if !extra.is_empty() {
                report.warn(format!("{}Unexpected fields: {}", prefix, extra.join(", ")));
            }
        }

        let Some(puzzle) = fields.get("puzzle") else {
            return;
        };
        let expected = size.and_then(parse_size);
        let Some(rows) = self.check_grid_shape(puzzle, expected, prefix, report) else {
            return;
        };

        let key = puzzle.to_string();
        if let Some(original) = self.seen_grids.get(&key) {
            report.warn(format!(
                "{}Duplicate puzzle content found in: {}",
                prefix,
                original.display()
            ));
        } else {
            self.seen_grids.insert(key, report.file.clone());
        }

        if report.errors.len() == errors_before {
            self.check_solvability(rows, prefix, report);
        }
    }

    /// Dimension and literal checks. Returns the rows when they are well formed.
    fn check_grid_shape(
        &self,
        puzzle: &Value,
        expected: Option<usize>,
        prefix: &str,
        report: &mut FileReport,
    ) -> Option<Vec<Vec<Option<u8>>>> {
        let Some(rows) = puzzle.as_array() else {
            report.error(format!("{}Puzzle must be a 2D array", prefix));
            return None;
        };
        let n = expected.unwrap_or(rows.len());
        if rows.len() != n {
            report.error(format!(
                "{}Grid height {} doesn't match size {}x{}",
                prefix,
                rows.len(),
                n,
                n
            ));
            return None;
        }

        let mut ok = true;
        let mut parsed = Vec::with_capacity(n);
        for (i, row) in rows.iter().enumerate() {
            let Some(cells) = row.as_array() else {
                report.error(format!("{}Row {} is not an array", prefix, i));
                ok = false;
                continue;
            };
            if cells.len() != n {
                report.error(format!(
                    "{}Row {} has {} cells, expected {}",
                    prefix,
                    i,
                    cells.len(),
                    n
                ));
                ok = false;
                continue;
            }
            let mut parsed_row = Vec::with_capacity(n);
            for (j, cell) in cells.iter().enumerate() {
                match cell {
                    Value::Null => parsed_row.push(None),
                    Value::Number(v) if v.as_u64() == Some(0) || v.as_u64() == Some(1) => {
                        parsed_row.push(v.as_u64().map(|v| v as u8));
                    }
                    other => {
                        report.error(format!(
                            "{}Invalid cell value at ({},{}): {}. Must be null, 0, or 1",
                            prefix, i, j, other
                        ));
                        ok = false;
                    }
                }
            }
            parsed.push(parsed_row);
        }
        if !ok {
            return None;
        }

        let total = n * n;
        let clues = parsed.iter().flatten().filter(|c| c.is_some()).count();
        if clues == 0 {
            report.warn(format!("{}Puzzle has no clues", prefix));
        } else if clues >= total {
            report.warn(format!("{}Puzzle is completely filled", prefix));
        } else if self.strict && clues < n / 2 {
            report.warn(format!(
                "{}Very few clues ({}), puzzle may be too hard",
                prefix, clues
            ));
        }
        Some(parsed)
    }

    fn check_solvability(&self, rows: Vec<Vec<Option<u8>>>, prefix: &str, report: &mut FileReport) {
        let mut grid = match Grid::from_rows(rows) {
            Ok(grid) => grid,
            Err(e) => {
                report.error(format!("{}{}", prefix, e));
                return;
            }
        };
        let clues = grid.clone();

        let deduction = self.solver.solve_deductive(&mut grid);
        if let Some(conflict) = &deduction.contradiction {
            report.error(format!("{}Puzzle violates Binairo rules: {}", prefix, conflict));
            return;
        }
        if !deduction.solved {
            if self.strict {
                report.error(format!(
                    "{}Puzzle cannot be solved using human techniques",
                    prefix
                ));
            } else {
                report.warn(format!(
                    "{}Puzzle may require advanced techniques or be unsolvable",
                    prefix
                ));
            }
        }

        if self.strict {
            match self.solver.count_solutions(&clues, 2) {
                Some(1) => {}
                Some(0) => report.error(format!("{}Puzzle has no solution", prefix)),
                Some(_) => report.error(format!("{}Puzzle has multiple solutions", prefix)),
                None => report.warn(format!(
                    "{}Could not verify uniqueness within the search limits",
                    prefix
                )),
            }
        }
    }
}

/// `"6x6"` -> 6. Only square sizes are accepted.
fn parse_size(size: &str) -> Option<usize> {
    let (rows, cols) = size.split_once('x')?;
    let rows: usize = rows.parse().ok()?;
    let cols: usize = cols.parse().ok()?;
    (rows == cols).then_some(rows)
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

pub fn print_report<W: Write>(
    out: &mut W,
    painter: &Painter,
    report: &FileReport,
    show_warnings: bool,
) -> io::Result<()> {
    let name = report
        .file
        .file_name()
        .map_or_else(|| report.file.display().to_string(), |n| n.to_string_lossy().into_owned());
    painter.status(out, report.valid, &name)?;
    for error in &report.errors {
        painter.line(out, painter.theme().error, &format!("    ERROR: {}", error))?;
    }
    if show_warnings || !report.valid {
        for warning in &report.warnings {
            painter.line(out, painter.theme().warning, &format!("    WARNING: {}", warning))?;
        }
    }
    Ok(())
}

pub fn print_summary<W: Write>(out: &mut W, reports: &[FileReport]) -> io::Result<()> {
    let total = reports.len();
    let valid = reports.iter().filter(|r| r.valid).count();
    writeln!(out, "\nValidation Summary:")?;
    writeln!(out, "  Total files: {}", total)?;
    writeln!(out, "  Valid: {}", valid)?;
    writeln!(out, "  Invalid: {}", total - valid)?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for error in reports.iter().flat_map(|r| &r.errors) {
        *counts.entry(error.as_str()).or_default() += 1;
    }
    let mut common: Vec<(&str, usize)> = counts.into_iter().filter(|&(_, c)| c > 1).collect();
    if !common.is_empty() {
        common.sort_by(|a, b| b.1.cmp(&a.1));
        writeln!(out, "\nCommon Errors:")?;
        for (error, count) in common {
            writeln!(out, "  {} ({} files)", error, count)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const EASY_ROWS: &str = r#"[[null,null,0,null,null,null],[null,null,0,null,null,1],[1,null,null,null,0,null],[null,null,null,null,null,null],[1,null,0,0,null,null],[null,null,null,null,1,1]]"#;
    const EMPTY_ROWS: &str = r#"[[null,null,null,null,null,null],[null,null,null,null,null,null],[null,null,null,null,null,null],[null,null,null,null,null,null],[null,null,null,null,null,null],[null,null,null,null,null,null]]"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn record(id: u64, rows: &str) -> String {
        format!(
            r#"{{"id": {}, "size": "6x6", "difficulty": "easy", "puzzle": {}, "puzzle_id": "x{}"}}"#,
            id, rows, id
        )
    }

    #[test]
    fn test_valid_file_passes() {
        let file = write_temp(&record(1, EASY_ROWS));
        let report = Validator::new(true).validate_file(file.path());
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_ids_across_files() {
        let first = write_temp(&record(7, EASY_ROWS));
        let second = write_temp(&format!("[{}]", record(7, EMPTY_ROWS)));
        let mut validator = Validator::new(false);
        assert!(validator.validate_file(first.path()).valid);
        let report = validator.validate_file(second.path());
        assert!(!report.valid);
        assert!(report.errors.contains(&"Duplicate puzzle ID: 7".to_string()));
    }

    #[test]
    fn test_duplicate_grid_is_a_warning() {
        let file = write_temp(&format!("[{}, {}]", record(1, EASY_ROWS), record(2, EASY_ROWS)));
        let report = Validator::new(false).validate_file(file.path());
        assert!(report.valid);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.starts_with("Puzzle 1: Duplicate puzzle content found in:")));
    }

    #[test]
    fn test_metadata_errors() {
        let file = write_temp(
            r#"{"id": 0, "size": "7x7", "difficulty": "medium", "puzzle": [[null]], "extra": true}"#,
        );
        let report = Validator::new(true).validate_file(file.path());
        assert!(!report.valid);
        assert!(report.errors.contains(&"Field 'id' must be a positive integer".to_string()));
        assert!(report.errors.iter().any(|e| e.starts_with("Invalid size '7x7'")));
        assert!(report.errors.iter().any(|e| e.starts_with("Invalid difficulty 'medium'")));
        assert!(report.warnings.contains(&"Unexpected fields: extra".to_string()));
    }

    #[test]
    fn test_missing_fields_and_bad_cells() {
        let file = write_temp(r#"{"puzzle": [[0, 2], [null, 1]]}"#);
        let report = Validator::new(false).validate_file(file.path());
        assert!(!report.valid);
        assert!(report.errors.contains(&"Missing required field: id".to_string()));
        assert!(report
            .errors
            .contains(&"Invalid cell value at (0,1): 2. Must be null, 0, or 1".to_string()));
    }

    #[test]
    fn test_strict_rejects_ambiguous_puzzle() {
        let file = write_temp(&record(3, EMPTY_ROWS));

        let lenient = Validator::new(false).validate_file(file.path());
        assert!(lenient.valid);
        assert!(lenient.warnings.contains(&"Puzzle has no clues".to_string()));

        let strict = Validator::new(true).validate_file(file.path());
        assert!(!strict.valid);
        assert!(strict
            .errors
            .contains(&"Puzzle cannot be solved using human techniques".to_string()));
        assert!(strict
            .errors
            .contains(&"Puzzle has multiple solutions".to_string()));
    }

    #[test]
    fn test_unreadable_inputs() {
        let mut validator = Validator::new(false);
        let report = validator.validate_file(Path::new("/nonexistent/puzzles.json"));
        assert!(!report.valid);
        assert!(report.errors[0].starts_with("Error reading file"));

        let file = write_temp("[]");
        assert_eq!(
            validator.validate_file(file.path()).errors,
            vec!["Empty puzzle array".to_string()]
        );
        let file = write_temp("42");
        assert!(!validator.validate_file(file.path()).valid);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("10x10"), Some(10));
        assert_eq!(parse_size("6x8"), None);
        assert_eq!(parse_size("six"), None);
    }

    #[test]
    fn test_summary_counts() {
        let reports = vec![
            FileReport {
                file: PathBuf::from("a.json"),
                valid: true,
                errors: vec![],
                warnings: vec![],
            },
            FileReport {
                file: PathBuf::from("b.json"),
                valid: false,
                errors: vec!["Missing required field: id".to_string()],
                warnings: vec![],
            },
            FileReport {
                file: PathBuf::from("c.json"),
                valid: false,
                errors: vec!["Missing required field: id".to_string()],
                warnings: vec![],
            },
        ];
        let mut out = Vec::new();
        print_summary(&mut out, &reports).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  Invalid: 2\n"));
        assert!(text.contains("  Missing required field: id (2 files)\n"));
    }
}
