//! Puzzle files: a single JSON record or an array of records.

use crate::error::CliError;
use binairo_core::Grid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One stored puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleRecord {
    /// Collection ID
    #[serde(default)]
    pub id: Option<u64>,
    /// Side in `NxN` form, e.g. `"6x6"`
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Rows of `null | 0 | 1`
    pub puzzle: Vec<Vec<Option<u8>>>,
    /// Identifier on the site the puzzle came from
    #[serde(default)]
    pub puzzle_id: Option<String>,
}

impl PuzzleRecord {
    pub fn grid(&self) -> Result<Grid, CliError> {
        Ok(Grid::from_rows(self.puzzle.clone())?)
    }

    pub fn label(&self) -> String {
        self.id.map_or_else(|| "N/A".to_string(), |id| id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PuzzleFile {
    Many(Vec<PuzzleRecord>),
    One(PuzzleRecord),
}

/// Read every record in `path`.
pub fn load_records(path: &Path) -> Result<Vec<PuzzleRecord>, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: PuzzleFile = serde_json::from_str(&json).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let records = match file {
        PuzzleFile::Many(records) => records,
        PuzzleFile::One(record) => vec![record],
    };
    if records.is_empty() {
        return Err(CliError::NoPuzzles {
            path: path.to_path_buf(),
        });
    }
    Ok(records)
}

/// Load `path` and pick the record with `id`, or the first one when no ID is
/// given.
pub fn load_puzzle(path: &Path, id: Option<u64>) -> Result<(PuzzleRecord, usize), CliError> {
    let records = load_records(path)?;
    let count = records.len();
    Ok((select(records, id)?, count))
}

fn select(records: Vec<PuzzleRecord>, id: Option<u64>) -> Result<PuzzleRecord, CliError> {
    let Some(id) = id else {
        let mut records = records.into_iter();
        return records.next().ok_or(CliError::UnknownId {
            id: 0,
            available: "none".to_string(),
        });
    };
    let available = records
        .iter()
        .map(PuzzleRecord::label)
        .collect::<Vec<_>>()
        .join(", ");
    records
        .into_iter()
        .find(|r| r.id == Some(id))
        .ok_or(CliError::UnknownId { id, available })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_single_record() {
        let file = write_temp(
            r#"{"id": 3, "size": "2x2", "difficulty": "easy", "puzzle": [[null, 0], [0, null]], "puzzle_id": "abc"}"#,
        );
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(3));
        assert_eq!(records[0].puzzle_id.as_deref(), Some("abc"));
        let grid = records[0].grid().unwrap();
        assert_eq!(grid.to_line_string(), ".0/0.");
    }

    #[test]
    fn test_load_array_and_select() {
        let file = write_temp(
            r#"[{"id": 1, "puzzle": [[null, null], [null, null]]},
                {"id": 2, "puzzle": [[1, null], [null, null]]}]"#,
        );
        let records = load_records(file.path()).unwrap();
        let picked = select(records.clone(), Some(2)).unwrap();
        assert_eq!(picked.puzzle[0][0], Some(1));
        assert_eq!(select(records.clone(), None).unwrap().id, Some(1));
        match select(records, Some(9)) {
            Err(CliError::UnknownId { id, available }) => {
                assert_eq!(id, 9);
                assert_eq!(available, "1, 2");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_load_puzzle_reports_count() {
        let file = write_temp(
            r#"[{"id": 1, "puzzle": [[null, null], [null, null]]},
                {"id": 2, "puzzle": [[1, null], [null, null]]}]"#,
        );
        let (record, count) = load_puzzle(file.path(), Some(2)).unwrap();
        assert_eq!(record.id, Some(2));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_empty_array_rejected() {
        let file = write_temp("[]");
        assert!(matches!(
            load_records(file.path()),
            Err(CliError::NoPuzzles { .. })
        ));
    }

    #[test]
    fn test_bad_json_and_missing_file() {
        let file = write_temp("{ not json");
        assert!(matches!(load_records(file.path()), Err(CliError::Json { .. })));
        assert!(matches!(
            load_records(Path::new("/nonexistent/puzzles.json")),
            Err(CliError::Io { .. })
        ));
    }

    #[test]
    fn test_bad_literal_surfaces_as_grid_error() {
        let file = write_temp(r#"{"id": 1, "puzzle": [[2, null], [null, null]]}"#);
        let records = load_records(file.path()).unwrap();
        assert!(matches!(records[0].grid(), Err(CliError::Grid(_))));
    }
}
