use binairo_core::GridError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not a puzzle file: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} contains no puzzles")]
    NoPuzzles { path: PathBuf },
    #[error("no puzzle with ID {id}; available IDs: {available}")]
    UnknownId { id: u64, available: String },
    #[error("invalid puzzle grid: {0}")]
    Grid(#[from] GridError),
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
}
