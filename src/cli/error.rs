//! .

use std::path::PathBuf;

pub type ParseResult<T> = std::result::Result<T, ParseError>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid source for input: {0}")]
    InvalidInputSource(String),
    #[error("Failed to read file: {0}")]
    CouldNotReadPath(#[from] std::io::Error),
    #[error("stdin: {0}")]
    StdIn(String),
    #[error("Input is not valid UTF-8")]
    NonUtf8Input,
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}
