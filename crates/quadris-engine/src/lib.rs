pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("seeded grid has a full row at {row}")]
pub struct FullRowError {
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown command: {_0}")]
pub struct ParseCommandError(#[error(not(source))] pub String);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseGridError {
    #[display("grid has {_0} rows, at most 20 allowed")]
    TooManyRows(#[error(not(source))] usize),
    #[display("row {row} has {width} cells, expected 10")]
    RowWidth { row: usize, width: usize },
    #[display("invalid cell {c:?} at row {row}, column {column}")]
    InvalidCell { row: usize, column: usize, c: char },
}
