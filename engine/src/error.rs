//! FILENAME: engine/src/error.rs
//! PURPOSE: The user-visible exception types raised by mutating operations.
//! CONTEXT: Evaluation-time problems (Ref/Value/Arithm) are not exceptions —
//! see `value::FormulaError`. These three are the only error kinds a caller
//! of `Sheet::set_cell`/`Sheet::get_cell`/`Sheet::clear_cell` can observe,
//! and in every case the grid is left exactly as it was before the call
//! (aside from a freshly materialized Empty cell, which has no observable
//! content effect).

use std::fmt;

/// The position given to a Sheet operation falls outside the valid
/// `[0, MAX_ROWS) x [0, MAX_COLS)` rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidPositionError {
    pub row: u32,
    pub col: u32,
}

impl fmt::Display for InvalidPositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid position: row {}, col {}", self.row, self.col)
    }
}

impl std::error::Error for InvalidPositionError {}

/// A `Set` call began with `=` but the text after it failed to parse as a
/// formula.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaParseError {
    pub message: String,
}

impl fmt::Display for FormulaParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "formula parse error: {}", self.message)
    }
}

impl std::error::Error for FormulaParseError {}

impl From<parser::ParseError> for FormulaParseError {
    fn from(err: parser::ParseError) -> Self {
        FormulaParseError { message: err.message }
    }
}

/// Installing the candidate content would introduce a cycle in the
/// dependency graph.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularDependencyError;

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edit would create a circular dependency")
    }
}

impl std::error::Error for CircularDependencyError {}

/// The combined failure set of `Sheet::set_cell` / `Cell::set`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellSetError {
    InvalidPosition(InvalidPositionError),
    FormulaParse(FormulaParseError),
    CircularDependency(CircularDependencyError),
}

impl fmt::Display for CellSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellSetError::InvalidPosition(e) => write!(f, "{}", e),
            CellSetError::FormulaParse(e) => write!(f, "{}", e),
            CellSetError::CircularDependency(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CellSetError {}

impl From<InvalidPositionError> for CellSetError {
    fn from(e: InvalidPositionError) -> Self {
        CellSetError::InvalidPosition(e)
    }
}

impl From<FormulaParseError> for CellSetError {
    fn from(e: FormulaParseError) -> Self {
        CellSetError::FormulaParse(e)
    }
}

impl From<CircularDependencyError> for CellSetError {
    fn from(e: CircularDependencyError) -> Self {
        CellSetError::CircularDependency(e)
    }
}
