//! FILENAME: engine/src/value.rs
//! PURPOSE: The public result of reading a cell, and the closed set of
//! evaluation-time failure categories a formula can produce.
//! CONTEXT: FormulaError values flow through arithmetic like any other
//! value — they are never exceptions. Their printable form is the code
//! string a spreadsheet user would recognize (`#REF!`, `#VALUE!`,
//! `#ARITHM!`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed set of evaluation-time failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormulaError {
    /// A referenced position is syntactically invalid or out of range.
    Ref,
    /// A referenced textual cell does not parse as a number.
    Value,
    /// Overflow, division by zero, or other arithmetic failure.
    Arithm,
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Arithm => "#ARITHM!",
        };
        write!(f, "{}", code)
    }
}

impl std::error::Error for FormulaError {}

/// The public result of reading a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}
