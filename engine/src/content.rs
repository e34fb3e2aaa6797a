//! FILENAME: engine/src/content.rs
//! PURPOSE: What a single cell holds: nothing, literal text, or a formula.
//! CONTEXT: Memoization is a Formula-local concern — Empty and Text never
//! have a cache to invalidate. Classification of raw input text into a
//! content variant happens once, in `CellContent::classify`, the first
//! phase of the edit protocol in `sheet.rs`.

use crate::error::FormulaParseError;
use crate::formula::Formula;
use crate::position::Position;
use crate::sheet::Sheet;
use crate::value::{CellValue, FormulaError};
use std::cell::RefCell;
use std::collections::BTreeSet;

const FORMULA_MARKER: char = '=';
const ESCAPE_MARKER: char = '\'';

/// What a cell holds. Empty and Text never populate a cache; only Formula
/// does, and lazily (on first read after becoming valid).
#[derive(Debug)]
pub enum CellContent {
    Empty,
    Text(String),
    Formula {
        formula: Formula,
        cache: RefCell<Option<Result<f64, FormulaError>>>,
    },
}

impl CellContent {
    /// Classifies raw input text into a candidate content, the first phase
    /// of `Sheet::set_cell`. Does not touch the graph or any other cell.
    pub fn classify(text: &str) -> Result<CellContent, FormulaParseError> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }

        let mut chars = text.chars();
        let first = chars.next().unwrap();

        if first == FORMULA_MARKER && text.len() >= 2 {
            let formula = Formula::parse(&text[1..])?;
            return Ok(CellContent::Formula {
                formula,
                cache: RefCell::new(None),
            });
        }

        // A lone "=" has no expression following it, so it is not a formula.
        Ok(CellContent::Text(text.to_string()))
    }

    /// The raw text a caller would see via `GetText()`.
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Formula { formula, .. } => {
                format!("{}{}", FORMULA_MARKER, formula.expression_text())
            }
        }
    }

    /// The computed value a caller would see via `GetValue()`.
    pub fn value(&self, sheet: &Sheet) -> CellValue {
        match self {
            CellContent::Empty => CellValue::Text(String::new()),
            CellContent::Text(s) => {
                if let Some(stripped) = s.strip_prefix(ESCAPE_MARKER) {
                    CellValue::Text(stripped.to_string())
                } else {
                    CellValue::Text(s.clone())
                }
            }
            CellContent::Formula { formula, cache } => {
                if let Some(result) = cache.borrow().as_ref() {
                    return to_cell_value(result.clone());
                }
                let result = formula.evaluate(sheet);
                *cache.borrow_mut() = Some(result.clone());
                to_cell_value(result)
            }
        }
    }

    /// The positions this content references, deduplicated and ascending.
    pub fn references(&self) -> BTreeSet<Position> {
        match self {
            CellContent::Empty | CellContent::Text(_) => BTreeSet::new(),
            CellContent::Formula { formula, .. } => formula.referenced_cells().clone(),
        }
    }

    /// Drops the memoized result, if any. Returns `true` if there was a
    /// live cache to clear — callers use this to prune the invalidation
    /// walk, preserving linear-in-the-dirty-set behavior.
    pub fn clear_cache(&self) -> bool {
        match self {
            CellContent::Formula { cache, .. } => cache.borrow_mut().take().is_some(),
            CellContent::Empty | CellContent::Text(_) => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

fn to_cell_value(result: Result<f64, FormulaError>) -> CellValue {
    match result {
        Ok(n) => CellValue::Number(n),
        Err(e) => CellValue::Error(e),
    }
}
