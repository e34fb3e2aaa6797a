//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Evaluates a parsed formula expression against a Sheet.
//! CONTEXT: This is the lookup contract a Formula's `Evaluate` relies on:
//! given a referenced position, resolve it to a number or a FormulaError.
//! Arithmetic failures encountered while combining values (division by
//! zero, overflow) are caught here and reported as `FormulaError::Arithm`
//! rather than panicking or propagating a Rust-level error.

use crate::position::Position;
use crate::sheet::Sheet;
use crate::value::{CellValue, FormulaError};
use parser::{BinaryOperator, Expression, UnaryOperator};

pub fn eval(expr: &Expression, sheet: &Sheet) -> Result<f64, FormulaError> {
    match expr {
        Expression::Literal(n) => {
            if n.is_finite() {
                Ok(*n)
            } else {
                Err(FormulaError::Arithm)
            }
        }
        Expression::CellRef(cell_ref) => {
            let text = format!("{}{}", cell_ref.col, cell_ref.row);
            let pos = Position::parse(&text).ok_or(FormulaError::Ref)?;
            lookup(sheet, pos)
        }
        Expression::UnaryOp { op, operand } => {
            let value = eval(operand, sheet)?;
            match op {
                UnaryOperator::Negate => Ok(-value),
            }
        }
        Expression::BinaryOp { left, op, right } => {
            let lhs = eval(left, sheet)?;
            let rhs = eval(right, sheet)?;
            apply(*op, lhs, rhs)
        }
    }
}

/// Resolves a referenced position to a number, per the lookup contract:
/// invalid positions raise `Ref`; absent or Empty cells resolve to `0`;
/// numbers pass through; text is parsed as a whole number or raises
/// `Value`; errors re-raise unchanged.
pub fn lookup(sheet: &Sheet, pos: Position) -> Result<f64, FormulaError> {
    if !pos.is_valid() {
        return Err(FormulaError::Ref);
    }

    let cell = match sheet.get_cell_unchecked(pos) {
        Some(cell) => cell,
        None => return Ok(0.0),
    };

    match cell.value(sheet) {
        CellValue::Number(n) => Ok(n),
        CellValue::Text(s) => {
            if s.is_empty() {
                Ok(0.0)
            } else {
                s.trim().parse::<f64>().map_err(|_| FormulaError::Value)
            }
        }
        CellValue::Error(e) => Err(e),
    }
}

fn apply(op: BinaryOperator, lhs: f64, rhs: f64) -> Result<f64, FormulaError> {
    let result = match op {
        BinaryOperator::Add => lhs + rhs,
        BinaryOperator::Subtract => lhs - rhs,
        BinaryOperator::Multiply => lhs * rhs,
        BinaryOperator::Divide => {
            if rhs == 0.0 {
                return Err(FormulaError::Arithm);
            }
            lhs / rhs
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(FormulaError::Arithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Sheet;

    fn pos(row: u32, col: u32) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn evaluates_arithmetic() {
        let sheet = Sheet::new();
        let expr = parser::parse("1+2*3").unwrap();
        assert_eq!(eval(&expr, &sheet), Ok(7.0));
    }

    #[test]
    fn lookup_of_unset_cell_is_zero() {
        let sheet = Sheet::new();
        assert_eq!(lookup(&sheet, pos(5, 5)), Ok(0.0));
    }

    #[test]
    fn lookup_of_invalid_position_is_ref_error() {
        let sheet = Sheet::new();
        assert_eq!(lookup(&sheet, pos(crate::position::MAX_ROWS, 0)), Err(FormulaError::Ref));
    }

    #[test]
    fn division_by_zero_is_arithm_error() {
        let sheet = Sheet::new();
        let expr = parser::parse("1/0").unwrap();
        assert_eq!(eval(&expr, &sheet), Err(FormulaError::Arithm));
    }

    #[test]
    fn overflow_is_arithm_error() {
        // The grammar has no exponent notation, so push a literal past
        // f64::MAX by digit count instead: a 200-digit number squared is
        // far beyond the ~1.8e308 finite range.
        let huge = "1".to_string() + &"0".repeat(200);
        let sheet = Sheet::new();
        let expr = parser::parse(&format!("{huge}*{huge}")).unwrap();
        assert_eq!(eval(&expr, &sheet), Err(FormulaError::Arithm));
    }

    #[test]
    fn bare_overflowing_literal_is_arithm_error() {
        // The lexer itself already parses a long enough digit run straight
        // to f64::INFINITY; that must surface as Arithm even with no
        // surrounding arithmetic to trip the BinaryOp finiteness check.
        let huge = "1".to_string() + &"0".repeat(400);
        let sheet = Sheet::new();
        let expr = parser::parse(&huge).unwrap();
        assert_eq!(eval(&expr, &sheet), Err(FormulaError::Arithm));
    }
}
