//! FILENAME: engine/src/dependency_extractor.rs
//! PURPOSE: Extracts cell references from a parsed formula expression.
//! CONTEXT: After a formula is parsed into an AST, this module walks the
//! tree to find every cell reference it contains. These references become
//! the candidate outgoing edge set used by cycle detection and, once
//! committed, the cell's dependency graph edges (see `sheet.rs`).
//!
//! Only references that resolve to a *valid* position are kept here — they
//! are the ones that can participate in a graph edge. An out-of-range
//! reference still affects evaluation (it raises `FormulaError::Ref`, see
//! `evaluator.rs`), but it cannot be a graph edge because there is no cell
//! on the other end.

use crate::position::Position;
use parser::Expression;
use std::collections::BTreeSet;

/// Collects the positions referenced by `expr`, deduplicated and sorted
/// ascending, filtered to positions within the valid grid rectangle.
pub fn extract_references(expr: &Expression) -> BTreeSet<Position> {
    let mut refs = BTreeSet::new();
    walk(expr, &mut refs);
    refs
}

fn walk(expr: &Expression, refs: &mut BTreeSet<Position>) {
    match expr {
        Expression::Literal(_) => {}
        Expression::CellRef(cell_ref) => {
            if let Some(pos) = Position::parse(&format!("{}{}", cell_ref.col, cell_ref.row)) {
                refs.insert(pos);
            }
        }
        Expression::UnaryOp { operand, .. } => walk(operand, refs),
        Expression::BinaryOp { left, right, .. } => {
            walk(left, refs);
            walk(right, refs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_and_dedups_references() {
        let expr = parser::parse("A1+A1+B2").unwrap();
        let refs: Vec<Position> = extract_references(&expr).into_iter().collect();
        assert_eq!(refs, vec![Position::new(0, 0), Position::new(1, 1)]);
    }

    #[test]
    fn returns_ascending_order_regardless_of_source_order() {
        let expr = parser::parse("C3+A1").unwrap();
        let refs: Vec<Position> = extract_references(&expr).into_iter().collect();
        assert_eq!(refs, vec![Position::new(0, 0), Position::new(2, 2)]);
    }

    #[test]
    fn literal_only_expression_has_no_references() {
        let expr = parser::parse("1+2*3").unwrap();
        assert!(extract_references(&expr).is_empty());
    }

    #[test]
    fn out_of_range_reference_is_excluded() {
        let expr = parser::parse("A99999999+A1").unwrap();
        let refs: Vec<Position> = extract_references(&expr).into_iter().collect();
        assert_eq!(refs, vec![Position::new(0, 0)]);
    }
}
