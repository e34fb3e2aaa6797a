//! FILENAME: parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for formula expressions.
//! CONTEXT: After the Lexer tokenizes a formula string, the Parser converts
//! those tokens into this tree structure. The engine's evaluator then
//! traverses this tree to compute the final result, and its dependency
//! extractor walks it to find referenced cells.
//!
//! SUPPORTED EXPRESSIONS:
//! - Numeric literals: 3, 3.5, .5
//! - Cell references: A1, AA100
//! - Binary operations: + - * /
//! - Unary negation: -5
//! - Parentheses for grouping

/// A parsed formula expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Literal(f64),
    CellRef(CellRef),
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
}

/// A single cell reference like `A1` or `AA100`.
/// `col` is the uppercased column letters; `row` is the 1-based row number
/// as written in the formula text.
#[derive(Debug, PartialEq, Clone)]
pub struct CellRef {
    pub col: String,
    pub row: u32,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Negate,
}

impl BinaryOperator {
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}

/// Precedence level of `expr` as it would bind if it appeared bare in a
/// larger expression. Literals and cell references never need parens
/// (highest); unary sits above binary so a binary operand of a unary
/// always needs parens (unary's grammar rule is `"-" unary | primary`,
/// which has no bare-binary alternative).
const PREC_BINARY_ADDITIVE: u8 = 1;
const PREC_BINARY_MULTIPLICATIVE: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_ATOM: u8 = 4;

fn precedence(expr: &Expression) -> u8 {
    match expr {
        Expression::Literal(_) | Expression::CellRef(_) => PREC_ATOM,
        Expression::UnaryOp { .. } => PREC_UNARY,
        Expression::BinaryOp { op, .. } => op.precedence(),
    }
}

impl Expression {
    /// Writes `self` requiring at least `min_prec` to avoid parentheses.
    fn fmt_at(&self, min_prec: u8, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let needs_parens = precedence(self) < min_prec;
        if needs_parens {
            write!(f, "(")?;
        }
        match self {
            Expression::Literal(n) => write!(f, "{}", n)?,
            Expression::CellRef(r) => write!(f, "{}{}", r.col, r.row)?,
            Expression::UnaryOp { op, operand } => {
                write!(f, "{}", op)?;
                operand.fmt_at(PREC_UNARY, f)?;
            }
            Expression::BinaryOp { left, op, right } => {
                let this_prec = op.precedence();
                // Subtract/Divide are not associative: the right operand
                // needs parens even at equal precedence, or `1-(2-3)`
                // would print as `1-2-3` and silently change value.
                let right_min = match op {
                    BinaryOperator::Subtract | BinaryOperator::Divide => this_prec + 1,
                    BinaryOperator::Add | BinaryOperator::Multiply => this_prec,
                };
                left.fmt_at(this_prec, f)?;
                write!(f, "{}", op)?;
                right.fmt_at(right_min, f)?;
            }
        }
        if needs_parens {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_at(0, f)
    }
}

#[allow(dead_code)]
const _ASSERT_LEVELS_DISTINCT: () = {
    assert!(PREC_BINARY_ADDITIVE < PREC_BINARY_MULTIPLICATIVE);
    assert!(PREC_BINARY_MULTIPLICATIVE < PREC_UNARY);
    assert!(PREC_UNARY < PREC_ATOM);
};

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(col: &str, row: u32) -> Expression {
        Expression::CellRef(CellRef { col: col.into(), row })
    }

    fn bin(left: Expression, op: BinaryOperator, right: Expression) -> Expression {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    #[test]
    fn prints_flat_arithmetic_without_parens() {
        let expr = bin(cell("A", 1), BinaryOperator::Add, cell("A", 2));
        assert_eq!(expr.to_string(), "A1+A2");
    }

    #[test]
    fn preserves_non_associative_grouping() {
        let expr = bin(
            Expression::Literal(1.0),
            BinaryOperator::Subtract,
            bin(Expression::Literal(2.0), BinaryOperator::Subtract, Expression::Literal(3.0)),
        );
        assert_eq!(expr.to_string(), "1-(2-3)");
    }

    #[test]
    fn drops_redundant_parens_for_associative_ops() {
        let expr = bin(
            Expression::Literal(1.0),
            BinaryOperator::Add,
            bin(Expression::Literal(2.0), BinaryOperator::Add, Expression::Literal(3.0)),
        );
        assert_eq!(expr.to_string(), "1+2+3");
    }

    #[test]
    fn parenthesizes_lower_precedence_under_multiply() {
        let expr = bin(
            bin(cell("A", 1), BinaryOperator::Add, cell("A", 2)),
            BinaryOperator::Multiply,
            cell("A", 3),
        );
        assert_eq!(expr.to_string(), "(A1+A2)*A3");
    }

    #[test]
    fn parenthesizes_binary_operand_of_unary() {
        let expr = Expression::UnaryOp {
            op: UnaryOperator::Negate,
            operand: Box::new(bin(cell("A", 1), BinaryOperator::Add, cell("A", 2))),
        };
        assert_eq!(expr.to_string(), "-(A1+A2)");
    }
}
