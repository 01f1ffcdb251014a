//! Guard classification: which boolean operands count as a nullish or
//! truthiness check, and what subject they test.

use swc_ecma_ast::{BinExpr, BinaryOp, Expr, Lit, UnaryOp};

/// Which side of the rewrite a logical run is on: `&&` runs guard truthy
/// subjects, `||` runs guard negated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GuardPolarity {
    Truthy,
    Negated,
}

/// Strip redundant parentheses.
pub(crate) fn unparen(expr: &Expr) -> &Expr {
    let mut cursor = expr;
    while let Expr::Paren(paren) = cursor {
        cursor = &paren.expr;
    }
    cursor
}

/// Extract the guarded subject of one operand, if the operand has an
/// accepted guard shape for the given polarity.
///
/// All accepted spellings are equivalent for merging, and mixed spellings
/// may co-occur within one run: a bare `e` next to `e.x !== null` next to
/// `e.x.y != undefined` classifies link by link.
pub(crate) fn guard_subject<'a>(operand: &'a Expr, polarity: GuardPolarity) -> Option<&'a Expr> {
    let stripped = unparen(operand);
    match polarity {
        GuardPolarity::Truthy => {
            if let Expr::Bin(bin) = stripped {
                if matches!(bin.op, BinaryOp::NotEqEq | BinaryOp::NotEq) {
                    if let Some(subject) = nullish_comparison_subject(bin) {
                        return Some(subject);
                    }
                }
            }
            // Anything else is a bare truthiness test of itself. The
            // operand's own parentheses stay: a parenthesized subject is a
            // parenthesized root.
            Some(operand)
        }
        GuardPolarity::Negated => match stripped {
            Expr::Unary(unary) if unary.op == UnaryOp::Bang => Some(&unary.arg),
            Expr::Bin(bin) if matches!(bin.op, BinaryOp::EqEqEq | BinaryOp::EqEq) => {
                nullish_comparison_subject(bin)
            }
            _ => None,
        },
    }
}

fn nullish_comparison_subject(bin: &BinExpr) -> Option<&Expr> {
    if is_nullish_literal(&bin.right) {
        Some(&bin.left)
    } else if is_nullish_literal(&bin.left) {
        Some(&bin.right)
    } else {
        None
    }
}

/// `null` or the `undefined` identifier.
fn is_nullish_literal(expr: &Expr) -> bool {
    match unparen(expr) {
        Expr::Lit(Lit::Null(_)) => true,
        Expr::Ident(ident) => ident.sym.as_ref() == "undefined",
        _ => false,
    }
}
