//! Recognition of the `(x || {}).prop` / `(x ?? {}).prop` fallback idiom.
//!
//! The empty-object fallback exists only to absorb a nullish left side, so
//! the access rewrites to `x?.prop`. Nested fallbacks are deliberately NOT
//! fused: each level is matched on its own and reported as an independent
//! finding, with the other level's text left verbatim in the replacement.

use swc_common::Spanned;
use swc_ecma_ast::{BinExpr, BinaryOp, Expr, MemberExpr};

use crate::visitor::SourceText;

use super::guard::unparen;
use super::operand::member_access_step;
use super::render::render_link;
use super::{Finding, FindingKind};

pub(crate) fn match_fallback(src: &SourceText<'_>, member: &MemberExpr) -> Option<Finding> {
    let fallback = as_empty_object_fallback(&member.obj)?;
    let root = &fallback.left;

    let step = member_access_step(member);
    let access = render_link(src, true, &step)?;

    let root_text = src.slice(root.span())?;
    let root_text = if needs_parens(root) {
        format!("({root_text})")
    } else {
        root_text.to_string()
    };

    Some(Finding {
        span: member.span,
        replacement: format!("{root_text}{access}"),
        kind: FindingKind::Fallback,
    })
}

/// `X || {}` / `X ?? {}` with a literal empty object on the right. The
/// operator must sit directly under the access; a fallback buried in a
/// conditional arm binds to that arm only and never matches.
fn as_empty_object_fallback(obj: &Expr) -> Option<&BinExpr> {
    let Expr::Bin(bin) = unparen(obj) else {
        return None;
    };
    if !matches!(bin.op, BinaryOp::LogicalOr | BinaryOp::NullishCoalescing) {
        return None;
    }
    match unparen(&bin.right) {
        Expr::Object(object) if object.props.is_empty() => Some(bin),
        _ => None,
    }
}

/// Whether the retained left side must be parenthesized before a trailing
/// `?.` access. Expressions that already bind at least as tightly as member
/// access pass through bare; an existing parenthesized expression keeps its
/// own parentheses rather than gaining a second pair.
fn needs_parens(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_)
        | Expr::This(_)
        | Expr::Member(_)
        | Expr::SuperProp(_)
        | Expr::Call(_)
        | Expr::OptChain(_)
        | Expr::Paren(_)
        | Expr::Lit(_)
        | Expr::Tpl(_)
        | Expr::TaggedTpl(_)
        | Expr::Array(_)
        | Expr::Object(_) => false,
        // `new X()` binds tightly; argument-less `new X` does not.
        Expr::New(new_expr) => new_expr.args.is_none(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use swc_ecma_ast::{ModuleItem, Stmt};

    use super::*;
    use crate::parser::ParsedFile;
    use crate::visitor::SourceText;

    fn replacement_of(code: &str) -> Option<String> {
        let file = ParsedFile::from_source("test.js", code);
        let module = file.module().expect("module");
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &module.body[0] else {
            panic!("expected expression statement");
        };
        let Expr::Member(member) = stmt.expr.as_ref() else {
            return None;
        };
        let src = SourceText::new(file.source(), file.base_pos());
        match_fallback(&src, member).map(|f| f.replacement)
    }

    #[test]
    fn logical_or_fallback_rewrites() {
        assert_eq!(replacement_of("(foo || {}).bar;").as_deref(), Some("foo?.bar"));
    }

    #[test]
    fn nullish_fallback_rewrites() {
        assert_eq!(replacement_of("(foo ?? {}).bar;").as_deref(), Some("foo?.bar"));
    }

    #[test]
    fn member_root_needs_no_parens() {
        assert_eq!(
            replacement_of("(a.b || {}).c;").as_deref(),
            Some("a.b?.c")
        );
    }

    #[test]
    fn call_root_needs_no_parens() {
        assert_eq!(
            replacement_of("(getConfig() || {}).timeout;").as_deref(),
            Some("getConfig()?.timeout")
        );
    }

    #[test]
    fn logical_root_is_wrapped() {
        assert_eq!(
            replacement_of("(a || b || {}).c;").as_deref(),
            Some("(a || b)?.c")
        );
    }

    #[test]
    fn element_access_is_preserved() {
        assert_eq!(
            replacement_of("(foo || {})[bar];").as_deref(),
            Some("foo?.[bar]")
        );
    }

    #[test]
    fn conditional_arm_fallback_does_not_match() {
        assert_eq!(replacement_of("(c ? a : b || {}).x;"), None);
    }

    #[test]
    fn non_empty_object_does_not_match() {
        assert_eq!(replacement_of("(foo || { a: 1 }).bar;"), None);
    }

    #[test]
    fn plain_object_access_does_not_match() {
        assert_eq!(replacement_of("foo.bar;"), None);
    }

    #[test]
    fn finding_span_covers_the_whole_access() {
        let file = ParsedFile::from_source("test.js", "(foo || {}).bar;");
        let module = file.module().expect("module");
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &module.body[0] else {
            panic!("expected expression statement");
        };
        let Expr::Member(member) = stmt.expr.as_ref() else {
            panic!("expected member expression");
        };
        let src = SourceText::new(file.source(), file.base_pos());

        let finding = match_fallback(&src, member).expect("finding");

        assert_eq!(src.slice(finding.span), Some("(foo || {}).bar"));
        assert_eq!(finding.kind, FindingKind::Fallback);
    }
}
