//! Replacement-text rendering for recognized chains and fallback matches.
//!
//! Replacements are assembled from exact slices of the original source, so
//! comments, JSX, and formatting inside keys and argument lists survive
//! byte-for-byte; only separator tokens change. Unguarded (jumped) links
//! keep their original text untouched.

use swc_common::Span;

use crate::visitor::SourceText;

use super::chain::ChainLink;
use super::operand::{AccessStep, LinkKind};

pub(crate) fn render_chain(
    src: &SourceText<'_>,
    root: Span,
    links: &[ChainLink],
    negated: bool,
) -> Option<String> {
    let mut out = String::new();
    if negated {
        out.push('!');
    }
    out.push_str(src.slice(root)?);
    for link in links {
        out.push_str(&render_link(src, link.guarded, &link.step)?);
    }
    Some(out)
}

/// Render one access step. Guarded steps get a `?.` separator with any
/// existing `.` or `?.` removed first; unguarded steps render verbatim.
pub(crate) fn render_link(
    src: &SourceText<'_>,
    guarded: bool,
    step: &AccessStep,
) -> Option<String> {
    let suffix = src.slice(step.suffix)?;
    let trimmed = suffix.trim_start();
    if !guarded {
        return Some(trimmed.to_string());
    }

    let rest = if let Some(stripped) = trimmed.strip_prefix("?.") {
        stripped.trim_start()
    } else if let Some(stripped) = trimmed.strip_prefix('.') {
        stripped.trim_start()
    } else {
        trimmed
    };

    if rest.starts_with(['[', '(', '<', '#']) || rest.chars().next().is_some_and(is_ident_start) {
        return Some(format!("?.{rest}"));
    }

    // Leading trivia (a comment) hides the separator token; rebuild the
    // step from its parts instead.
    match &step.kind {
        LinkKind::Prop { prop } => Some(format!("?.{}", src.slice(*prop)?)),
        LinkKind::Computed { key } => Some(format!("?.[{}]", src.slice(*key)?)),
        LinkKind::Call => {
            let open = rest.find('(')?;
            Some(format!("?.{}", &rest[open..]))
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

#[cfg(test)]
mod tests {
    use swc_ecma_ast::{Expr, ModuleItem, OptChainBase, Stmt};

    use super::super::operand::member_access_step;
    use super::*;
    use crate::parser::ParsedFile;
    use crate::visitor::SourceText;

    fn with_member_step(code: &str, test: impl FnOnce(SourceText<'_>, AccessStep)) {
        let file = ParsedFile::from_source("test.js", code);
        let module = file.module().expect("module");
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &module.body[0] else {
            panic!("expected expression statement");
        };
        let member = match stmt.expr.as_ref() {
            Expr::Member(member) => member,
            Expr::OptChain(opt) => match opt.base.as_ref() {
                OptChainBase::Member(member) => member,
                _ => panic!("expected member expression"),
            },
            _ => panic!("expected member expression"),
        };
        let src = SourceText::new(file.source(), file.base_pos());
        test(src, member_access_step(member));
    }

    #[test]
    fn guarded_property_gets_question_dot() {
        with_member_step("foo.bar;", |src, step| {
            assert_eq!(render_link(&src, true, &step).as_deref(), Some("?.bar"));
        });
    }

    #[test]
    fn unguarded_property_is_untouched() {
        with_member_step("foo.bar;", |src, step| {
            assert_eq!(render_link(&src, false, &step).as_deref(), Some(".bar"));
        });
    }

    #[test]
    fn existing_optional_link_is_not_doubled() {
        with_member_step("foo?.bar;", |src, step| {
            assert_eq!(render_link(&src, true, &step).as_deref(), Some("?.bar"));
        });
    }

    #[test]
    fn computed_access_keeps_bracket_interior() {
        with_member_step("foo[ key ];", |src, step| {
            assert_eq!(render_link(&src, true, &step).as_deref(), Some("?.[ key ]"));
        });
    }

    #[test]
    fn separator_comment_falls_back_to_rebuilt_step() {
        with_member_step("foo/* odd */.bar;", |src, step| {
            assert_eq!(render_link(&src, true, &step).as_deref(), Some("?.bar"));
        });
    }
}
