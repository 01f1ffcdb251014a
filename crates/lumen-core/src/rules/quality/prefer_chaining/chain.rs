//! Greedy grouping of guarded operands into maximal mergeable chains.
//!
//! Consumes the flattened operand list of one logical run and grows chains
//! left to right: each operand either repeats the current subject, extends
//! it by one or more accesses, or ends the chain. A finished chain is only
//! reported when at least one transition was actually guarded.

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::Expr;

use crate::visitor::SourceText;

use super::guard::{GuardPolarity, guard_subject};
use super::operand::{AccessStep, Extension, is_valid_chain_root, match_extension};
use super::render::render_chain;
use super::{Finding, FindingKind};

pub(crate) struct ChainLink {
    pub guarded: bool,
    pub step: AccessStep,
}

struct ChainState<'a> {
    root_span: Span,
    subject: &'a Expr,
    links: Vec<ChainLink>,
    guarded_count: usize,
    span_lo: BytePos,
    span_hi: BytePos,
}

/// Scan one flattened operand list for mergeable chains. Negated (`||`)
/// runs are only considered when every operand classifies as a negated
/// guard; the run may still contain operands that never join a chain.
pub(crate) fn collect_chains(
    src: &SourceText<'_>,
    operands: &[&Expr],
    polarity: GuardPolarity,
) -> Vec<Finding> {
    if polarity == GuardPolarity::Negated
        && !operands
            .iter()
            .all(|operand| guard_subject(operand, GuardPolarity::Negated).is_some())
    {
        return Vec::new();
    }

    let mut findings = Vec::new();
    let mut chain: Option<ChainState> = None;

    for operand in operands {
        let subject = guard_subject(operand, polarity);

        let mut extended = false;
        if let (Some(state), Some(subject)) = (chain.as_mut(), subject) {
            match match_extension(src, state.subject, subject) {
                Extension::Duplicate => {
                    state.span_hi = operand.span().hi;
                    extended = true;
                }
                Extension::Steps(steps) => {
                    // A jump guards only its first step; the rest stay
                    // plain, and matching continues from the jumped-to
                    // subject.
                    for (i, step) in steps.into_iter().enumerate() {
                        state.links.push(ChainLink {
                            guarded: i == 0,
                            step,
                        });
                    }
                    state.guarded_count += 1;
                    state.subject = subject;
                    state.span_hi = operand.span().hi;
                    extended = true;
                }
                Extension::NoMatch => {}
            }
        }
        if extended {
            continue;
        }

        if let Some(state) = chain.take() {
            finalize(src, state, polarity, &mut findings);
        }

        if let Some(subject) = subject {
            if is_valid_chain_root(subject) {
                chain = Some(ChainState {
                    root_span: subject.span(),
                    subject,
                    links: Vec::new(),
                    guarded_count: 0,
                    span_lo: operand.span().lo,
                    span_hi: operand.span().hi,
                });
            }
        }
    }

    if let Some(state) = chain.take() {
        finalize(src, state, polarity, &mut findings);
    }

    findings
}

fn finalize(
    src: &SourceText<'_>,
    state: ChainState<'_>,
    polarity: GuardPolarity,
    findings: &mut Vec<Finding>,
) {
    if state.guarded_count == 0 {
        return;
    }
    let negated = polarity == GuardPolarity::Negated;
    let Some(replacement) = render_chain(src, state.root_span, &state.links, negated) else {
        return;
    };
    findings.push(Finding {
        span: Span::new(state.span_lo, state.span_hi),
        replacement,
        kind: if negated {
            FindingKind::NegatedGuardChain
        } else {
            FindingKind::GuardChain
        },
    });
}

#[cfg(test)]
mod tests {
    use swc_ecma_ast::{BinaryOp, ModuleItem, Stmt};

    use super::*;
    use crate::parser::ParsedFile;
    use crate::visitor::SourceText;

    fn flatten<'a>(expr: &'a Expr, op: BinaryOp, out: &mut Vec<&'a Expr>) {
        if let Expr::Bin(bin) = expr {
            if bin.op == op {
                flatten(&bin.left, op, out);
                flatten(&bin.right, op, out);
                return;
            }
        }
        out.push(expr);
    }

    fn chains_of(code: &str, op: BinaryOp, polarity: GuardPolarity) -> Vec<Finding> {
        let file = ParsedFile::from_source("test.js", code);
        let module = file.module().expect("module");
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &module.body[0] else {
            panic!("expected expression statement");
        };
        let mut operands = Vec::new();
        flatten(&stmt.expr, op, &mut operands);
        let src = SourceText::new(file.source(), file.base_pos());
        collect_chains(&src, &operands, polarity)
    }

    fn replacements(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.replacement.as_str()).collect()
    }

    #[test]
    fn merges_consecutive_guards() {
        let findings = chains_of(
            "a && a.b && a.b.c;",
            BinaryOp::LogicalAnd,
            GuardPolarity::Truthy,
        );

        assert_eq!(replacements(&findings), vec!["a?.b?.c"]);
    }

    #[test]
    fn jump_guards_only_the_first_new_step() {
        let findings = chains_of(
            "a && a.b && a.b.c.d;",
            BinaryOp::LogicalAnd,
            GuardPolarity::Truthy,
        );

        assert_eq!(replacements(&findings), vec!["a?.b?.c.d"]);
    }

    #[test]
    fn chain_without_guarded_transition_is_not_reported() {
        let findings = chains_of(
            "a.b && bing;",
            BinaryOp::LogicalAnd,
            GuardPolarity::Truthy,
        );

        assert!(findings.is_empty());
    }

    #[test]
    fn failing_operand_can_seed_a_new_chain() {
        let findings = chains_of(
            "a && a.b && x && x.y;",
            BinaryOp::LogicalAnd,
            GuardPolarity::Truthy,
        );

        assert_eq!(replacements(&findings), vec!["a?.b", "x?.y"]);
    }

    #[test]
    fn negated_run_renders_with_leading_negation() {
        let findings = chains_of(
            "!a || !a.b;",
            BinaryOp::LogicalOr,
            GuardPolarity::Negated,
        );

        assert_eq!(replacements(&findings), vec!["!a?.b"]);
        assert_eq!(findings[0].kind, FindingKind::NegatedGuardChain);
    }

    #[test]
    fn negated_run_requires_uniformly_negated_operands() {
        let findings = chains_of(
            "x || !a || !a.b;",
            BinaryOp::LogicalOr,
            GuardPolarity::Negated,
        );

        assert!(findings.is_empty());
    }

    #[test]
    fn equality_guards_merge_like_bare_ones() {
        let findings = chains_of(
            "a !== null && a.b != undefined && a.b.c;",
            BinaryOp::LogicalAnd,
            GuardPolarity::Truthy,
        );

        assert_eq!(replacements(&findings), vec!["a?.b?.c"]);
    }

    #[test]
    fn finding_span_covers_the_merged_operands() {
        let code = "a && a.b && bing;";
        let file = ParsedFile::from_source("test.js", code);
        let module = file.module().expect("module");
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &module.body[0] else {
            panic!("expected expression statement");
        };
        let mut operands = Vec::new();
        flatten(&stmt.expr, BinaryOp::LogicalAnd, &mut operands);
        let src = SourceText::new(file.source(), file.base_pos());

        let findings = collect_chains(&src, &operands, GuardPolarity::Truthy);

        assert_eq!(findings.len(), 1);
        assert_eq!(src.slice(findings[0].span), Some("a && a.b"));
    }
}
