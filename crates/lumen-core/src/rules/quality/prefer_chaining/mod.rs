//! prefer-chaining-operator rule (Q001): rewrite guarded property access
//! with the optional chaining operator.
//!
//! Two independent patterns are recognized over the same tree:
//!
//! - runs of `&&`-joined nullish/truthiness guards over deepening accesses
//!   (`foo && foo.bar && foo.bar.baz`), including the fully negated `||`
//!   mirror (`!foo || !foo.bar`), merged into one `?.` chain;
//! - empty-object fallbacks `(foo || {}).bar` / `(foo ?? {}).bar`, rewritten
//!   to `foo?.bar`.
//!
//! Matching is purely syntactic and conservative: anything that does not
//! exactly fit a pattern is left alone. The proposed rewrite can change
//! behavior for falsy-but-non-nullish values passing a truthiness guard, so
//! findings are suggestions with Medium confidence, never auto-applied
//! fixes.

mod chain;
mod fallback;
mod guard;
mod operand;
mod render;

use std::collections::HashSet;
use std::ops::ControlFlow;

use swc_common::Span;
use swc_ecma_ast::{BinExpr, BinaryOp, Expr, MemberExpr};

use crate::declare_rule;
use crate::diagnostic::{Diagnostic, Fix};
use crate::parser::ParsedFile;
use crate::rules::{Confidence, Rule, RuleMetadata, Severity};
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

use chain::collect_chains;
use fallback::match_fallback;
use guard::GuardPolarity;

declare_rule!(
    PreferChainingOperator,
    id = "Q001",
    name = "prefer-chaining-operator",
    description = "Suggest the optional chaining operator (?.) instead of guarded property access",
    category = Quality,
    severity = Warning,
    examples = "// Bad\nfoo && foo.bar && foo.bar.baz\n(foo || {}).bar\n\n// Good\nfoo?.bar?.baz\nfoo?.bar"
);

/// One rewrite proposal: a source range and replacement text valid on its
/// own against the unmodified source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Finding {
    pub span: Span,
    pub replacement: String,
    pub kind: FindingKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FindingKind {
    GuardChain,
    NegatedGuardChain,
    Fallback,
}

impl Rule for PreferChainingOperator {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut visitor = PreferChainingVisitor {
            diagnostics: Vec::new(),
            file_path: file.metadata().filename.clone(),
            ctx: &ctx,
            consumed: HashSet::new(),
        };

        walk_ast(module, &mut visitor, &ctx);
        visitor.diagnostics
    }
}

struct PreferChainingVisitor<'a> {
    diagnostics: Vec<Diagnostic>,
    file_path: String,
    ctx: &'a VisitorContext<'a>,
    /// Spans of same-operator `BinExpr` nodes already flattened into a
    /// maximal run, so the nested spine is not scanned a second time.
    consumed: HashSet<(u32, u32)>,
}

impl PreferChainingVisitor<'_> {
    fn scan_run(&mut self, node: &BinExpr, polarity: GuardPolarity) {
        let mut operands = Vec::new();
        flatten_run(node, node.op, &mut operands, &mut self.consumed);

        let src = self.ctx.source_text();
        for finding in collect_chains(&src, &operands, polarity) {
            self.report(finding);
        }
    }

    fn report(&mut self, finding: Finding) {
        let (line, column, end_line, end_column) = self.ctx.span_to_range(finding.span);
        let original = self
            .ctx
            .get_source_text(finding.span)
            .map(compact_source)
            .unwrap_or_default();

        let matched = match finding.kind {
            FindingKind::GuardChain | FindingKind::NegatedGuardChain => "logical guards",
            FindingKind::Fallback => "an empty-object fallback",
        };
        let message = format!(
            "Prefer optional chaining (?.) over {}: '{}' can be written as '{}'",
            matched, original, finding.replacement
        );

        let fix = Fix::replace(
            "Rewrite with optional chaining",
            &finding.replacement,
            line,
            column,
            end_line,
            end_column,
        );

        let diagnostic = Diagnostic::new(
            "Q001",
            Severity::Warning,
            message,
            &self.file_path,
            line,
            column,
        )
        .with_end(end_line, end_column)
        .with_confidence(Confidence::Medium)
        .with_suggestion(format!("Replace with '{}'", finding.replacement))
        .with_fix(fix);

        self.diagnostics.push(diagnostic);
    }
}

impl AstVisitor for PreferChainingVisitor<'_> {
    fn visit_bin_expr(&mut self, node: &BinExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        if self.consumed.contains(&span_key(node.span)) {
            return ControlFlow::Continue(());
        }

        match node.op {
            BinaryOp::LogicalAnd => self.scan_run(node, GuardPolarity::Truthy),
            BinaryOp::LogicalOr => self.scan_run(node, GuardPolarity::Negated),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn visit_member_expr(&mut self, node: &MemberExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        let src = self.ctx.source_text();
        if let Some(finding) = match_fallback(&src, node) {
            self.report(finding);
        }
        ControlFlow::Continue(())
    }
}

/// Flatten a maximal run of one logical operator into its operand list,
/// recording every spine node visited along the way.
fn flatten_run<'a>(
    node: &'a BinExpr,
    op: BinaryOp,
    operands: &mut Vec<&'a Expr>,
    consumed: &mut HashSet<(u32, u32)>,
) {
    consumed.insert(span_key(node.span));

    match node.left.as_ref() {
        Expr::Bin(left) if left.op == op => flatten_run(left, op, operands, consumed),
        other => operands.push(other),
    }
    match node.right.as_ref() {
        Expr::Bin(right) if right.op == op => flatten_run(right, op, operands, consumed),
        other => operands.push(other),
    }
}

fn span_key(span: Span) -> (u32, u32) {
    (span.lo.0, span.hi.0)
}

/// Collapse whitespace runs so multiline originals read as one line in the
/// message.
fn compact_source(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
