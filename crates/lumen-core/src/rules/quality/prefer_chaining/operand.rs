//! Structural comparison of expression fragments and decomposition of
//! member/element/call access chains.
//!
//! Equality here is whitespace-insensitive but never semantic: expressions
//! are compared through a normalized view (parentheses and pre-existing `?.`
//! links erased), and node kinds without a structural rule fall back to
//! exact source-text equality, so unknown shapes only ever match when they
//! are formatted identically. Failing to match is always an option; nothing
//! in this module guesses.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    BinaryOp, Callee, Expr, ExprOrSpread, Lit, MemberExpr, MemberProp, OptChainBase, UnaryOp,
};

use crate::visitor::SourceText;

use super::guard::unparen;

/// One access step relative to a base expression, carrying the spans the
/// renderer needs to rebuild it from source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AccessStep {
    /// Source range from the end of the base to the end of the access,
    /// e.g. `.prop`, `?.prop`, `[key]`, `(args)`.
    pub suffix: Span,
    pub kind: LinkKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkKind {
    Prop { prop: Span },
    Computed { key: Span },
    Call,
}

/// How a candidate operand relates to the chain subject built so far.
#[derive(Debug)]
pub(crate) enum Extension {
    /// Candidate repeats the subject exactly; a no-op, not a new link.
    Duplicate,
    /// Candidate is the subject plus these accesses, in source order.
    /// More than one step means the operand jumped levels.
    Steps(Vec<AccessStep>),
    NoMatch,
}

pub(crate) fn match_extension(
    src: &SourceText<'_>,
    current: &Expr,
    candidate: &Expr,
) -> Extension {
    if contains_non_null(current) || contains_non_null(candidate) {
        return Extension::NoMatch;
    }
    if same_expr(src, current, candidate) {
        return Extension::Duplicate;
    }

    let mut steps = Vec::new();
    let mut cursor = candidate;
    loop {
        let Some(peeled) = peel_access(cursor) else {
            return Extension::NoMatch;
        };
        if let Some(key) = peeled.key {
            if !is_simple_key(key) {
                return Extension::NoMatch;
            }
        }
        steps.push(peeled.step);
        if same_expr(src, peeled.base, current) {
            steps.reverse();
            return Extension::Steps(steps);
        }
        cursor = peeled.base;
    }
}

/// Whether an operand subject can seed a guarded chain: an identifier, call,
/// member access, or parenthesized expression. Bare `this`, anything with a
/// non-null assertion on its spine, and complex computed keys are out.
pub(crate) fn is_valid_chain_root(expr: &Expr) -> bool {
    if matches!(unparen(expr), Expr::This(_)) {
        return false;
    }
    if contains_non_null(expr) {
        return false;
    }
    match expr {
        Expr::Ident(_) | Expr::Member(_) | Expr::Call(_) | Expr::OptChain(_) | Expr::Paren(_) => {
            spine_keys_simple(expr)
        }
        _ => false,
    }
}

/// The trailing access of a member expression as a step relative to its
/// object.
pub(crate) fn member_access_step(member: &MemberExpr) -> AccessStep {
    let suffix = Span::new(member.obj.span().hi, member.span.hi);
    let kind = match &member.prop {
        MemberProp::Ident(name) => LinkKind::Prop { prop: name.span },
        MemberProp::PrivateName(name) => LinkKind::Prop { prop: name.span },
        MemberProp::Computed(computed) => LinkKind::Computed {
            key: computed.expr.span(),
        },
    };
    AccessStep { suffix, kind }
}

/// A computed key is simple enough to merge when it is an identifier,
/// `this`, or a dot-access chain over those.
pub(crate) fn is_simple_key(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) | Expr::This(_) => true,
        Expr::Member(member) => {
            matches!(member.prop, MemberProp::Ident(_)) && is_simple_key(&member.obj)
        }
        _ => false,
    }
}

/// Non-null assertions anywhere on the access spine poison merging.
pub(crate) fn contains_non_null(expr: &Expr) -> bool {
    let mut cursor = unparen(expr);
    loop {
        match cursor {
            Expr::TsNonNull(_) => return true,
            Expr::Member(member) => cursor = unparen(&member.obj),
            Expr::Call(call) => match &call.callee {
                Callee::Expr(callee) => cursor = unparen(callee),
                _ => return false,
            },
            Expr::OptChain(opt) => match opt.base.as_ref() {
                OptChainBase::Member(member) => cursor = unparen(&member.obj),
                OptChainBase::Call(call) => cursor = unparen(&call.callee),
            },
            _ => return false,
        }
    }
}

struct Peeled<'a> {
    base: &'a Expr,
    step: AccessStep,
    key: Option<&'a Expr>,
}

fn peel_access(expr: &Expr) -> Option<Peeled<'_>> {
    match unparen(expr) {
        Expr::Member(member) => Some(Peeled {
            base: &member.obj,
            step: member_access_step(member),
            key: computed_key(member),
        }),
        Expr::Call(call) => {
            let Callee::Expr(callee) = &call.callee else {
                return None;
            };
            Some(Peeled {
                base: callee,
                step: AccessStep {
                    suffix: Span::new(callee.span().hi, call.span.hi),
                    kind: LinkKind::Call,
                },
                key: None,
            })
        }
        Expr::OptChain(opt) => match opt.base.as_ref() {
            OptChainBase::Member(member) => Some(Peeled {
                base: &member.obj,
                step: member_access_step(member),
                key: computed_key(member),
            }),
            OptChainBase::Call(call) => Some(Peeled {
                base: &call.callee,
                step: AccessStep {
                    suffix: Span::new(call.callee.span().hi, call.span.hi),
                    kind: LinkKind::Call,
                },
                key: None,
            }),
        },
        _ => None,
    }
}

fn computed_key(member: &MemberExpr) -> Option<&Expr> {
    match &member.prop {
        MemberProp::Computed(computed) => Some(&computed.expr),
        _ => None,
    }
}

fn spine_keys_simple(expr: &Expr) -> bool {
    let mut cursor = unparen(expr);
    loop {
        match cursor {
            Expr::Member(member) => {
                if let MemberProp::Computed(computed) = &member.prop {
                    if !is_simple_key(&computed.expr) {
                        return false;
                    }
                }
                cursor = unparen(&member.obj);
            }
            Expr::Call(call) => match &call.callee {
                Callee::Expr(callee) => cursor = unparen(callee),
                _ => return false,
            },
            Expr::OptChain(opt) => match opt.base.as_ref() {
                OptChainBase::Member(member) => {
                    if let MemberProp::Computed(computed) = &member.prop {
                        if !is_simple_key(&computed.expr) {
                            return false;
                        }
                    }
                    cursor = unparen(&member.obj);
                }
                OptChainBase::Call(call) => cursor = unparen(&call.callee),
            },
            _ => return true,
        }
    }
}

/// Structural, whitespace-insensitive expression equality.
pub(crate) fn same_expr(src: &SourceText<'_>, a: &Expr, b: &Expr) -> bool {
    let a = unparen(a);
    let b = unparen(b);
    match (view(a), view(b)) {
        (ExprView::Ident(x), ExprView::Ident(y)) => x == y,
        (ExprView::This, ExprView::This) => true,
        (ExprView::Member { obj: xo, prop: xp }, ExprView::Member { obj: yo, prop: yp }) => {
            same_prop(src, &xp, &yp) && same_expr(src, xo, yo)
        }
        (
            ExprView::Call {
                callee: xc,
                args: xa,
                type_args: xt,
            },
            ExprView::Call {
                callee: yc,
                args: ya,
                type_args: yt,
            },
        ) => {
            same_expr(src, xc, yc)
                && xa.len() == ya.len()
                && xa.iter().zip(ya).all(|(x, y)| {
                    x.spread.is_some() == y.spread.is_some() && same_expr(src, &x.expr, &y.expr)
                })
                && same_optional_text(src, xt, yt)
        }
        (ExprView::Unary { op: xo, arg: xa }, ExprView::Unary { op: yo, arg: ya }) => {
            xo == yo && same_expr(src, xa, ya)
        }
        (
            ExprView::Bin {
                op: xo,
                left: xl,
                right: xr,
            },
            ExprView::Bin {
                op: yo,
                left: yl,
                right: yr,
            },
        ) => xo == yo && same_expr(src, xl, yl) && same_expr(src, xr, yr),
        (
            ExprView::Cond {
                test: xt,
                cons: xc,
                alt: xa,
            },
            ExprView::Cond {
                test: yt,
                cons: yc,
                alt: ya,
            },
        ) => same_expr(src, xt, yt) && same_expr(src, xc, yc) && same_expr(src, xa, ya),
        (ExprView::Await(x), ExprView::Await(y)) => same_expr(src, x, y),
        (ExprView::NonNull(x), ExprView::NonNull(y)) => same_expr(src, x, y),
        (ExprView::Lit(x), ExprView::Lit(y)) => x == y,
        (ExprView::Other(x), ExprView::Other(y)) => {
            matches!((src.slice(x), src.slice(y)), (Some(xt), Some(yt)) if xt == yt)
        }
        _ => false,
    }
}

enum ExprView<'a> {
    Ident(&'a str),
    This,
    Member {
        obj: &'a Expr,
        prop: PropView<'a>,
    },
    Call {
        callee: &'a Expr,
        args: &'a [ExprOrSpread],
        type_args: Option<Span>,
    },
    Unary {
        op: UnaryOp,
        arg: &'a Expr,
    },
    Bin {
        op: BinaryOp,
        left: &'a Expr,
        right: &'a Expr,
    },
    Cond {
        test: &'a Expr,
        cons: &'a Expr,
        alt: &'a Expr,
    },
    Await(&'a Expr),
    NonNull(&'a Expr),
    Lit(LitView<'a>),
    Other(Span),
}

enum PropView<'a> {
    Named(&'a str),
    Private(&'a str),
    Computed(&'a Expr),
}

#[derive(PartialEq)]
enum LitView<'a> {
    Str(&'a str),
    Num(f64),
    Bool(bool),
    Null,
}

fn view(expr: &Expr) -> ExprView<'_> {
    match expr {
        Expr::Ident(ident) => ExprView::Ident(ident.sym.as_ref()),
        Expr::This(_) => ExprView::This,
        Expr::Member(member) => ExprView::Member {
            obj: &member.obj,
            prop: prop_view(&member.prop),
        },
        Expr::Call(call) => match &call.callee {
            Callee::Expr(callee) => ExprView::Call {
                callee,
                args: &call.args,
                type_args: call.type_args.as_ref().map(|t| t.span),
            },
            _ => ExprView::Other(call.span),
        },
        Expr::OptChain(opt) => match opt.base.as_ref() {
            OptChainBase::Member(member) => ExprView::Member {
                obj: &member.obj,
                prop: prop_view(&member.prop),
            },
            OptChainBase::Call(call) => ExprView::Call {
                callee: &call.callee,
                args: &call.args,
                type_args: call.type_args.as_ref().map(|t| t.span),
            },
        },
        Expr::Unary(unary) => ExprView::Unary {
            op: unary.op,
            arg: &unary.arg,
        },
        Expr::Bin(bin) => ExprView::Bin {
            op: bin.op,
            left: &bin.left,
            right: &bin.right,
        },
        Expr::Cond(cond) => ExprView::Cond {
            test: &cond.test,
            cons: &cond.cons,
            alt: &cond.alt,
        },
        Expr::Await(await_expr) => ExprView::Await(&await_expr.arg),
        Expr::TsNonNull(non_null) => ExprView::NonNull(&non_null.expr),
        Expr::Lit(lit) => match lit {
            Lit::Str(s) => ExprView::Lit(LitView::Str(s.value.as_ref())),
            Lit::Num(n) => ExprView::Lit(LitView::Num(n.value)),
            Lit::Bool(b) => ExprView::Lit(LitView::Bool(b.value)),
            Lit::Null(_) => ExprView::Lit(LitView::Null),
            other => ExprView::Other(other.span()),
        },
        other => ExprView::Other(other.span()),
    }
}

fn prop_view(prop: &MemberProp) -> PropView<'_> {
    match prop {
        MemberProp::Ident(name) => PropView::Named(name.sym.as_ref()),
        MemberProp::PrivateName(name) => PropView::Private(name.name.as_ref()),
        MemberProp::Computed(computed) => PropView::Computed(&computed.expr),
    }
}

fn same_prop(src: &SourceText<'_>, a: &PropView<'_>, b: &PropView<'_>) -> bool {
    match (a, b) {
        (PropView::Named(x), PropView::Named(y)) => x == y,
        (PropView::Private(x), PropView::Private(y)) => x == y,
        (PropView::Computed(x), PropView::Computed(y)) => same_expr(src, x, y),
        _ => false,
    }
}

fn same_optional_text(src: &SourceText<'_>, a: Option<Span>, b: Option<Span>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => {
            matches!((src.slice(x), src.slice(y)), (Some(xt), Some(yt)) if xt == yt)
        }
        _ => false,
    }
}
