//! AstVisitor trait for uniform AST traversal.

use std::ops::ControlFlow;

use swc_ecma_ast::{BinExpr, CallExpr, FnDecl, MemberExpr, VarDecl};

use super::context::VisitorContext;

pub trait AstVisitor {
    fn visit_fn_decl(&mut self, _node: &FnDecl, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_var_decl(&mut self, _node: &VarDecl, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_call_expr(&mut self, _node: &CallExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_member_expr(&mut self, _node: &MemberExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn visit_bin_expr(&mut self, _node: &BinExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
