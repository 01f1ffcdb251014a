//! Visitor pattern for AST traversal.
//!
//! Provides a uniform way to traverse AST nodes with context information.

mod context;
mod traits;

pub use context::{SourceText, VisitorContext};
pub use traits::AstVisitor;

use std::ops::ControlFlow;

use swc_ecma_ast::Module;
use swc_ecma_visit::{Visit, VisitWith};

struct Walker<'a, V: AstVisitor> {
    visitor: &'a mut V,
    ctx: &'a VisitorContext<'a>,
    stopped: bool,
}

impl<V: AstVisitor> Visit for Walker<'_, V> {
    fn visit_fn_decl(&mut self, node: &swc_ecma_ast::FnDecl) {
        if self.stopped {
            return;
        }
        if let ControlFlow::Break(()) = self.visitor.visit_fn_decl(node, self.ctx) {
            self.stopped = true;
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_var_decl(&mut self, node: &swc_ecma_ast::VarDecl) {
        if self.stopped {
            return;
        }
        if let ControlFlow::Break(()) = self.visitor.visit_var_decl(node, self.ctx) {
            self.stopped = true;
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &swc_ecma_ast::CallExpr) {
        if self.stopped {
            return;
        }
        if let ControlFlow::Break(()) = self.visitor.visit_call_expr(node, self.ctx) {
            self.stopped = true;
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_member_expr(&mut self, node: &swc_ecma_ast::MemberExpr) {
        if self.stopped {
            return;
        }
        if let ControlFlow::Break(()) = self.visitor.visit_member_expr(node, self.ctx) {
            self.stopped = true;
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_bin_expr(&mut self, node: &swc_ecma_ast::BinExpr) {
        if self.stopped {
            return;
        }
        if let ControlFlow::Break(()) = self.visitor.visit_bin_expr(node, self.ctx) {
            self.stopped = true;
            return;
        }
        node.visit_children_with(self);
    }
}

pub fn walk_ast<V: AstVisitor>(module: &Module, visitor: &mut V, ctx: &VisitorContext) {
    let mut walker = Walker {
        visitor,
        ctx,
        stopped: false,
    };
    module.visit_with(&mut walker);
}
