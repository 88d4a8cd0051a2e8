//! Statement checking.

use std::collections::HashMap;

use super::Verifier;
use crate::frontend::ast::{Block, Branch, ExprKind, ForLoop, Stmt, StmtKind, VarDecl, WhileLoop};
use crate::frontend::ast::{BinaryOp, Expr};
use crate::frontend::types::TypeInfo;

impl<'a> Verifier<'a> {
    /// Check every statement of a block inside a fresh scope.
    pub(super) fn check_block(&mut self, block: &mut Block) {
        self.scopes.push(HashMap::new());
        for stmt in &mut block.stmts {
            self.check_stmt(stmt);
        }
        self.scopes.pop();
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) {
        let span = stmt.span;
        match &mut stmt.kind {
            StmtKind::Var(decl) => self.check_var_decl(decl),
            StmtKind::Branch(branch) => self.check_branch(branch),
            StmtKind::For(for_loop) => self.check_for(for_loop),
            StmtKind::While(while_loop) => self.check_while(while_loop),
            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    self.diags.error("'continue' outside of a loop", span);
                }
            }
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    self.diags.error("'break' outside of a loop", span);
                }
            }
            StmtKind::Return(value) => self.check_return(value.as_mut(), span),
            StmtKind::Expr(expr) => {
                let ty = self.check_expr(expr);
                // Assignments and calls are the effectful expressions; any
                // other discarded value is almost certainly a mistake.
                let effectful = matches!(
                    expr.kind,
                    ExprKind::Call { .. }
                        | ExprKind::Binary {
                            op: BinaryOp::Assign,
                            ..
                        }
                );
                if !effectful && ty != TypeInfo::Invalid {
                    self.diags.warn("unused expression value", expr.span);
                }
            }
            StmtKind::Empty => {}
        }
    }

    fn check_var_decl(&mut self, decl: &mut VarDecl) {
        let span = decl.init.span;
        if decl.declared_type == TypeInfo::Void {
            self.diags
                .error("cannot declare a variable of type void", span);
            return;
        }
        let init_ty = self.check_expr(&mut decl.init);
        if init_ty != TypeInfo::Invalid && init_ty != decl.declared_type {
            self.diags.error(
                format!(
                    "cannot initialize variable of type {} with a value of type {}",
                    decl.declared_type, init_ty
                ),
                span,
            );
        }
        // Declared even on mismatch, so later uses resolve to the declared
        // type instead of cascading.
        self.declare(decl.name, decl.declared_type, span);
    }

    fn check_branch(&mut self, branch: &mut Branch) {
        self.check_condition(&mut branch.cond);
        self.check_block(&mut branch.then_block);
        self.check_block(&mut branch.else_block);
    }

    fn check_while(&mut self, while_loop: &mut WhileLoop) {
        self.check_condition(&mut while_loop.cond);
        self.loop_depth += 1;
        self.check_block(&mut while_loop.body);
        self.loop_depth -= 1;
    }

    /// The `for` header clauses share one scope that encloses the body.
    fn check_for(&mut self, for_loop: &mut ForLoop) {
        self.scopes.push(HashMap::new());
        if let Some(init) = for_loop.init.as_mut() {
            self.check_expr(init);
        }
        self.check_condition(&mut for_loop.cond);
        if let Some(update) = for_loop.update.as_mut() {
            self.check_expr(update);
        }
        self.loop_depth += 1;
        self.check_block(&mut for_loop.body);
        self.loop_depth -= 1;
        self.scopes.pop();
    }

    fn check_return(&mut self, value: Option<&mut Expr>, span: crate::frontend::ast::Span) {
        match (self.current_return, value) {
            (TypeInfo::Void, None) => {}
            (TypeInfo::Void, Some(value)) => {
                self.check_expr(value);
                self.diags
                    .error("cannot return a value from a void function", value.span);
            }
            (expected, None) => {
                self.diags.error(
                    format!("function must return a value of type {expected}"),
                    span,
                );
            }
            (expected, Some(value)) => {
                let ty = self.check_expr(value);
                if ty != TypeInfo::Invalid && ty != expected {
                    self.diags.error(
                        format!("cannot return {ty} from a function returning {expected}"),
                        value.span,
                    );
                }
            }
        }
    }

    fn check_condition(&mut self, cond: &mut Expr) {
        let ty = self.check_expr(cond);
        if ty != TypeInfo::Invalid && ty != TypeInfo::Bool {
            self.diags.error(
                format!("condition must be of type bool, found {ty}"),
                cond.span,
            );
        }
    }
}
