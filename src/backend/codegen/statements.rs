//! Statement lowering.

use std::collections::HashMap;

use super::{FnCodegen, LoopCtx, Slot, ir_type};
use crate::frontend::ast::{Block, Branch, ForLoop, Stmt, StmtKind, VarDecl, WhileLoop};

impl<'a> FnCodegen<'a> {
    pub(super) fn gen_block(&mut self, block: &Block) {
        self.scopes.push(HashMap::new());
        for stmt in &block.stmts {
            self.gen_stmt(stmt);
        }
        self.scopes.pop();
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Var(decl) => self.gen_var(decl),
            StmtKind::Branch(branch) => self.gen_branch(branch),
            StmtKind::While(while_loop) => self.gen_while(while_loop),
            StmtKind::For(for_loop) => self.gen_for(for_loop),
            StmtKind::Continue => {
                if let Some(ctx) = self.loops.last().copied() {
                    self.builder.br(ctx.continue_target);
                }
            }
            StmtKind::Break => {
                if let Some(ctx) = self.loops.last().copied() {
                    self.builder.br(ctx.break_target);
                }
            }
            StmtKind::Return(value) => {
                let value = value.as_ref().map(|e| self.gen_expr(e));
                self.builder.ret(value);
            }
            StmtKind::Expr(expr) => {
                self.gen_expr(expr);
            }
            StmtKind::Empty => {}
        }
    }

    fn gen_var(&mut self, decl: &VarDecl) {
        let name = self.interner.resolve(decl.name).to_string();
        let slot = self.builder.alloca(ir_type(decl.declared_type), &name);
        let value = self.gen_expr(&decl.init);
        self.builder.store(slot, value);
        self.declare(
            decl.name,
            Slot {
                id: slot,
                ty: decl.declared_type,
            },
        );
    }

    fn gen_branch(&mut self, branch: &Branch) {
        let cond = self.gen_expr(&branch.cond);
        let then_block = self.builder.new_block("then");
        let else_block = self.builder.new_block("else");
        let merge = self.builder.new_block("endif");
        self.builder.cond_br(cond, then_block, else_block);

        // Each arm falls through to the merge block unless it already
        // terminated; a merge nothing reaches is swept afterwards.
        self.builder.switch_to(then_block);
        self.gen_block(&branch.then_block);
        self.builder.br(merge);

        self.builder.switch_to(else_block);
        self.gen_block(&branch.else_block);
        self.builder.br(merge);

        self.builder.switch_to(merge);
    }

    fn gen_while(&mut self, while_loop: &WhileLoop) {
        let header = self.builder.new_block("loop");
        let body = self.builder.new_block("body");
        let exit = self.builder.new_block("endloop");

        self.builder.br(header);
        self.builder.switch_to(header);
        let cond = self.gen_expr(&while_loop.cond);
        self.builder.cond_br(cond, body, exit);

        self.loops.push(LoopCtx {
            continue_target: header,
            break_target: exit,
        });
        self.builder.switch_to(body);
        self.gen_block(&while_loop.body);
        self.builder.br(header);
        self.loops.pop();

        self.builder.switch_to(exit);
    }

    /// The update clause lives in its own step block so `continue` re-runs
    /// it before the next condition check.
    fn gen_for(&mut self, for_loop: &ForLoop) {
        self.scopes.push(HashMap::new());
        if let Some(init) = &for_loop.init {
            self.gen_expr(init);
        }

        let header = self.builder.new_block("loop");
        let body = self.builder.new_block("body");
        let step = self.builder.new_block("step");
        let exit = self.builder.new_block("endloop");

        self.builder.br(header);
        self.builder.switch_to(header);
        let cond = self.gen_expr(&for_loop.cond);
        self.builder.cond_br(cond, body, exit);

        self.loops.push(LoopCtx {
            continue_target: step,
            break_target: exit,
        });
        self.builder.switch_to(body);
        self.gen_block(&for_loop.body);
        self.builder.br(step);
        self.loops.pop();

        self.builder.switch_to(step);
        if let Some(update) = &for_loop.update {
            self.gen_expr(update);
        }
        self.builder.br(header);

        self.scopes.pop();
        self.builder.switch_to(exit);
    }
}
