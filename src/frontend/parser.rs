//! Parser for the scar language.
//!
//! Consumes the token stream with a single forward cursor (all two-character
//! disambiguation already happened in the lexer) and builds the AST:
//! recursive descent for declarations and statements, precedence climbing for
//! expressions.
//!
//! Error recovery is local: a malformed statement raises a [`SyntaxError`]
//! that the enclosing statement loop reports and then synchronizes past, so
//! one bad construct costs one diagnostic, not one per token. At module level
//! the parser re-synchronizes to the next `func`.

use crate::frontend::ast::*;
use crate::frontend::diagnostics::{Diagnostics, SyntaxError};
use crate::frontend::intern::Interner;
use crate::frontend::lexer::{Token, TokenKind};
use crate::frontend::types::TypeInfo;

type PResult<T> = Result<T, SyntaxError>;

/// Parser state.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    interner: &'a mut Interner,
    diags: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], interner: &'a mut Interner, diags: &'a mut Diagnostics) -> Self {
        Self {
            tokens,
            pos: 0,
            interner,
            diags,
        }
    }

    /// Parse the whole token stream into one module.
    ///
    /// Always returns a module; syntax errors are reported into the sink and
    /// the error count gates later phases.
    pub fn parse(mut self) -> Module {
        let mut functions = Vec::new();
        while !self.is_at_end() {
            match self.function() {
                Ok(f) => functions.push(f),
                Err(e) => {
                    self.diags.syntax_error(e);
                    self.sync_to_item();
                }
            }
        }
        let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
        Module {
            functions,
            span: Span::new(0, end),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let tok = *self.peek();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, msg: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(SyntaxError::new(
                format!("{msg}, found {}", self.peek().kind.describe()),
                self.peek().span,
            ))
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    /// Discard tokens until the next statement/declaration start.
    ///
    /// The restart set is fixed: `func if for while loop var continue break
    /// return ;` plus a closing brace, so recovery never eats the end of the
    /// enclosing block.
    fn synchronize(&mut self) {
        if !self.is_at_end() {
            self.advance();
        }
        while !self.is_at_end() {
            if matches!(
                self.peek().kind,
                TokenKind::Func
                    | TokenKind::If
                    | TokenKind::For
                    | TokenKind::While
                    | TokenKind::Loop
                    | TokenKind::Var
                    | TokenKind::Continue
                    | TokenKind::Break
                    | TokenKind::Return
                    | TokenKind::Semi
                    | TokenKind::RBrace
            ) {
                return;
            }
            self.advance();
        }
    }

    /// Module-level recovery: skip to the next `func`.
    fn sync_to_item(&mut self) {
        if !self.is_at_end() {
            self.advance();
        }
        while !self.is_at_end() && !matches!(self.peek().kind, TokenKind::Func) {
            self.advance();
        }
    }

    /// Check if the current token can start an expression.
    fn is_at_expr_start(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Ident(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::CharLit(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::LParen
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn function(&mut self) -> PResult<Function> {
        let start = self.current_span().start;
        let proto = self.prototype()?;

        let body = if self.match_token(&TokenKind::Semi) {
            None
        } else {
            Some(self.block()?)
        };

        Ok(Function {
            proto,
            body,
            span: Span::new(start, self.prev_end()),
        })
    }

    fn prototype(&mut self) -> PResult<FunctionPrototype> {
        let start = self.current_span().start;
        self.expect(&TokenKind::Func, "expected 'func'")?;
        let name = self.identifier("expected function name")?;

        self.expect(&TokenKind::LParen, "expected '(' after function name")?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            let p_start = self.current_span().start;
            let p_name = self.identifier("expected parameter name")?;
            let ty = self.type_name("expected parameter type")?;
            params.push(Param {
                name: p_name,
                ty,
                span: Span::new(p_start, self.prev_end()),
            });
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma, "expected ',' between parameters")?;
            }
        }
        self.expect(&TokenKind::RParen, "expected ')' after parameters")?;

        // Omitted return type means void.
        let return_type = if self.match_token(&TokenKind::Arrow) {
            self.type_name("expected return type after '->'")?
        } else {
            TypeInfo::Void
        };

        Ok(FunctionPrototype {
            name,
            params,
            return_type,
            span: Span::new(start, self.prev_end()),
        })
    }

    fn identifier(&mut self, msg: &str) -> PResult<crate::frontend::intern::StringId> {
        match self.kind() {
            TokenKind::Ident(id) => {
                self.advance();
                Ok(id)
            }
            other => Err(SyntaxError::new(
                format!("{msg}, found {}", other.describe()),
                self.current_span(),
            )),
        }
    }

    fn type_name(&mut self, msg: &str) -> PResult<TypeInfo> {
        match self.kind() {
            TokenKind::TypeName(ty) => {
                self.advance();
                Ok(ty)
            }
            other => Err(SyntaxError::new(
                format!("{msg}, found {}", other.describe()),
                self.current_span(),
            )),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn block(&mut self) -> PResult<Block> {
        let start = self.current_span().start;
        self.expect(&TokenKind::LBrace, "expected '{'")?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.stmt() {
                Ok(s) => stmts.push(s),
                Err(e) => {
                    self.diags.syntax_error(e);
                    self.synchronize();
                }
            }
        }
        self.expect(&TokenKind::RBrace, "expected '}'")?;
        Ok(Block {
            stmts,
            span: Span::new(start, self.prev_end()),
        })
    }

    fn stmt(&mut self) -> PResult<Stmt> {
        let start = self.current_span().start;
        let kind = match self.kind() {
            TokenKind::Semi => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::Var => StmtKind::Var(self.var_decl()?),
            TokenKind::If => StmtKind::Branch(self.branch()?),
            TokenKind::For => StmtKind::For(self.for_loop()?),
            TokenKind::While => StmtKind::While(self.while_loop()?),
            TokenKind::Loop => StmtKind::While(self.loop_stmt()?),
            TokenKind::Continue => {
                self.advance();
                self.expect(&TokenKind::Semi, "expected ';' after 'continue'")?;
                StmtKind::Continue
            }
            TokenKind::Break => {
                self.advance();
                self.expect(&TokenKind::Semi, "expected ';' after 'break'")?;
                StmtKind::Break
            }
            TokenKind::Return => {
                self.advance();
                let value = self.try_expr()?;
                self.expect(&TokenKind::Semi, "expected ';' after return value")?;
                StmtKind::Return(value)
            }
            _ => {
                let expr = self.expr()?;
                self.expect(&TokenKind::Semi, "expected ';' after expression")?;
                StmtKind::Expr(expr)
            }
        };
        Ok(Stmt {
            kind,
            span: Span::new(start, self.prev_end()),
        })
    }

    /// `var name: type (= init)?;` — a missing initializer desugars to the
    /// zero literal of the declared type.
    fn var_decl(&mut self) -> PResult<VarDecl> {
        self.advance(); // 'var'
        let name = self.identifier("expected variable name")?;
        self.expect(&TokenKind::Colon, "expected ':' before variable type")?;
        let declared_type = self.type_name("expected variable type")?;

        let init = if self.match_token(&TokenKind::Eq) {
            self.expr()?
        } else {
            self.zero_literal(declared_type, Span::new(self.prev_end(), self.prev_end()))
        };
        self.expect(&TokenKind::Semi, "expected ';' after variable declaration")?;

        Ok(VarDecl {
            name,
            declared_type,
            init,
        })
    }

    fn zero_literal(&mut self, ty: TypeInfo, span: Span) -> Expr {
        let kind = match ty {
            TypeInfo::Bool => ExprKind::Bool(false),
            TypeInfo::F32 | TypeInfo::F64 => ExprKind::Float(0.0),
            TypeInfo::Char => ExprKind::Char('\0'),
            TypeInfo::Str => ExprKind::Str(self.interner.intern("")),
            _ => ExprKind::Int(0),
        };
        Expr::new(kind, span)
    }

    /// `if (cond) block (else block)?` — a missing else becomes an implicit
    /// empty block so codegen always has two arms.
    fn branch(&mut self) -> PResult<Branch> {
        self.advance(); // 'if'
        self.expect(&TokenKind::LParen, "expected '(' after 'if'")?;
        let cond = self.expr()?;
        self.expect(&TokenKind::RParen, "expected ')' after condition")?;
        let then_block = self.block()?;
        let else_block = if self.match_token(&TokenKind::Else) {
            self.block()?
        } else {
            Block {
                stmts: Vec::new(),
                span: Span::new(self.prev_end(), self.prev_end()),
            }
        };
        Ok(Branch {
            cond,
            then_block,
            else_block,
        })
    }

    fn for_loop(&mut self) -> PResult<ForLoop> {
        self.advance(); // 'for'
        self.expect(&TokenKind::LParen, "expected '(' after 'for'")?;
        let init = self.try_expr()?;
        self.expect(&TokenKind::Semi, "expected ';' after loop initializer")?;
        let cond = self.expr()?;
        self.expect(&TokenKind::Semi, "expected ';' after loop condition")?;
        let update = self.try_expr()?;
        self.expect(&TokenKind::RParen, "expected ')' after loop clauses")?;
        let body = self.block()?;
        Ok(ForLoop {
            init,
            cond,
            update,
            body,
        })
    }

    fn while_loop(&mut self) -> PResult<WhileLoop> {
        self.advance(); // 'while'
        self.expect(&TokenKind::LParen, "expected '(' after 'while'")?;
        let cond = self.expr()?;
        self.expect(&TokenKind::RParen, "expected ')' after condition")?;
        let body = self.block()?;
        Ok(WhileLoop { cond, body })
    }

    /// `loop block` desugars to `while (true) block`.
    fn loop_stmt(&mut self) -> PResult<WhileLoop> {
        let kw = self.advance(); // 'loop'
        let body = self.block()?;
        Ok(WhileLoop {
            cond: Expr::new(ExprKind::Bool(true), kw.span),
            body,
        })
    }

    // ========================================================================
    // Expressions (precedence climbing)
    // ========================================================================

    fn expr(&mut self) -> PResult<Expr> {
        self.expr_prec(1)
    }

    /// Parse an expression if the current token can start one.
    ///
    /// Used wherever an expression is optional, e.g. the empty clauses of a
    /// `for` header.
    fn try_expr(&mut self) -> PResult<Option<Expr>> {
        if self.is_at_expr_start() {
            Ok(Some(self.expr()?))
        } else {
            Ok(None)
        }
    }

    /// Precedence climbing: parse a unary operand, then fold binary
    /// operators of at least `min_prec`, recursing into the right-hand side
    /// with `prec + 1` (left-assoc) or `prec` (right-assoc).
    fn expr_prec(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let Some(op) = binary_op_of(&self.kind()) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
            let rhs = self.expr_prec(next_min)?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> PResult<Expr> {
        let op = match self.kind() {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                return Err(SyntaxError::new(
                    "increment/decrement operators are not supported",
                    self.current_span(),
                ));
            }
            _ => None,
        };
        if let Some(op) = op {
            let start = self.current_span().start;
            self.advance();
            let operand = self.unary()?;
            let span = Span::new(start, operand.span.end);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.postfix()
    }

    /// Suffix operators bind tighter than any prefix: currently the `as`
    /// cast.
    fn postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.atom()?;
        while self.match_token(&TokenKind::As) {
            let target = self.type_name("expected type after 'as'")?;
            let span = Span::new(expr.span.start, self.prev_end());
            expr = Expr::new(
                ExprKind::Cast {
                    operand: Box::new(expr),
                    target,
                },
                span,
            );
        }
        Ok(expr)
    }

    fn atom(&mut self) -> PResult<Expr> {
        let span = self.current_span();
        let kind = match self.kind() {
            TokenKind::True => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Int(v) => {
                self.advance();
                ExprKind::Int(v)
            }
            TokenKind::Float(v) => {
                self.advance();
                ExprKind::Float(v)
            }
            TokenKind::Str(id) => {
                self.advance();
                ExprKind::Str(id)
            }
            TokenKind::CharLit(c) => {
                self.advance();
                ExprKind::Char(c)
            }
            TokenKind::Ident(id) => {
                self.advance();
                if self.match_token(&TokenKind::LParen) {
                    let args = self.call_args()?;
                    return Ok(Expr::new(
                        ExprKind::Call { callee: id, args },
                        Span::new(span.start, self.prev_end()),
                    ));
                }
                ExprKind::Var(id)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(&TokenKind::RParen, "expected ')'")?;
                return Ok(inner);
            }
            other => {
                return Err(SyntaxError::new(
                    format!("expected expression, found {}", other.describe()),
                    span,
                ));
            }
        };
        Ok(Expr::new(kind, span))
    }

    fn call_args(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_at_end() {
            args.push(self.expr()?);
            if !self.check(&TokenKind::RParen) {
                self.expect(&TokenKind::Comma, "expected ',' between arguments")?;
            }
        }
        self.expect(&TokenKind::RParen, "expected ')' after arguments")?;
        Ok(args)
    }
}

fn binary_op_of(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Eq => BinaryOp::Assign,
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::BangEq => BinaryOp::Ne,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::Ge,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        _ => return None,
    })
}

/// Convenience entry point: parse one token stream into a module.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token], interner: &mut Interner, diags: &mut Diagnostics) -> Module {
    Parser::new(tokens, interner, diags).parse()
}

// ============================================================================
// TESTS
// ============================================================================
