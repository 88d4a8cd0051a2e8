//! Semantic verification for scar.
//!
//! Two passes over the module: first every function signature is collected so
//! calls can resolve forward references, then each function body is walked.
//! Expression types are resolved in place on the AST (every [`Expr`] starts
//! `Invalid` and ends concrete), and all findings go into the diagnostics
//! sink without stopping the walk. An operand that already failed keeps the
//! `Invalid` type and suppresses follow-on errors, so one broken
//! subexpression yields one diagnostic.
//!
//! Codegen is gated on the sink's error count, not on a result value: the
//! verifier always completes.

mod check_expr;
mod check_stmt;

use std::collections::HashMap;

use crate::frontend::ast::{Block, Module, Span, Stmt, StmtKind};
use crate::frontend::diagnostics::Diagnostics;
use crate::frontend::intern::{Interner, StringId};
use crate::frontend::types::TypeInfo;

/// Resolved signature of a declared function.
#[derive(Debug, Clone)]
pub struct FnSig {
    pub params: Vec<TypeInfo>,
    pub return_type: TypeInfo,
    pub span: Span,
    pub has_body: bool,
}

/// Walks one module and resolves/validates all types.
pub struct Verifier<'a> {
    signatures: HashMap<StringId, FnSig>,
    /// Innermost scope last. Shadowing across scopes is allowed, duplicates
    /// within one scope are not.
    scopes: Vec<HashMap<StringId, TypeInfo>>,
    current_return: TypeInfo,
    loop_depth: usize,
    interner: &'a Interner,
    diags: &'a mut Diagnostics,
}

impl<'a> Verifier<'a> {
    pub fn new(interner: &'a Interner, diags: &'a mut Diagnostics) -> Self {
        Self {
            signatures: HashMap::new(),
            scopes: Vec::new(),
            current_return: TypeInfo::Void,
            loop_depth: 0,
            interner,
            diags,
        }
    }

    pub fn verify(mut self, module: &mut Module) {
        self.collect_signatures(module);
        for function in &mut module.functions {
            let Some(body) = function.body.as_mut() else {
                continue;
            };

            self.current_return = function.proto.return_type;
            self.loop_depth = 0;
            self.scopes.clear();

            // Parameters form the outermost scope of the body.
            let mut params = HashMap::new();
            for param in &function.proto.params {
                if params.insert(param.name, param.ty).is_some() {
                    self.diags.error(
                        format!(
                            "duplicate parameter '{}'",
                            self.interner.resolve(param.name)
                        ),
                        param.span,
                    );
                }
            }
            self.scopes.push(params);

            self.check_block(body);
            self.scopes.pop();

            if function.proto.return_type != TypeInfo::Void && !block_returns(body) {
                self.diags.error(
                    format!(
                        "function '{}' does not return a value on every path",
                        self.interner.resolve(function.proto.name)
                    ),
                    function.proto.span,
                );
            }
        }
    }

    /// First pass: record every prototype so calls can resolve regardless of
    /// declaration order. A redeclaration must match the original signature,
    /// and at most one declaration may carry a body.
    fn collect_signatures(&mut self, module: &Module) {
        for function in &module.functions {
            let proto = &function.proto;
            for param in &proto.params {
                if param.ty == TypeInfo::Void {
                    self.diags
                        .error("parameter cannot have type void", param.span);
                }
            }

            let sig = FnSig {
                params: proto.params.iter().map(|p| p.ty).collect(),
                return_type: proto.return_type,
                span: proto.span,
                has_body: function.body.is_some(),
            };

            match self.signatures.get_mut(&proto.name) {
                None => {
                    self.signatures.insert(proto.name, sig);
                }
                Some(existing) => {
                    let name = self.interner.resolve(proto.name);
                    if existing.params != sig.params || existing.return_type != sig.return_type {
                        self.diags.error(
                            format!("conflicting declaration of function '{name}'"),
                            proto.span,
                        );
                    } else if existing.has_body && sig.has_body {
                        self.diags.error(
                            format!("function '{name}' is defined more than once"),
                            proto.span,
                        );
                    } else {
                        existing.has_body |= sig.has_body;
                    }
                }
            }
        }
    }

    // ========================================================================
    // Scope helpers
    // ========================================================================

    pub(super) fn declare(&mut self, name: StringId, ty: TypeInfo, span: Span) {
        let scope = self.scopes.last_mut().expect("scope stack is never empty");
        if scope.insert(name, ty).is_some() {
            self.diags.error(
                format!(
                    "variable '{}' is already defined in this scope",
                    self.interner.resolve(name)
                ),
                span,
            );
        }
    }

    pub(super) fn lookup(&self, name: StringId) -> Option<TypeInfo> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    pub(super) fn signature(&self, name: StringId) -> Option<&FnSig> {
        self.signatures.get(&name)
    }
}

/// Whether a block definitely returns on every path.
///
/// Conservative: only `return` itself and an `if` whose arms both return
/// count. A loop never counts, even `while (true)`.
fn block_returns(block: &Block) -> bool {
    block.stmts.iter().any(stmt_returns)
}

fn stmt_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::Branch(branch) => {
            block_returns(&branch.then_block) && block_returns(&branch.else_block)
        }
        _ => false,
    }
}

/// Resolve and validate all types in `module`, reporting findings into the
/// sink. Callers gate codegen on [`Diagnostics::error_count`].
#[tracing::instrument(skip_all, fields(function_count = module.functions.len()))]
pub fn verify(module: &mut Module, interner: &Interner, diags: &mut Diagnostics) {
    Verifier::new(interner, diags).verify(module);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::ExprKind;
    use crate::frontend::lexer;
    use crate::frontend::parser;
    use crate::frontend::source::SourceBuffer;

    fn verify_src(src: &str) -> (Module, Diagnostics) {
        let source = SourceBuffer::from_string("t.scar", src);
        let mut interner = Interner::new();
        let mut diags = Diagnostics::new(false, false);
        let tokens = lexer::lex(&source, &mut interner, &mut diags).expect("lex failed");
        let mut module = parser::parse(&tokens, &mut interner, &mut diags);
        assert!(!diags.has_errors(), "test source must be syntactically valid");
        verify(&mut module, &interner, &mut diags);
        (module, diags)
    }

    fn errors(diags: &Diagnostics) -> Vec<String> {
        diags
            .entries()
            .iter()
            .filter(|d| d.level == crate::frontend::diagnostics::Level::Error)
            .map(|d| d.message.clone())
            .collect()
    }

    #[test]
    fn test_valid_function_resolves_types() {
        let (module, diags) = verify_src("func add(a i32, b i32) -> i32 { return a + b; }");
        assert!(!diags.has_errors());
        let body = module.functions[0].body.as_ref().unwrap();
        match &body.stmts[0].kind {
            StmtKind::Return(Some(e)) => assert_eq!(e.ty, TypeInfo::I32),
            other => panic!("expected return, got {other:?}"),
        }
    }

    #[test]
    fn test_int_literal_defaults_to_i32() {
        let (module, diags) = verify_src("func f() { var x: i32 = 1; }");
        assert!(!diags.has_errors());
        let body = module.functions[0].body.as_ref().unwrap();
        match &body.stmts[0].kind {
            StmtKind::Var(v) => assert_eq!(v.init.ty, TypeInfo::I32),
            other => panic!("expected var, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_reported() {
        let (_, diags) = verify_src("func f() { var x: bool = 1; }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("bool"));
    }

    #[test]
    fn test_undefined_variable() {
        let (_, diags) = verify_src("func f() -> i32 { return y; }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("undefined variable 'y'"));
    }

    #[test]
    fn test_invalid_suppresses_cascade() {
        // `y` is undefined; the addition and the return must not pile on.
        let (_, diags) = verify_src("func f() -> i32 { return y + 1; }");
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_all_errors_collected() {
        let (_, diags) =
            verify_src("func f() { var x: bool = 1; var y: i32 = true; break; }");
        assert_eq!(diags.error_count(), 3);
    }

    #[test]
    fn test_call_forward_reference() {
        let (_, diags) = verify_src("func f() -> i32 { return g(); } func g() -> i32 { return 1; }");
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_call_arity_checked() {
        let (_, diags) = verify_src("func g(a i32) -> i32 { return a; } func f() { g(1, 2); }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("expects 1 argument"));
    }

    #[test]
    fn test_call_argument_type_checked() {
        let (_, diags) = verify_src("func g(a i32) { } func f() { g(true); }");
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_duplicate_definition() {
        let (_, diags) = verify_src("func f() {} func f() {}");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("defined more than once"));
    }

    #[test]
    fn test_prototype_then_definition_ok() {
        let (_, diags) = verify_src("func f() -> i32; func f() -> i32 { return 1; }");
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_conflicting_redeclaration() {
        let (_, diags) = verify_src("func f() -> i32; func f() -> bool { return true; }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("conflicting"));
    }

    #[test]
    fn test_shadowing_in_inner_scope_allowed() {
        let (_, diags) = verify_src(
            "func f() { var x: i32 = 1; if (true) { var x: bool = true; } }",
        );
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_duplicate_in_same_scope_rejected() {
        let (_, diags) = verify_src("func f() { var x: i32 = 1; var x: i32 = 2; }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("already defined"));
    }

    #[test]
    fn test_break_outside_loop() {
        let (_, diags) = verify_src("func f() { break; }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("outside of a loop"));
    }

    #[test]
    fn test_continue_inside_loop_ok() {
        let (_, diags) = verify_src("func f() { while (true) { continue; } }");
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_missing_return_reported() {
        let (_, diags) = verify_src("func f(c bool) -> i32 { if (c) { return 1; } }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("does not return a value"));
    }

    #[test]
    fn test_both_arms_return_satisfies() {
        let (_, diags) =
            verify_src("func f(c bool) -> i32 { if (c) { return 1; } else { return 2; } }");
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_void_function_may_fall_through() {
        let (_, diags) = verify_src("func f() { var x: i32 = 1; }");
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_return_value_from_void_function() {
        let (_, diags) = verify_src("func f() { return 1; }");
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_void_variable_rejected() {
        let (_, diags) = verify_src("func f() { var x: void; }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("void"));
    }

    #[test]
    fn test_void_parameter_rejected() {
        let (_, diags) = verify_src("func f(a void) { }");
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_condition_must_be_bool() {
        let (_, diags) = verify_src("func f() { if (1) { } }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("bool"));
    }

    #[test]
    fn test_assignment_target_must_be_variable() {
        let (_, diags) = verify_src("func f() { 1 = 2; }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("assignment"));
    }

    #[test]
    fn test_arithmetic_requires_equal_types() {
        let (_, diags) = verify_src("func f(a i32, b i64) -> i32 { return a + b; }");
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_cast_bridges_types() {
        let (_, diags) = verify_src("func f(a i32, b i64) -> i64 { return a as i64 + b; }");
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_str_cast_rejected() {
        let (_, diags) = verify_src("func f(s str) -> i32 { return s as i32; }");
        assert_eq!(diags.error_count(), 1);
        assert!(errors(&diags)[0].contains("cast"));
    }

    #[test]
    fn test_char_to_float_cast_rejected() {
        let (_, diags) = verify_src("func f(c char) -> f64 { return c as f64; }");
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_bitwise_widens_to_larger() {
        let (module, diags) = verify_src("func f(a u8, b u32) -> u32 { return a & b; }");
        assert!(!diags.has_errors());
        let body = module.functions[0].body.as_ref().unwrap();
        match &body.stmts[0].kind {
            StmtKind::Return(Some(e)) => {
                assert_eq!(e.ty, TypeInfo::U32);
                assert!(matches!(e.kind, ExprKind::Binary { .. }));
            }
            other => panic!("expected return, got {other:?}"),
        }
    }

    #[test]
    fn test_comparison_yields_bool() {
        let (_, diags) = verify_src("func f(a i32) -> bool { return a < 3; }");
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_logical_requires_bool() {
        let (_, diags) = verify_src("func f(a i32) -> bool { return a && true; }");
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn test_unused_expression_value_warns() {
        let source = SourceBuffer::from_string("t.scar", "func f() { 1 + 2; }");
        let mut interner = Interner::new();
        let mut diags = Diagnostics::new(false, false);
        let tokens = lexer::lex(&source, &mut interner, &mut diags).expect("lex failed");
        let mut module = parser::parse(&tokens, &mut interner, &mut diags);
        verify(&mut module, &interner, &mut diags);
        assert!(!diags.has_errors());
        assert!(diags.entries().iter().any(|d| {
            d.level == crate::frontend::diagnostics::Level::Warn
                && d.message.contains("unused")
        }));
    }
}
