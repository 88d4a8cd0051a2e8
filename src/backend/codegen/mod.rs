//! AST to IR lowering.
//!
//! Runs only on a module the verifier passed with zero errors, so every
//! expression carries a concrete type and name lookups cannot fail. Local
//! variables and parameters live in stack slots allocated in the entry
//! block; every read is a load and every assignment a store.
//!
//! Each lowered function is structurally verified before it is accepted; a
//! malformed function is a lowering bug and surfaces as
//! [`FatalError::BrokenFunction`] rather than bad output.

mod expressions;
mod statements;

use std::collections::{HashMap, HashSet};

use crate::backend::ir::{self, BlockId, FunctionBuilder, IrModule, IrType, ValueId};
use crate::frontend::ast::{Function, Module};
use crate::frontend::diagnostics::FatalError;
use crate::frontend::intern::{Interner, StringId};
use crate::frontend::types::TypeInfo;

/// Source type to IR type. Signedness disappears here; it is re-encoded in
/// instruction selection. `char` lowers to its 32-bit code point.
pub fn ir_type(ty: TypeInfo) -> IrType {
    match ty {
        TypeInfo::Invalid | TypeInfo::Void => IrType::Void,
        TypeInfo::Bool => IrType::I1,
        TypeInfo::I8 | TypeInfo::U8 => IrType::I8,
        TypeInfo::I16 | TypeInfo::U16 => IrType::I16,
        TypeInfo::I32 | TypeInfo::U32 | TypeInfo::Char => IrType::I32,
        TypeInfo::I64 | TypeInfo::U64 => IrType::I64,
        TypeInfo::F32 => IrType::F32,
        TypeInfo::F64 => IrType::F64,
        TypeInfo::Str => IrType::Ptr,
    }
}

/// Deduplicating string literal table, shared by all functions of a module.
#[derive(Default)]
pub(super) struct StringTable {
    table: Vec<String>,
    index: HashMap<String, usize>,
}

impl StringTable {
    fn intern(&mut self, text: &str) -> usize {
        if let Some(&idx) = self.index.get(text) {
            return idx;
        }
        let idx = self.table.len();
        self.table.push(text.to_string());
        self.index.insert(text.to_string(), idx);
        idx
    }
}

/// A named stack slot.
#[derive(Clone, Copy)]
pub(super) struct Slot {
    pub id: ValueId,
    pub ty: TypeInfo,
}

/// Branch targets of the innermost enclosing loop.
#[derive(Clone, Copy)]
pub(super) struct LoopCtx {
    /// Where `continue` goes: the step block of a `for`, the condition
    /// header of a `while`.
    pub continue_target: BlockId,
    pub break_target: BlockId,
}

/// Lowering state for one function body.
pub(super) struct FnCodegen<'a> {
    pub builder: FunctionBuilder,
    pub scopes: Vec<HashMap<StringId, Slot>>,
    pub loops: Vec<LoopCtx>,
    pub interner: &'a Interner,
    pub strings: &'a mut StringTable,
}

impl<'a> FnCodegen<'a> {
    pub(super) fn declare(&mut self, name: StringId, slot: Slot) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, slot);
        }
    }

    pub(super) fn lookup(&self, name: StringId) -> Option<Slot> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }
}

fn lower_function(
    function: &Function,
    interner: &Interner,
    strings: &mut StringTable,
) -> Result<ir::IrFunction, FatalError> {
    let name = interner.resolve(function.proto.name).to_string();
    let params: Vec<(String, IrType)> = function
        .proto
        .params
        .iter()
        .map(|p| (interner.resolve(p.name).to_string(), ir_type(p.ty)))
        .collect();
    let return_type = ir_type(function.proto.return_type);

    let body = function
        .body
        .as_ref()
        .ok_or_else(|| FatalError::Bug(format!("lowering declaration-only function '{name}'")))?;

    let mut cx = FnCodegen {
        builder: FunctionBuilder::new(name.clone(), params, return_type),
        scopes: vec![HashMap::new()],
        loops: Vec::new(),
        interner,
        strings,
    };

    // Parameters get stack slots like any local, so assignment to a
    // parameter needs no special case.
    for param in &function.proto.params {
        let param_name = interner.resolve(param.name).to_string();
        let slot = cx.builder.alloca(ir_type(param.ty), &param_name);
        cx.builder
            .store(slot, ir::Value::Param(param_name, ir_type(param.ty)));
        cx.declare(param.name, Slot { id: slot, ty: param.ty });
    }

    cx.gen_block(body);

    // A fall-through end is only reachable in void functions; everywhere
    // else the verifier already proved every path returns.
    if !cx.builder.is_terminated() {
        if function.proto.return_type == TypeInfo::Void {
            cx.builder.ret(None);
        } else {
            cx.builder.unreachable();
        }
    }

    let mut func = cx.builder.finish();
    if let Err(reason) = ir::verify(&func) {
        return Err(FatalError::BrokenFunction { name, reason });
    }
    ir::optimize(&mut func);
    Ok(func)
}

/// Lower a verified module to IR.
///
/// Definitions become `define`s; a name that is only ever forward-declared
/// becomes a single `declare` for an external symbol.
#[tracing::instrument(skip_all, fields(function_count = module.functions.len()))]
pub fn generate(module: &Module, interner: &Interner) -> Result<IrModule, FatalError> {
    let mut strings = StringTable::default();
    let mut functions = Vec::new();

    let defined: HashSet<StringId> = module
        .functions
        .iter()
        .filter(|f| f.body.is_some())
        .map(|f| f.proto.name)
        .collect();
    let mut declared: HashSet<StringId> = HashSet::new();

    for function in &module.functions {
        if function.body.is_some() {
            functions.push(lower_function(function, interner, &mut strings)?);
        } else if !defined.contains(&function.proto.name)
            && declared.insert(function.proto.name)
        {
            functions.push(ir::IrFunction {
                name: interner.resolve(function.proto.name).to_string(),
                params: function
                    .proto
                    .params
                    .iter()
                    .map(|p| (interner.resolve(p.name).to_string(), ir_type(p.ty)))
                    .collect(),
                return_type: ir_type(function.proto.return_type),
                blocks: Vec::new(),
            });
        }
    }

    Ok(IrModule {
        strings: strings.table,
        functions,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::diagnostics::Diagnostics;
    use crate::frontend::source::SourceBuffer;
    use crate::frontend::{lexer, parser, verifier};

    fn lower_src(src: &str) -> IrModule {
        let source = SourceBuffer::from_string("t.scar", src);
        let mut interner = Interner::new();
        let mut diags = Diagnostics::new(false, false);
        let tokens = lexer::lex(&source, &mut interner, &mut diags).expect("lex failed");
        let mut module = parser::parse(&tokens, &mut interner, &mut diags);
        verifier::verify(&mut module, &interner, &mut diags);
        assert!(!diags.has_errors(), "test source must verify cleanly");
        generate(&module, &interner).expect("lowering failed")
    }

    #[test]
    fn test_add_function() {
        let ir = lower_src("func add(a i32, b i32) -> i32 { return a + b; }");
        let text = ir.to_string();
        assert!(text.contains("define i32 @add(i32 %a, i32 %b)"));
        assert!(text.contains("add i32"));
        assert!(text.contains("ret i32"));
        assert!(ir::verify(&ir.functions[0]).is_ok());
    }

    #[test]
    fn test_params_get_stack_slots() {
        let ir = lower_src("func f(a i32) -> i32 { a = a + 1; return a; }");
        let text = ir.to_string();
        assert!(text.contains("alloca i32"));
        assert!(text.contains("store i32 %a"));
    }

    #[test]
    fn test_branch_produces_conditional() {
        let ir = lower_src(
            "func f(c bool) -> i32 { if (c) { return 1; } else { return 2; } }",
        );
        let text = ir.to_string();
        assert!(text.contains("br i1"));
        assert!(text.contains("then"));
        assert!(text.contains("else"));
        // Both arms return, so no merge block survives.
        assert!(!text.contains("endif"));
    }

    #[test]
    fn test_if_without_else_merges() {
        let ir = lower_src("func f(c bool) { if (c) { f(c); } }");
        let text = ir.to_string();
        assert!(text.contains("endif"));
        assert!(text.contains("ret void"));
    }

    #[test]
    fn test_while_loop_structure() {
        let ir = lower_src("func f() { var i: i32 = 0; while (i < 3) { i = i + 1; } }");
        let text = ir.to_string();
        assert!(text.contains("loop"));
        assert!(text.contains("icmp slt i32"));
        assert!(text.contains("endloop"));
    }

    #[test]
    fn test_for_continue_targets_step() {
        let ir = lower_src(
            "func f() { var i: i32 = 0; for (; i < 3; i = i + 1) { continue; } }",
        );
        let func = &ir.functions[0];
        let step = func
            .blocks
            .iter()
            .position(|b| b.label.starts_with("step"))
            .expect("for loop must have a step block");
        let body = func
            .blocks
            .iter()
            .find(|b| b.label.starts_with("body"))
            .unwrap();
        match body.instrs.last() {
            Some(ir::Instr::Br { target }) => assert_eq!(target.0, step),
            other => panic!("expected branch to step, got {other:?}"),
        }
    }

    #[test]
    fn test_string_literals_deduplicated() {
        let ir = lower_src(
            "func g(s str); func f() { g(\"hi\"); g(\"hi\"); g(\"bye\"); }",
        );
        assert_eq!(ir.strings.len(), 2);
        assert!(ir.to_string().contains("@str.0 = constant \"hi\""));
    }

    #[test]
    fn test_declaration_only_function_emits_declare() {
        let ir = lower_src("func ext(x f64) -> f64; func f() -> f64 { return ext(1.0); }");
        let text = ir.to_string();
        assert!(text.contains("declare f64 @ext(f64 %x)"));
        assert!(text.contains("call f64 @ext"));
    }

    #[test]
    fn test_prototype_plus_definition_emits_single_define() {
        let ir = lower_src("func f() -> i32; func f() -> i32 { return 1; }");
        assert_eq!(ir.functions.len(), 1);
        assert!(!ir.functions[0].is_declaration());
    }

    #[test]
    fn test_unsigned_division_selects_udiv() {
        let ir = lower_src("func f(a u32, b u32) -> u32 { return a / b; }");
        assert!(ir.to_string().contains("udiv i32"));
    }

    #[test]
    fn test_float_arithmetic_selects_fadd() {
        let ir = lower_src("func f(a f64) -> f64 { return a + 1.0; }");
        assert!(ir.to_string().contains("fadd f64"));
    }

    #[test]
    fn test_bool_constants_are_i1() {
        let ir = lower_src("func f() -> bool { return true; }");
        assert!(ir.to_string().contains("ret i1 1"));
    }

    #[test]
    fn test_cast_int_widening_is_sext() {
        let ir = lower_src("func f(a i32) -> i64 { return a as i64; }");
        assert!(ir.to_string().contains("sext i32"));
    }

    #[test]
    fn test_cast_unsigned_widening_is_zext() {
        let ir = lower_src("func f(a u32) -> u64 { return a as u64; }");
        assert!(ir.to_string().contains("zext i32"));
    }

    #[test]
    fn test_cast_int_to_bool_compares_zero() {
        let ir = lower_src("func f(a i32) -> bool { return a as bool; }");
        assert!(ir.to_string().contains("icmp ne i32"));
    }

    #[test]
    fn test_all_lowered_functions_verify() {
        let ir = lower_src(
            "func fib(n i32) -> i32 {
                 if (n < 2) { return n; }
                 return fib(n - 1) + fib(n - 2);
             }
             func main() -> i32 { return fib(10); }",
        );
        for func in &ir.functions {
            assert!(ir::verify(func).is_ok(), "function '{}' malformed", func.name);
        }
    }
}
