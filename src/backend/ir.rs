//! Intermediate representation.
//!
//! A small typed, block-structured IR with LLVM-flavored textual output.
//! Functions are lists of basic blocks; every block ends with exactly one
//! terminator and branch targets are block ids within the same function.
//! Values are virtual registers, constants, or parameter references; there
//! is no limit on register count.
//!
//! [`FunctionBuilder`] is the only way code is emitted: it tracks the current
//! block and silently drops instructions emitted after a terminator, which is
//! what makes straight-line lowering of `return; x = 1;` safe. `verify`
//! checks the single-trailing-terminator invariant after construction, and
//! `optimize` sweeps blocks that became unreachable.

use std::collections::HashMap;
use std::fmt;

/// IR-level types. Signedness lives in the instructions, not the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrType {
    Void,
    I1,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// An opaque pointer: string literals and stack slots.
    Ptr,
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IrType::Void => "void",
            IrType::I1 => "i1",
            IrType::I8 => "i8",
            IrType::I16 => "i16",
            IrType::I32 => "i32",
            IrType::I64 => "i64",
            IrType::F32 => "f32",
            IrType::F64 => "f64",
            IrType::Ptr => "ptr",
        };
        f.write_str(s)
    }
}

/// A virtual register within one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueId(pub u32);

/// A basic block within one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(pub usize);

/// An operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Reg(ValueId, IrType),
    /// Integer constant, also used for i1 and char code points.
    ConstInt(i64, IrType),
    ConstFloat(f64, IrType),
    /// Index into the module string table; always of type `ptr`.
    ConstStr(usize),
    /// A function parameter, referenced by name.
    Param(String, IrType),
}

impl Value {
    pub fn ty(&self) -> IrType {
        match self {
            Value::Reg(_, ty) | Value::ConstInt(_, ty) | Value::ConstFloat(_, ty) => *ty,
            Value::ConstStr(_) => IrType::Ptr,
            Value::Param(_, ty) => *ty,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Reg(id, _) => write!(f, "%{}", id.0),
            Value::ConstInt(v, _) => write!(f, "{v}"),
            Value::ConstFloat(v, _) => write!(f, "{v:?}"),
            Value::ConstStr(idx) => write!(f, "@str.{idx}"),
            Value::Param(name, _) => write!(f, "%{name}"),
        }
    }
}

/// Two-operand arithmetic and bitwise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SRem,
    URem,
    And,
    Or,
    Xor,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,
}

impl BinOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
            BinOp::UDiv => "udiv",
            BinOp::SRem => "srem",
            BinOp::URem => "urem",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::FAdd => "fadd",
            BinOp::FSub => "fsub",
            BinOp::FMul => "fmul",
            BinOp::FDiv => "fdiv",
            BinOp::FRem => "frem",
        }
    }
}

/// Comparison predicates; result is always `i1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
    Ult,
    Ule,
    Ugt,
    Uge,
    FOeq,
    FOne,
    FOlt,
    FOle,
    FOgt,
    FOge,
}

impl CmpOp {
    pub fn is_float(self) -> bool {
        matches!(
            self,
            CmpOp::FOeq | CmpOp::FOne | CmpOp::FOlt | CmpOp::FOle | CmpOp::FOgt | CmpOp::FOge
        )
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            CmpOp::Eq => "eq",
            CmpOp::Ne => "ne",
            CmpOp::Slt => "slt",
            CmpOp::Sle => "sle",
            CmpOp::Sgt => "sgt",
            CmpOp::Sge => "sge",
            CmpOp::Ult => "ult",
            CmpOp::Ule => "ule",
            CmpOp::Ugt => "ugt",
            CmpOp::Uge => "uge",
            CmpOp::FOeq => "oeq",
            CmpOp::FOne => "one",
            CmpOp::FOlt => "olt",
            CmpOp::FOle => "ole",
            CmpOp::FOgt => "ogt",
            CmpOp::FOge => "oge",
        }
    }
}

/// Value conversion kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOp {
    Trunc,
    ZExt,
    SExt,
    FpTrunc,
    FpExt,
    SiToFp,
    UiToFp,
    FpToSi,
    FpToUi,
}

impl CastOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            CastOp::Trunc => "trunc",
            CastOp::ZExt => "zext",
            CastOp::SExt => "sext",
            CastOp::FpTrunc => "fptrunc",
            CastOp::FpExt => "fpext",
            CastOp::SiToFp => "sitofp",
            CastOp::UiToFp => "uitofp",
            CastOp::FpToSi => "fptosi",
            CastOp::FpToUi => "fptoui",
        }
    }
}

/// One instruction. The last three variants are terminators plus
/// `Unreachable`, and a well-formed block contains exactly one of them, at
/// the end.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    Alloca {
        dst: ValueId,
        ty: IrType,
        name: String,
    },
    Load {
        dst: ValueId,
        ty: IrType,
        slot: ValueId,
    },
    Store {
        slot: ValueId,
        value: Value,
    },
    Bin {
        dst: ValueId,
        op: BinOp,
        lhs: Value,
        rhs: Value,
    },
    Cmp {
        dst: ValueId,
        op: CmpOp,
        lhs: Value,
        rhs: Value,
    },
    Cast {
        dst: ValueId,
        op: CastOp,
        value: Value,
        to: IrType,
    },
    Call {
        dst: Option<ValueId>,
        callee: String,
        ret: IrType,
        args: Vec<Value>,
    },
    Br {
        target: BlockId,
    },
    CondBr {
        cond: Value,
        then_target: BlockId,
        else_target: BlockId,
    },
    Ret {
        value: Option<Value>,
    },
    Unreachable,
}

impl Instr {
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Instr::Br { .. } | Instr::CondBr { .. } | Instr::Ret { .. } | Instr::Unreachable
        )
    }

    /// Branch targets, for reachability walks.
    fn successors(&self) -> Vec<BlockId> {
        match self {
            Instr::Br { target } => vec![*target],
            Instr::CondBr {
                then_target,
                else_target,
                ..
            } => vec![*then_target, *else_target],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IrBlock {
    pub label: String,
    pub instrs: Vec<Instr>,
}

#[derive(Debug, Clone)]
pub struct IrFunction {
    pub name: String,
    pub params: Vec<(String, IrType)>,
    pub return_type: IrType,
    /// Entry is always block 0. Empty for a forward declaration.
    pub blocks: Vec<IrBlock>,
}

impl IrFunction {
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One compiled module: the string literal table plus all functions.
#[derive(Debug, Default)]
pub struct IrModule {
    pub strings: Vec<String>,
    pub functions: Vec<IrFunction>,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Emission cursor for one function.
pub struct FunctionBuilder {
    func: IrFunction,
    current: BlockId,
    next_value: u32,
}

impl FunctionBuilder {
    pub fn new(name: String, params: Vec<(String, IrType)>, return_type: IrType) -> Self {
        let func = IrFunction {
            name,
            params,
            return_type,
            blocks: vec![IrBlock {
                label: "entry".to_string(),
                instrs: Vec::new(),
            }],
        };
        Self {
            func,
            current: BlockId(0),
            next_value: 0,
        }
    }

    pub fn new_block(&mut self, hint: &str) -> BlockId {
        let id = BlockId(self.func.blocks.len());
        self.func.blocks.push(IrBlock {
            label: format!("{hint}{}", id.0),
            instrs: Vec::new(),
        });
        id
    }

    pub fn switch_to(&mut self, block: BlockId) {
        self.current = block;
    }

    /// Whether the current block already ended.
    pub fn is_terminated(&self) -> bool {
        self.func.blocks[self.current.0]
            .instrs
            .last()
            .is_some_and(Instr::is_terminator)
    }

    fn fresh(&mut self) -> ValueId {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        id
    }

    /// Append to the current block. Instructions after a terminator are
    /// unreachable and silently dropped.
    fn push(&mut self, instr: Instr) {
        if self.is_terminated() {
            return;
        }
        self.func.blocks[self.current.0].instrs.push(instr);
    }

    /// Stack slots always go to the top of the entry block, before any
    /// control flow.
    pub fn alloca(&mut self, ty: IrType, name: &str) -> ValueId {
        let dst = self.fresh();
        let at = self.func.blocks[0]
            .instrs
            .iter()
            .take_while(|i| matches!(i, Instr::Alloca { .. }))
            .count();
        self.func.blocks[0].instrs.insert(
            at,
            Instr::Alloca {
                dst,
                ty,
                name: name.to_string(),
            },
        );
        dst
    }

    pub fn load(&mut self, ty: IrType, slot: ValueId) -> Value {
        let dst = self.fresh();
        self.push(Instr::Load { dst, ty, slot });
        Value::Reg(dst, ty)
    }

    pub fn store(&mut self, slot: ValueId, value: Value) {
        self.push(Instr::Store { slot, value });
    }

    pub fn bin(&mut self, op: BinOp, lhs: Value, rhs: Value) -> Value {
        let ty = lhs.ty();
        let dst = self.fresh();
        self.push(Instr::Bin { dst, op, lhs, rhs });
        Value::Reg(dst, ty)
    }

    pub fn cmp(&mut self, op: CmpOp, lhs: Value, rhs: Value) -> Value {
        let dst = self.fresh();
        self.push(Instr::Cmp { dst, op, lhs, rhs });
        Value::Reg(dst, IrType::I1)
    }

    pub fn cast(&mut self, op: CastOp, value: Value, to: IrType) -> Value {
        let dst = self.fresh();
        self.push(Instr::Cast { dst, op, value, to });
        Value::Reg(dst, to)
    }

    pub fn call(&mut self, callee: &str, ret: IrType, args: Vec<Value>) -> Option<Value> {
        let dst = if ret == IrType::Void {
            None
        } else {
            Some(self.fresh())
        };
        self.push(Instr::Call {
            dst,
            callee: callee.to_string(),
            ret,
            args,
        });
        dst.map(|id| Value::Reg(id, ret))
    }

    pub fn br(&mut self, target: BlockId) {
        self.push(Instr::Br { target });
    }

    pub fn cond_br(&mut self, cond: Value, then_target: BlockId, else_target: BlockId) {
        self.push(Instr::CondBr {
            cond,
            then_target,
            else_target,
        });
    }

    pub fn ret(&mut self, value: Option<Value>) {
        self.push(Instr::Ret { value });
    }

    pub fn unreachable(&mut self) {
        self.push(Instr::Unreachable);
    }

    pub fn finish(self) -> IrFunction {
        self.func
    }
}

// ============================================================================
// VERIFICATION AND CLEANUP
// ============================================================================

/// Structural check: every block ends with exactly one terminator and all
/// branch targets exist.
pub fn verify(func: &IrFunction) -> Result<(), String> {
    for block in &func.blocks {
        let Some(last) = block.instrs.last() else {
            return Err(format!("block '{}' is empty", block.label));
        };
        if !last.is_terminator() {
            return Err(format!("block '{}' does not end with a terminator", block.label));
        }
        for (i, instr) in block.instrs.iter().enumerate() {
            if instr.is_terminator() && i + 1 != block.instrs.len() {
                return Err(format!(
                    "block '{}' has a terminator before its end",
                    block.label
                ));
            }
            for target in instr.successors() {
                if target.0 >= func.blocks.len() {
                    return Err(format!(
                        "block '{}' branches to a nonexistent block",
                        block.label
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Drop blocks that cannot be reached from the entry, remapping branch
/// targets. Lowering creates such blocks when both arms of a branch return.
pub fn optimize(func: &mut IrFunction) {
    if func.blocks.is_empty() {
        return;
    }
    let mut reachable = vec![false; func.blocks.len()];
    let mut worklist = vec![BlockId(0)];
    while let Some(block) = worklist.pop() {
        if std::mem::replace(&mut reachable[block.0], true) {
            continue;
        }
        for instr in &func.blocks[block.0].instrs {
            worklist.extend(instr.successors());
        }
    }
    if reachable.iter().all(|&r| r) {
        return;
    }

    let mut remap = vec![BlockId(0); func.blocks.len()];
    let mut kept = Vec::new();
    for (i, block) in func.blocks.drain(..).enumerate() {
        if reachable[i] {
            remap[i] = BlockId(kept.len());
            kept.push(block);
        }
    }
    for block in &mut kept {
        for instr in &mut block.instrs {
            match instr {
                Instr::Br { target } => *target = remap[target.0],
                Instr::CondBr {
                    then_target,
                    else_target,
                    ..
                } => {
                    *then_target = remap[then_target.0];
                    *else_target = remap[else_target.0];
                }
                _ => {}
            }
        }
    }
    func.blocks = kept;
}

/// Fold integer arithmetic, bitwise ops, and comparisons whose operands are
/// both constants, substituting the result into later uses. Division and
/// remainder are left alone so a constant zero divisor still traps at
/// runtime instead of at compile time.
pub fn fold_constants(func: &mut IrFunction) {
    let mut folded: HashMap<u32, Value> = HashMap::new();

    let subst = |value: &mut Value, folded: &HashMap<u32, Value>| {
        if let Value::Reg(id, _) = value {
            if let Some(replacement) = folded.get(&id.0) {
                *value = replacement.clone();
            }
        }
    };

    for block in &mut func.blocks {
        block.instrs.retain_mut(|instr| {
            match instr {
                Instr::Bin { dst, op, lhs, rhs } => {
                    subst(lhs, &folded);
                    subst(rhs, &folded);
                    if let (Value::ConstInt(a, ty), Value::ConstInt(b, _)) = (&*lhs, &*rhs) {
                        let result = match op {
                            BinOp::Add => Some(a.wrapping_add(*b)),
                            BinOp::Sub => Some(a.wrapping_sub(*b)),
                            BinOp::Mul => Some(a.wrapping_mul(*b)),
                            BinOp::And => Some(a & b),
                            BinOp::Or => Some(a | b),
                            BinOp::Xor => Some(a ^ b),
                            _ => None,
                        };
                        if let Some(result) = result {
                            folded.insert(dst.0, Value::ConstInt(result, *ty));
                            return false;
                        }
                    }
                }
                Instr::Cmp { dst, op, lhs, rhs } => {
                    subst(lhs, &folded);
                    subst(rhs, &folded);
                    if let (Value::ConstInt(a, _), Value::ConstInt(b, _)) = (&*lhs, &*rhs) {
                        let result = match op {
                            CmpOp::Eq => Some(a == b),
                            CmpOp::Ne => Some(a != b),
                            CmpOp::Slt => Some(a < b),
                            CmpOp::Sle => Some(a <= b),
                            CmpOp::Sgt => Some(a > b),
                            CmpOp::Sge => Some(a >= b),
                            CmpOp::Ult => Some((*a as u64) < *b as u64),
                            CmpOp::Ule => Some(*a as u64 <= *b as u64),
                            CmpOp::Ugt => Some(*a as u64 > *b as u64),
                            CmpOp::Uge => Some(*a as u64 >= *b as u64),
                            _ => None,
                        };
                        if let Some(result) = result {
                            folded.insert(dst.0, Value::ConstInt(i64::from(result), IrType::I1));
                            return false;
                        }
                    }
                }
                Instr::Store { value, .. } => subst(value, &folded),
                Instr::Cast { value, .. } => subst(value, &folded),
                Instr::Call { args, .. } => {
                    for arg in args {
                        subst(arg, &folded);
                    }
                }
                Instr::CondBr { cond, .. } => subst(cond, &folded),
                Instr::Ret { value: Some(value) } => subst(value, &folded),
                _ => {}
            }
            true
        });
    }
}

// ============================================================================
// PRINTING
// ============================================================================

impl fmt::Display for IrModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.strings.iter().enumerate() {
            writeln!(f, "@str.{i} = constant \"{}\"", s.escape_default())?;
        }
        if !self.strings.is_empty() {
            writeln!(f)?;
        }
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{func}")?;
        }
        Ok(())
    }
}

impl fmt::Display for IrFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_declaration() {
            "declare"
        } else {
            "define"
        };
        write!(f, "{keyword} {} @{}(", self.return_type, self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty} %{name}")?;
        }
        write!(f, ")")?;
        if self.is_declaration() {
            return writeln!(f);
        }
        writeln!(f, " {{")?;
        for block in &self.blocks {
            writeln!(f, "{}:", block.label)?;
            for instr in &block.instrs {
                writeln!(f, "  {}", show_instr(instr, self))?;
            }
        }
        writeln!(f, "}}")
    }
}

fn show_instr(instr: &Instr, func: &IrFunction) -> String {
    let label = |b: &BlockId| func.blocks[b.0].label.clone();
    match instr {
        Instr::Alloca { dst, ty, name } => format!("%{} = alloca {ty}  ; {name}", dst.0),
        Instr::Load { dst, ty, slot } => format!("%{} = load {ty}, ptr %{}", dst.0, slot.0),
        Instr::Store { slot, value } => {
            format!("store {} {value}, ptr %{}", value.ty(), slot.0)
        }
        Instr::Bin { dst, op, lhs, rhs } => {
            format!("%{} = {} {} {lhs}, {rhs}", dst.0, op.mnemonic(), lhs.ty())
        }
        Instr::Cmp { dst, op, lhs, rhs } => {
            let inst = if op.is_float() { "fcmp" } else { "icmp" };
            format!(
                "%{} = {inst} {} {} {lhs}, {rhs}",
                dst.0,
                op.mnemonic(),
                lhs.ty()
            )
        }
        Instr::Cast { dst, op, value, to } => {
            format!(
                "%{} = {} {} {value} to {to}",
                dst.0,
                op.mnemonic(),
                value.ty()
            )
        }
        Instr::Call {
            dst,
            callee,
            ret,
            args,
        } => {
            let args = args
                .iter()
                .map(|a| format!("{} {a}", a.ty()))
                .collect::<Vec<_>>()
                .join(", ");
            match dst {
                Some(dst) => format!("%{} = call {ret} @{callee}({args})", dst.0),
                None => format!("call {ret} @{callee}({args})"),
            }
        }
        Instr::Br { target } => format!("br label %{}", label(target)),
        Instr::CondBr {
            cond,
            then_target,
            else_target,
        } => format!(
            "br i1 {cond}, label %{}, label %{}",
            label(then_target),
            label(else_target)
        ),
        Instr::Ret { value: Some(value) } => format!("ret {} {value}", value.ty()),
        Instr::Ret { value: None } => "ret void".to_string(),
        Instr::Unreachable => "unreachable".to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FunctionBuilder {
        FunctionBuilder::new(
            "f".to_string(),
            vec![("a".to_string(), IrType::I32)],
            IrType::I32,
        )
    }

    #[test]
    fn test_verify_accepts_well_formed() {
        let mut b = sample();
        b.ret(Some(Value::ConstInt(0, IrType::I32)));
        assert!(verify(&b.finish()).is_ok());
    }

    #[test]
    fn test_verify_rejects_missing_terminator() {
        let mut b = sample();
        b.bin(
            BinOp::Add,
            Value::ConstInt(1, IrType::I32),
            Value::ConstInt(2, IrType::I32),
        );
        let err = verify(&b.finish()).unwrap_err();
        assert!(err.contains("terminator"));
    }

    #[test]
    fn test_instructions_after_terminator_are_dropped() {
        let mut b = sample();
        b.ret(Some(Value::ConstInt(0, IrType::I32)));
        b.bin(
            BinOp::Add,
            Value::ConstInt(1, IrType::I32),
            Value::ConstInt(2, IrType::I32),
        );
        let func = b.finish();
        assert_eq!(func.blocks[0].instrs.len(), 1);
    }

    #[test]
    fn test_allocas_float_to_entry_top() {
        let mut b = sample();
        let body = b.new_block("body");
        b.br(body);
        b.switch_to(body);
        let slot = b.alloca(IrType::I32, "x");
        b.store(slot, Value::ConstInt(1, IrType::I32));
        b.ret(Some(Value::ConstInt(0, IrType::I32)));
        let func = b.finish();
        assert!(matches!(func.blocks[0].instrs[0], Instr::Alloca { .. }));
    }

    #[test]
    fn test_optimize_sweeps_unreachable_blocks() {
        let mut b = sample();
        let dead = b.new_block("dead");
        let live = b.new_block("live");
        b.br(live);
        b.switch_to(dead);
        b.ret(None);
        b.switch_to(live);
        b.ret(Some(Value::ConstInt(0, IrType::I32)));
        let mut func = b.finish();
        optimize(&mut func);
        assert_eq!(func.blocks.len(), 2);
        assert!(verify(&func).is_ok());
        // The surviving branch still points at the right block.
        match func.blocks[0].instrs.last() {
            Some(Instr::Br { target }) => assert_eq!(func.blocks[target.0].label, "live2"),
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[test]
    fn test_fold_constants_folds_chain() {
        let mut b = sample();
        let v1 = b.bin(
            BinOp::Add,
            Value::ConstInt(2, IrType::I32),
            Value::ConstInt(3, IrType::I32),
        );
        let v2 = b.bin(BinOp::Mul, v1, Value::ConstInt(4, IrType::I32));
        b.ret(Some(v2));
        let mut func = b.finish();
        fold_constants(&mut func);
        assert_eq!(
            func.blocks[0].instrs,
            vec![Instr::Ret {
                value: Some(Value::ConstInt(20, IrType::I32))
            }]
        );
    }

    #[test]
    fn test_fold_constants_leaves_division() {
        let mut b = sample();
        let v = b.bin(
            BinOp::SDiv,
            Value::ConstInt(1, IrType::I32),
            Value::ConstInt(0, IrType::I32),
        );
        b.ret(Some(v));
        let mut func = b.finish();
        fold_constants(&mut func);
        assert_eq!(func.blocks[0].instrs.len(), 2);
    }

    #[test]
    fn test_display_shape() {
        let mut b = sample();
        let v = b.bin(
            BinOp::Add,
            Value::Param("a".to_string(), IrType::I32),
            Value::ConstInt(1, IrType::I32),
        );
        b.ret(Some(v));
        let text = b.finish().to_string();
        assert!(text.contains("define i32 @f(i32 %a)"));
        assert!(text.contains("%0 = add i32 %a, 1"));
        assert!(text.contains("ret i32 %0"));
    }

    #[test]
    fn test_declaration_prints_one_line() {
        let func = IrFunction {
            name: "g".to_string(),
            params: vec![("x".to_string(), IrType::F64)],
            return_type: IrType::Void,
            blocks: Vec::new(),
        };
        assert_eq!(func.to_string(), "declare void @g(f64 %x)\n");
    }
}
