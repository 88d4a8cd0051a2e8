//! Expression lowering.
//!
//! Every expression produces a [`Value`]; variables load from their stack
//! slot, assignment stores and forwards the stored value. Signedness and
//! float-ness pick the instruction here, based on the types the verifier
//! resolved onto the tree.

use super::{FnCodegen, ir_type};
use crate::backend::ir::{BinOp, CastOp, CmpOp, IrType, Value};
use crate::frontend::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::frontend::types::TypeInfo;

impl<'a> FnCodegen<'a> {
    pub(super) fn gen_expr(&mut self, expr: &Expr) -> Value {
        match &expr.kind {
            ExprKind::Bool(b) => Value::ConstInt(i64::from(*b), IrType::I1),
            ExprKind::Int(v) => Value::ConstInt(*v as i64, ir_type(expr.ty)),
            ExprKind::Float(v) => Value::ConstFloat(*v, ir_type(expr.ty)),
            ExprKind::Char(c) => Value::ConstInt(i64::from(u32::from(*c)), IrType::I32),
            ExprKind::Str(id) => {
                let text = self.interner.resolve(*id).to_string();
                Value::ConstStr(self.strings.intern(&text))
            }
            ExprKind::Var(name) => match self.lookup(*name) {
                Some(slot) => self.builder.load(ir_type(slot.ty), slot.id),
                // Unresolved names never get past the verifier.
                None => Value::ConstInt(0, ir_type(expr.ty)),
            },
            ExprKind::Call { callee, args } => {
                let args: Vec<Value> = args.iter().map(|a| self.gen_expr(a)).collect();
                let callee = self.interner.resolve(*callee).to_string();
                self.builder
                    .call(&callee, ir_type(expr.ty), args)
                    .unwrap_or(Value::ConstInt(0, IrType::I32))
            }
            ExprKind::Unary { op, operand } => self.gen_unary(*op, operand),
            ExprKind::Binary { op, lhs, rhs } => self.gen_binary(*op, lhs, rhs, expr.ty),
            ExprKind::Cast { operand, target } => {
                let value = self.gen_expr(operand);
                self.cast_value(value, operand.ty, *target)
            }
        }
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &Expr) -> Value {
        let ty = operand.ty;
        let value = self.gen_expr(operand);
        match op {
            UnaryOp::Plus => value,
            UnaryOp::Neg if ty.is_float() => {
                let zero = Value::ConstFloat(0.0, ir_type(ty));
                self.builder.bin(BinOp::FSub, zero, value)
            }
            UnaryOp::Neg => {
                let zero = Value::ConstInt(0, ir_type(ty));
                self.builder.bin(BinOp::Sub, zero, value)
            }
            UnaryOp::Not => {
                let one = Value::ConstInt(1, IrType::I1);
                self.builder.bin(BinOp::Xor, value, one)
            }
            UnaryOp::BitNot => {
                let ones = Value::ConstInt(-1, ir_type(ty));
                self.builder.bin(BinOp::Xor, value, ones)
            }
        }
    }

    fn gen_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr, result: TypeInfo) -> Value {
        if op == BinaryOp::Assign {
            return self.gen_assignment(lhs, rhs);
        }

        let operand_ty = lhs.ty;
        let lhs_value = self.gen_expr(lhs);
        let rhs_value = self.gen_expr(rhs);

        if op.is_comparison() {
            return self
                .builder
                .cmp(cmp_op(op, operand_ty), lhs_value, rhs_value);
        }
        if op.is_logical() {
            // i1 values, so plain bit ops; both sides are always evaluated.
            let bin = if op == BinaryOp::And { BinOp::And } else { BinOp::Or };
            return self.builder.bin(bin, lhs_value, rhs_value);
        }
        if op.is_bitwise() {
            // Mixed-width operands widen to the result type.
            let lhs_value = self.cast_value(lhs_value, lhs.ty, result);
            let rhs_value = self.cast_value(rhs_value, rhs.ty, result);
            let bin = match op {
                BinaryOp::BitAnd => BinOp::And,
                BinaryOp::BitOr => BinOp::Or,
                _ => BinOp::Xor,
            };
            return self.builder.bin(bin, lhs_value, rhs_value);
        }
        self.builder
            .bin(arith_op(op, operand_ty), lhs_value, rhs_value)
    }

    /// `x = value`: store into the slot and forward the value, which chains
    /// `a = b = 1`.
    fn gen_assignment(&mut self, lhs: &Expr, rhs: &Expr) -> Value {
        let value = self.gen_expr(rhs);
        if let ExprKind::Var(name) = lhs.kind {
            if let Some(slot) = self.lookup(name) {
                self.builder.store(slot.id, value.clone());
            }
        }
        value
    }

    /// Value conversion between source types.
    ///
    /// `bool` targets compare against zero rather than truncate, so any
    /// nonzero source is `true`. Everything else follows signedness and
    /// width: sext/zext/trunc for the integer family (char counts as an
    /// unsigned 32-bit value), the fp conversions for floats.
    pub(super) fn cast_value(&mut self, value: Value, from: TypeInfo, to: TypeInfo) -> Value {
        if from == to {
            return value;
        }

        if to == TypeInfo::Bool {
            return if from.is_float() {
                let zero = Value::ConstFloat(0.0, ir_type(from));
                self.builder.cmp(CmpOp::FOne, value, zero)
            } else {
                let zero = Value::ConstInt(0, ir_type(from));
                self.builder.cmp(CmpOp::Ne, value, zero)
            };
        }
        if from == TypeInfo::Bool {
            return if to.is_float() {
                self.builder.cast(CastOp::UiToFp, value, ir_type(to))
            } else {
                self.builder.cast(CastOp::ZExt, value, ir_type(to))
            };
        }
        if from.is_float() && to.is_float() {
            let op = if to == TypeInfo::F64 {
                CastOp::FpExt
            } else {
                CastOp::FpTrunc
            };
            return self.builder.cast(op, value, ir_type(to));
        }
        if from.is_float() {
            let op = if to.is_signed_integer() {
                CastOp::FpToSi
            } else {
                CastOp::FpToUi
            };
            return self.builder.cast(op, value, ir_type(to));
        }
        if to.is_float() {
            let op = if from.is_signed_integer() {
                CastOp::SiToFp
            } else {
                CastOp::UiToFp
            };
            return self.builder.cast(op, value, ir_type(to));
        }

        // Integer family, char included.
        let from_width = from.bit_width();
        let to_width = to.bit_width();
        if from_width == to_width {
            // Same representation, signedness is a frontend fiction.
            return value;
        }
        if to_width < from_width {
            return self.builder.cast(CastOp::Trunc, value, ir_type(to));
        }
        let op = if from.is_signed_integer() {
            CastOp::SExt
        } else {
            CastOp::ZExt
        };
        self.builder.cast(op, value, ir_type(to))
    }
}

fn arith_op(op: BinaryOp, ty: TypeInfo) -> BinOp {
    if ty.is_float() {
        return match op {
            BinaryOp::Add => BinOp::FAdd,
            BinaryOp::Sub => BinOp::FSub,
            BinaryOp::Mul => BinOp::FMul,
            BinaryOp::Div => BinOp::FDiv,
            _ => BinOp::FRem,
        };
    }
    let signed = ty.is_signed_integer();
    match op {
        BinaryOp::Add => BinOp::Add,
        BinaryOp::Sub => BinOp::Sub,
        BinaryOp::Mul => BinOp::Mul,
        BinaryOp::Div if signed => BinOp::SDiv,
        BinaryOp::Div => BinOp::UDiv,
        BinaryOp::Rem if signed => BinOp::SRem,
        _ => BinOp::URem,
    }
}

fn cmp_op(op: BinaryOp, ty: TypeInfo) -> CmpOp {
    if ty.is_float() {
        return match op {
            BinaryOp::Eq => CmpOp::FOeq,
            BinaryOp::Ne => CmpOp::FOne,
            BinaryOp::Lt => CmpOp::FOlt,
            BinaryOp::Le => CmpOp::FOle,
            BinaryOp::Gt => CmpOp::FOgt,
            _ => CmpOp::FOge,
        };
    }
    // bool and char compare as unsigned integers.
    let signed = ty.is_signed_integer();
    match op {
        BinaryOp::Eq => CmpOp::Eq,
        BinaryOp::Ne => CmpOp::Ne,
        BinaryOp::Lt if signed => CmpOp::Slt,
        BinaryOp::Lt => CmpOp::Ult,
        BinaryOp::Le if signed => CmpOp::Sle,
        BinaryOp::Le => CmpOp::Ule,
        BinaryOp::Gt if signed => CmpOp::Sgt,
        BinaryOp::Gt => CmpOp::Ugt,
        BinaryOp::Ge if signed => CmpOp::Sge,
        _ => CmpOp::Uge,
    }
}
