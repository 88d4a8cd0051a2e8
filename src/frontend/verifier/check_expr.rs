//! Expression type resolution.
//!
//! Every function here resolves the expression's type in place and returns
//! it. `Invalid` marks a subexpression that already produced a diagnostic;
//! callers pass it through silently instead of reporting again.

use super::Verifier;
use crate::frontend::ast::{BinaryOp, Expr, ExprKind, Span, UnaryOp};
use crate::frontend::intern::StringId;
use crate::frontend::types::TypeInfo;

impl<'a> Verifier<'a> {
    pub(super) fn check_expr(&mut self, expr: &mut Expr) -> TypeInfo {
        let span = expr.span;
        let ty = match &mut expr.kind {
            ExprKind::Bool(_) => TypeInfo::Bool,
            // Untyped literals default to the widest common machine types.
            ExprKind::Int(_) => TypeInfo::I32,
            ExprKind::Float(_) => TypeInfo::F64,
            ExprKind::Str(_) => TypeInfo::Str,
            ExprKind::Char(_) => TypeInfo::Char,
            ExprKind::Var(name) => {
                let name = *name;
                match self.lookup(name) {
                    Some(ty) => ty,
                    None => {
                        self.diags.error(
                            format!("undefined variable '{}'", self.interner.resolve(name)),
                            span,
                        );
                        TypeInfo::Invalid
                    }
                }
            }
            ExprKind::Call { callee, args } => {
                let callee = *callee;
                let mut arg_types = Vec::with_capacity(args.len());
                for arg in args.iter_mut() {
                    arg_types.push((self.check_expr(arg), arg.span));
                }
                self.check_call(callee, &arg_types, span)
            }
            ExprKind::Unary { op, operand } => {
                let op = *op;
                let operand_ty = self.check_expr(operand);
                self.check_unary(op, operand_ty, span)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let op = *op;
                if op == BinaryOp::Assign {
                    self.check_assignment(lhs, rhs)
                } else {
                    let lhs_ty = self.check_expr(lhs);
                    let rhs_ty = self.check_expr(rhs);
                    self.check_binary(op, lhs_ty, rhs_ty, span)
                }
            }
            ExprKind::Cast { operand, target } => {
                let target = *target;
                let source = self.check_expr(operand);
                self.check_cast(source, target, span)
            }
        };
        expr.ty = ty;
        ty
    }

    fn check_call(
        &mut self,
        callee: StringId,
        args: &[(TypeInfo, Span)],
        span: Span,
    ) -> TypeInfo {
        let Some(sig) = self.signature(callee) else {
            self.diags.error(
                format!("undefined function '{}'", self.interner.resolve(callee)),
                span,
            );
            return TypeInfo::Invalid;
        };
        let params = sig.params.clone();
        let return_type = sig.return_type;

        if args.len() != params.len() {
            let plural = if params.len() == 1 { "" } else { "s" };
            self.diags.error(
                format!(
                    "function '{}' expects {} argument{plural}, found {}",
                    self.interner.resolve(callee),
                    params.len(),
                    args.len()
                ),
                span,
            );
            return return_type;
        }
        for (i, (&(arg_ty, arg_span), &param_ty)) in args.iter().zip(&params).enumerate() {
            if arg_ty != TypeInfo::Invalid && arg_ty != param_ty {
                self.diags.error(
                    format!(
                        "argument {} of '{}' must be of type {param_ty}, found {arg_ty}",
                        i + 1,
                        self.interner.resolve(callee)
                    ),
                    arg_span,
                );
            }
        }
        return_type
    }

    fn check_unary(&mut self, op: UnaryOp, operand: TypeInfo, span: Span) -> TypeInfo {
        if operand == TypeInfo::Invalid {
            return TypeInfo::Invalid;
        }
        let ok = match op {
            UnaryOp::Plus | UnaryOp::Neg => operand.is_numeric(),
            UnaryOp::Not => operand == TypeInfo::Bool,
            UnaryOp::BitNot => operand.is_integer(),
        };
        if !ok {
            self.diags.error(
                format!("unary '{}' cannot be applied to {operand}", op.symbol()),
                span,
            );
            return TypeInfo::Invalid;
        }
        operand
    }

    /// `lhs = rhs`: the target must be a plain variable and the value type
    /// must match exactly. The assignment itself evaluates to the assigned
    /// value, which is what allows `a = b = 1`.
    fn check_assignment(&mut self, lhs: &mut Expr, rhs: &mut Expr) -> TypeInfo {
        let rhs_ty = self.check_expr(rhs);
        let ExprKind::Var(_) = lhs.kind else {
            // Still resolve the left side so nested errors surface once.
            self.check_expr(lhs);
            self.diags
                .error("left side of assignment must be a variable", lhs.span);
            return TypeInfo::Invalid;
        };
        let lhs_ty = self.check_expr(lhs);
        if lhs_ty == TypeInfo::Invalid || rhs_ty == TypeInfo::Invalid {
            return TypeInfo::Invalid;
        }
        if lhs_ty != rhs_ty {
            self.diags.error(
                format!("cannot assign a value of type {rhs_ty} to a variable of type {lhs_ty}"),
                rhs.span,
            );
            return TypeInfo::Invalid;
        }
        lhs_ty
    }

    fn check_binary(&mut self, op: BinaryOp, lhs: TypeInfo, rhs: TypeInfo, span: Span) -> TypeInfo {
        if lhs == TypeInfo::Invalid || rhs == TypeInfo::Invalid {
            return TypeInfo::Invalid;
        }

        let mismatch = |v: &mut Self, detail: &str| {
            v.diags.error(
                format!("operator '{}' {detail}, found {lhs} and {rhs}", op.symbol()),
                span,
            );
            TypeInfo::Invalid
        };

        if op.is_arithmetic() {
            if lhs.is_numeric() && lhs == rhs {
                return lhs;
            }
            return mismatch(self, "requires two numeric operands of the same type");
        }
        if op.is_bitwise() {
            // Same signedness, result widens to the larger operand.
            if lhs.is_integer() && rhs.is_integer() && lhs.same_base_category(rhs) {
                return lhs.larger(rhs);
            }
            return mismatch(self, "requires two integer operands of the same signedness");
        }
        if op.is_comparison() {
            if lhs == rhs && (lhs.is_numeric() || lhs == TypeInfo::Bool || lhs == TypeInfo::Char) {
                return TypeInfo::Bool;
            }
            return mismatch(self, "requires two comparable operands of the same type");
        }
        // Logical && / ||.
        if lhs == TypeInfo::Bool && rhs == TypeInfo::Bool {
            return TypeInfo::Bool;
        }
        mismatch(self, "requires two bool operands")
    }

    /// Cast legality: the numeric types, bool, and char convert among each
    /// other, except char and the floats have no defined conversion. `str`
    /// does not cast at all.
    fn check_cast(&mut self, source: TypeInfo, target: TypeInfo, span: Span) -> TypeInfo {
        if source == TypeInfo::Invalid {
            return TypeInfo::Invalid;
        }
        if source == target {
            return target;
        }
        let castable =
            |ty: TypeInfo| ty.is_numeric() || ty == TypeInfo::Bool || ty == TypeInfo::Char;
        let char_float = (source == TypeInfo::Char && target.is_float())
            || (source.is_float() && target == TypeInfo::Char);
        if !castable(source) || !castable(target) || char_float {
            self.diags
                .error(format!("cannot cast {source} to {target}"), span);
            return TypeInfo::Invalid;
        }
        target
    }
}
