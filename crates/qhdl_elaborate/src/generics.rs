//! Generic expression evaluation and generic-map resolution.
//!
//! Expressions are evaluated against a [`GenericEnv`] holding the resolved
//! generics of the enclosing entity. Integer arithmetic stays integral and
//! is overflow-checked; mixing an integer with a real widens to real.

use std::collections::HashMap;

use qhdl_common::{Ident, Interner};
use qhdl_diagnostics::Diagnostic;
use qhdl_netlist::{GenericBinding, GenericOrigin, GenericType, Value};
use qhdl_parser::ast::{Actual, Association, BinaryOp, Expr, GenericDecl, UnaryOp};
use qhdl_source::Span;

use crate::errors;

/// Generic values visible to an expression, keyed by folded name.
pub type GenericEnv = HashMap<Ident, Value>;

/// Evaluates a generic expression.
pub fn eval(expr: &Expr, env: &GenericEnv, interner: &Interner) -> Result<Value, Diagnostic> {
    match expr {
        Expr::Int { value, .. } => Ok(Value::Integer(*value)),
        Expr::Real { value, .. } => Ok(Value::Real(*value)),
        Expr::Str { value, .. } => Ok(Value::String(value.clone())),
        Expr::Name { name, span } => {
            if let Some(value) = env.get(&name.key) {
                return Ok(value.clone());
            }
            match interner.resolve(name.key) {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(errors::error_unknown_name(
                    "generic",
                    interner.spelling(*name),
                    *span,
                )),
            }
        }
        Expr::Paren { inner, .. } => eval(inner, env, interner),
        Expr::Unary { op, operand, span } => {
            let value = eval(operand, env, interner)?;
            match (op, value) {
                (UnaryOp::Plus, v @ (Value::Integer(_) | Value::Real(_))) => Ok(v),
                (UnaryOp::Neg, Value::Integer(i)) => i
                    .checked_neg()
                    .map(Value::Integer)
                    .ok_or_else(|| errors::error_eval("integer overflow", *span)),
                (UnaryOp::Neg, Value::Real(r)) => Ok(Value::Real(-r)),
                (op, v) => Err(errors::error_eval(
                    &format!("unary `{}` cannot be applied to {}", unary_symbol(*op), v.ty()),
                    *span,
                )),
            }
        }
        Expr::Binary { op, lhs, rhs, span } => {
            let lhs = eval(lhs, env, interner)?;
            let rhs = eval(rhs, env, interner)?;
            binary(*op, lhs, rhs, *span)
        }
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value, span: Span) -> Result<Value, Diagnostic> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                BinaryOp::Div if b == 0 => {
                    return Err(errors::error_eval("division by zero", span));
                }
                BinaryOp::Div => a.checked_div(b),
            };
            result
                .map(Value::Integer)
                .ok_or_else(|| errors::error_eval("integer overflow", span))
        }
        (lhs, rhs) => match (lhs.as_real(), rhs.as_real()) {
            (Some(a), Some(b)) => {
                if op == BinaryOp::Div && b == 0.0 {
                    return Err(errors::error_eval("division by zero", span));
                }
                Ok(Value::Real(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                }))
            }
            _ => Err(errors::error_eval(
                &format!(
                    "`{}` cannot be applied to {} and {}",
                    binary_symbol(op),
                    lhs.ty(),
                    rhs.ty()
                ),
                span,
            )),
        },
    }
}

fn unary_symbol(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Plus => "+",
        UnaryOp::Neg => "-",
    }
}

fn binary_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
    }
}

/// Generic bindings of one instance, ready for the flattened graph.
#[derive(Debug, Default)]
pub struct ResolvedGenerics {
    /// One binding per supported declared generic, in declaration order.
    pub bindings: Vec<GenericBinding>,
    /// Resolved values keyed by folded name; the child's environment.
    pub env: GenericEnv,
    /// Names and declaration spans of generics left unresolved.
    pub unresolved: Vec<(String, Span)>,
}

/// Resolves an instance's generic map against the declared generics.
///
/// Mapped expressions and defaults are both evaluated in `env`, the
/// environment of the instantiating architecture. Problems are pushed to
/// `diags`; a generic whose value cannot be computed is left out of `env`.
/// Generics with neither a value nor a default are returned as unresolved
/// without a diagnostic, so the caller decides where to report them.
pub fn resolve(
    owner: &str,
    decls: &[GenericDecl],
    map: &[Association],
    env: &GenericEnv,
    interner: &Interner,
    diags: &mut Vec<Diagnostic>,
) -> ResolvedGenerics {
    let mut mapped: Vec<Option<&Association>> = vec![None; decls.len()];

    for (position, assoc) in map.iter().enumerate() {
        let index = match assoc.formal {
            Some((formal, span)) => match decls.iter().position(|d| d.name == formal) {
                Some(index) => index,
                None => {
                    diags.push(errors::error_unknown_generic(
                        interner.spelling(formal),
                        owner,
                        span,
                    ));
                    continue;
                }
            },
            None if position < decls.len() => position,
            None => {
                diags.push(errors::error_too_many_generics(owner, decls.len(), assoc.span));
                continue;
            }
        };
        if let Some(prev) = mapped[index] {
            diags.push(errors::error_duplicate_association(
                interner.spelling(decls[index].name),
                assoc.span,
                prev.span,
            ));
            continue;
        }
        mapped[index] = Some(assoc);
    }

    let mut resolved = ResolvedGenerics::default();
    for (decl, assoc) in decls.iter().zip(mapped) {
        let name = interner.spelling(decl.name);
        let Some(ty) = GenericType::from_name(interner.resolve(decl.ty.key)) else {
            diags.push(errors::error_unsupported_generic_type(
                name,
                interner.spelling(decl.ty),
                decl.span,
            ));
            continue;
        };

        let source = match assoc.map(|a| &a.actual) {
            Some(Actual::Expr(expr)) => Some((GenericOrigin::Mapped, expr)),
            Some(Actual::Open) | None => decl.default.as_ref().map(|d| (GenericOrigin::Default, d)),
        };
        let Some((origin, expr)) = source else {
            resolved.unresolved.push((name.to_string(), decl.span));
            resolved.bindings.push(GenericBinding {
                name: name.to_string(),
                ty,
                origin: GenericOrigin::Unresolved,
                value: None,
            });
            continue;
        };

        let value = match eval(expr, env, interner) {
            Ok(value) => value,
            Err(diag) => {
                diags.push(diag);
                continue;
            }
        };
        let found = match &value {
            Value::Integer(i) if ty.integer_floor().is_some() => i.to_string(),
            other => other.ty().to_string(),
        };
        let Some(value) = value.coerce_to(ty) else {
            diags.push(errors::error_generic_type(
                name,
                &ty.to_string(),
                &found,
                expr.span(),
            ));
            continue;
        };
        resolved.env.insert(decl.name.key, value.clone());
        resolved.bindings.push(GenericBinding {
            name: name.to_string(),
            ty,
            origin,
            value: Some(value),
        });
    }
    resolved
}
