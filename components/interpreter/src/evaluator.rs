//! Opcode semantics shared by both engines
//!
//! Everything here is pure: values in, value out. Memory addressing, calls
//! and signals are the dispatch loop's business.

use core_types::{ErrorKind, Value, VmResult};
use std::cmp::Ordering;

/// Two-operand opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `add`
    Add,
    /// `sub`
    Sub,
    /// `mul`
    Mul,
    /// `div`
    Div,
    /// `mod`
    Mod,
    /// `bor`
    Bor,
    /// `band`
    Band,
    /// `bxor`
    Bxor,
    /// `lor`
    LOr,
    /// `land`
    LAnd,
    /// `eq`
    Eq,
    /// `ne`
    Ne,
    /// `gt`
    Gt,
    /// `ge`
    Ge,
    /// `lt`
    Lt,
    /// `le`
    Le,
}

/// One-operand opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `neg`
    Neg,
    /// `lnot`
    LNot,
}

/// Apply a binary operation; `lhs` was pushed first
pub fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> VmResult<Value> {
    match op {
        BinaryOp::Add => Ok(add(lhs, rhs)),
        BinaryOp::Sub => Ok(subtract(&lhs, &rhs)),
        BinaryOp::Mul => Ok(multiply(&lhs, &rhs)),
        BinaryOp::Div => divide(&lhs, &rhs),
        BinaryOp::Mod => remainder(&lhs, &rhs),
        BinaryOp::Bor => Ok(Value::Int(lhs.as_int() | rhs.as_int())),
        BinaryOp::Band => Ok(Value::Int(lhs.as_int() & rhs.as_int())),
        BinaryOp::Bxor => Ok(Value::Int(lhs.as_int() ^ rhs.as_int())),
        BinaryOp::LOr => Ok(Value::Bool(lhs.is_truthy() || rhs.is_truthy())),
        BinaryOp::LAnd => Ok(Value::Bool(lhs.is_truthy() && rhs.is_truthy())),
        BinaryOp::Eq => Ok(Value::Bool(equal(&lhs, &rhs))),
        BinaryOp::Ne => Ok(Value::Bool(!equal(&lhs, &rhs))),
        BinaryOp::Gt => Ok(Value::Bool(compare(&lhs, &rhs) == Some(Ordering::Greater))),
        BinaryOp::Ge => Ok(Value::Bool(matches!(
            compare(&lhs, &rhs),
            Some(Ordering::Greater | Ordering::Equal)
        ))),
        BinaryOp::Lt => Ok(Value::Bool(compare(&lhs, &rhs) == Some(Ordering::Less))),
        BinaryOp::Le => Ok(Value::Bool(matches!(
            compare(&lhs, &rhs),
            Some(Ordering::Less | Ordering::Equal)
        ))),
    }
}

/// Apply a unary operation
pub fn unary(op: UnaryOp, value: Value) -> Value {
    match op {
        UnaryOp::Neg => negate(value),
        UnaryOp::LNot => Value::Bool(!value.is_truthy()),
    }
}

fn negate(value: Value) -> Value {
    use Value::*;
    match value {
        Int(n) => Int(n.wrapping_neg()),
        Float(n) => Float(-n),
        Vector(v) => Vector(-v),
        other => Int(other.as_int().wrapping_neg()),
    }
}

fn add(lhs: Value, rhs: Value) -> Value {
    use Value::*;
    match (lhs, rhs) {
        (Vector(a), Vector(b)) => Vector(a + b),
        (String(mut a), String(b)) => {
            a.push_str(&b);
            String(a)
        }
        (a, b) => numeric(&a, &b, i32::wrapping_add, |x, y| x + y),
    }
}

fn subtract(lhs: &Value, rhs: &Value) -> Value {
    match (lhs, rhs) {
        (Value::Vector(a), Value::Vector(b)) => Value::Vector(*a - *b),
        (a, b) => numeric(a, b, i32::wrapping_sub, |x, y| x - y),
    }
}

fn multiply(lhs: &Value, rhs: &Value) -> Value {
    match (lhs, rhs) {
        (Value::Vector(_), Value::Vector(_)) => Value::Int(0),
        (Value::Vector(v), s) | (s, Value::Vector(v)) => Value::Vector(*v * s.as_float()),
        (a, b) => numeric(a, b, i32::wrapping_mul, |x, y| x * y),
    }
}

fn divide(lhs: &Value, rhs: &Value) -> VmResult<Value> {
    match (lhs, rhs) {
        (Value::Vector(v), s) if !matches!(s, Value::Vector(_)) => {
            Ok(Value::Vector(*v / s.as_float()))
        }
        (a, b) if a.is_float() || b.is_float() => Ok(Value::Float(a.as_float() / b.as_float())),
        (a, b) => match b.as_int() {
            0 => Err(ErrorKind::DivisionByZero.into()),
            d => Ok(Value::Int(a.as_int().wrapping_div(d))),
        },
    }
}

fn remainder(lhs: &Value, rhs: &Value) -> VmResult<Value> {
    if lhs.is_float() || rhs.is_float() {
        return Ok(Value::Float(lhs.as_float() % rhs.as_float()));
    }
    match rhs.as_int() {
        0 => Err(ErrorKind::DivisionByZero.into()),
        d => Ok(Value::Int(lhs.as_int().wrapping_rem(d))),
    }
}

fn numeric(
    lhs: &Value,
    rhs: &Value,
    int_op: fn(i32, i32) -> i32,
    float_op: fn(f32, f32) -> f32,
) -> Value {
    if lhs.is_float() || rhs.is_float() {
        Value::Float(float_op(lhs.as_float(), rhs.as_float()))
    } else {
        Value::Int(int_op(lhs.as_int(), rhs.as_int()))
    }
}

fn equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Vector(a), Value::Vector(b)) => a == b,
        (Value::Handle(ka, a), Value::Handle(kb, b)) => ka == kb && a == b,
        (a, b) => compare(a, b) == Some(Ordering::Equal),
    }
}

/// Ordering used by the comparison opcodes; `None` only for NaN operands
fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (a, b) if a.is_float() || b.is_float() => a.as_float().partial_cmp(&b.as_float()),
        (a, b) => Some(a.as_int().cmp(&b.as_int())),
    }
}
