//! Literal value encoding
//!
//! `push` carries its value inline as a tag byte followed by a
//! variable-width payload.

use crate::codec::Cursor;
use core_types::{ErrorKind, HandleKind, Value, Vector, VmResult};

const VOID: u8 = 0;
const INT: u8 = 1;
const FLOAT: u8 = 2;
const BOOL: u8 = 3;
const STRING: u8 = 4;
const VECTOR: u8 = 5;
const HANDLE: u8 = 6;

/// Encode a literal value, appending to `out`.
///
/// # Examples
///
/// ```
/// use bytecode_system::value::encode_literal;
/// use core_types::Value;
///
/// let mut bytes = Vec::new();
/// encode_literal(&Value::Int(1), &mut bytes);
/// assert_eq!(bytes, vec![1, 1, 0, 0, 0]);
/// ```
pub fn encode_literal(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Void => out.push(VOID),
        Value::Int(n) => {
            out.push(INT);
            out.extend_from_slice(&n.to_le_bytes());
        }
        Value::Float(n) => {
            out.push(FLOAT);
            out.extend_from_slice(&n.to_le_bytes());
        }
        Value::Bool(b) => {
            out.push(BOOL);
            out.push(u8::from(*b));
        }
        Value::String(s) => {
            out.push(STRING);
            out.extend_from_slice(&(s.len() as u32).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        Value::Vector(v) => {
            out.push(VECTOR);
            out.extend_from_slice(&v.x.to_le_bytes());
            out.extend_from_slice(&v.y.to_le_bytes());
            out.extend_from_slice(&v.z.to_le_bytes());
        }
        Value::Handle(kind, id) => {
            out.push(HANDLE);
            out.push(kind.to_byte());
            out.extend_from_slice(&id.to_le_bytes());
        }
    }
}

/// Size in bytes of the encoded literal.
pub fn encoded_len(value: &Value) -> usize {
    match value {
        Value::Void => 1,
        Value::Int(_) | Value::Float(_) => 5,
        Value::Bool(_) => 2,
        Value::String(s) => 5 + s.len(),
        Value::Vector(_) => 13,
        Value::Handle(_, _) => 6,
    }
}

pub(crate) fn read_literal(cursor: &mut Cursor<'_>) -> VmResult<Value> {
    let at = cursor.position();
    let tag = cursor.read_u8()?;
    let value = match tag {
        VOID => Value::Void,
        INT => Value::Int(cursor.read_i32()?),
        FLOAT => Value::Float(cursor.read_f32()?),
        BOOL => Value::Bool(cursor.read_u8()? != 0),
        STRING => {
            let len = cursor.read_u32()? as usize;
            let bytes = cursor.take(len)?;
            let s = std::str::from_utf8(bytes)
                .map_err(|_| ErrorKind::InvalidString { offset: at })?;
            Value::String(s.to_string())
        }
        VECTOR => {
            let x = cursor.read_f32()?;
            let y = cursor.read_f32()?;
            let z = cursor.read_f32()?;
            Value::Vector(Vector::new(x, y, z))
        }
        HANDLE => {
            let kind_at = cursor.position();
            let kind_byte = cursor.read_u8()?;
            let kind = HandleKind::from_byte(kind_byte).ok_or(ErrorKind::UnknownLiteral {
                tag: kind_byte,
                offset: kind_at,
            })?;
            Value::Handle(kind, cursor.read_i32()?)
        }
        _ => return Err(ErrorKind::UnknownLiteral { tag, offset: at }.into()),
    };
    Ok(value)
}

/// Decode a literal starting at `offset`, returning it and the offset just
/// past it.
pub fn decode_literal(bytes: &[u8], offset: usize) -> VmResult<(Value, usize)> {
    let mut cursor = Cursor::new(bytes, offset);
    let value = read_literal(&mut cursor)?;
    Ok((value, cursor.position()))
}
