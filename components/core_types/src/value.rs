//! Cog value representation.
//!
//! Values are plain data: they are copied on every stack push and memory
//! store, and never alias one another.

use crate::value_type::{HandleKind, ValueType};
use num_traits::Zero;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Three-component single precision vector.
///
/// # Examples
///
/// ```
/// use core_types::Vector;
///
/// let v = Vector::new(1.0, 2.0, 3.0) + Vector::new(1.0, 1.0, 1.0);
/// assert_eq!(v, Vector::new(2.0, 3.0, 4.0));
/// assert_eq!(v.to_string(), "(2/3/4)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector {
    /// Create a vector from components.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f32) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vector {
    type Output = Vector;

    fn div(self, rhs: f32) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl Zero for Vector {
    fn zero() -> Self {
        Vector::default()
    }

    fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}/{}/{})", self.x, self.y, self.z)
    }
}

/// Represents any cog value.
///
/// # Examples
///
/// ```
/// use core_types::{HandleKind, Value, ValueType};
///
/// let void = Value::Void;
/// let number = Value::Int(42);
/// let thing = Value::Handle(HandleKind::Thing, 3);
///
/// assert!(!void.is_truthy());
/// assert!(number.is_truthy());
/// assert_eq!(thing.value_type(), ValueType::Handle(HandleKind::Thing));
/// assert_eq!(thing.as_int(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value; also the initial content of every register
    #[default]
    Void,
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit float ("flex")
    Float(f32),
    /// Boolean
    Bool(bool),
    /// Text
    String(String),
    /// Three-component vector
    Vector(Vector),
    /// Opaque world-object handle
    Handle(HandleKind, i32),
}

impl Value {
    /// Returns whether this value counts as true for branches and logic ops.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{HandleKind, Value, Vector};
    ///
    /// assert!(!Value::Void.is_truthy());
    /// assert!(!Value::Int(0).is_truthy());
    /// assert!(!Value::Float(0.0).is_truthy());
    /// assert!(!Value::String(String::new()).is_truthy());
    /// assert!(!Value::Vector(Vector::default()).is_truthy());
    /// assert!(!Value::Handle(HandleKind::Thing, -1).is_truthy());
    ///
    /// assert!(Value::Int(-3).is_truthy());
    /// assert!(Value::Handle(HandleKind::Thing, 0).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Void => false,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Vector(v) => !v.is_zero(),
            Value::Handle(_, id) => *id >= 0,
        }
    }

    /// Integer coercion used by indexing and bitwise operators.
    ///
    /// Floats truncate toward zero (saturating), handles yield their id,
    /// and non-numeric values yield zero.
    pub fn as_int(&self) -> i32 {
        match self {
            Value::Int(n) => *n,
            Value::Float(n) => *n as i32,
            Value::Bool(b) => i32::from(*b),
            Value::Handle(_, id) => *id,
            Value::Void | Value::String(_) | Value::Vector(_) => 0,
        }
    }

    /// Float coercion used by mixed arithmetic.
    pub fn as_float(&self) -> f32 {
        match self {
            Value::Float(n) => *n,
            other => other.as_int() as f32,
        }
    }

    /// Whether arithmetic on this value is carried out in floating point.
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Void => ValueType::Void,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Vector(_) => ValueType::Vector,
            Value::Handle(kind, _) => ValueType::Handle(*kind),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Value::Vector(v)
    }
}

/// Display used by printing verbs and the disassembler.
///
/// # Examples
///
/// ```
/// use core_types::{HandleKind, Value};
///
/// assert_eq!(Value::Void.to_string(), "void");
/// assert_eq!(Value::Int(-7).to_string(), "-7");
/// assert_eq!(Value::Handle(HandleKind::Sector, 12).to_string(), "sector:12");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Vector(v) => write!(f, "{}", v),
            Value::Handle(kind, id) => write!(f, "{}:{}", kind, id),
        }
    }
}
