//! Declared value types.
//!
//! The script front end declares every symbol with one of these type
//! keywords. Entity handle kinds share the integer payload representation.

use std::fmt;
use std::str::FromStr;

/// Kind of an opaque world-object handle.
///
/// Handles are integer identifiers owned by the host. The kind only keeps
/// comparisons and diagnostics honest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Level sector
    Sector,
    /// Level surface
    Surface,
    /// Placed thing
    Thing,
    /// Cog script instance
    Cog,
    /// Message identifier
    Message,
    /// AI class
    Ai,
    /// Animation keyframe
    Keyframe,
    /// Material
    Material,
    /// 3D model
    Model,
    /// Sound
    Sound,
    /// Thing template
    Template,
    /// Colormap
    Colormap,
}

impl HandleKind {
    /// All handle kinds in encoding order.
    pub const ALL: [HandleKind; 12] = [
        HandleKind::Sector,
        HandleKind::Surface,
        HandleKind::Thing,
        HandleKind::Cog,
        HandleKind::Message,
        HandleKind::Ai,
        HandleKind::Keyframe,
        HandleKind::Material,
        HandleKind::Model,
        HandleKind::Sound,
        HandleKind::Template,
        HandleKind::Colormap,
    ];

    /// Encoding byte for this kind.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Decode a kind from its encoding byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    /// The front end keyword for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            HandleKind::Sector => "sector",
            HandleKind::Surface => "surface",
            HandleKind::Thing => "thing",
            HandleKind::Cog => "cog",
            HandleKind::Message => "message",
            HandleKind::Ai => "ai",
            HandleKind::Keyframe => "keyframe",
            HandleKind::Material => "material",
            HandleKind::Model => "model",
            HandleKind::Sound => "sound",
            HandleKind::Template => "template",
            HandleKind::Colormap => "colormap",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Type of a value or declared symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No value
    Void,
    /// 32-bit signed integer
    Int,
    /// 32-bit float ("flex")
    Float,
    /// Boolean
    Bool,
    /// Text
    String,
    /// Three-component vector
    Vector,
    /// World-object handle
    Handle(HandleKind),
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Void => f.write_str("void"),
            ValueType::Int => f.write_str("int"),
            ValueType::Float => f.write_str("flex"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::String => f.write_str("string"),
            ValueType::Vector => f.write_str("vector"),
            ValueType::Handle(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for ValueType {
    type Err = String;

    /// Parse a front end type keyword, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{HandleKind, ValueType};
    ///
    /// assert_eq!("flex".parse::<ValueType>(), Ok(ValueType::Float));
    /// assert_eq!("Thing".parse::<ValueType>(), Ok(ValueType::Handle(HandleKind::Thing)));
    /// assert!("quaternion".parse::<ValueType>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.to_ascii_lowercase();
        match keyword.as_str() {
            "void" => Ok(ValueType::Void),
            "int" => Ok(ValueType::Int),
            "flex" | "float" => Ok(ValueType::Float),
            "bool" => Ok(ValueType::Bool),
            "string" => Ok(ValueType::String),
            "vector" => Ok(ValueType::Vector),
            _ => HandleKind::ALL
                .iter()
                .find(|kind| kind.keyword() == keyword)
                .map(|kind| ValueType::Handle(*kind))
                .ok_or_else(|| format!("unknown type '{}'", s)),
        }
    }
}
