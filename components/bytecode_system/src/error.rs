//! Errors raised while building or assembling programs

use thiserror::Error;

/// Failure to produce a program from a builder or from assembly text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AsmError {
    /// A label was referenced but never placed
    #[error("label '{0}' is referenced but never placed")]
    UnresolvedLabel(String),

    /// A label was placed twice
    #[error("line {line}: label '{name}' is already defined")]
    DuplicateLabel {
        /// Source line of the second definition
        line: usize,
        /// Label name
        name: String,
    },

    /// The mnemonic is not part of the instruction set
    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic {
        /// Source line
        line: usize,
        /// Offending text
        mnemonic: String,
    },

    /// An operand is missing, superfluous or malformed
    #[error("line {line}: {message}")]
    BadOperand {
        /// Source line
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// `call`/`callv` named a verb the resolver does not know
    #[error("line {line}: unknown verb '{name}'")]
    UnknownVerb {
        /// Source line
        line: usize,
        /// Verb name
        name: String,
    },

    /// A memory operand named an undeclared symbol
    #[error("line {line}: unknown symbol '{name}'")]
    UnknownSymbol {
        /// Source line
        line: usize,
        /// Symbol name
        name: String,
    },

    /// A `.symbol` directive named an unknown type
    #[error("line {line}: unknown type '{name}'")]
    UnknownType {
        /// Source line
        line: usize,
        /// Type keyword
        name: String,
    },

    /// A symbol name was declared twice
    #[error("symbol '{0}' is already declared")]
    DuplicateSymbol(String),

    /// A message name was exported twice
    #[error("message '{0}' is already exported")]
    DuplicateMessage(String),

    /// An unrecognised directive
    #[error("line {line}: unknown directive '{name}'")]
    UnknownDirective {
        /// Source line
        line: usize,
        /// Directive text including the leading dot
        name: String,
    },

    /// An address does not fit the u32 operand encoding
    #[error("address {0} does not fit in 32 bits")]
    AddressOverflow(usize),
}

impl AsmError {
    /// Shorthand for [`AsmError::BadOperand`]
    pub fn bad_operand(line: usize, message: impl Into<String>) -> Self {
        AsmError::BadOperand {
            line,
            message: message.into(),
        }
    }
}
