//! Text assembler
//!
//! Turns a line-oriented listing into a [`Script`]. The grammar is small:
//!
//! ```text
//! ; comment
//! .symbol int counter = 0 local     ; storage declaration
//! .message startup                  ; export a label as a message
//! startup:                          ; label
//!     load counter
//!     push 1
//!     add
//!     stor counter
//!     ret
//! ```
//!
//! Memory operands take a symbol name or a numeric address, branch operands
//! a label name or a numeric offset, and `call`/`callv` a verb name resolved
//! through a [`VerbResolver`] (or `#n` for a raw id).

use crate::builder::{Label, ProgramBuilder};
use crate::error::AsmError;
use crate::opcode::{Address, Opcode, VerbId};
use crate::script::{ExportTable, Script, Symbol, SymbolTable};
use core_types::{HandleKind, Value, ValueType, Vector};
use std::collections::HashMap;

/// Maps verb names to the ids a host registered them under
pub trait VerbResolver {
    /// Id of the verb called `name`, if registered
    fn resolve_verb(&self, name: &str) -> Option<VerbId>;
}

impl VerbResolver for HashMap<String, VerbId> {
    fn resolve_verb(&self, name: &str) -> Option<VerbId> {
        self.get(name).copied()
    }
}

/// Assemble `source` into a script called `name`.
pub fn assemble(name: &str, source: &str, verbs: &dyn VerbResolver) -> Result<Script, AsmError> {
    let lines: Vec<(usize, &str)> = source
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, strip_comment(text).trim()))
        .filter(|(_, text)| !text.is_empty())
        .collect();

    // Storage first, so instructions may name symbols declared further down.
    let mut symbols = SymbolTable::new();
    for &(line, text) in &lines {
        if let Some(directive) = text.strip_prefix('.') {
            let (keyword, rest) = split_word(directive);
            if keyword == "symbol" {
                declare_symbol(&mut symbols, line, rest)?;
            }
        }
    }

    let mut asm = Assembler {
        builder: ProgramBuilder::new(),
        labels: HashMap::new(),
        referenced: Vec::new(),
        symbols: &symbols,
        verbs,
    };
    let mut messages: Vec<(usize, &str)> = Vec::new();

    for &(line, text) in &lines {
        if let Some(directive) = text.strip_prefix('.') {
            let (keyword, rest) = split_word(directive);
            match keyword {
                "symbol" => {}
                "message" => {
                    let label = rest.trim();
                    if !is_identifier(label) {
                        return Err(AsmError::bad_operand(line, ".message expects a label name"));
                    }
                    messages.push((line, label));
                }
                _ => {
                    return Err(AsmError::UnknownDirective {
                        line,
                        name: format!(".{}", keyword),
                    })
                }
            }
            continue;
        }

        let mut text = text;
        if let Some((label, rest)) = split_label(text) {
            asm.define_label(line, label)?;
            text = rest.trim();
            if text.is_empty() {
                continue;
            }
        }
        asm.instruction(line, text)?;
    }

    for (name, _) in &asm.referenced {
        let label = asm.labels[name.as_str()];
        if asm.builder.position_of(label).is_none() {
            return Err(AsmError::UnresolvedLabel(name.clone()));
        }
    }

    let mut exports = ExportTable::new();
    for (line, label) in messages {
        let offset = asm
            .labels
            .get(label)
            .and_then(|l| asm.builder.position_of(*l))
            .ok_or_else(|| AsmError::UnresolvedLabel(label.to_string()))?;
        exports.insert(label, offset).map_err(|e| match e {
            AsmError::DuplicateMessage(_) => {
                AsmError::bad_operand(line, format!("message '{}' exported twice", label))
            }
            other => other,
        })?;
    }

    let program = asm.builder.finish()?;
    Ok(Script::new(name, program)
        .with_symbols(symbols)
        .with_exports(exports))
}

struct Assembler<'a> {
    builder: ProgramBuilder,
    labels: HashMap<String, Label>,
    referenced: Vec<(String, usize)>,
    symbols: &'a SymbolTable,
    verbs: &'a dyn VerbResolver,
}

impl Assembler<'_> {
    fn label_named(&mut self, name: &str) -> Label {
        if let Some(label) = self.labels.get(name) {
            return *label;
        }
        let label = self.builder.label();
        self.labels.insert(name.to_string(), label);
        label
    }

    fn define_label(&mut self, line: usize, name: &str) -> Result<(), AsmError> {
        let label = self.label_named(name);
        if self.builder.position_of(label).is_some() {
            return Err(AsmError::DuplicateLabel {
                line,
                name: name.to_string(),
            });
        }
        self.builder.place(label)
    }

    fn instruction(&mut self, line: usize, text: &str) -> Result<(), AsmError> {
        let (mnemonic, operand) = split_word(text);
        let operand = operand.trim();
        let mnemonic = mnemonic.to_ascii_lowercase();

        if let Some(op) = Opcode::from_mnemonic(&mnemonic) {
            if !operand.is_empty() {
                return Err(AsmError::bad_operand(
                    line,
                    format!("'{}' takes no operand", mnemonic),
                ));
            }
            self.builder.op(op);
            return Ok(());
        }

        match mnemonic.as_str() {
            "push" => {
                let value = parse_literal(operand).ok_or_else(|| {
                    AsmError::bad_operand(line, format!("invalid literal '{}'", operand))
                })?;
                self.builder.push(value);
            }
            "load" | "loadi" | "stor" | "stori" => {
                let address = self.memory_operand(line, operand)?;
                let op = match mnemonic.as_str() {
                    "load" => Opcode::Load(address),
                    "loadi" => Opcode::LoadI(address),
                    "stor" => Opcode::Stor(address),
                    _ => Opcode::StorI(address),
                };
                self.builder.op(op);
            }
            "jmp" | "jal" | "bt" | "bf" => {
                if let Ok(address) = operand.parse::<Address>() {
                    let op = match mnemonic.as_str() {
                        "jmp" => Opcode::Jmp(address),
                        "jal" => Opcode::Jal(address),
                        "bt" => Opcode::Bt(address),
                        _ => Opcode::Bf(address),
                    };
                    self.builder.op(op);
                    return Ok(());
                }
                if !is_identifier(operand) {
                    return Err(AsmError::bad_operand(
                        line,
                        format!("'{}' expects a label", mnemonic),
                    ));
                }
                let label = self.label_named(operand);
                self.referenced.push((operand.to_string(), line));
                match mnemonic.as_str() {
                    "jmp" => self.builder.jmp(label),
                    "jal" => self.builder.jal(label),
                    "bt" => self.builder.bt(label),
                    _ => self.builder.bf(label),
                };
            }
            "call" | "callv" => {
                let verb = self.verb_operand(line, operand)?;
                if mnemonic == "call" {
                    self.builder.call(verb);
                } else {
                    self.builder.callv(verb);
                }
            }
            _ => {
                return Err(AsmError::UnknownMnemonic {
                    line,
                    mnemonic: mnemonic.to_string(),
                })
            }
        }
        Ok(())
    }

    fn memory_operand(&self, line: usize, operand: &str) -> Result<Address, AsmError> {
        if operand.is_empty() {
            return Err(AsmError::bad_operand(line, "missing memory operand"));
        }
        if let Ok(address) = operand.parse::<Address>() {
            return Ok(address);
        }
        self.symbols
            .get(operand)
            .map(|s| s.address)
            .ok_or_else(|| AsmError::UnknownSymbol {
                line,
                name: operand.to_string(),
            })
    }

    fn verb_operand(&self, line: usize, operand: &str) -> Result<VerbId, AsmError> {
        if let Some(raw) = operand.strip_prefix('#') {
            return raw
                .parse::<i32>()
                .map(VerbId)
                .map_err(|_| AsmError::bad_operand(line, format!("invalid verb id '{}'", operand)));
        }
        if operand.is_empty() {
            return Err(AsmError::bad_operand(line, "missing verb name"));
        }
        self.verbs
            .resolve_verb(operand)
            .ok_or_else(|| AsmError::UnknownVerb {
                line,
                name: operand.to_string(),
            })
    }
}

fn declare_symbol(symbols: &mut SymbolTable, line: usize, rest: &str) -> Result<(), AsmError> {
    let (type_name, rest) = split_word(rest.trim());
    let (name, rest) = split_word(rest.trim());
    if type_name.is_empty() || !is_identifier(name) {
        return Err(AsmError::bad_operand(
            line,
            ".symbol expects '<type> <name> [= literal] [local]'",
        ));
    }
    let value_type: ValueType = type_name.parse().map_err(|_| AsmError::UnknownType {
        line,
        name: type_name.to_string(),
    })?;

    let mut rest = rest.trim();
    let mut local = false;
    if rest == "local" {
        local = true;
        rest = "";
    } else if let Some(head) = rest.strip_suffix("local") {
        if head.ends_with(char::is_whitespace) {
            local = true;
            rest = head.trim_end();
        }
    }

    let mut symbol = Symbol::new(name, value_type, symbols.memory_size());
    if let Some(literal) = rest.strip_prefix('=') {
        let literal = literal.trim();
        let value = parse_literal(literal).ok_or_else(|| {
            AsmError::bad_operand(line, format!("invalid literal '{}'", literal))
        })?;
        symbol = symbol.with_default(value);
    } else if !rest.is_empty() {
        return Err(AsmError::bad_operand(
            line,
            format!("unexpected '{}' after symbol name", rest),
        ));
    }
    if local {
        symbol = symbol.local();
    }
    symbols.insert(symbol)
}

/// Parse a literal as written in assembly text.
///
/// Accepts `void`, `true`/`false`, double-quoted strings with `\"`, `\\`,
/// `\n` and `\t` escapes, vectors as `(x/y/z)`, handles as `kind:id`,
/// integers, and floats (anything with a `.`, an exponent or an `f` suffix).
pub fn parse_literal(text: &str) -> Option<Value> {
    let text = text.trim();
    match text {
        "" => return None,
        "void" => return Some(Value::Void),
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }

    if let Some(body) = text.strip_prefix('"') {
        return parse_string(body).map(Value::String);
    }

    if let Some(body) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        let parts: Vec<f32> = body
            .split(['/', ','])
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;
        return match parts[..] {
            [x, y, z] => Some(Value::Vector(Vector::new(x, y, z))),
            _ => None,
        };
    }

    if let Some((kind, id)) = text.split_once(':') {
        let kind = HandleKind::ALL
            .iter()
            .copied()
            .find(|k| k.keyword() == kind.trim().to_ascii_lowercase())?;
        return id.trim().parse::<i32>().ok().map(|id| Value::Handle(kind, id));
    }

    if let Ok(n) = text.parse::<i32>() {
        return Some(Value::Int(n));
    }
    let float_text = text.strip_suffix('f').unwrap_or(text);
    float_text.parse::<f32>().ok().map(Value::Float)
}

fn parse_string(body: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return chars.as_str().trim().is_empty().then_some(out),
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                _ => return None,
            },
            _ => out.push(c),
        }
    }
    None
}

/// Drop a `;` comment, ignoring semicolons inside string literals.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            ';' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn split_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    }
}

fn split_label(text: &str) -> Option<(&str, &str)> {
    let (head, rest) = text.split_once(':')?;
    is_identifier(head).then_some((head, rest))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
