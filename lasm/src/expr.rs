//! Operand scanning and expression evaluation.
//!
//! Operands were tokenized on whitespace and commas, so expressions such as
//! `data + 2` may span several tokens while `data+2` sits inside one. The
//! [`Cursor`] re-lexes tokens into atoms on demand, which makes the
//! evaluator tolerant of either spacing.

use std::collections::{HashSet, VecDeque};

use lcpu::instructions::Register;
use lcpu::Word;
use util::EnumFromStr;

use crate::lexer::Token;
use crate::symtab::SymbolTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Ident(String),
    Num { value: i32, hex: bool },
    Plus,
    Minus,
    Star,
    Str(String),
}

fn split_word(text: &str) -> Result<Vec<Atom>, String> {
    let mut atoms = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if crate::lexer::is_label_start(ch) {
            let mut ident = String::new();
            while let Some(&ch) = chars.peek() {
                if crate::lexer::is_label_char(ch) {
                    ident.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            atoms.push(Atom::Ident(ident));
        } else if ch.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_ascii_alphanumeric() {
                    digits.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            atoms.push(parse_number(&digits)?);
        } else {
            chars.next();
            match ch {
                '+' => atoms.push(Atom::Plus),
                '-' => atoms.push(Atom::Minus),
                '*' => atoms.push(Atom::Star),
                other => return Err(format!("bad operand character '{}'", other)),
            }
        }
    }
    Ok(atoms)
}

fn parse_number(digits: &str) -> Result<Atom, String> {
    if digits.starts_with("0x") || digits.starts_with("0X") {
        let value = u32::from_str_radix(&digits[2..], 16)
            .map_err(|_| format!("bad number: {}", digits))?;
        if value > u32::from(u16::max_value()) {
            return Err(format!("bad number: {}", digits));
        }
        Ok(Atom::Num {
            value: value as i32,
            hex: true,
        })
    } else {
        let value: i64 = digits
            .parse()
            .map_err(|_| format!("bad number: {}", digits))?;
        if value > i64::from(i32::max_value()) {
            return Err(format!("bad number: {}", digits));
        }
        Ok(Atom::Num {
            value: value as i32,
            hex: false,
        })
    }
}

/// Streams the atoms of a line's operand region.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    pending: VecDeque<Atom>,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Cursor<'a> {
        Cursor {
            tokens,
            pos: 0,
            pending: VecDeque::new(),
        }
    }

    fn refill(&mut self) -> Result<(), String> {
        while self.pending.is_empty() && self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            self.pos += 1;
            match token {
                Token::Word { text, .. } => {
                    for atom in split_word(text)? {
                        self.pending.push_back(atom);
                    }
                }
                Token::Str(content) => self.pending.push_back(Atom::Str(content.clone())),
                Token::Char(value) => self.pending.push_back(Atom::Num {
                    value: i32::from(*value),
                    hex: false,
                }),
            }
        }
        Ok(())
    }

    pub fn peek(&mut self) -> Result<Option<&Atom>, String> {
        self.refill()?;
        Ok(self.pending.front())
    }

    pub fn next(&mut self) -> Result<Option<Atom>, String> {
        self.refill()?;
        Ok(self.pending.pop_front())
    }

    /// True when the operand region still has content; extra operands are
    /// tolerated, so most encoders never ask.
    pub fn at_end(&mut self) -> Result<bool, String> {
        Ok(self.peek()?.is_none())
    }

    pub fn register(&mut self) -> Result<Register, String> {
        match self.next()? {
            None => Err("missing register".to_string()),
            Some(Atom::Ident(name)) => {
                Register::from_str(&name).map_err(|_| format!("bad register: {}", name))
            }
            Some(other) => Err(format!("bad register: {:?}", other)),
        }
    }

    pub fn string(&mut self) -> Result<String, String> {
        match self.next()? {
            None => Err("missing string operand".to_string()),
            Some(Atom::Str(content)) => Ok(content),
            Some(Atom::Num { value, .. }) if value >= 0 && value < 256 => {
                // a single-quoted character works as a one-character string
                Ok(((value as u8) as char).to_string())
            }
            Some(other) => Err(format!("bad string operand: {:?}", other)),
        }
    }

    pub fn ident(&mut self) -> Result<String, String> {
        match self.next()? {
            None => Err("missing label operand".to_string()),
            Some(Atom::Ident(name)) => Ok(name),
            Some(other) => Err(format!("bad label operand: {:?}", other)),
        }
    }
}

/// The value of an evaluated operand expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A plain number or character literal.
    Absolute(i32),
    /// A module-relative address (label or location marker, with offset).
    Address(i32),
    /// A reference to an imported symbol, resolved by the linker.
    External { label: String, addend: i32 },
}

pub struct EvalCtx<'a> {
    pub symbols: &'a SymbolTable,
    pub externs: &'a HashSet<String>,
    pub loc_ctr: Word,
}

pub fn eval(cursor: &mut Cursor, ctx: &EvalCtx) -> Result<Value, String> {
    match cursor.next()? {
        None => Err("missing operand".to_string()),
        Some(Atom::Num { value, .. }) => Ok(Value::Absolute(value)),
        Some(Atom::Plus) => match cursor.next()? {
            Some(Atom::Num { value, .. }) => Ok(Value::Absolute(value)),
            _ => Err("missing number".to_string()),
        },
        Some(Atom::Minus) => match cursor.next()? {
            Some(Atom::Num { hex: true, .. }) => {
                Err("bad number: negative hex is not supported".to_string())
            }
            Some(Atom::Num { value, .. }) => Ok(Value::Absolute(-value)),
            _ => Err("missing number".to_string()),
        },
        Some(Atom::Star) => {
            let offset = trailing_offset(cursor)?;
            Ok(Value::Address(i32::from(ctx.loc_ctr) + offset))
        }
        Some(Atom::Ident(name)) => {
            if let Some(addr) = ctx.symbols.get(&name) {
                let offset = trailing_offset(cursor)?;
                Ok(Value::Address(i32::from(addr) + offset))
            } else if ctx.externs.contains(&name) {
                let addend = trailing_offset(cursor)?;
                Ok(Value::External {
                    label: name,
                    addend,
                })
            } else {
                Err(format!("undefined label: {}", name))
            }
        }
        Some(Atom::Str(_)) => Err("unexpected string operand".to_string()),
    }
}

fn trailing_offset(cursor: &mut Cursor) -> Result<i32, String> {
    let negative = match cursor.peek()? {
        Some(Atom::Plus) => false,
        Some(Atom::Minus) => true,
        _ => return Ok(0),
    };
    cursor.next()?;
    match cursor.next()? {
        Some(Atom::Num { value, .. }) => Ok(if negative { -value } else { value }),
        _ => Err("missing number".to_string()),
    }
}
