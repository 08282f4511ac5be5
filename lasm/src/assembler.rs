//! The two-pass assembler.
//!
//! Pass 1 walks every line to size storage, define labels and collect
//! `.global`/`.extern`/`.start` bookkeeping; pass 2 re-walks with the same
//! location counter and emits machine words against the finalized symbol
//! table. Both passes run on one instance, guarded by the pass counter,
//! with `lineNum` and `locCtr` reset in between. The listing is populated
//! during pass 2 only.

use std::collections::HashSet;
use std::mem;

use log::debug;
use matches::debug_assert_matches;

use lcpu::Word;
use lexfile::listing::ListingLine;
use lexfile::{Entry, ObjModule};

use crate::error::{Error, SourceError, Warning};
use crate::expr::{Cursor, EvalCtx, Value};
use crate::lexer::{lex_line, Line, Token};
use crate::mnemonics::{lookup, lookup_directive, Directive};
use crate::symtab::SymbolTable;
use crate::Options;

const ADDRESS_SPACE: u32 = 1 << 16;

/// The finished product of one assembler run.
#[derive(Debug)]
pub struct Assembly {
    pub module: ObjModule,
    /// True when `.global` or `.extern` appeared: the output is an object
    /// module rather than a directly runnable executable.
    pub object_mode: bool,
    pub listing: Vec<ListingLine>,
    pub warnings: Vec<Warning>,
}

struct StartRef {
    label: String,
    line: u32,
    text: String,
}

pub struct Assembler {
    file: String,
    stop_on_error: bool,
    pass: u8,
    line_num: u32,
    loc_ctr: u32,
    symbols: SymbolTable,
    externs: HashSet<String>,
    globals: Vec<String>,
    start: Option<StartRef>,
    fixups: Vec<Entry>,
    code: Vec<Word>,
    listing: Vec<ListingLine>,
    errors: Vec<SourceError>,
    pub(crate) warnings: Vec<Warning>,
}

pub fn assemble_source(source: &str, file: &str, options: &Options) -> Result<Assembly, Error> {
    let mut asm = Assembler::new(file, options.stop_on_error);

    asm.run_pass(source, 1)?;
    asm.structural_checks();
    asm.bail_if_stopping()?;

    asm.run_pass(source, 2)?;
    let start_addr = asm.resolve_start();
    asm.bail_if_stopping()?;

    if !asm.errors.is_empty() {
        return Err(Error::Source(asm.errors));
    }
    Ok(asm.finish(start_addr))
}

impl Assembler {
    fn new(file: &str, stop_on_error: bool) -> Assembler {
        Assembler {
            file: file.to_string(),
            stop_on_error,
            pass: 0,
            line_num: 0,
            loc_ctr: 0,
            symbols: SymbolTable::new(),
            externs: HashSet::new(),
            globals: Vec::new(),
            start: None,
            fixups: Vec::new(),
            code: Vec::new(),
            listing: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn run_pass(&mut self, source: &str, pass: u8) -> Result<(), Error> {
        self.pass = pass;
        self.line_num = 0;
        self.loc_ctr = 0;

        for raw in source.lines() {
            self.line_num += 1;
            if let Err(message) = self.process_line(raw) {
                self.record_error(raw, message);
                self.bail_if_stopping()?;
            }
        }
        debug!(
            "pass {} of {} complete: {} words",
            pass, self.file, self.loc_ctr
        );
        Ok(())
    }

    fn record_error(&mut self, raw: &str, message: String) {
        self.errors.push(SourceError {
            file: self.file.clone(),
            line: self.line_num,
            text: raw.to_string(),
            message,
        });
    }

    fn record_file_error(&mut self, message: &str) {
        self.errors.push(SourceError {
            file: self.file.clone(),
            line: 0,
            text: String::new(),
            message: message.to_string(),
        });
    }

    fn bail_if_stopping(&mut self) -> Result<(), Error> {
        if self.stop_on_error && !self.errors.is_empty() {
            Err(Error::Source(mem::replace(&mut self.errors, Vec::new())))
        } else {
            Ok(())
        }
    }

    fn structural_checks(&mut self) {
        if self.loc_ctr == 0 && self.errors.is_empty() {
            self.record_file_error("empty file");
        }
        if self.loc_ctr > ADDRESS_SPACE {
            self.record_file_error("program too big");
        }
    }

    fn process_line(&mut self, raw: &str) -> Result<(), String> {
        let line = lex_line(self.line_num, raw)?;
        let line_loc = self.loc_ctr;
        let words_before = self.code.len();

        let result = self.process_parsed(&line);

        if self.pass == 2 {
            let words = self.code[words_before..].to_vec();
            self.listing.push(ListingLine {
                loc: if words.is_empty() {
                    None
                } else {
                    Some(line_loc as Word)
                },
                words,
                source: Some(raw.to_string()),
            });
        }
        result
    }

    fn process_parsed(&mut self, line: &Line) -> Result<(), String> {
        if let Some(label) = &line.label {
            if self.pass == 1 {
                self.symbols.define(label, self.loc_ctr as Word)?;
            }
        }

        let first = match line.tokens.first() {
            None => return Ok(()),
            Some(Token::Word { text, .. }) => text.clone(),
            Some(_) => return Err("invalid operation".to_string()),
        };
        let mut cursor = Cursor::new(&line.tokens[1..]);

        if first.starts_with('.') {
            self.directive(&first, line, &mut cursor)
        } else {
            let mnemonic =
                lookup(&first).ok_or_else(|| format!("invalid operation: {}", first))?;
            if self.pass == 1 {
                self.loc_ctr += 1;
                if self.loc_ctr > ADDRESS_SPACE {
                    return Err("program too big".to_string());
                }
                Ok(())
            } else {
                let word = self.encode(mnemonic, &mut cursor)?;
                self.emit(word);
                Ok(())
            }
        }
    }

    pub(crate) fn emit(&mut self, word: Word) {
        debug_assert_matches!(self.pass, 2);
        self.code.push(word);
        self.loc_ctr += 1;
    }

    pub(crate) fn eval_value(&self, cursor: &mut Cursor) -> Result<Value, String> {
        let ctx = EvalCtx {
            symbols: &self.symbols,
            externs: &self.externs,
            loc_ctr: self.loc_ctr as Word,
        };
        crate::expr::eval(cursor, &ctx)
    }

    /// Evaluates an operand that must be a plain number.
    pub(crate) fn absolute(&self, cursor: &mut Cursor) -> Result<i32, String> {
        match self.eval_value(cursor)? {
            Value::Absolute(value) => Ok(value),
            _ => Err("bad number".to_string()),
        }
    }

    pub(crate) fn loc(&self) -> Word {
        self.loc_ctr as Word
    }

    pub(crate) fn warn(&mut self, message: String) {
        self.warnings.push(Warning {
            line: self.line_num,
            message,
        });
    }

    pub(crate) fn add_fixup(&mut self, entry: Entry) {
        self.fixups.push(entry);
    }

    fn directive(&mut self, name: &str, line: &Line, cursor: &mut Cursor) -> Result<(), String> {
        let directive =
            lookup_directive(name).ok_or_else(|| format!("invalid directive: {}", name))?;

        match directive {
            Directive::Start => {
                if self.pass == 1 {
                    let label = cursor.ident()?;
                    if self.start.is_some() {
                        return Err("multiple .start directives".to_string());
                    }
                    self.start = Some(StartRef {
                        label,
                        line: self.line_num,
                        text: line.text.clone(),
                    });
                }
            }
            Directive::Global => {
                if self.pass == 1 {
                    let label = cursor.ident()?;
                    self.symbols.bind_provisional(&label, self.loc_ctr as Word);
                    if !self.globals.contains(&label) {
                        self.globals.push(label);
                    }
                }
            }
            Directive::Extern => {
                if self.pass == 1 {
                    let label = cursor.ident()?;
                    // repeated .extern of the same symbol coalesces silently
                    self.externs.insert(label);
                }
            }
            Directive::Blkw => {
                let count = self.absolute(cursor)?;
                if count <= 0 {
                    return Err("block count must be a positive integer".to_string());
                }
                let count = count as u32;
                if self.loc_ctr + count > ADDRESS_SPACE {
                    return Err("program too big".to_string());
                }
                if self.pass == 1 {
                    self.loc_ctr += count;
                } else {
                    for _ in 0..count {
                        self.emit(0);
                    }
                }
            }
            Directive::Word => {
                if self.pass == 1 {
                    self.loc_ctr += 1;
                    if self.loc_ctr > ADDRESS_SPACE {
                        return Err("program too big".to_string());
                    }
                } else {
                    let word = self.encode_word_directive(cursor)?;
                    self.emit(word);
                }
            }
            Directive::Stringz => {
                let content = cursor.string()?;
                let words = content.chars().count() as u32 + 1;
                if self.loc_ctr + words > ADDRESS_SPACE {
                    return Err("program too big".to_string());
                }
                if self.pass == 1 {
                    self.loc_ctr += words;
                } else {
                    for ch in content.chars() {
                        self.emit(ch as u32 as Word);
                    }
                    self.emit(0);
                }
            }
        }
        Ok(())
    }

    /// `.word`/`.fill`: local address references leave an adjustment entry,
    /// external references a full-word fix-up.
    fn encode_word_directive(&mut self, cursor: &mut Cursor) -> Result<Word, String> {
        match self.eval_value(cursor)? {
            Value::Absolute(value) => {
                if value < i32::from(i16::min_value()) || value > i32::from(u16::max_value()) {
                    return Err("number out of range".to_string());
                }
                Ok(value as Word)
            }
            Value::Address(addr) => {
                if addr < 0 || addr > i32::from(u16::max_value()) {
                    return Err("number out of range".to_string());
                }
                self.add_fixup(Entry::Adjust(self.loc()));
                Ok(addr as Word)
            }
            Value::External { label, addend } => {
                if addend < i32::from(i16::min_value()) || addend > i32::from(u16::max_value()) {
                    return Err("number out of range".to_string());
                }
                self.add_fixup(Entry::ExternWord {
                    addr: self.loc(),
                    label,
                });
                Ok(addend as Word)
            }
        }
    }

    fn resolve_start(&mut self) -> Option<Word> {
        let start = self.start.take()?;
        match self.symbols.get(&start.label) {
            Some(addr) => Some(addr),
            None => {
                self.errors.push(SourceError {
                    file: self.file.clone(),
                    line: start.line,
                    text: start.text,
                    message: format!("undefined label: {}", start.label),
                });
                None
            }
        }
    }

    fn finish(mut self, start_addr: Option<Word>) -> Assembly {
        let mut entries = Vec::new();
        if let Some(addr) = start_addr {
            entries.push(Entry::Start(addr));
        }

        let mut rest: Vec<Entry> = self
            .globals
            .iter()
            .map(|label| Entry::Global {
                addr: self
                    .symbols
                    .get(label)
                    .expect("global labels are always bound"),
                label: label.clone(),
            })
            .collect();
        rest.append(&mut self.fixups);
        rest.sort_by_key(Entry::addr);
        entries.extend(rest);

        let object_mode = !self.globals.is_empty() || !self.externs.is_empty();
        debug!(
            "assembled {}: {} words, {} header entries, object_mode={}",
            self.file,
            self.code.len(),
            entries.len(),
            object_mode
        );

        Assembly {
            module: ObjModule::from(entries, self.code),
            object_mode,
            listing: self.listing,
            warnings: self.warnings,
        }
    }
}
