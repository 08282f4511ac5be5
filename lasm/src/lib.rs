//! Assembler for the [lcpu](../lcpu/index.html) LCC machine.
//!
//! The main entry points are [`assemble_source`](fn.assemble_source.html)
//! and [`assemble_file`](fn.assemble_file.html), which turn assembly text
//! into an [`ObjModule`](../lexfile/struct.ObjModule.html) plus the listing
//! lines and warnings of the run. When the source declares `.global` or
//! `.extern` symbols the result is an object module for the linker;
//! otherwise it is a directly runnable executable.
//!
//! # LCC Assembly Language
//!
//! Each line holds an optional label, an optional instruction or directive,
//! and an optional `;` comment. A label is a token that either carries a
//! trailing `:` or begins in column 0; everything after the mnemonic is an
//! operand list separated by whitespace or commas.
//!
//! ## Operands
//!
//! Kind             | Example           | Notes
//! -----------------|-------------------|---------------------------------
//! register         | `r0`..`r7`, `fp`, `sp`, `lr` | case-insensitive; r5/r6/r7 aliases
//! decimal number   | `42`, `-17`       |
//! hex number       | `0x2a`            | negative hex is not supported
//! character        | `'A'`, `'\n'`     | evaluates to its ASCII code
//! label            | `loop`            |
//! label ± offset   | `data + 2`        | whitespace-tolerant
//! location marker  | `*`, `*+1`, `*-2` | the current location counter
//!
//! ## Instructions
//!
//! Mnemonic | Syntax | Short description
//! ---------|--------|-------------------
//! `br`/`bral` | `br label` | branch always
//! `brz`/`bre` | `brz label` | branch if zero
//! `brnz`/`brne` | `brnz label` | branch if not zero
//! `brn`, `brp` | `brn label` | branch on negative / positive
//! `brlt`, `brgt` | `brlt label` | signed compare branches
//! `brc`/`brb` | `brc label` | branch on carry
//! `add`, `sub`, `and` | `add dr, sr1, sr2` or `add dr, sr1, imm5` |
//! `cmp` | `cmp sr1, sr2` or `cmp sr1, imm5` | flags only
//! `ld`, `st`, `lea` | `ld dr, label` | PC-relative
//! `ldr`, `str` | `ldr dr, baser, offset6` | offset defaults to 0
//! `bl` | `bl label` | call, PC-relative 11-bit
//! `blr`/`jsrr` | `blr baser, offset6` | call through register
//! `jmp` | `jmp baser, offset6` | `ret` is `jmp lr`
//! `not` | `not dr, sr` |
//! `mvi` | `mvi dr, imm9` |
//! `mvr` | `mvr dr, sr` |
//! `mov` | `mov dr, sr` or `mov dr, imm9` | picks `mvr` or `mvi`
//! `srl`, `sra`, `sll`, `rol`, `ror` | `sll dr, count` | count defaults to 1
//! `mul`, `div`, `rem`, `or`, `xor` | `mul dr, sr` | `dr = dr op sr`
//! `push`, `pop` | `push sr` | descending stack through `sp`
//! `sext` | `sext dr, sr` | field width from the value in `sr`
//! traps | `halt`, `nl`, `dout r0`, ... | register defaults to `r0`
//!
//! ## Directives
//!
//! Directive | Effect
//! ----------|-------
//! `.start label` | program entry point
//! `.global name` / `.globl name` | export `name`; forces object mode
//! `.extern name` | import `name`; forces object mode
//! `.blkw n` / `.space n` / `.zero n` | reserve `n` zero words
//! `.word e` / `.fill e` | one word holding `e`
//! `.stringz s` / `.asciz s` / `.string s` | characters of `s` plus a null word
//!
//! Besides `.a` sources, [`assemble_file`](fn.assemble_file.html) accepts
//! `.bin` files (one 16-digit binary word per line) and `.hex` files (one
//! 4-nibble word per line).

mod assembler;
mod binhex;
mod encode;
mod error;
mod expr;
mod lexer;
mod mnemonics;
mod symtab;


use std::ffi::OsStr;
use std::fs;
use std::path::Path;

pub use crate::assembler::{assemble_source, Assembly};
pub use crate::binhex::{assemble_bin, assemble_hex};
pub use crate::error::{Error, SourceError, Warning};
pub use lcpu::Word;

/// Assembly policy knobs.
#[derive(Debug, Clone)]
pub struct Options {
    /// Abort at the first diagnostic (reference behavior). When false, both
    /// passes keep collecting diagnostics but no output is produced.
    pub stop_on_error: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            stop_on_error: true,
        }
    }
}

/// Assembles one input file, dispatching on its extension:
/// `.a` (two-pass assembly), `.bin`, `.hex`; `.ap` and anything else are
/// rejected.
pub fn assemble_file<P: AsRef<Path>>(path: P, options: &Options) -> Result<Assembly, Error> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let extension = path.extension().and_then(OsStr::to_str).unwrap_or("");

    match extension {
        "a" => {
            let source = read_input(path)?;
            assemble_source(&source, &name, options)
        }
        "bin" => {
            let source = read_input(path)?;
            assemble_bin(&source, &name)
        }
        "hex" => {
            let source = read_input(path)?;
            assemble_hex(&source, &name)
        }
        "ap" => Err(Error::ExtendedSource(path.to_path_buf())),
        _ => Err(Error::UnsupportedFileType(path.to_path_buf())),
    }
}

fn read_input(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|err| Error::Io(err, path.to_path_buf()))
}
