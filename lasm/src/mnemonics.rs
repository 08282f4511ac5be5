//! The mnemonic namespace: a closed table from source names to operations.
//!
//! Aliases collapse here (`bre`/`brz`, `bral`/`br`, `jsrr`/`blr`,
//! `mov`, `.globl`/`.global`), so the encoder only ever sees canonical
//! operations. Lookup is case-insensitive.

use lcpu::instructions::{CondCode, ExtOpcode, Opcode, TrapVector};
use util::EnumFromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    /// `br`/`bral` and the conditional forms.
    Branch(CondCode),
    /// `add`, `sub`, `and` in register or immediate form.
    Arith(Opcode),
    Cmp,
    Ld,
    St,
    Lea,
    Ldr,
    Str,
    Bl,
    /// `blr`/`jsrr`.
    Blr,
    Jmp,
    Ret,
    Not,
    Mvi,
    /// `mov` picks `mvi` or `mvr` from its second operand.
    Mov,
    Mvr,
    /// `srl`, `sra`, `sll`, `rol`, `ror` with an optional count.
    Shift(ExtOpcode),
    /// `mul`, `div`, `rem`, `or`, `xor`: `dr = dr op sr1`.
    TwoOp(ExtOpcode),
    Push,
    Pop,
    Sext,
    Trap(TrapVector),
}

pub fn lookup(name: &str) -> Option<Mnemonic> {
    let lower = name.to_ascii_lowercase();
    let mnemonic = match lower.as_str() {
        "br" | "bral" => Mnemonic::Branch(CondCode::Always),
        "brz" | "bre" => Mnemonic::Branch(CondCode::Z),
        "brnz" | "brne" => Mnemonic::Branch(CondCode::Nz),
        "brn" => Mnemonic::Branch(CondCode::N),
        "brp" => Mnemonic::Branch(CondCode::P),
        "brlt" => Mnemonic::Branch(CondCode::Lt),
        "brgt" => Mnemonic::Branch(CondCode::Gt),
        "brc" | "brb" => Mnemonic::Branch(CondCode::C),
        "add" => Mnemonic::Arith(Opcode::Add),
        "sub" => Mnemonic::Arith(Opcode::Sub),
        "and" => Mnemonic::Arith(Opcode::And),
        "cmp" => Mnemonic::Cmp,
        "ld" => Mnemonic::Ld,
        "st" => Mnemonic::St,
        "lea" => Mnemonic::Lea,
        "ldr" => Mnemonic::Ldr,
        "str" => Mnemonic::Str,
        "bl" => Mnemonic::Bl,
        "blr" | "jsrr" => Mnemonic::Blr,
        "jmp" => Mnemonic::Jmp,
        "ret" => Mnemonic::Ret,
        "not" => Mnemonic::Not,
        "mvi" => Mnemonic::Mvi,
        "mov" => Mnemonic::Mov,
        "mvr" => Mnemonic::Mvr,
        "srl" => Mnemonic::Shift(ExtOpcode::Srl),
        "sra" => Mnemonic::Shift(ExtOpcode::Sra),
        "sll" => Mnemonic::Shift(ExtOpcode::Sll),
        "rol" => Mnemonic::Shift(ExtOpcode::Rol),
        "ror" => Mnemonic::Shift(ExtOpcode::Ror),
        "mul" => Mnemonic::TwoOp(ExtOpcode::Mul),
        "div" => Mnemonic::TwoOp(ExtOpcode::Div),
        "rem" => Mnemonic::TwoOp(ExtOpcode::Rem),
        "or" => Mnemonic::TwoOp(ExtOpcode::Or),
        "xor" => Mnemonic::TwoOp(ExtOpcode::Xor),
        "push" => Mnemonic::Push,
        "pop" => Mnemonic::Pop,
        "sext" => Mnemonic::Sext,
        other => return TrapVector::from_str(other).ok().map(Mnemonic::Trap),
    };
    Some(mnemonic)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Start,
    Global,
    Extern,
    /// `.blkw`/`.space`/`.zero`.
    Blkw,
    /// `.word`/`.fill`.
    Word,
    /// `.stringz`/`.asciz`/`.string`.
    Stringz,
}

pub fn lookup_directive(name: &str) -> Option<Directive> {
    let lower = name.to_ascii_lowercase();
    Some(match lower.as_str() {
        ".start" => Directive::Start,
        ".global" | ".globl" => Directive::Global,
        ".extern" => Directive::Extern,
        ".blkw" | ".space" | ".zero" => Directive::Blkw,
        ".word" | ".fill" => Directive::Word,
        ".stringz" | ".asciz" | ".string" => Directive::Stringz,
        _ => return None,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn aliases_collapse() {
        assert_eq!(lookup("bre"), lookup("brz"));
        assert_eq!(lookup("bral"), lookup("br"));
        assert_eq!(lookup("jsrr"), lookup("blr"));
        assert_eq!(lookup("brb"), lookup("brc"));
        assert_eq!(lookup_directive(".globl"), lookup_directive(".global"));
        assert_eq!(lookup_directive(".space"), lookup_directive(".blkw"));
        assert_eq!(lookup_directive(".asciz"), lookup_directive(".stringz"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("ADD"), Some(Mnemonic::Arith(Opcode::Add)));
        assert_eq!(lookup("Halt"), Some(Mnemonic::Trap(TrapVector::Halt)));
    }

    #[test]
    fn unknown_names_miss() {
        assert_eq!(lookup("frobnicate"), None);
        assert_eq!(lookup_directive(".orig"), None);
    }
}
