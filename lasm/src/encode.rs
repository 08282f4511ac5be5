//! Instruction encoders: one arm per operation of the mnemonic table,
//! with explicit operand arity and immediate-range checks.

use lcpu::instructions::*;
use lcpu::Word;
use lexfile::Entry;
use util::fits_signed;

use crate::assembler::Assembler;
use crate::expr::{Atom, Cursor, Value};
use crate::mnemonics::Mnemonic;
use util::EnumFromStr;

fn check_range(value: i32, bits: u32, signal: &str) -> Result<Word, String> {
    if fits_signed(value, bits) {
        Ok(value as Word)
    } else {
        Err(format!("{} out of range", signal))
    }
}

/// Width of the external fix-up field an instruction can carry.
enum ExternField {
    Bits9,
    Bits11,
}

impl Assembler {
    pub(crate) fn encode(
        &mut self,
        mnemonic: Mnemonic,
        cursor: &mut Cursor,
    ) -> Result<Word, String> {
        match mnemonic {
            Mnemonic::Branch(cond) => {
                let offset = self.pc_relative(cursor, 9, "pcoffset9", None)?;
                Ok(make_branch(cond, offset))
            }
            Mnemonic::Arith(op) => {
                let dr = cursor.register()?;
                let sr1 = cursor.register()?;
                self.arith_second(op, dr, sr1, cursor)
            }
            Mnemonic::Cmp => {
                let sr1 = cursor.register()?;
                self.arith_second(Opcode::Cmp, Register::R0, sr1, cursor)
            }
            Mnemonic::Ld => self.pcrel_instruction(Opcode::Ld, cursor),
            Mnemonic::St => self.pcrel_instruction(Opcode::St, cursor),
            Mnemonic::Lea => self.pcrel_instruction(Opcode::Lea, cursor),
            Mnemonic::Ldr => self.based_instruction(Opcode::Ldr, cursor),
            Mnemonic::Str => self.based_instruction(Opcode::Str, cursor),
            Mnemonic::Bl => {
                let offset =
                    self.pc_relative(cursor, 11, "pcoffset11", Some(ExternField::Bits11))?;
                Ok(make_bl(offset))
            }
            Mnemonic::Blr => {
                let baser = cursor.register()?;
                let offset = self.optional_offset6(cursor)?;
                Ok(make_blr(baser, offset))
            }
            Mnemonic::Jmp => {
                let baser = cursor.register()?;
                let offset = self.optional_offset6(cursor)?;
                Ok(make_jmp(baser, offset))
            }
            Mnemonic::Ret => Ok(make_ret()),
            Mnemonic::Not => {
                let dr = cursor.register()?;
                let sr1 = cursor.register()?;
                Ok(make_not(dr, sr1))
            }
            Mnemonic::Mvi => {
                let dr = cursor.register()?;
                self.mvi_value(dr, cursor)
            }
            Mnemonic::Mov => {
                let dr = cursor.register()?;
                // register second operand means a register move
                if let Some(Atom::Ident(name)) = cursor.peek()? {
                    if Register::from_str(name).is_ok() {
                        let sr1 = cursor.register()?;
                        return Ok(make_ext_reg(ExtOpcode::Mvr, dr, sr1));
                    }
                }
                self.mvi_value(dr, cursor)
            }
            Mnemonic::Mvr => {
                let dr = cursor.register()?;
                let sr1 = cursor.register()?;
                Ok(make_ext_reg(ExtOpcode::Mvr, dr, sr1))
            }
            Mnemonic::Shift(eop) => {
                let dr = cursor.register()?;
                let count = if cursor.at_end()? {
                    1
                } else {
                    let count = self.absolute(cursor)?;
                    if count < 0 || count > 15 {
                        // the hardware masks the count; diagnose but proceed
                        self.warn(format!("shift count {} masked to 4 bits", count));
                    }
                    count & 0xf
                };
                Ok(make_ext(eop, dr, count as Word))
            }
            Mnemonic::TwoOp(eop) => {
                let dr = cursor.register()?;
                let sr1 = cursor.register()?;
                Ok(make_ext_reg(eop, dr, sr1))
            }
            Mnemonic::Push => {
                let sr = cursor.register()?;
                Ok(make_ext(ExtOpcode::Push, sr, 0))
            }
            Mnemonic::Pop => {
                let dr = cursor.register()?;
                Ok(make_ext(ExtOpcode::Pop, dr, 0))
            }
            Mnemonic::Sext => {
                let dr = cursor.register()?;
                let sr1 = cursor.register()?;
                Ok(make_ext_reg(ExtOpcode::Sext, dr, sr1))
            }
            Mnemonic::Trap(vector) => {
                let sr = if cursor.at_end()? {
                    Register::R0
                } else {
                    cursor.register()?
                };
                Ok(make_trap(sr, vector))
            }
        }
    }

    fn arith_second(
        &mut self,
        op: Opcode,
        dr: Register,
        sr1: Register,
        cursor: &mut Cursor,
    ) -> Result<Word, String> {
        if let Some(Atom::Ident(name)) = cursor.peek()? {
            if Register::from_str(name).is_ok() {
                let sr2 = cursor.register()?;
                return Ok(make_arith_reg(op, dr, sr1, sr2));
            }
        }
        let value = self.absolute(cursor)?;
        let imm5 = check_range(value, 5, "imm5")?;
        Ok(make_arith_imm(op, dr, sr1, imm5))
    }

    fn pcrel_instruction(&mut self, op: Opcode, cursor: &mut Cursor) -> Result<Word, String> {
        let reg = cursor.register()?;
        let offset = self.pc_relative(cursor, 9, "pcoffset9", Some(ExternField::Bits9))?;
        Ok(make_pcrel(op, reg, offset))
    }

    fn based_instruction(&mut self, op: Opcode, cursor: &mut Cursor) -> Result<Word, String> {
        let reg = cursor.register()?;
        let baser = cursor.register()?;
        let offset = self.optional_offset6(cursor)?;
        Ok(make_based(op, reg, baser, offset))
    }

    fn optional_offset6(&mut self, cursor: &mut Cursor) -> Result<Word, String> {
        if cursor.at_end()? {
            return Ok(0);
        }
        let value = self.absolute(cursor)?;
        check_range(value, 6, "offset6")
    }

    fn mvi_value(&mut self, dr: Register, cursor: &mut Cursor) -> Result<Word, String> {
        let value = match self.eval_value(cursor)? {
            Value::Absolute(value) | Value::Address(value) => value,
            Value::External { label, .. } => {
                return Err(format!("illegal reference to external: {}", label))
            }
        };
        if !fits_signed(value, 9) {
            return Err("mvi immediate out of range".to_string());
        }
        Ok(make_mvi(dr, value as Word))
    }

    /// Resolves a PC-relative operand: a local address becomes
    /// `target - (locCtr + 1)`, a bare number is taken as the displacement
    /// verbatim, and an external registers a fix-up of the given width.
    fn pc_relative(
        &mut self,
        cursor: &mut Cursor,
        bits: u32,
        signal: &str,
        extern_field: Option<ExternField>,
    ) -> Result<Word, String> {
        match self.eval_value(cursor)? {
            Value::Address(target) => {
                let offset = target - (i32::from(self.loc()) + 1);
                check_range(offset, bits, signal)
            }
            Value::Absolute(value) => check_range(value, bits, signal),
            Value::External { label, addend } => {
                let field = check_range(addend, bits, signal)?;
                let entry = match extern_field {
                    Some(ExternField::Bits9) => Entry::Extern9 {
                        addr: self.loc(),
                        label,
                    },
                    Some(ExternField::Bits11) => Entry::Extern11 {
                        addr: self.loc(),
                        label,
                    },
                    None => {
                        return Err(format!("illegal reference to external: {}", label));
                    }
                };
                self.add_fixup(entry);
                Ok(field)
            }
        }
    }
}
