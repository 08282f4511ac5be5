use log::trace;
use num::FromPrimitive;

use super::{Machine, RuntimeError, StepResult};
use crate::instructions::*;
use crate::Word;
use util::sign_extend;

impl Machine {
    pub(super) fn exec(&mut self) -> Result<StepResult, RuntimeError> {
        let ir = self.ir;
        // The 4-bit opcode space is fully assigned, so decode cannot fail.
        let opcode = Opcode::from_u16(opcode_bits(ir)).expect("exhaustive opcode space");
        trace!(
            "pc={:04x} ir={:04x} {:?}",
            self.pc.wrapping_sub(1),
            ir,
            opcode
        );

        match opcode {
            Opcode::Br => {
                let cond = CondCode::from_u16(reg_field(ir) as Word).expect("3-bit cond");
                if self.flags.condition(cond) {
                    self.pc = self.pc.wrapping_add(pcoffset9(ir));
                }
            }
            Opcode::Add | Opcode::Sub | Opcode::And | Opcode::Cmp => self.exec_arith(opcode),
            Opcode::Ld => {
                let addr = self.pc.wrapping_add(pcoffset9(ir));
                self.regs[reg_field(ir)] = self.mem[addr as usize];
            }
            Opcode::St => {
                let addr = self.pc.wrapping_add(pcoffset9(ir));
                self.mem[addr as usize] = self.regs[reg_field(ir)];
            }
            Opcode::Bl => {
                let target = if link_mode(ir) {
                    self.pc.wrapping_add(pcoffset11(ir))
                } else {
                    self.regs[sr1_field(ir)].wrapping_add(offset6(ir))
                };
                self.regs[register_index(Register::Lr)] = self.pc;
                self.pc = target;
            }
            Opcode::Ldr => {
                let addr = self.regs[sr1_field(ir)].wrapping_add(offset6(ir));
                self.regs[reg_field(ir)] = self.mem[addr as usize];
            }
            Opcode::Str => {
                let addr = self.regs[sr1_field(ir)].wrapping_add(offset6(ir));
                self.mem[addr as usize] = self.regs[reg_field(ir)];
            }
            Opcode::Not => {
                let result = !self.regs[sr1_field(ir)];
                self.regs[reg_field(ir)] = result;
                self.flags.set_nz(result);
            }
            Opcode::Ext => return self.exec_ext(),
            Opcode::Jmp => {
                self.pc = self.regs[sr1_field(ir)].wrapping_add(offset6(ir));
            }
            Opcode::Mvi => {
                self.regs[reg_field(ir)] = imm9(ir);
            }
            Opcode::Lea => {
                self.regs[reg_field(ir)] = self.pc.wrapping_add(pcoffset9(ir));
            }
            Opcode::Trap => return self.exec_trap(),
        }
        Ok(StepResult::Running)
    }

    fn exec_arith(&mut self, opcode: Opcode) {
        let ir = self.ir;
        let x = self.regs[sr1_field(ir)];
        let y = if imm_mode(ir) {
            imm5(ir)
        } else {
            self.regs[sr2_field(ir)]
        };

        match opcode {
            Opcode::Add => {
                let result = self.flags.add(x, y);
                self.regs[reg_field(ir)] = result;
            }
            Opcode::Sub => {
                let result = self.flags.sub(x, y);
                self.regs[reg_field(ir)] = result;
            }
            Opcode::And => {
                let result = x & y;
                self.regs[reg_field(ir)] = result;
                self.flags.set_nz(result);
            }
            Opcode::Cmp => {
                self.flags.sub(x, y);
            }
            _ => unreachable!(),
        }
    }

    fn exec_ext(&mut self) -> Result<StepResult, RuntimeError> {
        let ir = self.ir;
        let eop_bits = eopcode_bits(ir);
        let eop = ExtOpcode::from_u16(eop_bits).ok_or(RuntimeError::BadExtOpcode(eop_bits))?;
        let reg = reg_field(ir);
        let sp = register_index(Register::Sp);

        match eop {
            ExtOpcode::Push => {
                let new_sp = self.regs[sp].wrapping_sub(1);
                self.regs[sp] = new_sp;
                self.mem[new_sp as usize] = self.regs[reg];
            }
            ExtOpcode::Pop => {
                let old_sp = self.regs[sp];
                self.regs[reg] = self.mem[old_sp as usize];
                self.regs[sp] = old_sp.wrapping_add(1);
            }
            ExtOpcode::Srl | ExtOpcode::Sra | ExtOpcode::Sll | ExtOpcode::Rol | ExtOpcode::Ror => {
                self.exec_shift(eop)
            }
            ExtOpcode::Mul => {
                let result = self.regs[reg].wrapping_mul(self.regs[sr1_field(ir)]);
                self.regs[reg] = result;
                self.flags.set_nz(result);
            }
            ExtOpcode::Div | ExtOpcode::Rem => {
                let dividend = self.regs[reg] as i16;
                let divisor = self.regs[sr1_field(ir)] as i16;
                if divisor == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                let result = if eop == ExtOpcode::Div {
                    dividend.wrapping_div(divisor)
                } else {
                    dividend.wrapping_rem(divisor)
                } as Word;
                self.regs[reg] = result;
                self.flags.set_nz(result);
            }
            ExtOpcode::Or => {
                let result = self.regs[reg] | self.regs[sr1_field(ir)];
                self.regs[reg] = result;
                self.flags.set_nz(result);
            }
            ExtOpcode::Xor => {
                let result = self.regs[reg] ^ self.regs[sr1_field(ir)];
                self.regs[reg] = result;
                self.flags.set_nz(result);
            }
            ExtOpcode::Mvr => {
                self.regs[reg] = self.regs[sr1_field(ir)];
            }
            ExtOpcode::Sext => {
                // Field width comes from the value held in sr1.
                let width = u32::from(self.regs[sr1_field(ir)] & 0xf);
                if width != 0 {
                    self.regs[reg] = sign_extend(self.regs[reg], width);
                }
                self.flags.set_nz(self.regs[reg]);
            }
        }
        Ok(StepResult::Running)
    }

    fn exec_shift(&mut self, eop: ExtOpcode) {
        let ir = self.ir;
        let reg = reg_field(ir);
        let count = shift_count(ir);
        let mut value = self.regs[reg];

        for _ in 0..count {
            match eop {
                ExtOpcode::Srl => {
                    self.flags.c = value & 1 != 0;
                    value >>= 1;
                }
                ExtOpcode::Sra => {
                    self.flags.c = value & 1 != 0;
                    value = ((value as i16) >> 1) as Word;
                }
                ExtOpcode::Sll => {
                    self.flags.c = value & 0x8000 != 0;
                    value <<= 1;
                }
                ExtOpcode::Rol => {
                    let high = value >> 15;
                    self.flags.c = high != 0;
                    value = (value << 1) | high;
                }
                ExtOpcode::Ror => {
                    let low = value & 1;
                    self.flags.c = low != 0;
                    value = (value >> 1) | (low << 15);
                }
                _ => unreachable!(),
            }
        }
        self.regs[reg] = value;
        self.flags.set_nz(value);
    }
}
