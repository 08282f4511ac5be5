use num::FromPrimitive;

use super::{Machine, RuntimeError, StepResult};
use crate::instructions::{reg_field, register_index, trap_vector_bits, Register, TrapVector};
use crate::{constants, Word};

impl Machine {
    pub(super) fn exec_trap(&mut self) -> Result<StepResult, RuntimeError> {
        let ir = self.ir;
        let vector_bits = trap_vector_bits(ir);
        let vector =
            TrapVector::from_u16(vector_bits).ok_or(RuntimeError::BadTrapVector(vector_bits))?;
        let reg = reg_field(ir);

        match vector {
            TrapVector::Halt => return Ok(StepResult::Halted),
            TrapVector::Nl => self.console.write_str("\n")?,
            TrapVector::Dout => {
                let text = (self.regs[reg] as i16).to_string();
                self.console.write_str(&text)?;
            }
            TrapVector::Udout => {
                let text = self.regs[reg].to_string();
                self.console.write_str(&text)?;
            }
            TrapVector::Hout => {
                let text = format!("{:x}", self.regs[reg]);
                self.console.write_str(&text)?;
            }
            TrapVector::Aout => {
                let ch = (self.regs[reg] & 0xff) as u8;
                self.console.write_str(&(ch as char).to_string())?;
            }
            TrapVector::Sout => self.trap_sout(reg)?,
            TrapVector::Din => self.trap_din(reg)?,
            TrapVector::Hin => self.trap_hin(reg)?,
            TrapVector::Ain => {
                let byte = self
                    .console
                    .read_byte()?
                    .ok_or(RuntimeError::EndOfInput)?;
                self.regs[reg] = Word::from(byte);
            }
            TrapVector::Sin => self.trap_sin(reg)?,
            TrapVector::M => self.trap_memory_dump()?,
            TrapVector::R => self.trap_register_dump()?,
            TrapVector::S => self.trap_stack_dump()?,
            TrapVector::Bp => {} // breakpoint stub
        }
        Ok(StepResult::Running)
    }

    /// Writes the null-terminated string starting at mem[r[sr]].
    fn trap_sout(&mut self, reg: usize) -> Result<(), RuntimeError> {
        let mut addr = self.regs[reg];
        let mut text = String::new();
        for _ in 0..constants::MEMORY_WORDS {
            let word = self.mem[addr as usize];
            if word == 0 {
                break;
            }
            text.push((word & 0xff) as u8 as char);
            addr = addr.wrapping_add(1);
        }
        self.console.write_str(&text)?;
        Ok(())
    }

    fn trap_din(&mut self, reg: usize) -> Result<(), RuntimeError> {
        loop {
            let line = self.console.read_line()?.ok_or(RuntimeError::EndOfInput)?;
            match parse_dec(line.trim()) {
                Some(value) => {
                    self.regs[reg] = value;
                    return Ok(());
                }
                None => self.console.write_str("Invalid dec constant. Re-enter: ")?,
            }
        }
    }

    fn trap_hin(&mut self, reg: usize) -> Result<(), RuntimeError> {
        loop {
            let line = self.console.read_line()?.ok_or(RuntimeError::EndOfInput)?;
            match parse_hex(line.trim()) {
                Some(value) => {
                    self.regs[reg] = value;
                    return Ok(());
                }
                None => self.console.write_str("Invalid hex constant. Re-enter: ")?,
            }
        }
    }

    /// Reads a line and stores it null-terminated at mem[r[sr]].
    fn trap_sin(&mut self, reg: usize) -> Result<(), RuntimeError> {
        let line = self.console.read_line()?.ok_or(RuntimeError::EndOfInput)?;
        let mut addr = self.regs[reg];
        for byte in line.bytes() {
            self.mem[addr as usize] = Word::from(byte);
            addr = addr.wrapping_add(1);
        }
        self.mem[addr as usize] = 0;
        Ok(())
    }

    /// Dumps the loaded image plus every other nonzero word.
    fn trap_memory_dump(&mut self) -> Result<(), RuntimeError> {
        let image = self.load_point as usize..self.load_point as usize + self.code_len;
        let mut text = String::new();
        for addr in 0..constants::MEMORY_WORDS {
            let word = self.mem[addr];
            if word != 0 || image.contains(&addr) {
                text.push_str(&format!("{:04x}: {:04x}\n", addr, word));
            }
        }
        self.console.write_str(&text)?;
        Ok(())
    }

    fn trap_register_dump(&mut self) -> Result<(), RuntimeError> {
        let mut text = format!(
            "pc = {:04x}  ir = {:04x}  NZCV = {}\n",
            self.pc,
            self.ir,
            self.flags.digits()
        );
        for (i, name) in Register::NAMES.iter().enumerate() {
            text.push_str(&format!("{} = {:04x}", name, self.regs[i]));
            text.push_str(if i % 4 == 3 { "\n" } else { "  " });
        }
        self.console.write_str(&text)?;
        Ok(())
    }

    /// Dumps from the stack pointer to the top of memory.
    fn trap_stack_dump(&mut self) -> Result<(), RuntimeError> {
        let sp = self.regs[register_index(Register::Sp)];
        if self.stack_depth() == 0 {
            return Ok(());
        }
        let mut text = String::new();
        for addr in sp..=0xffff {
            text.push_str(&format!("{:04x}: {:04x}\n", addr, self.mem[addr as usize]));
        }
        self.console.write_str(&text)?;
        Ok(())
    }
}

fn parse_dec(text: &str) -> Option<Word> {
    let value: i32 = text.parse().ok()?;
    if value < i32::from(i16::min_value()) || value > i32::from(u16::max_value()) {
        return None;
    }
    Some(value as Word)
}

fn parse_hex(text: &str) -> Option<Word> {
    let digits = if text.starts_with("0x") || text.starts_with("0X") {
        &text[2..]
    } else {
        text
    };
    if digits.is_empty() {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    if value > u32::from(u16::max_value()) {
        return None;
    }
    Some(value as Word)
}
