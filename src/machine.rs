mod console;
mod exec;
mod flags;
mod traps;

pub use self::console::Console;
pub use self::flags::Flags;

use std::fmt;
use std::io;

use log::debug;

use crate::instructions::{register_index, Register};
use crate::{constants, Word};
use lexfile::ObjModule;

/// Why a program stopped executing.
#[derive(Debug)]
pub enum RuntimeError {
    /// Division or remainder by zero.
    DivisionByZero,
    /// The instruction counter hit the liveness cap.
    InstructionLimit,
    /// Unknown extended opcode in the case-10 group.
    BadExtOpcode(Word),
    /// Trap vector outside the trap table.
    BadTrapVector(Word),
    /// An input trap found the input stream exhausted.
    EndOfInput,
    Io(io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::DivisionByZero => f.write_str("Floating point exception"),
            RuntimeError::InstructionLimit => f.write_str("Possible infinite loop"),
            RuntimeError::BadExtOpcode(bits) => {
                write!(f, "illegal extended opcode 0x{:02x}", bits)
            }
            RuntimeError::BadTrapVector(_) => f.write_str("trap vector out of range"),
            RuntimeError::EndOfInput => f.write_str("end of input during input trap"),
            RuntimeError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<io::Error> for RuntimeError {
    fn from(err: io::Error) -> RuntimeError {
        RuntimeError::Io(err)
    }
}

#[derive(Debug)]
pub enum LoadError {
    /// The module still carries E/e/V entries and must be linked first.
    Unlinked,
    /// Code does not fit between the load point and the end of memory.
    TooBig,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Unlinked => {
                f.write_str("module contains unresolved external references; link it first")
            }
            LoadError::TooBig => f.write_str("program too big"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Outcome of a single fetch/decode/execute step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepResult {
    Running,
    Halted,
}

/// The LCC machine: 65536 words of memory, eight registers, NZCV flags.
///
/// Owns its memory, register file and console exclusively for the duration
/// of a run; side effects happen in instruction-issue order.
pub struct Machine {
    mem: Vec<Word>,
    regs: [Word; constants::REGISTER_COUNT],
    flags: Flags,
    pc: Word,
    ir: Word,
    console: Console,
    load_point: Word,
    code_len: usize,
    snapshot: Vec<Word>,
    executed: u64,
    max_stack: u32,
}

impl Machine {
    pub fn new(console: Console) -> Machine {
        Machine {
            mem: vec![0; constants::MEMORY_WORDS],
            regs: [0; constants::REGISTER_COUNT],
            flags: Flags::default(),
            pc: 0,
            ir: 0,
            console,
            load_point: 0,
            code_len: 0,
            snapshot: Vec::new(),
            executed: 0,
            max_stack: 0,
        }
    }

    /// Places a linked module at `load_point` and aims the PC at its entry.
    ///
    /// Registers, flags and statistics are reset; the loaded image is
    /// snapshotted so listings can reprint pre-execution contents.
    pub fn load(&mut self, module: &ObjModule, load_point: Word) -> Result<(), LoadError> {
        if module.has_externals() {
            return Err(LoadError::Unlinked);
        }
        let code = module.code();
        if load_point as usize + code.len() > constants::MEMORY_WORDS {
            return Err(LoadError::TooBig);
        }

        for word in self.mem.iter_mut() {
            *word = 0;
        }
        self.regs = [0; constants::REGISTER_COUNT];
        self.flags.clear();
        self.executed = 0;
        self.max_stack = 0;

        let base = load_point as usize;
        self.mem[base..base + code.len()].copy_from_slice(code);
        self.snapshot = code.to_vec();
        self.load_point = load_point;
        self.code_len = code.len();

        let start = module.start().unwrap_or(0);
        self.pc = load_point.wrapping_add(start);
        debug!(
            "loaded {} words at {:04x}, entry {:04x}",
            code.len(),
            load_point,
            self.pc
        );
        Ok(())
    }

    /// Runs until halt or a runtime error.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        loop {
            if let StepResult::Halted = self.step()? {
                return Ok(());
            }
        }
    }

    /// One fetch/decode/execute tick.
    pub fn step(&mut self) -> Result<StepResult, RuntimeError> {
        if self.executed >= constants::INSTRUCTION_LIMIT {
            return Err(RuntimeError::InstructionLimit);
        }
        self.ir = self.mem[self.pc as usize];
        self.pc = self.pc.wrapping_add(1);
        self.executed += 1;
        let status = self.exec()?;
        self.note_stack_depth();
        Ok(status)
    }

    fn note_stack_depth(&mut self) {
        let depth = self.stack_depth();
        if depth > self.max_stack {
            self.max_stack = depth;
        }
    }

    /// The stack grows downward from the top of memory; depth 0 while the
    /// stack pointer still holds its initial zero.
    pub fn stack_depth(&self) -> u32 {
        let sp = self.regs[register_index(Register::Sp)];
        if sp == 0 {
            0
        } else {
            (constants::MEMORY_WORDS as u32) - u32::from(sp)
        }
    }

    pub fn register(&self, reg: Register) -> Word {
        self.regs[register_index(reg)]
    }

    pub fn set_register(&mut self, reg: Register, value: Word) {
        self.regs[register_index(reg)] = value;
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn pc(&self) -> Word {
        self.pc
    }

    pub fn mem(&self, addr: Word) -> Word {
        self.mem[addr as usize]
    }

    pub fn set_mem(&mut self, addr: Word, value: Word) {
        self.mem[addr as usize] = value;
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn into_console(self) -> Console {
        self.console
    }

    /// Pre-execution image of the loaded code region.
    pub fn initial_image(&self) -> &[Word] {
        &self.snapshot[..]
    }

    pub fn load_point(&self) -> Word {
        self.load_point
    }

    pub fn program_size(&self) -> usize {
        self.code_len
    }

    pub fn instructions_executed(&self) -> u64 {
        self.executed
    }

    pub fn max_stack_depth(&self) -> u32 {
        self.max_stack
    }
}
