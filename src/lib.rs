//! Interpreter core for the LCC 16-bit educational ISA.
//!
//! The [`Machine`] owns a flat 65536-word memory, the eight-register file
//! (r0..r7, with r5/r6/r7 doubling as fp/sp/lr) and the N/Z/C/V condition
//! flags. Programs are loaded from [`lexfile::ObjModule`] executables and
//! run as a synchronous fetch/decode/execute loop; all I/O flows through a
//! [`Console`] so runs can be driven from canned buffers.
//!
//! [`instructions`] describes the ISA itself: opcode/field layouts, the
//! decode helpers and the word constructors the assembler and the tests
//! share.

pub mod constants;
pub mod instructions;
mod machine;

pub use crate::machine::{Console, Flags, LoadError, Machine, RuntimeError, StepResult};

/// One 16-bit machine word; also the unit of addressing.
pub type Word = u16;
