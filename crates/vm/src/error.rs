//! Runtime errors for the interpreter, and launcher-level errors.
//!
//! Interpreter errors carry the pc of the offending instruction. None are
//! recoverable: the thread that raised one stops executing.

use minijvm_classfile::DecodeError;
use thiserror::Error;

/// Errors that occur while executing bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Opcode byte with no entry in the dispatch table.
    #[error("unsupported opcode {opcode:#04x} at pc {pc}")]
    UnsupportedOpcode { opcode: u8, pc: usize },

    /// An opcode or operand byte lies past the end of the code array.
    #[error("unexpected end of code at pc {pc}")]
    UnexpectedEndOfCode { pc: usize },

    /// Push onto an operand stack already holding `max_stack` values.
    #[error("operand stack overflow at pc {pc}")]
    StackOverflow { pc: usize },

    /// Pop from an empty operand stack.
    #[error("operand stack underflow at pc {pc}")]
    StackUnderflow { pc: usize },

    /// Local variable index not below `max_locals`.
    #[error("local variable {index} out of range (max_locals {max_locals}) at pc {pc}")]
    LocalIndexOutOfRange {
        index: u16,
        max_locals: u16,
        pc: usize,
    },

    /// A value of the wrong kind was found where `expected` was required.
    #[error("expected {expected} at pc {pc}")]
    TypeMismatch { expected: &'static str, pc: usize },

    /// Pushing another frame would exceed the thread's maximum depth.
    #[error("call stack overflow at depth {depth}")]
    CallStackOverflow { depth: usize },

    /// A frame was requested for a method without a Code attribute.
    #[error("method {method} has no code")]
    MissingCode { method: String },

    /// An instruction ran against a thread with no frames.
    #[error("no active frame")]
    NoActiveFrame,
}

/// Errors surfaced when launching a class by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("class {name} not found")]
    ClassNotFound { name: String },

    #[error("class {class} declares no main method")]
    MainMethodNotFound { class: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
