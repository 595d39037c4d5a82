//! Operand-stack interpreter for JVM method bytecode.
//!
//! A [`Thread`] owns a call stack of [`Frame`]s. Each frame holds a method's
//! local variables, its bounded operand stack and the pc of the next
//! instruction. [`run`] fetches, decodes and executes instructions until the
//! call stack is empty.
//!
//! # Usage
//!
//! ```
//! use minijvm_classfile::CodeAttribute;
//! use minijvm_vm::{run, Frame, Thread};
//!
//! // iconst_3, bipush -1, iadd, return
//! let code = CodeAttribute {
//!     max_stack: 2,
//!     max_locals: 1,
//!     code: vec![0x06, 0x10, 0xFF, 0x60, 0xB1],
//!     exception_table: vec![],
//! };
//!
//! let mut thread = Thread::new();
//! thread.push_frame(Frame::new(&code)).unwrap();
//! assert_eq!(run(&mut thread).unwrap(), 4);
//! assert!(thread.is_finished());
//! ```

pub mod bytecode;
pub mod error;
pub mod execute;
pub mod frame;
pub mod instruction;
pub mod launcher;
pub mod machine;
pub mod opcode;
pub mod value;

pub use bytecode::BytecodeReader;
pub use error::{RuntimeError, VmError};
pub use execute::{interpret, run, step, Step};
pub use frame::{Frame, LocalVars, OperandStack};
pub use instruction::Instruction;
pub use launcher::{internal_name, launch, ClassProvider, MemoryClassProvider};
pub use machine::{Thread, DEFAULT_MAX_CALL_DEPTH};
pub use opcode::{Opcode, ALL_OPCODES};
pub use value::Value;
