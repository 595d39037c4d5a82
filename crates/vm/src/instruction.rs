//! Decoded instructions and their effects.
//!
//! An [`Instruction`] is built from its opcode, then reads its own inline
//! operands from a [`BytecodeReader`], then executes against a thread.
//! Opcodes that imply a constant or slot (`iconst_2`, `iload_1`) carry it in
//! the variant; opcodes without state are plain unit variants.

use std::fmt;

use crate::bytecode::BytecodeReader;
use crate::error::RuntimeError;
use crate::machine::Thread;
use crate::opcode::Opcode;
use crate::value::Value;

/// One decoded instruction with its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Do nothing.
    Nop,
    /// Push `null`.
    AconstNull,
    /// `iconst_m1` .. `iconst_5`: push the implied constant.
    Iconst(i32),
    /// Push a sign-extended byte operand.
    Bipush(i32),
    /// Push a sign-extended 16-bit operand.
    Sipush(i32),
    /// Push the int in a local slot. Covers `iload` and `iload_0` .. `iload_3`.
    Iload(u16),
    /// Pop an int into a local slot. Covers `istore` and `istore_0` .. `istore_3`.
    Istore(u16),
    /// Discard the top value.
    Pop,
    /// Duplicate the top value.
    Dup,
    /// Pop two ints, push their wrapping sum.
    Iadd,
    /// Pop value2 then value1, push `value1 - value2`, wrapping.
    Isub,
    /// Pop two ints, push their wrapping product.
    Imul,
    /// Pop the active frame.
    Return,
}

impl Instruction {
    /// Build the instruction for an opcode. Operands read from the code
    /// stream start zeroed until [`fetch_operands`](Self::fetch_operands).
    pub fn for_opcode(opcode: Opcode) -> Self {
        match opcode {
            Opcode::Nop => Instruction::Nop,
            Opcode::AconstNull => Instruction::AconstNull,
            Opcode::IconstM1 => Instruction::Iconst(-1),
            Opcode::Iconst0 => Instruction::Iconst(0),
            Opcode::Iconst1 => Instruction::Iconst(1),
            Opcode::Iconst2 => Instruction::Iconst(2),
            Opcode::Iconst3 => Instruction::Iconst(3),
            Opcode::Iconst4 => Instruction::Iconst(4),
            Opcode::Iconst5 => Instruction::Iconst(5),
            Opcode::Bipush => Instruction::Bipush(0),
            Opcode::Sipush => Instruction::Sipush(0),
            Opcode::Iload => Instruction::Iload(0),
            Opcode::Iload0 => Instruction::Iload(0),
            Opcode::Iload1 => Instruction::Iload(1),
            Opcode::Iload2 => Instruction::Iload(2),
            Opcode::Iload3 => Instruction::Iload(3),
            Opcode::Istore => Instruction::Istore(0),
            Opcode::Istore0 => Instruction::Istore(0),
            Opcode::Istore1 => Instruction::Istore(1),
            Opcode::Istore2 => Instruction::Istore(2),
            Opcode::Istore3 => Instruction::Istore(3),
            Opcode::Pop => Instruction::Pop,
            Opcode::Dup => Instruction::Dup,
            Opcode::Iadd => Instruction::Iadd,
            Opcode::Isub => Instruction::Isub,
            Opcode::Imul => Instruction::Imul,
            Opcode::Return => Instruction::Return,
        }
    }

    /// Read inline operands for `opcode`, leaving the reader on the next
    /// opcode.
    pub fn fetch_operands(
        &mut self,
        opcode: Opcode,
        reader: &mut BytecodeReader<'_>,
    ) -> Result<(), RuntimeError> {
        match (opcode, self) {
            (Opcode::Bipush, Instruction::Bipush(value)) => *value = reader.read_i8()? as i32,
            (Opcode::Sipush, Instruction::Sipush(value)) => *value = reader.read_i16()? as i32,
            (Opcode::Iload, Instruction::Iload(index))
            | (Opcode::Istore, Instruction::Istore(index)) => *index = reader.read_u8()? as u16,
            _ => {}
        }
        Ok(())
    }

    /// Apply this instruction's effect to the thread's active frame.
    pub fn execute(&self, thread: &mut Thread<'_>) -> Result<(), RuntimeError> {
        match *self {
            Instruction::Nop => {}
            Instruction::AconstNull => thread.active_frame_mut()?.push(Value::Null)?,
            Instruction::Iconst(v) | Instruction::Bipush(v) | Instruction::Sipush(v) => {
                thread.active_frame_mut()?.push(Value::Int(v))?
            }
            Instruction::Iload(index) => {
                let frame = thread.active_frame_mut()?;
                let value = frame.load_int(index)?;
                frame.push(Value::Int(value))?;
            }
            Instruction::Istore(index) => {
                let frame = thread.active_frame_mut()?;
                let value = frame.pop_int()?;
                frame.store(index, Value::Int(value))?;
            }
            Instruction::Pop => {
                thread.active_frame_mut()?.pop()?;
            }
            Instruction::Dup => {
                let frame = thread.active_frame_mut()?;
                let value = frame.peek()?;
                frame.push(value)?;
            }
            Instruction::Iadd => binary_int(thread, i32::wrapping_add)?,
            Instruction::Isub => binary_int(thread, i32::wrapping_sub)?,
            Instruction::Imul => binary_int(thread, i32::wrapping_mul)?,
            Instruction::Return => {
                thread.pop_frame().ok_or(RuntimeError::NoActiveFrame)?;
            }
        }
        Ok(())
    }
}

/// Pop value2 then value1, push `op(value1, value2)`.
fn binary_int(thread: &mut Thread<'_>, op: fn(i32, i32) -> i32) -> Result<(), RuntimeError> {
    let frame = thread.active_frame_mut()?;
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    frame.push(Value::Int(op(a, b)))
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Nop => f.write_str("nop"),
            Instruction::AconstNull => f.write_str("aconst_null"),
            Instruction::Iconst(v) => write!(f, "iconst {v}"),
            Instruction::Bipush(v) => write!(f, "bipush {v}"),
            Instruction::Sipush(v) => write!(f, "sipush {v}"),
            Instruction::Iload(i) => write!(f, "iload {i}"),
            Instruction::Istore(i) => write!(f, "istore {i}"),
            Instruction::Pop => f.write_str("pop"),
            Instruction::Dup => f.write_str("dup"),
            Instruction::Iadd => f.write_str("iadd"),
            Instruction::Isub => f.write_str("isub"),
            Instruction::Imul => f.write_str("imul"),
            Instruction::Return => f.write_str("return"),
        }
    }
}
