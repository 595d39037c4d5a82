//! Cursor over a method's code array.

use crate::error::RuntimeError;

/// Reads opcodes and inline operands, advancing a pc.
#[derive(Debug, Clone)]
pub struct BytecodeReader<'a> {
    code: &'a [u8],
    pc: usize,
}

impl<'a> BytecodeReader<'a> {
    /// Position a reader over `code` at `pc`.
    pub fn new(code: &'a [u8], pc: usize) -> Self {
        Self { code, pc }
    }

    /// Offset of the next byte to read.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn read_u8(&mut self) -> Result<u8, RuntimeError> {
        let byte = *self
            .code
            .get(self.pc)
            .ok_or(RuntimeError::UnexpectedEndOfCode { pc: self.pc })?;
        self.pc += 1;
        Ok(byte)
    }

    pub fn read_i8(&mut self) -> Result<i8, RuntimeError> {
        self.read_u8().map(|b| b as i8)
    }

    /// Signed high byte, unsigned low byte, big-endian.
    pub fn read_i16(&mut self) -> Result<i16, RuntimeError> {
        let high = self.read_i8()? as i16;
        let low = self.read_u8()? as i16;
        Ok((high << 8) | low)
    }
}
