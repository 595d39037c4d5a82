//! Forward-only big-endian cursor over a class-file buffer.

use crate::error::DecodeError;

/// Sequential reader over an in-memory byte buffer.
///
/// Every successful read advances the cursor by exactly the number of bytes
/// consumed. A failed read leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Absolute offset of `data[0]` in the outermost buffer, so errors raised
    /// inside a sub-reader still report positions in the whole file.
    base: usize,
}

impl<'a> ClassReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    /// Absolute offset of the cursor.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(DecodeError::TruncatedInput {
                offset: self.offset(),
                needed,
                remaining,
            });
        }
        let bytes = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read an unsigned 8-bit value (`u1`).
    pub fn read_u1(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read an unsigned big-endian 16-bit value (`u2`).
    pub fn read_u2(&mut self) -> Result<u16, DecodeError> {
        self.take_array().map(u16::from_be_bytes)
    }

    /// Read an unsigned big-endian 32-bit value (`u4`).
    pub fn read_u4(&mut self) -> Result<u32, DecodeError> {
        self.take_array().map(u32::from_be_bytes)
    }

    /// Read a signed big-endian 32-bit value.
    pub fn read_i4(&mut self) -> Result<i32, DecodeError> {
        self.take_array().map(i32::from_be_bytes)
    }

    /// Read a signed big-endian 64-bit value (two `u4` halves, high first).
    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.take_array().map(i64::from_be_bytes)
    }

    /// Borrow the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.take(len)
    }

    /// Read a `u2` count followed by that many `u2` values.
    pub fn read_u2_table(&mut self) -> Result<Vec<u16>, DecodeError> {
        let count = self.read_u2()? as usize;
        (0..count).map(|_| self.read_u2()).collect()
    }

    /// Split off the next `len` bytes as an independent reader.
    ///
    /// The parent cursor moves past the window immediately, so whatever the
    /// sub-reader does, the parent resumes exactly `len` bytes later.
    pub fn sub_reader(&mut self, len: usize) -> Result<ClassReader<'a>, DecodeError> {
        let base = self.offset();
        let data = self.take(len)?;
        Ok(ClassReader { data, pos: 0, base })
    }
}
