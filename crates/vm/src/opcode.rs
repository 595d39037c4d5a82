//! Opcode bytes understood by the interpreter.
//!
//! Values follow the JVM instruction set. `Opcode::try_from` hands back any
//! byte not listed here; the interpreter reports it as
//! [`RuntimeError::UnsupportedOpcode`](crate::RuntimeError).

/// Identifies the operation to perform.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Nop = 0x00,
    AconstNull = 0x01,

    // Small integer constants.
    IconstM1 = 0x02,
    Iconst0 = 0x03,
    Iconst1 = 0x04,
    Iconst2 = 0x05,
    Iconst3 = 0x06,
    Iconst4 = 0x07,
    Iconst5 = 0x08,
    /// One signed byte operand.
    Bipush = 0x10,
    /// One signed 16-bit operand.
    Sipush = 0x11,

    // Loads. Generic form takes an unsigned byte index.
    Iload = 0x15,
    Iload0 = 0x1A,
    Iload1 = 0x1B,
    Iload2 = 0x1C,
    Iload3 = 0x1D,

    // Stores. Generic form takes an unsigned byte index.
    Istore = 0x36,
    Istore0 = 0x3B,
    Istore1 = 0x3C,
    Istore2 = 0x3D,
    Istore3 = 0x3E,

    // Stack manipulation.
    Pop = 0x57,
    Dup = 0x59,

    // Integer arithmetic, wrapping.
    Iadd = 0x60,
    Isub = 0x64,
    Imul = 0x68,

    /// Return void from the current method.
    Return = 0xB1,
}

/// All supported opcodes, in byte order.
pub const ALL_OPCODES: [Opcode; 27] = [
    Opcode::Nop,
    Opcode::AconstNull,
    Opcode::IconstM1,
    Opcode::Iconst0,
    Opcode::Iconst1,
    Opcode::Iconst2,
    Opcode::Iconst3,
    Opcode::Iconst4,
    Opcode::Iconst5,
    Opcode::Bipush,
    Opcode::Sipush,
    Opcode::Iload,
    Opcode::Iload0,
    Opcode::Iload1,
    Opcode::Iload2,
    Opcode::Iload3,
    Opcode::Istore,
    Opcode::Istore0,
    Opcode::Istore1,
    Opcode::Istore2,
    Opcode::Istore3,
    Opcode::Pop,
    Opcode::Dup,
    Opcode::Iadd,
    Opcode::Isub,
    Opcode::Imul,
    Opcode::Return,
];

impl TryFrom<u8> for Opcode {
    /// The rejected byte.
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        match byte {
            0x00 => Ok(Opcode::Nop),
            0x01 => Ok(Opcode::AconstNull),
            0x02 => Ok(Opcode::IconstM1),
            0x03 => Ok(Opcode::Iconst0),
            0x04 => Ok(Opcode::Iconst1),
            0x05 => Ok(Opcode::Iconst2),
            0x06 => Ok(Opcode::Iconst3),
            0x07 => Ok(Opcode::Iconst4),
            0x08 => Ok(Opcode::Iconst5),
            0x10 => Ok(Opcode::Bipush),
            0x11 => Ok(Opcode::Sipush),
            0x15 => Ok(Opcode::Iload),
            0x1A => Ok(Opcode::Iload0),
            0x1B => Ok(Opcode::Iload1),
            0x1C => Ok(Opcode::Iload2),
            0x1D => Ok(Opcode::Iload3),
            0x36 => Ok(Opcode::Istore),
            0x3B => Ok(Opcode::Istore0),
            0x3C => Ok(Opcode::Istore1),
            0x3D => Ok(Opcode::Istore2),
            0x3E => Ok(Opcode::Istore3),
            0x57 => Ok(Opcode::Pop),
            0x59 => Ok(Opcode::Dup),
            0x60 => Ok(Opcode::Iadd),
            0x64 => Ok(Opcode::Isub),
            0x68 => Ok(Opcode::Imul),
            0xB1 => Ok(Opcode::Return),
            other => Err(other),
        }
    }
}

impl Opcode {
    /// Lowercase JVM mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::AconstNull => "aconst_null",
            Opcode::IconstM1 => "iconst_m1",
            Opcode::Iconst0 => "iconst_0",
            Opcode::Iconst1 => "iconst_1",
            Opcode::Iconst2 => "iconst_2",
            Opcode::Iconst3 => "iconst_3",
            Opcode::Iconst4 => "iconst_4",
            Opcode::Iconst5 => "iconst_5",
            Opcode::Bipush => "bipush",
            Opcode::Sipush => "sipush",
            Opcode::Iload => "iload",
            Opcode::Iload0 => "iload_0",
            Opcode::Iload1 => "iload_1",
            Opcode::Iload2 => "iload_2",
            Opcode::Iload3 => "iload_3",
            Opcode::Istore => "istore",
            Opcode::Istore0 => "istore_0",
            Opcode::Istore1 => "istore_1",
            Opcode::Istore2 => "istore_2",
            Opcode::Istore3 => "istore_3",
            Opcode::Pop => "pop",
            Opcode::Dup => "dup",
            Opcode::Iadd => "iadd",
            Opcode::Isub => "isub",
            Opcode::Imul => "imul",
            Opcode::Return => "return",
        }
    }
}
