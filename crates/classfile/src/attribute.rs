//! Attribute records attached to classes, fields, methods and Code bodies.
//!
//! Only `Code` is decoded structurally. Every other attribute is recorded by
//! name and length and its body skipped. Each body is decoded inside a window
//! of exactly its declared length, so the cursor always lands on the next
//! record whatever the body contains.

use tracing::trace;

use crate::constant_pool::ConstantPool;
use crate::error::DecodeError;
use crate::reader::ClassReader;

/// Name of the attribute holding a method's bytecode.
pub const CODE: &str = "Code";

/// One row of a Code attribute's exception table. Stored, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    /// First pc covered by the handler.
    pub start_pc: u16,
    /// First pc past the covered range.
    pub end_pc: u16,
    /// pc the handler starts at.
    pub handler_pc: u16,
    /// Constant pool index of the caught Class, or 0 for "any".
    pub catch_type: u16,
}

/// The decoded body of a `Code` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAttribute {
    /// Operand stack capacity of a frame running this code.
    pub max_stack: u16,
    /// Number of local variable slots, parameters included.
    pub max_locals: u16,
    /// The bytecode itself.
    pub code: Vec<u8>,
    /// Handler ranges in declaration order.
    pub exception_table: Vec<ExceptionTableEntry>,
}

impl CodeAttribute {
    fn decode(reader: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<Self, DecodeError> {
        let max_stack = reader.read_u2()?;
        let max_locals = reader.read_u2()?;
        let code_length = reader.read_u4()? as usize;
        let code = reader.read_bytes(code_length)?.to_vec();

        let table_length = reader.read_u2()?;
        let exception_table = (0..table_length)
            .map(|_| {
                Ok(ExceptionTableEntry {
                    start_pc: reader.read_u2()?,
                    end_pc: reader.read_u2()?,
                    handler_pc: reader.read_u2()?,
                    catch_type: reader.read_u2()?,
                })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;

        // LineNumberTable, StackMapTable and friends: decoded to keep the
        // cursor honest, then dropped.
        read_attributes(reader, pool)?;

        Ok(Self {
            max_stack,
            max_locals,
            code,
            exception_table,
        })
    }
}

/// A decoded attribute record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Code(CodeAttribute),
    /// Any attribute this crate does not decode. Its body was skipped.
    Opaque { name: String, length: u32 },
}

impl Attribute {
    pub fn name(&self) -> &str {
        match self {
            Attribute::Code(_) => CODE,
            Attribute::Opaque { name, .. } => name,
        }
    }

    /// Decode one attribute: `u2` name index, `u4` length, body.
    pub fn decode(reader: &mut ClassReader<'_>, pool: &ConstantPool) -> Result<Self, DecodeError> {
        let name_index = reader.read_u2()?;
        let name = pool.utf8(name_index)?;
        let length = reader.read_u4()?;
        let mut body = reader.sub_reader(length as usize)?;

        match name {
            CODE => {
                let code = CodeAttribute::decode(&mut body, pool)?;
                if !body.is_empty() {
                    return Err(DecodeError::AttributeLengthMismatch {
                        name: name.to_owned(),
                        declared: length,
                        consumed: length as usize - body.remaining(),
                    });
                }
                Ok(Attribute::Code(code))
            }
            _ => {
                trace!(
                    target: "minijvm::classfile",
                    attribute = name,
                    length,
                    "skipping attribute"
                );
                Ok(Attribute::Opaque {
                    name: name.to_owned(),
                    length,
                })
            }
        }
    }
}

/// Decode a `u2` count followed by that many attributes.
pub fn read_attributes(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Attribute>, DecodeError> {
    let count = reader.read_u2()?;
    (0..count).map(|_| Attribute::decode(reader, pool)).collect()
}
