//! Field and method records.

use crate::access::AccessFlags;
use crate::attribute::{read_attributes, Attribute, CodeAttribute};
use crate::constant_pool::ConstantPool;
use crate::error::DecodeError;
use crate::reader::ClassReader;

/// Name of the program entry point.
pub const MAIN_METHOD_NAME: &str = "main";

/// Descriptor of the program entry point: one `String[]` argument, no result.
pub const MAIN_METHOD_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

/// A field or method as stored in the class file.
///
/// Names and descriptors stay as constant pool indices; resolve them through
/// a [`Member`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<Attribute>,
}

impl MemberInfo {
    pub(crate) fn decode(
        reader: &mut ClassReader<'_>,
        pool: &ConstantPool,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            access_flags: AccessFlags::from_raw(reader.read_u2()?),
            name_index: reader.read_u2()?,
            descriptor_index: reader.read_u2()?,
            attributes: read_attributes(reader, pool)?,
        })
    }

    /// The Code attribute, if any. Abstract and native methods have none.
    pub fn code(&self) -> Option<&CodeAttribute> {
        self.attributes.iter().find_map(|attr| match attr {
            Attribute::Code(code) => Some(code),
            Attribute::Opaque { .. } => None,
        })
    }
}

/// Decode a `u2` count followed by that many member records.
pub(crate) fn read_members(
    reader: &mut ClassReader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<MemberInfo>, DecodeError> {
    let count = reader.read_u2()?;
    (0..count).map(|_| MemberInfo::decode(reader, pool)).collect()
}

/// A member paired with the constant pool of its declaring class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Member<'a> {
    info: &'a MemberInfo,
    pool: &'a ConstantPool,
}

impl<'a> Member<'a> {
    pub(crate) fn new(info: &'a MemberInfo, pool: &'a ConstantPool) -> Self {
        Self { info, pool }
    }

    pub fn info(&self) -> &'a MemberInfo {
        self.info
    }

    pub fn access_flags(&self) -> AccessFlags {
        self.info.access_flags
    }

    pub fn name(&self) -> Result<&'a str, DecodeError> {
        self.pool.utf8(self.info.name_index)
    }

    pub fn descriptor(&self) -> Result<&'a str, DecodeError> {
        self.pool.utf8(self.info.descriptor_index)
    }

    pub fn attributes(&self) -> &'a [Attribute] {
        &self.info.attributes
    }

    pub fn code(&self) -> Option<&'a CodeAttribute> {
        self.info.code()
    }

    /// True when the name is `main` and the descriptor `([Ljava/lang/String;)V`.
    pub fn is_main(&self) -> Result<bool, DecodeError> {
        self.is(MAIN_METHOD_NAME, MAIN_METHOD_DESCRIPTOR)
    }

    /// True when both name and descriptor resolve to the given text.
    ///
    /// Both indices are resolved before comparing, so a broken descriptor
    /// is reported even when the name differs.
    pub fn is(&self, name: &str, descriptor: &str) -> Result<bool, DecodeError> {
        let (own_name, own_descriptor) = (self.name()?, self.descriptor()?);
        Ok(own_name == name && own_descriptor == descriptor)
    }
}
