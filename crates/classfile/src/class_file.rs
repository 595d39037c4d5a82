//! Whole-class decoding.
//!
//! Layout, in order:
//! ```text
//! u4 magic (0xCAFEBABE)
//! u2 minor_version, u2 major_version
//! constant pool (u2 count, count-1 slots)
//! u2 access_flags, u2 this_class, u2 super_class
//! u2 interfaces_count, interfaces_count * u2
//! u2 fields_count, fields
//! u2 methods_count, methods
//! u2 attributes_count, attributes
//! ```

use tracing::debug;

use crate::access::AccessFlags;
use crate::attribute::{read_attributes, Attribute};
use crate::constant_pool::ConstantPool;
use crate::error::DecodeError;
use crate::member::{
    read_members, Member, MemberInfo, MAIN_METHOD_DESCRIPTOR, MAIN_METHOD_NAME,
};
use crate::reader::ClassReader;

/// The fixed first four bytes of every class file.
pub const MAGIC: u32 = 0xCAFEBABE;

/// A fully decoded class. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    minor_version: u16,
    major_version: u16,
    constant_pool: ConstantPool,
    access_flags: AccessFlags,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<MemberInfo>,
    methods: Vec<MemberInfo>,
    attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Decode a complete class file.
    ///
    /// Either the whole buffer decodes and is consumed, or an error is
    /// returned. Trailing bytes are an error.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ClassReader::new(bytes);
        let class = Self::decode(&mut reader)?;
        if !reader.is_empty() {
            return Err(DecodeError::TrailingBytes {
                offset: reader.offset(),
                remaining: reader.remaining(),
            });
        }
        Ok(class)
    }

    /// Decode one class from the reader's current position.
    pub fn decode(reader: &mut ClassReader<'_>) -> Result<Self, DecodeError> {
        let magic = reader.read_u4()?;
        if magic != MAGIC {
            return Err(DecodeError::BadMagic { found: magic });
        }

        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let constant_pool = ConstantPool::decode(reader)?;
        let access_flags = AccessFlags::from_raw(reader.read_u2()?);
        let this_class = reader.read_u2()?;
        let super_class = reader.read_u2()?;
        let interfaces = reader.read_u2_table()?;
        let fields = read_members(reader, &constant_pool)?;
        let methods = read_members(reader, &constant_pool)?;
        let attributes = read_attributes(reader, &constant_pool)?;

        debug!(
            target: "minijvm::classfile",
            major_version,
            minor_version,
            constants = constant_pool.count(),
            fields = fields.len(),
            methods = methods.len(),
            "decoded class"
        );

        Ok(Self {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    pub fn minor_version(&self) -> u16 {
        self.minor_version
    }

    pub fn major_version(&self) -> u16 {
        self.major_version
    }

    pub fn constant_pool(&self) -> &ConstantPool {
        &self.constant_pool
    }

    pub fn access_flags(&self) -> AccessFlags {
        self.access_flags
    }

    /// Constant pool index of this class's Class entry.
    pub fn this_class(&self) -> u16 {
        self.this_class
    }

    /// Constant pool index of the superclass, 0 for `java/lang/Object`.
    pub fn super_class(&self) -> u16 {
        self.super_class
    }

    /// Constant pool indices of the direct superinterfaces, in order.
    pub fn interfaces(&self) -> &[u16] {
        &self.interfaces
    }

    /// Class-level attributes (`SourceFile`, `InnerClasses`, ...).
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Internal name of this class, e.g. `demo/Main`.
    pub fn this_class_name(&self) -> Result<&str, DecodeError> {
        self.constant_pool.class_name(self.this_class)
    }

    /// Internal name of the superclass; `None` only for `java/lang/Object`.
    pub fn super_class_name(&self) -> Result<Option<&str>, DecodeError> {
        match self.super_class {
            0 => Ok(None),
            index => self.constant_pool.class_name(index).map(Some),
        }
    }

    pub fn interface_names(&self) -> Result<Vec<&str>, DecodeError> {
        self.interfaces
            .iter()
            .map(|&index| self.constant_pool.class_name(index))
            .collect()
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = Member<'_>> + '_ {
        self.fields
            .iter()
            .map(|info| Member::new(info, &self.constant_pool))
    }

    pub fn methods(&self) -> impl ExactSizeIterator<Item = Member<'_>> + '_ {
        self.methods
            .iter()
            .map(|info| Member::new(info, &self.constant_pool))
    }

    /// First method whose name and descriptor match.
    ///
    /// Every method scanned must resolve its name and descriptor; the first
    /// one that does not aborts the search with its error.
    pub fn find_method(
        &self,
        name: &str,
        descriptor: &str,
    ) -> Result<Option<Member<'_>>, DecodeError> {
        for method in self.methods() {
            if method.is(name, descriptor)? {
                return Ok(Some(method));
            }
        }
        Ok(None)
    }

    /// The `public static void main(String[])` entry point, if declared.
    pub fn main_method(&self) -> Result<Option<Member<'_>>, DecodeError> {
        self.find_method(MAIN_METHOD_NAME, MAIN_METHOD_DESCRIPTOR)
    }
}
