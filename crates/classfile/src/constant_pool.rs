//! Constant pool decoding and index resolution.
//!
//! Entries refer to each other by 1-based index only. Forward references are
//! legal, so nothing is resolved at decode time; the typed accessors resolve
//! on demand and reject index 0, indices past the end, and the unused second
//! slot that follows every Long and Double entry.

use java_string::{JavaStr, JavaString};

use crate::error::DecodeError;
use crate::reader::ClassReader;

/// Constant pool tag byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantTag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    Fieldref = 9,
    Methodref = 10,
    InterfaceMethodref = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    InvokeDynamic = 18,
}

impl ConstantTag {
    /// Returns true for tags whose entry occupies two index slots.
    pub fn is_wide(self) -> bool {
        matches!(self, ConstantTag::Long | ConstantTag::Double)
    }
}

impl TryFrom<u8> for ConstantTag {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        match byte {
            1 => Ok(ConstantTag::Utf8),
            3 => Ok(ConstantTag::Integer),
            4 => Ok(ConstantTag::Float),
            5 => Ok(ConstantTag::Long),
            6 => Ok(ConstantTag::Double),
            7 => Ok(ConstantTag::Class),
            8 => Ok(ConstantTag::String),
            9 => Ok(ConstantTag::Fieldref),
            10 => Ok(ConstantTag::Methodref),
            11 => Ok(ConstantTag::InterfaceMethodref),
            12 => Ok(ConstantTag::NameAndType),
            15 => Ok(ConstantTag::MethodHandle),
            16 => Ok(ConstantTag::MethodType),
            18 => Ok(ConstantTag::InvokeDynamic),
            other => Err(other),
        }
    }
}

/// A single decoded constant pool entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantEntry {
    /// Modified UTF-8 text, kept lossless so unpaired surrogates survive.
    Utf8(JavaString),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class {
        name_index: u16,
    },
    String {
        string_index: u16,
    },
    Fieldref {
        class_index: u16,
        name_and_type_index: u16,
    },
    Methodref {
        class_index: u16,
        name_and_type_index: u16,
    },
    InterfaceMethodref {
        class_index: u16,
        name_and_type_index: u16,
    },
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    /// Decoded but never resolved by this crate.
    MethodHandle {
        reference_kind: u8,
        reference_index: u16,
    },
    /// Decoded but never resolved by this crate.
    MethodType {
        descriptor_index: u16,
    },
    /// Decoded but never resolved by this crate.
    InvokeDynamic {
        bootstrap_method_attr_index: u16,
        name_and_type_index: u16,
    },
}

impl ConstantEntry {
    /// The tag this entry was decoded from.
    pub fn tag(&self) -> ConstantTag {
        match self {
            ConstantEntry::Utf8(_) => ConstantTag::Utf8,
            ConstantEntry::Integer(_) => ConstantTag::Integer,
            ConstantEntry::Float(_) => ConstantTag::Float,
            ConstantEntry::Long(_) => ConstantTag::Long,
            ConstantEntry::Double(_) => ConstantTag::Double,
            ConstantEntry::Class { .. } => ConstantTag::Class,
            ConstantEntry::String { .. } => ConstantTag::String,
            ConstantEntry::Fieldref { .. } => ConstantTag::Fieldref,
            ConstantEntry::Methodref { .. } => ConstantTag::Methodref,
            ConstantEntry::InterfaceMethodref { .. } => ConstantTag::InterfaceMethodref,
            ConstantEntry::NameAndType { .. } => ConstantTag::NameAndType,
            ConstantEntry::MethodHandle { .. } => ConstantTag::MethodHandle,
            ConstantEntry::MethodType { .. } => ConstantTag::MethodType,
            ConstantEntry::InvokeDynamic { .. } => ConstantTag::InvokeDynamic,
        }
    }

    /// Human-readable kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self.tag() {
            ConstantTag::Utf8 => "Utf8",
            ConstantTag::Integer => "Integer",
            ConstantTag::Float => "Float",
            ConstantTag::Long => "Long",
            ConstantTag::Double => "Double",
            ConstantTag::Class => "Class",
            ConstantTag::String => "String",
            ConstantTag::Fieldref => "Fieldref",
            ConstantTag::Methodref => "Methodref",
            ConstantTag::InterfaceMethodref => "InterfaceMethodref",
            ConstantTag::NameAndType => "NameAndType",
            ConstantTag::MethodHandle => "MethodHandle",
            ConstantTag::MethodType => "MethodType",
            ConstantTag::InvokeDynamic => "InvokeDynamic",
        }
    }

    fn decode(reader: &mut ClassReader<'_>) -> Result<Self, DecodeError> {
        let offset = reader.offset();
        let byte = reader.read_u1()?;
        let tag = ConstantTag::try_from(byte)
            .map_err(|tag| DecodeError::UnsupportedConstantTag { tag, offset })?;

        let entry = match tag {
            ConstantTag::Utf8 => {
                let len = reader.read_u2()? as usize;
                let start = reader.offset();
                let bytes = reader.read_bytes(len)?;
                let text = JavaStr::from_modified_utf8(bytes)
                    .map_err(|_| DecodeError::MalformedUtf8 { offset: start })?;
                ConstantEntry::Utf8(text.into_owned())
            }
            ConstantTag::Integer => ConstantEntry::Integer(reader.read_i4()?),
            ConstantTag::Float => ConstantEntry::Float(f32::from_bits(reader.read_u4()?)),
            ConstantTag::Long => ConstantEntry::Long(reader.read_i64()?),
            ConstantTag::Double => {
                ConstantEntry::Double(f64::from_bits(reader.read_i64()? as u64))
            }
            ConstantTag::Class => ConstantEntry::Class {
                name_index: reader.read_u2()?,
            },
            ConstantTag::String => ConstantEntry::String {
                string_index: reader.read_u2()?,
            },
            ConstantTag::Fieldref => ConstantEntry::Fieldref {
                class_index: reader.read_u2()?,
                name_and_type_index: reader.read_u2()?,
            },
            ConstantTag::Methodref => ConstantEntry::Methodref {
                class_index: reader.read_u2()?,
                name_and_type_index: reader.read_u2()?,
            },
            ConstantTag::InterfaceMethodref => ConstantEntry::InterfaceMethodref {
                class_index: reader.read_u2()?,
                name_and_type_index: reader.read_u2()?,
            },
            ConstantTag::NameAndType => ConstantEntry::NameAndType {
                name_index: reader.read_u2()?,
                descriptor_index: reader.read_u2()?,
            },
            ConstantTag::MethodHandle => ConstantEntry::MethodHandle {
                reference_kind: reader.read_u1()?,
                reference_index: reader.read_u2()?,
            },
            ConstantTag::MethodType => ConstantEntry::MethodType {
                descriptor_index: reader.read_u2()?,
            },
            ConstantTag::InvokeDynamic => ConstantEntry::InvokeDynamic {
                bootstrap_method_attr_index: reader.read_u2()?,
                name_and_type_index: reader.read_u2()?,
            },
        };
        Ok(entry)
    }
}

/// A field or method reference with every index resolved to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef<'a> {
    pub class_name: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,
}

/// The decoded constant pool of one class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantPool {
    /// `constant_pool_count` as read from the class file.
    count: u16,
    /// Slot 0 and the second slot of every Long/Double stay `None`.
    entries: Vec<Option<ConstantEntry>>,
}

impl ConstantPool {
    /// Decode a `u2` count followed by `count - 1` slots of entries.
    pub fn decode(reader: &mut ClassReader<'_>) -> Result<Self, DecodeError> {
        let declared = reader.read_u2()?;
        let count = declared as usize;
        let mut entries = vec![None; count.max(1)];

        let mut index = 1;
        while index < count {
            let entry = ConstantEntry::decode(reader)?;
            let step = if entry.tag().is_wide() { 2 } else { 1 };
            entries[index] = Some(entry);
            index += step;
        }

        Ok(Self {
            count: declared,
            entries,
        })
    }

    /// The declared `constant_pool_count`; valid indices are `1..count`.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Look up the entry at `index`.
    pub fn get(&self, index: u16) -> Result<&ConstantEntry, DecodeError> {
        self.entries
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or(DecodeError::InvalidConstantIndex { index })
    }

    /// Iterate over populated slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &ConstantEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i as u16, e)))
    }

    fn wrong_kind(index: u16, expected: &'static str, found: &ConstantEntry) -> DecodeError {
        DecodeError::WrongConstantKind {
            index,
            expected,
            found: found.kind(),
        }
    }

    /// Text of a Utf8 entry exactly as stored, unpaired surrogates included.
    pub fn java_utf8(&self, index: u16) -> Result<&JavaStr, DecodeError> {
        match self.get(index)? {
            ConstantEntry::Utf8(text) => Ok(text),
            other => Err(Self::wrong_kind(index, "Utf8", other)),
        }
    }

    /// Text of a Utf8 entry as a Rust string.
    ///
    /// Names and descriptors are always valid Unicode; a Utf8 entry holding
    /// an unpaired surrogate fails with [`DecodeError::NotUnicode`].
    pub fn utf8(&self, index: u16) -> Result<&str, DecodeError> {
        self.java_utf8(index)?
            .as_str()
            .map_err(|_| DecodeError::NotUnicode { index })
    }

    /// Internal name (`java/lang/Object`) of a Class entry.
    pub fn class_name(&self, index: u16) -> Result<&str, DecodeError> {
        match self.get(index)? {
            ConstantEntry::Class { name_index } => self.utf8(*name_index),
            other => Err(Self::wrong_kind(index, "Class", other)),
        }
    }

    /// Text of a String entry. String literals may hold any UTF-16 sequence,
    /// so the text is returned unconverted.
    pub fn string(&self, index: u16) -> Result<&JavaStr, DecodeError> {
        match self.get(index)? {
            ConstantEntry::String { string_index } => self.java_utf8(*string_index),
            other => Err(Self::wrong_kind(index, "String", other)),
        }
    }

    /// Value of an Integer entry.
    pub fn integer(&self, index: u16) -> Result<i32, DecodeError> {
        match self.get(index)? {
            ConstantEntry::Integer(v) => Ok(*v),
            other => Err(Self::wrong_kind(index, "Integer", other)),
        }
    }

    /// Value of a Float entry, bit-exact (NaN payloads included).
    pub fn float(&self, index: u16) -> Result<f32, DecodeError> {
        match self.get(index)? {
            ConstantEntry::Float(v) => Ok(*v),
            other => Err(Self::wrong_kind(index, "Float", other)),
        }
    }

    /// Value of a Long entry. Its second slot is not addressable.
    pub fn long(&self, index: u16) -> Result<i64, DecodeError> {
        match self.get(index)? {
            ConstantEntry::Long(v) => Ok(*v),
            other => Err(Self::wrong_kind(index, "Long", other)),
        }
    }

    /// Value of a Double entry. Its second slot is not addressable.
    pub fn double(&self, index: u16) -> Result<f64, DecodeError> {
        match self.get(index)? {
            ConstantEntry::Double(v) => Ok(*v),
            other => Err(Self::wrong_kind(index, "Double", other)),
        }
    }

    /// `(name, descriptor)` of a NameAndType entry.
    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str), DecodeError> {
        match self.get(index)? {
            ConstantEntry::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            other => Err(Self::wrong_kind(index, "NameAndType", other)),
        }
    }

    /// Resolve a Fieldref, Methodref or InterfaceMethodref entry.
    pub fn member_ref(&self, index: u16) -> Result<MemberRef<'_>, DecodeError> {
        let (class_index, nat_index) = match self.get(index)? {
            ConstantEntry::Fieldref {
                class_index,
                name_and_type_index,
            }
            | ConstantEntry::Methodref {
                class_index,
                name_and_type_index,
            }
            | ConstantEntry::InterfaceMethodref {
                class_index,
                name_and_type_index,
            } => (*class_index, *name_and_type_index),
            other => return Err(Self::wrong_kind(index, "member reference", other)),
        };
        let (name, descriptor) = self.name_and_type(nat_index)?;
        Ok(MemberRef {
            class_name: self.class_name(class_index)?,
            name,
            descriptor,
        })
    }
}
