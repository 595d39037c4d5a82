//! Access and property flags shared by classes, fields and methods.

use bitflags::bitflags;

bitflags! {
    /// `access_flags` as stored in the class file.
    ///
    /// Several bits mean different things on classes, fields and methods
    /// (`0x0020` is `ACC_SUPER` on a class, `ACC_SYNCHRONIZED` on a method).
    /// Unknown bits are retained.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    /// Wrap a raw `u2`, keeping bits this type has no name for.
    pub fn from_raw(raw: u16) -> Self {
        Self::from_bits_retain(raw)
    }

    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    pub fn is_native(self) -> bool {
        self.contains(Self::NATIVE)
    }
}
