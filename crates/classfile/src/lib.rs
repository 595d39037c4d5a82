//! Decoder for the JVM class-file format.
//!
//! - [`ClassReader`]: big-endian cursor every other decoder builds on
//! - [`ConstantPool`]: tag-dispatched entries addressed by 1-based index
//! - [`Attribute`]: `Code` decoded structurally, everything else skipped
//! - [`ClassFile`]: magic/version check and assembly of the whole class
//! - [`Member`]: field/method view resolving names through the pool
//! - [`DecodeError`]: every way a decode can fail
//!
//! # Usage
//!
//! ```no_run
//! use minijvm_classfile::ClassFile;
//!
//! let bytes = std::fs::read("Main.class").unwrap();
//! let class = ClassFile::parse(&bytes).unwrap();
//! if let Some(main) = class.main_method().unwrap() {
//!     println!("entry point: {}", main.name().unwrap());
//! }
//! ```

pub mod access;
pub mod attribute;
pub mod class_file;
pub mod constant_pool;
pub mod error;
pub mod member;
pub mod reader;

pub use access::AccessFlags;
pub use attribute::{Attribute, CodeAttribute, ExceptionTableEntry};
pub use class_file::{ClassFile, MAGIC};
pub use constant_pool::{ConstantEntry, ConstantPool, ConstantTag, MemberRef};
pub use error::DecodeError;
pub use member::{Member, MemberInfo, MAIN_METHOD_DESCRIPTOR, MAIN_METHOD_NAME};
pub use reader::ClassReader;

pub use java_string::{JavaStr, JavaString};
