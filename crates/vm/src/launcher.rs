//! Starting a program: class name to bytes, bytes to `ClassFile`, `main` to a
//! running thread.

use std::collections::HashMap;

use minijvm_classfile::ClassFile;
use tracing::{info, warn};

use crate::error::VmError;
use crate::execute::interpret;

/// Source of raw class-file bytes, keyed by internal name (`a/b/C`).
pub trait ClassProvider {
    /// Bytes for `name`, or `None` if this provider has no such class.
    fn find_class(&self, name: &str) -> Option<Vec<u8>>;
}

/// Class provider over an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryClassProvider {
    classes: HashMap<String, Vec<u8>>,
}

impl MemoryClassProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `name`. Dotted names are stored in internal form.
    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) {
        self.classes.insert(internal_name(name), bytes);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassProvider for MemoryClassProvider {
    fn find_class(&self, name: &str) -> Option<Vec<u8>> {
        self.classes.get(name).cloned()
    }
}

/// `java.lang.Object` becomes `java/lang/Object`.
pub fn internal_name(name: &str) -> String {
    name.replace('.', "/")
}

/// Load `main_class` from `provider` and run its `main` method to completion.
///
/// Returns the number of instructions executed.
pub fn launch(provider: &dyn ClassProvider, main_class: &str) -> Result<u64, VmError> {
    let name = internal_name(main_class);
    info!(target: "minijvm::launcher", class = %name, "starting");
    match load_and_run(provider, &name) {
        Ok(executed) => {
            info!(target: "minijvm::launcher", class = %name, executed, "finished");
            Ok(executed)
        }
        Err(err) => {
            warn!(target: "minijvm::launcher", class = %name, error = %err, "launch failed");
            Err(err)
        }
    }
}

fn load_and_run(provider: &dyn ClassProvider, name: &str) -> Result<u64, VmError> {
    let bytes = provider
        .find_class(name)
        .ok_or_else(|| VmError::ClassNotFound {
            name: name.to_owned(),
        })?;
    let class = ClassFile::parse(&bytes)?;
    let main = class
        .main_method()?
        .ok_or_else(|| VmError::MainMethodNotFound {
            class: name.to_owned(),
        })?;
    Ok(interpret(main)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijvm_classfile::DecodeError;

    #[test]
    fn dotted_names_become_internal() {
        assert_eq!(internal_name("com.example.Main"), "com/example/Main");
        assert_eq!(internal_name("Main"), "Main");
        assert_eq!(internal_name("a/b/C"), "a/b/C");
    }

    #[test]
    fn memory_provider_lookup() {
        let mut provider = MemoryClassProvider::new();
        assert!(provider.is_empty());
        provider.insert("pkg.Main", vec![1, 2, 3]);
        assert_eq!(provider.len(), 1);
        assert_eq!(provider.find_class("pkg/Main"), Some(vec![1, 2, 3]));
        assert_eq!(provider.find_class("pkg.Main"), None);
    }

    #[test]
    fn missing_class() {
        let provider = MemoryClassProvider::new();
        assert_eq!(
            launch(&provider, "x.Y"),
            Err(VmError::ClassNotFound {
                name: "x/Y".to_owned()
            })
        );
    }

    #[test]
    fn undecodable_class() {
        let mut provider = MemoryClassProvider::new();
        provider.insert("Bad", vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(
            launch(&provider, "Bad"),
            Err(VmError::Decode(DecodeError::BadMagic { found: 0xDEADBEEF }))
        );
    }
}
