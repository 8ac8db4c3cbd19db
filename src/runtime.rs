#![forbid(unsafe_code)]

//! Process-wide resource registration.
//!
//! Generated artifacts call into this module from their `init()` and
//! `shutdown()` functions. Registrations are identified by the addresses of
//! the three static tables, so registering the same artifact twice records
//! it twice and each registration needs its own unregister call.

use std::sync::Mutex;

use crate::rcc::FORMAT_VERSION;

#[derive(Debug, Clone, Copy)]
struct Registration {
    version: u32,
    tree: &'static [u8],
    names: &'static [u8],
    data: &'static [u8],
}

impl Registration {
    fn is(&self, tree: &[u8], names: &[u8], data: &[u8]) -> bool {
        std::ptr::eq(self.tree, tree)
            && std::ptr::eq(self.names, names)
            && std::ptr::eq(self.data, data)
    }
}

static REGISTRY: Mutex<Vec<Registration>> = Mutex::new(Vec::new());

fn registry() -> std::sync::MutexGuard<'static, Vec<Registration>> {
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Record a set of resource tables. Returns false for an unsupported `version`.
pub fn register_resource_data(
    version: u32,
    tree: &'static [u8],
    names: &'static [u8],
    data: &'static [u8],
) -> bool {
    if version != FORMAT_VERSION {
        tracing::warn!(version, "unsupported resource format version");
        return false;
    }
    registry().push(Registration {
        version,
        tree,
        names,
        data,
    });
    tracing::debug!(
        tree = tree.len(),
        names = names.len(),
        data = data.len(),
        "registered resources"
    );
    true
}

/// Remove the most recent matching registration. Returns false if there is none.
pub fn unregister_resource_data(
    version: u32,
    tree: &'static [u8],
    names: &'static [u8],
    data: &'static [u8],
) -> bool {
    let mut reg = registry();
    match reg
        .iter()
        .rposition(|r| r.version == version && r.is(tree, names, data))
    {
        Some(i) => {
            reg.remove(i);
            true
        }
        None => false,
    }
}

pub fn is_registered(tree: &[u8], names: &[u8], data: &[u8]) -> bool {
    registry().iter().any(|r| r.is(tree, names, data))
}
