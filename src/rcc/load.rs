#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::rcc::error::{RccError, RccResult};
use crate::rcc::manifest::ResourceManifest;

/// A manifest entry with its file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub source: PathBuf,
    pub alias: String,
    pub bytes: Vec<u8>,
}

/// Read every referenced file, one at a time, in manifest order.
pub fn load_entries(manifest: &ResourceManifest) -> RccResult<Vec<ResourceEntry>> {
    let mut out = Vec::with_capacity(manifest.len());
    for r in manifest.entries() {
        let mut f =
            File::open(&r.source).map_err(|e| RccError::unresolved(&r.source, e.to_string()))?;
        let mut bytes = Vec::new();
        f.read_to_end(&mut bytes)
            .map_err(|e| RccError::unresolved(&r.source, e.to_string()))?;
        tracing::debug!(alias = %r.alias, size = bytes.len(), "loaded {}", r.source.display());

        out.push(ResourceEntry {
            source: r.source.clone(),
            alias: r.alias.clone(),
            bytes,
        });
    }
    Ok(out)
}
