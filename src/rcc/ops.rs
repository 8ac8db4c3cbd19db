#![forbid(unsafe_code)]

use std::path::Path;

use crate::rcc::build::{pack, PackedBlob};
use crate::rcc::emit::{render, write_atomic, EmitOptions};
use crate::rcc::error::{RccError, RccResult};
use crate::rcc::format::PackedEntry;
use crate::rcc::hash::{LoaderHash, NameHasher};
use crate::rcc::io::hex32;
use crate::rcc::load::load_entries;
use crate::rcc::manifest::ResourceManifest;
use crate::rcc::read::verify;

/// Load every file the manifest references and build the three tables.
pub fn pack_manifest(
    manifest: &ResourceManifest,
    hasher: &dyn NameHasher,
) -> RccResult<PackedBlob> {
    let entries = load_entries(manifest)?;
    let blob = pack(&entries, hasher)?;
    verify(&blob, hasher)?;
    Ok(blob)
}

fn render_manifest(manifest: &Path, runtime: &str) -> RccResult<(PackedBlob, String)> {
    let parsed = ResourceManifest::load(manifest)?;
    tracing::info!(
        groups = parsed.groups.len(),
        entries = parsed.len(),
        "parsed {}",
        manifest.display()
    );

    let blob = pack_manifest(&parsed, &LoaderHash)?;
    let opts = EmitOptions {
        runtime: runtime.to_string(),
        manifest_name: manifest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let src = render(&blob, &opts);
    Ok((blob, src))
}

pub fn compile(manifest: &Path, output: &Path, runtime: &str) -> RccResult<()> {
    let (blob, src) = render_manifest(manifest, runtime)?;
    write_atomic(output, src.as_bytes())?;
    tracing::info!(
        entries = blob.entries.len(),
        bytes = src.len(),
        "wrote {}",
        output.display()
    );
    Ok(())
}

/// File records of the packed manifest, in table order.
pub fn entries(manifest: &Path) -> RccResult<Vec<PackedEntry>> {
    let parsed = ResourceManifest::load(manifest)?;
    let blob = pack_manifest(&parsed, &LoaderHash)?;
    let views = verify(&blob, &LoaderHash)?;

    views
        .into_iter()
        .map(|v| {
            let owner = blob.lookup(&v.name.name).ok_or_else(|| {
                RccError::Invalid(format!("record {:?} has no entry", v.name.name))
            })?;
            Ok(PackedEntry {
                alias: v.name.name,
                source: owner.source.clone(),
                data_offset: v.data_offset,
                size: owner.size,
                name_offset: v.name_offset,
                name_hash: v.name.hash,
            })
        })
        .collect()
}

pub fn list(manifest: &Path, verbose: bool) -> RccResult<()> {
    for e in entries(manifest)? {
        if verbose {
            println!(
                "{}  data={} size={} name={} hash={} src={}",
                e.alias,
                e.data_offset,
                e.size,
                e.name_offset,
                e.name_hash,
                e.source.display()
            );
        } else {
            println!("{}  data={}", e.alias, e.data_offset);
        }
    }
    Ok(())
}

/// Fail with `Stale` unless `output` is exactly what `compile` would write.
pub fn check(manifest: &Path, output: &Path, runtime: &str) -> RccResult<()> {
    let (blob, src) = render_manifest(manifest, runtime)?;

    let existing = match std::fs::read(output) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RccError::Stale {
                path: output.to_path_buf(),
                reason: "missing".into(),
            });
        }
        Err(e) => return Err(RccError::io(output, e)),
    };

    if existing != src.as_bytes() {
        return Err(RccError::Stale {
            path: output.to_path_buf(),
            reason: format!("expected digest blake3:{}", hex32(&blob.digest())),
        });
    }

    println!("ok: {} entries", blob.entries.len());
    Ok(())
}
