#![forbid(unsafe_code)]

//! Resource manifest parsing.
//!
//! A manifest is a TOML document of `[[group]]` tables, each holding an
//! ordered list of `[[group.entry]]` tables. An entry either names a single
//! file (`path`, optional `alias`) or expands a directory (`dir`, optional
//! `prefix` and `exclude`). References are resolved relative to the
//! directory containing the manifest, and document order is kept.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::rcc::error::{RccError, RccResult};
use crate::rcc::path::{normalize_rel_path, prefixed, should_exclude};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default, rename = "group")]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    #[serde(default, rename = "entry")]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    path: Option<String>,
    alias: Option<String>,
    dir: Option<String>,
    prefix: Option<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

/// One file to pack, with its path resolved against the manifest directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// The path as written in the manifest (or derived from a `dir` entry).
    pub reference: String,
    pub source: PathBuf,
    pub alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceGroup {
    pub entries: Vec<ResourceRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceManifest {
    pub path: PathBuf,
    pub groups: Vec<ResourceGroup>,
}

impl ResourceManifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> RccResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RccError::unresolved(path, e.to_string()))?;
        Self::parse(&content, path)
    }

    /// Parse manifest text; `path` locates the manifest for resolving references.
    pub fn parse(content: &str, path: &Path) -> RccResult<Self> {
        let raw: RawManifest = toml::from_str(content).map_err(|e| {
            let reason = match e.span() {
                Some(span) => {
                    let line = content[..span.start].matches('\n').count() + 1;
                    format!("line {line}: {}", e.message().trim())
                }
                None => e.message().trim().to_string(),
            };
            RccError::malformed(path, reason)
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let mut groups = Vec::with_capacity(raw.groups.len());
        for (gi, group) in raw.groups.into_iter().enumerate() {
            let mut entries = Vec::new();
            for (ei, entry) in group.entries.into_iter().enumerate() {
                let at = format!("group {} entry {}", gi + 1, ei + 1);
                match entry {
                    RawEntry {
                        path: Some(reference),
                        alias,
                        dir: None,
                        prefix: None,
                        exclude,
                    } if exclude.is_empty() => {
                        entries.push(resolve_file(path, base, &at, reference, alias)?);
                    }
                    RawEntry {
                        path: None,
                        alias: None,
                        dir: Some(dir),
                        prefix,
                        exclude,
                    } => {
                        entries.extend(expand_dir(base, &dir, prefix.as_deref(), &exclude)?);
                    }
                    RawEntry { path: Some(_), .. } => {
                        return Err(RccError::malformed(
                            path,
                            format!("{at}: `path` entries accept only `alias`"),
                        ));
                    }
                    RawEntry { dir: Some(_), .. } => {
                        return Err(RccError::malformed(
                            path,
                            format!("{at}: `dir` entries accept only `prefix` and `exclude`"),
                        ));
                    }
                    RawEntry { .. } => {
                        return Err(RccError::malformed(
                            path,
                            format!("{at}: needs either `path` or `dir`"),
                        ));
                    }
                }
            }
            groups.push(ResourceGroup { entries });
        }

        Ok(ResourceManifest {
            path: path.to_path_buf(),
            groups,
        })
    }

    /// All entries, group by group, in document order.
    pub fn entries(&self) -> impl Iterator<Item = &ResourceRef> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn resolve_file(
    manifest: &Path,
    base: &Path,
    at: &str,
    reference: String,
    alias: Option<String>,
) -> RccResult<ResourceRef> {
    let alias = alias.unwrap_or_else(|| reference.clone());
    if alias.is_empty() {
        return Err(RccError::malformed(manifest, format!("{at}: empty alias")));
    }

    let source = base.join(&reference);
    match std::fs::metadata(&source) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(RccError::unresolved(&source, "not a regular file")),
        Err(e) => return Err(RccError::unresolved(&source, e.to_string())),
    }

    Ok(ResourceRef {
        reference,
        source,
        alias,
    })
}

/// Every regular file below `dir`, sorted by relative path bytes.
fn expand_dir(
    base: &Path,
    dir: &str,
    prefix: Option<&str>,
    excludes: &[String],
) -> RccResult<Vec<ResourceRef>> {
    let root = base.join(dir);
    if !root.is_dir() {
        return Err(RccError::unresolved(&root, "not a directory"));
    }

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for ent in WalkDir::new(&root).follow_links(false) {
        let ent = ent.map_err(|e| {
            let at = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
            RccError::unresolved(&at, e.to_string())
        })?;

        if !ent.file_type().is_file() {
            continue;
        }

        let rel = normalize_rel_path(&root, ent.path())?;
        if should_exclude(&rel, excludes) {
            continue;
        }
        files.push((rel, ent.path().to_path_buf()));
    }

    files.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let dir_ref = dir.replace('\\', "/");
    Ok(files
        .into_iter()
        .map(|(rel, source)| {
            let reference = prefixed(&dir_ref, &rel);
            let alias = match prefix {
                Some(p) => prefixed(p, &rel),
                None => reference.clone(),
            };
            ResourceRef {
                reference,
                source,
                alias,
            }
        })
        .collect())
}
