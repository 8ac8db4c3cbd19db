#![forbid(unsafe_code)]

use std::path::Path;

use crate::rcc::error::{RccError, RccResult};

/// Path of `file_path` below `root`, joined with forward slashes.
pub fn normalize_rel_path(root: &Path, file_path: &Path) -> RccResult<String> {
    let rel = file_path.strip_prefix(root).map_err(|_| {
        RccError::Invalid(format!(
            "{} is outside {}",
            file_path.display(),
            root.display()
        ))
    })?;

    let mut out = String::new();
    for (i, comp) in rel.components().enumerate() {
        if i != 0 {
            out.push('/');
        }
        out.push_str(&comp.as_os_str().to_string_lossy());
    }
    out = out.replace('\\', "/");

    if out.is_empty() {
        return Err(RccError::Invalid(format!(
            "empty relative path for {}",
            file_path.display()
        )));
    }

    Ok(out)
}

/// Alias for a file expanded from a directory entry.
pub fn prefixed(prefix: &str, rel: &str) -> String {
    let p = prefix.replace('\\', "/");
    let p = p.trim_end_matches('/');
    let r = rel.trim_start_matches('/');
    if p.is_empty() {
        return r.to_string();
    }
    format!("{p}/{r}")
}

pub fn should_exclude(norm_path: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|e| !e.is_empty() && norm_path.contains(e))
}
