#![forbid(unsafe_code)]

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::rcc::build::PackedBlob;
use crate::rcc::error::{RccError, RccResult};
use crate::rcc::format::FORMAT_VERSION;
use crate::rcc::io::{hex32, push_hex};

/// 40 bytes, 80 hex digits, per literal line.
pub const BYTES_PER_LINE: usize = 40;

pub const DEFAULT_RUNTIME: &str = "rescc::runtime";

#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Module path providing `register_resource_data` / `unregister_resource_data`.
    pub runtime: String,
    /// Shown in the artifact header.
    pub manifest_name: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            runtime: DEFAULT_RUNTIME.to_string(),
            manifest_name: String::new(),
        }
    }
}

/// Render the Rust source artifact for a packed blob.
pub fn render(blob: &PackedBlob, opts: &EmitOptions) -> String {
    let mut out = String::with_capacity(
        1024 + (blob.data.len() + blob.names.len() + blob.tree.len()) * 4,
    );

    out.push_str(&format!(
        "// Resource object code for {}.\n\
         //\n\
         // Generated by rescc {}. Do not edit; changes are lost on the next compile.\n\
         // digest: blake3:{}\n\n",
        if opts.manifest_name.is_empty() { "<memory>" } else { opts.manifest_name.as_str() },
        env!("CARGO_PKG_VERSION"),
        hex32(&blob.digest()),
    ));

    out.push_str(&format!(
        "pub const RESOURCE_FORMAT_VERSION: u32 = 0x{FORMAT_VERSION:02x};\n\n"
    ));

    byte_literal(&mut out, "RESOURCE_DATA", &blob.data);
    byte_literal(&mut out, "RESOURCE_NAME", &blob.names);
    byte_literal(&mut out, "RESOURCE_STRUCT", &blob.tree);

    let rt = &opts.runtime;
    out.push_str(&format!(
        "/// Hand the resource tables to the runtime registry.\n\
         pub fn register_resources() -> bool {{\n    \
             {rt}::register_resource_data(\n        \
                 RESOURCE_FORMAT_VERSION,\n        \
                 RESOURCE_STRUCT,\n        \
                 RESOURCE_NAME,\n        \
                 RESOURCE_DATA,\n    \
             )\n\
         }}\n\n\
         /// Withdraw the resource tables from the runtime registry.\n\
         pub fn unregister_resources() -> bool {{\n    \
             {rt}::unregister_resource_data(\n        \
                 RESOURCE_FORMAT_VERSION,\n        \
                 RESOURCE_STRUCT,\n        \
                 RESOURCE_NAME,\n        \
                 RESOURCE_DATA,\n    \
             )\n\
         }}\n\n\
         /// Call once from the application's startup sequence.\n\
         pub fn init() -> bool {{\n    \
             register_resources()\n\
         }}\n\n\
         /// Call once from the application's shutdown sequence.\n\
         pub fn shutdown() -> bool {{\n    \
             unregister_resources()\n\
         }}\n"
    ));

    out
}

fn byte_literal(out: &mut String, name: &str, bytes: &[u8]) {
    out.push_str("pub static ");
    out.push_str(name);
    out.push_str(": &[u8] = b\"\\\n");
    for line in bytes.chunks(BYTES_PER_LINE) {
        for b in line.iter().copied() {
            out.push_str("\\x");
            push_hex(out, b);
        }
        out.push_str("\\\n");
    }
    out.push_str("\";\n\n");
}

/// Replace `output` with `contents` via a temp file in the same directory.
pub fn write_atomic(output: &Path, contents: &[u8]) -> RccResult<()> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RccError::io(output, e))?;
    tmp.write_all(contents).map_err(|e| RccError::io(output, e))?;
    tmp.flush().map_err(|e| RccError::io(output, e))?;
    tmp.persist(output).map_err(|e| RccError::io(output, e.error))?;
    Ok(())
}
