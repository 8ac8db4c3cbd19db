#![forbid(unsafe_code)]

//! Name hashing for the name table.
//!
//! The loader looks resources up by comparing this hash before comparing
//! names, so the value written into each name record has to match the
//! loader's own computation exactly. Alternative loaders can plug in their
//! own [`NameHasher`].

/// Hash strategy used by the name table builder.
pub trait NameHasher {
    /// Unsigned 32-bit hash of `name`.
    fn hash(&self, name: &str) -> u32;

    /// The hash as it is stored in a name record.
    fn stored(&self, name: &str) -> i32 {
        self.hash(name) as i32
    }
}

/// ELF-style hash over UTF-16 code units, as computed by the resource loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderHash;

impl NameHasher for LoaderHash {
    fn hash(&self, name: &str) -> u32 {
        name.encode_utf16().fold(0u32, |h, c| {
            let h = (h << 4).wrapping_add(c as u32);
            let h = h ^ ((h & 0xF000_0000) >> 23);
            h & 0x0FFF_FFFF
        })
    }
}
