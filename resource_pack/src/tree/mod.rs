//! Uniform view over packaged (zip) and unpackaged (directory, memory) trees
//! of files.
//!
//! Readers are iterators over [`Entry`]; zip readers stream and can only be
//! consumed once, directory and memory trees hand out a fresh iterator on
//! every call to `entries`. Writers implement [`TreeWriter`] and are consumed
//! by [`TreeWriter::finish`].

use bytes::Bytes;

use crate::{Error, Result};

pub use directory::DirectoryTree;
pub use memory::MemoryTree;
pub use zip::{ZipReader, ZipWriter};

mod directory;
mod memory;
mod zip;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the tree root, separated by `/`.
    pub path: String,

    pub content: Bytes,

    /// Size declared by the medium, equal to the content length once read.
    pub size: u64,
}

impl Entry {
    pub fn new(path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            size: content.len() as u64,
            content,
        }
    }
}

pub trait TreeWriter {
    /// Writes a file, entries may arrive in any order.
    fn write(&mut self, path: &str, content: &[u8]) -> Result<()>;

    /// Finalizes the underlying medium.
    fn finish(self) -> Result<()>
    where
        Self: Sized;
}

/// Writes every file below a directory of another writer.
pub struct Prefixed<'a, W: TreeWriter + ?Sized> {
    inner: &'a mut W,
    prefix: String,
}

impl<'a, W: TreeWriter + ?Sized> Prefixed<'a, W> {
    pub fn new(inner: &'a mut W, directory: &str) -> Self {
        Self {
            inner,
            prefix: format!("{}/", directory.trim_end_matches('/')),
        }
    }
}

impl<W: TreeWriter + ?Sized> TreeWriter for Prefixed<'_, W> {
    fn write(&mut self, path: &str, content: &[u8]) -> Result<()> {
        self.inner.write(&format!("{}{}", self.prefix, path), content)
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}

/// Normalizes separators and rejects paths escaping the tree root.
pub(crate) fn sanitize(path: &str) -> Result<String> {
    let path = path.replace('\\', "/");
    let path = path.strip_prefix("./").unwrap_or(&path);
    if path.is_empty()
        || path.starts_with('/')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(Error::InvalidPath(path.to_owned()));
    }
    Ok(path.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_paths() {
        assert_eq!(sanitize("a/b.json").unwrap(), "a/b.json");
        assert_eq!(sanitize("./a\\b.json").unwrap(), "a/b.json");
        assert!(matches!(sanitize("/etc/passwd"), Err(Error::InvalidPath(_))));
        assert!(matches!(sanitize("a/../../b"), Err(Error::InvalidPath(_))));
        assert!(matches!(sanitize("a//b"), Err(Error::InvalidPath(_))));
        assert!(matches!(sanitize(""), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn prefixed_writes_below_directory() {
        let mut tree = MemoryTree::new();
        {
            let mut overlay = Prefixed::new(&mut tree, "overlay_18");
            overlay.write("assets/a.txt", b"a").unwrap();
            overlay.finish().unwrap();
        }
        assert_eq!(
            tree.get("overlay_18/assets/a.txt").map(|content| &content[..]),
            Some(&b"a"[..])
        );
    }
}
