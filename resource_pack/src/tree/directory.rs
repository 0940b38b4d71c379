use std::{
    fs,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use tracing::{trace, warn};

use crate::{
    tree::{sanitize, Entry, TreeWriter},
    Error, Result,
};

/// Tree backed by a directory on disk, can be read and written repeatedly.
#[derive(Clone, Debug)]
pub struct DirectoryTree {
    root: PathBuf,
}

impl DirectoryTree {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every file below the root, contents are read lazily.
    pub fn entries(&self) -> Result<DirectoryEntries> {
        let mut paths = vec![];
        collect(&self.root, "", &mut paths)?;
        paths.sort();
        Ok(DirectoryEntries {
            root: self.root.clone(),
            paths: paths.into_iter(),
        })
    }
}

fn collect(directory: &Path, prefix: &str, paths: &mut Vec<String>) -> Result<()> {
    for dir_entry in fs::read_dir(directory)? {
        let dir_entry = dir_entry?;
        let Some(file_name) = dir_entry.file_name().to_str().map(str::to_owned) else {
            warn!("Skipping non UTF-8 file name {:?}", dir_entry.path());
            continue;
        };
        let path = format!("{prefix}{file_name}");
        let metadata = fs::metadata(dir_entry.path())?;
        if metadata.is_dir() {
            collect(&dir_entry.path(), &format!("{path}/"), paths)?;
        } else if metadata.is_file() {
            paths.push(path);
        }
    }
    Ok(())
}

pub struct DirectoryEntries {
    root: PathBuf,
    paths: std::vec::IntoIter<String>,
}

impl Iterator for DirectoryEntries {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        Some(
            fs::read(self.root.join(&path))
                .map(|content| Entry::new(path, Bytes::from(content)))
                .map_err(Error::from),
        )
    }
}

impl TreeWriter for DirectoryTree {
    fn write(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let path = self.root.join(sanitize(path)?);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        trace!("Writing {}", path.display());
        fs::write(path, content)?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_twice() {
        let directory = tempfile::tempdir().unwrap();
        let mut tree = DirectoryTree::new(directory.path());
        tree.write("pack.mcmeta", b"{}").unwrap();
        tree.write("assets/minecraft/lang/en_us.json", b"{\"a\":\"b\"}")
            .unwrap();

        for _ in 0..2 {
            let entries = tree.entries().unwrap().collect::<Result<Vec<_>>>().unwrap();
            assert_eq!(
                entries,
                vec![
                    Entry::new("assets/minecraft/lang/en_us.json", &b"{\"a\":\"b\"}"[..]),
                    Entry::new("pack.mcmeta", &b"{}"[..]),
                ]
            );
        }
        tree.finish().unwrap();
    }

    #[test]
    fn rejects_escaping_paths() {
        let directory = tempfile::tempdir().unwrap();
        let mut tree = DirectoryTree::new(directory.path());
        assert!(matches!(
            tree.write("../outside.txt", b""),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn missing_root_is_io_failure() {
        let directory = tempfile::tempdir().unwrap();
        let tree = DirectoryTree::new(directory.path().join("missing"));
        assert!(matches!(tree.entries(), Err(Error::Io(_))));
    }
}
