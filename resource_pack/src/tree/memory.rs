use std::collections::BTreeMap;

use bytes::Bytes;

use crate::{
    tree::{Entry, TreeWriter},
    Result,
};

/// Tree held in memory, sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryTree {
    files: BTreeMap<String, Bytes>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Bytes>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<&Bytes> {
        self.files.get(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<Bytes> {
        self.files.remove(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Fresh pass over every file, can be called any number of times.
    pub fn entries(&self) -> impl Iterator<Item = Result<Entry>> + '_ {
        self.files
            .iter()
            .map(|(path, content)| Ok(Entry::new(path.clone(), content.clone())))
    }
}

impl TreeWriter for MemoryTree {
    fn write(&mut self, path: &str, content: &[u8]) -> Result<()> {
        self.files
            .insert(path.to_owned(), Bytes::copy_from_slice(content));
        Ok(())
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}

impl FromIterator<(String, Bytes)> for MemoryTree {
    fn from_iter<T: IntoIterator<Item = (String, Bytes)>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_restartable() {
        let mut tree = MemoryTree::new();
        tree.write("b.txt", b"b").unwrap();
        tree.write("a.txt", b"a").unwrap();

        for _ in 0..2 {
            let entries = tree.entries().collect::<Result<Vec<_>>>().unwrap();
            assert_eq!(
                entries,
                vec![Entry::new("a.txt", &b"a"[..]), Entry::new("b.txt", &b"b"[..])]
            );
        }
    }
}
