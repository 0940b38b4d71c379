//! Conversion between containers and file trees.
//!
//! The layout is the one of a resource pack: `pack.mcmeta` and `pack.png` at
//! the root, resources below `assets/<namespace>/` and every overlay as a
//! subtree with the same layout.

use std::{
    collections::HashSet,
    io::{Read, Write},
    path::Path,
};

use bytes::Bytes;
use indexmap::IndexMap;
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::{
    codec::{Decoded, Registry},
    container::{is_valid_directory, Overlay, ResourceContainer},
    key::Key,
    metadata::Metadata,
    resource::UnknownFile,
    tree::{DirectoryTree, Entry, Prefixed, TreeWriter, ZipReader, ZipWriter},
    Result,
};

pub const METADATA_FILE: &str = "pack.mcmeta";
pub const ICON_FILE: &str = "pack.png";

/// Zip archive of a pack together with its SHA-1, as servers advertise it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltPack {
    pub bytes: Bytes,

    /// Lowercase hex.
    pub sha1: String,
}

/// Writes the container and all of its overlays for the given pack format.
pub fn write<W: TreeWriter>(
    registry: &Registry,
    container: &ResourceContainer,
    version: u32,
    tree: &mut W,
) -> Result<()> {
    write_container(registry, container, version, tree)
}

fn write_container(
    registry: &Registry,
    container: &ResourceContainer,
    version: u32,
    tree: &mut dyn TreeWriter,
) -> Result<()> {
    if let Some(icon) = container.icon() {
        tree.write(ICON_FILE, icon)?;
    }
    if !container.metadata().is_empty() {
        tree.write(METADATA_FILE, &container.metadata().encode(version)?)?;
    }
    for resource in container.resources() {
        for file in registry.encode(&resource, version)? {
            tree.write(&file.path, &file.content)?;
        }
    }

    let declared = container
        .metadata()
        .overlays()
        .map(|overlays| {
            overlays
                .entries
                .iter()
                .map(|entry| entry.directory.as_str())
                .collect::<HashSet<_>>()
        })
        .unwrap_or_default();
    for overlay in container.overlays() {
        if !declared.contains(overlay.directory()) {
            warn!(
                "Overlay {} is not declared in the metadata and will be read back as unknown files",
                overlay.directory()
            );
        }
        let mut tree = Prefixed::new(&mut *tree, overlay.directory());
        write_container(registry, overlay.container(), version, &mut tree)?;
    }
    Ok(())
}

/// Reads a container from the entries of a tree. Files below a directory
/// declared in the `overlays` metadata section make up that overlay,
/// everything no category claims is kept as unknown file.
pub fn read<I>(registry: &Registry, entries: I) -> Result<ResourceContainer>
where
    I: IntoIterator<Item = Result<Entry>>,
{
    let entries = entries.into_iter().collect::<Result<Vec<_>>>()?;
    read_container(registry, entries)
}

fn read_container(registry: &Registry, entries: Vec<Entry>) -> Result<ResourceContainer> {
    let mut container = ResourceContainer::new();

    let metadata = match entries.iter().find(|entry| entry.path == METADATA_FILE) {
        Some(entry) => registry.parse(METADATA_FILE, || Metadata::decode(&entry.content))?,
        None => None,
    };
    let directories = metadata
        .as_ref()
        .and_then(Metadata::overlays)
        .map(|overlays| {
            overlays
                .entries
                .iter()
                .map(|entry| entry.directory.clone())
                .filter(|directory| is_valid_directory(directory))
                .collect::<HashSet<_>>()
        })
        .unwrap_or_default();

    let mut overlays: IndexMap<String, Vec<Entry>> = IndexMap::new();
    let mut texture_metas = vec![];
    for entry in entries {
        if let Some((directory, path)) = entry.path.split_once('/') {
            if directories.contains(directory) && !path.is_empty() {
                let overlay_entry = Entry {
                    path: path.to_owned(),
                    content: entry.content.clone(),
                    size: entry.size,
                };
                overlays
                    .entry(directory.to_owned())
                    .or_default()
                    .push(overlay_entry);
                continue;
            }
        }

        match entry.path.as_str() {
            ICON_FILE => {
                container.set_icon(Some(entry.content));
                continue;
            }
            METADATA_FILE if metadata.is_some() => continue,
            _ => {}
        }

        match registry.decode(&entry.path, entry.content.clone())? {
            Some(Decoded::Resource(resource)) => container.insert(resource),
            Some(Decoded::TextureMeta(key, meta)) => texture_metas.push((key, meta, entry)),
            None => {
                debug!("Unknown file {}", entry.path);
                container.insert_unknown_file(entry.path, UnknownFile::new(entry.content));
            }
        }
    }

    for (key, meta, entry) in texture_metas {
        attach_meta(&mut container, key, meta, entry);
    }
    if let Some(metadata) = metadata {
        container.set_metadata(metadata);
    }
    for (directory, entries) in overlays {
        let overlay = read_container(registry, entries)?;
        container.insert_overlay(Overlay::new(directory, overlay)?);
    }
    Ok(container)
}

fn attach_meta(container: &mut ResourceContainer, key: Key, meta: Metadata, entry: Entry) {
    match container.remove_texture(&key) {
        Some(texture) => {
            container.insert_texture(key, texture.with_meta(meta));
        }
        None => {
            debug!("Texture metadata {} without texture", entry.path);
            container.insert_unknown_file(entry.path, UnknownFile::new(entry.content));
        }
    }
}

pub fn read_zip<R: Read>(registry: &Registry, input: R) -> Result<ResourceContainer> {
    read(registry, ZipReader::new(input))
}

pub fn read_directory(registry: &Registry, root: impl AsRef<Path>) -> Result<ResourceContainer> {
    read(registry, DirectoryTree::new(root).entries()?)
}

/// Writes a zip archive and returns the sink.
pub fn write_zip<W: Write>(
    registry: &Registry,
    container: &ResourceContainer,
    version: u32,
    output: W,
) -> Result<W> {
    let mut zip = ZipWriter::new(output, registry.options());
    write(registry, container, version, &mut zip)?;
    zip.finish_into_inner()
}

pub fn write_directory(
    registry: &Registry,
    container: &ResourceContainer,
    version: u32,
    root: impl AsRef<Path>,
) -> Result<()> {
    let mut tree = DirectoryTree::new(root);
    write(registry, container, version, &mut tree)?;
    tree.finish()
}

pub fn build(registry: &Registry, container: &ResourceContainer, version: u32) -> Result<BuiltPack> {
    let bytes = write_zip(registry, container, version, vec![])?;
    let sha1 = hex::encode(Sha1::digest(&bytes));
    debug!("Built pack of {} bytes, SHA-1 {sha1}", bytes.len());
    Ok(BuiltPack {
        bytes: bytes.into(),
        sha1,
    })
}
