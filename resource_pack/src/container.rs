use bytes::Bytes;
use indexmap::IndexMap;

use crate::{
    key::Key,
    metadata::Metadata,
    resource::{
        Atlas, BlockState, Font, Item, Language, Model, Resource, Sound, SoundRegistry, Texture,
        UnknownFile,
    },
    Error, Result,
};

/// A pack, or one of its overlays: an icon, metadata and one collection per
/// category. Registering an identifier again replaces the previous resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceContainer {
    icon: Option<Bytes>,
    metadata: Metadata,
    textures: IndexMap<Key, Texture>,
    models: IndexMap<Key, Model>,
    fonts: IndexMap<Key, Font>,
    sound_registries: IndexMap<String, SoundRegistry>,
    sounds: IndexMap<Key, Sound>,
    block_states: IndexMap<Key, BlockState>,
    items: IndexMap<Key, Item>,
    languages: IndexMap<Key, Language>,
    atlases: IndexMap<Key, Atlas>,
    unknown_files: IndexMap<String, UnknownFile>,
    overlays: IndexMap<String, Overlay>,
}

macro_rules! collections {
    ($($variant:ident($id:ty, $resource:ty) => $field:ident, $get:ident, $insert:ident, $remove:ident;)*) => {
        impl ResourceContainer {
            $(
                pub fn $field(&self) -> &IndexMap<$id, $resource> {
                    &self.$field
                }

                pub fn $get(&self, id: &$id) -> Option<&$resource> {
                    self.$field.get(id)
                }

                /// Returns the replaced resource, if any.
                pub fn $insert(&mut self, id: $id, resource: $resource) -> Option<$resource> {
                    self.$field.insert(id, resource)
                }

                pub fn $remove(&mut self, id: &$id) -> Option<$resource> {
                    self.$field.shift_remove(id)
                }
            )*

            /// Adds any kind of resource, replacing the one with the same
            /// identifier.
            pub fn insert(&mut self, resource: Resource) {
                match resource {
                    $(Resource::$variant(id, resource) => {
                        self.$field.insert(id, resource);
                    })*
                }
            }

            /// Every resource of every category, overlays not included.
            pub fn resources(&self) -> impl Iterator<Item = Resource> + '_ {
                std::iter::empty()
                    $(.chain(
                        self.$field
                            .iter()
                            .map(|(id, resource)| Resource::$variant(id.clone(), resource.clone())),
                    ))*
            }

            /// Number of resources, overlays not included.
            pub fn len(&self) -> usize {
                0 $(+ self.$field.len())*
            }
        }
    };
}

collections! {
    Texture(Key, Texture) => textures, texture, insert_texture, remove_texture;
    Model(Key, Model) => models, model, insert_model, remove_model;
    Font(Key, Font) => fonts, font, insert_font, remove_font;
    SoundRegistry(String, SoundRegistry) => sound_registries, sound_registry, insert_sound_registry, remove_sound_registry;
    Sound(Key, Sound) => sounds, sound, insert_sound, remove_sound;
    BlockState(Key, BlockState) => block_states, block_state, insert_block_state, remove_block_state;
    Item(Key, Item) => items, item, insert_item, remove_item;
    Language(Key, Language) => languages, language, insert_language, remove_language;
    Atlas(Key, Atlas) => atlases, atlas, insert_atlas, remove_atlas;
    Unknown(String, UnknownFile) => unknown_files, unknown_file, insert_unknown_file, remove_unknown_file;
}

impl ResourceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if there is no resource, icon, metadata or overlay.
    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.icon.is_none() && self.metadata.is_empty() && self.overlays.is_empty()
    }

    /// PNG shown in the pack list, `pack.png`.
    pub fn icon(&self) -> Option<&Bytes> {
        self.icon.as_ref()
    }

    pub fn set_icon(&mut self, icon: Option<Bytes>) {
        self.icon = icon;
    }

    /// Content of `pack.mcmeta`.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    pub fn overlay(&self, directory: &str) -> Option<&Overlay> {
        self.overlays.get(directory)
    }

    pub fn overlay_mut(&mut self, directory: &str) -> Option<&mut Overlay> {
        self.overlays.get_mut(directory)
    }

    /// Adds an overlay, replacing the one with the same directory.
    pub fn insert_overlay(&mut self, overlay: Overlay) -> Option<Overlay> {
        self.overlays.insert(overlay.directory.clone(), overlay)
    }

    pub fn remove_overlay(&mut self, directory: &str) -> Option<Overlay> {
        self.overlays.shift_remove(directory)
    }

    /// Copies every resource of another container into this one, replacing
    /// resources with the same identifier.
    pub fn merge(&mut self, other: &ResourceContainer) {
        for resource in other.resources() {
            self.insert(resource);
        }
    }
}

/// Container stored in a directory of the pack and only loaded for the pack
/// formats the `overlays` metadata section lists it for.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    directory: String,
    container: ResourceContainer,
}

impl Overlay {
    pub fn new(directory: impl Into<String>, container: ResourceContainer) -> Result<Self> {
        let directory = directory.into();
        if !is_valid_directory(&directory) {
            return Err(Error::InvalidOverlayDirectory(directory));
        }
        Ok(Self {
            directory,
            container,
        })
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn container(&self) -> &ResourceContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut ResourceContainer {
        &mut self.container
    }

    pub fn into_container(self) -> ResourceContainer {
        self.container
    }
}

pub(crate) fn is_valid_directory(directory: &str) -> bool {
    !directory.is_empty()
        && directory != "."
        && directory != ".."
        && !directory.contains(|char: char| char == '/' || char == '\\')
}
