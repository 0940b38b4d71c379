//! Routing between pack paths and resources.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::{
    config::Options,
    key::Key,
    metadata::Metadata,
    resource::{
        Atlas, BlockState, Category, EncodedFile, Font, Item, JsonResource, Language, Model,
        Resource, Sound, SoundRegistry, Texture, SOUND_REGISTRY_FILE,
    },
    Error, Result,
};

/// Result of decoding a single file.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Resource(Resource),
    /// `<texture>.mcmeta`, attached to the texture once every file is read.
    TextureMeta(Key, Metadata),
}

/// Encodes and decodes every category, built once and shared by reference.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    options: Options,
}

impl Registry {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn encode(&self, resource: &Resource, version: u32) -> Result<Vec<EncodedFile>> {
        resource.serialize(version)
    }

    /// Decodes a file by its path relative to the container root, `None` if
    /// no category claims the path or the file has to be kept as is.
    pub fn decode(&self, path: &str, content: Bytes) -> Result<Option<Decoded>> {
        let Some((namespace, path_in_namespace)) = path
            .strip_prefix("assets/")
            .and_then(|path| path.split_once('/'))
        else {
            return Ok(None);
        };

        if path_in_namespace == SOUND_REGISTRY_FILE {
            if Key::new(namespace, SOUND_REGISTRY_FILE).is_err() {
                debug!("Invalid namespace {path}");
                return Ok(None);
            }
            return Ok(self.json::<SoundRegistry>(path, &content)?.map(|registry| {
                Decoded::Resource(Resource::SoundRegistry(namespace.to_owned(), registry))
            }));
        }

        let Some((directory, value)) = path_in_namespace.split_once('/') else {
            return Ok(None);
        };
        let Some(category) = Category::ALL
            .into_iter()
            .find(|category| *category != Category::SoundRegistry && category.directory() == directory)
        else {
            return Ok(None);
        };

        if category == Category::Texture {
            if let Some(texture) = value.strip_suffix(".mcmeta") {
                let Some(key) = key(namespace, texture, path) else {
                    return Ok(None);
                };
                return Ok(self
                    .parse(path, || Metadata::decode(&content))?
                    .map(|meta| Decoded::TextureMeta(key, meta)));
            }
            return Ok(key(namespace, value, path)
                .map(|key| Decoded::Resource(Resource::Texture(key, Texture::new(content)))));
        }

        let Some(value) = value.strip_suffix(category.extension()) else {
            return Ok(None);
        };
        let Some(key) = key(namespace, value, path) else {
            return Ok(None);
        };
        let resource = match category {
            Category::Sound => Some(Resource::Sound(key, Sound::new(content))),
            Category::Model => self.json(path, &content)?.map(|model: Model| Resource::Model(key, model)),
            Category::Font => self.json(path, &content)?.map(|font: Font| Resource::Font(key, font)),
            Category::BlockState => self
                .json(path, &content)?
                .map(|block_state: BlockState| Resource::BlockState(key, block_state)),
            Category::Item => self.json(path, &content)?.map(|item: Item| Resource::Item(key, item)),
            Category::Language => self
                .json(path, &content)?
                .map(|language: Language| Resource::Language(key, language)),
            Category::Atlas => self.json(path, &content)?.map(|atlas: Atlas| Resource::Atlas(key, atlas)),
            Category::Texture | Category::SoundRegistry => None,
        };
        Ok(resource.map(Decoded::Resource))
    }

    fn json<R: JsonResource>(&self, path: &str, content: &[u8]) -> Result<Option<R>> {
        self.parse(path, || R::decode(content))
    }

    /// Applies the strictness policy to a parse result.
    pub(crate) fn parse<T>(
        &self,
        path: &str,
        parse: impl FnOnce() -> serde_json::Result<T>,
    ) -> Result<Option<T>> {
        match parse() {
            Ok(value) => Ok(Some(value)),
            Err(source) if self.options.strict => Err(Error::MalformedResource {
                path: path.to_owned(),
                source,
            }),
            Err(error) => {
                warn!("Keeping malformed {path} as unknown file: {error}");
                Ok(None)
            }
        }
    }
}

fn key(namespace: &str, value: &str, path: &str) -> Option<Key> {
    match Key::new(namespace, value) {
        Ok(key) => Some(key),
        Err(_) => {
            debug!("Invalid key for {path}, keeping as unknown file");
            None
        }
    }
}
