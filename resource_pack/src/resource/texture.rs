use bytes::Bytes;

use crate::{
    key::Key,
    metadata::Metadata,
    resource::{Category, EncodedFile},
    Result,
};

/// Image (usually PNG) below `textures/`, the key includes the extension.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Texture {
    pub data: Bytes,

    /// Content of the `<texture>.mcmeta` file next to the image.
    pub meta: Option<Metadata>,
}

impl Texture {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = Some(meta);
        self
    }

    pub(crate) fn serialize(&self, key: &Key, version: u32) -> Result<Vec<EncodedFile>> {
        let path = Category::Texture.path(key);
        let meta = match &self.meta {
            Some(meta) => Some(EncodedFile {
                path: format!("{path}.mcmeta"),
                content: meta.encode(version)?.into(),
            }),
            None => None,
        };
        let mut files = vec![EncodedFile {
            path,
            content: self.data.clone(),
        }];
        files.extend(meta);
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TextureMeta;

    #[test]
    fn writes_image_then_meta() {
        let mut meta = Metadata::new();
        meta.insert(TextureMeta {
            blur: true,
            ..Default::default()
        });
        let texture = Texture::new(&b"\x89PNG"[..]).with_meta(meta);
        let files = texture
            .serialize(&Key::new("ns", "block/a.png").unwrap(), 1)
            .unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "assets/ns/textures/block/a.png");
        assert_eq!(&files[0].content[..], b"\x89PNG");
        assert_eq!(files[1].path, "assets/ns/textures/block/a.png.mcmeta");
        assert_eq!(&files[1].content[..], br#"{"texture":{"blur":true}}"#);
    }
}
