use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use serde_with::{serde_as, OneOrMany};

use crate::{
    format,
    key::Key,
    resource::{from_fields, tagged, write_floats, Category, JsonResource},
    writer::JsonWriter,
    Result,
};

/// Font, `font/<name>.json`. Glyphs are looked up in the providers in order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Font {
    #[serde(default)]
    pub providers: Vec<FontProvider>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Font {
    pub fn new(providers: Vec<FontProvider>) -> Self {
        Self {
            providers,
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FontProvider {
    Bitmap(BitmapProvider),
    Space(SpaceProvider),
    Ttf(TtfProvider),
    Unihex(UnihexProvider),
    Reference(ReferenceProvider),
    /// Provider of a type this crate does not know, including its `type`.
    Unknown(Map<String, Value>),
}

impl FontProvider {
    /// First pack format that reads this provider.
    pub fn since(&self) -> u32 {
        match self {
            FontProvider::Space(_) => format::FONT_SPACE,
            FontProvider::Unihex(_) | FontProvider::Reference(_) => format::FONT_UNIHEX,
            _ => 0,
        }
    }

    fn write(&self, writer: &mut JsonWriter) -> Result<()> {
        match self {
            FontProvider::Bitmap(provider) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("bitmap")?
                    .key("file")?
                    .resource_key(&provider.file)?;
                if provider.height != 8 {
                    writer.key("height")?.int(provider.height as i64)?;
                }
                writer
                    .key("ascent")?
                    .int(provider.ascent as i64)?
                    .key("chars")?
                    .begin_array()?;
                for row in provider.chars.iter() {
                    writer.string(row)?;
                }
                writer.end_array()?.extra(&provider.extra)?.end_object()?;
            }
            FontProvider::Space(provider) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("space")?
                    .key("advances")?
                    .begin_object()?;
                for (char, advance) in provider.advances.iter() {
                    writer.key(char)?.float(*advance)?;
                }
                writer.end_object()?.extra(&provider.extra)?.end_object()?;
            }
            FontProvider::Ttf(provider) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("ttf")?
                    .key("file")?
                    .resource_key(&provider.file)?;
                if provider.shift != [0.0; 2] {
                    writer.key("shift")?;
                    write_floats(writer, &provider.shift)?;
                }
                if provider.size != default_size() {
                    writer.key("size")?.float(provider.size)?;
                }
                if provider.oversample != 1.0 {
                    writer.key("oversample")?.float(provider.oversample)?;
                }
                if !provider.skip.is_empty() {
                    writer.key("skip")?.begin_array()?;
                    for row in provider.skip.iter() {
                        writer.string(row)?;
                    }
                    writer.end_array()?;
                }
                writer.extra(&provider.extra)?.end_object()?;
            }
            FontProvider::Unihex(provider) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("unihex")?
                    .key("hex_file")?
                    .resource_key(&provider.hex_file)?
                    .key("size_overrides")?
                    .begin_array()?;
                for size_override in provider.size_overrides.iter() {
                    writer
                        .begin_object()?
                        .key("from")?
                        .string(&size_override.from)?
                        .key("to")?
                        .string(&size_override.to)?
                        .key("left")?
                        .int(size_override.left as i64)?
                        .key("right")?
                        .int(size_override.right as i64)?
                        .extra(&size_override.extra)?
                        .end_object()?;
                }
                writer.end_array()?.extra(&provider.extra)?.end_object()?;
            }
            FontProvider::Reference(provider) => {
                writer
                    .begin_object()?
                    .key("type")?
                    .string("reference")?
                    .key("id")?
                    .resource_key(&provider.id)?
                    .extra(&provider.extra)?
                    .end_object()?;
            }
            FontProvider::Unknown(fields) => {
                writer.begin_object()?.extra(fields)?.end_object()?;
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for FontProvider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (kind, fields) = tagged(deserializer)?;
        Ok(match kind.as_deref() {
            Some("bitmap") => FontProvider::Bitmap(from_fields(fields)?),
            Some("space") => FontProvider::Space(from_fields(fields)?),
            Some("ttf") => FontProvider::Ttf(from_fields(fields)?),
            Some("unihex") => FontProvider::Unihex(from_fields(fields)?),
            Some("reference") => FontProvider::Reference(from_fields(fields)?),
            _ => FontProvider::Unknown(fields),
        })
    }
}

/// Glyphs cut from a PNG texture, one row of the texture per string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BitmapProvider {
    /// Texture in `textures/`, including its extension.
    pub file: Key,

    /// Height in pixels the glyphs are scaled to, defaults to 8.
    #[serde(default = "default_height")]
    pub height: i32,

    /// Vertical shift of the glyphs.
    pub ascent: i32,

    pub chars: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BitmapProvider {
    pub fn new(file: Key, height: i32, ascent: i32, chars: Vec<String>) -> Self {
        Self {
            file,
            height,
            ascent,
            chars,
            extra: Map::new(),
        }
    }
}

/// Invisible glyphs of a given advance.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SpaceProvider {
    pub advances: IndexMap<String, f32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TtfProvider {
    /// TrueType or OpenType font in `font/`, including its extension.
    pub file: Key,

    #[serde(default)]
    pub shift: [f32; 2],

    #[serde(default = "default_size")]
    pub size: f32,

    #[serde(default = "default_oversample")]
    pub oversample: f32,

    /// Characters left out, either one string or a list of strings.
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub skip: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UnihexProvider {
    /// Zip archive of `.hex` files.
    pub hex_file: Key,

    #[serde(default)]
    pub size_overrides: Vec<SizeOverride>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Width of a code point range, overriding the one detected.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SizeOverride {
    pub from: String,
    pub to: String,
    pub left: i32,
    pub right: i32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Includes the providers of another font.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ReferenceProvider {
    pub id: Key,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JsonResource for Font {
    const CATEGORY: Category = Category::Font;

    fn write(&self, version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?.key("providers")?.begin_array()?;
        for provider in self.providers.iter() {
            if version >= provider.since() {
                provider.write(writer)?;
            }
        }
        writer.end_array()?.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

fn default_height() -> i32 {
    8
}

fn default_size() -> f32 {
    11.0
}

fn default_oversample() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_provider(provider: &FontProvider) -> String {
        let mut writer = JsonWriter::new();
        provider.write(&mut writer).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn bitmap_provider() {
        let provider = FontProvider::Bitmap(BitmapProvider::new(
            Key::new("creative", "test").unwrap(),
            16,
            8,
            vec!["µŋ".to_owned(), "tm".to_owned()],
        ));
        assert_eq!(
            encode_provider(&provider),
            r#"{"type":"bitmap","file":"creative:test","height":16,"ascent":8,"chars":["µŋ","tm"]}"#
        );
    }

    #[test]
    fn providers_are_version_gated() {
        let data = r#"{"providers":[{"type":"space","advances":{" ":4,"\u200c":0}},{"type":"reference","id":"minecraft:include/default"},{"type":"unihex","hex_file":"minecraft:font/unifont.zip","size_overrides":[{"from":"、","to":"ヿ","left":0,"right":15}]}]}"#;
        let font = Font::decode(data.as_bytes()).unwrap();
        assert_eq!(font.providers.len(), 3);
        assert_eq!(
            String::from_utf8(font.encode(8).unwrap()).unwrap(),
            r#"{"providers":[]}"#
        );
        assert_eq!(
            String::from_utf8(font.encode(9).unwrap()).unwrap(),
            "{\"providers\":[{\"type\":\"space\",\"advances\":{\" \":4,\"\u{200c}\":0}}]}"
        );
        assert_eq!(Font::decode(&font.encode(15).unwrap()).unwrap(), font);
    }

    #[test]
    fn ttf_skip_accepts_string() {
        let font = Font::decode(
            br#"{"providers":[{"type":"minecraft:ttf","file":"ns:a.ttf","size":9.5,"skip":"abc"}]}"#,
        )
        .unwrap();
        let FontProvider::Ttf(provider) = &font.providers[0] else {
            panic!("expected ttf provider");
        };
        assert_eq!(provider.skip, vec!["abc".to_owned()]);
        assert_eq!(
            String::from_utf8(font.encode(1).unwrap()).unwrap(),
            r#"{"providers":[{"type":"ttf","file":"ns:a.ttf","size":9.5,"skip":["abc"]}]}"#
        );
    }

    #[test]
    fn unknown_provider_is_kept() {
        let data = br#"{"providers":[{"type":"legacy_unicode","sizes":"minecraft:font/glyph_sizes.bin","template":"minecraft:font/unicode_page_%s.png"}]}"#;
        let font = Font::decode(data).unwrap();
        assert!(matches!(font.providers[0], FontProvider::Unknown(_)));
        assert_eq!(font.encode(1).unwrap(), data.to_vec());
    }
}
