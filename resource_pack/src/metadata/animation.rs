use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{metadata::Section, writer::JsonWriter, Result};

/// Block, item, particle, painting, item frame, and status effect icon
/// textures support animation by placing each additional frame below the
/// last. The animation is then controlled using a .mcmeta file with the same
/// name and .png at the end of the filename, in the same directory.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnimationMeta {
    /// If true, additional frames are generated between frames with a frame
    /// time greater than 1 between them. Defaults to false.
    #[serde(default)]
    pub interpolate: bool,

    /// The width of the tile, as a direct ratio rather than in pixels.
    #[serde(default)]
    pub width: Option<u32>,

    /// The height of the tile, as a direct ratio rather than in pixels.
    #[serde(default)]
    pub height: Option<u32>,

    /// Sets the default time for each frame in increments of one game tick.
    /// Defaults to 1.
    #[serde(default = "default_1")]
    pub frametime: u32,

    /// Contains a list of frames. Defaults to displaying all the frames from
    /// top to bottom.
    #[serde(default)]
    pub frames: Vec<Frame>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Frame {
    /// A number corresponding to position of a frame from the top, with the top
    /// frame being 0.
    Index(u32),
    /// A frame with its own time in ticks, overriding `frametime`.
    IndexTime { index: u32, time: u32 },
}

impl Default for AnimationMeta {
    fn default() -> Self {
        Self {
            interpolate: false,
            width: None,
            height: None,
            frametime: 1,
            frames: vec![],
            extra: Map::new(),
        }
    }
}

impl Section for AnimationMeta {
    const NAME: &'static str = "animation";

    fn write(&self, _version: u32, writer: &mut JsonWriter) -> Result<()> {
        writer.begin_object()?;
        if self.interpolate {
            writer.key("interpolate")?.bool(true)?;
        }
        if let Some(width) = self.width {
            writer.key("width")?.uint(width as u64)?;
        }
        if let Some(height) = self.height {
            writer.key("height")?.uint(height as u64)?;
        }
        if self.frametime != 1 {
            writer.key("frametime")?.uint(self.frametime as u64)?;
        }
        if !self.frames.is_empty() {
            writer.key("frames")?.begin_array()?;
            for frame in self.frames.iter() {
                match *frame {
                    Frame::Index(index) => {
                        writer.uint(index as u64)?;
                    }
                    Frame::IndexTime { index, time } => {
                        writer
                            .begin_object()?
                            .key("index")?
                            .uint(index as u64)?
                            .key("time")?
                            .uint(time as u64)?
                            .end_object()?;
                    }
                }
            }
            writer.end_array()?;
        }
        writer.extra(&self.extra)?.end_object()?;
        Ok(())
    }
}

fn default_1() -> u32 {
    1
}
