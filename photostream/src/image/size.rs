//! Size variants an image resource may expose.

use std::fmt;
use std::str::FromStr;

/// Resolution tier of an image artifact.
///
/// Variants are ordered by pixel dimension, smallest first. Each variant is
/// fetched and cached independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ImageSize {
    Thumbnail,
    Small,
    Medium,
    Large,
    ExtraLarge,
    #[default]
    Original,
}

impl ImageSize {
    /// All size variants, smallest first.
    pub const ALL: [ImageSize; 6] = [
        ImageSize::Thumbnail,
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Large,
        ImageSize::ExtraLarge,
        ImageSize::Original,
    ];

    /// Stable lowercase name, used in cache keys and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Thumbnail => "thumbnail",
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::ExtraLarge => "extra-large",
            ImageSize::Original => "original",
        }
    }

    /// Position of this variant in [`ImageSize::ALL`].
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown size name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown image size: {0}")]
pub struct ParseImageSizeError(String);

impl FromStr for ImageSize {
    type Err = ParseImageSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thumbnail" | "thumb" => Ok(ImageSize::Thumbnail),
            "small" => Ok(ImageSize::Small),
            "medium" => Ok(ImageSize::Medium),
            "large" => Ok(ImageSize::Large),
            "extra-large" | "extralarge" | "xl" => Ok(ImageSize::ExtraLarge),
            "original" => Ok(ImageSize::Original),
            _ => Err(ParseImageSizeError(s.to_string())),
        }
    }
}
