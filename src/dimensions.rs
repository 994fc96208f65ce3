//! Variant dimensions attached to an upload.
//!
//! An upload carries one [`ImageDimensions`]: an optional size floor plus the
//! ordered list of [`FormatDimensions`] to derive. Each format entry becomes
//! one output file named `<source path>:<format name>`.
//!
//! ```toml
//! min_width = 400
//!
//! [[formats]]
//! name = "thumb"
//! width = 200
//! height = 200
//!
//! [[formats]]
//! name = "cover"
//! width = 1200
//! height = 630
//! backdrop = true
//! watermark = { horizontal = "right", vertical = "bottom", offset_x = 16, offset_y = 16 }
//! ```

use serde::{Deserialize, Serialize};

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Size floor and requested variants for one upload.
///
/// `None` for either floor is the no-limit sentinel: that axis is never
/// checked, even when the caller asks for enforcement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageDimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    pub formats: Vec<FormatDimensions>,
}

impl ImageDimensions {
    /// No floor, no formats. Used when an upload arrives without dimensions.
    pub fn no_limit() -> Self {
        Self::default()
    }

    /// Whether any entry would produce output.
    pub fn has_renderable_formats(&self) -> bool {
        self.formats.iter().any(FormatDimensions::is_renderable)
    }
}

/// One output variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatDimensions {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Fit the image over a backdrop instead of cropping it (portrait and
    /// square sources only).
    pub backdrop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<WatermarkPosition>,
}

impl FormatDimensions {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_backdrop(mut self) -> Self {
        self.backdrop = true;
        self
    }

    pub fn with_watermark(mut self, position: WatermarkPosition) -> Self {
        self.watermark = Some(position);
        self
    }

    /// Entries without a name or with a zero side produce no output.
    pub fn is_renderable(&self) -> bool {
        !self.name.is_empty() && self.width > 0 && self.height > 0
    }
}

/// Horizontal anchor for a watermark. Unrecognized names read as `Left`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Horizontal {
    #[default]
    Left,
    Right,
    Center,
}

impl From<&str> for Horizontal {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "right" => Self::Right,
            "center" | "centre" => Self::Center,
            _ => Self::Left,
        }
    }
}

impl From<String> for Horizontal {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Vertical anchor for a watermark. Unrecognized names read as `Top`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Vertical {
    #[default]
    Top,
    Bottom,
    Center,
}

impl From<&str> for Vertical {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "bottom" => Self::Bottom,
            "center" | "centre" => Self::Center,
            _ => Self::Top,
        }
    }
}

impl From<String> for Vertical {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Anchor plus offset for placing a watermark on a variant.
///
/// Offsets move the watermark away from the anchored edge (towards the
/// middle for `Right`/`Bottom`), and to the right/down for `Center`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkPosition {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl WatermarkPosition {
    pub const TOP_LEFT: Self = Self::anchored(Horizontal::Left, Vertical::Top);
    pub const TOP_CENTER: Self = Self::anchored(Horizontal::Center, Vertical::Top);
    pub const TOP_RIGHT: Self = Self::anchored(Horizontal::Right, Vertical::Top);
    pub const CENTER_RIGHT: Self = Self::anchored(Horizontal::Right, Vertical::Center);
    pub const BOTTOM_RIGHT: Self = Self::anchored(Horizontal::Right, Vertical::Bottom);
    pub const BOTTOM_CENTER: Self = Self::anchored(Horizontal::Center, Vertical::Bottom);
    pub const BOTTOM_LEFT: Self = Self::anchored(Horizontal::Left, Vertical::Bottom);
    pub const CENTER_LEFT: Self = Self::anchored(Horizontal::Left, Vertical::Center);

    pub const fn anchored(horizontal: Horizontal, vertical: Vertical) -> Self {
        Self {
            horizontal,
            vertical,
            offset_x: 0,
            offset_y: 0,
        }
    }

    pub const fn offset(mut self, x: i32, y: i32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }
}
