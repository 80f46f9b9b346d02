//! Layout configuration.

use crate::{shaping::ShapeOptions, Point, Tag};

/// Where each line sits within the wrapping width.
///
/// Without a wrapping width lines are aligned around the origin: centered
/// lines straddle it and right aligned lines end at it.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Where the block of lines sits relative to the origin.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Options for a layout call.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TextOptions {
    /// The em size in points.
    pub font_size: f32,
    /// Horizontal and vertical resolution.
    pub dpi: (f32, f32),
    /// The maximum line width in pixels; 0 disables wrapping.
    pub wrapping_width: f32,
    /// The distance between tab stops, in multiples of the width of a
    /// space. A tab width of 0 makes tabs zero width.
    pub tab_width: u32,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    /// A multiplier for the height of every line.
    pub line_spacing: f32,
    /// Extra space in points after every glyph with a nonzero advance.
    pub letter_spacing: f32,
    /// The position of the text block in pixels.
    pub origin: Point,
    /// Layout features to enable. When empty, the default features are used.
    pub enabled_features: Vec<Tag>,
    /// An OpenType script tag to use instead of the one derived from the
    /// text.
    pub script: Option<Tag>,
    /// An OpenType language system tag.
    pub language: Option<Tag>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            dpi: (72.0, 72.0),
            wrapping_width: 0.0,
            tab_width: 4,
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            line_spacing: 1.0,
            letter_spacing: 0.0,
            origin: Point::ZERO,
            enabled_features: Vec::new(),
            script: None,
            language: None,
        }
    }
}

impl TextOptions {
    /// Pixels per point on each axis.
    pub fn pixels_per_point(&self) -> (f32, f32) {
        (self.dpi.0 / 72.0, self.dpi.1 / 72.0)
    }

    /// The wrapping width in points, or 0 if wrapping is disabled.
    pub(crate) fn wrapping_width_points(&self) -> f32 {
        let (sx, _) = self.pixels_per_point();
        if self.wrapping_width > 0.0 && sx > 0.0 {
            self.wrapping_width / sx
        } else {
            0.0
        }
    }

    /// The origin in points.
    pub(crate) fn origin_points(&self) -> Point {
        let (sx, sy) = self.pixels_per_point();
        Point::new(
            if sx > 0.0 { self.origin.x / sx } else { 0.0 },
            if sy > 0.0 { self.origin.y / sy } else { 0.0 },
        )
    }

    pub(crate) fn shape_options(&self) -> ShapeOptions {
        ShapeOptions {
            script: self.script,
            language: self.language,
            features: self.enabled_features.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversions() {
        let options = TextOptions {
            dpi: (144.0, 96.0),
            wrapping_width: 200.0,
            origin: Point::new(20.0, 40.0),
            ..Default::default()
        };
        assert_eq!(options.pixels_per_point(), (2.0, 96.0 / 72.0));
        assert_eq!(options.wrapping_width_points(), 100.0);
        assert_eq!(options.origin_points().x, 10.0);
        assert_eq!(TextOptions::default().wrapping_width_points(), 0.0);
    }

    #[test]
    fn shape_options_carry_overrides() {
        let options = TextOptions {
            enabled_features: vec![Tag::new(b"smcp")],
            language: Some(Tag::new(b"TRK ")),
            ..Default::default()
        };
        let shape = options.shape_options();
        assert_eq!(shape.features, [Tag::new(b"smcp")]);
        assert_eq!(shape.language, Some(Tag::new(b"TRK ")));
        assert_eq!(shape.script, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial_options() {
        let options: TextOptions = serde_json::from_str(
            r#"{
                "font_size": 20.0,
                "horizontal_alignment": "center",
                "enabled_features": ["liga", "kern"]
            }"#,
        )
        .unwrap();
        assert_eq!(options.font_size, 20.0);
        assert_eq!(options.horizontal_alignment, HorizontalAlignment::Center);
        assert_eq!(options.enabled_features, [Tag::new(b"liga"), Tag::new(b"kern")]);
        assert_eq!(options.tab_width, 4);
        let json = serde_json::to_string(&options).unwrap();
        let back: TextOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
