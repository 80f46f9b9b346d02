//! OpenType shaping and text layout.
//!
//! Typeset sits above [`read-fonts`](read_fonts), which parses and validates
//! the font tables, and turns a string into positioned glyphs:
//!
//! - [`Font`] loads the metric, `cmap` and layout tables of a font once and
//!   can then be shared by any number of layout calls.
//! - The [`shaping`] module applies the `GSUB` and `GPOS` lookups selected
//!   for a script, language and feature set to a [`GlyphCollection`].
//! - The [`text`] module segments text into runs, shapes each run, breaks it
//!   into lines and aligns the result, producing [`GlyphLayout`]s that can be
//!   measured or handed to a [`GlyphRenderer`].
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use typeset::{Font, FontStack, TextMeasurer, TextOptions};
//!
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = Font::new(&font_bytes).unwrap();
//! let fonts = FontStack::new(&font);
//! let options = TextOptions {
//!     font_size: 16.0,
//!     wrapping_width: 300.0,
//!     ..Default::default()
//! };
//! let size = TextMeasurer::new().measure("Hello, world", &fonts, &options);
//! println!("{} x {}", size.width, size.height);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]

/// Expose our "raw" underlying parser crate.
pub extern crate read_fonts as raw;

pub mod shaping;
pub mod text;

mod collection;
mod error;
mod font;
mod geometry;

pub use collection::{Attachment, GlyphCollection, GlyphEntry, GlyphPosition};
pub use error::Error;
pub use font::{Font, FontMetrics};
pub use geometry::{Point, Rect, Size};
pub use text::{
    FontStack, GlyphBounds, GlyphLayout, GlyphRenderParams, GlyphRenderer, HorizontalAlignment,
    TextLayout, TextMeasurer, TextOptions, TextRenderer, VerticalAlignment,
};

/// Type for a glyph identifier.
pub type GlyphId = read_fonts::types::GlyphId16;

/// Type for a 4-byte tag used to identify scripts, languages and features.
pub type Tag = read_fonts::types::Tag;
