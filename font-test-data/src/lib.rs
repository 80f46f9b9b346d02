//! test data shared between the typeset crates.

pub mod bebuffer;
pub mod font_builder;
pub mod gdef;
pub mod gpos;
pub mod gsub;
pub mod layout;

pub use font_builder::FontBuilder;
