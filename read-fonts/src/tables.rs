//! The various font tables

pub mod cmap;
pub mod colr;
pub mod gdef;
pub mod gpos;
pub mod gsub;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod layout;
pub mod maxp;
