//! GDEF test data

use crate::{be_buffer, bebuffer::BeBuffer};

/// A version 1.2 table with glyph classes, mark attachment classes, and a
/// single mark glyph set.
///
/// - glyphs 1 and 2 are bases, 3 and 4 ligatures, 5 and 6 marks
/// - mark 5 has attachment class 1, mark 6 class 2
/// - mark glyph set 0 contains only glyph 6
pub fn gdef_with_classes() -> BeBuffer {
    be_buffer! {
        1u16, 2u16,             // version
        14u16,                  // glyphClassDefOffset
        0u16,                   // attachListOffset
        0u16,                   // ligCaretListOffset
        36u16,                  // markAttachClassDefOffset
        46u16,                  // markGlyphSetsDefOffset

        // GlyphClassDef @14
        2u16,                   // format
        3u16,                   // classRangeCount
        [1u16, 2, 1],
        [3u16, 4, 2],
        [5u16, 6, 3],

        // MarkAttachClassDef @36
        1u16,                   // format
        5u16,                   // startGlyphID
        2u16,                   // glyphCount
        [1u16, 2],

        // MarkGlyphSets @46
        1u16,                   // format
        1u16,                   // markGlyphSetCount
        8u32,                   // coverageOffsets[0]
        // @54
        1u16, 1u16, 6u16
    }
}
