//! GSUB test data
//!
//! Most of these are the examples from the [GSUB chapter](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub).

use crate::{be_buffer, bebuffer::BeBuffer};

// https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-2-singlesubstformat1-subtable
pub fn singlesubstformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // substFormat
        6u16,                   // coverageOffset
        192u16,                 // deltaGlyphID
        // LowercaseCoverage @6
        1u16,
        3u16,
        [0x3Cu16, 0x40, 0x4B]
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-3-singlesubstformat2-subtable
pub fn singlesubstformat2() -> BeBuffer {
    be_buffer! {
        2u16,                   // substFormat
        14u16,                  // coverageOffset
        4u16,                   // glyphCount
        [305u16, 309, 318, 323],
        // PrimeCoverage @14
        1u16,
        4u16,
        [0x4Fu16, 0x52, 0x58, 0x7D]
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-4-multiplesubstformat1-subtable
pub fn multiplesubstformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // substFormat
        8u16,                   // coverageOffset
        1u16,                   // sequenceCount
        14u16,                  // sequenceOffsets[0]
        // Coverage @8
        1u16, 1u16, 0xF1u16,
        // Sequence @14
        3u16,
        [26u16, 26, 29]
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-5-alternatesubstformat-1-subtable
pub fn alternatesubstformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // substFormat
        8u16,                   // coverageOffset
        1u16,                   // alternateSetCount
        14u16,                  // alternateSetOffsets[0]
        // Coverage @8
        1u16, 1u16, 0x3Au16,
        // AlternateSet @14
        2u16,
        [0xC9u16, 0xCA]
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/gsub#example-6-ligaturesubstformat1-subtable
pub fn ligaturesubstformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // substFormat
        10u16,                  // coverageOffset
        2u16,                   // ligatureSetCount
        [18u16, 30],            // ligatureSetOffsets
        // Coverage @10
        1u16, 2u16, [0x19u16, 0x1A],

        // LigatureSet 0 @18
        1u16,
        4u16,
        // "etc" ligature @22
        347u16,                 // ligatureGlyph
        3u16,                   // componentCount
        [0x28u16, 0x17],

        // LigatureSet 1 @30
        2u16,
        [6u16, 14],
        // @36
        0xF1u16, 3u16, [0x1Au16, 0x1D],
        // @44
        0xF0u16, 2u16, 0x1Du16
    }
}

pub fn reversechainsinglesubstformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // substFormat
        14u16,                  // coverageOffset
        1u16,                   // backtrackGlyphCount
        20u16,                  // backtrackCoverageOffsets[0]
        0u16,                   // lookaheadGlyphCount
        1u16,                   // glyphCount
        0x3Au16,                // substituteGlyphIDs
        // Coverage @14
        1u16, 1u16, 0x3Bu16,
        // backtrack coverage @20
        1u16, 1u16, 0x3Cu16
    }
}
