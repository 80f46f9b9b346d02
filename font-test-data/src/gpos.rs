//! GPOS test data
//!
//! Several of these follow the examples in the [GPOS chapter](https://learn.microsoft.com/en-us/typography/opentype/spec/gpos).

use crate::{be_buffer, bebuffer::BeBuffer};

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-2-singleposformat1-subtable
pub fn singleposformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // posFormat
        8u16,                   // coverageOffset
        0x0002u16,              // valueFormat: Y_PLACEMENT
        (-80i16),               // valueRecord
        // Coverage @8
        1u16, 2u16, [0x4Fu16, 0x125]
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-3-singleposformat2-subtable
pub fn singleposformat2() -> BeBuffer {
    be_buffer! {
        2u16,                   // posFormat
        20u16,                  // coverageOffset
        0x0005u16,              // valueFormat: X_PLACEMENT | X_ADVANCE
        3u16,                   // valueCount
        [10i16, 20],
        [30i16, 36],
        [40i16, 40],
        // Coverage @20
        1u16, 3u16, [0x4Fu16, 0x51, 0x52]
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-4-pairposformat1-subtable
pub fn pairposformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // posFormat
        12u16,                  // coverageOffset
        0x0004u16,              // valueFormat1: X_ADVANCE
        0x0001u16,              // valueFormat2: X_PLACEMENT
        1u16,                   // pairSetCount
        18u16,                  // pairSetOffsets[0]
        // Coverage @12
        1u16, 1u16, 0x52u16,
        // PairSet @18
        2u16,                   // pairValueCount
        0x59u16, (-30i16), (-20i16),
        0x5Bu16, (-40i16), (-25i16)
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-5-pairposformat2-subtable
pub fn pairposformat2() -> BeBuffer {
    be_buffer! {
        2u16,                   // posFormat
        24u16,                  // coverageOffset
        0x0001u16,              // valueFormat1: X_PLACEMENT
        0u16,                   // valueFormat2
        30u16,                  // classDef1Offset
        40u16,                  // classDef2Offset
        2u16,                   // class1Count
        2u16,                   // class2Count
        // class1 0
        [0i16, 0],
        // class1 1
        0i16, (-50i16),
        // Coverage @24
        1u16, 1u16, 0x6Au16,
        // ClassDef1 @30
        2u16, 1u16, [0x6Au16, 0x6A, 1],
        // ClassDef2 @40
        2u16, 1u16, [0x6Bu16, 0x6B, 1]
    }
}

pub fn cursiveposformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // posFormat
        10u16,                  // coverageOffset
        1u16,                   // entryExitCount
        16u16,                  // entryAnchorOffset
        0u16,                   // exitAnchorOffset
        // Coverage @10
        1u16, 1u16, 0x203u16,
        // entry anchor @16
        1u16, 0x5DCi16, 0x2Ci16
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/gpos#example-7-markbaseposformat1-subtable
pub fn markbaseposformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // posFormat
        12u16,                  // markCoverageOffset
        20u16,                  // baseCoverageOffset
        2u16,                   // markClassCount
        26u16,                  // markArrayOffset
        48u16,                  // baseArrayOffset
        // MarkCoverage @12
        1u16, 2u16, [0x333u16, 0x334],
        // BaseCoverage @20
        1u16, 1u16, 0x76u16,

        // MarkArray @26
        2u16,                   // markCount
        0u16, 10u16,            // class 0
        1u16, 16u16,            // class 1
        1u16, 0x15Ai16, 0x697i16,
        1u16, 0x159i16, 0x69Ai16,

        // BaseArray @48
        1u16,                   // baseCount
        [6u16, 12],             // baseAnchorOffsets
        1u16, 0x3E8i16, 0x1C2i16,
        1u16, 0x3E8i16, 0x10i16
    }
}

/// A two component ligature with one mark class.
pub fn markligposformat1() -> BeBuffer {
    be_buffer! {
        1u16,                   // posFormat
        12u16,                  // markCoverageOffset
        18u16,                  // ligatureCoverageOffset
        1u16,                   // markClassCount
        24u16,                  // markArrayOffset
        36u16,                  // ligatureArrayOffset
        // MarkCoverage @12
        1u16, 1u16, 0x60u16,
        // LigatureCoverage @18
        1u16, 1u16, 0x50u16,

        // MarkArray @24
        1u16,
        0u16, 6u16,
        1u16, 100i16, 600i16,

        // LigatureArray @36
        1u16,
        4u16,
        // LigatureAttach @40
        2u16,                   // componentCount
        [6u16, 12],
        1u16, 200i16, 500i16,
        1u16, 700i16, 500i16
    }
}
