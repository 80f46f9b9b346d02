//! The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use types::{FWord, MajorMinor, Tag, UfWord};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The horizontal header table.
#[derive(Clone, Debug)]
pub struct Hhea<'a> {
    data: FontData<'a>,
    version: MajorMinor,
    ascender: FWord,
    descender: FWord,
    line_gap: FWord,
    advance_width_max: UfWord,
    number_of_h_metrics: u16,
}

impl TopLevelTable for Hhea<'_> {
    const TAG: Tag = Tag::new(b"hhea");
}

impl<'a> FontRead<'a> for Hhea<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let ascender = cursor.read()?;
        let descender = cursor.read()?;
        let line_gap = cursor.read()?;
        let advance_width_max = cursor.read()?;
        // minLeftSideBearing, minRightSideBearing, xMaxExtent, caretSlopeRise,
        // caretSlopeRun, caretOffset, 4 reserved, metricDataFormat
        cursor.advance_by(11 * 2);
        let number_of_h_metrics = cursor.read()?;
        Ok(Hhea {
            data,
            version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            number_of_h_metrics,
        })
    }
}

impl<'a> Hhea<'a> {
    pub fn version(&self) -> MajorMinor {
        self.version
    }

    /// Typographic ascent.
    pub fn ascender(&self) -> FWord {
        self.ascender
    }

    /// Typographic descent; negative below the baseline.
    pub fn descender(&self) -> FWord {
        self.descender
    }

    /// Typographic line gap.
    pub fn line_gap(&self) -> FWord {
        self.line_gap
    }

    pub fn advance_width_max(&self) -> UfWord {
        self.advance_width_max
    }

    /// Number of long metrics in the `hmtx` table.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }

    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn read_hhea() {
        let buf = BeBuffer::new()
            .push(MajorMinor::VERSION_1_0)
            .extend([2189i16, -600, 0])
            .push(2470u16)
            .extend([0i16; 11])
            .push(3u16);
        let hhea = Hhea::read(FontData::new(&buf)).unwrap();
        assert_eq!(hhea.ascender().to_i16(), 2189);
        assert_eq!(hhea.descender().to_i16(), -600);
        assert_eq!(hhea.line_gap().to_i16(), 0);
        assert_eq!(hhea.advance_width_max().to_u16(), 2470);
        assert_eq!(hhea.number_of_h_metrics(), 3);
    }

    #[test]
    fn truncated() {
        let buf = BeBuffer::new().push(MajorMinor::VERSION_1_0).push(1i16);
        assert!(Hhea::read(FontData::new(&buf)).is_err());
    }
}
