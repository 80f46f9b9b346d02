//! The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use types::{BigEndian, FixedSize, GlyphId16, Tag};

use crate::{FontData, FontReadWithArgs, ReadError, TopLevelTable};

/// A `longHorMetric` record.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct LongMetric {
    pub advance: BigEndian<u16>,
    pub side_bearing: BigEndian<i16>,
}

impl FixedSize for LongMetric {
    const RAW_BYTE_LEN: usize = 4;
}

/// The horizontal metrics table.
#[derive(Clone, Debug)]
pub struct Hmtx<'a> {
    h_metrics: &'a [LongMetric],
    left_side_bearings: &'a [BigEndian<i16>],
}

impl TopLevelTable for Hmtx<'_> {
    const TAG: Tag = Tag::new(b"hmtx");
}

impl<'a> FontReadWithArgs<'a> for Hmtx<'a> {
    /// `(number_of_h_metrics, num_glyphs)`
    type Args = (u16, u16);

    fn read_with_args(data: FontData<'a>, args: &(u16, u16)) -> Result<Self, ReadError> {
        let (number_of_h_metrics, num_glyphs) = *args;
        if number_of_h_metrics == 0 && num_glyphs > 0 {
            return Err(ReadError::MalformedData("hmtx has no long metrics"));
        }
        let mut cursor = data.cursor();
        let h_metrics = cursor.read_array(number_of_h_metrics as usize)?;
        let lsb_count = num_glyphs.saturating_sub(number_of_h_metrics);
        let left_side_bearings = cursor.read_array(lsb_count as usize)?;
        Ok(Hmtx {
            h_metrics,
            left_side_bearings,
        })
    }
}

impl<'a> Hmtx<'a> {
    pub fn h_metrics(&self) -> &'a [LongMetric] {
        self.h_metrics
    }

    /// Returns the advance width for the given glyph.
    ///
    /// Glyphs past the end of the long metrics share the last advance.
    pub fn advance(&self, glyph_id: GlyphId16) -> Option<u16> {
        let ix = glyph_id.to_u16() as usize;
        if ix >= self.h_metrics.len() + self.left_side_bearings.len() {
            return None;
        }
        self.h_metrics
            .get(ix)
            .or_else(|| self.h_metrics.last())
            .map(|metric| metric.advance.get())
    }

    /// Returns the left side bearing for the given glyph.
    pub fn side_bearing(&self, glyph_id: GlyphId16) -> Option<i16> {
        let ix = glyph_id.to_u16() as usize;
        match self.h_metrics.get(ix) {
            Some(metric) => Some(metric.side_bearing.get()),
            None => self
                .left_side_bearings
                .get(ix - self.h_metrics.len())
                .map(|lsb| lsb.get()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::bebuffer::BeBuffer;

    #[test]
    fn trailing_glyphs_share_last_advance() {
        let buf = BeBuffer::new()
            .extend([500u16, 10, 600, 20])
            .extend([30i16, 40]);
        let hmtx = Hmtx::read_with_args(FontData::new(&buf), &(2, 4)).unwrap();
        assert_eq!(hmtx.advance(GlyphId16::new(0)), Some(500));
        assert_eq!(hmtx.advance(GlyphId16::new(1)), Some(600));
        assert_eq!(hmtx.advance(GlyphId16::new(3)), Some(600));
        assert_eq!(hmtx.advance(GlyphId16::new(4)), None);
        assert_eq!(hmtx.side_bearing(GlyphId16::new(1)), Some(20));
        assert_eq!(hmtx.side_bearing(GlyphId16::new(3)), Some(40));
    }

    #[test]
    fn counts_past_end_of_data() {
        let buf = BeBuffer::new().extend([500u16, 10]);
        assert!(matches!(
            Hmtx::read_with_args(FontData::new(&buf), &(2, 2)),
            Err(ReadError::OutOfBounds)
        ));
    }
}
