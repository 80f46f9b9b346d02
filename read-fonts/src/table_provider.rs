//! a trait for things that can serve font tables

use types::Tag;

use crate::{tables, FontData, FontRead, FontReadWithArgs, ReadError};

/// A table that has an associated tag.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: Tag;
}

/// An interface for accessing tables from a font (or font-like object)
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag).ok_or(ReadError::TableIsMissing(tag))
    }

    /// Read the table with the given type's tag.
    fn expect_table<T: TopLevelTable + FontRead<'a>>(&self) -> Result<T, ReadError> {
        self.expect_data_for_tag(T::TAG).and_then(FontRead::read)
    }

    fn head(&self) -> Result<tables::head::Head<'a>, ReadError> {
        self.expect_table()
    }

    fn hhea(&self) -> Result<tables::hhea::Hhea<'a>, ReadError> {
        self.expect_table()
    }

    fn maxp(&self) -> Result<tables::maxp::Maxp<'a>, ReadError> {
        self.expect_table()
    }

    fn hmtx(&self) -> Result<tables::hmtx::Hmtx<'a>, ReadError> {
        let num_glyphs = self.maxp().map(|maxp| maxp.num_glyphs())?;
        let number_of_h_metrics = self.hhea().map(|hhea| hhea.number_of_h_metrics())?;
        self.expect_data_for_tag(tables::hmtx::Hmtx::TAG)
            .and_then(|data| {
                FontReadWithArgs::read_with_args(data, &(number_of_h_metrics, num_glyphs))
            })
    }

    fn cmap(&self) -> Result<tables::cmap::Cmap<'a>, ReadError> {
        self.expect_table()
    }

    fn colr(&self) -> Result<tables::colr::Colr<'a>, ReadError> {
        self.expect_table()
    }

    fn gdef(&self) -> Result<tables::gdef::Gdef<'a>, ReadError> {
        self.expect_table()
    }

    fn gsub(&self) -> Result<tables::gsub::Gsub<'a>, ReadError> {
        self.expect_table()
    }

    fn gpos(&self) -> Result<tables::gpos::Gpos<'a>, ReadError> {
        self.expect_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyProvider;

    impl<'a> TableProvider<'a> for EmptyProvider {
        fn data_for_tag(&self, _tag: Tag) -> Option<FontData<'a>> {
            None
        }
    }

    #[test]
    fn missing_tables_are_reported_by_tag() {
        let provider = EmptyProvider;
        assert!(matches!(
            provider.gsub(),
            Err(ReadError::TableIsMissing(tag)) if tag == Tag::new(b"GSUB")
        ));
        // hmtx requires maxp first
        assert!(matches!(
            provider.hmtx(),
            Err(ReadError::TableIsMissing(tag)) if tag == Tag::new(b"maxp")
        ));
    }
}
