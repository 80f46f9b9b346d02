//! OpenType features.

use types::{BigEndian, FixedSize, Offset16, Tag};

use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// A record in the [`FeatureList`].
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct FeatureRecord {
    pub feature_tag: BigEndian<Tag>,
    pub feature_offset: BigEndian<Offset16>,
}

impl FixedSize for FeatureRecord {
    const RAW_BYTE_LEN: usize = 6;
}

impl FeatureRecord {
    pub fn feature_tag(&self) -> Tag {
        self.feature_tag.get()
    }
}

/// An element paired with its tag.
#[derive(Clone, Copy, Debug)]
pub struct TaggedElement<T> {
    pub tag: Tag,
    pub element: T,
}

impl<T> std::ops::Deref for TaggedElement<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.element
    }
}

/// A [FeatureList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-list-table) table.
#[derive(Clone, Debug)]
pub struct FeatureList<'a> {
    feature_records: &'a [FeatureRecord],
    features: Vec<Feature<'a>>,
}

impl<'a> FontRead<'a> for FeatureList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let feature_count: u16 = cursor.read()?;
        let feature_records: &[FeatureRecord] = cursor.read_array(feature_count as usize)?;
        let features = feature_records
            .iter()
            .map(|record| record.feature_offset.get().resolve(data))
            .collect::<Result<_, _>>()?;
        Ok(FeatureList {
            feature_records,
            features,
        })
    }
}

impl<'a> FeatureList<'a> {
    pub fn feature_count(&self) -> u16 {
        self.feature_records.len() as u16
    }

    pub fn feature_records(&self) -> &'a [FeatureRecord] {
        self.feature_records
    }

    /// Returns the tag and feature at the given index.
    pub fn get(&self, index: u16) -> Option<TaggedElement<&Feature<'a>>> {
        let record = self.feature_records.get(index as usize)?;
        let element = self.features.get(index as usize)?;
        Some(TaggedElement {
            tag: record.feature_tag(),
            element,
        })
    }
}

/// A [Feature](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-table) table.
///
/// Feature parameters are not parsed.
#[derive(Clone, Debug)]
pub struct Feature<'a> {
    feature_params_offset: Offset16,
    lookup_list_indices: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Feature<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let feature_params_offset = cursor.read()?;
        let lookup_index_count: u16 = cursor.read()?;
        Ok(Feature {
            feature_params_offset,
            lookup_list_indices: cursor.read_array(lookup_index_count as usize)?,
        })
    }
}

impl<'a> Feature<'a> {
    pub fn feature_params_offset(&self) -> Offset16 {
        self.feature_params_offset
    }

    pub fn lookup_list_indices(&self) -> &'a [BigEndian<u16>] {
        self.lookup_list_indices
    }
}
