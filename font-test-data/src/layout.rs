//! common layout test data: scripts, features and lookups

use crate::{be_buffer, bebuffer::BeBuffer};
use font_types::Tag;

// https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#example-1-scriptlist-table-and-scriptrecords
pub fn scripts() -> BeBuffer {
    be_buffer! {
        3u16,                   // scriptCount
        (Tag::new(b"hani")),
        20u16,                  // scriptOffset
        (Tag::new(b"kana")),
        32u16,
        (Tag::new(b"latn")),
        44u16,

        // HanIdeographicScript @20
        4u16,                   // defaultLangSysOffset
        0u16,                   // langSysCount
        0u16,                   // lookupOrderOffset
        0xFFFFu16,              // requiredFeatureIndex
        1u16,                   // featureIndexCount
        0u16,

        // KanaScript @32
        4u16, 0u16,
        0u16, 0xFFFFu16, 1u16, 1u16,

        // LatinScript @44
        4u16, 0u16,
        0u16, 0xFFFFu16, 1u16, 2u16
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#example-2-script-table-langsysrecord-and-langsys-table
pub fn scripts_and_languages() -> BeBuffer {
    be_buffer! {
        10u16,                  // defaultLangSysOffset
        1u16,                   // langSysCount
        (Tag::new(b"URD ")),
        22u16,                  // langSysOffset

        // DefLangSys @10
        0u16,                   // lookupOrderOffset
        0xFFFFu16,              // requiredFeatureIndex
        3u16,                   // featureIndexCount
        [0u16, 1, 2],

        // UrduLangSys @22
        0u16,
        3u16,                   // requiredFeatureIndex
        3u16,
        [0u16, 1, 2]
    }
}

// https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#example-3-featurelist-table-and-feature-table
pub fn featurelist_and_feature() -> BeBuffer {
    be_buffer! {
        3u16,                   // featureCount
        (Tag::new(b"liga")),
        20u16,                  // TurkishLigatures
        (Tag::new(b"liga")),
        26u16,                  // DeutschLigatures
        (Tag::new(b"liga")),
        34u16,                  // DefaultLigatures

        // TurkishLigatures @20
        0u16,                   // featureParamsOffset
        1u16,                   // lookupIndexCount
        0u16,

        // DeutschLigatures @26
        0u16, 2u16, [0u16, 1],

        // DefaultLigatures @34
        0u16, 1u16, 1u16
    }
}

/// Two lookups, the second of which goes through an extension subtable.
///
/// Subtables are a format word followed by a single value.
pub fn lookup_list_with_extension() -> BeBuffer {
    be_buffer! {
        2u16,                   // lookupCount
        [6u16, 18],             // lookupOffsets

        // lookup 0 @6
        1u16,                   // lookupType
        0u16,                   // lookupFlag
        1u16,                   // subTableCount
        8u16,
        // subtable @14
        1u16, 0xABu16,

        // lookup 1 @18
        7u16,                   // extension
        0x0018u16,              // ignore marks, use mark filtering set
        1u16,
        10u16,
        2u16,                   // markFilteringSet
        // extension @28
        1u16,                   // format
        1u16,                   // extensionLookupType
        8u32,                   // extensionOffset
        // subtable @36
        1u16, 0xCDu16
    }
}

/// A type 1 lookup whose only subtable has an unknown format.
pub fn lookup_with_unknown_format() -> BeBuffer {
    be_buffer! { 1u16, 0u16, 1u16, 8u16, 9u16 }
}

/// A lookup in a [`LayoutTableBuilder`].
#[derive(Clone, Debug, Default)]
pub struct TestLookup {
    pub lookup_type: u16,
    pub lookup_flag: u16,
    pub mark_filtering_set: Option<u16>,
    pub subtables: Vec<Vec<u8>>,
}

impl TestLookup {
    pub fn new(lookup_type: u16, subtables: &[&[u8]]) -> Self {
        TestLookup {
            lookup_type,
            subtables: subtables.iter().map(|bytes| bytes.to_vec()).collect(),
            ..Default::default()
        }
    }

    pub fn with_flag(mut self, lookup_flag: u16) -> Self {
        self.lookup_flag = lookup_flag;
        self
    }

    pub fn with_mark_filtering_set(mut self, set: u16) -> Self {
        self.lookup_flag |= 0x0010;
        self.mark_filtering_set = Some(set);
        self
    }

    fn to_bytes(&self) -> Vec<u8> {
        let filter_len = if self.mark_filtering_set.is_some() { 2 } else { 0 };
        let header_len = 6 + 2 * self.subtables.len() + filter_len;
        let mut buf = BeBuffer::new()
            .push(self.lookup_type)
            .push(self.lookup_flag)
            .push(self.subtables.len() as u16);
        let mut offset = header_len;
        for subtable in &self.subtables {
            buf = buf.push(offset as u16);
            offset += subtable.len();
        }
        if let Some(set) = self.mark_filtering_set {
            buf = buf.push(set);
        }
        for subtable in &self.subtables {
            buf = buf.append(subtable);
        }
        buf.into()
    }
}

/// Assembles a complete GSUB or GPOS table.
///
/// Every feature is registered under a single script (default `DFLT`) with
/// only a default language system.
#[derive(Clone, Debug)]
pub struct LayoutTableBuilder {
    script: Tag,
    required_feature: Option<u16>,
    features: Vec<(Tag, Vec<u16>)>,
    lookups: Vec<TestLookup>,
}

impl Default for LayoutTableBuilder {
    fn default() -> Self {
        LayoutTableBuilder {
            script: Tag::new(b"DFLT"),
            required_feature: None,
            features: Vec::new(),
            lookups: Vec::new(),
        }
    }
}

impl LayoutTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, script: Tag) -> Self {
        self.script = script;
        self
    }

    /// Make the feature at `index` the required feature of the language
    /// system. It is still listed with the other features.
    pub fn with_required_feature(mut self, index: u16) -> Self {
        self.required_feature = Some(index);
        self
    }

    /// Add a feature referencing the given lookup indices.
    pub fn feature(mut self, tag: Tag, lookup_indices: &[u16]) -> Self {
        self.features.push((tag, lookup_indices.to_vec()));
        self
    }

    /// Add a lookup; its index is the number of lookups added before it.
    pub fn lookup(mut self, lookup: TestLookup) -> Self {
        self.lookups.push(lookup);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let script_list = self.script_list();
        let feature_list = self.feature_list();
        let lookup_list = self.lookup_list();
        let feature_list_offset = 10 + script_list.len();
        let lookup_list_offset = feature_list_offset + feature_list.len();
        BeBuffer::new()
            .push(1u16)
            .push(0u16)
            .push(10u16)
            .push(feature_list_offset as u16)
            .push(lookup_list_offset as u16)
            .append(&script_list)
            .append(&feature_list)
            .append(&lookup_list)
            .into()
    }

    fn script_list(&self) -> Vec<u8> {
        let feature_count = self.features.len() as u16;
        BeBuffer::new()
            .push(1u16)
            .push(self.script)
            .push(8u16)
            // script @8
            .push(4u16)
            .push(0u16)
            // default lang sys @12
            .push(0u16)
            .push(self.required_feature.unwrap_or(0xFFFF))
            .push(feature_count)
            .extend(0..feature_count)
            .into()
    }

    fn feature_list(&self) -> Vec<u8> {
        let mut buf = BeBuffer::new().push(self.features.len() as u16);
        let mut offset = 2 + 6 * self.features.len();
        for (tag, lookups) in &self.features {
            buf = buf.push(*tag).push(offset as u16);
            offset += 4 + 2 * lookups.len();
        }
        for (_, lookups) in &self.features {
            buf = buf
                .push(0u16)
                .push(lookups.len() as u16)
                .extend(lookups.iter().copied());
        }
        buf.into()
    }

    fn lookup_list(&self) -> Vec<u8> {
        let lookups: Vec<_> = self.lookups.iter().map(TestLookup::to_bytes).collect();
        let mut buf = BeBuffer::new().push(lookups.len() as u16);
        let mut offset = 2 + 2 * lookups.len();
        for lookup in &lookups {
            buf = buf.push(offset as u16);
            offset += lookup.len();
        }
        for lookup in &lookups {
            buf = buf.append(lookup);
        }
        buf.into()
    }
}
