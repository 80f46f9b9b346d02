//! OpenType scripts and language systems.

use std::ops::Deref;

use types::{BigEndian, FixedSize, Offset16, Tag};

use crate::{FontData, FontRead, ReadError, ResolveOffset};

/// A record in the [`ScriptList`].
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct ScriptRecord {
    pub script_tag: BigEndian<Tag>,
    pub script_offset: BigEndian<Offset16>,
}

impl FixedSize for ScriptRecord {
    const RAW_BYTE_LEN: usize = 6;
}

impl ScriptRecord {
    pub fn script_tag(&self) -> Tag {
        self.script_tag.get()
    }
}

/// A [ScriptList](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#script-list-table-and-script-record) table.
#[derive(Clone, Debug)]
pub struct ScriptList<'a> {
    script_records: &'a [ScriptRecord],
    scripts: Vec<Script<'a>>,
}

impl<'a> FontRead<'a> for ScriptList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let script_count: u16 = cursor.read()?;
        let script_records: &[ScriptRecord] = cursor.read_array(script_count as usize)?;
        let scripts = script_records
            .iter()
            .map(|record| record.script_offset.get().resolve(data))
            .collect::<Result<_, _>>()?;
        Ok(ScriptList {
            script_records,
            scripts,
        })
    }
}

/// A script chosen from a set of candidate tags.
///
/// Returned by the [`ScriptList::select`] method.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SelectedScript {
    /// The actual OpenType tag of the chosen script.
    pub tag: Tag,
    /// Index of the script in the [`ScriptList`].
    pub index: u16,
    /// True if a script was chosen that wasn't in the requested list.
    pub is_fallback: bool,
}

impl<'a> ScriptList<'a> {
    pub fn script_count(&self) -> u16 {
        self.script_records.len() as u16
    }

    pub fn script_records(&self) -> &'a [ScriptRecord] {
        self.script_records
    }

    pub fn get(&self, index: u16) -> Option<&Script<'a>> {
        self.scripts.get(index as usize)
    }

    /// Returns the index of the script with the given tag.
    pub fn index_for_tag(&self, tag: Tag) -> Option<u16> {
        self.script_records
            .binary_search_by_key(&tag, |rec| rec.script_tag())
            .or_else(|_| {
                // not every font sorts its records
                self.script_records
                    .iter()
                    .position(|rec| rec.script_tag() == tag)
                    .ok_or(())
            })
            .map(|index| index as u16)
            .ok()
    }

    /// Finds the first available script that matches one of the given tags.
    ///
    /// When none of the requested scripts are available, then `DFLT`, `dflt`
    /// and `latn` tags are tried in that order.
    ///
    /// If you're starting from a Unicode script code, use the
    /// [`ScriptTags::from_unicode`] function to generate the appropriate set
    /// of tags to pass to this method.
    pub fn select(&self, tags: &[Tag]) -> Option<SelectedScript> {
        for &tag in tags {
            if let Some(index) = self.index_for_tag(tag) {
                return Some(SelectedScript {
                    tag,
                    index,
                    is_fallback: false,
                });
            }
        }
        for tag in [
            Tag::new(b"DFLT"),
            // many fonts use the lowercase form
            Tag::new(b"dflt"),
            // some old fonts put everything under 'latn'
            Tag::new(b"latn"),
        ] {
            if let Some(index) = self.index_for_tag(tag) {
                return Some(SelectedScript {
                    tag,
                    index,
                    is_fallback: true,
                });
            }
        }
        None
    }
}

/// A record in a [`Script`] table.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct LangSysRecord {
    pub lang_sys_tag: BigEndian<Tag>,
    pub lang_sys_offset: BigEndian<Offset16>,
}

impl FixedSize for LangSysRecord {
    const RAW_BYTE_LEN: usize = 6;
}

impl LangSysRecord {
    pub fn lang_sys_tag(&self) -> Tag {
        self.lang_sys_tag.get()
    }
}

/// A [Script](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#script-table-and-language-system-record) table.
#[derive(Clone, Debug)]
pub struct Script<'a> {
    default_lang_sys: Option<LangSys<'a>>,
    lang_sys_records: &'a [LangSysRecord],
    lang_systems: Vec<LangSys<'a>>,
}

impl<'a> FontRead<'a> for Script<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let default_lang_sys_offset: Offset16 = cursor.read()?;
        let lang_sys_count: u16 = cursor.read()?;
        let lang_sys_records: &[LangSysRecord] = cursor.read_array(lang_sys_count as usize)?;
        let lang_systems = lang_sys_records
            .iter()
            .map(|record| record.lang_sys_offset.get().resolve(data))
            .collect::<Result<_, _>>()?;
        Ok(Script {
            default_lang_sys: default_lang_sys_offset.resolve_nullable(data)?,
            lang_sys_records,
            lang_systems,
        })
    }
}

impl<'a> Script<'a> {
    pub fn default_lang_sys(&self) -> Option<&LangSys<'a>> {
        self.default_lang_sys.as_ref()
    }

    pub fn lang_sys_count(&self) -> u16 {
        self.lang_sys_records.len() as u16
    }

    pub fn lang_sys_records(&self) -> &'a [LangSysRecord] {
        self.lang_sys_records
    }

    /// Returns the index of the language system with the given tag.
    pub fn lang_sys_index_for_tag(&self, tag: Tag) -> Option<u16> {
        self.lang_sys_records
            .iter()
            .position(|rec| rec.lang_sys_tag() == tag)
            .map(|index| index as u16)
    }

    /// Returns the language system for `tag`, or the default language
    /// system if `tag` is `None` or not present.
    pub fn lang_sys(&self, tag: Option<Tag>) -> Option<&LangSys<'a>> {
        tag.and_then(|tag| self.lang_sys_index_for_tag(tag))
            .and_then(|index| self.lang_systems.get(index as usize))
            .or(self.default_lang_sys.as_ref())
    }
}

/// A [Language System](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#language-system-table) table.
#[derive(Clone, Debug)]
pub struct LangSys<'a> {
    required_feature_index: u16,
    feature_indices: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for LangSys<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        // lookupOrderOffset, reserved
        cursor.advance::<u16>();
        let required_feature_index = cursor.read()?;
        let feature_index_count: u16 = cursor.read()?;
        Ok(LangSys {
            required_feature_index,
            feature_indices: cursor.read_array(feature_index_count as usize)?,
        })
    }
}

impl LangSys<'_> {
    /// The index of the feature required by this language system, if any.
    pub fn required_feature_index(&self) -> Option<u16> {
        match self.required_feature_index {
            0xFFFF => None,
            index => Some(index),
        }
    }

    pub fn feature_index_count(&self) -> u16 {
        self.feature_indices.len() as u16
    }

    pub fn feature_indices(&self) -> impl Iterator<Item = u16> + '_ {
        self.feature_indices.iter().map(|index| index.get())
    }
}

/// A prioritized list of OpenType script tags mapped from a Unicode script
/// tag.
///
/// This is useful as input to [`ScriptList::select`] when you have a Unicode
/// script and would like to find the appropriate OpenType script for shaping.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct ScriptTags {
    tags: [Tag; 3],
    len: usize,
}

impl ScriptTags {
    /// Given a [Unicode script code](https://unicode.org/iso15924/iso15924-codes.html),
    /// returns a prioritized list of matching
    /// [OpenType script tags](https://learn.microsoft.com/en-us/typography/opentype/spec/scripttags).
    ///
    /// Indic scripts map to their version 3 and version 2 tags before the
    /// original one.
    pub fn from_unicode(unicode_script: Tag) -> Self {
        let mut tags = [Tag::default(); 3];
        let mut len = 0;
        if let Some(new_tag) = new_tag_from_unicode(unicode_script) {
            // Myanmar maps to mym2 but there is no mym3
            if new_tag != Tag::new(b"mym2") {
                let mut bytes = new_tag.to_be_bytes();
                bytes[3] = b'3';
                tags[len] = Tag::new(&bytes);
                len += 1;
            }
            tags[len] = new_tag;
            len += 1;
        }
        tags[len] = old_tag_from_unicode(unicode_script);
        len += 1;
        Self { tags, len }
    }

    /// Returns a slice containing the mapped script tags.
    pub fn as_slice(&self) -> &[Tag] {
        &self.tags[..self.len]
    }
}

impl Deref for ScriptTags {
    type Target = [Tag];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl std::fmt::Debug for ScriptTags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_slice())
    }
}

fn old_tag_from_unicode(unicode_script: Tag) -> Tag {
    let mut bytes = unicode_script.to_be_bytes();
    let tag_bytes = match &bytes {
        b"Zmth" => b"math",
        // Katakana and Hiragana both map to 'kana'
        b"Hira" => b"kana",
        // OpenType pads short tags with spaces
        b"Laoo" => b"lao ",
        b"Yiii" => b"yi  ",
        b"Nkoo" => b"nko ",
        b"Vaii" => b"vai ",
        _ => {
            bytes[0] = bytes[0].to_ascii_lowercase();
            &bytes
        }
    };
    Tag::new(tag_bytes)
}

/// Unicode scripts with a "new" OpenType script tag, sorted by Unicode tag.
const UNICODE_TO_NEW_OPENTYPE_SCRIPT_TAGS: &[(&[u8; 4], Tag)] = &[
    (b"Beng", Tag::new(b"bng2")),
    (b"Deva", Tag::new(b"dev2")),
    (b"Gujr", Tag::new(b"gjr2")),
    (b"Guru", Tag::new(b"gur2")),
    (b"Knda", Tag::new(b"knd2")),
    (b"Mlym", Tag::new(b"mlm2")),
    (b"Mymr", Tag::new(b"mym2")),
    (b"Orya", Tag::new(b"ory2")),
    (b"Taml", Tag::new(b"tml2")),
    (b"Telu", Tag::new(b"tel2")),
];

fn new_tag_from_unicode(unicode_script: Tag) -> Option<Tag> {
    let ix = UNICODE_TO_NEW_OPENTYPE_SCRIPT_TAGS
        .binary_search_by_key(&unicode_script.to_be_bytes(), |entry| *entry.0)
        .ok()?;
    UNICODE_TO_NEW_OPENTYPE_SCRIPT_TAGS
        .get(ix)
        .map(|entry| entry.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::layout as test_data;

    #[test]
    fn simple_script_tag_from_unicode() {
        let unicode_tags = [b"Cyrl", b"Grek", b"Hebr", b"Latn"];
        for unicode_tag in unicode_tags {
            // These should all return a single tag that is simply
            // the lowercase version of the Unicode tag
            let mut bytes = *unicode_tag;
            bytes[0] = bytes[0].to_ascii_lowercase();
            let expected_tag = Tag::new(&bytes);
            let result = ScriptTags::from_unicode(Tag::new(unicode_tag));
            assert_eq!(&*result, &[expected_tag]);
        }
    }

    #[test]
    fn exception_script_tag_from_unicode() {
        let cases = [
            (b"Kana", b"kana"),
            (b"Hira", b"kana"),
            (b"Nkoo", b"nko "),
            (b"Yiii", b"yi  "),
            (b"Vaii", b"vai "),
        ];
        for (unicode_tag, ot_tag) in cases {
            let result = ScriptTags::from_unicode(Tag::new(unicode_tag));
            assert_eq!(&*result, &[Tag::new(ot_tag)]);
        }
    }

    #[test]
    fn multi_script_tags_from_unicode() {
        let cases = [
            (b"Beng", &[b"bng3", b"bng2", b"beng"][..]),
            (b"Orya", &[b"ory3", b"ory2", b"orya"]),
            (b"Mlym", &[b"mlm3", b"mlm2", b"mlym"]),
            // There's no version 3 tag for Myanmar
            (b"Mymr", &[b"mym2", b"mymr"]),
        ];
        for (unicode_tag, ot_tags) in cases {
            let result = ScriptTags::from_unicode(Tag::new(unicode_tag));
            let ot_tags = ot_tags
                .iter()
                .map(|bytes| Tag::new(bytes))
                .collect::<Vec<_>>();
            assert_eq!(&*result, &ot_tags);
        }
    }

    #[test]
    fn select_with_fallback() {
        let buf = test_data::scripts();
        let scripts = ScriptList::read(FontData::new(&buf)).unwrap();
        let latn = scripts
            .select(&ScriptTags::from_unicode(Tag::new(b"Latn")))
            .unwrap();
        assert_eq!(
            latn,
            SelectedScript {
                tag: Tag::new(b"latn"),
                index: 2,
                is_fallback: false,
            }
        );
        // no Bengali, and no DFLT, so we land on latn
        let beng = scripts
            .select(&ScriptTags::from_unicode(Tag::new(b"Beng")))
            .unwrap();
        assert_eq!(beng.tag, Tag::new(b"latn"));
        assert!(beng.is_fallback);
    }

    #[test]
    fn lang_sys_falls_back_to_default() {
        let buf = test_data::scripts_and_languages();
        let script = Script::read(FontData::new(&buf)).unwrap();
        let urdu = script.lang_sys(Some(Tag::new(b"URD "))).unwrap();
        assert_eq!(urdu.required_feature_index(), Some(3));
        let other = script.lang_sys(Some(Tag::new(b"FAR "))).unwrap();
        assert_eq!(other.required_feature_index(), None);
        assert_eq!(other.feature_indices().collect::<Vec<_>>(), [0, 1, 2]);
    }
}
