use super::*;
use crate::FontRead;
use font_test_data::layout as test_data;
use types::Tag;

#[test]
fn example_1_scripts() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#example-1-scriptlist-table-and-scriptrecords
    let buf = test_data::scripts();
    let table = ScriptList::read(FontData::new(&buf)).unwrap();
    assert_eq!(table.script_count(), 3);
    assert_eq!(table.script_records()[0].script_tag(), Tag::new(b"hani"));
    assert_eq!(table.script_records()[1].script_tag(), Tag::new(b"kana"));
    assert_eq!(table.script_records()[2].script_tag(), Tag::new(b"latn"));
    assert_eq!(table.index_for_tag(Tag::new(b"kana")), Some(1));
}

#[test]
fn example_2_scripts_and_langs() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#example-2-script-table-langsysrecord-and-langsys-table
    let buf = test_data::scripts_and_languages();
    let table = Script::read(FontData::new(&buf)).unwrap();
    let def_sys = table.default_lang_sys().unwrap();
    assert_eq!(def_sys.required_feature_index(), None);
    assert_eq!(def_sys.feature_index_count(), 3);
    assert_eq!(table.lang_sys_count(), 1);

    let urdu_record = &table.lang_sys_records()[0];
    assert_eq!(urdu_record.lang_sys_tag(), Tag::new(b"URD "));
    let urdu_sys = table.lang_sys(Some(Tag::new(b"URD "))).unwrap();
    assert_eq!(urdu_sys.required_feature_index(), Some(3));
    assert_eq!(urdu_sys.feature_index_count(), 3);
}

#[test]
fn example_3_featurelist_and_feature() {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#example-3-featurelist-table-and-feature-table
    let buf = test_data::featurelist_and_feature();
    let table = FeatureList::read(FontData::new(&buf)).unwrap();
    assert_eq!(table.feature_count(), 3);
    let turkish_liga = table.get(0).unwrap();
    assert!(turkish_liga.feature_params_offset().is_null());
    assert_eq!(turkish_liga.lookup_list_indices().len(), 1);
}

#[test]
fn lookup_list_with_extension() {
    let buf = test_data::lookup_list_with_extension();
    let table = LookupList::<TestSubtable>::read(FontData::new(&buf)).unwrap();
    assert_eq!(table.lookup_count(), 2);
    let direct = table.get(0).unwrap();
    assert_eq!(direct.lookup_type(), 1);
    assert_eq!(direct.subtables(), &[TestSubtable::Known(0xAB)]);
    // the extension's real type replaces 7
    let extended = table.get(1).unwrap();
    assert_eq!(extended.lookup_type(), 1);
    assert!(extended.lookup_flag().ignore_marks());
    assert_eq!(extended.mark_filtering_set(), Some(2));
    assert_eq!(extended.subtables(), &[TestSubtable::Known(0xCD)]);
}

#[test]
fn unknown_subtable_format_degrades() {
    let buf = test_data::lookup_with_unknown_format();
    let lookup = Lookup::<TestSubtable>::read(FontData::new(&buf)).unwrap();
    assert_eq!(lookup.subtables(), &[TestSubtable::Unsupported(1, 9)]);
}

/// A minimal subtable type: format 1 holds a single u16.
#[derive(Debug, PartialEq)]
enum TestSubtable {
    Known(u16),
    Unsupported(u16, u16),
}

impl<'a> LookupSubtable<'a> for TestSubtable {
    const EXTENSION_TYPE: u16 = 7;

    fn read_with_type(data: FontData<'a>, lookup_type: u16) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match (lookup_type, format) {
            (1, 1) => data.read_at(2).map(TestSubtable::Known),
            (_, other) => Err(ReadError::InvalidFormat(other.into())),
        }
    }

    fn unsupported(lookup_type: u16, format: u16) -> Self {
        TestSubtable::Unsupported(lookup_type, format)
    }

    fn unsupported_format(&self) -> Option<(u16, u16)> {
        match self {
            TestSubtable::Unsupported(lookup_type, format) => Some((*lookup_type, *format)),
            TestSubtable::Known(_) => None,
        }
    }
}
