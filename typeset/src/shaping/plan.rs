//! Selecting the lookups to apply for a run.

use read_fonts::tables::{
    gpos::Gpos,
    gsub::Gsub,
    layout::{FeatureList, ScriptList, ScriptTags, SelectedScript},
};

use crate::Tag;

/// Substitution features applied when none are requested.
pub const DEFAULT_GSUB_FEATURES: &[Tag] = &[
    Tag::new(b"ccmp"),
    Tag::new(b"locl"),
    Tag::new(b"rlig"),
    Tag::new(b"rclt"),
    Tag::new(b"liga"),
    Tag::new(b"clig"),
    Tag::new(b"calt"),
];

/// Positioning features applied when none are requested.
pub const DEFAULT_GPOS_FEATURES: &[Tag] = &[
    Tag::new(b"kern"),
    Tag::new(b"mark"),
    Tag::new(b"mkmk"),
    Tag::new(b"dist"),
    Tag::new(b"curs"),
];

/// The script and feature lists shared by `GSUB` and `GPOS`.
pub trait LayoutTable<'a> {
    fn script_list(&self) -> &ScriptList<'a>;
    fn feature_list(&self) -> &FeatureList<'a>;
}

impl<'a> LayoutTable<'a> for Gsub<'a> {
    fn script_list(&self) -> &ScriptList<'a> {
        Gsub::script_list(self)
    }

    fn feature_list(&self) -> &FeatureList<'a> {
        Gsub::feature_list(self)
    }
}

impl<'a> LayoutTable<'a> for Gpos<'a> {
    fn script_list(&self) -> &ScriptList<'a> {
        Gpos::script_list(self)
    }

    fn feature_list(&self) -> &FeatureList<'a> {
        Gpos::feature_list(self)
    }
}

/// The lookups of one layout table selected for a script, language and
/// feature set.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct ShapePlan {
    script: Option<SelectedScript>,
    lookups: Vec<u16>,
}

impl ShapePlan {
    /// Build a plan for a run.
    ///
    /// The script is chosen from the OpenType tags for `unicode_script`
    /// (an ISO 15924 code) unless `script_override` names one directly,
    /// falling back to `DFLT`. The language system for `language` is used
    /// if the script has one, and the default language system otherwise.
    /// The required feature is always included.
    pub fn new<'a>(
        table: &impl LayoutTable<'a>,
        unicode_script: Tag,
        script_override: Option<Tag>,
        language: Option<Tag>,
        features: &[Tag],
    ) -> Self {
        let script_list = table.script_list();
        let selected = match script_override {
            Some(tag) => script_list.select(&[tag]),
            None => script_list.select(&ScriptTags::from_unicode(unicode_script)),
        };
        let Some(selected) = selected else {
            return Self::default();
        };
        let Some(lang_sys) = script_list
            .get(selected.index)
            .and_then(|script| script.lang_sys(language))
        else {
            return Self {
                script: Some(selected),
                lookups: Vec::new(),
            };
        };
        let feature_list = table.feature_list();
        let mut lookups = Vec::new();
        let required = lang_sys.required_feature_index();
        for feature_index in required.into_iter().chain(lang_sys.feature_indices()) {
            let Some(feature) = feature_list.get(feature_index) else {
                continue;
            };
            if Some(feature_index) != required && !features.contains(&feature.tag) {
                continue;
            }
            lookups.extend(feature.lookup_list_indices().iter().map(|index| index.get()));
        }
        lookups.sort_unstable();
        lookups.dedup();
        log::debug!(
            "shape plan: script {} (fallback {}), {} lookups",
            selected.tag,
            selected.is_fallback,
            lookups.len()
        );
        Self {
            script: Some(selected),
            lookups,
        }
    }

    /// The script that was selected, if the table has a usable one.
    pub fn script(&self) -> Option<SelectedScript> {
        self.script
    }

    /// The lookup indices to apply, ascending and without duplicates.
    pub fn lookups(&self) -> &[u16] {
        &self.lookups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use font_test_data::layout::{LayoutTableBuilder, TestLookup};
    use read_fonts::{FontData, FontRead};

    fn gsub(builder: LayoutTableBuilder) -> Vec<u8> {
        let subtable = crate::shaping::tests::single_subst(1, 2);
        (0..4)
            .fold(builder, |builder, _| {
                builder.lookup(TestLookup::new(1, &[subtable.as_slice()]))
            })
            .build()
    }

    #[test]
    fn features_map_to_sorted_unique_lookups() {
        let data = gsub(
            LayoutTableBuilder::new()
                .with_script(Tag::new(b"latn"))
                .feature(Tag::new(b"liga"), &[3, 1])
                .feature(Tag::new(b"calt"), &[1, 0])
                .feature(Tag::new(b"smcp"), &[2]),
        );
        let table = Gsub::read(FontData::new(&data)).unwrap();
        let plan = ShapePlan::new(&table, Tag::new(b"Latn"), None, None, DEFAULT_GSUB_FEATURES);
        assert_eq!(plan.lookups(), [0, 1, 3]);
        let script = plan.script().unwrap();
        assert_eq!(script.tag, Tag::new(b"latn"));
        assert!(!script.is_fallback);
    }

    #[test]
    fn unknown_script_falls_back_to_default() {
        let data = gsub(LayoutTableBuilder::new().feature(Tag::new(b"liga"), &[2]));
        let table = Gsub::read(FontData::new(&data)).unwrap();
        let plan = ShapePlan::new(&table, Tag::new(b"Grek"), None, None, DEFAULT_GSUB_FEATURES);
        assert_eq!(plan.lookups(), [2]);
        assert!(plan.script().unwrap().is_fallback);
    }

    #[test]
    fn script_override() {
        let data = gsub(
            LayoutTableBuilder::new()
                .with_script(Tag::new(b"cyrl"))
                .feature(Tag::new(b"liga"), &[2]),
        );
        let table = Gsub::read(FontData::new(&data)).unwrap();
        let plan = ShapePlan::new(&table, Tag::new(b"Latn"), None, None, DEFAULT_GSUB_FEATURES);
        assert!(plan.lookups().is_empty());
        let plan = ShapePlan::new(
            &table,
            Tag::new(b"Latn"),
            Some(Tag::new(b"cyrl")),
            None,
            DEFAULT_GSUB_FEATURES,
        );
        assert_eq!(plan.lookups(), [2]);
    }

    #[test]
    fn required_feature_is_always_applied() {
        let data = gsub(
            LayoutTableBuilder::new()
                .feature(Tag::new(b"liga"), &[1])
                .feature(Tag::new(b"rvrn"), &[3])
                .with_required_feature(1),
        );
        let table = Gsub::read(FontData::new(&data)).unwrap();
        let plan = ShapePlan::new(&table, Tag::new(b"Latn"), None, None, &[]);
        assert_eq!(plan.lookups(), [3]);
        let plan = ShapePlan::new(&table, Tag::new(b"Latn"), None, None, DEFAULT_GSUB_FEATURES);
        assert_eq!(plan.lookups(), [1, 3]);
    }

    #[test]
    fn unknown_language_uses_default_lang_sys() {
        let data = gsub(LayoutTableBuilder::new().feature(Tag::new(b"liga"), &[0]));
        let table = Gsub::read(FontData::new(&data)).unwrap();
        let plan = ShapePlan::new(
            &table,
            Tag::new(b"Latn"),
            None,
            Some(Tag::new(b"TRK ")),
            DEFAULT_GSUB_FEATURES,
        );
        assert_eq!(plan.lookups(), [0]);
    }
}
