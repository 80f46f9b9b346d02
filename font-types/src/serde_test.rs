use super::*;

#[test]
fn tag_as_string() {
    let tag = Tag::new(b"liga");
    let json = serde_json::to_string(&tag).unwrap();
    assert_eq!(json, "\"liga\"");
    let back: Tag = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tag);
}

#[test]
fn short_tags_are_padded() {
    let tag: Tag = serde_json::from_str("\"cv\"").unwrap();
    assert_eq!(tag, Tag::new(b"cv  "));
    assert!(serde_json::from_str::<Tag>("\"toolong\"").is_err());
}

#[test]
fn glyph_ids() {
    let gid: GlyphId16 = serde_json::from_str("42").unwrap();
    assert_eq!(gid, GlyphId16::new(42));
}
