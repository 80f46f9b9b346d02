use criterion::{black_box, criterion_group, criterion_main, Criterion};
use font_test_data::{
    be_buffer,
    layout::{LayoutTableBuilder, TestLookup},
    FontBuilder,
};
use typeset::{Font, FontStack, Tag, TextLayout, TextMeasurer, TextOptions};

/// `a`-`e` are glyphs 1-5 and space is glyph 6; `ab` is kerned.
fn font_data() -> Vec<u8> {
    let pair = be_buffer! {
        1u16, 12u16, 0x0004u16, 0u16, 1u16, 18u16,
        1u16, 1u16, 1u16,
        1u16, 2u16, (-100i16)
    };
    let gpos = LayoutTableBuilder::new()
        .feature(Tag::new(b"kern"), &[0])
        .lookup(TestLookup::new(2, &[pair.as_slice()]))
        .build();
    let mut builder = FontBuilder::with_metrics(
        1000,
        (800, -200, 0),
        &[
            (' ', 6),
            ('a', 1),
            ('b', 2),
            ('c', 3),
            ('d', 4),
            ('e', 5),
        ],
        &[0, 500, 520, 480, 500, 510, 250],
    );
    builder.add_table(Tag::new(b"GPOS"), gpos);
    builder.build()
}

fn layout(c: &mut Criterion) {
    let data = font_data();
    let font = Font::new(&data).unwrap();
    let fonts = FontStack::new(&font);
    let text = "abcde abc\tdd eab ".repeat(64);
    let options = TextOptions {
        font_size: 16.0,
        wrapping_width: 400.0,
        ..Default::default()
    };
    let engine = TextLayout::new();
    c.bench_function("layout_wrapped", |b| {
        b.iter(|| engine.layout(black_box(&text), &fonts, &options))
    });
    let measurer = TextMeasurer::new();
    c.bench_function("measure_unwrapped", |b| {
        b.iter(|| measurer.measure(black_box(&text), &fonts, &TextOptions::default()))
    });
}

criterion_group!(benches, layout);
criterion_main!(benches);
