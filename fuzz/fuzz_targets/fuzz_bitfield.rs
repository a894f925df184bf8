#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use bytewise::{descriptor, BitEntry};
use libfuzzer_sys::fuzz_target;

/// A random bit layout: 1-8 fields whose widths sum to at most 53 bits
/// (the crate's precision ceiling).
#[derive(Debug)]
struct Layout {
    widths: Vec<usize>,
}

impl<'a> Arbitrary<'a> for Layout {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let field_count = 1 + (u8::arbitrary(u)? % 8) as usize;
        let mut widths = Vec::with_capacity(field_count);
        let mut remaining = 53usize;
        for i in 0..field_count {
            if remaining == 0 {
                break;
            }
            let max = if i == field_count - 1 { remaining } else { remaining.min(16) };
            let width = 1 + (u8::arbitrary(u)? as usize % max);
            widths.push(width);
            remaining -= width;
        }
        Ok(Layout { widths })
    }
}

fuzz_target!(|input: (Layout, Vec<u8>)| {
    let (layout, bytes) = input;
    if layout.widths.is_empty() {
        return;
    }
    let total_bits: usize = layout.widths.iter().sum();

    const NAMES: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let entries: Vec<BitEntry> = layout
        .widths
        .iter()
        .enumerate()
        .map(|(i, &bits)| BitEntry {
            path: vec![NAMES[i]],
            bits,
        })
        .collect();

    let Ok(builder) = descriptor().bitfield(entries, total_bits) else {
        return;
    };
    let Ok(d) = builder.build() else {
        return;
    };

    // Only a panic is interesting; EOF on short input is expected.
    let _ = d.parse(&bytes);
});
