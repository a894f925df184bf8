#![no_main]

use bytewise::{descriptor, Length, PrimitiveFields, ReadUntil};
use libfuzzer_sys::fuzz_target;

/// A representative descriptor exercising every field kind this crate
/// supports: primitives, a named-length string, a nested struct, and a
/// length-prefixed array terminated by a predicate.
fn sample_descriptor() -> bytewise::Descriptor {
    let header = descriptor()
        .u8("version")
        .u16be("flags")
        .build()
        .expect("header descriptor is well-formed");

    let entry = descriptor()
        .u8("tag")
        .u8("value")
        .build()
        .expect("entry descriptor is well-formed");

    descriptor()
        .nest("header", header)
        .u8("name_len")
        .string("name", Length::Named("name_len"))
        .u8("count")
        .array("entries", entry, Length::Named("count"))
        .array_with(
            "trailer",
            descriptor().u8("b").build().expect("trailer element is well-formed"),
            bytewise::fields::array::Terminator::Open(ReadUntil::Predicate(std::sync::Arc::new(
                |v: &bytewise::Value| v.as_uint() == Some(0),
            ))),
            None,
        )
        .build()
        .expect("top-level descriptor is well-formed")
}

fuzz_target!(|data: &[u8]| {
    let descriptor = sample_descriptor();
    // `Eof` (surfaced as `Ok(None)`) is an expected outcome for most
    // arbitrary inputs; only a panic is interesting here.
    let _ = descriptor.parse(data);
});
