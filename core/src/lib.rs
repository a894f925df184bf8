//! `bytewise-core` — the parser composition and execution engine behind a
//! declarative binary parser combinator library.
//!
//! Callers build a parser by chaining field declarations (primitives,
//! nested structures, arrays, strings, buffers, bit-fields, tagged unions)
//! onto a [`builder::DescriptorBuilder`]; the builder compiles those
//! declarations into an immutable [`Descriptor`] that can either consume a
//! single in-memory buffer ([`Descriptor::parse`]) or drive a streaming
//! decoder ([`stream::StreamDecoder`]) that turns an incoming byte stream
//! into a sequence of decoded values, with backpressure and partial-chunk
//! handling.
//!
//! This crate ships the engine only. The concrete, named primitive
//! builder methods (`u8`, `u16be`, ...) live in the `bytewise` convenience
//! crate as an extension trait over [`builder::DescriptorBuilder`].

#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod bitfield;
pub mod builder;
pub mod config;
pub mod cursor;
pub mod descriptor;
mod exec;
pub mod fields;
pub mod options;
pub mod primitive;
pub mod stream;
pub mod value;

mod error;

pub use bitfield::BitEntry;
pub use builder::DescriptorBuilder;
pub use config::{ParseLimits, RecursionGuard};
pub use cursor::Cursor;
pub use descriptor::{Descriptor, FixedSize};
pub use error::{BuildError, Error};
pub use options::{Length, Options, ReadUntil};
pub use primitive::Primitive;
pub use value::{Object, Value};
