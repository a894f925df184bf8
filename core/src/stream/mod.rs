//! Streaming execution: driving a [`crate::Descriptor`] over an
//! accumulating byte stream with backpressure.

mod decoder;
pub use decoder::StreamDecoder;

#[cfg(feature = "tokio")]
pub mod sync;

#[cfg(feature = "futures")]
pub mod futures;
