//! The stateful buffer driver behind both stream adapters.

use std::sync::Arc;

use crate::config::ParseLimits;
use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::exec::DecodeAttempt;
use crate::value::Object;

/// Bytes consumed below this threshold are left in place rather than
/// compacted; above it, the cost of repeatedly scanning a long, mostly-
/// consumed prefix outweighs the cost of reclaiming it.
const COMPACT_THRESHOLD: usize = 1024;

/// Drives one [`Descriptor`] over an accumulating byte stream.
///
/// Owns all buffering and retry state for exactly one logical stream:
/// `feed` appends bytes as they arrive, `poll` attempts to decode the next
/// object from whatever has accumulated, and `finish` makes one last
/// attempt once the upstream source is exhausted. There is no reentrancy —
/// both methods take `&mut self`.
pub struct StreamDecoder {
    descriptor: Arc<Descriptor>,
    limits: ParseLimits,
    buf: Vec<u8>,
    committed: usize,
}

impl StreamDecoder {
    /// Creates a decoder driving `descriptor` with default resource limits.
    pub fn new(descriptor: Arc<Descriptor>) -> Self {
        Self::with_limits(descriptor, ParseLimits::DEFAULT)
    }

    /// As [`Self::new`], with caller-supplied resource limits.
    pub fn with_limits(descriptor: Arc<Descriptor>, limits: ParseLimits) -> Self {
        Self {
            descriptor,
            limits,
            buf: Vec::new(),
            committed: 0,
        }
    }

    /// Appends newly received bytes to the internal buffer.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    fn compact_if_due(&mut self) {
        if self.committed > COMPACT_THRESHOLD {
            self.buf.drain(..self.committed);
            self.committed = 0;
        }
    }

    /// Attempts to decode the next object from whatever has accumulated.
    ///
    /// `Ok(None)` means "not enough bytes yet"; feed more and poll again.
    /// Callers should keep polling after a `Ok(Some(_))` — more than one
    /// object may already be fully buffered.
    pub fn poll(&mut self) -> Result<Option<Object>, Error> {
        match self
            .descriptor
            .try_decode(&self.buf[self.committed..], &self.limits, false)?
        {
            DecodeAttempt::Incomplete => {
                self.compact_if_due();
                Ok(None)
            }
            DecodeAttempt::Complete { value, consumed } => {
                self.committed += consumed;
                Ok(Some(value))
            }
        }
    }

    /// Makes one final attempt once the upstream byte source is exhausted.
    ///
    /// Field parsers that tolerate trailing EOF (arrays, per their
    /// element-level rules) may still produce a final object from a
    /// partial tail; others return `Ok(None)`. Any unconsumed trailing
    /// bytes are silently discarded.
    pub fn finish(&mut self) -> Result<Option<Object>, Error> {
        match self
            .descriptor
            .try_decode(&self.buf[self.committed..], &self.limits, true)?
        {
            DecodeAttempt::Incomplete => Ok(None),
            DecodeAttempt::Complete { value, consumed } => {
                self.committed += consumed;
                Ok(Some(value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DescriptorBuilder;
    use crate::primitive::Primitive;
    use crate::value::Value;

    fn two_u8s() -> Arc<Descriptor> {
        Arc::new(
            DescriptorBuilder::new()
                .primitive("a", Primitive::U8)
                .primitive("b", Primitive::U8)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn straddling_chunks_decode_once_enough_bytes_arrive() {
        let mut dec = StreamDecoder::new(two_u8s());
        dec.feed(&[1]);
        assert_eq!(dec.poll().unwrap(), None);
        dec.feed(&[2]);
        let obj = dec.poll().unwrap().unwrap();
        assert_eq!(obj.get("a"), Some(&Value::UInt(1)));
        assert_eq!(obj.get("b"), Some(&Value::UInt(2)));
    }

    #[test]
    fn pipelines_multiple_objects_from_one_feed() {
        let mut dec = StreamDecoder::new(two_u8s());
        dec.feed(&[1, 2, 3, 4]);
        let first = dec.poll().unwrap().unwrap();
        assert_eq!(first.get("a"), Some(&Value::UInt(1)));
        let second = dec.poll().unwrap().unwrap();
        assert_eq!(second.get("a"), Some(&Value::UInt(3)));
        assert_eq!(dec.poll().unwrap(), None);
    }

    #[test]
    fn chunking_is_invariant_byte_for_byte() {
        let whole: Vec<u8> = vec![1, 2, 3, 4, 5, 6];
        let mut one_shot = StreamDecoder::new(two_u8s());
        one_shot.feed(&whole);
        let mut from_one_shot = Vec::new();
        while let Some(o) = one_shot.poll().unwrap() {
            from_one_shot.push(o);
        }

        let mut byte_at_a_time = StreamDecoder::new(two_u8s());
        let mut from_bytes = Vec::new();
        for b in &whole {
            byte_at_a_time.feed(&[*b]);
            while let Some(o) = byte_at_a_time.poll().unwrap() {
                from_bytes.push(o);
            }
        }

        assert_eq!(from_one_shot, from_bytes);
    }

    #[test]
    fn compacts_past_threshold() {
        let mut dec = StreamDecoder::new(two_u8s());
        let padding = vec![0u8; COMPACT_THRESHOLD + 10];
        dec.feed(&padding);
        // Every pair decodes to completion; committed grows past the
        // threshold and triggers a compaction on the next incomplete poll.
        while dec.poll().unwrap().is_some() {}
        assert!(dec.buf.len() < COMPACT_THRESHOLD + 10);
    }

    #[test]
    fn finish_drops_incomplete_trailing_bytes() {
        let mut dec = StreamDecoder::new(two_u8s());
        dec.feed(&[1]);
        assert_eq!(dec.finish().unwrap(), None);
    }
}
