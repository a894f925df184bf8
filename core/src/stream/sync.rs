//! A [`tokio_util::codec::Decoder`] adapter, so callers get a
//! `Stream<Item = Result<Object, Error>>` for free via
//! `tokio_util::codec::FramedRead` over any `AsyncRead`.

use std::sync::Arc;

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::config::ParseLimits;
use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::value::Object;

use super::StreamDecoder;

/// Wraps a [`StreamDecoder`] behind the `tokio_util` codec contract.
pub struct BytewiseCodec {
    inner: StreamDecoder,
}

impl BytewiseCodec {
    /// Creates a codec driving `descriptor` with default resource limits.
    pub fn new(descriptor: Arc<Descriptor>) -> Self {
        Self {
            inner: StreamDecoder::new(descriptor),
        }
    }

    /// As [`Self::new`], with caller-supplied resource limits.
    pub fn with_limits(descriptor: Arc<Descriptor>, limits: ParseLimits) -> Self {
        Self {
            inner: StreamDecoder::with_limits(descriptor, limits),
        }
    }
}

impl Decoder for BytewiseCodec {
    type Item = Object;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Object>, Error> {
        if !src.is_empty() {
            self.inner.feed(&src[..]);
            src.clear();
        }
        self.inner.poll()
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Object>, Error> {
        if !src.is_empty() {
            self.inner.feed(&src[..]);
            src.clear();
        }
        self.inner.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DescriptorBuilder;
    use crate::primitive::Primitive;
    use crate::value::Value;

    #[test]
    fn decodes_across_frames() {
        let descriptor = Arc::new(
            DescriptorBuilder::new()
                .primitive("a", Primitive::U8)
                .primitive("b", Primitive::U8)
                .build()
                .unwrap(),
        );
        let mut codec = BytewiseCodec::new(descriptor);
        let mut buf = BytesMut::from(&[1u8][..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(&[2]);
        let obj = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(obj.get("a"), Some(&Value::UInt(1)));
        assert_eq!(obj.get("b"), Some(&Value::UInt(2)));
    }
}
