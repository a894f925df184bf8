//! A hand-rolled [`futures_core::Stream`] adapter, for callers on a runtime
//! other than Tokio (or no runtime at all).
//!
//! Direct translation of this crate's token-stream `ParseStream::poll_next`
//! to bytes: pull chunks from the inner stream while `Poll::Ready(Some(_))`,
//! feed them into a [`StreamDecoder`], poll for a completed object, and
//! return `Poll::Pending` only when the inner stream is also pending.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;

use crate::config::ParseLimits;
use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::value::Object;

use super::StreamDecoder;

/// Adapts a `Stream<Item = Bytes>` of incoming chunks into a
/// `Stream<Item = Result<Object, Error>>` of decoded values.
pub struct ByteStreamDecoder<S> {
    inner: S,
    decoder: StreamDecoder,
    finished: bool,
}

impl<S> ByteStreamDecoder<S>
where
    S: Stream<Item = Bytes>,
{
    /// Wraps `inner`, driving `descriptor` with default resource limits.
    pub fn new(inner: S, descriptor: Arc<Descriptor>) -> Self {
        Self::with_limits(inner, descriptor, ParseLimits::DEFAULT)
    }

    /// As [`Self::new`], with caller-supplied resource limits.
    pub fn with_limits(inner: S, descriptor: Arc<Descriptor>, limits: ParseLimits) -> Self {
        Self {
            inner,
            decoder: StreamDecoder::with_limits(descriptor, limits),
            finished: false,
        }
    }
}

impl<S> Stream for ByteStreamDecoder<S>
where
    S: Stream<Item = Bytes> + Unpin,
{
    type Item = Result<Object, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match self.decoder.poll() {
            Ok(Some(value)) => return Poll::Ready(Some(Ok(value))),
            Ok(None) => {}
            Err(e) => {
                self.finished = true;
                return Poll::Ready(Some(Err(e)));
            }
        }

        let this = self.get_mut();
        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(chunk)) => {
                    this.decoder.feed(&chunk);
                    match this.decoder.poll() {
                        Ok(Some(value)) => return Poll::Ready(Some(Ok(value))),
                        Ok(None) => continue,
                        Err(e) => {
                            this.finished = true;
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                }
                Poll::Ready(None) => {
                    this.finished = true;
                    return match this.decoder.finish() {
                        Ok(Some(value)) => Poll::Ready(Some(Ok(value))),
                        Ok(None) => Poll::Ready(None),
                        Err(e) => Poll::Ready(Some(Err(e))),
                    };
                }
                Poll::Pending => return Poll::Pending,
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

    struct VecStream(std::vec::IntoIter<Bytes>);

    impl Stream for VecStream {
        type Item = Bytes;
        fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
            Poll::Ready(self.0.next())
        }
    }

    #[test]
    fn decodes_chunks_to_completion() {
        let descriptor = Arc::new(
            DescriptorBuilder::new()
                .primitive("a", Primitive::U8)
                .primitive("b", Primitive::U8)
                .build()
                .unwrap(),
        );
        let chunks = vec![Bytes::from_static(&[1]), Bytes::from_static(&[2])];
        let mut stream = ByteStreamDecoder::new(VecStream(chunks.into_iter()), descriptor);
        let waker = std::task::Waker::noop();
        let mut cx = Context::from_waker(waker);

        let first = Pin::new(&mut stream).poll_next(&mut cx);
        match first {
            Poll::Ready(Some(Ok(obj))) => {
                assert_eq!(obj.get("a"), Some(&Value::UInt(1)));
                assert_eq!(obj.get("b"), Some(&Value::UInt(2)));
            }
            other => panic!("expected a decoded object, got {other:?}"),
        }

        let second = Pin::new(&mut stream).poll_next(&mut cx);
        assert!(matches!(second, Poll::Ready(None)));
    }
}
