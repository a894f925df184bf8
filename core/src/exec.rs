//! Buffer execution: the internal attempt machinery shared by
//! [`crate::Descriptor::parse`] and the streaming decoder.

use crate::config::ParseLimits;
use crate::cursor::Cursor;
use crate::descriptor::{Descriptor, StepOutcome};
use crate::error::Error;
use crate::value::Object;

/// The result of attempting to decode one object from a byte slice that
/// may not yet contain enough data.
pub(crate) enum DecodeAttempt {
    /// The chain completed; `consumed` bytes were read from the front of
    /// the attempted slice.
    Complete { value: Object, consumed: usize },
    /// Not enough bytes were available; the attempt should be retried once
    /// more bytes have arrived, from the same starting offset.
    Incomplete,
}

impl Descriptor {
    /// Attempts to decode one object from the front of `bytes`, reporting
    /// whether more bytes are needed rather than treating a short buffer as
    /// permanent EOF. Used by [`crate::stream::StreamDecoder`].
    ///
    /// `is_final` marks whether this attempt sees all the input there will
    /// ever be (a stream's `finish()`) or might still be followed by more
    /// bytes (a stream's `poll()`); it governs whether steps that tolerate
    /// trailing `Eof` are allowed to commit a partial result.
    pub(crate) fn try_decode(
        &self,
        bytes: &[u8],
        limits: &ParseLimits,
        is_final: bool,
    ) -> Result<DecodeAttempt, Error> {
        let mut cur = Cursor::new(bytes);
        let mut ctx = crate::descriptor::DecodeCtx::new_attempt(limits, is_final);
        match self.run(&mut cur, None, &mut ctx)? {
            (value, StepOutcome::Continue) => Ok(DecodeAttempt::Complete {
                value,
                consumed: cur.position(),
            }),
            (_, StepOutcome::Eof) => Ok(DecodeAttempt::Incomplete),
        }
    }
}
