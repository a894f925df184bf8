//! The compiled, immutable parser: [`Descriptor`] and the [`FieldStep`] trait.

use std::sync::Arc;

use crate::config::{ParseLimits, RecursionGuard};
use crate::cursor::Cursor;
use crate::error::Error;
use crate::value::Object;

/// Total byte size of a descriptor, when statically known.
///
/// `Known` propagates additively across a chain of steps; any `Unknown`
/// step (a zero-terminated string, an EOF-terminated array or buffer, a
/// `choice`) renders the whole descriptor `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedSize {
    Known(usize),
    Unknown,
}

impl FixedSize {
    /// Folds this size with the next step's size, the way a descriptor
    /// accumulates its total as steps are appended.
    pub fn combine(self, next: FixedSize) -> FixedSize {
        match (self, next) {
            (FixedSize::Known(a), FixedSize::Known(b)) => FixedSize::Known(a + b),
            _ => FixedSize::Unknown,
        }
    }
}

/// The outcome of running one field step against a [`Cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step wrote its value(s); the chain should continue.
    Continue,
    /// The step ran out of available bytes before it could write a value.
    /// No later step in the same attempt runs.
    Eof,
}

/// Decode-time context threaded through a step chain: the shared resource
/// limits, the mutable recursion depth tracker, and whether this attempt is
/// running against genuinely final input.
///
/// `is_final` distinguishes a buffer `parse()` or a stream's `finish()` —
/// where a step seeing `Eof` really has hit the end of all input that will
/// ever arrive — from a mid-stream `poll()` attempt, where `Eof` only means
/// "not enough of the currently buffered bytes" and more may still be on
/// the way. Steps that tolerate trailing `Eof` (a count-terminated array
/// with some elements already read, a read-to-EOF buffer) must only apply
/// that tolerance when `is_final` is set; otherwise they'd commit to a
/// partial read that a retry with more bytes would have completed fully,
/// breaking chunking invariance for streamed input.
pub struct DecodeCtx<'a> {
    pub limits: &'a ParseLimits,
    pub guard: RecursionGuard,
    pub is_final: bool,
}

impl<'a> DecodeCtx<'a> {
    pub fn new(limits: &'a ParseLimits) -> Self {
        Self {
            limits,
            guard: RecursionGuard::new(),
            is_final: true,
        }
    }

    pub(crate) fn new_attempt(limits: &'a ParseLimits, is_final: bool) -> Self {
        Self {
            limits,
            guard: RecursionGuard::new(),
            is_final,
        }
    }
}

/// One decode action in a descriptor's chain.
///
/// Implementors live under `fields::*`; each writes exactly one name into
/// `obj` (or into a nested sub-object, for bit-field entries with a
/// multi-segment path) on `Continue`, or writes nothing on `Eof`.
pub trait FieldStep: Send + Sync {
    /// Runs this step against the cursor, writing into `obj` on success.
    fn decode(
        &self,
        cur: &mut Cursor<'_>,
        obj: &mut Object,
        ctx: &mut DecodeCtx<'_>,
    ) -> Result<StepOutcome, Error>;

    /// This step's contribution to the descriptor's total fixed size.
    fn fixed_size(&self) -> FixedSize;
}

/// A constructor for a descriptor's output object, given optional read-only
/// parent context (used by `nest`/`choice` children).
pub type Ctor = Arc<dyn Fn(Option<&Object>) -> Object + Send + Sync>;

/// An immutable, composed parser, built once via [`crate::builder::DescriptorBuilder`]
/// and reusable across any number of parses.
#[derive(Clone)]
pub struct Descriptor {
    pub(crate) steps: Arc<Vec<Box<dyn FieldStep>>>,
    pub(crate) ctor: Ctor,
    pub(crate) fixed_size: FixedSize,
}

impl Descriptor {
    pub(crate) fn new(steps: Vec<Box<dyn FieldStep>>, ctor: Ctor) -> Self {
        let fixed_size = steps
            .iter()
            .fold(FixedSize::Known(0), |acc, step| acc.combine(step.fixed_size()));
        Self {
            steps: Arc::new(steps),
            ctor,
            fixed_size,
        }
    }

    /// This descriptor's total byte size, if statically known.
    #[inline]
    pub fn fixed_size(&self) -> FixedSize {
        self.fixed_size
    }

    /// Runs this descriptor's step chain against `cur`, using `parent` as
    /// read-only context for the freshly constructed output object.
    ///
    /// Returns `StepOutcome::Eof` if any step hit `Eof`; in that case `obj`
    /// may contain a partial write and should be discarded by the caller.
    pub(crate) fn run(
        &self,
        cur: &mut Cursor<'_>,
        parent: Option<&Object>,
        ctx: &mut DecodeCtx<'_>,
    ) -> Result<(Object, StepOutcome), Error> {
        let mut obj = (self.ctor)(parent);
        for step in self.steps.iter() {
            match step.decode(cur, &mut obj, ctx)? {
                StepOutcome::Continue => continue,
                StepOutcome::Eof => return Ok((obj, StepOutcome::Eof)),
            }
        }
        Ok((obj, StepOutcome::Continue))
    }

    /// Parses a single in-memory buffer.
    ///
    /// Returns `Ok(Some(object))` if the chain completed without hitting
    /// EOF; `Ok(None)` if any step ran out of bytes (a single fixed buffer
    /// running out is true EOF — there is no more data coming); `Err` on an
    /// assertion or option-resolution failure.
    pub fn parse(&self, buffer: &[u8]) -> Result<Option<Object>, Error> {
        self.parse_with_limits(buffer, &ParseLimits::DEFAULT)
    }

    /// As [`Self::parse`], with caller-supplied resource limits.
    pub fn parse_with_limits(
        &self,
        buffer: &[u8],
        limits: &ParseLimits,
    ) -> Result<Option<Object>, Error> {
        let mut cur = Cursor::new(buffer);
        let mut ctx = DecodeCtx::new(limits);
        match self.run(&mut cur, None, &mut ctx)? {
            (obj, StepOutcome::Continue) => Ok(Some(obj)),
            (_, StepOutcome::Eof) => Ok(None),
        }
    }
}
