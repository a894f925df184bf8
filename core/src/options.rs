//! Common per-field options shared across field kinds.

use std::sync::Arc;

use crate::error::Error;
use crate::value::{Object, Value};

/// How a field's length (string/buffer) or element count (array) is
/// determined at decode time.
#[derive(Clone)]
pub enum Length {
    /// A compile-time-known, fixed byte/element count.
    Fixed(usize),
    /// Looked up from an already-decoded sibling field by name.
    Named(&'static str),
    /// Computed from the object decoded so far.
    Dynamic(Arc<dyn Fn(&Object) -> usize + Send + Sync>),
}

impl Length {
    pub(crate) fn resolve(&self, obj: &Object, field: &'static str) -> Result<usize, Error> {
        match self {
            Length::Fixed(n) => Ok(*n),
            Length::Named(name) => obj
                .get(name)
                .and_then(Value::as_uint)
                .map(|v| v as usize)
                .ok_or(Error::OptionResolution {
                    field,
                    option: name,
                }),
            Length::Dynamic(f) => Ok(f(obj)),
        }
    }
}

/// How a variable-length field (array, EOF-terminated buffer) decides when
/// it has read enough.
#[derive(Clone)]
pub enum ReadUntil {
    /// Read until the cursor runs out of bytes.
    Eof,
    /// Read until the predicate returns `true` for the most recently read
    /// element (the satisfying element is kept).
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

/// Common per-field knobs: a post-decode assertion, a value transform, and
/// (where applicable) a length/termination rule.
///
/// Both `assert` and `formatter` receive the in-progress object alongside
/// the field's own raw value, so they can validate or transform against
/// already-decoded sibling fields (a checksum over prior bytes, scaling a
/// reading by a previously read factor) rather than only the value in
/// isolation.
///
/// A builder-style struct rather than a dynamically typed option bag, so
/// each field kind's decode path stays monomorphic.
#[derive(Clone, Default)]
pub struct Options {
    pub(crate) assert: Option<Arc<AssertFn>>,
    pub(crate) formatter: Option<Arc<FormatterFn>>,
}

type AssertFn = dyn Fn(&Object, &Value) -> bool + Send + Sync;
type FormatterFn = dyn Fn(&Object, Value) -> Value + Send + Sync;

impl Options {
    /// An empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the decoded value (before `formatter` runs) when `pred`
    /// returns `false`, raising `Error::Assert`.
    pub fn assert(mut self, pred: impl Fn(&Object, &Value) -> bool + Send + Sync + 'static) -> Self {
        self.assert = Some(Arc::new(pred));
        self
    }

    /// Transforms the raw decoded value into the stored representation,
    /// after `assert` has run.
    pub fn formatter(mut self, f: impl Fn(&Object, Value) -> Value + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(f));
        self
    }

    /// Applies `assert` then `formatter` to `raw`, in that order, with
    /// `obj` as the in-progress object so far (not yet holding `field`).
    pub(crate) fn finish(&self, obj: &Object, field: &'static str, raw: Value) -> Result<Value, Error> {
        if let Some(assert) = &self.assert {
            if !assert(obj, &raw) {
                return Err(Error::Assert { field });
            }
        }
        Ok(match &self.formatter {
            Some(f) => f(obj, raw),
            None => raw,
        })
    }
}
