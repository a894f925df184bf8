//! The fluent combinator API: [`DescriptorBuilder`].

use std::sync::Arc;

use crate::bitfield::{BitEntry, BitfieldStep};
use crate::descriptor::{Ctor, Descriptor, FieldStep};
use crate::error::{BuildError, Error};
use crate::fields::array::{ArrayStep, Terminator};
use crate::fields::buffer::{BufferMode, BufferStep};
use crate::fields::choice::{ChoiceStep, Chooser};
use crate::fields::nest::NestStep;
use crate::fields::primitive::PrimitiveStep;
use crate::fields::string::{StringMode, StringStep};
use crate::options::{Length, Options, ReadUntil};
use crate::primitive::Primitive;
use crate::value::Object;

/// Incrementally composes a [`Descriptor`] from field declarations.
///
/// Each method consumes and returns `self`, appending one field step to the
/// chain; the existing chain always runs first, and a later step only runs
/// if no earlier step in the same attempt hit EOF. `.build()` finalizes the
/// chain into an immutable, shareable `Descriptor`.
pub struct DescriptorBuilder {
    steps: Vec<Box<dyn FieldStep>>,
    ctor: Option<Ctor>,
}

impl Default for DescriptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorBuilder {
    /// Starts an empty builder with the default object constructor.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            ctor: None,
        }
    }

    /// Overrides the output object constructor. `f` receives the parent
    /// object as read-only context when this descriptor is used as a
    /// `nest`/`choice`/array-element sub-descriptor, or `None` at the top
    /// level.
    pub fn with_ctor(mut self, f: impl Fn(Option<&Object>) -> Object + Send + Sync + 'static) -> Self {
        self.ctor = Some(Arc::new(f));
        self
    }

    fn push(mut self, step: impl FieldStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Appends a primitive field step for `prim`, with default options.
    pub fn primitive(self, name: &'static str, prim: Primitive) -> Self {
        self.primitive_with(name, prim, Options::new())
    }

    /// As [`Self::primitive`], with explicit [`Options`].
    pub fn primitive_with(self, name: &'static str, prim: Primitive, opts: Options) -> Self {
        self.push(PrimitiveStep { name, prim, opts })
    }

    /// Appends a string field read for `length` bytes, decoded as UTF-8.
    pub fn string(self, name: &'static str, length: Length) -> Self {
        self.string_with(name, StringMode::Fixed(length), Options::new(), false, false)
    }

    /// Appends a zero-terminated string field, optionally bounded by `max`
    /// bytes.
    pub fn zero_terminated_string(self, name: &'static str, max: Option<usize>) -> Self {
        self.string_with(
            name,
            StringMode::ZeroTerminated { max },
            Options::new(),
            false,
            false,
        )
    }

    /// Full control over a string field's mode and post-decode knobs.
    pub fn string_with(
        self,
        name: &'static str,
        mode: StringMode,
        opts: Options,
        strip_null: bool,
        strict_utf8: bool,
    ) -> Self {
        self.push(StringStep {
            name,
            mode,
            strip_null,
            strict_utf8,
            opts,
        })
    }

    /// Appends a raw byte-slice field of `length` bytes.
    pub fn buffer(self, name: &'static str, length: Length) -> Self {
        self.buffer_with(name, BufferMode::Length(length), Options::new())
    }

    /// Appends a raw byte-slice field that reads to the end of the current
    /// attempt's available bytes.
    pub fn buffer_to_eof(self, name: &'static str) -> Self {
        self.buffer_with(name, BufferMode::ReadToEof, Options::new())
    }

    /// Full control over a buffer field.
    pub fn buffer_with(self, name: &'static str, mode: BufferMode, opts: Options) -> Self {
        self.push(BufferStep { name, mode, opts })
    }

    /// Appends a nested sub-descriptor field.
    pub fn nest(self, name: &'static str, sub: Descriptor) -> Self {
        self.push(NestStep { name, sub })
    }

    /// Appends a fixed-count array field.
    pub fn array(self, name: &'static str, element: Descriptor, count: Length) -> Self {
        self.array_with(name, element, Terminator::Count(count), None)
    }

    /// Appends an EOF-terminated array field.
    pub fn array_to_eof(self, name: &'static str, element: Descriptor) -> Self {
        self.array_with(name, element, Terminator::Open(ReadUntil::Eof), None)
    }

    /// Appends a predicate-terminated array field; the satisfying element
    /// is kept.
    pub fn array_until(
        self,
        name: &'static str,
        element: Descriptor,
        pred: impl Fn(&crate::value::Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.array_with(
            name,
            element,
            Terminator::Open(ReadUntil::Predicate(Arc::new(pred))),
            None,
        )
    }

    /// Full control over an array field, including an optional `key` for
    /// `Value::Map` output.
    pub fn array_with(
        self,
        name: &'static str,
        element: Descriptor,
        terminator: Terminator,
        key: Option<&'static str>,
    ) -> Self {
        self.push(ArrayStep {
            name,
            element,
            terminator,
            key,
        })
    }

    /// Appends a discriminated-union field: `chooser` selects the
    /// sub-descriptor to decode, given the fields decoded so far.
    pub fn choice(self, name: &'static str, chooser: Chooser) -> Self {
        self.push(ChoiceStep { name, chooser })
    }

    /// Appends a packed bit-field block. Returns `Err(BuildError)` if the
    /// entries' widths don't sum to `total_bits`, are empty, or
    /// `total_bits` exceeds the 53-bit ceiling.
    pub fn bitfield(mut self, entries: Vec<BitEntry>, total_bits: usize) -> Result<Self, BuildError> {
        BitfieldStep::validate(&entries, total_bits)?;
        self.steps.push(Box::new(BitfieldStep {
            entries,
            total_bits,
        }));
        Ok(self)
    }

    /// Finalizes the chain into an immutable [`Descriptor`].
    pub fn build(self) -> Result<Descriptor, Error> {
        let ctor = self
            .ctor
            .unwrap_or_else(|| Arc::new(|_: Option<&Object>| Object::new()));
        Ok(Descriptor::new(self.steps, ctor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn builds_and_parses_two_primitives() {
        let d = DescriptorBuilder::new()
            .primitive("a", Primitive::U8)
            .primitive("b", Primitive::U8)
            .build()
            .unwrap();
        let obj = d.parse(&[1, 2]).unwrap().unwrap();
        assert_eq!(obj.get("a"), Some(&Value::UInt(1)));
        assert_eq!(obj.get("b"), Some(&Value::UInt(2)));
    }

    #[test]
    fn bitfield_rejects_empty() {
        let result = DescriptorBuilder::new().bitfield(vec![], 0);
        let err = match result {
            Err(e) => e,
            Ok(_) => panic!("expected a build error"),
        };
        assert_eq!(err, BuildError::BitfieldEmpty);
    }
}
