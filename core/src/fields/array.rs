//! Repeated fields: count-terminated, predicate-terminated, or EOF-terminated.

use crate::cursor::Cursor;
use crate::descriptor::{DecodeCtx, Descriptor, FieldStep, FixedSize, StepOutcome};
use crate::error::Error;
use crate::options::{Length, ReadUntil};
use crate::value::{Object, Value};

/// How an array field decides it has read enough elements.
pub enum Terminator {
    /// Read a resolved, finite number of elements.
    Count(Length),
    /// Read until `Cursor` or the predicate decides to stop.
    Open(ReadUntil),
}

pub struct ArrayStep {
    pub name: &'static str,
    pub element: Descriptor,
    pub terminator: Terminator,
    /// When set, the sequence is stored as `Value::Map`, keyed by each
    /// element's `key` field (an `Object` element). Later entries overwrite
    /// earlier ones on collision.
    pub key: Option<&'static str>,
}

/// A one-field element descriptor's single value is unwrapped to a bare
/// `Value` rather than kept as a one-field `Value::Object`, matching how
/// element descriptors for primitive arrays are typically a single
/// primitive step; multi-field element descriptors keep their `Object`
/// wrapping.
fn unwrap_element(obj: Object) -> Value {
    if obj.len() != 1 {
        return Value::Object(obj);
    }
    let value = obj.iter().next().map(|(_, v)| v.clone());
    match value {
        Some(v) => v,
        None => Value::Object(obj),
    }
}

impl ArrayStep {
    fn decode_one(
        &self,
        cur: &mut Cursor<'_>,
        parent: &Object,
        ctx: &mut DecodeCtx<'_>,
    ) -> Result<Option<Value>, Error> {
        ctx.guard.enter(ctx.limits.max_depth)?;
        let result = self.element.run(cur, Some(parent), ctx);
        ctx.guard.exit();
        let (child, outcome) = result?;
        Ok(match outcome {
            StepOutcome::Eof => None,
            StepOutcome::Continue => Some(unwrap_element(child)),
        })
    }

    fn check_limit(&self, count: usize, ctx: &DecodeCtx<'_>) -> Result<(), Error> {
        if count > ctx.limits.max_array_len {
            return Err(Error::ArrayTooLong {
                len: count,
                limit: ctx.limits.max_array_len,
            });
        }
        Ok(())
    }

    fn store(&self, obj: &mut Object, elements: Vec<Value>) {
        match self.key {
            Some(key) => {
                let mut map = Object::new();
                for element in elements {
                    if let Some(name) = element.as_object().and_then(|o| o.get(key)) {
                        let name = match name {
                            Value::Str(s) => s.clone(),
                            other => other.to_string(),
                        };
                        map.insert(name, element);
                    }
                }
                obj.insert(self.name, Value::Map(map));
            }
            None => obj.insert(self.name, Value::Array(elements)),
        }
    }
}

impl FieldStep for ArrayStep {
    fn decode(
        &self,
        cur: &mut Cursor<'_>,
        obj: &mut Object,
        ctx: &mut DecodeCtx<'_>,
    ) -> Result<StepOutcome, Error> {
        let mut elements = Vec::new();
        let mut hit_eof = false;

        match &self.terminator {
            Terminator::Count(length) => {
                let n = length.resolve(obj, self.name)?;
                for _ in 0..n {
                    match self.decode_one(cur, obj, ctx)? {
                        Some(v) => elements.push(v),
                        None => {
                            hit_eof = true;
                            break;
                        }
                    }
                }
            }
            Terminator::Open(ReadUntil::Eof) => loop {
                match self.decode_one(cur, obj, ctx)? {
                    Some(v) => {
                        elements.push(v);
                        self.check_limit(elements.len(), ctx)?;
                    }
                    None => {
                        hit_eof = true;
                        break;
                    }
                }
            },
            Terminator::Open(ReadUntil::Predicate(pred)) => loop {
                match self.decode_one(cur, obj, ctx)? {
                    Some(v) => {
                        let stop = pred(&v);
                        elements.push(v);
                        self.check_limit(elements.len(), ctx)?;
                        if stop {
                            break;
                        }
                    }
                    None => {
                        hit_eof = true;
                        break;
                    }
                }
            },
        }

        // A partial read is only acceptable once we know no more bytes are
        // coming; during a retryable streaming attempt, reporting `Eof`
        // here (even with elements already read) lets the driver wait for
        // the rest instead of committing a short array.
        if hit_eof && (elements.is_empty() || !ctx.is_final) {
            return Ok(StepOutcome::Eof);
        }

        self.store(obj, elements);
        Ok(StepOutcome::Continue)
    }

    fn fixed_size(&self) -> FixedSize {
        match (&self.terminator, self.element.fixed_size()) {
            (Terminator::Count(Length::Fixed(n)), FixedSize::Known(elem)) => {
                FixedSize::Known(n * elem)
            }
            _ => FixedSize::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DescriptorBuilder;
    use crate::primitive::Primitive;

    fn u8_element() -> Descriptor {
        DescriptorBuilder::new().primitive("v", Primitive::U8).build().unwrap()
    }

    #[test]
    fn count_terminated() {
        let step = ArrayStep {
            name: "xs",
            element: u8_element(),
            terminator: Terminator::Count(Length::Fixed(3)),
            key: None,
        };
        let limits = crate::config::ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[1, 2, 3, 4]);
        let mut obj = Object::new();
        step.decode(&mut cur, &mut obj, &mut ctx).unwrap();
        assert_eq!(
            obj.get("xs").unwrap().as_array().unwrap(),
            &[Value::UInt(1), Value::UInt(2), Value::UInt(3)]
        );
        assert_eq!(cur.remaining(), 1);
    }

    #[test]
    fn count_terminated_partial_on_eof_is_kept() {
        let step = ArrayStep {
            name: "xs",
            element: u8_element(),
            terminator: Terminator::Count(Length::Fixed(5)),
            key: None,
        };
        let limits = crate::config::ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[1, 2]);
        let mut obj = Object::new();
        step.decode(&mut cur, &mut obj, &mut ctx).unwrap();
        assert_eq!(
            obj.get("xs").unwrap().as_array().unwrap(),
            &[Value::UInt(1), Value::UInt(2)]
        );
    }

    #[test]
    fn eof_terminated_empty_propagates_eof() {
        let step = ArrayStep {
            name: "xs",
            element: u8_element(),
            terminator: Terminator::Open(ReadUntil::Eof),
            key: None,
        };
        let limits = crate::config::ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[]);
        let mut obj = Object::new();
        assert_eq!(
            step.decode(&mut cur, &mut obj, &mut ctx).unwrap(),
            StepOutcome::Eof
        );
    }

    #[test]
    fn eof_terminated_reads_to_end() {
        let step = ArrayStep {
            name: "xs",
            element: u8_element(),
            terminator: Terminator::Open(ReadUntil::Eof),
            key: None,
        };
        let limits = crate::config::ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[9, 8, 7]);
        let mut obj = Object::new();
        step.decode(&mut cur, &mut obj, &mut ctx).unwrap();
        assert_eq!(
            obj.get("xs").unwrap().as_array().unwrap(),
            &[Value::UInt(9), Value::UInt(8), Value::UInt(7)]
        );
    }

    #[test]
    fn array_too_long_errors() {
        let step = ArrayStep {
            name: "xs",
            element: u8_element(),
            terminator: Terminator::Open(ReadUntil::Eof),
            key: None,
        };
        let limits = crate::config::ParseLimits::new().with_max_array_len(2);
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[1, 2, 3]);
        let mut obj = Object::new();
        assert_eq!(
            step.decode(&mut cur, &mut obj, &mut ctx),
            Err(Error::ArrayTooLong { len: 3, limit: 2 })
        );
    }

    #[test]
    fn key_builds_map() {
        let element = DescriptorBuilder::new()
            .primitive("id", Primitive::U8)
            .primitive("val", Primitive::U8)
            .build()
            .unwrap();
        let step = ArrayStep {
            name: "xs",
            element,
            terminator: Terminator::Count(Length::Fixed(2)),
            key: Some("id"),
        };
        let limits = crate::config::ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[1, 10, 2, 20]);
        let mut obj = Object::new();
        step.decode(&mut cur, &mut obj, &mut ctx).unwrap();
        let map = obj.get("xs").unwrap().as_object().unwrap();
        assert_eq!(
            map.get("1").unwrap().as_object().unwrap().get("val").unwrap().as_uint(),
            Some(10)
        );
    }
}
