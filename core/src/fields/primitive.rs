//! Fixed-width primitive fields: `u8`, `u16le`, `f64be`, ...

use crate::cursor::Cursor;
use crate::descriptor::{DecodeCtx, FieldStep, FixedSize, StepOutcome};
use crate::error::Error;
use crate::options::Options;
use crate::primitive::Primitive;
use crate::value::Object;

pub struct PrimitiveStep {
    pub name: &'static str,
    pub prim: Primitive,
    pub opts: Options,
}

impl FieldStep for PrimitiveStep {
    fn decode(
        &self,
        cur: &mut Cursor<'_>,
        obj: &mut Object,
        _ctx: &mut DecodeCtx<'_>,
    ) -> Result<StepOutcome, Error> {
        let Some(bytes) = cur.take(self.prim.width()) else {
            return Ok(StepOutcome::Eof);
        };
        let raw = self.prim.decode(bytes);
        let stored = self.opts.finish(obj, self.name, raw)?;
        obj.insert(self.name, stored);
        Ok(StepOutcome::Continue)
    }

    fn fixed_size(&self) -> FixedSize {
        FixedSize::Known(self.prim.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseLimits;
    use crate::value::Value;

    #[test]
    fn decodes_and_inserts() {
        let step = PrimitiveStep {
            name: "x",
            prim: Primitive::U16Be,
            opts: Options::new(),
        };
        let limits = ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[0x01, 0x02, 0xFF]);
        let mut obj = Object::new();
        assert_eq!(step.decode(&mut cur, &mut obj, &mut ctx).unwrap(), StepOutcome::Continue);
        assert_eq!(obj.get("x"), Some(&Value::UInt(0x0102)));
        assert_eq!(cur.remaining(), 1);
    }

    #[test]
    fn eof_on_short_input() {
        let step = PrimitiveStep {
            name: "x",
            prim: Primitive::U32Be,
            opts: Options::new(),
        };
        let limits = ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[0x01]);
        let mut obj = Object::new();
        assert_eq!(step.decode(&mut cur, &mut obj, &mut ctx).unwrap(), StepOutcome::Eof);
        assert_eq!(cur.remaining(), 1);
    }

    #[test]
    fn assert_rejects() {
        let step = PrimitiveStep {
            name: "x",
            prim: Primitive::U8,
            opts: Options::new().assert(|_, v| v.as_uint() == Some(0)),
        };
        let limits = ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[5]);
        let mut obj = Object::new();
        assert_eq!(
            step.decode(&mut cur, &mut obj, &mut ctx),
            Err(Error::Assert { field: "x" })
        );
    }
}
