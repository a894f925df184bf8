//! Raw byte-slice fields.

use crate::cursor::Cursor;
use crate::descriptor::{DecodeCtx, FieldStep, FixedSize, StepOutcome};
use crate::error::Error;
use crate::options::{Length, Options};
use crate::value::{Object, Value};

pub enum BufferMode {
    Length(Length),
    ReadToEof,
}

pub struct BufferStep {
    pub name: &'static str,
    pub mode: BufferMode,
    pub opts: Options,
}

impl FieldStep for BufferStep {
    fn decode(
        &self,
        cur: &mut Cursor<'_>,
        obj: &mut Object,
        ctx: &mut DecodeCtx<'_>,
    ) -> Result<StepOutcome, Error> {
        let bytes = match &self.mode {
            BufferMode::Length(length) => {
                let n = length.resolve(obj, self.name)?;
                match cur.take(n) {
                    Some(b) => b.to_vec(),
                    None => return Ok(StepOutcome::Eof),
                }
            }
            // "Read to EOF" only means something once no more bytes are
            // coming; mid-stream, whatever is currently buffered is not
            // necessarily everything the source will ever send.
            BufferMode::ReadToEof if !ctx.is_final => return Ok(StepOutcome::Eof),
            BufferMode::ReadToEof => cur.rest().to_vec(),
        };
        let stored = self.opts.finish(obj, self.name, Value::Bytes(bytes))?;
        obj.insert(self.name, stored);
        Ok(StepOutcome::Continue)
    }

    fn fixed_size(&self) -> FixedSize {
        match &self.mode {
            BufferMode::Length(Length::Fixed(n)) => FixedSize::Known(*n),
            _ => FixedSize::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_length() {
        let step = BufferStep {
            name: "b",
            mode: BufferMode::Length(Length::Fixed(3)),
            opts: Options::new(),
        };
        let limits = crate::config::ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[1, 2, 3, 4, 5]);
        let mut obj = Object::new();
        step.decode(&mut cur, &mut obj, &mut ctx).unwrap();
        assert_eq!(obj.get("b"), Some(&Value::Bytes(vec![1, 2, 3])));
    }

    #[test]
    fn read_to_eof() {
        let step = BufferStep {
            name: "b",
            mode: BufferMode::ReadToEof,
            opts: Options::new(),
        };
        let limits = crate::config::ParseLimits::default();
        let mut ctx = DecodeCtx::new(&limits);
        let mut cur = Cursor::new(&[1, 2, 3]);
        let mut obj = Object::new();
        step.decode(&mut cur, &mut obj, &mut ctx).unwrap();
        assert_eq!(obj.get("b"), Some(&Value::Bytes(vec![1, 2, 3])));
        assert_eq!(cur.remaining(), 0);
    }
}
