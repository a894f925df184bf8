//! Nested sub-descriptor fields.

use crate::cursor::Cursor;
use crate::descriptor::{DecodeCtx, Descriptor, FieldStep, FixedSize, StepOutcome};
use crate::error::Error;
use crate::value::{Object, Value};

pub struct NestStep {
    pub name: &'static str,
    pub sub: Descriptor,
}

impl FieldStep for NestStep {
    fn decode(
        &self,
        cur: &mut Cursor<'_>,
        obj: &mut Object,
        ctx: &mut DecodeCtx<'_>,
    ) -> Result<StepOutcome, Error> {
        ctx.guard.enter(ctx.limits.max_depth)?;
        let result = self.sub.run(cur, Some(obj), ctx);
        ctx.guard.exit();
        let (child, outcome) = result?;
        match outcome {
            StepOutcome::Eof => Ok(StepOutcome::Eof),
            StepOutcome::Continue => {
                obj.insert(self.name, Value::Object(child));
                Ok(StepOutcome::Continue)
            }
        }
    }

    fn fixed_size(&self) -> FixedSize {
        self.sub.fixed_size()
    }
}
