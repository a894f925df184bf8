//! Discriminated-union fields: pick a sub-descriptor from already-decoded
//! fields, then decode it.

use std::sync::Arc;

use crate::cursor::Cursor;
use crate::descriptor::{DecodeCtx, Descriptor, FieldStep, FixedSize, StepOutcome};
use crate::error::Error;
use crate::value::{Object, Value};

pub type Chooser = Arc<dyn Fn(&Object) -> Result<Descriptor, Error> + Send + Sync>;

pub struct ChoiceStep {
    pub name: &'static str,
    pub chooser: Chooser,
}

impl FieldStep for ChoiceStep {
    fn decode(
        &self,
        cur: &mut Cursor<'_>,
        obj: &mut Object,
        ctx: &mut DecodeCtx<'_>,
    ) -> Result<StepOutcome, Error> {
        let sub = (self.chooser)(obj)?;
        ctx.guard.enter(ctx.limits.max_depth)?;
        let result = sub.run(cur, Some(obj), ctx);
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
        // The selected sub-descriptor is not known until decode time, so a
        // choice field's size can never be statically known.
        FixedSize::Unknown
    }
}
