//! The packed bit-field block parser.

use crate::cursor::Cursor;
use crate::descriptor::{DecodeCtx, FieldStep, FixedSize, StepOutcome};
use crate::error::{BuildError, Error};
use crate::value::{Object, Value};

/// The maximum total width, in bits, a bit-field block may declare.
///
/// This crate targets native 64-bit integers throughout, so a block is
/// read as one `u64`; 53 bits keeps the value exactly representable as an
/// `f64` too, per the distilled spec's own precision ceiling.
pub const MAX_BITFIELD_WIDTH: usize = 53;

/// One declared entry within a bit-field block.
#[derive(Clone)]
pub struct BitEntry {
    /// Dotted field path; length > 1 writes into a nested sub-object,
    /// creating intermediate objects on demand.
    pub path: Vec<&'static str>,
    pub bits: usize,
}

pub struct BitfieldStep {
    pub entries: Vec<BitEntry>,
    pub total_bits: usize,
}

impl BitfieldStep {
    /// Validates entry widths against `total_bits` and the 53-bit ceiling.
    /// Called from the builder at construction time.
    pub fn validate(entries: &[BitEntry], total_bits: usize) -> Result<(), BuildError> {
        if entries.is_empty() {
            return Err(BuildError::BitfieldEmpty);
        }
        if total_bits > MAX_BITFIELD_WIDTH {
            return Err(BuildError::BitfieldTooWide {
                width: total_bits,
                max: MAX_BITFIELD_WIDTH,
            });
        }
        let declared: usize = entries.iter().map(|e| e.bits).sum();
        if declared != total_bits {
            return Err(BuildError::BitfieldOverflow {
                declared,
                total: total_bits,
            });
        }
        Ok(())
    }

    fn write_path(obj: &mut Object, path: &[&'static str], value: Value) {
        match path {
            [] => unreachable!("bit-field entry path is never empty"),
            [name] => obj.insert(*name, value),
            [head, rest @ ..] => {
                let mut child = match obj.get(head) {
                    Some(Value::Object(o)) => o.clone(),
                    _ => Object::new(),
                };
                Self::write_path(&mut child, rest, value);
                obj.insert(*head, Value::Object(child));
            }
        }
    }
}

impl FieldStep for BitfieldStep {
    fn decode(
        &self,
        cur: &mut Cursor<'_>,
        obj: &mut Object,
        _ctx: &mut DecodeCtx<'_>,
    ) -> Result<StepOutcome, Error> {
        let byte_len = self.total_bits.div_ceil(8);
        let Some(bytes) = cur.take(byte_len) else {
            return Ok(StepOutcome::Eof);
        };

        let mut raw: u64 = 0;
        for &b in bytes {
            raw = (raw << 8) | b as u64;
        }
        let padding = byte_len * 8 - self.total_bits;
        let clean = raw >> padding;

        let mut shift = self.total_bits;
        for entry in &self.entries {
            shift -= entry.bits;
            let mask = if entry.bits == 64 {
                u64::MAX
            } else {
                (1u64 << entry.bits) - 1
            };
            let value = (clean >> shift) & mask;
            Self::write_path(obj, &entry.path, Value::UInt(value));
        }

        Ok(StepOutcome::Continue)
    }

    fn fixed_size(&self) -> FixedSize {
        FixedSize::Known(self.total_bits.div_ceil(8))
    }
}
