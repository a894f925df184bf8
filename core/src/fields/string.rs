//! String fields: fixed-length or zero-terminated.

use crate::cursor::Cursor;
use crate::descriptor::{DecodeCtx, FieldStep, FixedSize, StepOutcome};
use crate::error::Error;
use crate::options::{Length, Options};
use crate::value::{Object, Value};

/// How a string field determines where it ends.
pub enum StringMode {
    /// Read exactly `length` bytes (resolved per §4.1's `Length` rules).
    Fixed(Length),
    /// Read one byte at a time until a `0x00` terminator, or `max` bytes
    /// have been read (whichever comes first).
    ZeroTerminated { max: Option<usize> },
}

pub struct StringStep {
    pub name: &'static str,
    pub mode: StringMode,
    pub strip_null: bool,
    pub strict_utf8: bool,
    pub opts: Options,
}

impl StringStep {
    fn decode_bytes(&self, cur: &mut Cursor<'_>, obj: &Object) -> Result<Option<Vec<u8>>, Error> {
        match &self.mode {
            StringMode::Fixed(length) => {
                let n = length.resolve(obj, self.name)?;
                Ok(cur.take(n).map(|b| b.to_vec()))
            }
            StringMode::ZeroTerminated { max } => {
                let mut bytes = Vec::new();
                loop {
                    if let Some(max) = max {
                        if bytes.len() >= *max {
                            return Ok(Some(bytes));
                        }
                    }
                    match cur.take_one() {
                        Some(0) => return Ok(Some(bytes)),
                        Some(b) => bytes.push(b),
                        None => {
                            // Eof mid-string, with or without bytes read so
                            // far, never yields a partial string.
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }
}

impl FieldStep for StringStep {
    fn decode(
        &self,
        cur: &mut Cursor<'_>,
        obj: &mut Object,
        _ctx: &mut DecodeCtx<'_>,
    ) -> Result<StepOutcome, Error> {
        let Some(bytes) = self.decode_bytes(cur, obj)? else {
            return Ok(StepOutcome::Eof);
        };
        let decoded = if self.strict_utf8 {
            String::from_utf8(bytes).map_err(|_| Error::Assert { field: self.name })?
        } else {
            String::from_utf8_lossy(&bytes).into_owned()
        };
        let decoded = if self.strip_null {
            decoded.trim_end_matches('\0').to_string()
        } else {
            decoded
        };
        let stored = self.opts.finish(obj, self.name, Value::Str(decoded))?;
        obj.insert(self.name, stored);
        Ok(StepOutcome::Continue)
    }

    fn fixed_size(&self) -> FixedSize {
        match &self.mode {
            StringMode::Fixed(Length::Fixed(n)) => FixedSize::Known(*n),
            _ => FixedSize::Unknown,
        }
    }
}
