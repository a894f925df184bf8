//! The read protocol connecting field parsers to a byte source.

/// A borrowed view of the bytes currently available for one decode attempt.
///
/// `Cursor` always answers synchronously: by the time a field step runs,
/// the driver (`exec`/`stream`) has already decided which bytes are
/// available for this attempt. A step seeing `None` from `take` means only
/// "not enough of the currently available bytes" — whether that is
/// permanent EOF or "wait for more bytes" is a decision the driver makes,
/// not the cursor.
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over `bytes`, starting at position 0.
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Takes exactly `n` contiguous bytes, advancing the cursor.
    ///
    /// Returns `None` without advancing if fewer than `n` bytes remain.
    /// Never returns a short slice.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`; every field step requests a positive width.
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        assert!(n >= 1, "Cursor::take requires n >= 1");
        if self.remaining() < n {
            return None;
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    /// Takes a single byte, advancing the cursor by one.
    ///
    /// Used by zero-terminated string decoding, which reads one byte at a
    /// time looking for a terminator.
    pub fn take_one(&mut self) -> Option<u8> {
        self.take(1).map(|s| s[0])
    }

    /// Number of bytes remaining in this attempt.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Takes all remaining bytes, advancing the cursor to the end.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.bytes[self.pos..];
        self.pos = self.bytes.len();
        slice
    }

    /// Current byte offset into the underlying slice.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_exact() {
        let mut cur = Cursor::new(&[1, 2, 3, 4]);
        assert_eq!(cur.take(2), Some(&[1, 2][..]));
        assert_eq!(cur.take(2), Some(&[3, 4][..]));
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn take_insufficient_does_not_advance() {
        let mut cur = Cursor::new(&[1, 2, 3]);
        assert_eq!(cur.take(4), None);
        assert_eq!(cur.remaining(), 3);
        assert_eq!(cur.take(3), Some(&[1, 2, 3][..]));
    }

    #[test]
    fn take_one_and_rest() {
        let mut cur = Cursor::new(&[1, 2, 3]);
        assert_eq!(cur.take_one(), Some(1));
        assert_eq!(cur.rest(), &[2, 3]);
        assert_eq!(cur.take_one(), None);
    }

    #[test]
    #[should_panic(expected = "n >= 1")]
    fn take_zero_panics() {
        let mut cur = Cursor::new(&[1]);
        let _ = cur.take(0);
    }
}
