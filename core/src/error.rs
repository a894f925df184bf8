//! Core error types for bytewise.
//!
//! User-defined wrapping error types should implement `From<bytewise_core::Error>`
//! to integrate with bytewise's built-in error handling.

use core::fmt;

/// Errors raised while building a [`Descriptor`](crate::Descriptor).
///
/// These are always returned synchronously from a
/// [`DescriptorBuilder`](crate::DescriptorBuilder) method or from
/// `.build()`, before any decoding happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A bit-field block's total width exceeded the 53-bit precision limit.
    BitfieldTooWide {
        /// The requested total width, in bits.
        width: usize,
        /// The maximum supported width (53).
        max: usize,
    },
    /// A bit-field block was declared with zero entries.
    BitfieldEmpty,
    /// A bit-field entry's width did not fit in the block's declared total.
    BitfieldOverflow {
        /// Sum of entry widths declared so far, in bits.
        declared: usize,
        /// The block's total width, in bits.
        total: usize,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::BitfieldTooWide { width, max } => {
                write!(f, "bitfield width {width} exceeds the {max}-bit limit")
            }
            BuildError::BitfieldEmpty => write!(f, "bitfield has no entries"),
            BuildError::BitfieldOverflow { declared, total } => {
                write!(
                    f,
                    "bitfield entries declare {declared} bits but the block is {total} bits wide"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

/// Core bytewise error type, returned from decoding.
///
/// This enum captures errors that originate from bytewise's own combinators.
/// `Eof` reaching the end of the currently available bytes is *not* a
/// variant here: it is not an error (see `crate::cursor`) and is instead
/// folded into `Ok(None)` at the `parse`/`poll` boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A descriptor failed to build.
    Build(BuildError),

    /// A field's `assert` option rejected the decoded value.
    Assert {
        /// Name of the field that failed assertion.
        field: &'static str,
    },

    /// A `length: "name"` option referenced a field not yet present in the
    /// object being built.
    OptionResolution {
        /// Name of the field whose length option failed to resolve.
        field: &'static str,
        /// Name of the referenced option field.
        option: &'static str,
    },

    /// Decode-time nesting exceeded the configured recursion limit.
    ///
    /// Exists to prevent stack overflow when a recursive descriptor (a
    /// `choice`/`nest` that can select itself) is driven by adversarially
    /// deep input.
    RecursionLimitExceeded {
        /// Current recursion depth when the limit was exceeded.
        depth: usize,
        /// Maximum allowed recursion depth.
        limit: usize,
    },

    /// An `array` terminated by EOF or a predicate grew past the configured
    /// element-count limit before its terminator was satisfied.
    ArrayTooLong {
        /// Number of elements read so far.
        len: usize,
        /// Maximum allowed element count.
        limit: usize,
    },

    /// The underlying byte source failed.
    ///
    /// Only reachable via the `tokio` feature's `Decoder` adapter, whose
    /// `Decoder::Error` trait bound requires `From<std::io::Error>`; this
    /// crate's own cursor/stream execution never produces I/O errors.
    Io {
        /// `Display` of the underlying `std::io::Error`.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Build(e) => write!(f, "build error: {e}"),
            Error::Assert { field } => write!(f, "assertion failed for field `{field}`"),
            Error::OptionResolution { field, option } => {
                write!(
                    f,
                    "field `{field}` referenced unresolved option `{option}`"
                )
            }
            Error::RecursionLimitExceeded { depth, limit } => {
                write!(
                    f,
                    "recursion limit exceeded: depth {depth} > limit {limit}"
                )
            }
            Error::ArrayTooLong { len, limit } => {
                write!(f, "array exceeded length limit: {len} > {limit}")
            }
            Error::Io { message } => write!(f, "I/O error: {message}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<BuildError> for Error {
    fn from(e: BuildError) -> Self {
        Error::Build(e)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io {
            message: e.to_string(),
        }
    }
}
