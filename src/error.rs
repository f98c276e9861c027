use std::fmt::{self, Display, Formatter};

/// Warnings raised during a decode or encode that do not abort the current
/// message. Routed through [`crate::Warn`] rather than returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Warning {
    /// Garbage was skipped while resynchronizing on the `"GRIB"` magic.
    Resync { skipped: usize },
    /// The trailing `"7777"` end marker was missing or malformed.
    MissingEndMarker,
    /// A parameter code had no entry in the translation table.
    UnmappedParameter { centre: u16, table: u8, code: u8 },
    /// A GRIB-2 `(discipline, category, number)` triple had no entry in the
    /// translation table going the other way.
    UnmappedParameterReverse { centre: u16, discipline: u8, category: u8, number: u8 },
    /// An ensemble, derived-forecast, or spatial-processing block was packed
    /// into the GRIB-1 PDS extension octets (41-43) because GRIB-1 has no
    /// native representation for it.
    ExtensionPackedIntoPds1 { kind: &'static str },
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resync { skipped } => {
                write!(f, "skipped {skipped} byte(s) of garbage before next \"GRIB\"")
            }
            Self::MissingEndMarker => write!(f, "message is missing trailing \"7777\" marker"),
            Self::UnmappedParameter {
                centre,
                table,
                code,
            } => write!(
                f,
                "no parameter mapping for centre {centre}, table {table}, code {code}; falling back to 255"
            ),
            Self::UnmappedParameterReverse {
                centre,
                discipline,
                category,
                number,
            } => write!(
                f,
                "no reverse parameter mapping for centre {centre}, discipline {discipline}, category {category}, number {number}; falling back to table 3 code 255"
            ),
            Self::ExtensionPackedIntoPds1 { kind } => {
                write!(f, "{kind} has no GRIB-1 representation; packed into PDS extension")
            }
        }
    }
}

/// Receives non-fatal [`Warning`]s as they are raised.
///
/// The default CLI driver forwards every warning to standard error, one
/// line per event, matching the behavior described for the reference
/// command-line tools. Library users that don't care can pass
/// [`IgnoreWarnings`].
pub trait Warn {
    fn warn(&self, warning: Warning);
}

/// Prints every warning to stderr, one line per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrWarn;

impl Warn for StderrWarn {
    fn warn(&self, warning: Warning) {
        eprintln!("warning: {warning}");
    }
}

/// Discards every warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreWarnings;

impl Warn for IgnoreWarnings {
    fn warn(&self, _warning: Warning) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseError {
    NotGrib,
    UnsupportedEdition(u8),
    TruncatedRead { expected: usize, available: usize },
    EndOfStream,
    LengthMismatch { declared: usize, actual: usize },
    UnknownSectionNumber(u8),
    InvalidSectionOrder { offset: usize, section: u8 },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotGrib => write!(f, "input does not start with \"GRIB\" magic"),
            Self::UnsupportedEdition(e) => write!(f, "unsupported GRIB edition {e}"),
            Self::TruncatedRead {
                expected,
                available,
            } => write!(
                f,
                "truncated read: expected {expected} byte(s), only {available} available"
            ),
            Self::EndOfStream => write!(f, "end of stream"),
            Self::LengthMismatch { declared, actual } => write!(
                f,
                "section length mismatch: declared {declared}, actual {actual}"
            ),
            Self::UnknownSectionNumber(n) => write!(f, "unknown section number {n}"),
            Self::InvalidSectionOrder { offset, section } => write!(
                f,
                "section {section} out of order at byte offset {offset}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodeError {
    FieldTooWide { requested: u32 },
    UnsupportedTemplate { kind: &'static str, number: u16 },
    UnsupportedPacking { reason: &'static str },
    JpegDecodeError(String),
    BitmapLengthMismatch,
    PackWidthOverflow { width: u8 },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldTooWide { requested } => {
                write!(f, "cannot read/write a {requested}-bit field (max 32)")
            }
            Self::UnsupportedTemplate { kind, number } => {
                write!(f, "unsupported {kind} template number {number}")
            }
            Self::UnsupportedPacking { reason } => write!(f, "unsupported packing: {reason}"),
            Self::JpegDecodeError(msg) => write!(f, "JPEG 2000 decode error: {msg}"),
            Self::BitmapLengthMismatch => {
                write!(f, "bit-map length does not match declared point count")
            }
            Self::PackWidthOverflow { width } => {
                write!(f, "pack width {width} exceeds 32 bits")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EncodeError {
    UnmappedProcess,
    UnmappedLevel { level_type: u8 },
    UnmappedTimeRange { time_range: u8 },
    FieldTooWide { requested: u32 },
    UnsupportedGrid,
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedProcess => write!(
                f,
                "could not determine a statistical-process code for this time range"
            ),
            Self::UnmappedLevel { level_type } => {
                write!(f, "level type {level_type} has no translation and is unmapped")
            }
            Self::UnmappedTimeRange { time_range } => {
                write!(f, "time-range indicator {time_range} has no GRIB-2 template")
            }
            Self::FieldTooWide { requested } => {
                write!(f, "cannot pack a {requested}-bit field (max 32)")
            }
            Self::UnsupportedGrid => write!(f, "grid geometry has no encoding for this edition"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GribFlipError {
    Parse(ParseError),
    Decode(DecodeError),
    Encode(EncodeError),
    /// A translation table lookup failed in a way the caller marked fatal
    /// (statistical-process codes have no documented fallback).
    UnmappedProcess,
}

impl From<ParseError> for GribFlipError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<DecodeError> for GribFlipError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<EncodeError> for GribFlipError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl Display for GribFlipError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Decode(e) => write!(f, "{e}"),
            Self::Encode(e) => write!(f, "{e}"),
            Self::UnmappedProcess => write!(f, "unmapped statistical process (fatal)"),
        }
    }
}

impl std::error::Error for GribFlipError {}
