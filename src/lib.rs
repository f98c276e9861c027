//! `gribflip`: a bidirectional codec between WMO GRIB edition 1 and
//! edition 2 meteorological gridded-data messages.
//!
//! The crate is organized the way the codec's own data flows: wire-level
//! primitives ([`bitstream`], [`ibm_float`], [`calendar`]) at the bottom,
//! the edition-agnostic in-memory model ([`model`]) and translation tables
//! ([`codetables`]) in the middle, then the per-edition decoders/encoders,
//! and [`driver`] tying a full conversion together for the binaries in
//! `src/bin/`.

pub mod bitstream;
pub mod calendar;
pub mod codetables;
pub mod decoder1;
pub mod decoder2;
pub mod driver;
pub mod encoder1;
pub mod encoder2;
pub mod error;
pub mod grid;
pub mod gridpoint;
pub mod ibm_float;
pub mod model;

pub use driver::{convert_1_to_2, convert_2_to_1, convert_2_to_1_with_jpeg, detect_edition};
pub use error::{GribFlipError, IgnoreWarnings, StderrWarn, Warn, Warning};
pub use model::Message;
