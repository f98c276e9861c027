//! Static bidirectional translation tables between GRIB-1 and GRIB-2 code
//! spaces, grounded on the teacher crate's `codetables.rs`/`codetables/core.rs`
//! data-table idiom rather than the nested `switch` statements of the
//! original source (spec.md §9 redesign flag).

pub mod level;
pub mod param;
pub mod time_range;
