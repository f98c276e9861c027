//! Gridpoint pack/unpack engine for GRIB-2 Data Sections.
//!
//! Three packing families per spec.md §4.7: simple, complex with spatial
//! differencing (decode only — encoding complex-packed fields is an
//! explicit Non-goal, spec.md §1), and an externally supplied JPEG-2000
//! decoder. GRIB-1's own (much simpler) BDS unpack/pack lives in
//! `crate::decoder1`/`crate::encoder1` directly since it has no template
//! dispatch of its own.

pub mod complex;
pub mod jpeg2000;
pub mod simple;

use crate::model::MISSING;

/// `value = R + packed * 2^E / 10^D`, shared by every GRIB-2 packing
/// template's final unscale step.
pub fn unscale(packed: i64, reference_value: f64, binary_scale: i16, decimal_scale: i16) -> f64 {
    reference_value + (packed as f64) * 2f64.powi(binary_scale as i32) / 10f64.powi(decimal_scale as i32)
}

/// Applies a bitmap over a dense sequence of unpacked values, yielding
/// `nx*ny` points with `MISSING` at every bit-map-absent position. `values`
/// must contain exactly as many entries as the bitmap has set bits.
pub fn apply_bitmap(bitmap: Option<&[bool]>, mut values: impl Iterator<Item = f64>, num_points: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(num_points);
    match bitmap {
        None => {
            for _ in 0..num_points {
                out.push(values.next().unwrap_or(MISSING));
            }
        }
        Some(bits) => {
            for &present in bits.iter().take(num_points) {
                if present {
                    out.push(values.next().unwrap_or(MISSING));
                } else {
                    out.push(MISSING);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscale_identity_when_scales_zero() {
        assert_eq!(unscale(5, 10.0, 0, 0), 15.0);
    }

    #[test]
    fn unscale_applies_binary_and_decimal_scale() {
        // R=0, packed=100, E=1 (x2), D=1 (/10) -> 100*2/10 = 20.0
        assert_eq!(unscale(100, 0.0, 1, 1), 20.0);
    }

    #[test]
    fn apply_bitmap_fills_missing_for_absent_points() {
        let bitmap = vec![true, false, true, true];
        let values = vec![1.0, 2.0, 3.0].into_iter();
        let out = apply_bitmap(Some(&bitmap), values, 4);
        assert_eq!(out, vec![1.0, MISSING, 2.0, 3.0]);
    }

    #[test]
    fn apply_bitmap_none_passes_through_all_points() {
        let values = vec![1.0, 2.0, 3.0, 4.0].into_iter();
        let out = apply_bitmap(None, values, 4);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
