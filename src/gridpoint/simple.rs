//! Simple packing (GRIB-2 DRS template 5.0; GRIB-1's Binary Data Section is
//! the same scheme with an IBM-float reference value instead of IEEE).
//!
//! Grounded on the teacher's `decoder/simple.rs` `NonZeroSimplePackingDecoder`
//! (`value = (ref + encoded * 2^exp) * 10^-dec`), generalized here to also
//! cover the inverse (encode) direction since spec.md requires both.

use crate::bitstream::{get_bits, set_bits};
use crate::error::DecodeError;

use super::unscale;

/// Reads `count` fields of `pack_width` bits each, starting at bit offset
/// `bit_offset` in `data`, and unscales each to a physical value. When
/// `pack_width == 0` every value equals `reference_value` (constant grid),
/// per spec.md §4.5 step 7 / §4.7.
pub fn unpack(
    data: &[u8],
    bit_offset: usize,
    count: usize,
    pack_width: u8,
    reference_value: f64,
    binary_scale: i16,
    decimal_scale: i16,
) -> Result<Vec<f64>, DecodeError> {
    if pack_width == 0 {
        return Ok(vec![reference_value; count]);
    }
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let off = bit_offset + i * pack_width as usize;
        let raw = get_bits(data, off, pack_width as u32)?;
        out.push(unscale(raw as i64, reference_value, binary_scale, decimal_scale));
    }
    Ok(out)
}

/// Packs `packed_values` (already-quantized non-negative integers) into
/// `data` starting at `bit_offset`, `pack_width` bits each. `data` must
/// already be sized to hold the whole run.
pub fn pack(data: &mut [u8], bit_offset: usize, packed_values: &[u32], pack_width: u8) -> Result<(), DecodeError> {
    if pack_width == 0 {
        return Ok(());
    }
    for (i, &value) in packed_values.iter().enumerate() {
        let off = bit_offset + i * pack_width as usize;
        set_bits(data, value, off, pack_width as u32)?;
    }
    Ok(())
}

/// Smallest `pack_width` such that `2^pack_width - 1 >= max_value`, per
/// spec.md §4.9's pack-width minimality rule. `0` when every value is `0`.
pub fn minimal_pack_width(max_value: u32) -> u8 {
    if max_value == 0 {
        return 0;
    }
    (32 - max_value.leading_zeros()) as u8
}

/// Quantizes `value` against `(reference_value, binary_scale, decimal_scale)`
/// per spec.md §4.9: `packed = round((p - R) * 10^D / 2^E)`.
pub fn quantize(value: f64, reference_value: f64, binary_scale: i16, decimal_scale: i16) -> i64 {
    ((value - reference_value) * 10f64.powi(decimal_scale as i32) / 2f64.powi(binary_scale as i32)).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_grid_pack_width_zero() {
        let out = unpack(&[], 0, 4, 0, 273.15, 0, 0).unwrap();
        assert_eq!(out, vec![273.15; 4]);
    }

    #[test]
    fn roundtrip_simple_packing() {
        let values = [0.0_f64, 1.0, 2.0, 3.0, 15.0];
        let packed: Vec<u32> = values.iter().map(|&v| quantize(v, 0.0, 0, 0) as u32).collect();
        let max = *packed.iter().max().unwrap();
        let width = minimal_pack_width(max);
        let mut buf = vec![0u8; crate::bitstream::num_octets(width as usize * values.len())];
        pack(&mut buf, 0, &packed, width).unwrap();
        let out = unpack(&buf, 0, values.len(), width, 0.0, 0, 0).unwrap();
        assert_eq!(out, values);
    }

    #[test]
    fn minimal_pack_width_examples() {
        assert_eq!(minimal_pack_width(0), 0);
        assert_eq!(minimal_pack_width(1), 1);
        assert_eq!(minimal_pack_width(3), 2);
        assert_eq!(minimal_pack_width(255), 8);
        assert_eq!(minimal_pack_width(256), 9);
    }
}
