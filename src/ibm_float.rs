//! Conversion between IEEE-754 double precision and the 32-bit IBM
//! hexadecimal floating-point format used for the GRIB-1 reference value.
//!
//! Layout: sign (bit 0), excess-64 power-of-16 exponent (bits 1-7),
//! 24-bit fraction (bits 8-31, interpreted as `fraction / 2^24`).
//! Grounded on the same bit layout the `grib1_reader` crate decodes inline
//! (`read_f32_ibm`), generalized here to a full round-trip pair operating on
//! `f64` as spec.md requires.

/// `ibm_to_ieee(word) == 0.0` iff `word == 0`; the all-zero word is the only
/// representation of zero.
pub fn ibm_to_ieee(word: u32) -> f64 {
    let sign = if word & 0x8000_0000 != 0 { -1.0 } else { 1.0 };
    let exponent = ((word >> 24) & 0x7F) as i32;
    let fraction = (word & 0x00FF_FFFF) as f64;

    sign * fraction * 2f64.powi(-24) * 16f64.powi(exponent - 64)
}

/// Rounds half away from zero. Zero maps to the all-zero word.
pub fn ieee_to_ibm(value: f64) -> u32 {
    if value == 0.0 {
        return 0;
    }

    let sign = if value < 0.0 { 0x8000_0000u32 } else { 0 };
    let magnitude = value.abs();

    // fraction = magnitude * 2^24 / 16^(exponent - 64); normalize so that
    // 0x100000 <= fraction <= 0xFFFFFF (a full 24-bit mantissa).
    let mut exponent: i32 = 0;
    let mut fraction = magnitude * 2f64.powi(24);
    while fraction > 0xFF_FFFF as f64 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0x10_0000 as f64 && exponent > -64 {
        fraction *= 16.0;
        exponent -= 1;
    }

    let fraction = fraction.round() as u32;
    // Rounding may have pushed the fraction back out of range; renormalize.
    let (fraction, exponent) = if fraction > 0x00FF_FFFF {
        (
            (fraction / 16) + if fraction % 16 >= 8 { 1 } else { 0 },
            exponent + 1,
        )
    } else {
        (fraction, exponent)
    };

    let biased_exponent = (exponent + 64).clamp(0, 127) as u32;
    sign | (biased_exponent << 24) | (fraction & 0x00FF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_roundtrips() {
        assert_eq!(ieee_to_ibm(0.0), 0);
        assert_eq!(ibm_to_ieee(0), 0.0);
    }

    #[test]
    fn known_value() {
        // 1.0 = sign 0, exponent excess-64 65 (16^1), fraction 1/16 * 2^24
        let word = ieee_to_ibm(1.0);
        let back = ibm_to_ieee(word);
        assert!((back - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ieee_to_ibm_is_idempotent_on_ibm_domain() {
        for word in [0x42680000u32, 0xC2680000, 0x40100000, 0x3F100000] {
            let ieee = ibm_to_ieee(word);
            let back = ieee_to_ibm(ieee);
            assert_eq!(back, word, "word {word:#010x} did not round-trip");
        }
    }

    #[test]
    fn ibm_to_ieee_to_ibm_within_tolerance() {
        for y in [273.15_f64, -40.0, 1013.25, 0.000123, 9_999_999.0] {
            let word = ieee_to_ibm(y);
            let back = ibm_to_ieee(word);
            let tolerance = y.abs() * 2f64.powi(-20);
            assert!(
                (back - y).abs() <= tolerance.max(1e-9),
                "y={y} back={back} tolerance={tolerance}"
            );
        }
    }

    #[test]
    fn negative_values() {
        let word = ieee_to_ibm(-273.15);
        assert_eq!(word & 0x8000_0000, 0x8000_0000);
        let back = ibm_to_ieee(word);
        assert!((back + 273.15).abs() < 1e-6);
    }
}
