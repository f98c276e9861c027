//! Stream-level driver: finds each message in an input buffer, decodes it,
//! translates it to the target edition, and appends the re-encoded bytes
//! to an output buffer.
//!
//! Grounded on spec.md §5's `find_magic -> read_header -> decode_sections ->
//! translate -> emit_sections` pipeline and on the teacher's `Grib2Iter`
//! (`context.rs`), which walks a byte slice message-by-message rather than
//! requiring the whole file up front; here the loop is exposed directly
//! since gribflip has only two directions instead of one generic reader.

use crate::codetables::param;
use crate::decoder1;
use crate::decoder2;
use crate::encoder1;
use crate::encoder2::{self, Encode2Extra};
use crate::error::{GribFlipError, Warn, Warning};
use crate::gridpoint::jpeg2000::{Jpeg2000Decoder, NoJpeg2000};

/// Converts every GRIB-1 message in `input` to GRIB-2, appending each
/// result to a single output buffer. Stops at the first decode or encode
/// error; messages already converted remain in the returned buffer.
pub fn convert_1_to_2(input: &[u8], warn: &dyn Warn) -> Result<Vec<u8>, GribFlipError> {
    let mut out = Vec::with_capacity(input.len());
    let mut pos = 0usize;

    while let Some(decoded) = decoder1::decode_next(input, &mut pos, warn)? {
        let pds = &decoded.pds;
        let (discipline, category, number) = param::g1_to_g2(pds.centre as u16, pds.table_version, pds.parameter_code);
        if (discipline, category, number) == (255, 255, 255) {
            warn.warn(Warning::UnmappedParameter {
                centre: pds.centre as u16,
                table: pds.table_version,
                code: pds.parameter_code,
            });
        }

        let mut message = decoded.message;
        message.product.discipline = discipline;
        message.product.parameter_category = category;
        message.product.parameter_number = number;

        let extra = Encode2Extra {
            time_range: pds.time_range,
            g1_parameter_code: pds.parameter_code,
            p1: pds.p1,
            p2: pds.p2,
        };

        let bytes = encoder2::encode(&message, &extra)?;
        out.extend_from_slice(&bytes);
    }

    Ok(out)
}

/// Converts every GRIB-2 message in `input` to GRIB-1. A GRIB-2 message may
/// bundle several grids; each becomes its own GRIB-1 message on output,
/// matching spec.md §4.6's "every grid gets its own message" rule.
pub fn convert_2_to_1(input: &[u8], warn: &dyn Warn) -> Result<Vec<u8>, GribFlipError> {
    convert_2_to_1_with_jpeg(input, warn, &NoJpeg2000)
}

pub fn convert_2_to_1_with_jpeg(input: &[u8], warn: &dyn Warn, jpeg: &dyn Jpeg2000Decoder) -> Result<Vec<u8>, GribFlipError> {
    let mut out = Vec::with_capacity(input.len());
    let mut pos = 0usize;

    while let Some(messages) = decoder2::decode_next(input, &mut pos, warn, jpeg)? {
        for message in messages {
            let bytes = encoder1::encode(&message, warn)?;
            out.extend_from_slice(&bytes);
        }
    }

    Ok(out)
}

/// Detects which edition `input` starts with by resynchronizing on the
/// `"GRIB"` magic and inspecting the edition byte at offset 7, without
/// decoding the rest of the message. Used by the CLI wrappers to give a
/// clear error when fed the wrong edition.
pub fn detect_edition(input: &[u8]) -> Option<u8> {
    let pos = input.windows(4).position(|w| w == b"GRIB")?;
    input.get(pos + 7).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IgnoreWarnings;

    #[test]
    fn empty_input_produces_empty_output() {
        let warn = IgnoreWarnings;
        assert_eq!(convert_1_to_2(&[], &warn).unwrap(), Vec::<u8>::new());
        assert_eq!(convert_2_to_1(&[], &warn).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn detect_edition_reads_edition_byte() {
        let mut grib1 = b"GRIB".to_vec();
        grib1.extend_from_slice(&[0, 0, 24, 1]);
        assert_eq!(detect_edition(&grib1), Some(1));

        let mut grib2 = b"GRIB".to_vec();
        grib2.extend_from_slice(&[0, 0, 0, 2]);
        assert_eq!(detect_edition(&grib2), Some(2));

        assert_eq!(detect_edition(b"not a grib file"), None);
    }
}
