//! End-to-end round-trip scenarios, grounded on spec.md §8's testable
//! properties and seed scenarios. No binary GRIB fixtures ship with this
//! crate, so each test builds its input bytes in memory instead of reading
//! a `testdata/` file the way the teacher crate's own integration tests do.

use gribflip::error::IgnoreWarnings;
use gribflip::{convert_1_to_2, convert_2_to_1, detect_edition};

/// A 2x2 lat/lon GRIB-1 message, constant field of 273.15 K, centre 7
/// (NCEP), parameter 11 (TMP), level type 100 (isobaric) at 500 hPa.
/// Byte offsets mirror `decoder1::decode_pds`/`decode_gds`/`decode_bds`
/// exactly (see their field-by-field comments for the layout).
fn build_grib1_constant_2x2(bitmap_bits: Option<[bool; 4]>) -> Vec<u8> {
    let mut pds = vec![0u8; 28];
    pds[2] = 28;
    pds[3] = 2; // table version
    pds[4] = 7; // centre
    pds[6] = 0; // grid type
    pds[7] = if bitmap_bits.is_some() { 0xC0 } else { 0x80 };
    pds[8] = 11; // TMP
    pds[9] = 100; // isobaric, single value
    pds[10] = 0x01;
    pds[11] = 0xF4; // 500 hPa
    pds[12] = 20; // year of century
    pds[13] = 1;
    pds[14] = 1;
    pds[17] = 1; // forecast unit hour
    pds[24] = 21; // century

    let mut gds = vec![0u8; 28];
    gds[2] = 28;
    gds[5] = 0; // lat/lon
    gds[6] = 0;
    gds[7] = 2; // nx
    gds[8] = 0;
    gds[9] = 2; // ny
    gds[16] = 0; // resolution flags
    gds[23] = 0x03;
    gds[24] = 0xE8; // i_inc = 1000
    gds[25] = 0x03;
    gds[26] = 0xE8; // j_inc = 1000
    gds[27] = 0; // scanning mode

    let bms = bitmap_bits.map(|bits| {
        let mut b = vec![0u8; 7];
        b[2] = 7;
        let mut packed = 0u8;
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                packed |= 0x80 >> i;
            }
        }
        b[6] = packed;
        b
    });

    let mut bds = vec![0u8; 11];
    bds[2] = 11;
    let ibm = gribflip::ibm_float::ieee_to_ibm(273.15);
    bds[6..10].copy_from_slice(&ibm.to_be_bytes());
    bds[10] = 0; // pack width 0 -> constant field

    let bms_len = bms.as_ref().map_or(0, Vec::len);
    let total_len = 8 + pds.len() + gds.len() + bms_len + bds.len();

    let mut msg = Vec::new();
    msg.extend_from_slice(b"GRIB");
    msg.push((total_len >> 16) as u8);
    msg.push((total_len >> 8) as u8);
    msg.push(total_len as u8);
    msg.push(1);
    msg.extend_from_slice(&pds);
    msg.extend_from_slice(&gds);
    if let Some(bms) = &bms {
        msg.extend_from_slice(bms);
    }
    msg.extend_from_slice(&bds);
    msg.extend_from_slice(b"7777");
    msg
}

#[test]
fn empty_input_produces_empty_output_both_directions() {
    let warn = IgnoreWarnings;
    assert!(convert_1_to_2(&[], &warn).unwrap().is_empty());
    assert!(convert_2_to_1(&[], &warn).unwrap().is_empty());
}

#[test]
fn latlon_2x2_constant_field_converts_to_grib2() {
    let grib1 = build_grib1_constant_2x2(None);
    assert_eq!(detect_edition(&grib1), Some(1));

    let warn = IgnoreWarnings;
    let grib2 = convert_1_to_2(&grib1, &warn).unwrap();
    assert_eq!(detect_edition(&grib2), Some(2));
    assert_eq!(&grib2[grib2.len() - 4..], b"7777");

    let mut pos = 0;
    let jpeg = gribflip::gridpoint::jpeg2000::NoJpeg2000;
    let decoded = gribflip::decoder2::decode_next(&grib2, &mut pos, &warn, &jpeg).unwrap().unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].gridpoints, vec![273.15; 4]);
}

#[test]
fn bitmap_scenario_carries_missing_sentinel_through() {
    let grib1 = build_grib1_constant_2x2(Some([true, false, true, true]));
    let warn = IgnoreWarnings;

    let mut pos = 0;
    let decoded1 = gribflip::decoder1::decode_next(&grib1, &mut pos, &warn).unwrap().unwrap();
    assert_eq!(decoded1.message.bitmap.as_deref(), Some([true, false, true, true].as_slice()));
    assert_eq!(decoded1.message.gridpoints[1], gribflip::model::MISSING);
    assert_eq!(decoded1.message.gridpoints[0], 273.15);

    let grib2 = convert_1_to_2(&grib1, &warn).unwrap();
    let mut pos2 = 0;
    let jpeg = gribflip::gridpoint::jpeg2000::NoJpeg2000;
    let decoded2 = gribflip::decoder2::decode_next(&grib2, &mut pos2, &warn, &jpeg).unwrap().unwrap();
    assert_eq!(decoded2[0].gridpoints[1], gribflip::model::MISSING);
}

#[test]
fn cross_edition_roundtrip_preserves_gridpoints() {
    let grib1 = build_grib1_constant_2x2(None);
    let warn = IgnoreWarnings;

    let grib2 = convert_1_to_2(&grib1, &warn).unwrap();
    let grib1_again = convert_2_to_1(&grib2, &warn).unwrap();

    let mut pos = 0;
    let original = gribflip::decoder1::decode_next(&grib1, &mut pos, &warn).unwrap().unwrap();
    let mut pos2 = 0;
    let roundtripped = gribflip::decoder1::decode_next(&grib1_again, &mut pos2, &warn).unwrap().unwrap();

    assert_eq!(original.message.gridpoints, roundtripped.message.gridpoints);
    assert_eq!(original.pds.parameter_code, roundtripped.pds.parameter_code);
    assert_eq!(original.pds.level_type, roundtripped.pds.level_type);
}

#[test]
fn every_emitted_message_ends_with_sentinel() {
    let grib1 = build_grib1_constant_2x2(None);
    let warn = IgnoreWarnings;
    let grib2 = convert_1_to_2(&grib1, &warn).unwrap();
    assert_eq!(&grib2[grib2.len() - 4..], b"7777");
    let grib1_back = convert_2_to_1(&grib2, &warn).unwrap();
    assert_eq!(&grib1_back[grib1_back.len() - 4..], b"7777");
}
