//! GRIB-1 message emitter: [`crate::model::Message`] in, byte stream out.
//!
//! Grounded on spec.md §4.9 and mirrors decoder1's section layout exactly,
//! so a message decoded by `decoder1::decode_next` and fed straight back
//! through `encoder1::encode` reproduces the same section bytes. The Grid
//! Definition Section is always emitted (spec.md invariant: GDS is never
//! omitted in this system) and every level/parameter/time-range field is
//! translated from the unified GRIB-2-shaped [`Message`] via the tables in
//! `crate::codetables`.

use crate::codetables::{level, param, time_range};
use crate::error::{EncodeError, Warn, Warning};
use crate::gridpoint::simple::{minimal_pack_width, pack, quantize};
use crate::ibm_float::ieee_to_ibm;
use crate::model::{GridGeometry, Message};

const END_MARKER: &[u8; 4] = b"7777";

pub fn encode(message: &Message, warn: &dyn Warn) -> Result<Vec<u8>, EncodeError> {
    let pds = encode_pds(message, warn)?;
    let gds = encode_gds(&message.geometry)?;
    let bms = message.bitmap.as_deref().map(encode_bms);
    let bds = encode_bds(message)?;

    let total_len = 8 + pds.len() + gds.len() + bms.as_ref().map_or(0, Vec::len) + bds.len();

    let mut out = Vec::with_capacity(total_len + 4);
    out.extend_from_slice(b"GRIB");
    out.push((total_len >> 16) as u8);
    out.push((total_len >> 8) as u8);
    out.push(total_len as u8);
    out.push(1); // edition
    out.extend_from_slice(&pds);
    out.extend_from_slice(&gds);
    if let Some(bms) = &bms {
        out.extend_from_slice(bms);
    }
    out.extend_from_slice(&bds);
    out.extend_from_slice(END_MARKER);
    Ok(out)
}

fn signed_3byte_bytes(value: i32) -> [u8; 3] {
    let sign = if value < 0 { 1u32 << 23 } else { 0 };
    let magnitude = value.unsigned_abs() & 0x7F_FFFF;
    let raw = sign | magnitude;
    [(raw >> 16) as u8, (raw >> 8) as u8, raw as u8]
}

fn signed_16_bytes(value: i16) -> [u8; 2] {
    let sign: u16 = if value < 0 { 0x8000 } else { 0 };
    let magnitude = (value.unsigned_abs()) & 0x7FFF;
    let raw = sign | magnitude;
    raw.to_be_bytes()
}

/// Builds the Product Definition Section, matching `decoder1::decode_pds`'s
/// offsets (relative to the PDS start, i.e. `body[pds_start..]`).
fn encode_pds(message: &Message, warn: &dyn Warn) -> Result<Vec<u8>, EncodeError> {
    let (table_version, parameter_code) = param::g2_to_g1(
        message.source.centre,
        message.product.discipline,
        message.product.parameter_category,
        message.product.parameter_number,
    );
    if (table_version, parameter_code) == (3, 255) {
        warn.warn(Warning::UnmappedParameterReverse {
            centre: message.source.centre,
            discipline: message.product.discipline,
            category: message.product.parameter_category,
            number: message.product.parameter_number,
        });
    }
    let (level_type, value1, value2) = level::g2_to_g1(message.product.level1, message.product.level2)?;

    let (time_range, p1, p2) = match &message.product.statistical_process {
        Some(stat) => {
            let t_range = time_range::g2_to_g1_time_range(stat.process_code)?;
            let p1 = message.product.forecast_time_offset as u8;
            let p2 = p1.saturating_add(stat.length as u8);
            (t_range, p1, p2)
        }
        None => (0u8, message.product.forecast_time_offset as u8, 0u8),
    };

    let extension_len = message.pds_extension.len();
    let pds_len = 28 + extension_len;
    let mut s = vec![0u8; pds_len];

    s[0] = (pds_len >> 16) as u8;
    s[1] = (pds_len >> 8) as u8;
    s[2] = pds_len as u8;
    s[3] = table_version;
    s[4] = message.source.centre as u8;
    s[5] = message.source.generating_process;
    s[6] = 255; // non-catalogued grid; GDS always present
    s[7] = 0x80; // has_gds, no bms (overridden below when a bitmap is present)
    if message.bitmap.is_some() {
        s[7] |= 0x40;
    }
    s[8] = parameter_code;
    s[9] = level_type;

    if level::SINGLE_VALUE_TYPES.contains(&level_type) {
        let v = value1 as u16;
        s[10] = (v >> 8) as u8;
        s[11] = v as u8;
    } else {
        s[10] = value1 as u8;
        s[11] = value2.unwrap_or(0) as u8;
    }

    let century = (message.reference_time.year - 1) / 100 + 1;
    let year_of_century = message.reference_time.year - (century - 1) * 100;
    s[12] = year_of_century as u8;
    s[13] = message.reference_time.month as u8;
    s[14] = message.reference_time.day as u8;
    s[15] = message.reference_time.hour as u8;
    s[16] = message.reference_time.minute as u8;
    s[17] = message.product.forecast_time_unit;
    s[18] = p1;
    s[19] = p2;
    s[20] = time_range;
    s[21..23].copy_from_slice(&0u16.to_be_bytes()); // number averaged, not tracked across editions
    s[23] = 0; // number missing
    s[24] = century as u8;
    s[25] = message.source.sub_centre as u8;
    s[26..28].copy_from_slice(&signed_16_bytes(message.packing.decimal_scale));

    if extension_len > 0 {
        s[28..].copy_from_slice(&message.pds_extension);
    }

    Ok(s)
}

/// Builds the Grid Definition Section, matching `decoder1::decode_gds`'s
/// offsets (relative to the GDS start).
fn encode_gds(geometry: &GridGeometry) -> Result<Vec<u8>, EncodeError> {
    let data_repr: u8 = match geometry {
        GridGeometry::LatLon(_) => 0,
        GridGeometry::GaussianLatLon(_) => 4,
        GridGeometry::Rotated(_) => 10,
        GridGeometry::Mercator(_) => 1,
        GridGeometry::PolarStereographic(_) => 5,
        GridGeometry::LambertConformal(_) => 3,
    };

    let len = match geometry {
        GridGeometry::LatLon(_) | GridGeometry::GaussianLatLon(_) => 28,
        GridGeometry::Rotated(_) => 38,
        GridGeometry::Mercator(_) => 34,
        GridGeometry::PolarStereographic(_) => 28,
        GridGeometry::LambertConformal(_) => 40,
    };
    let mut s = vec![0u8; len];
    s[0] = (len >> 16) as u8;
    s[1] = (len >> 8) as u8;
    s[2] = len as u8;
    s[5] = data_repr;
    s[6..8].copy_from_slice(&(geometry.nx() as u16).to_be_bytes());
    s[8..10].copy_from_slice(&(geometry.ny() as u16).to_be_bytes());

    match geometry {
        GridGeometry::LatLon(g) | GridGeometry::GaussianLatLon(g) => {
            s[10..13].copy_from_slice(&signed_3byte_bytes(g.first_lat_udeg / 10));
            s[13..16].copy_from_slice(&signed_3byte_bytes(g.first_lon_udeg / 10));
            s[16] = g.resolution_flags;
            s[17..20].copy_from_slice(&signed_3byte_bytes(g.last_lat_udeg / 10));
            s[20..23].copy_from_slice(&signed_3byte_bytes(g.last_lon_udeg / 10));
            s[23..25].copy_from_slice(&((g.i_inc_udeg / 1000) as u16).to_be_bytes());
            s[25..27].copy_from_slice(&((g.j_inc_udeg / 1000) as u16).to_be_bytes());
            s[27] = g.scanning_mode;
        }
        GridGeometry::Rotated(g) => {
            s[10..13].copy_from_slice(&signed_3byte_bytes(g.base.first_lat_udeg / 10));
            s[13..16].copy_from_slice(&signed_3byte_bytes(g.base.first_lon_udeg / 10));
            s[16] = g.base.resolution_flags;
            s[17..20].copy_from_slice(&signed_3byte_bytes(g.base.last_lat_udeg / 10));
            s[20..23].copy_from_slice(&signed_3byte_bytes(g.base.last_lon_udeg / 10));
            s[23..25].copy_from_slice(&((g.base.i_inc_udeg / 1000) as u16).to_be_bytes());
            s[25..27].copy_from_slice(&((g.base.j_inc_udeg / 1000) as u16).to_be_bytes());
            s[27] = g.base.scanning_mode;
            s[28..31].copy_from_slice(&signed_3byte_bytes(g.south_pole_lat_udeg / 10));
            s[31..34].copy_from_slice(&signed_3byte_bytes(g.south_pole_lon_udeg / 10));
            s[34..38].copy_from_slice(&((g.angle_of_rotation * 1e3) as i32).to_be_bytes());
        }
        GridGeometry::Mercator(g) => {
            s[10..13].copy_from_slice(&signed_3byte_bytes(g.first_lat_udeg / 10));
            s[13..16].copy_from_slice(&signed_3byte_bytes(g.first_lon_udeg / 10));
            s[16] = g.resolution_flags;
            s[17..20].copy_from_slice(&signed_3byte_bytes(g.last_lat_udeg / 10));
            s[20..23].copy_from_slice(&signed_3byte_bytes(g.last_lon_udeg / 10));
            s[23..26].copy_from_slice(&signed_3byte_bytes(g.latin / 10));
            s[27] = g.scanning_mode;
            let i_inc = g.i_inc & 0x00FF_FFFF;
            s[28] = (i_inc >> 16) as u8;
            s[29] = (i_inc >> 8) as u8;
            s[30] = i_inc as u8;
            let j_inc = g.j_inc & 0x00FF_FFFF;
            s[31] = (j_inc >> 16) as u8;
            s[32] = (j_inc >> 8) as u8;
            s[33] = j_inc as u8;
        }
        GridGeometry::PolarStereographic(g) => {
            s[10..13].copy_from_slice(&signed_3byte_bytes(g.first_lat_udeg / 10));
            s[13..16].copy_from_slice(&signed_3byte_bytes(g.first_lon_udeg / 10));
            s[16] = g.resolution_flags;
            s[17..20].copy_from_slice(&signed_3byte_bytes(g.orientation_lon_udeg / 10));
            let dx = g.i_inc & 0x00FF_FFFF;
            s[20] = (dx >> 16) as u8;
            s[21] = (dx >> 8) as u8;
            s[22] = dx as u8;
            let dy = g.j_inc & 0x00FF_FFFF;
            s[23] = (dy >> 16) as u8;
            s[24] = (dy >> 8) as u8;
            s[25] = dy as u8;
            s[26] = g.projection_flag;
            s[27] = g.scanning_mode;
        }
        GridGeometry::LambertConformal(g) => {
            s[10..13].copy_from_slice(&signed_3byte_bytes(g.first_lat_udeg / 10));
            s[13..16].copy_from_slice(&signed_3byte_bytes(g.first_lon_udeg / 10));
            s[16] = g.resolution_flags;
            s[17..20].copy_from_slice(&signed_3byte_bytes(g.orientation_lon_udeg / 10));
            let dx = g.i_inc & 0x00FF_FFFF;
            s[20] = (dx >> 16) as u8;
            s[21] = (dx >> 8) as u8;
            s[22] = dx as u8;
            let dy = g.j_inc & 0x00FF_FFFF;
            s[23] = (dy >> 16) as u8;
            s[24] = (dy >> 8) as u8;
            s[25] = dy as u8;
            s[26] = g.projection_flag;
            s[27] = g.scanning_mode;
            s[28..31].copy_from_slice(&signed_3byte_bytes(g.latin1_udeg / 10));
            s[31..34].copy_from_slice(&signed_3byte_bytes(g.latin2_udeg / 10));
            s[34..37].copy_from_slice(&signed_3byte_bytes(g.south_pole_lat_udeg / 10));
            s[37..40].copy_from_slice(&signed_3byte_bytes(g.south_pole_lon_udeg / 10));
        }
    }

    Ok(s)
}

/// Builds the Bit-Map Section, matching `decoder1::decode_bms`'s offsets.
/// `unused_bits` is always `0` since `bitmap.len()` equals `num_points`
/// exactly and this codec never pads to a non-multiple-of-8 grid.
fn encode_bms(bitmap: &[bool]) -> Vec<u8> {
    let packed_len = crate::bitstream::num_octets(bitmap.len());
    let unused_bits = (packed_len * 8 - bitmap.len()) as u8;
    let bms_len = 6 + packed_len;
    let mut s = vec![0u8; bms_len];
    s[0] = (bms_len >> 16) as u8;
    s[1] = (bms_len >> 8) as u8;
    s[2] = bms_len as u8;
    s[3] = unused_bits;
    // s[4..6] predefined bit-map reference stays 0 (no predefined maps used)
    for (i, &present) in bitmap.iter().enumerate() {
        if present {
            crate::bitstream::set_bits(&mut s[6..], 1, i, 1).ok();
        }
    }
    s
}

/// Builds the Binary Data Section, matching `decoder1::decode_bds`'s
/// offsets. Always simple (non-second-order) packing, per spec.md §4.9.
fn encode_bds(message: &Message) -> Result<Vec<u8>, EncodeError> {
    let present_values: Vec<f64> = match &message.bitmap {
        None => message.gridpoints.clone(),
        Some(bits) => message
            .gridpoints
            .iter()
            .zip(bits.iter())
            .filter(|(_, &present)| present)
            .map(|(&v, _)| v)
            .collect(),
    };

    let reference_value = present_values.iter().cloned().fold(f64::INFINITY, f64::min);
    let reference_value = if reference_value.is_finite() { reference_value } else { 0.0 };

    let binary_scale = message.packing.binary_scale;
    let decimal_scale = message.packing.decimal_scale;

    let quantized: Vec<u32> = present_values
        .iter()
        .map(|&v| quantize(v, reference_value, binary_scale, decimal_scale).max(0) as u32)
        .collect();

    let max_value = quantized.iter().cloned().max().unwrap_or(0);
    let pack_width = minimal_pack_width(max_value);

    let payload_bits = pack_width as usize * quantized.len();
    let payload_bytes = crate::bitstream::num_octets(payload_bits);
    let unused_bits = (payload_bytes * 8 - payload_bits) as u8;

    let bds_len = 11 + payload_bytes;
    let mut s = vec![0u8; bds_len];
    s[0] = (bds_len >> 16) as u8;
    s[1] = (bds_len >> 8) as u8;
    s[2] = bds_len as u8;
    s[3] = unused_bits & 0x0F;

    s[4..6].copy_from_slice(&signed_16_bytes(binary_scale));

    let ibm_reference = ieee_to_ibm(reference_value * 10f64.powi(decimal_scale as i32));
    s[6..10].copy_from_slice(&ibm_reference.to_be_bytes());
    s[10] = pack_width;

    pack(&mut s[11..], 0, &quantized, pack_width)?;

    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EarthShape, GridGeometry, LatLonGrid, Level, Packing, Product, ReferenceTime, Source};

    fn sample_message() -> Message {
        Message {
            reference_time: ReferenceTime {
                year: 2020,
                month: 1,
                day: 1,
                hour: 0,
                minute: 0,
                second: 0,
                significance: 1,
                production_status: 0,
                data_type: 1,
            },
            source: Source {
                centre: 7,
                sub_centre: 0,
                table_version: 2,
                local_table_version: 0,
                generating_process: 0,
            },
            geometry: GridGeometry::LatLon(LatLonGrid {
                nx: 2,
                ny: 2,
                first_lat_udeg: 0,
                first_lon_udeg: 0,
                last_lat_udeg: 1_000_000,
                last_lon_udeg: 1_000_000,
                i_inc_udeg: 1_000_000,
                j_inc_udeg: 1_000_000,
                resolution_flags: 0,
                scanning_mode: 0,
                earth_shape: EarthShape::Spherical6367470,
            }),
            product: Product {
                discipline: 0,
                parameter_category: 0,
                parameter_number: 0,
                forecast_time_unit: 1,
                forecast_time_offset: 0,
                level1: Level { level_type: 100, scale: -2, value: 500 },
                level2: Level::ABSENT,
                statistical_process: None,
                ensemble: Default::default(),
                spatial_processing: None,
            },
            packing: Packing {
                reference_value: 273.15,
                binary_scale: 0,
                decimal_scale: 0,
                pack_width: 0,
            },
            bitmap: None,
            gridpoints: vec![273.15; 4],
            pds_extension: Vec::new(),
        }
    }

    #[test]
    fn encodes_with_trailing_sentinel() {
        let msg = sample_message();
        let warn = crate::error::IgnoreWarnings;
        let bytes = encode(&msg, &warn).unwrap();
        assert_eq!(&bytes[0..4], b"GRIB");
        assert_eq!(&bytes[bytes.len() - 4..], b"7777");
        assert_eq!(bytes[7], 1); // edition
    }

    #[test]
    fn roundtrips_through_decoder1() {
        let msg = sample_message();
        let warn = crate::error::IgnoreWarnings;
        let bytes = encode(&msg, &warn).unwrap();
        let mut pos = 0;
        let decoded = crate::decoder1::decode_next(&bytes, &mut pos, &warn).unwrap().unwrap();
        assert_eq!(decoded.message.gridpoints, vec![273.15; 4]);
        assert_eq!(decoded.pds.parameter_code, 11); // TMP
        assert_eq!(decoded.pds.level_type, 100);
    }

    #[test]
    fn unmapped_level_type_is_rejected() {
        let mut msg = sample_message();
        msg.product.level1 = Level { level_type: 250, scale: 0, value: 0 };
        let warn = crate::error::IgnoreWarnings;
        assert!(encode(&msg, &warn).is_err());
    }

    #[test]
    fn bitmap_is_emitted_when_present() {
        let mut msg = sample_message();
        msg.bitmap = Some(vec![true, true, true, true]);
        let warn = crate::error::IgnoreWarnings;
        let bytes = encode(&msg, &warn).unwrap();
        let mut pos = 0;
        let decoded = crate::decoder1::decode_next(&bytes, &mut pos, &warn).unwrap().unwrap();
        assert!(decoded.message.bitmap.is_some());
    }

    #[test]
    fn unmapped_parameter_emits_warning_and_falls_back() {
        struct CountWarn(std::cell::Cell<usize>);
        impl crate::error::Warn for CountWarn {
            fn warn(&self, _w: crate::error::Warning) {
                self.0.set(self.0.get() + 1);
            }
        }
        let mut msg = sample_message();
        msg.product.discipline = 255;
        msg.product.parameter_category = 255;
        msg.product.parameter_number = 255;
        let warn = CountWarn(std::cell::Cell::new(0));
        let bytes = encode(&msg, &warn).unwrap();
        assert_eq!(warn.0.get(), 1);

        let ignore = crate::error::IgnoreWarnings;
        let mut pos = 0;
        let decoded = crate::decoder1::decode_next(&bytes, &mut pos, &ignore).unwrap().unwrap();
        assert_eq!(decoded.pds.table_version, 3);
        assert_eq!(decoded.pds.parameter_code, 255);
    }
}
