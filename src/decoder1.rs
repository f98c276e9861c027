//! GRIB-1 message decoder: byte stream in, [`crate::model::Message`] out.
//!
//! Procedure grounded on spec.md §4.5 and, for the bit-level packed-value
//! unpacking, on the `grib1_reader` crate's `read_grib`/`read_pds`/`read_gds`/
//! `read_bds` sequence (`examples/christian-boks-grib1_reader/src/lib.rs`) —
//! same section order, same sign-magnitude field conventions, reimplemented
//! synchronously over an in-memory buffer instead of `tokio::fs::File`
//! since this crate has no async I/O layer.

use crate::bitstream::{get_bits, sign_magnitude_to_i32};
use crate::codetables::level::SINGLE_VALUE_TYPES;
use crate::error::{DecodeError, Warn, Warning};
use crate::ibm_float::ibm_to_ieee;
use crate::model::{
    EarthShape, GridGeometry, LambertConformalGrid, LatLonGrid, Level, MercatorGrid, Message, Packing,
    PolarStereographicGrid, Product, Source, RotatedGrid,
};

const MAGIC: &[u8; 4] = b"GRIB";
const END_MARKER: &[u8; 4] = b"7777";

/// Decoded PDS fields not otherwise folded into [`Message`] — exposed so
/// `crate::driver` can hand the raw parameter code and level fields to the
/// translation tables before building a [`Message`].
pub struct Pds1 {
    pub table_version: u8,
    pub centre: u8,
    pub sub_centre: u8,
    pub generating_process: u8,
    pub grid_type: u8,
    pub has_gds: bool,
    pub has_bms: bool,
    pub parameter_code: u8,
    pub level_type: u8,
    pub level_value1: i32,
    pub level_value2: Option<i32>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub forecast_time_unit: u8,
    pub p1: u8,
    pub p2: u8,
    pub time_range: u8,
    pub num_in_average: u16,
    pub num_missing: u8,
    pub decimal_scale: i16,
    pub extension: Vec<u8>,
}

/// One fully decoded GRIB-1 message plus the raw fields the driver needs to
/// run the edition-2 translation tables.
pub struct Decoded1 {
    pub pds: Pds1,
    pub message: Message,
}

/// Finds the next `"GRIB"` occurrence in `stream` starting at `*pos`,
/// advancing `*pos` past any skipped garbage and emitting a resync
/// warning when garbage was present. Returns `false` at end of stream.
fn resync(stream: &[u8], pos: &mut usize, warn: &dyn Warn) -> bool {
    let start = *pos;
    while *pos + 4 <= stream.len() {
        if &stream[*pos..*pos + 4] == MAGIC {
            if *pos > start {
                warn.warn(Warning::Resync { skipped: *pos - start });
            }
            return true;
        }
        *pos += 1;
    }
    *pos = stream.len();
    false
}

/// Decodes the next message from `stream` starting at `*pos`, advancing
/// `*pos` past it. Returns `Ok(None)` at clean end of stream.
pub fn decode_next(stream: &[u8], pos: &mut usize, warn: &dyn Warn) -> Result<Option<Decoded1>, DecodeError> {
    if !resync(stream, pos, warn) {
        return Ok(None);
    }

    let is_start = *pos;
    if is_start + 8 > stream.len() {
        return Err(DecodeError::UnsupportedPacking { reason: "truncated indicator section" });
    }

    let len24 = ((stream[is_start + 4] as usize) << 16)
        | ((stream[is_start + 5] as usize) << 8)
        | stream[is_start + 6] as usize;
    let edition0 = len24 == 24;

    // Edition 0's length field covers only the PDS and the section that
    // follows it, not the whole message; this legacy layout is rare enough
    // that gribflip treats the field the same way as edition 1 beyond the
    // different PDS start offset spec.md §4.5 calls out.
    let total_len = len24;

    if is_start + total_len + 4 > stream.len() {
        return Err(DecodeError::UnsupportedPacking { reason: "truncated message body" });
    }
    let body = &stream[is_start..is_start + total_len];

    if &stream[is_start + total_len..is_start + total_len + 4] != END_MARKER {
        warn.warn(Warning::MissingEndMarker);
    }

    let pds_start = if edition0 { 4 } else { 8 };
    let pds = decode_pds(body, pds_start)?;
    let pds_len = ((body[pds_start] as usize) << 16)
        | ((body[pds_start + 1] as usize) << 8)
        | body[pds_start + 2] as usize;

    let mut offset = pds_start + pds_len;
    let geometry = if pds.has_gds {
        let (g, gds_len) = decode_gds(body, offset)?;
        offset += gds_len;
        g
    } else {
        return Err(DecodeError::UnsupportedPacking { reason: "message has no grid definition section" });
    };

    let num_points = geometry.num_points();

    let bitmap = if pds.has_bms {
        let (bm, bms_len) = decode_bms(body, offset, num_points)?;
        offset += bms_len;
        Some(bm)
    } else {
        None
    };

    let (gridpoints, packing) = decode_bds(body, offset, pds.grid_type, num_points, bitmap.as_deref(), pds.decimal_scale)?;

    let message = Message {
        reference_time: crate::model::ReferenceTime {
            year: pds.year,
            month: pds.month,
            day: pds.day,
            hour: pds.hour,
            minute: pds.minute,
            second: 0,
            significance: 0,
            production_status: 0,
            data_type: 0,
        },
        source: Source {
            centre: pds.centre as u16,
            sub_centre: pds.sub_centre as u16,
            table_version: pds.table_version,
            local_table_version: 0,
            generating_process: pds.generating_process,
        },
        geometry,
        product: Product {
            discipline: 0,
            parameter_category: 0,
            parameter_number: 0,
            forecast_time_unit: pds.forecast_time_unit,
            forecast_time_offset: pds.p1 as i32,
            level1: Level { level_type: pds.level_type, scale: 0, value: pds.level_value1 },
            level2: pds.level_value2.map_or(Level::ABSENT, |v| Level { level_type: pds.level_type, scale: 0, value: v }),
            statistical_process: None,
            ensemble: Default::default(),
            spatial_processing: None,
        },
        packing,
        bitmap,
        gridpoints,
        pds_extension: pds.extension.clone(),
    };

    *pos = is_start + total_len + 4;
    Ok(Some(Decoded1 { pds, message }))
}

fn decode_pds(body: &[u8], start: usize) -> Result<Pds1, DecodeError> {
    let need = |n: usize| -> Result<(), DecodeError> {
        if start + n > body.len() {
            Err(DecodeError::UnsupportedPacking { reason: "truncated PDS" })
        } else {
            Ok(())
        }
    };
    need(28)?;

    let pds_len = ((body[start] as usize) << 16) | ((body[start + 1] as usize) << 8) | body[start + 2] as usize;
    let table_version = body[start + 3];
    let centre = body[start + 4];
    let generating_process = body[start + 5];
    let grid_type = body[start + 6];
    let flags = body[start + 7];
    let has_gds = flags & 0x80 != 0;
    let has_bms = flags & 0x40 != 0;
    let parameter_code = body[start + 8];
    let level_type = body[start + 9];

    let (level_value1, level_value2) = if SINGLE_VALUE_TYPES.contains(&level_type) {
        let v = ((body[start + 10] as i32) << 8) | body[start + 11] as i32;
        (v, None)
    } else {
        (body[start + 10] as i32, Some(body[start + 11] as i32))
    };

    let year_of_century = body[start + 12] as i32;
    let month = body[start + 13] as u32;
    let day = body[start + 14] as u32;
    let hour = body[start + 15] as u32;
    let minute = body[start + 16] as u32;
    let forecast_time_unit = body[start + 17];
    let p1 = body[start + 18];
    let p2 = body[start + 19];
    let time_range = body[start + 20];
    let num_in_average = ((body[start + 21] as u16) << 8) | body[start + 22] as u16;
    let num_missing = body[start + 23];
    let century = body[start + 24] as i32;
    let sub_centre = body[start + 25];
    let decimal_scale_raw = ((body[start + 26] as u32) << 8) | body[start + 27] as u32;
    let decimal_scale = sign_magnitude_to_i32(decimal_scale_raw, 16) as i16;

    let year = if century > 0 {
        (century - 1) * 100 + year_of_century
    } else {
        1900 + year_of_century
    };

    let needed_for_extension = pds_len.max(28);
    let extension = if needed_for_extension > 28 {
        body.get(start + 28..start + needed_for_extension)
            .ok_or(DecodeError::UnsupportedPacking { reason: "PDS extension truncated" })?
            .to_vec()
    } else {
        Vec::new()
    };

    let num_in_average = if matches!(time_range, 3 | 4 | 51 | 113 | 114 | 115 | 116 | 117 | 123 | 124) {
        num_in_average
    } else {
        0
    };

    Ok(Pds1 {
        table_version,
        centre,
        sub_centre,
        generating_process,
        grid_type,
        has_gds,
        has_bms,
        parameter_code,
        level_type,
        level_value1,
        level_value2,
        year,
        month,
        day,
        hour,
        minute,
        forecast_time_unit,
        p1,
        p2,
        time_range,
        num_in_average,
        num_missing,
        decimal_scale,
        extension,
    })
}

fn signed_3byte(b: &[u8]) -> i32 {
    let raw = ((b[0] as u32) << 16) | ((b[1] as u32) << 8) | b[2] as u32;
    sign_magnitude_to_i32(raw, 24)
}

fn decode_gds(body: &[u8], start: usize) -> Result<(GridGeometry, usize), DecodeError> {
    let gds_len = ((body[start] as usize) << 16) | ((body[start + 1] as usize) << 8) | body[start + 2] as usize;
    let data_repr = body[start + 5];

    let nx = ((body[start + 6] as u32) << 8) | body[start + 7] as u32;
    let ny = ((body[start + 8] as u32) << 8) | body[start + 9] as u32;
    let first_lat = signed_3byte(&body[start + 10..start + 13]);
    let first_lon = signed_3byte(&body[start + 13..start + 16]);
    let resolution_flags = body[start + 16];
    let last_lat = signed_3byte(&body[start + 17..start + 20]);
    let last_lon = signed_3byte(&body[start + 20..start + 23]);

    let geometry = match data_repr {
        0 | 4 | 10 => {
            let i_inc = ((body[start + 23] as u32) << 8) | body[start + 24] as u32;
            let j_inc = ((body[start + 25] as u32) << 8) | body[start + 26] as u32;
            let scanning_mode = body[start + 27];
            let base = LatLonGrid {
                nx,
                ny,
                first_lat_udeg: first_lat * 10,
                first_lon_udeg: first_lon * 10,
                last_lat_udeg: last_lat * 10,
                last_lon_udeg: last_lon * 10,
                i_inc_udeg: i_inc * 1000,
                j_inc_udeg: j_inc * 1000,
                resolution_flags,
                scanning_mode,
                earth_shape: EarthShape::Spherical6367470,
            };
            if data_repr == 10 {
                let sp_lat = signed_3byte(&body[start + 28..start + 31]);
                let sp_lon = signed_3byte(&body[start + 31..start + 34]);
                let rotation = i32::from_be_bytes([body[start + 34], body[start + 35], body[start + 36], body[start + 37]]);
                GridGeometry::Rotated(RotatedGrid {
                    base,
                    south_pole_lat_udeg: sp_lat * 10,
                    south_pole_lon_udeg: sp_lon * 10,
                    angle_of_rotation: rotation as f64 * 1e-3,
                })
            } else if data_repr == 4 {
                GridGeometry::GaussianLatLon(base)
            } else {
                GridGeometry::LatLon(base)
            }
        }
        1 => {
            let latin = signed_3byte(&body[start + 23..start + 26]);
            let scanning_mode = body[start + 27];
            let i_inc = ((body[start + 28] as u32) << 16) | ((body[start + 29] as u32) << 8) | body[start + 30] as u32;
            let j_inc = ((body[start + 31] as u32) << 16) | ((body[start + 32] as u32) << 8) | body[start + 33] as u32;
            GridGeometry::Mercator(MercatorGrid {
                nx,
                ny,
                first_lat_udeg: first_lat * 10,
                first_lon_udeg: first_lon * 10,
                last_lat_udeg: last_lat * 10,
                last_lon_udeg: last_lon * 10,
                latin: latin * 10,
                i_inc,
                j_inc,
                resolution_flags,
                scanning_mode,
                earth_shape: EarthShape::Spherical6367470,
            })
        }
        3 | 5 => {
            let lov = signed_3byte(&body[start + 17..start + 20]);
            let dx = ((body[start + 20] as u32) << 16) | ((body[start + 21] as u32) << 8) | body[start + 22] as u32;
            let dy = ((body[start + 23] as u32) << 16) | ((body[start + 24] as u32) << 8) | body[start + 25] as u32;
            let projection_flag = body[start + 26];
            let scanning_mode = body[start + 27];
            if data_repr == 5 {
                GridGeometry::PolarStereographic(PolarStereographicGrid {
                    nx,
                    ny,
                    first_lat_udeg: first_lat * 10,
                    first_lon_udeg: first_lon * 10,
                    orientation_lon_udeg: lov * 10,
                    i_inc: dx,
                    j_inc: dy,
                    projection_flag,
                    resolution_flags,
                    scanning_mode,
                    earth_shape: EarthShape::Spherical6367470,
                })
            } else {
                let latin1 = signed_3byte(&body[start + 28..start + 31]);
                let latin2 = signed_3byte(&body[start + 31..start + 34]);
                let sp_lat = signed_3byte(&body[start + 34..start + 37]);
                let sp_lon = signed_3byte(&body[start + 37..start + 40]);
                GridGeometry::LambertConformal(LambertConformalGrid {
                    nx,
                    ny,
                    first_lat_udeg: first_lat * 10,
                    first_lon_udeg: first_lon * 10,
                    orientation_lon_udeg: lov * 10,
                    i_inc: dx,
                    j_inc: dy,
                    projection_flag,
                    resolution_flags,
                    scanning_mode,
                    latin1_udeg: latin1 * 10,
                    latin2_udeg: latin2 * 10,
                    south_pole_lat_udeg: sp_lat * 10,
                    south_pole_lon_udeg: sp_lon * 10,
                    earth_shape: EarthShape::Spherical6367470,
                })
            }
        }
        _other => {
            return Err(DecodeError::UnsupportedPacking {
                reason: "unrecognized data representation type",
            })
        }
    };

    Ok((geometry, gds_len))
}

fn decode_bms(body: &[u8], start: usize, num_points: usize) -> Result<(Vec<bool>, usize), DecodeError> {
    let bms_len = ((body[start] as usize) << 16) | ((body[start + 1] as usize) << 8) | body[start + 2] as usize;
    let unused_bits = body[start + 3] as usize;
    let predefined_ref = ((body[start + 4] as u16) << 8) | body[start + 5] as u16;
    if predefined_ref != 0 {
        return Err(DecodeError::UnsupportedPacking { reason: "predefined bit-map references are not supported" });
    }

    let total_bits = (bms_len - 6) * 8 - unused_bits;
    if total_bits != num_points {
        return Err(DecodeError::BitmapLengthMismatch);
    }

    let mut bitmap = Vec::with_capacity(num_points);
    for i in 0..num_points {
        let bit = get_bits(&body[start + 6..], i, 1)?;
        bitmap.push(bit != 0);
    }
    Ok((bitmap, bms_len))
}

/// GRIB-1 grid types that carry one extra skipped field before the packed
/// values begin, per spec.md §4.5 step 7.
const SKIP_ONE_FIELD_GRID_TYPES: &[u8] = &[23, 24, 26, 63, 64];

fn decode_bds(
    body: &[u8],
    start: usize,
    grid_type: u8,
    num_points: usize,
    bitmap: Option<&[bool]>,
    decimal_scale: i16,
) -> Result<(Vec<f64>, Packing), DecodeError> {
    let flag_byte = body[start + 3];
    if flag_byte & 0x40 != 0 {
        return Err(DecodeError::UnsupportedPacking { reason: "second-order packing is not supported" });
    }
    let unused_bits = (flag_byte & 0x0F) as usize;

    let binary_scale_raw = ((body[start + 4] as u32) << 8) | body[start + 5] as u32;
    let binary_scale = sign_magnitude_to_i32(binary_scale_raw, 16) as i16;

    let ibm_word = u32::from_be_bytes([body[start + 6], body[start + 7], body[start + 8], body[start + 9]]);
    let reference_value = ibm_to_ieee(ibm_word) / 10f64.powi(decimal_scale as i32);

    let pack_width = body[start + 10];

    let bds_len = ((body[start] as usize) << 16) | ((body[start + 1] as usize) << 8) | body[start + 2] as usize;

    let mut bit_offset = (start + 11) * 8;
    if SKIP_ONE_FIELD_GRID_TYPES.contains(&grid_type) && pack_width > 0 {
        bit_offset += pack_width as usize;
    }

    let num_present = bitmap.map_or(num_points, |b| b.iter().filter(|&&p| p).count());

    let data = &body[start..start + bds_len];
    let local_offset = bit_offset - start * 8;

    let present_values = crate::gridpoint::simple::unpack(
        data,
        local_offset,
        num_present,
        pack_width,
        reference_value,
        binary_scale,
        decimal_scale,
    )?;

    let gridpoints = crate::gridpoint::apply_bitmap(bitmap, present_values.into_iter(), num_points);
    let _ = unused_bits;

    let packing = Packing {
        reference_value,
        binary_scale,
        decimal_scale,
        pack_width,
    };

    Ok((gridpoints, packing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IgnoreWarnings;

    fn build_constant_2x2_message() -> Vec<u8> {
        let mut pds = vec![0u8; 28];
        pds[0] = 0;
        pds[1] = 0;
        pds[2] = 28; // pds length
        pds[3] = 2; // table version
        pds[4] = 7; // centre
        pds[5] = 0; // process
        pds[6] = 0; // grid type
        pds[7] = 0x80; // has_gds, no bms
        pds[8] = 11; // parameter TMP
        pds[9] = 1; // level type (two-byte values)
        pds[10] = 0;
        pds[11] = 0;
        pds[12] = 20; // year of century
        pds[13] = 1; // month
        pds[14] = 1; // day
        pds[15] = 0; // hour
        pds[16] = 0; // minute
        pds[17] = 1; // fcst unit = hour
        pds[18] = 0; // p1
        pds[19] = 0; // p2
        pds[20] = 0; // time range
        pds[24] = 21; // century
        pds[25] = 0; // sub centre
                      // decimal scale = 0

        let mut gds = vec![0u8; 32];
        gds[2] = 32; // gds length
        gds[5] = 0; // lat/lon
        gds[6] = 0;
        gds[7] = 2; // nx = 2
        gds[8] = 0;
        gds[9] = 2; // ny = 2
                    // first lat = 0, first lon = 0
        gds[16] = 0; // resolution flags
                     // last lat = 1000 (1 deg * 1000), last lon = 1000
        gds[19] = 0x00;
        gds[20] = 0x03;
        gds[21] = 0xE8; // last lat = 1000 (0x03E8) -> scaled *10 udeg -> 1,000,000? wait we store raw*10
        gds[22] = 0x00;
        gds[23] = 0x03;
        gds[24] = 0xE8; // last lon
        gds[25] = 0x03;
        gds[26] = 0xE8; // i_inc = 1000
        gds[27] = 0x03;
        gds[28] = 0xE8; // j_inc = 1000
        gds[29] = 0; // scanning mode

        let mut bds = vec![0u8; 11];
        bds[2] = 11; // bds length
        bds[3] = 0; // flags/unused bits
                    // binary scale 0
        let ibm = crate::ibm_float::ieee_to_ibm(273.15);
        bds[6..10].copy_from_slice(&ibm.to_be_bytes());
        bds[10] = 0; // pack width 0 -> constant grid

        let pds_len = pds.len();
        let gds_len = gds.len();
        let bds_len = bds.len();
        let total_len = 8 + pds_len + gds_len + bds_len;

        let mut msg = Vec::new();
        msg.extend_from_slice(b"GRIB");
        msg.push((total_len >> 16) as u8);
        msg.push((total_len >> 8) as u8);
        msg.push(total_len as u8);
        msg.push(1); // edition
        msg.extend_from_slice(&pds);
        msg.extend_from_slice(&gds);
        msg.extend_from_slice(&bds);
        msg.extend_from_slice(b"7777");
        msg
    }

    #[test]
    fn decodes_constant_2x2_grid() {
        let stream = build_constant_2x2_message();
        let mut pos = 0;
        let warn = IgnoreWarnings;
        let decoded = decode_next(&stream, &mut pos, &warn).unwrap().unwrap();
        assert_eq!(decoded.message.gridpoints, vec![273.15; 4]);
        assert_eq!(pos, stream.len());
    }

    #[test]
    fn end_of_stream_returns_none() {
        let warn = IgnoreWarnings;
        let mut pos = 0;
        assert!(decode_next(&[], &mut pos, &warn).unwrap().is_none());
    }

    #[test]
    fn resync_emits_warning_on_garbage() {
        struct CountWarn(std::cell::Cell<usize>);
        impl Warn for CountWarn {
            fn warn(&self, _w: Warning) {
                self.0.set(self.0.get() + 1);
            }
        }
        let mut stream = vec![0xAA, 0xBB, 0xCC];
        stream.extend_from_slice(&build_constant_2x2_message());
        let warn = CountWarn(std::cell::Cell::new(0));
        let mut pos = 0;
        let decoded = decode_next(&stream, &mut pos, &warn).unwrap();
        assert!(decoded.is_some());
        assert_eq!(warn.0.get(), 1);
    }
}
