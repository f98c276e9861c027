//! GRIB-2 message decoder: byte stream in, one [`crate::model::Message`]
//! per grid out. A GRIB-2 message may carry several grids sharing one
//! Identification Section, so `decode_next` returns a `Vec<Message>`.
//!
//! Section dispatch loop grounded on the teacher's `context.rs`
//! `index_submessages`/`Grib2::read` state machine (track current section
//! bodies, bind them into a submessage when a Data Section arrives) and
//! `reader.rs`'s `read_sect`/section-header parsing idiom, reworked to
//! decode section bodies inline rather than defer to per-submessage
//! indices, since spec.md's translation tables need every field decoded up
//! front.

use crate::bitstream::{get_bits, sign_magnitude_to_i32};
use crate::error::{DecodeError, Warn, Warning};
use crate::gridpoint::jpeg2000::Jpeg2000Decoder;
use crate::model::{
    DerivedForecast, EarthShape, Ensemble, EnsembleBlock, GridGeometry, LambertConformalGrid, LatLonGrid, Level,
    Message, Packing, PolarStereographicGrid, Product, ReferenceTime, RotatedGrid, SpatialProcessing, Source,
    StatisticalProcess,
};

const MAGIC: &[u8; 4] = b"GRIB";
const END_MARKER: &[u8; 4] = b"7777";

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

#[derive(Clone)]
struct Ids {
    centre: u16,
    sub_centre: u16,
    master_table_version: u8,
    local_table_version: u8,
    significance: u8,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    production_status: u8,
    data_type: u8,
}

#[derive(Clone, Copy)]
struct Drs {
    num_packed: u32,
    template: u16,
    reference_value: f64,
    binary_scale: i16,
    decimal_scale: i16,
    pack_width: u8,
    complex: Option<crate::gridpoint::complex::ComplexPackingParams>,
}

/// Decodes every grid contained in the next GRIB-2 message.
pub fn decode_next(
    stream: &[u8],
    pos: &mut usize,
    warn: &dyn Warn,
    jpeg: &dyn Jpeg2000Decoder,
) -> Result<Option<Vec<Message>>, DecodeError> {
    if !resync(stream, pos, warn) {
        return Ok(None);
    }

    let is_start = *pos;
    if is_start + 16 > stream.len() {
        return Err(DecodeError::UnsupportedPacking { reason: "truncated indicator section" });
    }
    if &stream[is_start..is_start + 4] != MAGIC {
        return Err(DecodeError::UnsupportedPacking { reason: "bad magic" });
    }
    let discipline = stream[is_start + 6];
    let edition = stream[is_start + 7];
    if edition != 2 {
        return Err(DecodeError::UnsupportedTemplate { kind: "edition", number: edition as u16 });
    }
    let total_len = u64::from_be_bytes(stream[is_start + 8..is_start + 16].try_into().unwrap()) as usize;

    if is_start + total_len > stream.len() {
        return Err(DecodeError::UnsupportedPacking { reason: "truncated message body" });
    }
    let body = &stream[is_start..is_start + total_len];
    if &body[body.len() - 4..] != END_MARKER {
        warn.warn(Warning::MissingEndMarker);
    }

    let mut offset = 16usize;
    let mut ids: Option<Ids> = None;
    let mut geometry: Option<GridGeometry> = None;
    let mut product: Option<Product> = None;
    let mut drs: Option<Drs> = None;
    let mut bitmap: Option<Vec<bool>> = None;
    let mut messages = Vec::new();

    while offset + 5 <= body.len() && &body[offset..offset + 4] != END_MARKER {
        let sect_len = u32::from_be_bytes(body[offset..offset + 4].try_into().unwrap()) as usize;
        let sect_num = body[offset + 4];
        let sect_body = &body[offset..offset + sect_len];

        match sect_num {
            1 => ids = Some(decode_ids(sect_body)?),
            2 => {}
            3 => geometry = Some(decode_gds(sect_body)?),
            4 => product = Some(decode_pds(sect_body, discipline)?),
            5 => drs = Some(decode_drs(sect_body)?),
            6 => bitmap = decode_bms(sect_body, geometry.as_ref().map_or(0, |g| g.num_points()), bitmap.take())?,
            7 => {
                let geom = geometry.clone().ok_or(DecodeError::UnsupportedPacking { reason: "data section with no grid definition" })?;
                let prod = product.clone().ok_or(DecodeError::UnsupportedPacking { reason: "data section with no product definition" })?;
                let ids_ref = ids.clone().ok_or(DecodeError::UnsupportedPacking { reason: "data section with no identification" })?;
                let d = drs.ok_or(DecodeError::UnsupportedPacking { reason: "data section with no data representation" })?;

                let gridpoints = decode_data_section(&sect_body[5..], &d, geom.num_points(), bitmap.as_deref(), jpeg)?;

                messages.push(Message {
                    reference_time: ReferenceTime {
                        year: ids_ref.year,
                        month: ids_ref.month,
                        day: ids_ref.day,
                        hour: ids_ref.hour,
                        minute: ids_ref.minute,
                        second: ids_ref.second,
                        significance: ids_ref.significance,
                        production_status: ids_ref.production_status,
                        data_type: ids_ref.data_type,
                    },
                    source: Source {
                        centre: ids_ref.centre,
                        sub_centre: ids_ref.sub_centre,
                        table_version: ids_ref.master_table_version,
                        local_table_version: ids_ref.local_table_version,
                        generating_process: 0,
                    },
                    geometry: geom,
                    product: prod,
                    packing: Packing {
                        reference_value: d.reference_value,
                        binary_scale: d.binary_scale,
                        decimal_scale: d.decimal_scale,
                        pack_width: d.pack_width,
                    },
                    bitmap: bitmap.clone(),
                    gridpoints,
                    pds_extension: Vec::new(),
                });
            }
            _ => {}
        }
        offset += sect_len;
    }

    *pos = is_start + total_len;
    Ok(Some(messages))
}

fn decode_ids(s: &[u8]) -> Result<Ids, DecodeError> {
    let centre = u16::from_be_bytes([s[5], s[6]]);
    let sub_centre = u16::from_be_bytes([s[7], s[8]]);
    let master_table_version = s[9];
    let local_table_version = s[10];
    let significance = s[11];
    let year = u16::from_be_bytes([s[12], s[13]]) as i32;
    let month = s[14] as u32;
    let day = s[15] as u32;
    let hour = s[16] as u32;
    let minute = s[17] as u32;
    let second = s[18] as u32;
    let production_status = s[19];
    let data_type = s[20];
    Ok(Ids {
        centre,
        sub_centre,
        master_table_version,
        local_table_version,
        significance,
        year,
        month,
        day,
        hour,
        minute,
        second,
        production_status,
        data_type,
    })
}

fn signed_32(bytes: [u8; 4]) -> i32 {
    let raw = u32::from_be_bytes(bytes);
    sign_magnitude_to_i32(raw, 32)
}

fn decode_gds(s: &[u8]) -> Result<GridGeometry, DecodeError> {
    let template = u16::from_be_bytes([s[12], s[13]]);
    let nx = u32::from_be_bytes(s[30..34].try_into().unwrap());
    let ny = u32::from_be_bytes(s[34..38].try_into().unwrap());

    match template {
        0 | 10 | 30 => {
            let first_lat = signed_32(s[46..50].try_into().unwrap());
            let first_lon = signed_32(s[50..54].try_into().unwrap());
            let resolution_flags = s[54];
            let last_lat = signed_32(s[55..59].try_into().unwrap());
            let last_lon = signed_32(s[59..63].try_into().unwrap());
            let i_inc = u32::from_be_bytes(s[63..67].try_into().unwrap());
            let j_inc = u32::from_be_bytes(s[67..71].try_into().unwrap());
            let scanning_mode = s[71];
            let base = LatLonGrid {
                nx,
                ny,
                first_lat_udeg: first_lat,
                first_lon_udeg: first_lon,
                last_lat_udeg: last_lat,
                last_lon_udeg: last_lon,
                i_inc_udeg: i_inc,
                j_inc_udeg: j_inc,
                resolution_flags,
                scanning_mode,
                earth_shape: EarthShape::Spherical6367470,
            };
            if template == 10 {
                let sp_lat = signed_32(s[72..76].try_into().unwrap());
                let sp_lon = signed_32(s[76..80].try_into().unwrap());
                let rotation_raw = i32::from_be_bytes(s[80..84].try_into().unwrap());
                Ok(GridGeometry::Rotated(RotatedGrid {
                    base,
                    south_pole_lat_udeg: sp_lat,
                    south_pole_lon_udeg: sp_lon,
                    angle_of_rotation: rotation_raw as f64 * 1e-6,
                }))
            } else {
                Ok(GridGeometry::LatLon(base))
            }
        }
        40 => {
            let first_lat = signed_32(s[46..50].try_into().unwrap());
            let first_lon = signed_32(s[50..54].try_into().unwrap());
            let resolution_flags = s[54];
            let last_lat = signed_32(s[55..59].try_into().unwrap());
            let last_lon = signed_32(s[59..63].try_into().unwrap());
            let i_inc = u32::from_be_bytes(s[63..67].try_into().unwrap());
            let scanning_mode = s[71];
            Ok(GridGeometry::GaussianLatLon(LatLonGrid {
                nx,
                ny,
                first_lat_udeg: first_lat,
                first_lon_udeg: first_lon,
                last_lat_udeg: last_lat,
                last_lon_udeg: last_lon,
                i_inc_udeg: i_inc,
                j_inc_udeg: 0,
                resolution_flags,
                scanning_mode,
                earth_shape: EarthShape::Spherical6367470,
            }))
        }
        20 => {
            let first_lat = signed_32(s[46..50].try_into().unwrap());
            let first_lon = signed_32(s[50..54].try_into().unwrap());
            let lov = signed_32(s[55..59].try_into().unwrap());
            let dx = u32::from_be_bytes(s[59..63].try_into().unwrap());
            let dy = u32::from_be_bytes(s[63..67].try_into().unwrap());
            let projection_flag = s[67];
            let scanning_mode = s[68];
            Ok(GridGeometry::PolarStereographic(PolarStereographicGrid {
                nx,
                ny,
                first_lat_udeg: first_lat,
                first_lon_udeg: first_lon,
                orientation_lon_udeg: lov,
                i_inc: dx,
                j_inc: dy,
                projection_flag,
                resolution_flags: 0,
                scanning_mode,
                earth_shape: EarthShape::Spherical6367470,
            }))
        }
        30 | 31 => {
            let first_lat = signed_32(s[46..50].try_into().unwrap());
            let first_lon = signed_32(s[50..54].try_into().unwrap());
            let lov = signed_32(s[55..59].try_into().unwrap());
            let dx = u32::from_be_bytes(s[59..63].try_into().unwrap());
            let dy = u32::from_be_bytes(s[63..67].try_into().unwrap());
            let projection_flag = s[67];
            let scanning_mode = s[68];
            let latin1 = signed_32(s[69..73].try_into().unwrap());
            let latin2 = signed_32(s[73..77].try_into().unwrap());
            let sp_lat = signed_32(s[77..81].try_into().unwrap());
            let sp_lon = signed_32(s[81..85].try_into().unwrap());
            Ok(GridGeometry::LambertConformal(LambertConformalGrid {
                nx,
                ny,
                first_lat_udeg: first_lat,
                first_lon_udeg: first_lon,
                orientation_lon_udeg: lov,
                i_inc: dx,
                j_inc: dy,
                projection_flag,
                resolution_flags: 0,
                scanning_mode,
                latin1_udeg: latin1,
                latin2_udeg: latin2,
                south_pole_lat_udeg: sp_lat,
                south_pole_lon_udeg: sp_lon,
                earth_shape: EarthShape::Spherical6367470,
            }))
        }
        _ => Err(DecodeError::UnsupportedTemplate { kind: "grid definition", number: template }),
    }
}

fn decode_level(s: &[u8], off: usize) -> Level {
    let level_type = s[off];
    let scale = s[off + 1] as i8 as i16;
    let value = signed_32(s[off + 2..off + 6].try_into().unwrap());
    Level { level_type, scale, value }
}

fn decode_pds(s: &[u8], discipline: u8) -> Result<Product, DecodeError> {
    let template = u16::from_be_bytes([s[7], s[8]]);
    match template {
        0 | 1 | 2 | 8 | 11 | 12 | 15 => {
            let parameter_category = s[9];
            let parameter_number = s[10];
            let forecast_time_unit = s[17];
            let forecast_time_offset = i32::from_be_bytes(s[18..22].try_into().unwrap());
            let level1 = decode_level(s, 22);
            let level2 = decode_level(s, 28);

            let mut tail = 34usize;

            let ensemble = match template {
                1 | 11 => {
                    let e = Ensemble {
                        ensemble_type: s[tail],
                        perturbation_number: s[tail + 1],
                        ensemble_size: s[tail + 2],
                    };
                    tail += 3;
                    EnsembleBlock::Ensemble(e)
                }
                2 | 12 => {
                    let d = DerivedForecast {
                        derived_code: s[tail],
                        ensemble_size: s[tail + 1],
                    };
                    tail += 2;
                    EnsembleBlock::Derived(d)
                }
                _ => EnsembleBlock::None,
            };

            let statistical_process = if matches!(template, 8 | 11 | 12) {
                let end_year = u16::from_be_bytes([s[tail], s[tail + 1]]) as i32;
                let end_month = s[tail + 2] as u32;
                let end_day = s[tail + 3] as u32;
                let end_hour = s[tail + 4] as u32;
                let end_minute = s[tail + 5] as u32;
                let end_second = s[tail + 6] as u32;
                let num_ranges = s[tail + 7] as u16;
                let num_missing = u32::from_be_bytes(s[tail + 8..tail + 12].try_into().unwrap());
                let rec = tail + 12;
                let process_code = s[rec];
                let time_increment_type = s[rec + 1];
                let time_unit = s[rec + 2];
                let length = u32::from_be_bytes(s[rec + 3..rec + 7].try_into().unwrap());
                let increment_unit = s[rec + 7];
                let increment_length = u32::from_be_bytes(s[rec + 8..rec + 12].try_into().unwrap());
                Some(StatisticalProcess {
                    end_year,
                    end_month,
                    end_day,
                    end_hour,
                    end_minute,
                    end_second,
                    process_code,
                    time_increment_type,
                    time_unit,
                    length,
                    increment_unit,
                    increment_length,
                    num_ranges,
                    num_missing,
                })
            } else {
                None
            };

            let spatial_processing = if template == 15 {
                Some(SpatialProcessing {
                    stat_proc: s[tail],
                    spatial_proc_type: s[tail + 1],
                    num_points: s[tail + 2],
                })
            } else {
                None
            };

            Ok(Product {
                discipline,
                parameter_category,
                parameter_number,
                forecast_time_unit,
                forecast_time_offset,
                level1,
                level2,
                statistical_process,
                ensemble,
                spatial_processing,
            })
        }
        other => Err(DecodeError::UnsupportedTemplate { kind: "product definition", number: other }),
    }
}

fn decode_drs(s: &[u8]) -> Result<Drs, DecodeError> {
    let num_packed = u32::from_be_bytes(s[5..9].try_into().unwrap());
    let template = u16::from_be_bytes([s[9], s[10]]);

    let reference_value_bits = u32::from_be_bytes(s[11..15].try_into().unwrap());
    let reference_value = f32::from_bits(reference_value_bits) as f64;
    let binary_scale = i16::from_be_bytes(s[15..17].try_into().unwrap());
    let decimal_scale = i16::from_be_bytes(s[17..19].try_into().unwrap());
    let pack_width = s[19];

    let mut num_groups = 0u32;
    let complex = if template == 3 {
        // octets 21-23 (type of original values, group split method) are
        // not needed by this codec, which never re-encodes complex-packed
        // fields (spec.md §1 Non-goals).
        let missing_value_management = s[22];
        num_groups = u32::from_be_bytes(s[31..35].try_into().unwrap());
        let group_width_ref = s[35] as u32;
        let group_width_pack_width = s[36];
        let group_length_ref = u32::from_be_bytes(s[37..41].try_into().unwrap());
        let group_length_increment = s[41] as u32;
        let group_length_last = u32::from_be_bytes(s[42..46].try_into().unwrap());
        let group_length_pack_width = s[46];
        let spatial_diff_order = s[47];
        let order_vals_width = s[48];
        Some(crate::gridpoint::complex::ComplexPackingParams {
            group_ref_width: pack_width,
            group_width_ref,
            group_width_pack_width,
            group_length_ref,
            group_length_increment,
            group_length_last,
            group_length_pack_width,
            num_groups,
            spatial_diff_order,
            order_vals_width,
            missing_value_management,
        })
    } else if template == 0 || template == 40 || template == 40000 {
        None
    } else {
        return Err(DecodeError::UnsupportedTemplate { kind: "data representation", number: template });
    };

    Ok(Drs {
        num_packed,
        template,
        reference_value,
        binary_scale,
        decimal_scale,
        pack_width,
        complex,
    })
}

fn decode_bms(s: &[u8], num_points: usize, previous: Option<Vec<bool>>) -> Result<Option<Vec<bool>>, DecodeError> {
    let indicator = s[5];
    match indicator {
        0 => {
            let mut bitmap = Vec::with_capacity(num_points);
            for i in 0..num_points {
                bitmap.push(get_bits(&s[6..], i, 1)? != 0);
            }
            Ok(Some(bitmap))
        }
        254 => Ok(previous),
        255 => Ok(None),
        _ => Err(DecodeError::UnsupportedPacking { reason: "unsupported bitmap indicator" }),
    }
}

fn decode_data_section(
    data: &[u8],
    drs: &Drs,
    num_points: usize,
    bitmap: Option<&[bool]>,
    jpeg: &dyn Jpeg2000Decoder,
) -> Result<Vec<f64>, DecodeError> {
    let num_present = bitmap.map_or(num_points, |b| b.iter().filter(|&&p| p).count());

    match drs.template {
        0 => {
            let present = crate::gridpoint::simple::unpack(
                data,
                0,
                num_present,
                drs.pack_width,
                drs.reference_value,
                drs.binary_scale,
                drs.decimal_scale,
            )?;
            Ok(crate::gridpoint::apply_bitmap(bitmap, present.into_iter(), num_points))
        }
        3 => {
            let params = drs.complex.ok_or(DecodeError::UnsupportedPacking { reason: "missing complex packing parameters" })?;
            let present = crate::gridpoint::complex::decode(
                data,
                0,
                &params,
                drs.reference_value,
                drs.binary_scale,
                drs.decimal_scale,
                num_present,
            )?;
            Ok(crate::gridpoint::apply_bitmap(bitmap, present.into_iter(), num_points))
        }
        40 | 40000 => {
            let mut samples = vec![0i32; num_present];
            jpeg.decode_j2k(data, &mut samples)?;
            let present = crate::gridpoint::jpeg2000::unscale_samples(&samples, drs.reference_value, drs.binary_scale, drs.decimal_scale);
            Ok(crate::gridpoint::apply_bitmap(bitmap, present.into_iter(), num_points))
        }
        other => Err(DecodeError::UnsupportedTemplate { kind: "data representation", number: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IgnoreWarnings;
    use crate::gridpoint::jpeg2000::NoJpeg2000;

    fn build_simple_message() -> Vec<u8> {
        let discipline = 0u8;
        let mut ids = vec![0u8; 21];
        ids[4] = 1; // section number
        ids[5..7].copy_from_slice(&7u16.to_be_bytes());
        ids[9] = 2; // master table version
        ids[12..14].copy_from_slice(&2020u16.to_be_bytes());
        ids[14] = 1;
        ids[15] = 1;

        let mut gds = vec![0u8; 72];
        gds[4] = 3;
        gds[12..14].copy_from_slice(&0u16.to_be_bytes()); // template 0
        gds[30..34].copy_from_slice(&2u32.to_be_bytes());
        gds[34..38].copy_from_slice(&2u32.to_be_bytes());
        gds[71] = 0; // scanning mode

        let mut pds = vec![0u8; 34];
        pds[4] = 4;
        pds[7..9].copy_from_slice(&0u16.to_be_bytes()); // template 0
        pds[9] = 0; // category
        pds[10] = 0; // number
        pds[17] = 1; // fcst unit
        pds[28] = 255; // level2 absent
        pds[22] = 100; // level1 type

        let mut drs = vec![0u8; 21];
        drs[4] = 5;
        drs[5..9].copy_from_slice(&4u32.to_be_bytes());
        drs[9..11].copy_from_slice(&0u16.to_be_bytes()); // template 0
        let r = 273.15f32.to_bits();
        drs[11..15].copy_from_slice(&r.to_be_bytes());
        drs[19] = 0; // pack width 0

        let bms = {
            let mut b = vec![0u8; 6];
            b[4] = 6;
            b[5] = 255; // no bitmap
            b
        };

        let mut ds = vec![0u8; 5];
        ds[4] = 7;

        let body_len = 16 + ids.len() + gds.len() + pds.len() + drs.len() + bms.len() + ds.len() + 4;
        for v in [&mut ids, &mut gds, &mut pds, &mut drs, &mut bms, &mut ds] {
            let len = v.len() as u32;
            v[0..4].copy_from_slice(&len.to_be_bytes());
        }

        let mut msg = Vec::new();
        msg.extend_from_slice(b"GRIB");
        msg.push(0);
        msg.push(0);
        msg.push(discipline);
        msg.push(2);
        msg.extend_from_slice(&(body_len as u64).to_be_bytes());
        msg.extend_from_slice(&ids);
        msg.extend_from_slice(&gds);
        msg.extend_from_slice(&pds);
        msg.extend_from_slice(&drs);
        msg.extend_from_slice(&bms);
        msg.extend_from_slice(&ds);
        msg.extend_from_slice(b"7777");
        msg
    }

    #[test]
    fn decodes_constant_2x2_grid() {
        let stream = build_simple_message();
        let warn = IgnoreWarnings;
        let jpeg = NoJpeg2000;
        let mut pos = 0;
        let messages = decode_next(&stream, &mut pos, &warn, &jpeg).unwrap().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].gridpoints, vec![273.15; 4]);
    }

    #[test]
    fn end_of_stream_returns_none() {
        let warn = IgnoreWarnings;
        let jpeg = NoJpeg2000;
        let mut pos = 0;
        assert!(decode_next(&[], &mut pos, &warn, &jpeg).unwrap().is_none());
    }
}
