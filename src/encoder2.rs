//! GRIB-2 message emitter: [`crate::model::Message`] in, byte stream out.
//!
//! Grounded on spec.md §4.8 and mirrors decoder2's section layout exactly
//! (same octet offsets) so that a message round-tripped through
//! `decoder2::decode_next` then `encoder2::encode` reproduces the same
//! section bodies. Only simple packing (DRS template 0) is ever emitted —
//! a complex-packing or JPEG-2000 *encoder* is an explicit Non-goal
//! (spec.md §1); anything decoded as template 3/40/40000 is always
//! re-packed as template 0 on the way out.

use crate::calendar::{add_time, CalendarTime, TimeUnit};
use crate::codetables::time_range::{g1_to_g2_process, needs_statistical_template};
use crate::error::EncodeError;
use crate::gridpoint::simple::{minimal_pack_width, pack, quantize};
use crate::model::{EnsembleBlock, GridGeometry, Message, StatisticalProcess};

const END_MARKER: &[u8; 4] = b"7777";

/// Fields encoder2 needs beyond [`Message`] because they are GRIB-1
/// concepts translated on the way across: the raw time-range indicator and
/// parameter code drive PDS template/process selection (spec.md §4.8).
pub struct Encode2Extra {
    pub time_range: u8,
    pub g1_parameter_code: u8,
    pub p1: u8,
    pub p2: u8,
}

pub fn encode(message: &Message, extra: &Encode2Extra) -> Result<Vec<u8>, EncodeError> {
    let ids = encode_ids(message);
    let gds = encode_gds(&message.geometry)?;
    let pds = encode_pds(message, extra)?;
    let drs_and_data = encode_drs_and_data(message)?;
    let bms = encode_bms(message);

    let mut sections = Vec::new();
    sections.extend(section(1, &ids));
    sections.extend(section(3, &gds));
    sections.extend(section(4, &pds));
    sections.extend(section(5, &drs_and_data.0));
    sections.extend(section(6, &bms));
    sections.extend(section(7, &drs_and_data.1));

    let total_len = 16 + sections.len() + 4;
    let mut out = Vec::with_capacity(total_len);
    out.extend_from_slice(b"GRIB");
    out.push(0);
    out.push(0);
    out.push(message.product.discipline);
    out.push(2);
    out.extend_from_slice(&(total_len as u64).to_be_bytes());
    out.extend_from_slice(&sections);
    out.extend_from_slice(END_MARKER);
    Ok(out)
}

/// Wraps a section body (the part after the shared 4-byte length + 1-byte
/// number prefix) with that prefix. Every section on the wire shares this
/// layout, so `decoder2::decode_next`'s per-section `s` indexing and this
/// function's output agree once the caller's byte offsets are counted from
/// the start of `body` (i.e. include the 5-byte header in their math).
fn section(number: u8, body: &[u8]) -> Vec<u8> {
    let len = (5 + body.len()) as u32;
    let mut out = Vec::with_capacity(len as usize);
    out.extend_from_slice(&len.to_be_bytes());
    out.push(number);
    out.extend_from_slice(body);
    out
}

fn signed_32_bytes(value: i32) -> [u8; 4] {
    let sign = if value < 0 { 1u32 << 31 } else { 0 };
    let magnitude = value.unsigned_abs() & 0x7FFF_FFFF;
    (sign | magnitude).to_be_bytes()
}

/// Builds the Identification Section body, matching
/// `decoder2::decode_ids`'s `s[5..21]` field layout.
fn encode_ids(message: &Message) -> Vec<u8> {
    let mut s = vec![0u8; 21];
    s[5..7].copy_from_slice(&message.source.centre.to_be_bytes());
    s[7..9].copy_from_slice(&message.source.sub_centre.to_be_bytes());
    s[9] = message.source.table_version;
    s[10] = message.source.local_table_version;
    s[11] = message.reference_time.significance;
    s[12..14].copy_from_slice(&(message.reference_time.year as u16).to_be_bytes());
    s[14] = message.reference_time.month as u8;
    s[15] = message.reference_time.day as u8;
    s[16] = message.reference_time.hour as u8;
    s[17] = message.reference_time.minute as u8;
    s[18] = message.reference_time.second as u8;
    s[19] = message.reference_time.production_status;
    s[20] = message.reference_time.data_type;
    s[5..].to_vec()
}

/// Builds the Grid Definition Section body, matching
/// `decoder2::decode_gds`'s offsets per template.
fn encode_gds(geometry: &GridGeometry) -> Result<Vec<u8>, EncodeError> {
    let template: u16 = match geometry {
        GridGeometry::LatLon(_) => 0,
        GridGeometry::GaussianLatLon(_) => 40,
        GridGeometry::Rotated(_) => 10,
        GridGeometry::PolarStereographic(_) => 20,
        GridGeometry::LambertConformal(_) => 30,
        GridGeometry::Mercator(_) => return Err(EncodeError::UnsupportedGrid),
    };

    let len = match geometry {
        GridGeometry::LatLon(_) | GridGeometry::GaussianLatLon(_) => 72,
        GridGeometry::Rotated(_) => 84,
        GridGeometry::PolarStereographic(_) => 69,
        GridGeometry::LambertConformal(_) => 85,
        GridGeometry::Mercator(_) => unreachable!("filtered above"),
    };
    let mut s = vec![0u8; len];
    s[12..14].copy_from_slice(&template.to_be_bytes());
    s[30..34].copy_from_slice(&geometry.nx().to_be_bytes());
    s[34..38].copy_from_slice(&geometry.ny().to_be_bytes());

    match geometry {
        GridGeometry::LatLon(g) | GridGeometry::GaussianLatLon(g) => {
            s[46..50].copy_from_slice(&signed_32_bytes(g.first_lat_udeg));
            s[50..54].copy_from_slice(&signed_32_bytes(g.first_lon_udeg));
            s[54] = g.resolution_flags;
            s[55..59].copy_from_slice(&signed_32_bytes(g.last_lat_udeg));
            s[59..63].copy_from_slice(&signed_32_bytes(g.last_lon_udeg));
            s[63..67].copy_from_slice(&g.i_inc_udeg.to_be_bytes());
            s[67..71].copy_from_slice(&g.j_inc_udeg.to_be_bytes());
            s[71] = g.scanning_mode;
        }
        GridGeometry::Rotated(g) => {
            s[46..50].copy_from_slice(&signed_32_bytes(g.base.first_lat_udeg));
            s[50..54].copy_from_slice(&signed_32_bytes(g.base.first_lon_udeg));
            s[54] = g.base.resolution_flags;
            s[55..59].copy_from_slice(&signed_32_bytes(g.base.last_lat_udeg));
            s[59..63].copy_from_slice(&signed_32_bytes(g.base.last_lon_udeg));
            s[63..67].copy_from_slice(&g.base.i_inc_udeg.to_be_bytes());
            s[67..71].copy_from_slice(&g.base.j_inc_udeg.to_be_bytes());
            s[71] = g.base.scanning_mode;
            s[72..76].copy_from_slice(&signed_32_bytes(g.south_pole_lat_udeg));
            s[76..80].copy_from_slice(&signed_32_bytes(g.south_pole_lon_udeg));
            s[80..84].copy_from_slice(&((g.angle_of_rotation * 1e6) as i32).to_be_bytes());
        }
        GridGeometry::PolarStereographic(g) => {
            s[46..50].copy_from_slice(&signed_32_bytes(g.first_lat_udeg));
            s[50..54].copy_from_slice(&signed_32_bytes(g.first_lon_udeg));
            s[55..59].copy_from_slice(&signed_32_bytes(g.orientation_lon_udeg));
            s[59..63].copy_from_slice(&g.i_inc.to_be_bytes());
            s[63..67].copy_from_slice(&g.j_inc.to_be_bytes());
            s[67] = g.projection_flag;
            s[68] = g.scanning_mode;
        }
        GridGeometry::LambertConformal(g) => {
            s[46..50].copy_from_slice(&signed_32_bytes(g.first_lat_udeg));
            s[50..54].copy_from_slice(&signed_32_bytes(g.first_lon_udeg));
            s[55..59].copy_from_slice(&signed_32_bytes(g.orientation_lon_udeg));
            s[59..63].copy_from_slice(&g.i_inc.to_be_bytes());
            s[63..67].copy_from_slice(&g.j_inc.to_be_bytes());
            s[67] = g.projection_flag;
            s[68] = g.scanning_mode;
            s[69..73].copy_from_slice(&signed_32_bytes(g.latin1_udeg));
            s[73..77].copy_from_slice(&signed_32_bytes(g.latin2_udeg));
            s[77..81].copy_from_slice(&signed_32_bytes(g.south_pole_lat_udeg));
            s[81..85].copy_from_slice(&signed_32_bytes(g.south_pole_lon_udeg));
        }
        GridGeometry::Mercator(_) => unreachable!("filtered above"),
    }

    Ok(s[5..].to_vec())
}

fn encode_level(s: &mut [u8], off: usize, level: &crate::model::Level) {
    s[off] = level.level_type;
    s[off + 1] = level.scale as i8 as u8;
    s[off + 2..off + 6].copy_from_slice(&signed_32_bytes(level.value));
}

/// Builds the Product Definition Section body, matching
/// `decoder2::decode_pds`'s offsets for templates 0/1/2/8/11/12.
fn encode_pds(message: &Message, extra: &Encode2Extra) -> Result<Vec<u8>, EncodeError> {
    let use_statistical = needs_statistical_template(extra.time_range)
        .ok_or(EncodeError::UnmappedTimeRange { time_range: extra.time_range })?;

    let ensemble_extra = match &message.product.ensemble {
        EnsembleBlock::None => 0,
        EnsembleBlock::Ensemble(_) => 3,
        EnsembleBlock::Derived(_) => 2,
    };

    let template: u16 = match (&message.product.ensemble, use_statistical) {
        (EnsembleBlock::None, false) => 0,
        (EnsembleBlock::None, true) => 8,
        (EnsembleBlock::Ensemble(_), false) => 1,
        (EnsembleBlock::Ensemble(_), true) => 11,
        (EnsembleBlock::Derived(_), false) => 2,
        (EnsembleBlock::Derived(_), true) => 12,
    };

    let stat_len = if use_statistical { 24 } else { 0 };
    let mut s = vec![0u8; 34 + ensemble_extra + stat_len];

    s[7..9].copy_from_slice(&template.to_be_bytes());
    s[9] = message.product.parameter_category;
    s[10] = message.product.parameter_number;
    s[17] = message.product.forecast_time_unit;
    s[18..22].copy_from_slice(&message.product.forecast_time_offset.to_be_bytes());
    encode_level(&mut s, 22, &message.product.level1);
    encode_level(&mut s, 28, &message.product.level2);

    let mut tail = 34usize;
    match &message.product.ensemble {
        EnsembleBlock::Ensemble(e) => {
            s[tail] = e.ensemble_type;
            s[tail + 1] = e.perturbation_number;
            s[tail + 2] = e.ensemble_size;
            tail += 3;
        }
        EnsembleBlock::Derived(d) => {
            s[tail] = d.derived_code;
            s[tail + 1] = d.ensemble_size;
            tail += 2;
        }
        EnsembleBlock::None => {}
    }

    if use_statistical {
        let process_code = g1_to_g2_process(extra.time_range, extra.g1_parameter_code)?;
        let end = add_time(
            CalendarTime::new(
                message.reference_time.year,
                message.reference_time.month,
                message.reference_time.day,
                message.reference_time.hour,
                message.reference_time.minute,
                message.reference_time.second,
            ),
            TimeUnit::from_code(message.product.forecast_time_unit)
                .ok_or(EncodeError::UnmappedTimeRange { time_range: extra.time_range })?,
            extra.p2 as i64,
        )
        .map_err(|_| EncodeError::UnmappedTimeRange { time_range: extra.time_range })?;

        let stat = StatisticalProcess {
            end_year: end.year,
            end_month: end.month,
            end_day: end.day,
            end_hour: end.hour,
            end_minute: end.minute,
            end_second: end.second,
            process_code,
            time_increment_type: 2,
            time_unit: message.product.forecast_time_unit,
            length: (extra.p2 as u32).saturating_sub(extra.p1 as u32),
            increment_unit: message.product.forecast_time_unit,
            increment_length: 0,
            num_ranges: 1,
            num_missing: 0,
        };

        s[tail..tail + 2].copy_from_slice(&(stat.end_year as u16).to_be_bytes());
        s[tail + 2] = stat.end_month as u8;
        s[tail + 3] = stat.end_day as u8;
        s[tail + 4] = stat.end_hour as u8;
        s[tail + 5] = stat.end_minute as u8;
        s[tail + 6] = stat.end_second as u8;
        s[tail + 7] = stat.num_ranges as u8;
        s[tail + 8..tail + 12].copy_from_slice(&stat.num_missing.to_be_bytes());
        let rec = tail + 12;
        s[rec] = stat.process_code;
        s[rec + 1] = stat.time_increment_type;
        s[rec + 2] = stat.time_unit;
        s[rec + 3..rec + 7].copy_from_slice(&stat.length.to_be_bytes());
        s[rec + 7] = stat.increment_unit;
        s[rec + 8..rec + 12].copy_from_slice(&stat.increment_length.to_be_bytes());
    }

    Ok(s[5..].to_vec())
}

/// Builds the Bit-Map Section body, matching `decoder2::decode_bms`.
fn encode_bms(message: &Message) -> Vec<u8> {
    match &message.bitmap {
        None => vec![255],
        Some(bits) => {
            let mut body = vec![0u8];
            let mut packed = vec![0u8; crate::bitstream::num_octets(bits.len())];
            for (i, &present) in bits.iter().enumerate() {
                if present {
                    crate::bitstream::set_bits(&mut packed, 1, i, 1).ok();
                }
            }
            body.extend_from_slice(&packed);
            body
        }
    }
}

/// Builds the Data Representation Section body (always template 0, simple
/// packing) and the Data Section body together, since the pack width
/// chosen for the DRS also sizes the Data Section.
fn encode_drs_and_data(message: &Message) -> Result<(Vec<u8>, Vec<u8>), EncodeError> {
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

    let mut data = vec![0u8; crate::bitstream::num_octets(pack_width as usize * quantized.len())];
    pack(&mut data, 0, &quantized, pack_width)?;

    let mut s = vec![0u8; 20];
    s[5..9].copy_from_slice(&(present_values.len() as u32).to_be_bytes());
    s[9..11].copy_from_slice(&0u16.to_be_bytes()); // template 0
    s[11..15].copy_from_slice(&(reference_value as f32).to_bits().to_be_bytes());
    s[15..17].copy_from_slice(&binary_scale.to_be_bytes());
    s[17..19].copy_from_slice(&decimal_scale.to_be_bytes());
    s[19] = pack_width;

    Ok((s[5..].to_vec(), data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EarthShape, GridGeometry, LatLonGrid, Level, Packing, Product, ReferenceTime, Source};

    fn sample_message() -> Message {
        Message {
            reference_time: ReferenceTime {
                year: 2017,
                month: 7,
                day: 10,
                hour: 6,
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
                level1: Level { level_type: 100, scale: -2, value: 50000 },
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
        let extra = Encode2Extra { time_range: 0, g1_parameter_code: 11, p1: 0, p2: 0 };
        let bytes = encode(&msg, &extra).unwrap();
        assert_eq!(&bytes[0..4], b"GRIB");
        assert_eq!(&bytes[bytes.len() - 4..], b"7777");
        assert_eq!(bytes[7], 2); // edition
    }

    #[test]
    fn roundtrips_through_decoder2() {
        let msg = sample_message();
        let extra = Encode2Extra { time_range: 0, g1_parameter_code: 11, p1: 0, p2: 0 };
        let bytes = encode(&msg, &extra).unwrap();

        let warn = crate::error::IgnoreWarnings;
        let jpeg = crate::gridpoint::jpeg2000::NoJpeg2000;
        let mut pos = 0;
        let decoded = crate::decoder2::decode_next(&bytes, &mut pos, &warn, &jpeg).unwrap().unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].gridpoints, vec![273.15; 4]);
        assert_eq!(decoded[0].source.centre, 7);
    }

    #[test]
    fn statistical_template_uses_calendar() {
        let msg = sample_message();
        let extra = Encode2Extra { time_range: 3, g1_parameter_code: 11, p1: 0, p2: 48 };
        let bytes = encode(&msg, &extra).unwrap();
        assert_eq!(&bytes[bytes.len() - 4..], b"7777");

        let warn = crate::error::IgnoreWarnings;
        let jpeg = crate::gridpoint::jpeg2000::NoJpeg2000;
        let mut pos = 0;
        let decoded = crate::decoder2::decode_next(&bytes, &mut pos, &warn, &jpeg).unwrap().unwrap();
        let stat = decoded[0].product.statistical_process.unwrap();
        assert_eq!(stat.end_day, 12);
        assert_eq!(stat.process_code, 0);
    }

    #[test]
    fn unsupported_time_range_is_rejected() {
        let msg = sample_message();
        let extra = Encode2Extra { time_range: 99, g1_parameter_code: 11, p1: 0, p2: 0 };
        assert!(encode(&msg, &extra).is_err());
    }
}
