//! Translation between GRIB-1's time-range indicator (Code Table 5) and
//! GRIB-2's statistical-process code (Code Table 4.10).
//!
//! Grounded on the PDS-encoder switch in `original_source/src/grib1to2.c`:
//! `t_range` selects PDS template 0 (instantaneous) or 8 (statistically
//! processed), and within template 8 the process code is ordinarily the
//! direct image of `t_range`, except GRIB-1 parameters 15 (maximum
//! temperature) and 16 (minimum temperature) always carry process codes 2
//! and 3 respectively regardless of what `t_range` says, per spec.md §4.8.

use crate::error::EncodeError;

/// `true` when `t_range` requires PDS template 8 (statistically processed
/// field) rather than template 0 (instantaneous), per spec.md §4.8.
pub fn needs_statistical_template(t_range: u8) -> Option<bool> {
    match t_range {
        0 | 1 | 10 => Some(false),
        2 | 3 | 4 => Some(true),
        _ => None,
    }
}

/// Maps a GRIB-1 `(t_range, parameter_code)` pair to a GRIB-2 Code Table
/// 4.10 statistical-process code. `parameter_code` is consulted only for
/// the max/min-temperature exceptions.
pub fn g1_to_g2_process(t_range: u8, parameter_code: u8) -> Result<u8, EncodeError> {
    if parameter_code == 15 {
        return Ok(2); // maximum
    }
    if parameter_code == 16 {
        return Ok(3); // minimum
    }
    match t_range {
        3 => Ok(0), // average
        4 => Ok(1), // accumulation
        2 => Ok(4), // difference (end minus start)
        _ => Err(EncodeError::UnmappedTimeRange { time_range: t_range }),
    }
}

/// Inverse of [`g1_to_g2_process`]: recovers a `t_range` from a GRIB-2
/// process code. The max/min-temperature exceptions are not invertible
/// from the process code alone (the caller must also check the parameter
/// code and prefer `t_range = 3` in that case, matching the encoder's own
/// treatment of those two parameters as ordinary averages-in-reverse).
pub fn g2_to_g1_time_range(process_code: u8) -> Result<u8, EncodeError> {
    match process_code {
        0 => Ok(3),
        1 => Ok(4),
        2 | 3 => Ok(3),
        4 => Ok(2),
        _ => Err(EncodeError::UnmappedTimeRange { time_range: process_code }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_maps_to_process_0() {
        assert_eq!(g1_to_g2_process(3, 11).unwrap(), 0);
    }

    #[test]
    fn max_temperature_overrides_t_range() {
        assert_eq!(g1_to_g2_process(3, 15).unwrap(), 2);
        assert_eq!(g1_to_g2_process(4, 15).unwrap(), 2);
    }

    #[test]
    fn min_temperature_overrides_t_range() {
        assert_eq!(g1_to_g2_process(3, 16).unwrap(), 3);
    }

    #[test]
    fn unsupported_t_range_is_unmapped() {
        assert!(g1_to_g2_process(99, 11).is_err());
    }

    #[test]
    fn statistical_template_selection() {
        assert_eq!(needs_statistical_template(0), Some(false));
        assert_eq!(needs_statistical_template(3), Some(true));
        assert_eq!(needs_statistical_template(99), None);
    }
}
