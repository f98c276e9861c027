//! Shape-of-the-earth handling, grounded on the teacher's
//! `grid/earth.rs::EarthShapeDefinition::radii`.
//!
//! `gribflip` does not need the radii for anything (no reprojection or
//! resampling, per spec.md §1 Non-goals) but keeps the shape code itself as
//! round-trippable metadata — `EarthShape` in `crate::model` already covers
//! the one case both editions agree on (spherical, radius 6367470 m); this
//! module exists so a future consumer reading an unusual GDS/GRIB-2 GDT
//! earth-shape byte has somewhere to look up what it means without
//! guessing.

/// Returns `(major_axis_m, minor_axis_m)` for a Code Table 3.2
/// shape-of-the-earth byte, or `None` for reserved/local-use codes.
pub fn radii(shape: u8, scale_factor: i8, scaled_value: u32) -> Option<(f64, f64)> {
    let scaled = |default: f64| -> f64 {
        if scale_factor == 0 && scaled_value == 0 {
            default
        } else {
            scaled_value as f64 * 10f64.powi(-(scale_factor as i32))
        }
    };

    match shape {
        0 => Some((6_367_470.0, 6_367_470.0)),
        1 => {
            let r = scaled(6_367_470.0);
            Some((r, r))
        }
        2 => Some((6_378_160.0, 6_356_775.0)),
        3 => {
            let major = scaled(6_378_160.0) * 1000.0;
            let minor = scaled(6_356_775.0) * 1000.0;
            Some((major, minor))
        }
        4 => Some((6_378_137.0, 6_356_752.314)),
        5 => Some((6_378_137.0, 6_356_752.314)),
        6 => Some((6_371_229.0, 6_371_229.0)),
        7 => {
            let major = scaled(6_378_137.0);
            let minor = scaled(6_356_752.314);
            Some((major, minor))
        }
        8 => Some((6_371_200.0, 6_371_200.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spherical_default_radius() {
        let (major, minor) = radii(0, 0, 0).unwrap();
        assert_eq!(major, minor);
        assert_eq!(major, 6_367_470.0);
    }

    #[test]
    fn wgs84_like_shape() {
        let (major, minor) = radii(4, 0, 0).unwrap();
        assert!(major > minor);
    }

    #[test]
    fn reserved_shape_is_none() {
        assert!(radii(9, 0, 0).is_none());
    }
}
