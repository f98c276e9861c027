//! Level-type translation between GRIB-1's single-type-plus-value(s)
//! encoding and GRIB-2's two-surface `(type, scale, value)` encoding.
//!
//! Table grounded on `original_source/src/grib1to2.c`'s level-type switch
//! (lines ~2180-2260), folded into a data table per spec.md §9's redesign
//! flag against deep `switch` nesting.

use crate::error::EncodeError;
use crate::model::Level;

/// One row of the forward (GRIB-1 → GRIB-2) table.
#[derive(Debug, Clone, Copy)]
struct LevelEntry {
    g1_type: u8,
    g2_type1: u8,
    g2_type2: u8,
    scale1: i16,
    scale2: i16,
    /// `None` = value carried through unchanged; `Some(f)` = apply `f` to
    /// the raw value before scaling. Kept separate per surface: type 141
    /// transforms only its second value (`examples/original_source/src/
    /// grib1to2.c:2326-2332`'s `case 141` touches only `lvl2_value`), while
    /// 114/121/128 transform both.
    transform1: Option<fn(i32) -> i32>,
    transform2: Option<fn(i32) -> i32>,
}

fn sub_475(v: i32) -> i32 {
    475 - v
}

fn sub_1100(v: i32) -> i32 {
    1100 - v
}

const TABLE: &[LevelEntry] = &[
    LevelEntry { g1_type: 100, g2_type1: 100, g2_type2: 255, scale1: -2, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 101, g2_type1: 100, g2_type2: 100, scale1: -3, scale2: -3, transform1: None, transform2: None },
    LevelEntry { g1_type: 102, g2_type1: 101, g2_type2: 255, scale1: 0, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 103, g2_type1: 102, g2_type2: 255, scale1: 0, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 104, g2_type1: 102, g2_type2: 102, scale1: -2, scale2: -2, transform1: None, transform2: None },
    LevelEntry { g1_type: 105, g2_type1: 103, g2_type2: 255, scale1: 0, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 106, g2_type1: 103, g2_type2: 103, scale1: -2, scale2: -2, transform1: None, transform2: None },
    LevelEntry { g1_type: 107, g2_type1: 104, g2_type2: 255, scale1: 4, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 108, g2_type1: 104, g2_type2: 104, scale1: 2, scale2: 2, transform1: None, transform2: None },
    LevelEntry { g1_type: 109, g2_type1: 105, g2_type2: 255, scale1: 0, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 110, g2_type1: 105, g2_type2: 105, scale1: 0, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 111, g2_type1: 106, g2_type2: 255, scale1: 2, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 112, g2_type1: 106, g2_type2: 106, scale1: 2, scale2: 2, transform1: None, transform2: None },
    LevelEntry { g1_type: 113, g2_type1: 107, g2_type2: 255, scale1: 0, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 114, g2_type1: 107, g2_type2: 107, scale1: 0, scale2: 0, transform1: Some(sub_475), transform2: Some(sub_475) },
    LevelEntry { g1_type: 115, g2_type1: 108, g2_type2: 255, scale1: -2, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 116, g2_type1: 108, g2_type2: 108, scale1: -2, scale2: -2, transform1: None, transform2: None },
    LevelEntry { g1_type: 117, g2_type1: 109, g2_type2: 255, scale1: 9, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 119, g2_type1: 111, g2_type2: 255, scale1: 4, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 120, g2_type1: 111, g2_type2: 111, scale1: 2, scale2: 2, transform1: None, transform2: None },
    LevelEntry { g1_type: 121, g2_type1: 100, g2_type2: 100, scale1: -2, scale2: -2, transform1: Some(sub_1100), transform2: Some(sub_1100) },
    LevelEntry { g1_type: 125, g2_type1: 103, g2_type2: 255, scale1: 2, scale2: 0, transform1: None, transform2: None },
    LevelEntry { g1_type: 128, g2_type1: 104, g2_type2: 104, scale1: 3, scale2: 3, transform1: Some(sub_1100), transform2: Some(sub_1100) },
    LevelEntry { g1_type: 141, g2_type1: 100, g2_type2: 100, scale1: -3, scale2: -2, transform1: None, transform2: Some(sub_1100) },
];

/// GRIB-1 level types carrying one 16-bit value (others carry two 8-bit
/// values), per spec.md §4.5 step 4.
pub const SINGLE_VALUE_TYPES: &[u8] = &[100, 103, 105, 107, 109, 111, 113, 115, 125, 160, 200, 201];

/// Translates a GRIB-1 `(type, value1, value2_or_absent)` level pair into
/// GRIB-2's two-surface representation.
pub fn g1_to_g2(level_type: u8, value1: i32, value2: Option<i32>) -> Result<(Level, Level), EncodeError> {
    let Some(entry) = TABLE.iter().find(|e| e.g1_type == level_type) else {
        // Unmapped types pass through unchanged per spec.md §4.4 when the
        // type otherwise fits a single-surface layout; truly unknown types
        // fail.
        return Err(EncodeError::UnmappedLevel { level_type });
    };

    let v1 = entry.transform1.map_or(value1, |f| f(value1));
    let level1 = Level {
        level_type: entry.g2_type1,
        scale: entry.scale1,
        value: v1,
    };

    let level2 = if entry.g2_type2 == 255 {
        Level::ABSENT
    } else {
        let v2 = value2.unwrap_or(value1);
        let v2 = entry.transform2.map_or(v2, |f| f(v2));
        Level {
            level_type: entry.g2_type2,
            scale: entry.scale2,
            value: v2,
        }
    };

    Ok((level1, level2))
}

/// Inverse of [`g1_to_g2`]: given GRIB-2's two-surface levels, recover the
/// GRIB-1 `(type, value1, value2)` triple. `level2` is expected to already
/// be the partner of `level1` per the same table row (callers build both
/// from the same decoded pair, they are not independently translated).
pub fn g2_to_g1(level1: Level, level2: Level) -> Result<(u8, i32, Option<i32>), EncodeError> {
    let entry = TABLE
        .iter()
        .find(|e| e.g2_type1 == level1.level_type && e.g2_type2 == level2.level_type)
        .or_else(|| {
            TABLE
                .iter()
                .find(|e| e.g2_type1 == level1.level_type && level2.is_absent() && e.g2_type2 == 255)
        })
        .ok_or(EncodeError::UnmappedLevel {
            level_type: level1.level_type,
        })?;

    let v1 = entry.transform1.map_or(level1.value, |f| f(level1.value));
    if level2.is_absent() {
        Ok((entry.g1_type, v1, None))
    } else {
        let v2 = entry.transform2.map_or(level2.value, |f| f(level2.value));
        Ok((entry.g1_type, v1, Some(v2)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isobaric_single_surface_roundtrips() {
        let (l1, l2) = g1_to_g2(100, 500, None).unwrap();
        assert_eq!(l1, Level { level_type: 100, scale: -2, value: 500 });
        assert!(l2.is_absent());
        let (ty, v1, v2) = g2_to_g1(l1, l2).unwrap();
        assert_eq!((ty, v1, v2), (100, 500, None));
    }

    #[test]
    fn level_104_does_not_fall_through_to_105() {
        let (l1, l2) = g1_to_g2(104, 10, Some(20)).unwrap();
        assert_eq!(l1.level_type, 102);
        assert_eq!(l1.scale, -2);
        assert_eq!(l2.level_type, 102);
        assert_eq!(l2.scale, -2);
    }

    #[test]
    fn isentropic_layer_applies_475_transform() {
        let (l1, l2) = g1_to_g2(114, 300, Some(320)).unwrap();
        assert_eq!(l1.value, 475 - 300);
        assert_eq!(l2.value, 475 - 320);
        let (ty, v1, v2) = g2_to_g1(l1, l2).unwrap();
        assert_eq!(ty, 114);
        assert_eq!(v1, 300);
        assert_eq!(v2, Some(320));
    }

    #[test]
    fn unknown_level_type_is_unmapped() {
        assert!(g1_to_g2(250, 0, None).is_err());
    }

    #[test]
    fn type_141_transforms_only_the_second_value() {
        let (l1, l2) = g1_to_g2(141, 300, Some(320)).unwrap();
        assert_eq!(l1.value, 300);
        assert_eq!(l2.value, 1100 - 320);
        let (ty, v1, v2) = g2_to_g1(l1, l2).unwrap();
        assert_eq!(ty, 141);
        assert_eq!(v1, 300);
        assert_eq!(v2, Some(320));
    }
}
