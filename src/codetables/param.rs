//! Parameter-code translation between the GRIB-1 `(centre, table, code)`
//! namespace and the GRIB-2 `(discipline, category, number)` namespace.
//!
//! Grounded on `original_source/src/grib1to2.c`'s `map_GRIB1_parameter_into_
//! GRIB2` switch (and its inverse in `grib2to1.c`), folded into the data
//! table the teacher crate's `codetables.rs`/`codetables/core.rs` favor over
//! nested `switch` statements (per spec.md §9's explicit redesign flag). The
//! table is a flat list of `ParamEntry` rows rather than a three-deep
//! `match`; `g1_to_g2` and `g2_to_g1` both scan it, since the entry count
//! here is small enough that a linear scan is simpler than a hash map and
//! the table is easy to audit by eye.
//!
//! The original switch's unconditional branches (no `center_id`/`table_ver`
//! check at all) are ported here as `centre: None, table: 2` rows — table 2
//! is the WMO standard table those branches apply to in practice, which
//! matches how this table already treated its first batch of entries.
//! Branches guarded by a specific `center_id`/`table_ver` pair become
//! `centre: Some(_)` rows with that table number.

/// One row of the mapping. `centre == None` means "default for any centre
/// not otherwise overridden"; a `Some` row is tried first and takes
/// priority over the default row for the same `(table, code)`.
#[derive(Debug, Clone, Copy)]
struct ParamEntry {
    centre: Option<u16>,
    table: u8,
    code: u8,
    discipline: u8,
    category: u8,
    number: u8,
}

/// NCEP table 2 as the default namespace, with ECMWF (centre 98), NCEP's
/// own local tables (129/130/131/133/140), Météo-France/DWD-style local
/// tables, and UKMet entries layered on top per spec.md §4.3
/// `[SUPPLEMENT]`. Extend this table as more centres/codes are needed;
/// every row is independent so additions never risk shadowing.
const TABLE: &[ParamEntry] = &[
    // --- table 2 defaults (WMO standard, codes 1-126) ---
    ParamEntry { centre: None, table: 2, code: 1, discipline: 0, category: 3, number: 0 }, // PRES
    ParamEntry { centre: Some(98), table: 228, code: 1, discipline: 0, category: 7, number: 7 },
    ParamEntry { centre: None, table: 2, code: 2, discipline: 0, category: 3, number: 1 }, // PRMSL
    ParamEntry { centre: None, table: 2, code: 3, discipline: 0, category: 3, number: 2 }, // PTEND
    ParamEntry { centre: Some(98), table: 228, code: 3, discipline: 10, category: 0, number: 17 },
    ParamEntry { centre: None, table: 2, code: 4, discipline: 0, category: 2, number: 14 },
    ParamEntry { centre: None, table: 2, code: 5, discipline: 0, category: 3, number: 3 },
    ParamEntry { centre: None, table: 2, code: 6, discipline: 0, category: 3, number: 4 },
    ParamEntry { centre: None, table: 2, code: 7, discipline: 0, category: 3, number: 5 }, // HGT
    ParamEntry { centre: Some(78), table: 174, code: 8, discipline: 2, category: 0, number: 34 },
    ParamEntry { centre: None, table: 2, code: 8, discipline: 0, category: 3, number: 6 },
    ParamEntry { centre: None, table: 2, code: 9, discipline: 0, category: 3, number: 7 },
    ParamEntry { centre: Some(98), table: 200, code: 10, discipline: 0, category: 14, number: 2 },
    ParamEntry { centre: None, table: 2, code: 10, discipline: 0, category: 14, number: 0 },
    ParamEntry { centre: None, table: 2, code: 11, discipline: 0, category: 0, number: 0 }, // TMP
    ParamEntry { centre: None, table: 2, code: 12, discipline: 0, category: 0, number: 1 }, // VTMP
    ParamEntry { centre: None, table: 2, code: 13, discipline: 0, category: 0, number: 2 }, // POT
    ParamEntry { centre: None, table: 2, code: 14, discipline: 0, category: 0, number: 3 },
    ParamEntry { centre: None, table: 2, code: 15, discipline: 0, category: 0, number: 4 }, // MAXT
    ParamEntry { centre: None, table: 2, code: 16, discipline: 0, category: 0, number: 5 }, // MINT
    ParamEntry { centre: None, table: 2, code: 17, discipline: 0, category: 0, number: 6 }, // DPT
    ParamEntry { centre: None, table: 2, code: 18, discipline: 0, category: 0, number: 7 },
    ParamEntry { centre: None, table: 2, code: 19, discipline: 0, category: 0, number: 8 },
    ParamEntry { centre: None, table: 2, code: 20, discipline: 0, category: 19, number: 0 },
    ParamEntry { centre: Some(98), table: 128, code: 21, discipline: 0, category: 0, number: 28 },
    ParamEntry { centre: None, table: 2, code: 21, discipline: 0, category: 15, number: 6 },
    ParamEntry { centre: Some(98), table: 128, code: 22, discipline: 0, category: 3, number: 31 },
    ParamEntry { centre: None, table: 2, code: 22, discipline: 0, category: 15, number: 7 },
    ParamEntry { centre: Some(98), table: 128, code: 23, discipline: 0, category: 2, number: 45 },
    ParamEntry { centre: None, table: 2, code: 23, discipline: 0, category: 15, number: 8 },
    ParamEntry { centre: None, table: 2, code: 24, discipline: 0, category: 7, number: 0 },
    ParamEntry { centre: None, table: 2, code: 25, discipline: 0, category: 0, number: 9 },
    ParamEntry { centre: None, table: 2, code: 26, discipline: 0, category: 3, number: 8 },
    ParamEntry { centre: None, table: 2, code: 27, discipline: 0, category: 3, number: 9 },
    ParamEntry { centre: None, table: 2, code: 28, discipline: 10, category: 0, number: 0 },
    ParamEntry { centre: None, table: 2, code: 29, discipline: 10, category: 0, number: 1 },
    ParamEntry { centre: Some(98), table: 203, code: 30, discipline: 0, category: 7, number: 8 },
    ParamEntry { centre: None, table: 2, code: 30, discipline: 10, category: 0, number: 2 },
    ParamEntry { centre: None, table: 2, code: 31, discipline: 0, category: 2, number: 0 }, // WDIR
    ParamEntry { centre: None, table: 2, code: 32, discipline: 0, category: 2, number: 1 }, // WIND
    ParamEntry { centre: Some(98), table: 201, code: 33, discipline: 0, category: 1, number: 82 },
    ParamEntry { centre: Some(98), table: 203, code: 33, discipline: 0, category: 2, number: 46 },
    ParamEntry { centre: None, table: 2, code: 33, discipline: 0, category: 2, number: 2 }, // UGRD
    ParamEntry { centre: None, table: 2, code: 34, discipline: 0, category: 2, number: 3 }, // VGRD
    ParamEntry { centre: None, table: 2, code: 35, discipline: 0, category: 2, number: 4 },
    ParamEntry { centre: None, table: 2, code: 36, discipline: 0, category: 2, number: 5 },
    ParamEntry { centre: None, table: 2, code: 37, discipline: 0, category: 2, number: 6 },
    ParamEntry { centre: None, table: 2, code: 38, discipline: 0, category: 2, number: 7 },
    ParamEntry { centre: None, table: 2, code: 39, discipline: 0, category: 2, number: 8 }, // VVEL
    ParamEntry { centre: None, table: 2, code: 40, discipline: 0, category: 2, number: 9 },
    ParamEntry { centre: Some(98), table: 201, code: 41, discipline: 0, category: 1, number: 78 },
    ParamEntry { centre: None, table: 2, code: 41, discipline: 0, category: 2, number: 10 }, // ABSV
    ParamEntry { centre: None, table: 2, code: 42, discipline: 0, category: 2, number: 11 },
    ParamEntry { centre: None, table: 2, code: 43, discipline: 0, category: 2, number: 12 },
    ParamEntry { centre: None, table: 2, code: 44, discipline: 0, category: 2, number: 13 },
    ParamEntry { centre: None, table: 2, code: 45, discipline: 0, category: 2, number: 15 },
    ParamEntry { centre: Some(98), table: 202, code: 46, discipline: 0, category: 3, number: 20 },
    ParamEntry { centre: None, table: 2, code: 46, discipline: 0, category: 2, number: 16 },
    ParamEntry { centre: Some(98), table: 202, code: 47, discipline: 0, category: 3, number: 24 },
    ParamEntry { centre: None, table: 2, code: 47, discipline: 10, category: 1, number: 0 },
    ParamEntry { centre: Some(98), table: 202, code: 48, discipline: 0, category: 3, number: 21 },
    ParamEntry { centre: None, table: 2, code: 48, discipline: 10, category: 1, number: 1 },
    ParamEntry { centre: Some(98), table: 202, code: 49, discipline: 0, category: 3, number: 22 },
    ParamEntry { centre: None, table: 2, code: 49, discipline: 10, category: 1, number: 2 },
    ParamEntry { centre: None, table: 2, code: 50, discipline: 10, category: 1, number: 3 },
    ParamEntry { centre: None, table: 2, code: 51, discipline: 0, category: 1, number: 0 }, // SPFH
    ParamEntry { centre: None, table: 2, code: 52, discipline: 0, category: 1, number: 1 }, // RH
    ParamEntry { centre: None, table: 2, code: 53, discipline: 0, category: 1, number: 2 },
    ParamEntry { centre: Some(98), table: 2, code: 54, discipline: 0, category: 1, number: 64 },
    ParamEntry { centre: None, table: 2, code: 54, discipline: 0, category: 1, number: 3 }, // PWAT
    ParamEntry { centre: None, table: 2, code: 55, discipline: 0, category: 1, number: 4 },
    ParamEntry { centre: None, table: 2, code: 56, discipline: 0, category: 1, number: 5 },
    ParamEntry { centre: None, table: 2, code: 57, discipline: 0, category: 1, number: 6 },
    ParamEntry { centre: Some(98), table: 2, code: 58, discipline: 0, category: 1, number: 70 },
    ParamEntry { centre: None, table: 2, code: 58, discipline: 0, category: 6, number: 0 },
    ParamEntry { centre: Some(98), table: 128, code: 59, discipline: 0, category: 7, number: 6 },
    ParamEntry { centre: None, table: 2, code: 59, discipline: 0, category: 1, number: 7 },
    ParamEntry { centre: None, table: 2, code: 60, discipline: 0, category: 19, number: 2 },
    ParamEntry { centre: Some(98), table: 202, code: 61, discipline: 2, category: 0, number: 28 },
    ParamEntry { centre: None, table: 2, code: 61, discipline: 0, category: 1, number: 8 }, // APCP
    ParamEntry { centre: Some(98), table: 202, code: 62, discipline: 2, category: 0, number: 32 },
    ParamEntry { centre: None, table: 2, code: 62, discipline: 0, category: 1, number: 9 }, // NCPCP
    ParamEntry { centre: None, table: 2, code: 63, discipline: 0, category: 1, number: 10 },
    ParamEntry { centre: None, table: 2, code: 64, discipline: 0, category: 1, number: 12 },
    ParamEntry { centre: None, table: 2, code: 65, discipline: 0, category: 1, number: 13 }, // WEASD
    ParamEntry { centre: None, table: 2, code: 66, discipline: 0, category: 1, number: 11 }, // SNOD
    ParamEntry { centre: None, table: 2, code: 67, discipline: 0, category: 19, number: 3 },
    ParamEntry { centre: Some(98), table: 201, code: 68, discipline: 0, category: 6, number: 26 },
    ParamEntry { centre: None, table: 2, code: 68, discipline: 10, category: 4, number: 2 },
    ParamEntry { centre: Some(98), table: 201, code: 69, discipline: 0, category: 6, number: 27 },
    ParamEntry { centre: None, table: 2, code: 69, discipline: 10, category: 4, number: 0 },
    ParamEntry { centre: None, table: 2, code: 70, discipline: 10, category: 4, number: 1 },
    ParamEntry { centre: None, table: 2, code: 71, discipline: 0, category: 6, number: 1 }, // TCDC
    ParamEntry { centre: None, table: 2, code: 72, discipline: 0, category: 6, number: 2 },
    ParamEntry { centre: None, table: 2, code: 73, discipline: 0, category: 6, number: 3 },
    ParamEntry { centre: None, table: 2, code: 74, discipline: 0, category: 6, number: 4 },
    ParamEntry { centre: Some(98), table: 128, code: 75, discipline: 0, category: 1, number: 85 },
    ParamEntry { centre: Some(98), table: 202, code: 75, discipline: 2, category: 0, number: 29 },
    ParamEntry { centre: None, table: 2, code: 75, discipline: 0, category: 6, number: 5 },
    ParamEntry { centre: Some(98), table: 2, code: 76, discipline: 0, category: 1, number: 69 },
    ParamEntry { centre: Some(98), table: 128, code: 76, discipline: 0, category: 1, number: 86 },
    ParamEntry { centre: Some(98), table: 202, code: 76, discipline: 2, category: 0, number: 30 },
    ParamEntry { centre: None, table: 2, code: 76, discipline: 0, category: 6, number: 6 },
    ParamEntry { centre: Some(98), table: 128, code: 77, discipline: 0, category: 2, number: 32 },
    ParamEntry { centre: None, table: 2, code: 77, discipline: 0, category: 7, number: 1 },
    ParamEntry { centre: Some(98), table: 202, code: 78, discipline: 2, category: 0, number: 31 },
    ParamEntry { centre: None, table: 2, code: 78, discipline: 0, category: 1, number: 14 },
    ParamEntry { centre: None, table: 2, code: 79, discipline: 0, category: 1, number: 15 },
    ParamEntry { centre: None, table: 2, code: 80, discipline: 10, category: 3, number: 0 },
    ParamEntry { centre: None, table: 2, code: 81, discipline: 1, category: 2, number: 8 }, // LAND
    ParamEntry { centre: None, table: 2, code: 82, discipline: 10, category: 3, number: 1 },
    ParamEntry { centre: None, table: 2, code: 83, discipline: 2, category: 0, number: 1 },
    ParamEntry { centre: None, table: 2, code: 84, discipline: 0, category: 19, number: 1 }, // ALBDO
    ParamEntry { centre: None, table: 2, code: 85, discipline: 2, category: 0, number: 2 },
    ParamEntry { centre: None, table: 2, code: 86, discipline: 2, category: 0, number: 3 },
    ParamEntry { centre: None, table: 2, code: 87, discipline: 2, category: 0, number: 4 },
    ParamEntry { centre: None, table: 2, code: 88, discipline: 10, category: 4, number: 3 },
    ParamEntry { centre: None, table: 2, code: 89, discipline: 0, category: 3, number: 10 },
    ParamEntry { centre: None, table: 2, code: 90, discipline: 2, category: 0, number: 5 },
    ParamEntry { centre: None, table: 2, code: 91, discipline: 10, category: 2, number: 0 }, // ICEC
    ParamEntry { centre: None, table: 2, code: 92, discipline: 10, category: 2, number: 1 },
    ParamEntry { centre: None, table: 2, code: 93, discipline: 10, category: 2, number: 2 },
    ParamEntry { centre: None, table: 2, code: 94, discipline: 10, category: 2, number: 3 },
    ParamEntry { centre: None, table: 2, code: 95, discipline: 10, category: 2, number: 4 },
    ParamEntry { centre: None, table: 2, code: 96, discipline: 10, category: 2, number: 5 },
    ParamEntry { centre: None, table: 2, code: 97, discipline: 10, category: 2, number: 6 },
    ParamEntry { centre: None, table: 2, code: 98, discipline: 10, category: 2, number: 7 },
    ParamEntry { centre: Some(98), table: 203, code: 99, discipline: 0, category: 19, number: 25 },
    ParamEntry { centre: None, table: 2, code: 99, discipline: 0, category: 1, number: 16 },
    ParamEntry { centre: Some(98), table: 201, code: 100, discipline: 0, category: 1, number: 77 },
    ParamEntry { centre: None, table: 2, code: 100, discipline: 10, category: 0, number: 3 }, // HTSGW
    ParamEntry { centre: None, table: 2, code: 101, discipline: 10, category: 0, number: 4 },
    ParamEntry { centre: None, table: 2, code: 102, discipline: 10, category: 0, number: 5 },
    ParamEntry { centre: None, table: 2, code: 103, discipline: 10, category: 0, number: 6 },
    ParamEntry { centre: None, table: 2, code: 104, discipline: 10, category: 0, number: 7 },
    ParamEntry { centre: None, table: 2, code: 105, discipline: 10, category: 0, number: 8 },
    ParamEntry { centre: None, table: 2, code: 106, discipline: 10, category: 0, number: 9 },
    ParamEntry { centre: None, table: 2, code: 107, discipline: 10, category: 0, number: 10 },
    ParamEntry { centre: None, table: 2, code: 108, discipline: 10, category: 0, number: 11 },
    ParamEntry { centre: Some(98), table: 162, code: 109, discipline: 0, category: 0, number: 20 },
    ParamEntry { centre: Some(98), table: 228, code: 109, discipline: 0, category: 6, number: 13 },
    ParamEntry { centre: None, table: 2, code: 109, discipline: 10, category: 0, number: 12 },
    ParamEntry { centre: None, table: 2, code: 110, discipline: 10, category: 0, number: 13 },
    ParamEntry { centre: Some(98), table: 201, code: 111, discipline: 0, category: 1, number: 76 },
    ParamEntry { centre: None, table: 2, code: 111, discipline: 0, category: 4, number: 0 },
    ParamEntry { centre: Some(98), table: 201, code: 112, discipline: 0, category: 1, number: 55 },
    ParamEntry { centre: None, table: 2, code: 112, discipline: 0, category: 5, number: 0 },
    ParamEntry { centre: None, table: 2, code: 113, discipline: 0, category: 4, number: 1 },
    ParamEntry { centre: None, table: 2, code: 114, discipline: 0, category: 5, number: 1 },
    ParamEntry { centre: None, table: 2, code: 115, discipline: 0, category: 5, number: 2 },
    ParamEntry { centre: None, table: 2, code: 116, discipline: 0, category: 4, number: 2 },
    ParamEntry { centre: None, table: 2, code: 117, discipline: 0, category: 4, number: 3 },
    ParamEntry { centre: None, table: 2, code: 118, discipline: 0, category: 4, number: 4 },
    ParamEntry { centre: None, table: 2, code: 119, discipline: 0, category: 4, number: 5 },
    ParamEntry { centre: None, table: 2, code: 120, discipline: 0, category: 4, number: 6 },
    ParamEntry { centre: Some(98), table: 228, code: 121, discipline: 0, category: 7, number: 2 },
    ParamEntry { centre: None, table: 2, code: 121, discipline: 0, category: 0, number: 10 },
    ParamEntry { centre: None, table: 2, code: 122, discipline: 0, category: 0, number: 11 },
    ParamEntry { centre: Some(98), table: 228, code: 123, discipline: 0, category: 7, number: 4 },
    ParamEntry { centre: None, table: 2, code: 123, discipline: 0, category: 2, number: 20 },
    ParamEntry { centre: None, table: 2, code: 124, discipline: 0, category: 2, number: 17 },
    ParamEntry { centre: None, table: 2, code: 125, discipline: 0, category: 2, number: 18 },
    ParamEntry { centre: None, table: 2, code: 126, discipline: 0, category: 2, number: 19 },

    // --- NCEP local tables (129/130/131/133/140) and ECMWF local overrides,
    // codes 131-219, none of which fall back to a table-2 default in the
    // original switch ---
    ParamEntry { centre: Some(7), table: 2, code: 131, discipline: 0, category: 1, number: 70 },
    ParamEntry { centre: Some(7), table: 129, code: 131, discipline: 0, category: 1, number: 43 },
    ParamEntry { centre: Some(7), table: 2, code: 132, discipline: 0, category: 7, number: 11 },
    ParamEntry { centre: Some(7), table: 129, code: 132, discipline: 0, category: 6, number: 21 },
    ParamEntry { centre: Some(7), table: 2, code: 133, discipline: 0, category: 7, number: 2 },
    ParamEntry { centre: Some(7), table: 129, code: 133, discipline: 0, category: 1, number: 44 },
    ParamEntry { centre: Some(98), table: 201, code: 133, discipline: 0, category: 1, number: 61 },
    ParamEntry { centre: Some(7), table: 2, code: 134, discipline: 0, category: 7, number: 5 },
    ParamEntry { centre: Some(7), table: 129, code: 134, discipline: 0, category: 6, number: 16 },
    ParamEntry { centre: Some(7), table: 2, code: 135, discipline: 0, category: 1, number: 38 },
    ParamEntry { centre: Some(7), table: 129, code: 135, discipline: 0, category: 1, number: 21 },
    ParamEntry { centre: Some(7), table: 2, code: 136, discipline: 0, category: 2, number: 25 },
    ParamEntry { centre: Some(7), table: 129, code: 136, discipline: 0, category: 1, number: 69 },
    ParamEntry { centre: Some(7), table: 129, code: 137, discipline: 0, category: 1, number: 70 },
    ParamEntry { centre: Some(7), table: 131, code: 137, discipline: 0, category: 17, number: 0 },
    ParamEntry { centre: Some(7), table: 129, code: 138, discipline: 0, category: 1, number: 45 },
    ParamEntry { centre: Some(7), table: 129, code: 139, discipline: 0, category: 1, number: 46 },
    ParamEntry { centre: Some(7), table: 2, code: 140, discipline: 0, category: 1, number: 33 },
    ParamEntry { centre: Some(7), table: 129, code: 140, discipline: 0, category: 6, number: 20 },
    ParamEntry { centre: Some(98), table: 203, code: 140, discipline: 0, category: 7, number: 3 },
    ParamEntry { centre: Some(7), table: 2, code: 141, discipline: 0, category: 1, number: 34 },
    ParamEntry { centre: Some(7), table: 2, code: 142, discipline: 0, category: 1, number: 35 },
    ParamEntry { centre: Some(7), table: 2, code: 143, discipline: 0, category: 1, number: 36 },
    ParamEntry { centre: Some(7), table: 2, code: 144, discipline: 2, category: 0, number: 9 }, // SOILW
    ParamEntry { centre: Some(7), table: 128, code: 144, discipline: 10, category: 3, number: 2 },
    ParamEntry { centre: Some(7), table: 131, code: 145, discipline: 0, category: 1, number: 41 },
    ParamEntry { centre: Some(7), table: 2, code: 146, discipline: 0, category: 6, number: 15 },
    ParamEntry { centre: Some(98), table: 200, code: 146, discipline: 0, category: 6, number: 15 },
    ParamEntry { centre: Some(7), table: 2, code: 147, discipline: 0, category: 3, number: 16 },
    ParamEntry { centre: Some(98), table: 201, code: 147, discipline: 0, category: 19, number: 24 },
    ParamEntry { centre: Some(98), table: 254, code: 147, discipline: 0, category: 2, number: 27 },
    ParamEntry { centre: Some(7), table: 2, code: 148, discipline: 0, category: 3, number: 17 },
    ParamEntry { centre: Some(98), table: 254, code: 148, discipline: 0, category: 2, number: 28 },
    ParamEntry { centre: Some(98), table: 201, code: 152, discipline: 0, category: 19, number: 11 },
    ParamEntry { centre: Some(7), table: 2, code: 153, discipline: 0, category: 1, number: 22 }, // CWAT
    ParamEntry { centre: Some(98), table: 201, code: 153, discipline: 0, category: 2, number: 31 },
    ParamEntry { centre: Some(7), table: 2, code: 154, discipline: 0, category: 14, number: 1 },
    ParamEntry { centre: Some(7), table: 2, code: 155, discipline: 2, category: 0, number: 10 }, // GFLUX
    ParamEntry { centre: Some(98), table: 200, code: 155, discipline: 2, category: 0, number: 10 },
    ParamEntry { centre: Some(7), table: 2, code: 156, discipline: 0, category: 7, number: 7 },
    ParamEntry { centre: Some(7), table: 2, code: 157, discipline: 0, category: 7, number: 6 }, // CAPE
    ParamEntry { centre: Some(7), table: 2, code: 158, discipline: 0, category: 19, number: 11 },
    ParamEntry { centre: Some(7), table: 130, code: 159, discipline: 0, category: 19, number: 17 },
    ParamEntry { centre: Some(7), table: 2, code: 160, discipline: 0, category: 4, number: 53 },
    ParamEntry { centre: Some(7), table: 130, code: 160, discipline: 2, category: 3, number: 5 },
    ParamEntry { centre: Some(7), table: 2, code: 163, discipline: 0, category: 5, number: 8 },
    ParamEntry { centre: Some(7), table: 2, code: 170, discipline: 0, category: 1, number: 24 },
    ParamEntry { centre: Some(7), table: 130, code: 170, discipline: 0, category: 19, number: 18 },
    ParamEntry { centre: Some(7), table: 2, code: 171, discipline: 0, category: 1, number: 25 },
    ParamEntry { centre: Some(7), table: 130, code: 171, discipline: 2, category: 3, number: 6 },
    ParamEntry { centre: Some(98), table: 201, code: 171, discipline: 0, category: 0, number: 19 },
    ParamEntry { centre: Some(98), table: 228, code: 171, discipline: 2, category: 0, number: 26 },
    ParamEntry { centre: Some(7), table: 2, code: 172, discipline: 0, category: 2, number: 26 },
    ParamEntry { centre: Some(7), table: 140, code: 174, discipline: 0, category: 6, number: 25 },
    ParamEntry { centre: Some(7), table: 2, code: 178, discipline: 0, category: 1, number: 23 },
    ParamEntry { centre: Some(7), table: 130, code: 180, discipline: 0, category: 1, number: 17 },
    ParamEntry { centre: Some(98), table: 128, code: 180, discipline: 0, category: 2, number: 38 },
    ParamEntry { centre: Some(98), table: 202, code: 180, discipline: 0, category: 14, number: 1 },
    ParamEntry { centre: Some(7), table: 130, code: 181, discipline: 2, category: 0, number: 15 },
    ParamEntry { centre: Some(98), table: 128, code: 181, discipline: 0, category: 2, number: 37 },
    ParamEntry { centre: Some(7), table: 130, code: 182, discipline: 2, category: 0, number: 28 },
    ParamEntry { centre: Some(7), table: 130, code: 184, discipline: 0, category: 19, number: 19 },
    ParamEntry { centre: Some(7), table: 2, code: 189, discipline: 0, category: 0, number: 15 },
    ParamEntry { centre: Some(7), table: 2, code: 190, discipline: 0, category: 7, number: 8 },
    ParamEntry { centre: Some(7), table: 133, code: 191, discipline: 0, category: 6, number: 33 },
    ParamEntry { centre: Some(7), table: 133, code: 192, discipline: 10, category: 191, number: 1 },
    ParamEntry { centre: Some(7), table: 131, code: 193, discipline: 0, category: 0, number: 21 },
    ParamEntry { centre: Some(7), table: 2, code: 194, discipline: 0, category: 1, number: 39 },
    ParamEntry { centre: Some(7), table: 128, code: 195, discipline: 10, category: 4, number: 4 },
    ParamEntry { centre: Some(7), table: 2, code: 196, discipline: 0, category: 2, number: 27 },
    ParamEntry { centre: Some(7), table: 128, code: 196, discipline: 10, category: 4, number: 5 },
    ParamEntry { centre: Some(7), table: 130, code: 196, discipline: 2, category: 0, number: 7 },
    ParamEntry { centre: Some(7), table: 2, code: 197, discipline: 0, category: 2, number: 28 },
    ParamEntry { centre: Some(7), table: 128, code: 197, discipline: 10, category: 4, number: 6 },
    ParamEntry { centre: Some(98), table: 201, code: 200, discipline: 2, category: 0, number: 13 },
    ParamEntry { centre: Some(98), table: 133, code: 202, discipline: 0, category: 3, number: 27 },
    ParamEntry { centre: Some(98), table: 200, code: 202, discipline: 2, category: 0, number: 6 },
    ParamEntry { centre: Some(7), table: 130, code: 203, discipline: 2, category: 0, number: 16 },
    ParamEntry { centre: Some(98), table: 201, code: 203, discipline: 0, category: 0, number: 18 },
    ParamEntry { centre: Some(7), table: 2, code: 204, discipline: 0, category: 4, number: 7 },
    ParamEntry { centre: Some(98), table: 200, code: 204, discipline: 0, category: 4, number: 7 },
    ParamEntry { centre: Some(7), table: 2, code: 205, discipline: 0, category: 5, number: 3 },
    ParamEntry { centre: Some(98), table: 200, code: 205, discipline: 0, category: 5, number: 3 },
    ParamEntry { centre: Some(7), table: 130, code: 206, discipline: 0, category: 15, number: 3 },
    ParamEntry { centre: Some(7), table: 2, code: 207, discipline: 2, category: 0, number: 11 },
    ParamEntry { centre: Some(7), table: 2, code: 208, discipline: 2, category: 0, number: 12 },
    ParamEntry { centre: Some(7), table: 133, code: 209, discipline: 0, category: 3, number: 28 },
    ParamEntry { centre: Some(7), table: 2, code: 211, discipline: 0, category: 4, number: 8 },
    ParamEntry { centre: Some(98), table: 200, code: 211, discipline: 0, category: 4, number: 8 },
    ParamEntry { centre: Some(7), table: 2, code: 212, discipline: 0, category: 5, number: 4 },
    ParamEntry { centre: Some(98), table: 200, code: 212, discipline: 0, category: 5, number: 4 },
    ParamEntry { centre: Some(98), table: 201, code: 212, discipline: 2, category: 0, number: 16 },
    ParamEntry { centre: Some(7), table: 2, code: 214, discipline: 0, category: 1, number: 37 },
    ParamEntry { centre: Some(7), table: 129, code: 218, discipline: 0, category: 1, number: 27 },
    ParamEntry { centre: Some(7), table: 129, code: 219, discipline: 0, category: 6, number: 13 },
    ParamEntry { centre: Some(7), table: 130, code: 219, discipline: 2, category: 0, number: 17 },
    ParamEntry { centre: Some(98), table: 200, code: 219, discipline: 0, category: 2, number: 21 },
];

/// Looks up the GRIB-2 triple for a GRIB-1 `(centre, table, code)`. Missing
/// mapping returns `(255, 255, 255)` ("unknown") per spec.md §4.3 — callers
/// decide whether that warrants a warning.
pub fn g1_to_g2(centre: u16, table: u8, code: u8) -> (u8, u8, u8) {
    if let Some(entry) = TABLE
        .iter()
        .find(|e| e.centre == Some(centre) && e.table == table && e.code == code)
    {
        return (entry.discipline, entry.category, entry.number);
    }
    if let Some(entry) = TABLE
        .iter()
        .find(|e| e.centre.is_none() && e.table == table && e.code == code)
    {
        return (entry.discipline, entry.category, entry.number);
    }
    (255, 255, 255)
}

/// Looks up the GRIB-1 `(table_version, code)` for a GRIB-2
/// `(centre, discipline, category, number)`. Missing mapping returns
/// `(3, 255)` per spec.md §4.3, and the caller (`crate::driver`) raises
/// `Warning::UnmappedParameter` on that fallback.
pub fn g2_to_g1(centre: u16, discipline: u8, category: u8, number: u8) -> (u8, u8) {
    if let Some(entry) = TABLE.iter().find(|e| {
        e.centre == Some(centre)
            && e.discipline == discipline
            && e.category == category
            && e.number == number
    }) {
        return (entry.table, entry.code);
    }
    if let Some(entry) = TABLE
        .iter()
        .find(|e| e.centre.is_none() && e.discipline == discipline && e.category == category && e.number == number)
    {
        return (entry.table, entry.code);
    }
    (3, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lookup_roundtrips() {
        let (d, c, n) = g1_to_g2(7, 2, 11);
        assert_eq!((d, c, n), (0, 0, 0));
        assert_eq!(g2_to_g1(7, d, c, n), (2, 11));
    }

    #[test]
    fn ecmwf_override_takes_priority_over_default() {
        assert_eq!(g1_to_g2(98, 201, 100), (0, 1, 77));
        assert_eq!(g1_to_g2(7, 2, 100), (10, 0, 3));
    }

    #[test]
    fn reverse_override_resolves_to_override_table_not_default() {
        assert_eq!(g2_to_g1(98, 0, 1, 77), (201, 100));
        assert_eq!(g2_to_g1(7, 10, 0, 3), (2, 100));
    }

    #[test]
    fn ncep_local_table_entry_with_no_default_resolves_only_for_its_centre() {
        assert_eq!(g1_to_g2(7, 133, 192), (10, 191, 1));
        assert_eq!(g1_to_g2(9, 133, 192), (255, 255, 255));
    }

    #[test]
    fn unknown_mapping_falls_back() {
        assert_eq!(g1_to_g2(7, 2, 250), (255, 255, 255));
        assert_eq!(g2_to_g1(7, 255, 255, 255), (3, 255));
    }
}
