//! The unified, edition-agnostic in-memory message produced by either
//! decoder and consumed by either encoder.
//!
//! Mirrors the teacher's `context.rs` section records (`Identification`,
//! `GridDefinition`, `ProdDefinition`, …) but collapsed into one flat record
//! per edition-agnostic message rather than kept as raw section bytes,
//! since both editions must be able to read and write every field.

/// Sentinel for a masked/missing gridpoint. Exactly representable in `f64`,
/// so comparisons use exact equality rather than an epsilon.
pub const MISSING: f64 = 1e30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub significance: u8,
    pub production_status: u8,
    pub data_type: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub centre: u16,
    pub sub_centre: u16,
    pub table_version: u8,
    pub local_table_version: u8,
    pub generating_process: u8,
}

/// Grid geometry, tagged by projection. Every variant carries the point
/// counts and scanning mode; only the fields meaningful to that projection
/// are present, unlike the teacher's per-projection structs which this
/// collapses into one enum so both decoders can build it without a generic
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridGeometry {
    LatLon(LatLonGrid),
    GaussianLatLon(LatLonGrid),
    Rotated(RotatedGrid),
    Mercator(MercatorGrid),
    PolarStereographic(PolarStereographicGrid),
    LambertConformal(LambertConformalGrid),
}

impl GridGeometry {
    pub fn nx(&self) -> u32 {
        match self {
            Self::LatLon(g) | Self::GaussianLatLon(g) => g.nx,
            Self::Rotated(g) => g.base.nx,
            Self::Mercator(g) => g.nx,
            Self::PolarStereographic(g) => g.nx,
            Self::LambertConformal(g) => g.nx,
        }
    }

    pub fn ny(&self) -> u32 {
        match self {
            Self::LatLon(g) | Self::GaussianLatLon(g) => g.ny,
            Self::Rotated(g) => g.base.ny,
            Self::Mercator(g) => g.ny,
            Self::PolarStereographic(g) => g.ny,
            Self::LambertConformal(g) => g.ny,
        }
    }

    pub fn num_points(&self) -> usize {
        self.nx() as usize * self.ny() as usize
    }

    pub fn scanning_mode(&self) -> u8 {
        match self {
            Self::LatLon(g) | Self::GaussianLatLon(g) => g.scanning_mode,
            Self::Rotated(g) => g.base.scanning_mode,
            Self::Mercator(g) => g.scanning_mode,
            Self::PolarStereographic(g) => g.scanning_mode,
            Self::LambertConformal(g) => g.scanning_mode,
        }
    }
}

/// Shared by LatLon and GaussianLatLon: start/end corners in microdegrees,
/// signed, plus the increments (Gaussian grids carry `n` instead of `j_inc`
/// but that is not represented here since spec.md's Non-goals exclude
/// quasi-regular/reduced Gaussian grids).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonGrid {
    pub nx: u32,
    pub ny: u32,
    pub first_lat_udeg: i32,
    pub first_lon_udeg: i32,
    pub last_lat_udeg: i32,
    pub last_lon_udeg: i32,
    pub i_inc_udeg: u32,
    pub j_inc_udeg: u32,
    pub resolution_flags: u8,
    pub scanning_mode: u8,
    pub earth_shape: EarthShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedGrid {
    pub base: LatLonGrid,
    pub south_pole_lat_udeg: i32,
    pub south_pole_lon_udeg: i32,
    pub angle_of_rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorGrid {
    pub nx: u32,
    pub ny: u32,
    pub first_lat_udeg: i32,
    pub first_lon_udeg: i32,
    pub last_lat_udeg: i32,
    pub last_lon_udeg: i32,
    pub latin: i32,
    pub i_inc: u32,
    pub j_inc: u32,
    pub resolution_flags: u8,
    pub scanning_mode: u8,
    pub earth_shape: EarthShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarStereographicGrid {
    pub nx: u32,
    pub ny: u32,
    pub first_lat_udeg: i32,
    pub first_lon_udeg: i32,
    pub orientation_lon_udeg: i32,
    pub i_inc: u32,
    pub j_inc: u32,
    pub projection_flag: u8,
    pub resolution_flags: u8,
    pub scanning_mode: u8,
    pub earth_shape: EarthShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformalGrid {
    pub nx: u32,
    pub ny: u32,
    pub first_lat_udeg: i32,
    pub first_lon_udeg: i32,
    pub orientation_lon_udeg: i32,
    pub i_inc: u32,
    pub j_inc: u32,
    pub projection_flag: u8,
    pub resolution_flags: u8,
    pub scanning_mode: u8,
    pub latin1_udeg: i32,
    pub latin2_udeg: i32,
    pub south_pole_lat_udeg: i32,
    pub south_pole_lon_udeg: i32,
    pub earth_shape: EarthShape,
}

/// Code Table 3.2 shape-of-the-earth, carried through untouched between
/// editions (GRIB-1 has no equivalent field, so decoder1 always fills
/// `Spherical6367470` and encoder1 ignores the field entirely).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarthShape {
    #[default]
    Spherical6367470,
    Other(u8),
}

/// A single level surface: `(type, scale, value)`. `type == 255` means "no
/// second surface" per invariant 4 of the unified message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub level_type: u8,
    pub scale: i16,
    pub value: i32,
}

impl Level {
    pub const ABSENT: Level = Level {
        level_type: 255,
        scale: 0,
        value: 0,
    };

    pub fn is_absent(&self) -> bool {
        self.level_type == 255
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticalProcess {
    pub end_year: i32,
    pub end_month: u32,
    pub end_day: u32,
    pub end_hour: u32,
    pub end_minute: u32,
    pub end_second: u32,
    pub process_code: u8,
    pub time_increment_type: u8,
    pub time_unit: u8,
    pub length: u32,
    pub increment_unit: u8,
    pub increment_length: u32,
    pub num_ranges: u16,
    pub num_missing: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ensemble {
    pub ensemble_type: u8,
    pub perturbation_number: u8,
    pub ensemble_size: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedForecast {
    pub derived_code: u8,
    pub ensemble_size: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialProcessing {
    pub stat_proc: u8,
    pub spatial_proc_type: u8,
    pub num_points: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnsembleBlock {
    #[default]
    None,
    Ensemble(Ensemble),
    Derived(DerivedForecast),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub discipline: u8,
    pub parameter_category: u8,
    pub parameter_number: u8,
    pub forecast_time_unit: u8,
    pub forecast_time_offset: i32,
    pub level1: Level,
    pub level2: Level,
    pub statistical_process: Option<StatisticalProcess>,
    pub ensemble: EnsembleBlock,
    pub spatial_processing: Option<SpatialProcessing>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub reference_value: f64,
    pub binary_scale: i16,
    pub decimal_scale: i16,
    pub pack_width: u8,
}

/// The complete edition-agnostic message. `gridpoints.len() == geometry.num_points()`
/// and, if `bitmap` is `Some`, `bitmap.len()` matches too (invariant 1/2 of
/// the unified message).
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub reference_time: ReferenceTime,
    pub source: Source,
    pub geometry: GridGeometry,
    pub product: Product,
    pub packing: Packing,
    pub bitmap: Option<Vec<bool>>,
    pub gridpoints: Vec<f64>,
    /// Opaque GRIB-1 PDS-extension bytes (octets 41+), preserved verbatim
    /// by decoder1 and re-emitted verbatim by encoder1 when round-tripping
    /// within the same edition; ignored by encoder2.
    pub pds_extension: Vec<u8>,
}

impl Message {
    pub fn num_points(&self) -> usize {
        self.geometry.num_points()
    }
}
