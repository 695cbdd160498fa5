/// The `GdsParameter` enumeration is used to represent which slots of the
/// legacy integer encoded grid description are read by a given grid type,
/// and how they are to be decoded.
///
/// The individual grid type implementations use these to define their
/// *gamut*, i.e. their slot layout. Slots are numbered from 1, as in the
/// legacy documentation (so slot 1 is the grid type tag).
///
/// All slots named in a gamut are required: a grid description too short
/// to hold them is invalid.
#[derive(Debug)]
pub enum GdsParameter {
    /// A point count, strictly positive
    Count { key: &'static str, slot: usize },
    /// A non-negative integer
    Natural { key: &'static str, slot: usize },
    /// A latitude in millidegrees, restricted to [-90°, 90°]
    Latitude { key: &'static str, slot: usize },
    /// A longitude in millidegrees, restricted to [-360°, 360°],
    /// and normalized to [0°, 360°)
    Longitude { key: &'static str, slot: usize },
    /// An angular increment in millidegrees, sign significant
    Increment { key: &'static str, slot: usize },
    /// A distance in metres, strictly positive
    Distance { key: &'static str, slot: usize },
    /// A bit field, where only the bits of `mask` may be set
    Flags {
        key: &'static str,
        slot: usize,
        mask: i32,
    },
}

impl GdsParameter {
    pub fn key(&self) -> &'static str {
        match self {
            GdsParameter::Count { key, .. }
            | GdsParameter::Natural { key, .. }
            | GdsParameter::Latitude { key, .. }
            | GdsParameter::Longitude { key, .. }
            | GdsParameter::Increment { key, .. }
            | GdsParameter::Distance { key, .. }
            | GdsParameter::Flags { key, .. } => key,
        }
    }

    pub fn slot(&self) -> usize {
        match self {
            GdsParameter::Count { slot, .. }
            | GdsParameter::Natural { slot, .. }
            | GdsParameter::Latitude { slot, .. }
            | GdsParameter::Longitude { slot, .. }
            | GdsParameter::Increment { slot, .. }
            | GdsParameter::Distance { slot, .. }
            | GdsParameter::Flags { slot, .. } => *slot,
        }
    }
}

// Bits of the resolution and component flags (slot 6)
/// Direction increments given
pub const RESOLUTION_INCREMENTS_GIVEN: i32 = 128;
/// Earth assumed oblate spheroid
pub const RESOLUTION_OBLATE_EARTH: i32 = 64;
/// Vector components resolved relative to the grid axes
pub const RESOLUTION_GRID_RELATIVE: i32 = 8;
/// All bits defined for the resolution and component flags
pub const RESOLUTION_MASK: i32 =
    RESOLUTION_INCREMENTS_GIVEN | RESOLUTION_OBLATE_EARTH | RESOLUTION_GRID_RELATIVE;

// Bits of the scanning mode flags (slot 11)
/// Points scan in the -i direction
pub const SCAN_NEGATIVE_I: i32 = 128;
/// Points scan in the +j direction
pub const SCAN_POSITIVE_J: i32 = 64;
/// Adjacent points in the j direction are consecutive
pub const SCAN_J_CONSECUTIVE: i32 = 32;
/// Staggered grids: the grid holds the wind (V) points, rather than the mass (H) points
pub const SCAN_WIND_POINTS: i32 = 256;
/// All bits defined for the scanning mode of unstaggered grids
pub const SCAN_MASK: i32 = SCAN_NEGATIVE_I | SCAN_POSITIVE_J | SCAN_J_CONSECUTIVE;
/// All bits defined for the scanning mode of staggered grids
pub const STAGGERED_SCAN_MASK: i32 = SCAN_MASK | SCAN_WIND_POINTS;

// Bits of the projection centre flag (slot 10 of the conformal plane projections)
/// The south pole is on the projection plane
pub const CENTRE_SOUTH_POLE: i32 = 128;
/// All bits defined for the projection centre flag
pub const CENTRE_MASK: i32 = CENTRE_SOUTH_POLE;
