//! Miscellaneous math functions for general use

/// Free functions used in more than one module of the crate.
pub mod ancillary;
pub use ancillary::{gudermannian, quadrangle_area};

/// Free functions for handling and converting between
/// different representations of angles.
pub mod angular;

/// Gaussian latitudes and weights
pub mod gaussian;

/// Rotation of the spherical graticule to a displaced pole
pub mod rotated;
pub use rotated::RotatedPole;

/// Degrees per radian
pub const DPR: f64 = 180. / std::f64::consts::PI;

/// Distance (in degrees of latitude) kept from the poles when evaluating
/// map derivatives and areas, which are singular or indeterminate there.
pub const POLAR_MARGIN: f64 = 1e-6;
