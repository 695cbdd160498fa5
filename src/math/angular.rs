use super::POLAR_MARGIN;

/// Decode a legacy scaled integer angle, given in millidegrees, to degrees
pub fn millidegrees(value: i32) -> f64 {
    f64::from(value) / 1000.
}

/// normalize arbitrary longitudes (in degrees) to [0, 360)
pub fn normalize_positive(longitude: f64) -> f64 {
    let longitude = longitude.rem_euclid(360.);
    // rem_euclid may round tiny negative values up to exactly 360
    if longitude >= 360. {
        return 0.;
    }
    longitude
}

/// normalize arbitrary longitudes (in degrees) to [-180, 180)
pub fn normalize_symmetric(longitude: f64) -> f64 {
    normalize_positive(longitude + 180.) - 180.
}

/// The representation of `angle` (in degrees), modulo 360, closest to `reference`
pub fn unwrap_near(angle: f64, reference: f64) -> f64 {
    reference + normalize_symmetric(angle - reference)
}

/// Clamp a latitude (in degrees) to stay `POLAR_MARGIN` off the poles
pub fn off_pole(latitude: f64) -> f64 {
    latitude.clamp(-90. + POLAR_MARGIN, 90. - POLAR_MARGIN)
}

// ----- Tests ---------------------------------------------------------------------
