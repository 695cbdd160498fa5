use super::{angular, POLAR_MARGIN};

/// A spherical graticule rotated such that the point (`lat_0`, `lon_0`)
/// becomes the origin (0, 0) of the rotated coordinate system.
///
/// All angles cross the interface in degrees; the work is done in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedPole {
    sin_lat_0: f64,
    cos_lat_0: f64,
    lon_0: f64,
}

impl RotatedPole {
    /// Rotation taking (`lat_0`, `lon_0`) to the origin
    #[must_use]
    pub fn new(lat_0: f64, lon_0: f64) -> RotatedPole {
        let (sin_lat_0, cos_lat_0) = lat_0.to_radians().sin_cos();
        RotatedPole {
            sin_lat_0,
            cos_lat_0,
            lon_0,
        }
    }

    /// Earth (lon, lat) to rotated (lon, lat). The rotated longitude is in (-180, 180].
    #[must_use]
    pub fn fwd(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let (sin_dlon, cos_dlon) = (lon - self.lon_0).to_radians().sin_cos();

        let sin_lat_r = self.cos_lat_0 * sin_lat - self.sin_lat_0 * cos_lat * cos_dlon;
        let lat_r = sin_lat_r.clamp(-1., 1.).asin();
        let lon_r = (cos_lat * sin_dlon)
            .atan2(self.sin_lat_0 * sin_lat + self.cos_lat_0 * cos_lat * cos_dlon);
        (lon_r.to_degrees(), lat_r.to_degrees())
    }

    /// Rotated (lon, lat) to earth (lon, lat). The earth longitude is in [0, 360).
    #[must_use]
    pub fn inv(&self, lon_r: f64, lat_r: f64) -> (f64, f64) {
        let (sin_lat_r, cos_lat_r) = lat_r.to_radians().sin_cos();
        let (sin_lon_r, cos_lon_r) = lon_r.to_radians().sin_cos();

        let sin_lat = self.cos_lat_0 * sin_lat_r + self.sin_lat_0 * cos_lat_r * cos_lon_r;
        let lat = sin_lat.clamp(-1., 1.).asin();

        // On the poles, the longitude is arbitrary, and atan2(0, 0) = 0 gives lon_0
        let dlon = (cos_lat_r * sin_lon_r)
            .atan2(self.cos_lat_0 * cos_lat_r * cos_lon_r - self.sin_lat_0 * sin_lat_r);
        let lon = angular::normalize_positive(self.lon_0 + dlon.to_degrees());
        (lon, lat.to_degrees())
    }

    /// The cosine and sine of the azimuth (clockwise from true north) of the
    /// rotated meridian through the earth point (lon, lat), together with the
    /// cosine of the rotated latitude of the point.
    ///
    /// At the rotated poles the rotated meridians converge, and the azimuth
    /// degenerates to pointing straight along (or against) the true meridian.
    #[must_use]
    pub fn meridian_convergence(&self, lon: f64, lat: f64) -> (f64, f64, f64) {
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let (sin_dlon, cos_dlon) = (lon - self.lon_0).to_radians().sin_cos();

        let sin_lat_r = self.cos_lat_0 * sin_lat - self.sin_lat_0 * cos_lat * cos_dlon;
        let cos_lat_r = (1. - sin_lat_r * sin_lat_r).max(0.).sqrt();

        let c = self.cos_lat_0 * cos_lat + self.sin_lat_0 * sin_lat * cos_dlon;
        let s = self.sin_lat_0 * sin_dlon;
        let norm = c.hypot(s);
        if norm < 1e-12 {
            let c = -(sin_lat_r * self.sin_lat_0).signum();
            return (c, 0., cos_lat_r);
        }
        (c / norm, s / norm, cos_lat_r)
    }

    /// Partial derivatives of the rotated (lon, lat) with respect to the
    /// earth (lon, lat), at the earth point (lon, lat), in degrees per degree:
    /// `[[∂λr/∂λ, ∂λr/∂φ], [∂φr/∂λ, ∂φr/∂φ]]`.
    ///
    /// The rotated longitude derivatives are evaluated at a rotated latitude
    /// no closer than `POLAR_MARGIN` to the rotated poles.
    #[must_use]
    pub fn derivatives(&self, lon: f64, lat: f64) -> [[f64; 2]; 2] {
        let (cos_beta, sin_beta, cos_lat_r) = self.meridian_convergence(lon, lat);
        let cos_lat_r = cos_lat_r.max((90. - POLAR_MARGIN).to_radians().cos());
        let cos_lat = lat.to_radians().cos();
        [
            [cos_lat * cos_beta / cos_lat_r, -sin_beta / cos_lat_r],
            [cos_lat * sin_beta, cos_beta],
        ]
    }
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    // The rotation used by the NCEP 12 km North American rotated grids
    fn nam() -> RotatedPole {
        RotatedPole::new(54., -106.)
    }

    #[test]
    fn origin() {
        let rot = nam();
        let (lon_r, lat_r) = rot.fwd(-106., 54.);
        assert_float_eq!(lon_r, 0., abs <= 1e-12);
        assert_float_eq!(lat_r, 0., abs <= 1e-12);
        let (lon, lat) = rot.inv(0., 0.);
        assert_float_eq!(lon, 254., abs <= 1e-12);
        assert_float_eq!(lat, 54., abs <= 1e-12);
    }

    #[test]
    fn roundtrip() {
        let rot = nam();
        for (lon, lat) in [(215.861, -7.446), (14.744, 44.56), (300., 70.), (100., -60.)] {
            let (lon_r, lat_r) = rot.fwd(lon, lat);
            let (lon2, lat2) = rot.inv(lon_r, lat_r);
            assert_float_eq!(lon2, lon, abs <= 1e-9);
            assert_float_eq!(lat2, lat, abs <= 1e-9);
        }
    }

    #[test]
    fn corners_of_the_nam_grid() {
        let rot = nam();
        let (lon_r, lat_r) = rot.fwd(-144.139, -7.446);
        assert_float_eq!(lon_r, -60., abs <= 1e-2);
        assert_float_eq!(lat_r, -45., abs <= 1e-2);
        let (lon_r, lat_r) = rot.fwd(14.744, 44.56);
        assert_float_eq!(lon_r, 60., abs <= 1e-2);
        assert_float_eq!(lat_r, 45., abs <= 1e-2);
    }

    #[test]
    fn convergence() {
        let rot = nam();
        // Along the central meridian, rotated and true north coincide
        let (c, s, cos_lat_r) = rot.meridian_convergence(254., 30.);
        assert_float_eq!(c, 1., abs <= 1e-12);
        assert_float_eq!(s, 0., abs <= 1e-12);
        assert_float_eq!(cos_lat_r, 24_f64.to_radians().cos(), abs <= 1e-12);

        // Elsewhere, it is a proper rotation
        let (c, s, _) = rot.meridian_convergence(215.861, -7.446);
        assert_float_eq!(c * c + s * s, 1., abs <= 1e-14);
        assert!(s < 0.);
    }

    #[test]
    fn derivatives() {
        let rot = nam();
        let h = 1e-5;
        for (lon, lat) in [(215.861, -7.446), (254., 30.), (300., 60.)] {
            let d = rot.derivatives(lon, lat);

            let (e1, _) = rot.fwd(lon - h, lat);
            let (e2, _) = rot.fwd(lon + h, lat);
            let (_, n1) = rot.fwd(lon - h, lat);
            let (_, n2) = rot.fwd(lon + h, lat);
            assert_float_eq!(d[0][0], (e2 - e1) / (2. * h), abs <= 1e-6);
            assert_float_eq!(d[1][0], (n2 - n1) / (2. * h), abs <= 1e-6);

            let (e1, n1) = rot.fwd(lon, lat - h);
            let (e2, n2) = rot.fwd(lon, lat + h);
            assert_float_eq!(d[0][1], (e2 - e1) / (2. * h), abs <= 1e-6);
            assert_float_eq!(d[1][1], (n2 - n1) / (2. * h), abs <= 1e-6);
        }
    }
}
