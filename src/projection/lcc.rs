//! Lambert conformal conic grids (type 3), on the sphere.
//! See [Snyder, 1987](crate::Bibliography::Sny87), ch. 15.
use super::{MapJacobian, VectorRotation};
use crate::authoring::*;
use crate::gds::{
    invalid, require_off_pole, CENTRE_MASK, CENTRE_SOUTH_POLE, RESOLUTION_MASK, SCAN_MASK,
};
use crate::math::ancillary::ts;
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [GdsParameter; 12] = [
    GdsParameter::Count     { key: "im",         slot: 2 },
    GdsParameter::Count     { key: "jm",         slot: 3 },
    GdsParameter::Latitude  { key: "lat_1",      slot: 4 },
    GdsParameter::Longitude { key: "lon_1",      slot: 5 },
    GdsParameter::Flags     { key: "resolution", slot: 6, mask: RESOLUTION_MASK },
    GdsParameter::Longitude { key: "lon_v",      slot: 7 },
    GdsParameter::Distance  { key: "dx",         slot: 8 },
    GdsParameter::Distance  { key: "dy",         slot: 9 },
    GdsParameter::Flags     { key: "centre",     slot: 10, mask: CENTRE_MASK },
    GdsParameter::Flags     { key: "scan",       slot: 11, mask: SCAN_MASK },
    GdsParameter::Latitude  { key: "lat_in_1",   slot: 12 },
    GdsParameter::Latitude  { key: "lat_in_2",   slot: 13 },
];

/// First point and orientation longitude (degrees), grid lengths (m), and
/// the two standard parallels (degrees, possibly coinciding)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformal {
    pub lat_1: f64,
    pub lon_1: f64,
    pub lon_v: f64,
    pub dx: f64,
    pub dy: f64,
    pub lat_in_1: f64,
    pub lat_in_2: f64,
}

/// The cone constant for the standard parallels `phi_1`, `phi_2` (radians).
/// Negative for cones with their apex at the south pole.
pub fn cone_constant(phi_1: f64, phi_2: f64) -> f64 {
    let sc = phi_1.sin_cos();
    // Tangent case?
    if (phi_1 - phi_2).abs() < EPS10 {
        return sc.0;
    }
    let sc2 = phi_2.sin_cos();
    (sc.1 / sc2.1).ln() / (ts(sc) / ts(sc2)).ln()
}

pub fn decode(params: &ParsedParameters) -> Result<Projection, Error> {
    let grid_type = params.grid_type;
    let lat_in_1 = require_off_pole(params, "lat_in_1")?;
    let lat_in_2 = require_off_pole(params, "lat_in_2")?;
    if (lat_in_1 + lat_in_2).abs() < EPS10 {
        return Err(invalid(grid_type, "|lat_in_1 + lat_in_2| should be > 0"));
    }

    let n = cone_constant(lat_in_1.to_radians(), lat_in_2.to_radians());
    if !n.is_finite() || n == 0. {
        return Err(invalid(grid_type, "degenerate cone"));
    }
    if params.bit("centre", CENTRE_SOUTH_POLE)? != (n < 0.) {
        return Err(invalid(grid_type, "projection centre flag contradicts the standard parallels"));
    }

    let lat_1 = params.real("lat_1")?;
    if lat_1.abs() == 90. && lat_1 * n <= 0. {
        return Err(invalid(grid_type, "first point on the pole opposite to the projection centre"));
    }

    Ok(Projection::LambertConformal(LambertConformal {
        lat_1,
        lon_1: params.real("lon_1")?,
        lon_v: params.real("lon_v")?,
        dx: params.real("dx")?,
        dy: params.real("dy")?,
        lat_in_1,
        lat_in_2,
    }))
}

// ----- H A N D L E R -----------------------------------------------------------------

#[derive(Debug)]
pub struct Lcc {
    n: f64,
    c: f64,
    lon_v: f64,
    /// Plane coordinates of the first point
    x_1: f64,
    y_1: f64,
    /// Signed grid lengths
    dx: f64,
    dy: f64,
    domain: Domain,
    radius: f64,
}

impl Lcc {
    pub fn new(p: &LambertConformal, grid: &GridDescriptor, radius: f64) -> Lcc {
        let phi_1 = p.lat_in_1.to_radians();
        let n = cone_constant(phi_1, p.lat_in_2.to_radians());
        let sc = phi_1.sin_cos();
        let c = sc.1 * ts(sc).powf(-n) / n;

        let mut lcc = Lcc {
            n,
            c,
            lon_v: p.lon_v,
            x_1: 0.,
            y_1: 0.,
            dx: grid.scan().hi() * p.dx,
            dy: grid.scan().hj() * p.dy,
            domain: Domain::new(grid.im(), grid.jm()),
            radius,
        };
        (lcc.x_1, lcc.y_1) = lcc.plane(p.lon_1, p.lat_1);
        lcc
    }

    /// Polar distance (m) of the latitude `phi` (radians). Infinite on the
    /// opposite pole.
    fn rho(&self, phi: f64) -> f64 {
        if (phi.abs() - FRAC_PI_2).abs() < EPS10 {
            return if phi * self.n <= 0. { f64::INFINITY } else { 0. };
        }
        self.radius * self.c * ts(phi.sin_cos()).powf(self.n)
    }

    /// The polar angle of the longitude `lon` (degrees), radians
    fn theta(&self, lon: f64) -> f64 {
        self.n * angular::normalize_symmetric(lon - self.lon_v).to_radians()
    }

    /// Plane coordinates with the origin at the cone apex
    fn plane(&self, lon: f64, lat: f64) -> (f64, f64) {
        let rho = self.rho(lat.to_radians());
        let (s, c) = self.theta(lon).sin_cos();
        (rho * s, -rho * c)
    }
}

impl GridProjection for Lcc {
    fn fwd(&self, grid: Coor2D) -> Option<Coor2D> {
        if !self.domain.contains(grid) {
            return None;
        }
        let mut x = (self.x_1 + (grid.x() - 1.) * self.dx) / self.radius;
        let mut y = -(self.y_1 + (grid.y() - 1.) * self.dy) / self.radius;
        let mut rho = x.hypot(y);

        // On the pole
        if rho == 0. {
            return Some(Coor2D::gis(self.lon_v, 90_f64.copysign(self.n)));
        }

        // Apex at the south pole?
        if self.n < 0. {
            rho = -rho;
            x = -x;
            y = -y;
        }

        let ts0 = (rho / self.c).powf(1. / self.n);
        let phi = FRAC_PI_2 - 2. * ts0.atan();
        if !phi.is_finite() {
            return None;
        }
        let lon = angular::normalize_positive(self.lon_v + (x.atan2(y) / self.n).to_degrees());
        Some(Coor2D::gis(lon, phi.to_degrees()))
    }

    fn inv(&self, geo: Coor2D) -> Option<Coor2D> {
        let (x, y) = self.plane(geo.lon(), geo.lat());
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let grid = Coor2D::grid(1. + (x - self.x_1) / self.dx, 1. + (y - self.y_1) / self.dy);
        self.domain.contains(grid).then_some(grid)
    }

    fn rotation(&self, geo: Coor2D) -> VectorRotation {
        VectorRotation::from_angle(self.theta(geo.lon()))
    }

    fn jacobian(&self, _grid: Coor2D, geo: Coor2D) -> MapJacobian {
        let phi = angular::off_pole(geo.lat()).to_radians();
        let n_rho = self.n * self.rho(phi);
        let cos_phi = phi.cos();
        let (s, c) = self.theta(geo.lon()).sin_cos();
        MapJacobian::from_plane(
            n_rho * c,
            -n_rho * s / cos_phi,
            n_rho * s,
            n_rho * c / cos_phi,
            self.dx,
            self.dy,
        )
    }

    fn area(&self, _grid: Coor2D, geo: Coor2D) -> f64 {
        let phi = angular::off_pole(geo.lat()).to_radians();
        let k = self.n * self.rho(phi) / (self.radius * phi.cos());
        (self.dx * self.dy).abs() / (k * k)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Handler;
    use float_eq::assert_float_eq;

    const R: f64 = 6.3712e6;

    // NCEP grid 221: 32 km North America, tangent at 50°N
    const NCEP_221: [i32; 13] = [
        3, 349, 277, 1000, -145500, 8, -107000, 32463, 32463, 0, 64, 50000, 50000,
    ];

    // A secant cone with its apex at the south pole
    const SOUTHERN: [i32; 13] = [
        3, 100, 100, -50000, 100000, 8, 120000, 20000, 20000, 128, 64, -30000, -60000,
    ];

    fn handler(grid: &GridDescriptor) -> Lcc {
        let Handler::Lcc(h) = Handler::new(grid, R) else {
            panic!("Expected a Lambert conformal handler");
        };
        h
    }

    #[test]
    fn cone() {
        let n = cone_constant(50_f64.to_radians(), 50_f64.to_radians());
        assert_float_eq!(n, 50_f64.to_radians().sin(), abs <= 1e-15);
        let n = cone_constant(33_f64.to_radians(), 45_f64.to_radians());
        assert!(n > 33_f64.to_radians().sin() && n < 45_f64.to_radians().sin());
        let n = cone_constant(-30_f64.to_radians(), -60_f64.to_radians());
        assert!(n < 0.);
    }

    #[test]
    fn corners_of_grid_221() -> Result<(), Error> {
        let grid = GridDescriptor::new(&NCEP_221)?;
        let h = handler(&grid);

        let geo = h.fwd(Coor2D::grid(1., 1.)).unwrap();
        assert_float_eq!(geo.lon(), 214.5, abs <= 1e-9);
        assert_float_eq!(geo.lat(), 1., abs <= 1e-9);

        // Published as 46.352N 357.434E, on a slightly different sphere
        let geo = h.fwd(Coor2D::grid(349., 277.)).unwrap();
        assert_float_eq!(geo.lon(), 357.434, abs <= 1e-2);
        assert_float_eq!(geo.lat(), 46.352, abs <= 1e-2);

        for (x, y) in [(1., 1.), (100.5, 77.25), (349., 277.), (0., 278.)] {
            let geo = h.fwd(Coor2D::grid(x, y)).unwrap();
            let xy = h.inv(geo).unwrap();
            assert_float_eq!(xy.x(), x, abs <= 1e-8);
            assert_float_eq!(xy.y(), y, abs <= 1e-8);
        }

        // Opposite pole, and far outside
        assert!(h.inv(Coor2D::gis(0., -90.)).is_none());
        assert!(h.inv(Coor2D::gis(90., 0.)).is_none());
        Ok(())
    }

    #[test]
    fn southern_cone() -> Result<(), Error> {
        let grid = GridDescriptor::new(&SOUTHERN)?;
        let h = handler(&grid);
        assert!(h.n < 0.);

        let geo = h.fwd(Coor2D::grid(1., 1.)).unwrap();
        assert_float_eq!(geo.lon(), 100., abs <= 1e-9);
        assert_float_eq!(geo.lat(), -50., abs <= 1e-9);

        let geo = h.fwd(Coor2D::grid(37.5, 81.)).unwrap();
        let xy = h.inv(geo).unwrap();
        assert_float_eq!(xy.x(), 37.5, abs <= 1e-8);
        assert_float_eq!(xy.y(), 81., abs <= 1e-8);
        Ok(())
    }

    #[test]
    fn auxiliaries() -> Result<(), Error> {
        for kgds in [NCEP_221, SOUTHERN] {
            let grid = GridDescriptor::new(&kgds)?;
            let h = handler(&grid);
            let grid_point = Coor2D::grid(60., 70.);
            let geo = h.fwd(grid_point).unwrap();

            // Map derivatives versus finite differences
            let jac = h.jacobian(grid_point, geo);
            let d = 1e-4;
            let e = h.inv(Coor2D::gis(geo.lon() + d, geo.lat())).unwrap();
            let w = h.inv(Coor2D::gis(geo.lon() - d, geo.lat())).unwrap();
            let n = h.inv(Coor2D::gis(geo.lon(), geo.lat() + d)).unwrap();
            let s = h.inv(Coor2D::gis(geo.lon(), geo.lat() - d)).unwrap();
            assert_float_eq!(jac.dx_dlon, (e.x() - w.x()) / (2. * d), abs <= 1e-6);
            assert_float_eq!(jac.dy_dlon, (e.y() - w.y()) / (2. * d), abs <= 1e-6);
            assert_float_eq!(jac.dx_dlat, (n.x() - s.x()) / (2. * d), abs <= 1e-6);
            assert_float_eq!(jac.dy_dlat, (n.y() - s.y()) / (2. * d), abs <= 1e-6);

            // The grid's +y axis points along the rotation angle, clockwise from north
            let rot = h.rotation(geo);
            let up = h.fwd(Coor2D::grid(60., 70.001)).unwrap();
            let east = (up.lon() - geo.lon()) * geo.lat().to_radians().cos();
            let north = up.lat() - geo.lat();
            let azimuth = east.atan2(north);
            assert_float_eq!(rot.sin, azimuth.sin(), abs <= 1e-4);
            assert_float_eq!(rot.cos, azimuth.cos(), abs <= 1e-4);

            // Conformal: the cell area and the map derivatives share the scale factor
            let area = h.area(grid_point, geo);
            let cos_lat = geo.lat().to_radians().cos();
            assert_float_eq!(
                area * jac.determinant().abs() * DPR * DPR,
                R * R * cos_lat,
                rmax <= 1e-9
            );
        }
        Ok(())
    }

    #[test]
    fn rejections() {
        // Centre flag contradicting the cone
        let mut kgds = NCEP_221;
        kgds[9] = 128;
        assert!(GridDescriptor::new(&kgds).is_err());
        let mut kgds = SOUTHERN;
        kgds[9] = 0;
        assert!(GridDescriptor::new(&kgds).is_err());

        // Standard parallels symmetric about the equator, or on a pole
        let mut kgds = NCEP_221;
        kgds[11] = 30000;
        kgds[12] = -30000;
        assert!(GridDescriptor::new(&kgds).is_err());
        let mut kgds = NCEP_221;
        kgds[11] = 90000;
        assert!(GridDescriptor::new(&kgds).is_err());

        // First point on the opposite pole
        let mut kgds = NCEP_221;
        kgds[3] = -90000;
        assert!(GridDescriptor::new(&kgds).is_err());
    }
}
