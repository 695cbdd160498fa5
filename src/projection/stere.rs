//! Polar stereographic grids (type 5), true at 60° latitude, on the sphere
use super::{MapJacobian, VectorRotation};
use crate::authoring::*;
use crate::gds::{invalid, CENTRE_MASK, CENTRE_SOUTH_POLE, RESOLUTION_MASK, SCAN_MASK};
use std::f64::consts::FRAC_PI_2;

const EPS10: f64 = 1e-10;

/// Latitude of true scale
const LAT_TS: f64 = 60.;

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [GdsParameter; 10] = [
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
];

/// First point and orientation longitude (degrees), grid lengths at 60°
/// latitude (m), and the hemisphere of the projection pole
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarStereographic {
    pub lat_1: f64,
    pub lon_1: f64,
    pub lon_v: f64,
    pub dx: f64,
    pub dy: f64,
    pub south: bool,
}

pub fn decode(params: &ParsedParameters) -> Result<Projection, Error> {
    let south = params.bit("centre", CENTRE_SOUTH_POLE)?;
    let lat_1 = params.real("lat_1")?;
    let h = if south { -1. } else { 1. };
    if 1. + h * lat_1.to_radians().sin() < EPS10 {
        return Err(invalid(
            params.grid_type,
            "first point on the pole opposite to the projection pole",
        ));
    }

    Ok(Projection::PolarStereographic(PolarStereographic {
        lat_1,
        lon_1: params.real("lon_1")?,
        lon_v: params.real("lon_v")?,
        dx: params.real("dx")?,
        dy: params.real("dy")?,
        south,
    }))
}

// ----- H A N D L E R -----------------------------------------------------------------

#[derive(Debug)]
pub struct Stere {
    /// +1 for the north polar aspect, -1 for the south
    h: f64,
    /// Scale factor at the pole
    k0: f64,
    /// Scale factor at the pole, times the radius
    rk0: f64,
    lon_v: f64,
    x_1: f64,
    y_1: f64,
    dx: f64,
    dy: f64,
    domain: Domain,
}

impl Stere {
    pub fn new(p: &PolarStereographic, grid: &GridDescriptor, radius: f64) -> Stere {
        let k0 = 1. + LAT_TS.to_radians().sin();
        let mut stere = Stere {
            h: if p.south { -1. } else { 1. },
            k0,
            rk0: radius * k0,
            lon_v: p.lon_v,
            x_1: 0.,
            y_1: 0.,
            dx: grid.scan().hi() * p.dx,
            dy: grid.scan().hj() * p.dy,
            domain: Domain::new(grid.im(), grid.jm()),
        };
        (stere.x_1, stere.y_1) = stere.plane(p.lon_1, p.lat_1);
        stere
    }

    /// Longitude relative to the orientation longitude, radians
    fn dlam(&self, lon: f64) -> f64 {
        angular::normalize_symmetric(lon - self.lon_v).to_radians()
    }

    /// Plane coordinates with the origin at the pole
    fn plane(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (sin_phi, cos_phi) = lat.to_radians().sin_cos();
        let rho = self.rk0 * cos_phi / (1. + self.h * sin_phi);
        let (s, c) = self.dlam(lon).sin_cos();
        (rho * s, -self.h * rho * c)
    }
}

impl GridProjection for Stere {
    fn fwd(&self, grid: Coor2D) -> Option<Coor2D> {
        if !self.domain.contains(grid) {
            return None;
        }
        let x = self.x_1 + (grid.x() - 1.) * self.dx;
        let y = self.y_1 + (grid.y() - 1.) * self.dy;
        let rho = x.hypot(y);
        if rho == 0. {
            return Some(Coor2D::gis(self.lon_v, 90. * self.h));
        }
        let lon = angular::normalize_positive(self.lon_v + x.atan2(-self.h * y).to_degrees());
        let lat = self.h * (FRAC_PI_2 - 2. * (rho / self.rk0).atan());
        Some(Coor2D::gis(lon, lat.to_degrees()))
    }

    fn inv(&self, geo: Coor2D) -> Option<Coor2D> {
        if 1. + self.h * geo.lat().to_radians().sin() < EPS10 {
            return None;
        }
        let (x, y) = self.plane(geo.lon(), geo.lat());
        let grid = Coor2D::grid(1. + (x - self.x_1) / self.dx, 1. + (y - self.y_1) / self.dy);
        self.domain.contains(grid).then_some(grid)
    }

    fn rotation(&self, geo: Coor2D) -> VectorRotation {
        VectorRotation::from_angle(self.h * self.dlam(geo.lon()))
    }

    fn jacobian(&self, _grid: Coor2D, geo: Coor2D) -> MapJacobian {
        let (sin_phi, cos_phi) = geo.lat().to_radians().sin_cos();
        let rk = self.rk0 / (1. + self.h * sin_phi);
        let rho = rk * cos_phi;
        let (s, c) = self.dlam(geo.lon()).sin_cos();
        MapJacobian::from_plane(
            rho * c,
            -self.h * rk * s,
            self.h * rho * s,
            rk * c,
            self.dx,
            self.dy,
        )
    }

    fn area(&self, _grid: Coor2D, geo: Coor2D) -> f64 {
        let k = self.k0 / (1. + self.h * geo.lat().to_radians().sin());
        (self.dx * self.dy).abs() / (k * k)
    }
}

// ----- T E S T S ---------------------------------------------------------------------
