//! Mercator grids (type 1)
use super::{cylindrical_column, cylindrical_increment, is_global, MapJacobian};
use crate::authoring::*;
use crate::gds::{require_extent, require_off_pole, RESOLUTION_MASK, SCAN_MASK};

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [GdsParameter; 9] = [
    GdsParameter::Count     { key: "im",         slot: 2 },
    GdsParameter::Count     { key: "jm",         slot: 3 },
    GdsParameter::Latitude  { key: "lat_1",      slot: 4 },
    GdsParameter::Longitude { key: "lon_1",      slot: 5 },
    GdsParameter::Flags     { key: "resolution", slot: 6, mask: RESOLUTION_MASK },
    GdsParameter::Longitude { key: "lon_2",      slot: 8 },
    GdsParameter::Latitude  { key: "lat_ts",     slot: 9 },
    GdsParameter::Flags     { key: "scan",       slot: 11, mask: SCAN_MASK },
    GdsParameter::Distance  { key: "dy",         slot: 13 },
];

/// The first point, the longitude of the last column, the latitude of true
/// scale (degrees), and the row spacing at the latitude of true scale (m)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    pub lat_1: f64,
    pub lon_1: f64,
    pub lon_2: f64,
    pub lat_ts: f64,
    pub dy: f64,
}

pub fn decode(params: &ParsedParameters) -> Result<Projection, Error> {
    require_extent(params, 2)?;
    let lat_1 = require_off_pole(params, "lat_1")?;
    let lat_ts = require_off_pole(params, "lat_ts")?;
    Ok(Projection::Mercator(Mercator {
        lat_1,
        lon_1: params.real("lon_1")?,
        lon_2: params.real("lon_2")?,
        lat_ts,
        dy: params.real("dy")?,
    }))
}

// ----- H A N D L E R -----------------------------------------------------------------

#[derive(Debug)]
pub struct Merc {
    lon_1: f64,
    dlon: f64,
    /// Isometric latitude increment per row
    dpsi: f64,
    /// Row of the equator
    y_e: f64,
    domain: Domain,
    radius: f64,
}

impl Merc {
    pub fn new(p: &Mercator, grid: &GridDescriptor, radius: f64) -> Merc {
        let dlon = cylindrical_increment(p.lon_1, p.lon_2, grid.im(), grid.scan().hi());
        let dpsi = grid.scan().hj() * p.dy / (radius * p.lat_ts.to_radians().cos());
        let y_e = 1. - gudermannian::inv(p.lat_1.to_radians()) / dpsi;
        let mut domain = Domain::new(grid.im(), grid.jm());
        if is_global(grid.im(), dlon) {
            domain = domain.wrapping();
        }
        Merc {
            lon_1: p.lon_1,
            dlon,
            dpsi,
            y_e,
            domain,
            radius,
        }
    }
}

impl GridProjection for Merc {
    fn fwd(&self, grid: Coor2D) -> Option<Coor2D> {
        if !self.domain.contains(grid) {
            return None;
        }
        let lon = angular::normalize_positive(self.lon_1 + self.dlon * (grid.x() - 1.));
        let lat = gudermannian::fwd(self.dpsi * (grid.y() - self.y_e)).to_degrees();
        Some(Coor2D::gis(lon, lat))
    }

    fn inv(&self, geo: Coor2D) -> Option<Coor2D> {
        if geo.lat().abs() >= 90. {
            return None;
        }
        let x = cylindrical_column(geo.lon(), self.lon_1, self.dlon, &self.domain);
        let y = self.y_e + gudermannian::inv(geo.lat().to_radians()) / self.dpsi;
        let grid = Coor2D::grid(x, y);
        self.domain.contains(grid).then_some(grid)
    }

    fn jacobian(&self, _grid: Coor2D, geo: Coor2D) -> MapJacobian {
        let cos_lat = angular::off_pole(geo.lat()).to_radians().cos();
        MapJacobian {
            dx_dlon: 1. / self.dlon,
            dx_dlat: 0.,
            dy_dlon: 0.,
            dy_dlat: 1. / (self.dpsi * cos_lat * DPR),
        }
    }

    fn area(&self, _grid: Coor2D, geo: Coor2D) -> f64 {
        let cos_lat = angular::off_pole(geo.lat()).to_radians().cos();
        let r = self.radius * cos_lat;
        r * r * self.dpsi.abs() * self.dlon.abs().to_radians()
    }
}

// ----- T E S T S ---------------------------------------------------------------------
