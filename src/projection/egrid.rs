//! Rotated latitude-longitude Arakawa E-grids (type 203).
//!
//! On the E-grid, mass (H) and wind (V) points alternate along each row,
//! and consecutive rows are shifted half a point relative to each other.
//! A grid description covers either the H or the V points. Internally, a
//! point is located on the *filled* grid, where H and V points together
//! form a regular rotated latitude-longitude grid: `dlon` apart along the
//! rows, and `dlat` apart along the columns.
//! See [Arakawa & Lamb, 1977](crate::Bibliography::Ara77).
use super::{MapJacobian, VectorRotation};
use crate::authoring::*;
use crate::gds::{invalid, require_off_pole, RESOLUTION_MASK, SCAN_WIND_POINTS, STAGGERED_SCAN_MASK};

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [GdsParameter; 10] = [
    GdsParameter::Count     { key: "im",         slot: 2 },
    GdsParameter::Count     { key: "jm",         slot: 3 },
    GdsParameter::Latitude  { key: "lat_1",      slot: 4 },
    GdsParameter::Longitude { key: "lon_1",      slot: 5 },
    GdsParameter::Flags     { key: "resolution", slot: 6, mask: RESOLUTION_MASK },
    GdsParameter::Latitude  { key: "lat_0",      slot: 7 },
    GdsParameter::Longitude { key: "lon_0",      slot: 8 },
    GdsParameter::Increment { key: "dlon",       slot: 9 },
    GdsParameter::Increment { key: "dlat",       slot: 10 },
    GdsParameter::Flags     { key: "scan",       slot: 11, mask: STAGGERED_SCAN_MASK },
];

/// Which of the staggered point sets the grid describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stagger {
    /// Mass points: rows 2, 4, 6, ... start half a point east of the first point
    Mass,
    /// Wind points: rows 2, 4, 6, ... start half a point west of the first point
    Wind,
}

/// First point and rotation centre (degrees), the unsigned filled grid
/// increments in rotated longitude and latitude (degrees), and the stagger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedEGrid {
    pub lat_1: f64,
    pub lon_1: f64,
    pub lat_0: f64,
    pub lon_0: f64,
    pub dlon: f64,
    pub dlat: f64,
    pub stagger: Stagger,
}

pub fn decode(params: &ParsedParameters) -> Result<Projection, Error> {
    let lat_0 = require_off_pole(params, "lat_0")?;
    let dlon = params.real("dlon")?.abs();
    let dlat = params.real("dlat")?.abs();
    if dlon == 0. || dlat == 0. {
        return Err(invalid(params.grid_type, "zero grid increment"));
    }
    let stagger = if params.bit("scan", SCAN_WIND_POINTS)? {
        Stagger::Wind
    } else {
        Stagger::Mass
    };

    Ok(Projection::RotatedEGrid(RotatedEGrid {
        lat_1: params.real("lat_1")?,
        lon_1: params.real("lon_1")?,
        lat_0,
        lon_0: params.real("lon_0")?,
        dlon,
        dlat,
        stagger,
    }))
}

// ----- H A N D L E R -----------------------------------------------------------------

#[derive(Debug)]
pub struct Egrid {
    pole: RotatedPole,
    /// Rotated coordinates of the first point
    lon_r1: f64,
    lat_r1: f64,
    /// Signed filled grid increments
    dlon: f64,
    dlat: f64,
    /// Rotated longitude of the middle of the rows
    lon_rc: f64,
    /// +1 for mass points, -1 for wind points
    sigma: f64,
    domain: Domain,
    radius: f64,
}

/// The row shift (in filled grid columns) of row `y`, and its derivative:
/// a triangle wave, 0 on the odd rows, 1 on the even.
fn shift(y: f64) -> (f64, f64) {
    let t = (y - 1.).rem_euclid(2.);
    if t < 1. {
        (t, 1.)
    } else {
        (2. - t, -1.)
    }
}

impl Egrid {
    pub fn new(p: &RotatedEGrid, grid: &GridDescriptor, radius: f64) -> Egrid {
        let pole = RotatedPole::new(p.lat_0, p.lon_0);
        let (lon_r1, lat_r1) = pole.fwd(p.lon_1, p.lat_1);
        let dlon = grid.scan().hi() * p.dlon;
        Egrid {
            pole,
            lon_r1,
            lat_r1,
            dlon,
            dlat: grid.scan().hj() * p.dlat,
            lon_rc: lon_r1 + dlon * (grid.im() as f64 - 1.),
            sigma: match p.stagger {
                Stagger::Mass => 1.,
                Stagger::Wind => -1.,
            },
            domain: Domain::new(grid.im(), grid.jm()),
            radius,
        }
    }

    /// Grid index coordinates to rotated (lon, lat)
    fn rotated(&self, grid: Coor2D) -> (f64, f64) {
        let column = 2. * (grid.x() - 1.) + self.sigma * shift(grid.y()).0;
        let row = grid.y() - 1.;
        (self.lon_r1 + column * self.dlon, self.lat_r1 + row * self.dlat)
    }
}

impl GridProjection for Egrid {
    fn fwd(&self, grid: Coor2D) -> Option<Coor2D> {
        if !self.domain.contains(grid) {
            return None;
        }
        let (lon_r, lat_r) = self.rotated(grid);
        if lat_r.abs() > 90. {
            return None;
        }
        let (lon, lat) = self.pole.inv(lon_r, lat_r);
        Some(Coor2D::gis(lon, lat))
    }

    fn inv(&self, geo: Coor2D) -> Option<Coor2D> {
        let (lon_r, lat_r) = self.pole.fwd(geo.lon(), geo.lat());
        let lon_r = angular::unwrap_near(lon_r, self.lon_rc);
        let y = 1. + (lat_r - self.lat_r1) / self.dlat;
        let column = (lon_r - self.lon_r1) / self.dlon;
        let x = 1. + (column - self.sigma * shift(y).0) / 2.;
        let grid = Coor2D::grid(x, y);
        self.domain.contains(grid).then_some(grid)
    }

    fn rotation(&self, geo: Coor2D) -> VectorRotation {
        let (cos_beta, sin_beta, _) = self.pole.meridian_convergence(geo.lon(), geo.lat());
        VectorRotation::new(cos_beta, sin_beta)
    }

    fn jacobian(&self, grid: Coor2D, geo: Coor2D) -> MapJacobian {
        let d = self.pole.derivatives(geo.lon(), geo.lat());
        let slope = self.sigma * shift(grid.y()).1;

        let dy_dlon = d[1][0] / self.dlat;
        let dy_dlat = d[1][1] / self.dlat;
        MapJacobian {
            dx_dlon: (d[0][0] / self.dlon - slope * dy_dlon) / 2.,
            dx_dlat: (d[0][1] / self.dlon - slope * dy_dlat) / 2.,
            dy_dlon,
            dy_dlat,
        }
    }

    fn area(&self, grid: Coor2D, _geo: Coor2D) -> f64 {
        // Each point of a staggered set represents two cells of the filled grid
        let (_, lat_r) = self.rotated(grid);
        quadrangle_area(self.radius, lat_r, 2. * self.dlon, self.dlat)
    }
}

// ----- T E S T S ---------------------------------------------------------------------
