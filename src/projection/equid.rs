//! Equidistant cylindrical, i.e. plain latitude-longitude grids (type 0)
use super::{cylindrical_column, cylindrical_increment, is_global, MapJacobian};
use crate::authoring::*;
use crate::gds::{invalid, require_extent, RESOLUTION_MASK, SCAN_MASK};

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [GdsParameter; 8] = [
    GdsParameter::Count     { key: "im",         slot: 2 },
    GdsParameter::Count     { key: "jm",         slot: 3 },
    GdsParameter::Latitude  { key: "lat_1",      slot: 4 },
    GdsParameter::Longitude { key: "lon_1",      slot: 5 },
    GdsParameter::Flags     { key: "resolution", slot: 6, mask: RESOLUTION_MASK },
    GdsParameter::Latitude  { key: "lat_2",      slot: 7 },
    GdsParameter::Longitude { key: "lon_2",      slot: 8 },
    GdsParameter::Flags     { key: "scan",       slot: 11, mask: SCAN_MASK },
];

/// Corner points of the grid, degrees. The increments are derived from
/// the corners, rather than read from slots 9 and 10.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquidistantCylindrical {
    pub lat_1: f64,
    pub lon_1: f64,
    pub lat_2: f64,
    pub lon_2: f64,
}

pub fn decode(params: &ParsedParameters) -> Result<Projection, Error> {
    require_extent(params, 2)?;
    let lat_1 = params.real("lat_1")?;
    let lat_2 = params.real("lat_2")?;
    if lat_1 == lat_2 {
        return Err(invalid(params.grid_type, "first and last latitude coincide"));
    }

    Ok(Projection::EquidistantCylindrical(EquidistantCylindrical {
        lat_1,
        lon_1: params.real("lon_1")?,
        lat_2,
        lon_2: params.real("lon_2")?,
    }))
}

// ----- H A N D L E R -----------------------------------------------------------------

#[derive(Debug)]
pub struct Equid {
    lat_1: f64,
    lon_1: f64,
    dlon: f64,
    dlat: f64,
    domain: Domain,
    radius: f64,
}

impl Equid {
    pub fn new(p: &EquidistantCylindrical, grid: &GridDescriptor, radius: f64) -> Equid {
        let dlon = cylindrical_increment(p.lon_1, p.lon_2, grid.im(), grid.scan().hi());
        let dlat = (p.lat_2 - p.lat_1) / (grid.jm() as f64 - 1.);
        let mut domain = Domain::new(grid.im(), grid.jm());
        if is_global(grid.im(), dlon) {
            domain = domain.wrapping();
        }
        Equid {
            lat_1: p.lat_1,
            lon_1: p.lon_1,
            dlon,
            dlat,
            domain,
            radius,
        }
    }
}

impl GridProjection for Equid {
    fn fwd(&self, grid: Coor2D) -> Option<Coor2D> {
        if !self.domain.contains(grid) {
            return None;
        }
        let lon = angular::normalize_positive(self.lon_1 + self.dlon * (grid.x() - 1.));
        // The halo may reach across a pole
        let lat = (self.lat_1 + self.dlat * (grid.y() - 1.)).clamp(-90., 90.);
        Some(Coor2D::gis(lon, lat))
    }

    fn inv(&self, geo: Coor2D) -> Option<Coor2D> {
        let x = cylindrical_column(geo.lon(), self.lon_1, self.dlon, &self.domain);
        let y = 1. + (geo.lat() - self.lat_1) / self.dlat;
        let grid = Coor2D::grid(x, y);
        self.domain.contains(grid).then_some(grid)
    }

    fn jacobian(&self, _grid: Coor2D, _geo: Coor2D) -> MapJacobian {
        MapJacobian {
            dx_dlon: 1. / self.dlon,
            dx_dlat: 0.,
            dy_dlon: 0.,
            dy_dlat: 1. / self.dlat,
        }
    }

    fn area(&self, _grid: Coor2D, geo: Coor2D) -> f64 {
        quadrangle_area(self.radius, geo.lat(), self.dlon, self.dlat)
    }
}

// ----- T E S T S ---------------------------------------------------------------------
