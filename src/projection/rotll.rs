//! Rotated latitude-longitude grids (type 205), defined by their corners
use super::{MapJacobian, VectorRotation};
use crate::authoring::*;
use crate::gds::{invalid, require_extent, require_off_pole, RESOLUTION_MASK, SCAN_MASK};

// ----- C O N S T R U C T O R ---------------------------------------------------------

// Slots 9 and 10 (the increments) are not read: the increments follow from
// the rotated coordinates of the corners
#[rustfmt::skip]
pub const GAMUT: [GdsParameter; 10] = [
    GdsParameter::Count     { key: "im",         slot: 2 },
    GdsParameter::Count     { key: "jm",         slot: 3 },
    GdsParameter::Latitude  { key: "lat_1",      slot: 4 },
    GdsParameter::Longitude { key: "lon_1",      slot: 5 },
    GdsParameter::Flags     { key: "resolution", slot: 6, mask: RESOLUTION_MASK },
    GdsParameter::Latitude  { key: "lat_0",      slot: 7 },
    GdsParameter::Longitude { key: "lon_0",      slot: 8 },
    GdsParameter::Flags     { key: "scan",       slot: 11, mask: SCAN_MASK },
    GdsParameter::Latitude  { key: "lat_2",      slot: 12 },
    GdsParameter::Longitude { key: "lon_2",      slot: 13 },
];

/// First and last point, and the rotation centre, degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedLatLon {
    pub lat_1: f64,
    pub lon_1: f64,
    pub lat_0: f64,
    pub lon_0: f64,
    pub lat_2: f64,
    pub lon_2: f64,
}

pub fn decode(params: &ParsedParameters) -> Result<Projection, Error> {
    require_extent(params, 2)?;
    let p = RotatedLatLon {
        lat_1: params.real("lat_1")?,
        lon_1: params.real("lon_1")?,
        lat_0: require_off_pole(params, "lat_0")?,
        lon_0: params.real("lon_0")?,
        lat_2: params.real("lat_2")?,
        lon_2: params.real("lon_2")?,
    };

    let pole = RotatedPole::new(p.lat_0, p.lon_0);
    let (west, south) = pole.fwd(p.lon_1, p.lat_1);
    let (east, north) = pole.fwd(p.lon_2, p.lat_2);
    if (north - south).abs() < 1e-9 || (east - west).abs() < 1e-9 {
        return Err(invalid(params.grid_type, "degenerate rotated extent"));
    }
    Ok(Projection::RotatedLatLon(p))
}

// ----- H A N D L E R -----------------------------------------------------------------

#[derive(Debug)]
pub struct Rotll {
    pole: RotatedPole,
    /// Rotated coordinates of the first point
    lon_r1: f64,
    lat_r1: f64,
    dlon: f64,
    dlat: f64,
    /// Rotated longitude of the middle of the rows
    lon_rc: f64,
    domain: Domain,
    radius: f64,
}

impl Rotll {
    pub fn new(p: &RotatedLatLon, grid: &GridDescriptor, radius: f64) -> Rotll {
        let pole = RotatedPole::new(p.lat_0, p.lon_0);
        let (lon_r1, lat_r1) = pole.fwd(p.lon_1, p.lat_1);
        let (lon_r2, lat_r2) = pole.fwd(p.lon_2, p.lat_2);

        // Rows running against the scanning direction wrap around the rotated globe
        let hi = grid.scan().hi();
        let mut span = lon_r2 - lon_r1;
        if hi * span < 0. {
            span += hi * 360.;
        }

        let dlon = span / (grid.im() as f64 - 1.);
        let dlat = (lat_r2 - lat_r1) / (grid.jm() as f64 - 1.);
        Rotll {
            pole,
            lon_r1,
            lat_r1,
            dlon,
            dlat,
            lon_rc: lon_r1 + span / 2.,
            domain: Domain::new(grid.im(), grid.jm()),
            radius,
        }
    }
}

impl GridProjection for Rotll {
    fn fwd(&self, grid: Coor2D) -> Option<Coor2D> {
        if !self.domain.contains(grid) {
            return None;
        }
        let lon_r = self.lon_r1 + (grid.x() - 1.) * self.dlon;
        let lat_r = self.lat_r1 + (grid.y() - 1.) * self.dlat;
        if lat_r.abs() > 90. {
            return None;
        }
        let (lon, lat) = self.pole.inv(lon_r, lat_r);
        Some(Coor2D::gis(lon, lat))
    }

    fn inv(&self, geo: Coor2D) -> Option<Coor2D> {
        let (lon_r, lat_r) = self.pole.fwd(geo.lon(), geo.lat());
        let lon_r = angular::unwrap_near(lon_r, self.lon_rc);
        let x = 1. + (lon_r - self.lon_r1) / self.dlon;
        let y = 1. + (lat_r - self.lat_r1) / self.dlat;
        let grid = Coor2D::grid(x, y);
        self.domain.contains(grid).then_some(grid)
    }

    fn rotation(&self, geo: Coor2D) -> VectorRotation {
        let (cos_beta, sin_beta, _) = self.pole.meridian_convergence(geo.lon(), geo.lat());
        VectorRotation::new(cos_beta, sin_beta)
    }

    fn jacobian(&self, _grid: Coor2D, geo: Coor2D) -> MapJacobian {
        let d = self.pole.derivatives(geo.lon(), geo.lat());
        MapJacobian {
            dx_dlon: d[0][0] / self.dlon,
            dx_dlat: d[0][1] / self.dlon,
            dy_dlon: d[1][0] / self.dlat,
            dy_dlat: d[1][1] / self.dlat,
        }
    }

    fn area(&self, grid: Coor2D, _geo: Coor2D) -> f64 {
        let lat_r = self.lat_r1 + (grid.y() - 1.) * self.dlat;
        quadrangle_area(self.radius, lat_r, self.dlon, self.dlat)
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Handler;
    use float_eq::assert_float_eq;

    const R: f64 = 6.3712e6;

    // The 12 km NCEP North American rotated lat/lon grid
    const NAM: [i32; 13] = [
        205, 251, 201, -7446, -144139, 8, 54000, -106000, 0, 0, 64, 44560, 14744,
    ];

    fn handler(grid: &GridDescriptor) -> Rotll {
        let Handler::Rotll(h) = Handler::new(grid, R) else {
            panic!("Expected a rotated lat/lon handler");
        };
        h
    }

    #[test]
    fn corners() -> Result<(), Error> {
        let grid = GridDescriptor::new(&NAM)?;
        let h = handler(&grid);
        assert_float_eq!(h.dlon, 0.48, abs <= 1e-4);
        assert_float_eq!(h.dlat, 0.45, abs <= 1e-4);

        let geo = h.fwd(Coor2D::grid(1., 1.)).unwrap();
        assert_float_eq!(geo.lon(), 215.861, abs <= 1e-9);
        assert_float_eq!(geo.lat(), -7.446, abs <= 1e-9);

        let geo = h.fwd(Coor2D::grid(251., 201.)).unwrap();
        assert_float_eq!(geo.lon(), 14.744, abs <= 1e-9);
        assert_float_eq!(geo.lat(), 44.56, abs <= 1e-9);

        // The rotation centre
        let xy = h.inv(Coor2D::gis(254., 54.)).unwrap();
        assert_float_eq!(xy.x(), 126., abs <= 1e-2);
        assert_float_eq!(xy.y(), 101., abs <= 1e-2);

        for (x, y) in [(1., 1.), (0., 0.), (252., 202.), (125.5, 77.7)] {
            let geo = h.fwd(Coor2D::grid(x, y)).unwrap();
            let xy = h.inv(geo).unwrap();
            assert_float_eq!(xy.x(), x, abs <= 1e-8);
            assert_float_eq!(xy.y(), y, abs <= 1e-8);
        }

        // The antipode of the centre
        assert!(h.inv(Coor2D::gis(74., -54.)).is_none());
        Ok(())
    }

    #[test]
    fn auxiliaries() -> Result<(), Error> {
        let grid = GridDescriptor::new(&NAM)?;
        let h = handler(&grid);

        let grid_point = Coor2D::grid(40.3, 170.6);
        let geo = h.fwd(grid_point).unwrap();
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
        let up = h.fwd(Coor2D::grid(40.3, 170.601)).unwrap();
        let east = (up.lon() - geo.lon()) * geo.lat().to_radians().cos();
        let north = up.lat() - geo.lat();
        let azimuth = east.atan2(north);
        assert_float_eq!(rot.sin, azimuth.sin(), abs <= 1e-4);
        assert_float_eq!(rot.cos, azimuth.cos(), abs <= 1e-4);

        // Cells are largest at the rotated equator
        let centre = h.area(Coor2D::grid(126., 101.), geo);
        let corner = h.area(Coor2D::grid(1., 1.), geo);
        assert!(centre > corner && corner > 0.);
        Ok(())
    }

    #[test]
    fn rejections() {
        // Coinciding first and last points
        let mut kgds = NAM;
        kgds[11] = kgds[3];
        kgds[12] = kgds[4];
        assert!(GridDescriptor::new(&kgds).is_err());

        let mut kgds = NAM;
        kgds[6] = 90000;
        assert!(GridDescriptor::new(&kgds).is_err());
    }
}
