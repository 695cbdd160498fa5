//! Gaussian grids (type 4): equidistant longitudes, Gaussian latitudes
use super::{cylindrical_column, cylindrical_increment, is_global, MapJacobian};
use crate::authoring::*;
use crate::gds::{invalid, require_extent, RESOLUTION_MASK, SCAN_MASK, SCAN_POSITIVE_J};
use crate::math::gaussian::{gaussian_latitudes, GaussianLatitudes};

/// Largest accepted distance (degrees) between the first latitude given,
/// and the Gaussian latitude it is taken to represent
const LATITUDE_TOLERANCE: f64 = 0.01;

// ----- C O N S T R U C T O R ---------------------------------------------------------

#[rustfmt::skip]
pub const GAMUT: [GdsParameter; 9] = [
    GdsParameter::Count     { key: "im",         slot: 2 },
    GdsParameter::Count     { key: "jm",         slot: 3 },
    GdsParameter::Latitude  { key: "lat_1",      slot: 4 },
    GdsParameter::Longitude { key: "lon_1",      slot: 5 },
    GdsParameter::Flags     { key: "resolution", slot: 6, mask: RESOLUTION_MASK },
    GdsParameter::Latitude  { key: "lat_2",      slot: 7 },
    GdsParameter::Longitude { key: "lon_2",      slot: 8 },
    GdsParameter::Count     { key: "n",          slot: 10 },
    GdsParameter::Flags     { key: "scan",       slot: 11, mask: SCAN_MASK },
];

/// First and last longitude (degrees), the Gaussian latitude table for
/// `2n` latitude circles, and the (0-based, north to south) table index of
/// the first row of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Gaussian {
    pub lon_1: f64,
    pub lon_2: f64,
    pub first_row: usize,
    pub table: GaussianLatitudes,
}

pub fn decode(params: &ParsedParameters) -> Result<Projection, Error> {
    let grid_type = params.grid_type;
    require_extent(params, 2)?;
    let jm = params.natural("jm")?;
    let jg = 2 * params.natural("n")?;
    let table = gaussian_latitudes(jg).map_err(|e| invalid(grid_type, &e.to_string()))?;

    // Locate the first row in the table
    let lat_1 = params.real("lat_1")?;
    let Some((first_row, offset)) = table
        .latitudes
        .iter()
        .map(|lat| (lat - lat_1).abs())
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
    else {
        return Err(invalid(grid_type, "empty Gaussian latitude table"));
    };
    if offset > LATITUDE_TOLERANCE {
        return Err(invalid(grid_type, &format!("{lat_1} is not a Gaussian latitude")));
    }

    // Rows running northwards go towards the start of the table
    let last_row = if params.bit("scan", SCAN_POSITIVE_J)? {
        first_row.checked_sub(jm - 1)
    } else {
        Some(first_row + jm - 1).filter(|&row| row < jg)
    };
    let Some(last_row) = last_row else {
        return Err(invalid(grid_type, &format!("{jm} rows exceed the {jg} Gaussian latitudes")));
    };

    let lat_2 = params.real("lat_2")?;
    if (table.latitudes[last_row] - lat_2).abs() > LATITUDE_TOLERANCE {
        warn!(
            "{grid_type}: last latitude {lat_2} taken as {}",
            table.latitudes[last_row]
        );
    }

    Ok(Projection::Gaussian(Gaussian {
        lon_1: params.real("lon_1")?,
        lon_2: params.real("lon_2")?,
        first_row,
        table,
    }))
}

// ----- H A N D L E R -----------------------------------------------------------------

#[derive(Debug)]
pub struct Gauss<'a> {
    weights: &'a [f64],
    /// The Gaussian latitudes, padded with the north and south poles
    padded: Vec<f64>,
    /// Position in the padded table of the first row
    p_1: f64,
    /// Step in the padded table per grid row
    dir: f64,
    lon_1: f64,
    dlon: f64,
    domain: Domain,
    radius: f64,
}

impl<'a> Gauss<'a> {
    pub fn new(p: &'a Gaussian, grid: &GridDescriptor, radius: f64) -> Gauss<'a> {
        let mut padded = Vec::with_capacity(p.table.latitudes.len() + 2);
        padded.push(90.);
        padded.extend_from_slice(&p.table.latitudes);
        padded.push(-90.);

        let dlon = cylindrical_increment(p.lon_1, p.lon_2, grid.im(), grid.scan().hi());
        let mut domain = Domain::new(grid.im(), grid.jm());
        if is_global(grid.im(), dlon) {
            domain = domain.wrapping();
        }

        Gauss {
            weights: &p.table.weights,
            padded,
            p_1: (p.first_row + 1) as f64,
            dir: -grid.scan().hj(),
            lon_1: p.lon_1,
            dlon,
            domain,
            radius,
        }
    }

    /// Number of real (unpadded) latitudes
    fn jg(&self) -> usize {
        self.padded.len() - 2
    }

    /// Position in the padded table of the grid row `y`
    fn position(&self, y: f64) -> f64 {
        self.p_1 + self.dir * (y - 1.)
    }

    /// The table segment `[k, k+1]` holding the position `p`
    fn segment(&self, p: f64) -> usize {
        (p.max(0.).floor() as usize).min(self.jg())
    }
}

impl<'a> GridProjection for Gauss<'a> {
    fn fwd(&self, grid: Coor2D) -> Option<Coor2D> {
        if !self.domain.contains(grid) {
            return None;
        }
        // Within the domain, the position is inside the padded table, up to
        // the edge tolerance
        let p = self.position(grid.y()).clamp(0., (self.jg() + 1) as f64);
        let k = self.segment(p);
        let (north, south) = (self.padded[k], self.padded[k + 1]);
        let lat = north + (p - k as f64) * (south - north);
        let lon = angular::normalize_positive(self.lon_1 + self.dlon * (grid.x() - 1.));
        Some(Coor2D::gis(lon, lat))
    }

    fn inv(&self, geo: Coor2D) -> Option<Coor2D> {
        let lat = geo.lat();
        if lat.abs() > 90. {
            return None;
        }
        let k = self
            .padded
            .partition_point(|&l| l >= lat)
            .saturating_sub(1)
            .min(self.jg());
        let (north, south) = (self.padded[k], self.padded[k + 1]);
        let p = k as f64 + (lat - north) / (south - north);

        let x = cylindrical_column(geo.lon(), self.lon_1, self.dlon, &self.domain);
        let y = 1. + (p - self.p_1) / self.dir;
        let grid = Coor2D::grid(x, y);
        self.domain.contains(grid).then_some(grid)
    }

    fn jacobian(&self, grid: Coor2D, _geo: Coor2D) -> MapJacobian {
        let k = self.segment(self.position(grid.y()));
        let slope = self.padded[k + 1] - self.padded[k];
        MapJacobian {
            dx_dlon: 1. / self.dlon,
            dx_dlat: 0.,
            dy_dlon: 0.,
            dy_dlat: self.dir / slope,
        }
    }

    fn area(&self, grid: Coor2D, _geo: Coor2D) -> f64 {
        let row = self.position(grid.y()).round().clamp(1., self.jg() as f64) as usize;
        self.radius * self.radius * self.weights[row - 1] * self.dlon.abs().to_radians()
    }
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Handler;
    use float_eq::assert_float_eq;

    const R: f64 = 6.3712e6;

    // T62: 192 x 94, north to south
    const T62: [i32; 11] = [4, 192, 94, 88542, 0, 128, -88542, 358125, 1875, 47, 0];

    // The southern half of T62, south to north
    const SOUTH: [i32; 11] = [4, 192, 47, -88542, 0, 128, -952, 358125, 1875, 47, 64];

    #[test]
    fn rows_on_gaussian_latitudes() -> Result<(), Error> {
        let grid = GridDescriptor::new(&T62)?;
        let Projection::Gaussian(p) = grid.projection() else {
            panic!("Expected a Gaussian projection");
        };
        assert_eq!(p.first_row, 0);
        let latitudes = p.table.latitudes.clone();

        let Handler::Gauss(h) = Handler::new(&grid, R) else {
            panic!("Expected a Gaussian handler");
        };
        for j in [1, 2, 47, 48, 94] {
            let geo = h.fwd(Coor2D::grid(1., j as f64)).unwrap();
            assert_float_eq!(geo.lat(), latitudes[j - 1], abs <= 1e-12);
        }
        let geo = h.fwd(Coor2D::grid(192., 1.)).unwrap();
        assert_float_eq!(geo.lon(), 358.125, abs <= 1e-12);

        // The halo rows reach the poles
        assert_eq!(h.fwd(Coor2D::grid(1., 0.)).unwrap().lat(), 90.);
        assert_float_eq!(h.fwd(Coor2D::grid(1., 95.)).unwrap().lat(), -90., abs <= 1e-12);
        let xy = h.inv(Coor2D::gis(0., -90.)).unwrap();
        assert_float_eq!(xy.y(), 95., abs <= 1e-12);

        for (x, y) in [(1., 1.), (17.5, 0.25), (192., 94.), (192.5, 47.5), (100., 94.75)] {
            let geo = h.fwd(Coor2D::grid(x, y)).unwrap();
            let xy = h.inv(geo).unwrap();
            assert_float_eq!(xy.x(), x, abs <= 1e-9);
            assert_float_eq!(xy.y(), y, abs <= 1e-9);
        }
        Ok(())
    }

    #[test]
    fn south_to_north() -> Result<(), Error> {
        let grid = GridDescriptor::new(&SOUTH)?;
        let Handler::Gauss(h) = Handler::new(&grid, R) else {
            panic!("Expected a Gaussian handler");
        };
        let first = h.fwd(Coor2D::grid(1., 1.)).unwrap();
        let last = h.fwd(Coor2D::grid(1., 47.)).unwrap();
        assert_float_eq!(first.lat(), -88.542, abs <= 1e-3);
        assert!(last.lat() < 0. && last.lat() > -1.);
        assert_float_eq!(h.fwd(Coor2D::grid(1., 0.)).unwrap().lat(), -90., abs <= 1e-12);

        // The northern hemisphere is outside, except for the halo row
        assert!(h.inv(Coor2D::gis(0., 45.)).is_none());

        let jac = h.jacobian(Coor2D::grid(1., 10.), first);
        assert!(jac.dy_dlat > 0.);
        Ok(())
    }

    #[test]
    fn auxiliaries() -> Result<(), Error> {
        let grid = GridDescriptor::new(&T62)?;
        let Handler::Gauss(h) = Handler::new(&grid, R) else {
            panic!("Expected a Gaussian handler");
        };

        // Within a segment, the map derivative is the inverse latitude spacing
        let a = h.fwd(Coor2D::grid(1., 20.)).unwrap();
        let b = h.fwd(Coor2D::grid(1., 21.)).unwrap();
        let jac = h.jacobian(Coor2D::grid(1., 20.5), a);
        assert_float_eq!(jac.dy_dlat, 1. / (b.lat() - a.lat()), rmax <= 1e-12);
        assert_float_eq!(jac.dx_dlon, 1. / 1.875, rmax <= 1e-15);

        // The cells tile the sphere
        let mut total = 0.;
        for j in 1..=94 {
            let grid_point = Coor2D::grid(1., j as f64);
            let geo = h.fwd(grid_point).unwrap();
            total += 192. * h.area(grid_point, geo);
        }
        let sphere = 4. * std::f64::consts::PI * R * R;
        assert_float_eq!(total, sphere, rmax <= 1e-12);
        Ok(())
    }

    #[test]
    fn rejections() {
        // Not a Gaussian latitude
        let mut kgds = T62;
        kgds[3] = 88000;
        assert!(GridDescriptor::new(&kgds).is_err());

        // More rows than latitudes
        let mut kgds = T62;
        kgds[2] = 95;
        assert!(GridDescriptor::new(&kgds).is_err());
        let mut kgds = SOUTH;
        kgds[2] = 95;
        assert!(GridDescriptor::new(&kgds).is_err());

        // No latitude circles
        let mut kgds = T62;
        kgds[9] = 0;
        assert!(GridDescriptor::new(&kgds).is_err());
    }
}
