//! The projection handlers, and the per point results they produce
use crate::coordinate::Coor2D;
use crate::gds::{GridDescriptor, Projection, VectorFrame};
use crate::math::{angular, DPR};
use crate::Direction;

pub mod egrid;
pub mod equid;
pub mod gauss;
pub mod lcc;
pub mod merc;
pub mod rotll;
pub mod stere;

// ----- P E R   P O I N T   R E S U L T S ---------------------------------------------

/// The vector rotation coefficients of a grid point: the cosine and sine
/// of the clockwise angle from true north to the north of the projection
/// (or of the rotated graticule). That is the grid's positive y axis when
/// rows run northwards. The scanning direction does not enter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorRotation {
    pub cos: f64,
    pub sin: f64,
}

impl VectorRotation {
    /// Grid axes aligned with east and north
    pub const IDENTITY: VectorRotation = VectorRotation { cos: 1., sin: 0. };

    pub fn new(cos: f64, sin: f64) -> VectorRotation {
        VectorRotation { cos, sin }
    }

    /// From the rotation angle, in radians
    pub fn from_angle(angle: f64) -> VectorRotation {
        let (sin, cos) = angle.sin_cos();
        VectorRotation { cos, sin }
    }

    /// Earth relative components `(u, v)` to grid relative ones
    #[must_use]
    pub fn earth_to_grid(&self, u: f64, v: f64) -> (f64, f64) {
        (self.cos * u - self.sin * v, self.sin * u + self.cos * v)
    }

    /// Grid relative components `(u, v)` to earth relative ones
    #[must_use]
    pub fn grid_to_earth(&self, u: f64, v: f64) -> (f64, f64) {
        (self.cos * u + self.sin * v, -self.sin * u + self.cos * v)
    }
}

/// The map derivatives of a grid point: the partial derivatives of the
/// grid index coordinates with respect to longitude and latitude, in grid
/// units per degree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapJacobian {
    pub dx_dlon: f64,
    pub dx_dlat: f64,
    pub dy_dlon: f64,
    pub dy_dlat: f64,
}

impl MapJacobian {
    pub fn filled(value: f64) -> MapJacobian {
        MapJacobian {
            dx_dlon: value,
            dx_dlat: value,
            dy_dlon: value,
            dy_dlat: value,
        }
    }

    /// From the derivatives of the plane coordinates `(X, Y)` with respect to
    /// (λ, φ), in metres per radian, and the signed grid steps `dx`, `dy` (m)
    pub fn from_plane(
        dx_dlam: f64,
        dx_dphi: f64,
        dy_dlam: f64,
        dy_dphi: f64,
        dx: f64,
        dy: f64,
    ) -> MapJacobian {
        MapJacobian {
            dx_dlon: dx_dlam / (dx * DPR),
            dx_dlat: dx_dphi / (dx * DPR),
            dy_dlon: dy_dlam / (dy * DPR),
            dy_dlat: dy_dphi / (dy * DPR),
        }
    }

    pub fn determinant(&self) -> f64 {
        self.dx_dlon * self.dy_dlat - self.dx_dlat * self.dy_dlon
    }

    pub fn is_finite(&self) -> bool {
        self.dx_dlon.is_finite()
            && self.dx_dlat.is_finite()
            && self.dy_dlon.is_finite()
            && self.dy_dlat.is_finite()
    }
}

/// Everything computed for one point of a transformation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointResult {
    /// The transformed coordinate: (lon, lat) in the forward direction,
    /// (x, y) in the inverse
    pub coord: Coor2D,
    pub rotation: VectorRotation,
    pub jacobian: MapJacobian,
    /// Grid cell area, m²
    pub area: f64,
}

impl PointResult {
    /// A point which could not be transformed: every field set to `fill`
    pub fn filled(fill: f64) -> PointResult {
        PointResult {
            coord: Coor2D::filled(fill),
            rotation: VectorRotation::new(fill, fill),
            jacobian: MapJacobian::filled(fill),
            area: fill,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.coord.is_finite()
            && self.rotation.cos.is_finite()
            && self.rotation.sin.is_finite()
            && self.jacobian.is_finite()
            && self.area.is_finite()
    }
}

// ----- T H E   H A N D L E R   I N T E R F A C E -------------------------------------

/// Slack (in grid lengths) of the domain edges
pub const EDGE_TOLERANCE: f64 = 1e-9;

/// The valid part of the grid index plane: the grid itself, extended by a
/// halo of one grid length on all sides. Grids closing on themselves around
/// the globe get one additional column to the east, covering the gap
/// between the last and the (repeated) first column.
///
/// The edges are fuzzy by `EDGE_TOLERANCE` grid lengths, so inverse
/// results for points on the edge survive their own rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Domain {
    pub fn new(im: usize, jm: usize) -> Domain {
        Domain {
            xmin: 0.,
            xmax: im as f64 + 1.,
            ymin: 0.,
            ymax: jm as f64 + 1.,
        }
    }

    #[must_use]
    pub fn wrapping(self) -> Domain {
        Domain {
            xmax: self.xmax + 1.,
            ..self
        }
    }

    /// NaN coordinates are never contained
    pub fn contains(&self, grid: Coor2D) -> bool {
        let t = EDGE_TOLERANCE;
        (self.xmin - t..=self.xmax + t).contains(&grid.x())
            && (self.ymin - t..=self.ymax + t).contains(&grid.y())
    }
}

/// The uniform interface of the projection handlers. All angles in degrees,
/// longitudes returned in [0, 360).
pub trait GridProjection {
    /// Grid index coordinates to (lon, lat), or `None` outside of the domain
    fn fwd(&self, grid: Coor2D) -> Option<Coor2D>;

    /// (lon, lat) to grid index coordinates, or `None` outside of the domain
    fn inv(&self, geo: Coor2D) -> Option<Coor2D>;

    /// Rotation coefficients of the grid axes at `geo`
    fn rotation(&self, _geo: Coor2D) -> VectorRotation {
        VectorRotation::IDENTITY
    }

    /// Map derivatives at the point given both as `grid` and as `geo`
    fn jacobian(&self, grid: Coor2D, geo: Coor2D) -> MapJacobian;

    /// Grid cell area (m²) at the point given both as `grid` and as `geo`
    fn area(&self, grid: Coor2D, geo: Coor2D) -> f64;
}

/// The closed set of projection handlers, instantiated from a grid
/// descriptor and an earth radius
#[derive(Debug)]
pub enum Handler<'a> {
    Equid(equid::Equid),
    Merc(merc::Merc),
    Lcc(lcc::Lcc),
    Gauss(gauss::Gauss<'a>),
    Stere(stere::Stere),
    Egrid(egrid::Egrid),
    Rotll(rotll::Rotll),
}

impl<'a> Handler<'a> {
    pub fn new(grid: &'a GridDescriptor, radius: f64) -> Handler<'a> {
        match grid.projection() {
            Projection::EquidistantCylindrical(p) => Handler::Equid(equid::Equid::new(p, grid, radius)),
            Projection::Mercator(p) => Handler::Merc(merc::Merc::new(p, grid, radius)),
            Projection::LambertConformal(p) => Handler::Lcc(lcc::Lcc::new(p, grid, radius)),
            Projection::Gaussian(p) => Handler::Gauss(gauss::Gauss::new(p, grid, radius)),
            Projection::PolarStereographic(p) => Handler::Stere(stere::Stere::new(p, grid, radius)),
            Projection::RotatedEGrid(p) => Handler::Egrid(egrid::Egrid::new(p, grid, radius)),
            Projection::RotatedLatLon(p) => Handler::Rotll(rotll::Rotll::new(p, grid, radius)),
        }
    }

    fn projection(&self) -> &dyn GridProjection {
        match self {
            Handler::Equid(h) => h,
            Handler::Merc(h) => h,
            Handler::Lcc(h) => h,
            Handler::Gauss(h) => h,
            Handler::Stere(h) => h,
            Handler::Egrid(h) => h,
            Handler::Rotll(h) => h,
        }
    }

    /// Transform a single point, and compute its auxiliaries. `None` if the
    /// point is outside of the domain, or any of the results is not finite.
    pub fn point(&self, direction: Direction, input: Coor2D, frame: VectorFrame) -> Option<PointResult> {
        let p = self.projection();
        let (grid, geo) = match direction {
            Direction::Fwd => (input, p.fwd(input)?),
            Direction::Inv => {
                if !(input.lon().abs() <= 360. && input.lat().abs() <= 90.) {
                    return None;
                }
                let geo = Coor2D::gis(angular::normalize_positive(input.lon()), input.lat());
                (p.inv(geo)?, geo)
            }
        };

        let rotation = match frame {
            VectorFrame::Grid => p.rotation(geo),
            VectorFrame::Earth => VectorRotation::IDENTITY,
        };

        let result = PointResult {
            coord: if direction == Direction::Fwd { geo } else { grid },
            rotation,
            jacobian: p.jacobian(grid, geo),
            area: p.area(grid, geo),
        };

        (result.is_finite() && result.area > 0.).then_some(result)
    }
}

// ----- C Y L I N D R I C A L   H E L P E R S -----------------------------------------

/// Signed longitude increment of a cylindrical grid with `im` columns,
/// running from `lon_1` to `lon_2` in the direction `hi`. Coinciding first
/// and last longitudes mean a full turn.
pub fn cylindrical_increment(lon_1: f64, lon_2: f64, im: usize, hi: f64) -> f64 {
    hi * ((hi * (lon_2 - lon_1) - 1.).rem_euclid(360.) + 1.) / (im as f64 - 1.)
}

/// Does a grid with `im` columns, `dlon` apart, close on itself around the globe?
pub fn is_global(im: usize, dlon: f64) -> bool {
    (360. / dlon.abs()).round() == im as f64
}

/// The (fractional) column of `lon` in a cylindrical grid, unwrapped to
/// the period closest to the domain
pub fn cylindrical_column(lon: f64, lon_1: f64, dlon: f64, domain: &Domain) -> f64 {
    let period = 360. / dlon.abs();
    let x = 1. + angular::normalize_positive(dlon.signum() * (lon - lon_1)) / dlon.abs();
    if x > domain.xmax && x - period >= domain.xmin {
        return x - period;
    }
    x
}

// ----- T E S T S ---------------------------------------------------------------------
