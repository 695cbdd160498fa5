//! The batch driver: applies the projection handler of a grid description
//! to every point of a request
use crate::coordinate::Coor2D;
use crate::gds::GridDescriptor;
use crate::projection::{Handler, PointResult};
use crate::{Direction, Error};
use log::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Earth radius (m) of the legacy NCEP sphere
pub const EARTH_RADIUS: f64 = 6.3712e6;

// ----- S E T T I N G S ---------------------------------------------------------------

/// Run-time configuration of a [`ProjectionEngine`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Radius (m) of the spherical earth used for areas and plane distances
    pub earth_radius: f64,
    /// Smallest batch processed in parallel, when the `parallel` feature is on
    pub parallel_threshold: usize,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            earth_radius: EARTH_RADIUS,
            parallel_threshold: 4096,
        }
    }
}

// ----- R E Q U E S T S   A N D   R E S U L T S ---------------------------------------

/// A batch of points to transform, and the value reported for points that
/// cannot be transformed
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    pub direction: Direction,
    /// Grid index coordinates `(x, y)` for `Fwd`, `(lon, lat)` for `Inv`
    pub points: Vec<Coor2D>,
    pub fill: f64,
}

impl TransformRequest {
    pub fn new(direction: Direction, points: Vec<Coor2D>, fill: f64) -> TransformRequest {
        TransformRequest {
            direction,
            points,
            fill,
        }
    }

    /// Every point of `grid`, in storage order, in the forward direction
    pub fn whole_grid(grid: &GridDescriptor, fill: f64) -> TransformRequest {
        TransformRequest::new(Direction::Fwd, grid.grid_points(), fill)
    }
}

/// One [`PointResult`] per requested point, in request order
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    pub points: Vec<PointResult>,
    /// Number of points successfully transformed
    pub successes: usize,
}

// ----- T H E   E N G I N E -----------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectionEngine {
    settings: Settings,
}

impl ProjectionEngine {
    pub fn new(settings: Settings) -> ProjectionEngine {
        ProjectionEngine { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Transform all points of `request` on `grid`
    pub fn transform(&self, grid: &GridDescriptor, request: &TransformRequest) -> TransformResult {
        let mut points = vec![PointResult::filled(request.fill); request.points.len()];
        let successes = self.run(grid, request, &mut points);
        TransformResult { points, successes }
    }

    /// Transform all points of `request` on `grid`, into the caller owned
    /// `output`, which must hold exactly one slot per requested point.
    /// Returns the number of successes.
    pub fn transform_into(
        &self,
        grid: &GridDescriptor,
        request: &TransformRequest,
        output: &mut [PointResult],
    ) -> Result<usize, Error> {
        if output.len() != request.points.len() {
            return Err(Error::BufferSize {
                expected: request.points.len(),
                found: output.len(),
            });
        }
        Ok(self.run(grid, request, output))
    }

    fn run(&self, grid: &GridDescriptor, request: &TransformRequest, output: &mut [PointResult]) -> usize {
        let handler = Handler::new(grid, self.settings.earth_radius);
        trace!("{}: {handler:?}", grid.grid_type());

        let direction = request.direction;
        let frame = grid.vector_frame();
        let fill = request.fill;
        let handler = &handler;

        let point = move |(coord, out): (&Coor2D, &mut PointResult)| -> usize {
            match handler.point(direction, *coord, frame) {
                Some(result) => {
                    *out = result;
                    1
                }
                None => {
                    *out = PointResult::filled(fill);
                    0
                }
            }
        };

        let input = &request.points;

        #[cfg(feature = "parallel")]
        let successes: usize = if input.len() >= self.settings.parallel_threshold {
            input.par_iter().zip(output.par_iter_mut()).map(point).sum()
        } else {
            input.iter().zip(output.iter_mut()).map(point).sum()
        };

        #[cfg(not(feature = "parallel"))]
        let successes: usize = input.iter().zip(output.iter_mut()).map(point).sum();

        debug!(
            "{} {:?}: {successes} of {} points transformed",
            grid.grid_type(),
            direction,
            input.len()
        );
        successes
    }
}

/// Transform `request` on `grid` with the default settings
pub fn transform(grid: &GridDescriptor, request: &TransformRequest) -> TransformResult {
    ProjectionEngine::default().transform(grid, request)
}

// ----- T E S T S ---------------------------------------------------------------------
