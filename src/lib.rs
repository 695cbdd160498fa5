//! *Grid index to earth coordinate transformations for numerical weather
//! prediction post processing*.
//!
//! Grids, not maps
//! ===============
//!
//! A model grid is described by a compact, legacy encoded *Grid Description
//! Section* (GDS): a flat array of scaled integers naming the projection,
//! the grid dimensions, and the georeferencing of the first (and sometimes
//! last) grid point. From that description, this crate converts between
//! 1-based grid index coordinates `(x, y)` and geographical coordinates
//! `(longitude, latitude)` in degrees, in both directions, and computes
//! the per point auxiliaries needed for vector field handling:
//!
//! - the vector rotation coefficients, turning grid relative wind
//!   components into earth relative ones and back,
//! - the map derivatives, i.e. the partial derivatives of the grid
//!   coordinates with respect to longitude and latitude,
//! - a representative grid cell area.
//!
//! Usage
//! -----
//!
//! ```
//! use gridgeom::prelude::*;
//!
//! fn main() -> Result<(), Error> {
//!     // A 1 degree global latitude-longitude grid, north to south
//!     let kgds = [0, 360, 181, 90000, 0, 128, -90000, -1000, 1000, 1000, 0];
//!     let grid = GridDescriptor::new(&kgds)?;
//!
//!     let request = TransformRequest::new(Fwd, vec![Coor2D::grid(1., 1.)], -9999.);
//!     let result = transform(&grid, &request);
//!     assert_eq!(result.successes, 1);
//!     assert_eq!(result.points[0].coord.lat(), 90.);
//!     Ok(())
//! }
//! ```
//!
//! Points that cannot be transformed are not errors: they are reported
//! through the caller supplied fill value and the success count. Errors are
//! reserved for malformed grid descriptions, which are caught when the
//! [`GridDescriptor`](gds::GridDescriptor) is constructed.

/// The bread-and-butter, shrink-wrapped and ready to use
pub mod prelude {
    pub use crate::coordinate::Coor2D;
    pub use crate::engine::transform;
    pub use crate::engine::ProjectionEngine;
    pub use crate::engine::Settings;
    pub use crate::engine::TransformRequest;
    pub use crate::engine::TransformResult;
    pub use crate::gds::GridDescriptor;
    pub use crate::gds::GridType;
    pub use crate::gds::Projection;
    pub use crate::projection::MapJacobian;
    pub use crate::projection::PointResult;
    pub use crate::projection::VectorRotation;
    pub use crate::Direction;
    pub use crate::Direction::Fwd;
    pub use crate::Direction::Inv;
    pub use crate::Error;
}

/// Preamble for projection handler modules
pub mod authoring {
    pub use crate::prelude::*;

    pub use crate::gds::GdsDecoder;
    pub use crate::gds::GdsParameter;
    pub use crate::gds::ParsedParameters;
    pub use crate::gds::ScanMode;
    pub use crate::math::*;
    pub use crate::projection::Domain;
    pub use crate::projection::GridProjection;

    pub use log::debug;
    pub use log::trace;
    pub use log::warn;
}

mod bibliography;
pub use bibliography::Bibliography;

pub mod coordinate;
pub mod engine;
pub mod gds;
pub mod math;
pub mod projection;

use thiserror::Error;

/// The *Rust Gridgeom* errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid grid description: {0}")]
    InvalidGridDescription(String),

    #[error("output buffer holds {found} points, but the request has {expected}")]
    BufferSize { expected: usize, found: usize },

    #[error("error: {0}")]
    General(&'static str),
}

/// `Fwd`: Indicate that a two-way operation should run in the *forward*
/// direction, i.e. from grid index coordinates to earth coordinates.
/// `Inv`: Indicate that a two-way operation should run in the *inverse*
/// direction, i.e. from earth coordinates to grid index coordinates.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
    Fwd,
    Inv,
}
