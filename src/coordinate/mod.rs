//! Coordinate tuples for grid index and earth coordinates

mod coor2d;
pub use coor2d::Coor2D;
