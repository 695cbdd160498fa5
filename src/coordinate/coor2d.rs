use std::ops::{Index, IndexMut};

/// Generic 2D Coordinate tuple, with no fixed interpretation of the elements.
///
/// At the public boundary of the crate, a `Coor2D` is either a pair of
/// 1-based grid index coordinates `(x, y)`, or a pair of geographical
/// coordinates `(longitude, latitude)`, *in degrees*.
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Coor2D(pub [f64; 2]);

impl Index<usize> for Coor2D {
    type Output = f64;
    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl IndexMut<usize> for Coor2D {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.0[i]
    }
}

// ----- C O N S T R U C T O R S ---------------------------------------------

/// Constructors
impl Coor2D {
    /// A `Coor2D` from longitude/latitude, with the angular input in degrees
    #[must_use]
    pub fn gis(longitude: f64, latitude: f64) -> Coor2D {
        Coor2D([longitude, latitude])
    }

    /// A `Coor2D` from 1-based grid index coordinates
    #[must_use]
    pub fn grid(x: f64, y: f64) -> Coor2D {
        Coor2D([x, y])
    }

    /// A `Coor2D` consisting of 2 copies of `value`
    #[must_use]
    pub fn filled(value: f64) -> Coor2D {
        Coor2D([value, value])
    }

    /// A `Coor2D` consisting of 2 `NaN`s
    #[must_use]
    pub fn nan() -> Coor2D {
        Coor2D([f64::NAN, f64::NAN])
    }
}

// ----- A C C E S S O R S ---------------------------------------------------

impl Coor2D {
    #[must_use]
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    /// Alias for `x()`, when the tuple holds earth coordinates
    #[must_use]
    pub fn lon(&self) -> f64 {
        self.0[0]
    }

    /// Alias for `y()`, when the tuple holds earth coordinates
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.0[1]
    }

    /// Both elements finite (neither `NaN` nor infinite)?
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0[0].is_finite() && self.0[1].is_finite()
    }
}

// ----- T E S T S ---------------------------------------------------
