//! The grid description: decoding and validation of the legacy integer
//! encoded Grid Description Section (GDS).
//! See [WMO, 2019](crate::Bibliography::Wmo19).
use crate::coordinate::Coor2D;
use crate::math::angular;
use crate::projection::{egrid, equid, gauss, lcc, merc, rotll, stere};
use crate::Error;
use log::{trace, warn};
use std::fmt;

mod parameter;
mod parsed_parameters;

pub use parameter::*;
pub use parsed_parameters::ParsedParameters;

// ----- G R I D   T Y P E S -----------------------------------------------------------

/// The grid types (projections) supported, tagged by their legacy
/// data representation type code (slot 1 of the grid description)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GridType {
    /// Code 0: Plain latitude-longitude grid
    EquidistantCylindrical,
    /// Code 1
    Mercator,
    /// Code 3
    LambertConformal,
    /// Code 4: Gaussian latitudes, equidistant longitudes
    Gaussian,
    /// Code 5
    PolarStereographic,
    /// Code 203: Rotated latitude-longitude Arakawa E-grid, with the
    /// mass and wind points staggered along the rows
    RotatedEGrid,
    /// Code 205: Rotated latitude-longitude grid, defined by its corners
    RotatedLatLon,
}

impl GridType {
    /// The legacy data representation type code
    pub fn code(self) -> i32 {
        match self {
            GridType::EquidistantCylindrical => 0,
            GridType::Mercator => 1,
            GridType::LambertConformal => 3,
            GridType::Gaussian => 4,
            GridType::PolarStereographic => 5,
            GridType::RotatedEGrid => 203,
            GridType::RotatedLatLon => 205,
        }
    }

    pub fn from_code(code: i32) -> Option<GridType> {
        BUILTIN_GRIDS
            .iter()
            .find(|g| g.0.code() == code)
            .map(|g| g.0)
    }
}

impl TryFrom<i32> for GridType {
    type Error = Error;
    fn try_from(code: i32) -> Result<GridType, Error> {
        GridType::from_code(code).ok_or_else(|| {
            warn!("Unsupported grid type {code}");
            Error::InvalidGridDescription(format!("unsupported grid type {code}"))
        })
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

// ----- P R O J E C T I O N S ---------------------------------------------------------

/// The projection specific part of a grid description: one case per
/// supported grid type, holding the decoded, floating point parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    EquidistantCylindrical(equid::EquidistantCylindrical),
    Mercator(merc::Mercator),
    LambertConformal(lcc::LambertConformal),
    Gaussian(gauss::Gaussian),
    PolarStereographic(stere::PolarStereographic),
    RotatedEGrid(egrid::RotatedEGrid),
    RotatedLatLon(rotll::RotatedLatLon),
}

impl Projection {
    pub fn grid_type(&self) -> GridType {
        match self {
            Projection::EquidistantCylindrical(_) => GridType::EquidistantCylindrical,
            Projection::Mercator(_) => GridType::Mercator,
            Projection::LambertConformal(_) => GridType::LambertConformal,
            Projection::Gaussian(_) => GridType::Gaussian,
            Projection::PolarStereographic(_) => GridType::PolarStereographic,
            Projection::RotatedEGrid(_) => GridType::RotatedEGrid,
            Projection::RotatedLatLon(_) => GridType::RotatedLatLon,
        }
    }
}

// ----- B U I L T I N   G R I D S -----------------------------------------------------

/// Blueprint for the projection specific decoding of a grid description.
///
/// GdsDecoder needs to be a newtype, rather than a type alias, since we
/// must implement the Debug-trait for GdsDecoder.
pub struct GdsDecoder(pub fn(params: &ParsedParameters) -> Result<Projection, Error>);

// Cannot autoderive the Debug trait
impl fmt::Debug for GdsDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GdsDecoder")
    }
}

// Install new grid types by adding them to the `GridType` and `Projection`
// enums, and to the `BUILTIN_GRIDS` table below
#[rustfmt::skip]
static BUILTIN_GRIDS: [(GridType, &[GdsParameter], GdsDecoder); 7] = [
    (GridType::EquidistantCylindrical, &equid::GAMUT, GdsDecoder(equid::decode)),
    (GridType::Mercator,               &merc::GAMUT,  GdsDecoder(merc::decode)),
    (GridType::LambertConformal,       &lcc::GAMUT,   GdsDecoder(lcc::decode)),
    (GridType::Gaussian,               &gauss::GAMUT, GdsDecoder(gauss::decode)),
    (GridType::PolarStereographic,     &stere::GAMUT, GdsDecoder(stere::decode)),
    (GridType::RotatedEGrid,           &egrid::GAMUT, GdsDecoder(egrid::decode)),
    (GridType::RotatedLatLon,          &rotll::GAMUT, GdsDecoder(rotll::decode)),
];

fn builtin(grid_type: GridType) -> Result<&'static (GridType, &'static [GdsParameter], GdsDecoder), Error> {
    BUILTIN_GRIDS
        .iter()
        .find(|g| g.0 == grid_type)
        .ok_or_else(|| Error::InvalidGridDescription(format!("no decoder for {grid_type}")))
}

// ----- F L A G S ---------------------------------------------------------------------

/// The frame of reference of vector components on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFrame {
    /// Components resolved relative to easterly and northerly directions
    Earth,
    /// Components resolved relative to the grid's x and y directions
    Grid,
}

/// The figure of the earth, as flagged by the grid description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarthShape {
    Spherical,
    /// Accepted, but handled as spherical
    Oblate,
}

/// The decoded scanning mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanMode {
    /// Points along a row run towards the west (or the negative x direction)
    pub negative_i: bool,
    /// Rows run towards the north (or the positive y direction)
    pub positive_j: bool,
    /// Points are stored column by column, rather than row by row
    pub j_consecutive: bool,
}

impl ScanMode {
    pub fn from_flags(flags: i32) -> ScanMode {
        ScanMode {
            negative_i: flags & SCAN_NEGATIVE_I != 0,
            positive_j: flags & SCAN_POSITIVE_J != 0,
            j_consecutive: flags & SCAN_J_CONSECUTIVE != 0,
        }
    }

    /// Sign of the grid increment along a row
    pub fn hi(&self) -> f64 {
        if self.negative_i {
            -1.
        } else {
            1.
        }
    }

    /// Sign of the grid increment along a column
    pub fn hj(&self) -> f64 {
        if self.positive_j {
            1.
        } else {
            -1.
        }
    }
}

// ----- T H E   G R I D   D E S C R I P T O R -----------------------------------------

/// A decoded and validated grid description. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDescriptor {
    im: usize,
    jm: usize,
    scan: ScanMode,
    vector_frame: VectorFrame,
    earth_shape: EarthShape,
    projection: Projection,
}

impl GridDescriptor {
    /// Decode and validate the legacy integer encoded grid description `kgds`.
    ///
    /// Slot 1 holds the grid type code, slots 2 and 3 the number of points
    /// along a row and along a column, slot 6 the resolution and component
    /// flags, and slot 11 the scanning mode. The remaining slots are grid
    /// type specific, and described by the `GAMUT` of each projection.
    pub fn new(kgds: &[i32]) -> Result<GridDescriptor, Error> {
        let Some(&code) = kgds.first() else {
            warn!("Empty grid description");
            return Err(Error::InvalidGridDescription(String::from(
                "empty grid description",
            )));
        };

        let grid_type = GridType::try_from(code)?;
        let (_, gamut, decoder) = builtin(grid_type)?;
        let params = ParsedParameters::new(kgds, grid_type, gamut)?;
        let projection = decoder.0(&params)?;

        let im = params.natural("im")?;
        let jm = params.natural("jm")?;
        let scan = ScanMode::from_flags(params.flags("scan")?);

        let vector_frame = if params.bit("resolution", RESOLUTION_GRID_RELATIVE)? {
            VectorFrame::Grid
        } else {
            VectorFrame::Earth
        };

        let earth_shape = if params.bit("resolution", RESOLUTION_OBLATE_EARTH)? {
            warn!("{grid_type}: oblate earth flagged, computing on the sphere");
            EarthShape::Oblate
        } else {
            EarthShape::Spherical
        };

        trace!("Decoded {grid_type}: {im}x{jm}, {scan:?}, {vector_frame:?}");
        Ok(GridDescriptor {
            im,
            jm,
            scan,
            vector_frame,
            earth_shape,
            projection,
        })
    }

    pub fn grid_type(&self) -> GridType {
        self.projection.grid_type()
    }

    /// Number of points along a row
    pub fn im(&self) -> usize {
        self.im
    }

    /// Number of points along a column
    pub fn jm(&self) -> usize {
        self.jm
    }

    /// Total number of grid points
    pub fn npts(&self) -> usize {
        self.im * self.jm
    }

    pub fn scan(&self) -> ScanMode {
        self.scan
    }

    pub fn vector_frame(&self) -> VectorFrame {
        self.vector_frame
    }

    pub fn earth_shape(&self) -> EarthShape {
        self.earth_shape
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The 1-based grid index coordinates of all grid points, in storage
    /// order (i.e. row by row, unless the scanning mode says otherwise)
    pub fn grid_points(&self) -> Vec<Coor2D> {
        let mut points = Vec::with_capacity(self.npts());
        if self.scan.j_consecutive {
            for i in 1..=self.im {
                for j in 1..=self.jm {
                    points.push(Coor2D::grid(i as f64, j as f64));
                }
            }
        } else {
            for j in 1..=self.jm {
                for i in 1..=self.im {
                    points.push(Coor2D::grid(i as f64, j as f64));
                }
            }
        }
        points
    }
}

/// Helper for the projection specific decoders: A grid description
/// error, logged at the point of rejection
pub fn invalid(grid_type: GridType, reason: &str) -> Error {
    warn!("{grid_type}: {reason}");
    Error::InvalidGridDescription(format!("{grid_type}: {reason}"))
}

/// Helper for the projection specific decoders: Check that the grid has
/// at least `minimum` points along each axis
pub fn require_extent(params: &ParsedParameters, minimum: usize) -> Result<(), Error> {
    let im = params.natural("im")?;
    let jm = params.natural("jm")?;
    if im < minimum || jm < minimum {
        return Err(invalid(
            params.grid_type,
            &format!("needs at least {minimum}x{minimum} points, got {im}x{jm}"),
        ));
    }
    Ok(())
}

/// Helper for the projection specific decoders: Check that a latitude is
/// strictly off the poles
pub fn require_off_pole(params: &ParsedParameters, key: &str) -> Result<f64, Error> {
    let lat = params.real(key)?;
    if lat.abs() >= 90. {
        return Err(invalid(params.grid_type, &format!("|{key}| should be < 90°")));
    }
    Ok(lat)
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // The 12 km NCEP North American rotated lat/lon grid
    const NAM: [i32; 13] = [
        205, 251, 201, -7446, -144139, 8, 54000, -106000, 0, 0, 64, 44560, 14744,
    ];

    #[test]
    fn codes() -> Result<(), Error> {
        for code in [0, 1, 3, 4, 5, 203, 205] {
            assert_eq!(GridType::try_from(code)?.code(), code);
        }
        assert!(GridType::from_code(2).is_none());
        assert!(GridType::from_code(-1).is_none());
        assert!(matches!(
            GridType::try_from(206),
            Err(Error::InvalidGridDescription(_))
        ));
        Ok(())
    }

    #[test]
    fn descriptor() -> Result<(), Error> {
        let grid = GridDescriptor::new(&NAM)?;
        assert_eq!(grid.grid_type(), GridType::RotatedLatLon);
        assert_eq!(grid.im(), 251);
        assert_eq!(grid.jm(), 201);
        assert_eq!(grid.npts(), 251 * 201);
        assert_eq!(grid.vector_frame(), VectorFrame::Grid);
        assert_eq!(grid.earth_shape(), EarthShape::Spherical);
        assert!(grid.scan().positive_j);
        assert!(!grid.scan().negative_i);

        let Projection::RotatedLatLon(p) = grid.projection() else {
            panic!("Expected a rotated lat/lon projection");
        };
        assert_eq!(p.lat_1, -7.446);
        assert_eq!(p.lon_1, angular::normalize_positive(-144.139));
        assert_eq!(p.lat_0, 54.);
        assert_eq!(p.lon_0, 254.);
        assert_eq!(p.lat_2, 44.56);
        assert_eq!(p.lon_2, 14.744);
        Ok(())
    }

    #[test]
    fn rejections() {
        // Unsupported grid type
        let mut kgds = NAM;
        kgds[0] = 2;
        assert!(matches!(
            GridDescriptor::new(&kgds),
            Err(Error::InvalidGridDescription(_))
        ));

        // Empty and truncated descriptions
        assert!(GridDescriptor::new(&[]).is_err());
        assert!(GridDescriptor::new(&NAM[..12]).is_err());

        // Non-positive dimensions
        let mut kgds = NAM;
        kgds[1] = 0;
        assert!(GridDescriptor::new(&kgds).is_err());
        let mut kgds = NAM;
        kgds[2] = -201;
        assert!(GridDescriptor::new(&kgds).is_err());

        // Illegal flag bits
        let mut kgds = NAM;
        kgds[5] = 8 | 1;
        assert!(GridDescriptor::new(&kgds).is_err());
        let mut kgds = NAM;
        kgds[10] = 64 | 256;
        assert!(GridDescriptor::new(&kgds).is_err());

        // Rotation centre out of range
        let mut kgds = NAM;
        kgds[7] = 400000;
        assert!(GridDescriptor::new(&kgds).is_err());
        let mut kgds = NAM;
        kgds[6] = 90000;
        assert!(GridDescriptor::new(&kgds).is_err());
    }

    #[test]
    fn grid_points() -> Result<(), Error> {
        let kgds = [0, 3, 2, 0, 0, 0, 1000, 2000, 1000, 1000, 64];
        let grid = GridDescriptor::new(&kgds)?;
        let points = grid.grid_points();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], Coor2D::grid(1., 1.));
        assert_eq!(points[1], Coor2D::grid(2., 1.));
        assert_eq!(points[3], Coor2D::grid(1., 2.));

        // Column by column
        let kgds = [0, 3, 2, 0, 0, 0, 1000, 2000, 1000, 1000, 64 | 32];
        let grid = GridDescriptor::new(&kgds)?;
        let points = grid.grid_points();
        assert_eq!(points[1], Coor2D::grid(1., 2.));
        assert_eq!(points[2], Coor2D::grid(2., 1.));
        Ok(())
    }

    #[test]
    fn oblate_earth_is_accepted() -> Result<(), Error> {
        let kgds = [0, 3, 2, 0, 0, 64, 1000, 2000, 1000, 1000, 64];
        let grid = GridDescriptor::new(&kgds)?;
        assert_eq!(grid.earth_shape(), EarthShape::Oblate);
        assert_eq!(grid.vector_frame(), VectorFrame::Earth);
        Ok(())
    }
}
