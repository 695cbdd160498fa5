#![allow(dead_code)]

/// Some literature, that has been useful in designing and implementing this library.
pub enum Bibliography {
    /// A. Arakawa and V.R. Lamb, 1977: *Computational design of the basic dynamical
    /// processes of the UCLA general circulation model*.
    /// Methods in Computational Physics 17, pp. 173–265.
    /// [DOI](https://doi.org/10.1016/B978-0-12-460817-7.50009-4)
    /// (The origin of the A through E grid staggering nomenclature).
    Ara77,

    /// W.H. Press, S.A. Teukolsky, W.T. Vetterling and B.P. Flannery, 2007:
    /// *Numerical Recipes: The Art of Scientific Computing*, 3rd ed.
    /// Cambridge University Press. Section 4.6: Gaussian quadratures
    /// and orthogonal polynomials.
    Pre07,

    /// J.P. Snyder, 1987: *Map Projections - A Working Manual*.
    /// USGS Professional Paper 1395.
    /// [DOI](https://doi.org/10.3133/pp1395)
    Sny87,

    /// WMO, 2019: *Manual on Codes*, Volume I.2, WMO-No. 306.
    /// FM 92 GRIB edition 1, Section 2: Grid description section.
    Wmo19,
}
