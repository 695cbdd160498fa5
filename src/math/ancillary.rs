/// The Gudermannian function (often written as gd), is the work horse for computations involving
/// the isometric latitude (i.e. the vertical coordinate of the Mercator projection)
pub mod gudermannian {
    pub fn fwd(arg: f64) -> f64 {
        arg.sinh().atan()
    }

    pub fn inv(arg: f64) -> f64 {
        arg.tan().asinh()
    }
}

/// The exponential of the negated isometric latitude on the sphere,
/// `tan(π/4 - φ/2)`, from the sine and cosine of the latitude. Split by
/// hemisphere to avoid cancellation near either pole.
pub fn ts(sincos: (f64, f64)) -> f64 {
    let (sin_phi, cos_phi) = sincos;
    if sin_phi > 0. {
        cos_phi / (1. + sin_phi)
    } else {
        (1. - sin_phi) / cos_phi
    }
}

/// Area of the spherical quadrangle of angular width `dlon` and angular
/// height `dlat` (both in degrees), centered at `lat`. The latitudinal
/// borders are clipped to the poles, so the result stays positive even
/// for cells touching a pole.
pub fn quadrangle_area(radius: f64, lat: f64, dlon: f64, dlat: f64) -> f64 {
    let half = dlat.abs() / 2.;
    let north = (lat + half).clamp(-90., 90.).to_radians();
    let south = (lat - half).clamp(-90., 90.).to_radians();
    radius * radius * dlon.abs().to_radians() * (north.sin() - south.sin())
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn gudermannian() {
        let lat = 55_f64.to_radians();
        let psi = gudermannian::inv(lat);
        assert_float_eq!(gudermannian::fwd(psi), lat, abs <= 1e-14);
        assert_eq!(gudermannian::fwd(0.), 0.);
    }

    #[test]
    fn ts_on_the_sphere() {
        for lat in [-80_f64, -30., 0., 30., 80.] {
            let phi = lat.to_radians();
            let expected = (std::f64::consts::FRAC_PI_4 - phi / 2.).tan();
            assert_float_eq!(ts(phi.sin_cos()), expected, abs <= 1e-14);
        }
    }

    #[test]
    fn quadrangles() {
        // The full sphere, in one piece
        let r = 6.3712e6;
        let sphere = 4. * std::f64::consts::PI * r * r;
        assert_float_eq!(quadrangle_area(r, 0., 360., 180.), sphere, rmax <= 1e-14);

        // ... and as the sum of 1x1 degree cells
        let mut sum = 0.;
        for j in 0..180 {
            sum += 360. * quadrangle_area(r, -89.5 + j as f64, 1., 1.);
        }
        assert_float_eq!(sum, sphere, rmax <= 1e-12);

        // Cells centered on a pole are clipped, but not empty
        assert!(quadrangle_area(r, 90., 1., 1.) > 0.);
        assert_float_eq!(
            quadrangle_area(r, 90., 1., 1.),
            quadrangle_area(r, 89.75, 1., 0.5),
            rmax <= 1e-12
        );
    }
}
