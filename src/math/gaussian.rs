use crate::Error;
use std::f64::consts::PI;

/// The latitudes (in degrees, ordered from north to south) and the
/// corresponding quadrature weights of a Gaussian grid with `jg`
/// latitude circles, pole to pole.
///
/// The Gaussian latitudes are the arc sines of the roots of the Legendre
/// polynomial of degree `jg`. The weights sum to 2 (the integral of `1`
/// over `sin 𝜙 ∈ [-1, 1]`), so `R² Δλ w` is the area of the latitude
/// band belonging to a grid row, per radian of longitude width `Δλ`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianLatitudes {
    pub latitudes: Vec<f64>,
    pub weights: Vec<f64>,
}

/// Newton iteration for the Legendre roots, following
/// [Press et al, 2007](crate::Bibliography::Pre07), `gauleg`.
pub fn gaussian_latitudes(jg: usize) -> Result<GaussianLatitudes, Error> {
    // Quadratic convergence: min iterations = 3, max iterations = 5 for
    // the grid sizes in operational use
    const MAX_ITER: usize = 50;
    const TOLERANCE: f64 = 1e-13;

    if jg == 0 {
        return Err(Error::General("Gaussian: need at least one latitude"));
    }

    let n = jg as f64;
    let mut latitudes = vec![0.; jg];
    let mut weights = vec![0.; jg];

    // The roots are symmetric about the equator, so we only need half of them
    for k in 0..(jg + 1) / 2 {
        // Initial guess, Tricomi's asymptotic approximation
        let mut z = (PI * (k as f64 + 0.75) / (n + 0.5)).cos();
        let mut pp = 0.;
        let mut converged = false;

        for _ in 0..MAX_ITER {
            // Legendre polynomial of degree jg at z, by recurrence
            let mut p1 = 1.;
            let mut p2 = 0.;
            for j in 1..=jg {
                let p3 = p2;
                p2 = p1;
                let j = j as f64;
                p1 = ((2. * j - 1.) * z * p2 - (j - 1.) * p3) / j;
            }

            // ... and its derivative
            pp = n * (z * p1 - p2) / (z * z - 1.);
            let dz = p1 / pp;
            z -= dz;
            if dz.abs() < TOLERANCE {
                converged = true;
                break;
            }
        }

        if !converged || !z.is_finite() {
            return Err(Error::General("Gaussian: latitude iteration did not converge"));
        }

        let latitude = z.asin().to_degrees();
        let weight = 2. / ((1. - z * z) * pp * pp);
        latitudes[k] = latitude;
        latitudes[jg - 1 - k] = -latitude;
        weights[k] = weight;
        weights[jg - 1 - k] = weight;
    }

    Ok(GaussianLatitudes { latitudes, weights })
}

// ----- Tests ---------------------------------------------------------------------
