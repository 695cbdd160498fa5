// demos/reference_rotated.rs

// Transform every point of the 12 km NCEP North American rotated
// latitude-longitude grid to earth coordinates, and list the vector
// rotation coefficients.
// Run with:
// RUST_LOG=debug cargo run --example reference_rotated

use gridgeom::prelude::*;

// Use Anyhow for convenient error handling
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let kgds = [
        205, 251, 201, -7446, -144139, 8, 54000, -106000, 0, 0, 64, 44560, 14744,
    ];
    let grid = GridDescriptor::new(&kgds)?;

    // All grid points, row by row, with -9999 reported for failures
    let request = TransformRequest::whole_grid(&grid, -9999.);
    let result = transform(&grid, &request);
    let n = result.successes;
    println!(" successes = {n} of {}", grid.npts());
    if n == 0 {
        return Ok(());
    }

    // The first point, with the longitude brought back west of Greenwich
    let first = result.points[0].coord;
    println!(" first = {:.6} {:.6}", first.lon() - 360., first.lat());
    let last = result.points[n - 1].coord;
    println!(" last  = {:.6} {:.6}", last.lon(), last.lat());

    for (i, p) in result.points.iter().take(n).enumerate() {
        println!(" {i:6} crot, srot = {:9.6} {:9.6}", p.rotation.cos, p.rotation.sin);
        println!(" {i:6} lon, lat   = {:11.6} {:10.6}", p.coord.lon(), p.coord.lat());
    }
    Ok(())
}
