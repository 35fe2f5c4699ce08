//! Grid files for tests, written with the netCDF library
//!
//! Classic files have to be fully defined before any data is written, so
//! every helper defines first, calls `enddef`, then puts values.

use super::{LAT, LON};
use netcdf::{FileMut, Options};
use std::path::Path;

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Create a file with the lon and lat dimensions and coordinate variables defined
pub(crate) fn create_lonlat(path: &Path, options: Options, nlon: usize, nlat: usize) -> FileMut {
    let mut file = netcdf::create_with(path, options).unwrap();
    file.add_dimension(LON, nlon).unwrap();
    file.add_dimension(LAT, nlat).unwrap();
    file.add_variable::<f64>(LON, &[LON]).unwrap();
    file.add_variable::<f64>(LAT, &[LAT]).unwrap();
    file
}

/// Write a whole variable once the file has left define mode
pub(crate) fn put<T: netcdf::NcTypeDescriptor>(file: &mut FileMut, name: &str, values: &[T]) {
    file.variable_mut(name)
        .unwrap()
        .put_values(values, ..)
        .unwrap();
}

/// Grid with `z(lat, lon)` taken row by row from `z`
pub(crate) fn write_lonlat_with(path: &Path, options: Options, lon: &[f64], lat: &[f64], z: &[f64]) {
    let mut file = create_lonlat(path, options, lon.len(), lat.len());
    file.add_variable::<f64>("z", &[LAT, LON]).unwrap();
    file.enddef().unwrap();
    put(&mut file, LON, lon);
    put(&mut file, LAT, lat);
    put(&mut file, "z", z);
}

/// netCDF-4 grid with `z(lat, lon)` taken row by row from `z`
pub(crate) fn write_lonlat(path: &Path, lon: &[f64], lat: &[f64], z: &[f64]) {
    write_lonlat_with(path, Options::NETCDF4, lon, lat, z);
}

/// nx by ny grid spanning the given bounds, values 0..nx*ny
pub(crate) fn write_grid(path: &Path, lon: (f64, f64), lat: (f64, f64), nx: usize, ny: usize) {
    let z: Vec<f64> = (0..nx * ny).map(|v| v as f64).collect();
    write_lonlat(
        path,
        &linspace(lon.0, lon.1, nx),
        &linspace(lat.0, lat.1, ny),
        &z,
    );
}
