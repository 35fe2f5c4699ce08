//! Grid discovery and loading
//!
//! A grid file is netCDF (classic, 64-bit offset or netCDF-4/HDF5) and holds
//! exactly one data variable over the `lon` and `lat` dimensions plus the two
//! coordinate variables. Values are CF-decoded
//! (`_FillValue` / `missing_value` become NaN, then `scale_factor` and
//! `add_offset` are applied).

#[cfg(test)]
pub(crate) mod fixtures;

use crate::error::{GridPlotError, Result};
use ndarray::Array2;
use netcdf::{AttributeValue, Variable};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the longitude dimension and coordinate variable
pub const LON: &str = "lon";

/// Name of the latitude dimension and coordinate variable
pub const LAT: &str = "lat";

/// One coordinate axis of a grid
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateAxis {
    pub name: String,
    pub values: Vec<f64>,
}

impl CoordinateAxis {
    /// Smallest non-NaN coordinate
    pub fn min(&self) -> f64 {
        nan_min(&self.values).unwrap_or(f64::NAN)
    }

    /// Largest non-NaN coordinate
    pub fn max(&self) -> f64 {
        nan_max(&self.values).unwrap_or(f64::NAN)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Georeferenced bounds of a grid: (lon_min, lon_max, lat_min, lat_max)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Extent {
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.lon_min, self.lon_max, self.lat_min, self.lat_max)
    }
}

/// A 2-D raster with lon/lat coordinate axes
///
/// `values` keeps the storage order of the file: row `i` is index `i` of the
/// first dimension of the data variable.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Name of the data variable (e.g. "z")
    pub name: String,
    pub values: Array2<f64>,
    pub lon: CoordinateAxis,
    pub lat: CoordinateAxis,
}

impl Grid {
    pub fn extent(&self) -> Extent {
        Extent {
            lon_min: self.lon.min(),
            lon_max: self.lon.max(),
            lat_min: self.lat.min(),
            lat_max: self.lat.max(),
        }
    }

    /// Min/max of the non-NaN values, None if every value is NaN
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let slice: Vec<f64> = self.values.iter().copied().collect();
        Some((nan_min(&slice)?, nan_max(&slice)?))
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }
}

fn nan_min(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
}

fn nan_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// List every entry of a grid folder as a full path
///
/// Entries come back in filesystem enumeration order and are not filtered:
/// anything that is not a grid fails later, when it is loaded.
pub fn list_grid_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir_err = |source| GridPlotError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        files.push(dir.join(entry.file_name()));
    }

    debug!("Found {} entries in {}", files.len(), dir.display());
    Ok(files)
}

/// Load a lon/lat grid from a netCDF file
pub fn load_grid(path: &Path) -> Result<Grid> {
    let nc_err = |source| GridPlotError::Netcdf {
        path: path.to_path_buf(),
        source,
    };
    let format_err = |reason: String| GridPlotError::Format {
        path: path.to_path_buf(),
        reason,
    };

    let file = netcdf::open(path).map_err(nc_err)?;
    let variables: Vec<Variable> = file.variables().collect();

    // Exactly one data variable, as a DataArray-style open requires
    let data_vars: Vec<&Variable> = variables.iter().filter(|v| !is_coordinate(v)).collect();
    let var = match data_vars.as_slice() {
        [single] => *single,
        [] => return Err(format_err("no data variable found".to_string())),
        many => {
            let names: Vec<String> = many.iter().map(|v| v.name()).collect();
            return Err(format_err(format!(
                "expected exactly one data variable, found {}: {}",
                names.len(),
                names.join(", ")
            )));
        }
    };
    let name = var.name();

    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let has_lon_lat =
        dims.len() == 2 && dims.iter().any(|d| d == LON) && dims.iter().any(|d| d == LAT);
    if !has_lon_lat {
        return Err(format_err(format!(
            "variable '{}' has dimensions ({}), expected (lon, lat)",
            name,
            dims.join(", ")
        )));
    }

    let lon = read_coordinate(&variables, LON)
        .ok_or_else(|| format_err(format!("missing coordinate variable '{}'", LON)))?
        .map_err(nc_err)?;
    let lat = read_coordinate(&variables, LAT)
        .ok_or_else(|| format_err(format!("missing coordinate variable '{}'", LAT)))?
        .map_err(nc_err)?;

    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let values = read_decoded(var).map_err(nc_err)?;
    let values = Array2::from_shape_vec((shape[0], shape[1]), values)
        .map_err(|e| format_err(format!("bad shape for '{}': {}", name, e)))?;

    debug!(
        "Loaded {} ({}: {}x{}, dims {:?})",
        path.display(),
        name,
        values.nrows(),
        values.ncols(),
        dims
    );

    Ok(Grid {
        name,
        values,
        lon,
        lat,
    })
}

/// A 1-D variable named after its own dimension
fn is_coordinate(var: &Variable) -> bool {
    match var.dimensions() {
        [dim] => dim.name() == var.name(),
        _ => false,
    }
}

fn read_coordinate(
    variables: &[Variable],
    name: &str,
) -> Option<std::result::Result<CoordinateAxis, netcdf::Error>> {
    let var = variables
        .iter()
        .find(|v| v.name() == name && is_coordinate(v))?;
    Some(read_decoded(var).map(|values| CoordinateAxis {
        name: name.to_string(),
        values,
    }))
}

/// Read a whole variable as f64 with CF mask and scale decoding applied
fn read_decoded(var: &Variable) -> std::result::Result<Vec<f64>, netcdf::Error> {
    if var.dimensions().iter().any(|d| d.len() == 0) {
        return Ok(Vec::new());
    }
    let mut values = var.get_values::<f64, _>(..)?;

    let fill = attribute_numbers(var, "_FillValue")?;
    let missing = attribute_numbers(var, "missing_value")?;
    let scale = attribute_numbers(var, "scale_factor")?.first().copied();
    let offset = attribute_numbers(var, "add_offset")?.first().copied();

    for v in values.iter_mut() {
        if fill.contains(v) || missing.contains(v) {
            *v = f64::NAN;
            continue;
        }
        if let Some(s) = scale {
            *v *= s;
        }
        if let Some(o) = offset {
            *v += o;
        }
    }
    Ok(values)
}

/// Numeric attribute as f64 values, empty when absent or textual
fn attribute_numbers(
    var: &Variable,
    name: &str,
) -> std::result::Result<Vec<f64>, netcdf::Error> {
    let value = match var.attribute_value(name).transpose()? {
        Some(value) => value,
        None => return Ok(Vec::new()),
    };
    let numbers = match value {
        AttributeValue::Uchars(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Schars(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Ushorts(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Shorts(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Uints(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Ints(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Ulonglongs(v) => v.into_iter().map(|x| x as f64).collect(),
        AttributeValue::Longlongs(v) => v.into_iter().map(|x| x as f64).collect(),
        AttributeValue::Floats(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Doubles(v) => v,
        AttributeValue::Str(_) | AttributeValue::Strs(_) => Vec::new(),
        scalar => f64::try_from(scalar).map(|x| vec![x]).unwrap_or_default(),
    };
    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::fixtures::{create_lonlat, put, write_grid, write_lonlat, write_lonlat_with};
    use super::*;
    use netcdf::Options;
    use tempfile::TempDir;

    const HDF5_SIGNATURE: &[u8] = b"\x89HDF\r\n\x1a\n";

    #[test]
    fn test_load_grid_extent_and_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.grd");
        write_grid(&path, (-125.0, -122.0), (40.0, 45.0), 10, 10);

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.name, "z");
        assert_eq!(grid.nrows(), 10);
        assert_eq!(grid.ncols(), 10);
        assert_eq!(grid.extent().as_tuple(), (-125.0, -122.0, 40.0, 45.0));
        assert_eq!(grid.value_range(), Some((0.0, 99.0)));
    }

    #[test]
    fn test_loads_netcdf4_grid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slab_depth.grd");
        write_grid(&path, (-125.0, -122.0), (40.0, 45.0), 4, 3);

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(HDF5_SIGNATURE));

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.values.shape(), &[3, 4]);
        assert_eq!(grid.extent().as_tuple(), (-125.0, -122.0, 40.0, 45.0));
    }

    #[test]
    fn test_loads_classic_formats() {
        let dir = TempDir::new().unwrap();
        for (name, options) in [
            ("cdf1.grd", Options::empty()),
            ("cdf2.grd", Options::_64BIT_OFFSET),
        ] {
            let path = dir.path().join(name);
            write_lonlat_with(&path, options, &[0.0, 1.0], &[5.0, 6.0], &[1.0, 2.0, 3.0, 4.0]);
            assert!(fs::read(&path).unwrap().starts_with(b"CDF"));

            let grid = load_grid(&path).unwrap();
            assert_eq!(grid.value_range(), Some((1.0, 4.0)), "{}", name);
            assert_eq!(grid.extent().as_tuple(), (0.0, 1.0, 5.0, 6.0));
        }
    }

    #[test]
    fn test_descending_axes_use_min_max() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("desc.grd");
        write_lonlat(&path, &[-122.0, -123.5, -125.0], &[45.0, 40.0], &[0.0; 6]);

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.extent().as_tuple(), (-125.0, -122.0, 40.0, 45.0));
    }

    #[test]
    fn test_storage_order_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("order.grd");
        // z(lat, lon): 2 rows of 3
        write_lonlat(&path, &[0.0, 1.0, 2.0], &[10.0, 11.0], &[1., 2., 3., 4., 5., 6.]);

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.values.shape(), &[2, 3]);
        assert_eq!(grid.values[[0, 2]], 3.0);
        assert_eq!(grid.values[[1, 0]], 4.0);
    }

    #[test]
    fn test_lon_first_storage_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lonlat.grd");
        {
            let mut file = create_lonlat(&path, Options::NETCDF4, 3, 2);
            file.add_variable::<f64>("z", &[LON, LAT]).unwrap();
            file.enddef().unwrap();
            put(&mut file, LON, &[0.0, 1.0, 2.0]);
            put(&mut file, LAT, &[10.0, 11.0]);
            put(&mut file, "z", &[1., 2., 3., 4., 5., 6.]);
        }

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.values.shape(), &[3, 2]);
        assert_eq!(grid.values[[0, 1]], 2.0);
    }

    #[test]
    fn test_cf_decoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("packed.grd");
        {
            let mut file = create_lonlat(&path, Options::NETCDF4, 2, 2);
            let mut depth = file.add_variable::<i16>("depth", &[LAT, LON]).unwrap();
            depth.set_fill_value(-32768i16).unwrap();
            depth.put_attribute("scale_factor", 0.5f64).unwrap();
            depth.put_attribute("add_offset", 100.0f64).unwrap();
            file.enddef().unwrap();
            put(&mut file, LON, &[0.0, 1.0]);
            put(&mut file, LAT, &[0.0, 1.0]);
            put(&mut file, "depth", &[-32768i16, 10, 20, 30]);
        }

        let grid = load_grid(&path).unwrap();
        assert!(grid.values[[0, 0]].is_nan());
        assert_eq!(grid.values[[0, 1]], 105.0);
        assert_eq!(grid.values[[1, 1]], 115.0);
        assert_eq!(grid.value_range(), Some((105.0, 115.0)));
    }

    #[test]
    fn test_missing_value_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.grd");
        {
            let mut file = create_lonlat(&path, Options::NETCDF4, 2, 2);
            let mut z = file.add_variable::<f64>("z", &[LAT, LON]).unwrap();
            z.put_attribute("missing_value", vec![-9999.0f64, 9999.0])
                .unwrap();
            file.enddef().unwrap();
            put(&mut file, LON, &[0.0, 1.0]);
            put(&mut file, LAT, &[0.0, 1.0]);
            put(&mut file, "z", &[-9999.0, 1.0, 9999.0, 2.0]);
        }

        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.values.iter().filter(|v| v.is_nan()).count(), 2);
        assert_eq!(grid.value_range(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_all_nan_grid_has_no_range() {
        let grid = Grid {
            name: "z".into(),
            values: Array2::from_elem((2, 2), f64::NAN),
            lon: CoordinateAxis {
                name: LON.into(),
                values: vec![0.0, 1.0],
            },
            lat: CoordinateAxis {
                name: LAT.into(),
                values: vec![0.0, 1.0],
            },
        };
        assert_eq!(grid.value_range(), None);
    }

    #[test]
    fn test_missing_lon_lat_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("xy.grd");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension("x", 2).unwrap();
            file.add_dimension("y", 2).unwrap();
            file.add_variable::<f64>("x", &["x"]).unwrap();
            file.add_variable::<f64>("y", &["y"]).unwrap();
            file.add_variable::<f64>("z", &["y", "x"]).unwrap();
            file.enddef().unwrap();
            put(&mut file, "x", &[0.0, 1.0]);
            put(&mut file, "y", &[0.0, 1.0]);
            put(&mut file, "z", &[0.0; 4]);
        }

        match load_grid(&path).unwrap_err() {
            GridPlotError::Format { reason, .. } => {
                assert!(reason.contains("expected (lon, lat)"), "{}", reason)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_coordinate_variable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nolat.grd");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension(LON, 2).unwrap();
            file.add_dimension(LAT, 2).unwrap();
            file.add_variable::<f64>(LON, &[LON]).unwrap();
            file.add_variable::<f64>("z", &[LAT, LON]).unwrap();
            file.enddef().unwrap();
            put(&mut file, LON, &[0.0, 1.0]);
            put(&mut file, "z", &[0.0; 4]);
        }

        match load_grid(&path).unwrap_err() {
            GridPlotError::Format { reason, .. } => {
                assert_eq!(reason, "missing coordinate variable 'lat'")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_multiple_data_variables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("two.grd");
        {
            let mut file = create_lonlat(&path, Options::NETCDF4, 1, 1);
            for name in ["depth", "uncertainty"] {
                file.add_variable::<f64>(name, &[LAT, LON]).unwrap();
            }
            file.enddef().unwrap();
            for name in [LON, LAT, "depth", "uncertainty"] {
                put(&mut file, name, &[1.0]);
            }
        }

        let err = load_grid(&path).unwrap_err();
        assert!(err.to_string().contains("depth, uncertainty"), "{}", err);
    }

    #[test]
    fn test_non_grid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.txt");
        fs::write(&path, "not a grid").unwrap();
        assert!(matches!(
            load_grid(&path).unwrap_err(),
            GridPlotError::Netcdf { .. }
        ));
    }

    #[test]
    fn test_list_grid_files_joins_paths() {
        let dir = TempDir::new().unwrap();
        for name in ["a.grd", "b.grd", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let mut files = list_grid_files(dir.path()).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![
                dir.path().join("a.grd"),
                dir.path().join("b.grd"),
                dir.path().join("notes.txt"),
            ]
        );
    }

    #[test]
    fn test_list_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("grids_unmasked");
        assert!(matches!(
            list_grid_files(&missing).unwrap_err(),
            GridPlotError::ReadDir { .. }
        ));
    }
}
