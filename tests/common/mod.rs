//! Common test utilities for atlas-overlay integration tests

use atlas_overlay::nifti_io::Volume;

/// Volume filled with a single value
pub fn constant_volume(dims: (usize, usize, usize), value: f64) -> Volume {
    let (nx, ny, nz) = dims;
    Volume { data: vec![value; nx * ny * nz], dims }
}

/// Volume whose voxel values come from a coordinate function
pub fn volume_from_fn<F>(dims: (usize, usize, usize), f: F) -> Volume
where
    F: Fn(usize, usize, usize) -> f64,
{
    let (nx, ny, nz) = dims;
    let mut data = vec![0.0; nx * ny * nz];
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                data[i + j * nx + k * nx * ny] = f(i, j, k);
            }
        }
    }
    Volume { data, dims }
}

/// Fraction of label-map pixels carrying the given label
pub fn label_fraction(labels: &atlas_overlay::labels::LabelMap, label: u8) -> f64 {
    let count = labels.data.iter().filter(|&&l| l == label).count();
    count as f64 / labels.data.len() as f64
}
