//! NIfTI volume loading
//!
//! Loads 3D scalar volumes from NIfTI-1 files into flat Fortran-order
//! arrays. Both .nii and .nii.gz files are supported (gzip is
//! auto-detected from the magic bytes).

use std::io::Cursor;

use flate2::read::GzDecoder;
use ndarray::Array;
use nifti::volume::ndarray::IntoNdArray;
use nifti::{InMemNiftiObject, NiftiObject};

/// A 3D scalar volume in Fortran (column-major) order.
///
/// Voxels are stored so that x varies fastest, matching the NIfTI
/// on-disk convention: index = x + y*nx + z*nx*ny.
pub struct Volume {
    /// Voxel values, length nx*ny*nz
    pub data: Vec<f64>,
    /// Dimensions (nx, ny, nz)
    pub dims: (usize, usize, usize),
}

impl Volume {
    /// Voxel value at (x, y, z). Out-of-range coordinates panic.
    pub fn get(&self, x: usize, y: usize, z: usize) -> f64 {
        let (nx, ny, nz) = self.dims;
        debug_assert!(x < nx && y < ny && z < nz);
        self.data[x + y * nx + z * nx * ny]
    }
}

/// Check if bytes are gzip compressed
fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Get header info for diagnostics
fn header_summary(bytes: &[u8]) -> String {
    if bytes.len() < 348 {
        return format!("File too small ({} bytes, need at least 348)", bytes.len());
    }

    // NIfTI-1 header size should be at offset 0, stored as i32
    let sizeof_hdr = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

    // Magic bytes at offset 344 for NIfTI-1
    let magic = String::from_utf8_lossy(&bytes[344..348]).to_string();

    // Data type at offset 70
    let datatype = i16::from_le_bytes([bytes[70], bytes[71]]);

    format!("sizeof_hdr={}, magic='{}', datatype={}", sizeof_hdr, magic, datatype)
}

/// Load a 3D volume from NIfTI bytes
///
/// Supports both .nii and .nii.gz files (gzip is auto-detected). 4D
/// inputs are accepted and reduced to their first timepoint.
pub fn load_volume(bytes: &[u8]) -> Result<Volume, String> {
    let obj: InMemNiftiObject = if is_gzip(bytes) {
        let decoder = GzDecoder::new(Cursor::new(bytes));
        InMemNiftiObject::from_reader(decoder)
            .map_err(|e| format!("Failed to read gzipped NIfTI: {}", e))?
    } else {
        let info = header_summary(bytes);
        InMemNiftiObject::from_reader(Cursor::new(bytes))
            .map_err(|e| format!("Failed to read NIfTI: {} ({})", e, info))?
    };

    let ndim = obj.header().dim[0] as usize;
    if ndim < 3 {
        return Err(format!("Expected at least 3D volume, got {}D", ndim));
    }

    // Convert volume to ndarray
    let array: Array<f64, _> = obj
        .into_volume()
        .into_ndarray()
        .map_err(|e| format!("Failed to convert to ndarray: {}", e))?;

    let shape = array.shape();
    if shape.len() < 3 {
        return Err(format!("Expected at least 3D array, got {}D", shape.len()));
    }

    // Use the actual array shape (nifti-rs may reorder)
    let (nx, ny, nz) = (shape[0], shape[1], shape[2]);

    // Flatten to Fortran order (x varies fastest) to match NIfTI convention
    let mut data = Vec::with_capacity(nx * ny * nz);
    if shape.len() == 3 {
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    data.push(array[[i, j, k]]);
                }
            }
        }
    } else {
        // 4D array - take first timepoint
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    data.push(array[[i, j, k, 0]]);
                }
            }
        }
    }

    Ok(Volume { data, dims: (nx, ny, nz) })
}

/// Read a NIfTI volume from a filesystem path
///
/// Supports both .nii and .nii.gz files.
pub fn read_volume_file(path: &std::path::Path) -> Result<Volume, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read file '{}': {}", path.display(), e))?;
    load_volume(&bytes)
}
