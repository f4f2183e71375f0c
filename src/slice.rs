//! Coronal slice extraction
//!
//! Reduces a 3D volume to a 2D anterior-view slice: fix the second
//! (anterior-posterior) axis, transpose the remaining plane, flip it
//! vertically so superior anatomy sits at the top, then crop a square
//! window. Pure index selection, no interpolation.

use crate::nifti_io::Volume;

/// Coronal plane index used for the ICBM152 2009a overlay.
///
/// Atlas-specific constant with no documented derivation; it picks a
/// mid-anterior plane on the 2009a voxel grid.
pub const CORONAL_PLANE: usize = 100;

/// Square crop window applied to the transposed, flipped plane.
///
/// The defaults (win 185, dx 6, dy 0) are tuned to the ICBM152 2009a
/// grid and center the brain in the window.
#[derive(Debug, Clone, Copy)]
pub struct SliceParams {
    /// Side length of the square slice
    pub win: usize,
    /// Horizontal (column) offset
    pub dx: usize,
    /// Vertical (row) offset
    pub dy: usize,
}

impl Default for SliceParams {
    fn default() -> Self {
        SliceParams { win: 185, dx: 6, dy: 0 }
    }
}

/// A 2D image slice in row-major order.
#[derive(Debug, Clone)]
pub struct Slice {
    /// Pixel values, length rows*cols
    pub data: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl Slice {
    /// Pixel value at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }
}

/// Extract a coronal square slice
///
/// Selects the plane `y = plane`, transposes it (rows index z, columns
/// index x), flips it vertically, and crops a `win x win` window at row
/// offset `dy` and column offset `dx`. Equivalent direct indexing:
/// `out[r, c] = vol[dx + c, plane, nz - 1 - (dy + r)]`.
///
/// # Arguments
/// * `vol` - Input volume, Fortran order
/// * `plane` - Index along the second axis
/// * `params` - Window size and offsets
///
/// # Returns
/// A `(win, win)` slice, or an error when the plane index or crop
/// window falls outside the volume.
pub fn get_slice(vol: &Volume, plane: usize, params: &SliceParams) -> Result<Slice, String> {
    let (nx, ny, nz) = vol.dims;
    let SliceParams { win, dx, dy } = *params;

    if plane >= ny {
        return Err(format!("Plane index {} out of bounds for {} coronal planes", plane, ny));
    }
    // The transposed plane has nz rows and nx columns
    if dy + win > nz || dx + win > nx {
        return Err(format!(
            "Crop window {}x{} at offset ({}, {}) exceeds plane size {}x{}",
            win, win, dy, dx, nz, nx
        ));
    }

    let mut data = Vec::with_capacity(win * win);
    for r in 0..win {
        let z = nz - 1 - (dy + r);
        for c in 0..win {
            data.push(vol.get(dx + c, plane, z));
        }
    }

    Ok(Slice { data, rows: win, cols: win })
}
