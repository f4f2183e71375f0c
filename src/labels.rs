//! Tissue label map construction
//!
//! Combines a brain-mask slice with gray matter, white matter, and CSF
//! probability slices into a single discrete label map. Each pixel gets
//! the index of its most probable tissue class after mask gating, with
//! an implicit zero-probability background class at index 0.

use crate::slice::Slice;

/// Tissue class indices, in fixed channel order.
pub const BACKGROUND: u8 = 0;
pub const GRAY_MATTER: u8 = 1;
pub const WHITE_MATTER: u8 = 2;
pub const CSF: u8 = 3;

/// A discrete tissue label map in row-major order.
#[derive(Debug, Clone)]
pub struct LabelMap {
    /// Label values 0-3, length rows*cols
    pub data: Vec<u8>,
    pub rows: usize,
    pub cols: usize,
}

impl LabelMap {
    /// Label at (row, col).
    pub fn get(&self, row: usize, col: usize) -> u8 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }
}

/// Build a tissue label map from mask-gated probability slices
///
/// At each pixel the three tissue probabilities are multiplied by the
/// mask value (a continuous gating weight), then the channel with the
/// maximal value among [background=0, gray, white, csf] is selected.
/// Comparison is strictly greater, so ties resolve to the lowest
/// channel index; pixels outside the mask therefore always come out as
/// background. Probabilities need not sum to one.
///
/// # Arguments
/// * `mask` - Brain mask slice (gating weights)
/// * `gm`, `wm`, `csf` - Tissue probability slices, same shape as mask
///
/// # Returns
/// A label map of the same shape, or an error on shape mismatch.
pub fn build_label_map(
    mask: &Slice,
    gm: &Slice,
    wm: &Slice,
    csf: &Slice,
) -> Result<LabelMap, String> {
    let (rows, cols) = (mask.rows, mask.cols);
    for (name, s) in [("gm", gm), ("wm", wm), ("csf", csf)] {
        if s.rows != rows || s.cols != cols {
            return Err(format!(
                "Shape mismatch: {} slice is {}x{}, mask is {}x{}",
                name, s.rows, s.cols, rows, cols
            ));
        }
    }

    let n = rows * cols;
    let mut data = Vec::with_capacity(n);
    for i in 0..n {
        let m = mask.data[i];
        let background = 0.0;
        let gray = gm.data[i] * m;
        let white = wm.data[i] * m;
        let fluid = csf.data[i] * m;

        // Argmax over the four channels, lowest index wins ties
        let mut label = BACKGROUND;
        let mut best = background;
        if gray > best {
            label = GRAY_MATTER;
            best = gray;
        }
        if white > best {
            label = WHITE_MATTER;
            best = white;
        }
        if fluid > best {
            label = CSF;
        }
        data.push(label);
    }

    Ok(LabelMap { data, rows, cols })
}
