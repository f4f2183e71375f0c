//! Coronal tissue overlay for the MNI ICBM152 2009a atlas
//!
//! Downloads the atlas, extracts a coronal slice from the T1 image and
//! the tissue probability maps, builds a mask-gated label map, and
//! writes overlay.png to the working directory.

use std::path::Path;
use std::time::Instant;

use atlas_overlay::acquire::{ensure_atlas, AtlasSource};
use atlas_overlay::labels::{build_label_map, GRAY_MATTER, WHITE_MATTER};
use atlas_overlay::nifti_io::read_volume_file;
use atlas_overlay::overlay::colorize;
use atlas_overlay::render::{render_overlay, RenderParams};
use atlas_overlay::slice::{get_slice, SliceParams, CORONAL_PLANE};

fn main() -> Result<(), String> {
    let total_start = Instant::now();
    let work_dir = Path::new(".");

    // ========================================================================
    // Step 1: Atlas acquisition (skipped when already on disk)
    // ========================================================================
    println!("[STEP 1] Atlas acquisition...");
    let start = Instant::now();
    let source = AtlasSource::icbm152_2009a();
    let data_dir = ensure_atlas(&source, work_dir)?;
    println!("[INFO] Atlas ready at {} in {:.2?}", data_dir.display(), start.elapsed());

    // ========================================================================
    // Step 2: Load the five co-registered volumes
    // ========================================================================
    println!("\n[STEP 2] Loading volumes...");
    let start = Instant::now();
    let t1 = read_volume_file(&source.volume_path(&data_dir, &source.t1))?;
    let fg = read_volume_file(&source.volume_path(&data_dir, &source.mask))?;
    let gm = read_volume_file(&source.volume_path(&data_dir, &source.gm))?;
    let wm = read_volume_file(&source.volume_path(&data_dir, &source.wm))?;
    let csf = read_volume_file(&source.volume_path(&data_dir, &source.csf))?;

    let (nx, ny, nz) = t1.dims;
    println!("[INFO] Volume: {}x{}x{}", nx, ny, nz);
    println!("[INFO] Loaded 5 volumes in {:.2?}", start.elapsed());

    // ========================================================================
    // Step 3: Coronal slice extraction
    // ========================================================================
    println!("\n[STEP 3] Slice extraction (plane {})...", CORONAL_PLANE);
    let start = Instant::now();
    let params = SliceParams::default();
    let image = get_slice(&t1, CORONAL_PLANE, &params)?;
    let mask = get_slice(&fg, CORONAL_PLANE, &params)?;
    let gm_slice = get_slice(&gm, CORONAL_PLANE, &params)?;
    let wm_slice = get_slice(&wm, CORONAL_PLANE, &params)?;
    let csf_slice = get_slice(&csf, CORONAL_PLANE, &params)?;
    println!("[INFO] Extracted {}x{} slices in {:.2?}", params.win, params.win, start.elapsed());

    // ========================================================================
    // Step 4: Label map from mask-gated tissue probabilities
    // ========================================================================
    println!("\n[STEP 4] Label map construction...");
    let start = Instant::now();
    let labels = build_label_map(&mask, &gm_slice, &wm_slice, &csf_slice)?;

    let n_pixels = labels.data.len();
    let gm_pixels = labels.data.iter().filter(|&&l| l == GRAY_MATTER).count();
    let wm_pixels = labels.data.iter().filter(|&&l| l == WHITE_MATTER).count();
    println!("[INFO] Gray matter: {} pixels ({:.1}%)",
        gm_pixels, 100.0 * gm_pixels as f64 / n_pixels as f64);
    println!("[INFO] White matter: {} pixels ({:.1}%)",
        wm_pixels, 100.0 * wm_pixels as f64 / n_pixels as f64);
    println!("[INFO] Label map built in {:.2?}", start.elapsed());

    // ========================================================================
    // Step 5: Colorize and render
    // ========================================================================
    println!("\n[STEP 5] Rendering...");
    let start = Instant::now();
    let overlay = colorize(&labels);
    let render = RenderParams::default();
    render_overlay(&image, &overlay, &render)?;
    println!("[INFO] Rendered in {:.2?}", start.elapsed());

    // ========================================================================
    // Summary
    // ========================================================================
    println!("\n{}", "=".repeat(60));
    println!("Overlay complete!");
    println!("Total time: {:.2?}", total_start.elapsed());
    println!("{}", "=".repeat(60));
    println!("\nOutput: {}", render.output.display());

    Ok(())
}
