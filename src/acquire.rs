//! Atlas archive acquisition
//!
//! Downloads the ICBM152 atlas ZIP and extracts it into the working
//! directory. Both steps are idempotent by presence check only: an
//! existing archive is never re-fetched and an existing extraction
//! directory is never re-extracted. No checksums are verified.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// A downloadable atlas archive and the volume files inside it.
#[derive(Debug, Clone)]
pub struct AtlasSource {
    /// Archive URL; the local file name is its basename
    pub url: String,
    /// Directory inside the extracted archive holding the volumes
    pub volume_dir: String,
    /// T1 anatomical image file name
    pub t1: String,
    /// Brain mask file name
    pub mask: String,
    /// Gray matter probability map file name
    pub gm: String,
    /// White matter probability map file name
    pub wm: String,
    /// CSF probability map file name
    pub csf: String,
}

impl AtlasSource {
    /// The MNI ICBM152 2009a nonlinear symmetric atlas.
    ///
    /// See https://nist.mni.mcgill.ca/icbm-152-nonlinear-atlases-2009/
    pub fn icbm152_2009a() -> Self {
        AtlasSource {
            url: "https://www.bic.mni.mcgill.ca/~vfonov/icbm/2009/mni_icbm152_nlin_sym_09a_nifti.zip"
                .to_string(),
            volume_dir: "mni_icbm152_nlin_sym_09a".to_string(),
            t1: "mni_icbm152_t1_tal_nlin_sym_09a.nii".to_string(),
            mask: "mni_icbm152_t1_tal_nlin_sym_09a_mask.nii".to_string(),
            gm: "mni_icbm152_gm_tal_nlin_sym_09a.nii".to_string(),
            wm: "mni_icbm152_wm_tal_nlin_sym_09a.nii".to_string(),
            csf: "mni_icbm152_csf_tal_nlin_sym_09a.nii".to_string(),
        }
    }

    /// Local archive file name, taken from the URL basename.
    pub fn archive_name(&self) -> Result<&str, String> {
        self.url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| format!("URL '{}' has no file name component", self.url))
    }

    /// Extraction directory name: the archive name without its .zip suffix.
    pub fn extract_dir_name(&self) -> Result<String, String> {
        let name = self.archive_name()?;
        Ok(name.strip_suffix(".zip").unwrap_or(name).to_string())
    }

    /// Full path of a volume file under the extraction directory.
    pub fn volume_path(&self, data_dir: &Path, file: &str) -> PathBuf {
        data_dir.join(&self.volume_dir).join(file)
    }
}

/// Ensure the atlas archive is downloaded and extracted
///
/// Fetches the archive into `work_dir` unless it is already present,
/// then extracts it into a sibling directory unless that is already
/// present, and returns the extraction directory. Failures in either
/// step are fatal; a partially written archive is left on disk.
pub fn ensure_atlas(source: &AtlasSource, work_dir: &Path) -> Result<PathBuf, String> {
    let zip_path = work_dir.join(source.archive_name()?);
    if !zip_path.exists() {
        download(&source.url, &zip_path)?;
    }

    let data_dir = work_dir.join(source.extract_dir_name()?);
    if !data_dir.exists() {
        extract(&zip_path, &data_dir)?;
    }

    Ok(data_dir)
}

/// Blocking GET streamed straight to a file
fn download(url: &str, dest: &Path) -> Result<(), String> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| format!("Failed to fetch '{}': {}", url, e))?;

    let mut reader = response.into_reader();
    let mut file = File::create(dest)
        .map_err(|e| format!("Failed to create '{}': {}", dest.display(), e))?;
    io::copy(&mut reader, &mut file)
        .map_err(|e| format!("Failed to write '{}': {}", dest.display(), e))?;

    Ok(())
}

/// Extract a ZIP archive into a directory
fn extract(zip_path: &Path, dest: &Path) -> Result<(), String> {
    let file = File::open(zip_path)
        .map_err(|e| format!("Failed to open '{}': {}", zip_path.display(), e))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| format!("Failed to read archive '{}': {}", zip_path.display(), e))?;
    archive
        .extract(dest)
        .map_err(|e| format!("Failed to extract '{}': {}", zip_path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source pointing at an unroutable address; any fetch attempt fails
    fn offline_source() -> AtlasSource {
        AtlasSource {
            url: "http://127.0.0.1:9/atlas_test.zip".to_string(),
            ..AtlasSource::icbm152_2009a()
        }
    }

    #[test]
    fn test_archive_and_dir_names() {
        let source = AtlasSource::icbm152_2009a();
        assert_eq!(source.archive_name().unwrap(), "mni_icbm152_nlin_sym_09a_nifti.zip");
        assert_eq!(source.extract_dir_name().unwrap(), "mni_icbm152_nlin_sym_09a_nifti");
    }

    #[test]
    fn test_archive_name_requires_basename() {
        let source = AtlasSource {
            url: "https://example.org/data/".to_string(),
            ..AtlasSource::icbm152_2009a()
        };
        assert!(source.archive_name().is_err());
    }

    #[test]
    fn test_volume_path_layout() {
        let source = AtlasSource::icbm152_2009a();
        let path = source.volume_path(Path::new("mni_icbm152_nlin_sym_09a_nifti"), &source.gm);
        assert_eq!(
            path,
            Path::new("mni_icbm152_nlin_sym_09a_nifti/mni_icbm152_nlin_sym_09a/mni_icbm152_gm_tal_nlin_sym_09a.nii")
        );
    }

    #[test]
    fn test_ensure_atlas_skips_when_present() {
        // With archive and extraction directory already on disk, no
        // network call is made: the unroutable URL would fail otherwise
        let work_dir = std::env::temp_dir().join("atlas_overlay_acquire_present");
        std::fs::create_dir_all(&work_dir).unwrap();

        let source = offline_source();
        std::fs::write(work_dir.join("atlas_test.zip"), b"not a real archive").unwrap();
        std::fs::create_dir_all(work_dir.join("atlas_test")).unwrap();

        let data_dir = ensure_atlas(&source, &work_dir).unwrap();
        assert_eq!(data_dir, work_dir.join("atlas_test"));

        std::fs::remove_dir_all(&work_dir).ok();
    }

    #[test]
    fn test_ensure_atlas_fetch_failure_is_fatal() {
        let work_dir = std::env::temp_dir().join("atlas_overlay_acquire_missing");
        std::fs::remove_dir_all(&work_dir).ok();
        std::fs::create_dir_all(&work_dir).unwrap();

        let result = ensure_atlas(&offline_source(), &work_dir);
        assert!(result.is_err(), "Unreachable host should be a fatal error");

        std::fs::remove_dir_all(&work_dir).ok();
    }

    #[test]
    fn test_extract_rejects_garbage_archive() {
        let work_dir = std::env::temp_dir().join("atlas_overlay_acquire_garbage");
        std::fs::remove_dir_all(&work_dir).ok();
        std::fs::create_dir_all(&work_dir).unwrap();

        // Archive present but malformed; extraction dir absent
        let source = offline_source();
        std::fs::write(work_dir.join("atlas_test.zip"), b"not a real archive").unwrap();

        let result = ensure_atlas(&source, &work_dir);
        assert!(result.is_err(), "Malformed archive should be a fatal error");
        assert!(result.unwrap_err().contains("archive"));

        std::fs::remove_dir_all(&work_dir).ok();
    }
}
