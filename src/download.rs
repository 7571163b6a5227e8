// ============================================
// download.rs - ODT bootstrapper download
// ============================================
//
// Fetches setup.exe (the Office Deployment Tool bootstrapper) from the
// official Microsoft CDN and streams it into the install directory.
// Single best-effort fetch: no retries, no partial-download resume.
// ============================================

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{OdtError, Result};

// ============================================
// CONSTANTS
// ============================================

/// Official download URL for the ODT bootstrapper.
/// This is a stable Microsoft CDN endpoint - the same setup.exe the
/// standalone Office Deployment Tool package ships.
pub const ODT_DOWNLOAD_URL: &str = "https://officecdn.microsoft.com/pr/wsus/setup.exe";

/// Filename the bootstrapper is saved under
pub const SETUP_EXE_NAME: &str = "setup.exe";

// ============================================
// DOWNLOAD
// ============================================

/// Download setup.exe into the install directory.
///
/// # Arguments
/// * `install_dir` - destination directory (must already exist)
/// * `progress_callback` - called with 0-100 as bytes arrive
///
/// # Returns
/// * `Ok(PathBuf)` - path to the downloaded setup.exe
/// * `Err(NetworkFailure)` - connection, HTTP status, or transfer errors
/// * `Err(FilesystemFailure)` - the file could not be created or written
pub fn download_setup(install_dir: &Path, progress_callback: impl Fn(u32)) -> Result<PathBuf> {
    let dest_path = install_dir.join(SETUP_EXE_NAME);

    info!("Downloading Office Deployment Tool from {}", ODT_DOWNLOAD_URL);
    progress_callback(0);

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("OfficeDeploy/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    let response = client
        .get(ODT_DOWNLOAD_URL)
        .send()
        .map_err(|e| OdtError::network(format!("failed to reach download server: {}", e)))?;

    if !response.status().is_success() {
        return Err(OdtError::network(format!(
            "download failed with status: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    // Stream the body to disk in 8 KiB chunks
    let mut file = File::create(&dest_path)?;
    let mut reader = response;
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| OdtError::network(format!("download interrupted: {}", e)))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])?;
        downloaded += bytes_read as u64;

        if total_size > 0 {
            let percent = ((downloaded * 100) / total_size) as u32;
            progress_callback(percent);
        }
    }

    // Make sure everything hits disk before setup.exe gets launched
    file.flush()?;
    drop(file);

    progress_callback(100);
    info!("Download complete ({} bytes) -> {}", downloaded, dest_path.display());

    Ok(dest_path)
}
