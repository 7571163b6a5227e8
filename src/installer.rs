// ============================================
// installer.rs - Filesystem and setup.exe launch
// ============================================
//
// The collaborators around the configuration builder:
//   - install directory handling (C:\Office by default)
//   - writing Configuration.xml next to setup.exe
//   - launching setup.exe /configure and waiting for it
//
// Launching is Windows-only. The configuration builder and the download
// work everywhere, which keeps tests runnable on any platform.
// ============================================

use std::fs;
use std::path::{Path, PathBuf};
#[cfg(windows)]
use std::process::Command;

use tracing::info;

use crate::download::SETUP_EXE_NAME;
use crate::error::{OdtError, Result};

// ============================================
// CONSTANTS
// ============================================

/// Filename of the generated configuration document
pub const CONFIG_FILE_NAME: &str = "Configuration.xml";

// ============================================
// INSTALL DIRECTORY
// ============================================

/// Default directory that holds setup.exe and Configuration.xml.
/// C:\Office matches what Office admins expect; on non-Windows
/// platforms (useful for config-only runs) we fall back to a
/// subdirectory of the system temp dir.
pub fn default_install_dir() -> PathBuf {
    #[cfg(windows)]
    {
        PathBuf::from(r"C:\Office")
    }
    #[cfg(not(windows))]
    {
        std::env::temp_dir().join("Office")
    }
}

/// Create the install directory if it doesn't exist yet
pub fn ensure_install_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| OdtError::filesystem(format!("could not create {}: {}", dir.display(), e)))
}

/// Write the serialized configuration document beside setup.exe.
///
/// # Returns
/// * `Ok(PathBuf)` - path of the written Configuration.xml
pub fn write_configuration(dir: &Path, xml: &str) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    fs::write(&path, xml)
        .map_err(|e| OdtError::filesystem(format!("could not write {}: {}", path.display(), e)))?;
    info!("Wrote configuration to {}", path.display());
    Ok(path)
}

// ============================================
// SETUP LAUNCH
// ============================================

/// Launch setup.exe with the generated configuration and wait for it.
/// Runs: setup.exe /configure Configuration.xml
/// with the install directory as working directory, so the relative
/// config path resolves the same way regardless of where we were started.
///
/// This blocks for a LONG time - a full Office install takes many minutes.
///
/// # Returns
/// * `Ok(())` - setup.exe exited successfully
/// * `Err(ProcessLaunchFailure)` - setup.exe missing or failed to start
/// * `Err(ProcessNonZeroExit)` - setup.exe ran but reported failure
pub fn run_setup(install_dir: &Path) -> Result<()> {
    let setup_path = install_dir.join(SETUP_EXE_NAME);
    if !setup_path.exists() {
        return Err(OdtError::ProcessLaunchFailure(format!(
            "{} not found - download it first",
            setup_path.display()
        )));
    }

    #[cfg(windows)]
    {
        info!("Launching {} /configure {}", setup_path.display(), CONFIG_FILE_NAME);

        let mut child = Command::new(&setup_path)
            .args(["/configure", CONFIG_FILE_NAME])
            .current_dir(install_dir)
            .spawn()
            .map_err(|e| OdtError::ProcessLaunchFailure(e.to_string()))?;

        info!("Installer running (PID: {})", child.id());

        let status = child
            .wait()
            .map_err(|e| OdtError::ProcessLaunchFailure(format!("failed to wait: {}", e)))?;

        if status.success() {
            info!("Installer finished successfully");
            Ok(())
        } else {
            Err(OdtError::ProcessNonZeroExit(status.code().unwrap_or(-1)))
        }
    }

    #[cfg(not(windows))]
    {
        Err(OdtError::ProcessLaunchFailure(
            "Office installation is only supported on Windows".to_string(),
        ))
    }
}

// ============================================
// TESTS
// ============================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_and_write_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("Office");

        ensure_install_dir(&target).unwrap();
        assert!(target.is_dir());

        let path = write_configuration(&target, "<Configuration/>").unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<Configuration/>");
    }

    #[test]
    fn test_write_configuration_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        write_configuration(dir.path(), "first").unwrap();
        let path = write_configuration(dir.path(), "second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_run_setup_without_bootstrapper() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_setup(dir.path()).unwrap_err();
        assert!(matches!(err, OdtError::ProcessLaunchFailure(_)));
    }
}
