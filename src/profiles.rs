// ============================================
// profiles.rs - Deployment profile save/load
// ============================================
//
// A profile captures one deployment selection (edition, language,
// architecture, apps) as a JSON file, so repeat installs don't need the
// full flag set again. Profiles live in profiles/ next to the EXE -
// on a technician's USB stick they travel with the tool.
// ============================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::configuration::Architecture;
use crate::error::{OdtError, Result};

// ============================================
// DATA STRUCTURES
// ============================================

/// One saved deployment selection.
/// Maps 1:1 to the install command's flags for easy round-tripping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployProfile {
    /// Edition name ("2019", "2021", "365")
    pub edition: String,
    /// Locale tag as the user typed it (e.g. "en_US")
    pub language: String,
    /// Client architecture
    pub arch: Architecture,
    /// Selected applications (canonical catalog names)
    pub apps: Vec<String>,
}

// ============================================
// PROFILE STORE
// ============================================

/// Get the profiles directory (next to the EXE).
/// Creates the directory if it doesn't exist.
fn profiles_dir() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    let dir = exe_dir.join("profiles");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    dir
}

/// Save a profile as profiles/<name>.json next to the EXE.
///
/// # Arguments
/// * `name` - profile name (used as filename, sanitized)
/// * `profile` - the selection to save
pub fn save_profile(name: &str, profile: &DeployProfile) -> Result<()> {
    save_profile_in(&profiles_dir(), name, profile)
}

/// Load a named profile from the store.
pub fn load_profile(name: &str) -> Result<DeployProfile> {
    load_profile_in(&profiles_dir(), name)
}

/// List all saved profile names, sorted alphabetically.
pub fn list_profiles() -> Vec<String> {
    list_profiles_in(&profiles_dir())
}

/// Delete a named profile from the store.
pub fn delete_profile(name: &str) -> Result<()> {
    delete_profile_in(&profiles_dir(), name)
}

// Directory-parameterized internals (also used by the tests)

fn save_profile_in(dir: &Path, name: &str, profile: &DeployProfile) -> Result<()> {
    // Sanitize the filename (strip path separators and other odd chars)
    let safe_name: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect();

    if safe_name.is_empty() {
        return Err(OdtError::filesystem("profile name cannot be empty"));
    }

    let json = serde_json::to_string_pretty(profile)
        .map_err(|e| OdtError::filesystem(format!("failed to serialize profile: {}", e)))?;

    let file_path = dir.join(format!("{}.json", safe_name));
    fs::write(&file_path, json)
        .map_err(|e| OdtError::filesystem(format!("failed to write profile: {}", e)))?;

    info!("Saved profile '{}' to {}", safe_name, file_path.display());
    Ok(())
}

fn load_profile_in(dir: &Path, name: &str) -> Result<DeployProfile> {
    let file_path = dir.join(format!("{}.json", name));

    if !file_path.exists() {
        return Err(OdtError::filesystem(format!("profile '{}' not found", name)));
    }

    let json = fs::read_to_string(&file_path)
        .map_err(|e| OdtError::filesystem(format!("failed to read profile: {}", e)))?;

    let profile: DeployProfile = serde_json::from_str(&json)
        .map_err(|e| OdtError::filesystem(format!("failed to parse profile: {}", e)))?;

    info!("Loaded profile '{}' from {}", name, file_path.display());
    Ok(profile)
}

fn list_profiles_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().to_string());
                }
            }
        }
    }

    names.sort();
    names
}

fn delete_profile_in(dir: &Path, name: &str) -> Result<()> {
    let file_path = dir.join(format!("{}.json", name));

    if !file_path.exists() {
        return Err(OdtError::filesystem(format!("profile '{}' not found", name)));
    }

    fs::remove_file(&file_path)
        .map_err(|e| OdtError::filesystem(format!("failed to delete profile: {}", e)))?;

    info!("Deleted profile '{}'", name);
    Ok(())
}

// ============================================
// TESTS
// ============================================
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeployProfile {
        DeployProfile {
            edition: "2021".to_string(),
            language: "vi_VN".to_string(),
            arch: Architecture::X64,
            apps: vec!["Word".to_string(), "Excel".to_string(), "Visio".to_string()],
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        save_profile_in(dir.path(), "workstation", &sample()).unwrap();

        let loaded = load_profile_in(dir.path(), "workstation").unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_filename_sanitization() {
        let dir = tempfile::tempdir().unwrap();
        save_profile_in(dir.path(), "../evil/name", &sample()).unwrap();

        // Separators and dots are stripped; only "evilname" remains
        assert!(dir.path().join("evilname.json").exists());
        assert!(!dir.path().join("..").join("evil").exists());
    }

    #[test]
    fn test_empty_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(save_profile_in(dir.path(), "///", &sample()).is_err());
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        save_profile_in(dir.path(), "beta", &sample()).unwrap();
        save_profile_in(dir.path(), "alpha", &sample()).unwrap();

        assert_eq!(list_profiles_in(dir.path()), vec!["alpha", "beta"]);

        delete_profile_in(dir.path(), "alpha").unwrap();
        assert_eq!(list_profiles_in(dir.path()), vec!["beta"]);

        // Deleting twice fails
        assert!(delete_profile_in(dir.path(), "alpha").is_err());
    }

    #[test]
    fn test_load_missing_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_profile_in(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, OdtError::FilesystemFailure(_)));
    }

    #[test]
    fn test_arch_serializes_as_tag() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains(r#""arch":"64""#));
    }
}
