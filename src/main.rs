// ============================================
// OfficeDeploy - main.rs
// ============================================
//
// Command-line Office installer built around the Office Deployment Tool.
// The flow mirrors what an admin would do by hand:
// 1. Generate Configuration.xml for the chosen edition/language/apps
// 2. Download setup.exe (the ODT bootstrapper) from the Microsoft CDN
// 3. Write both into the install directory
// 4. Run setup.exe /configure Configuration.xml and wait
//
// Any step failing aborts the whole flow and is reported once.
// ============================================

mod configuration;
mod download;
mod editions;
mod error;
mod installer;
mod profiles;

use std::cell::Cell;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use crate::configuration::{build_configuration, Architecture, APP_CATALOG, COMPANION_APPS};
use crate::editions::is_legacy_edition;
use crate::error::OdtError;
use crate::profiles::DeployProfile;

// ============================================
// CLI DEFINITION
// ============================================

/// OfficeDeploy - unattended Office installation via the ODT
#[derive(Parser)]
#[command(name = "officedeploy")]
#[command(about = "Generates an ODT configuration, downloads setup.exe and runs the install")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the Office Deployment Tool and run the installation
    Install(InstallArgs),
    /// Print the configuration XML to stdout without installing anything
    Generate(SelectionArgs),
    /// Manage saved deployment profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileCommands,
    },
}

/// Edition / language / architecture / app selection flags
#[derive(Args, Clone)]
struct SelectionArgs {
    /// Office edition to install: 2019, 2021 or 365
    #[arg(short, long)]
    edition: Option<String>,

    /// Installation language, e.g. en_US or vi_VN
    #[arg(short, long, default_value = "en_US")]
    language: String,

    /// Client architecture: 32 or 64
    #[arg(short, long, default_value = "64")]
    arch: Architecture,

    /// Applications to install, comma-separated (Access, OneNote,
    /// PowerPoint, Teams, Excel, Outlook, Publisher, Word, Visio, Project)
    #[arg(short = 'A', long, value_delimiter = ',')]
    apps: Vec<String>,
}

#[derive(Args)]
struct InstallArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Target directory for setup.exe and Configuration.xml
    /// (default: C:\Office)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Generate and write Configuration.xml only - skip download and install
    #[arg(long)]
    config_only: bool,

    /// Load the selection from a saved profile instead of flags
    #[arg(long, conflicts_with_all = ["edition", "language", "arch", "apps"])]
    profile: Option<String>,

    /// Save this selection as a named profile before installing
    #[arg(long)]
    save_profile: Option<String>,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// List all saved profiles
    List,
    /// Delete a saved profile
    Delete {
        /// Profile name
        name: String,
    },
}

// ============================================
// LOGGING
// ============================================

/// Initialize timestamped progress logging.
/// RUST_LOG overrides the default "info" level.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

// ============================================
// ENTRY POINT
// ============================================

fn main() {
    init_logging();
    info!("OfficeDeploy v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install(args) => run_install(args),
        Commands::Generate(args) => run_generate(args),
        Commands::Profiles { action } => run_profiles(action),
    };

    if let Err(err) = result {
        // 2016 is a user-input warning, not a failure: tell the user and
        // stop, the way the original tool showed a message box
        if matches!(err.downcast_ref::<OdtError>(), Some(OdtError::UnsupportedLegacyEdition)) {
            warn!("{}", err);
            return;
        }
        error!("{:#}", err);
        std::process::exit(1);
    }
}

// ============================================
// SELECTION HANDLING
// ============================================

/// Map user-typed app names onto canonical catalog spellings
/// (case-insensitive). Unknown names are kept as typed - the exclusion
/// algebra simply ignores them, matching the original behavior.
fn canonicalize_apps(apps: &[String]) -> Vec<String> {
    apps.iter()
        .map(|app| {
            APP_CATALOG
                .iter()
                .chain(COMPANION_APPS.iter())
                .find(|known| known.eq_ignore_ascii_case(app))
                .map(|known| known.to_string())
                .unwrap_or_else(|| {
                    warn!("Unknown application '{}' - it will not be installed", app);
                    app.clone()
                })
        })
        .collect()
}

/// Turn flags (or a saved profile) into one resolved selection
fn resolve_selection(args: &InstallArgs) -> anyhow::Result<DeployProfile> {
    if let Some(name) = &args.profile {
        let profile = profiles::load_profile(name)?;
        return Ok(profile);
    }

    let edition = args
        .selection
        .edition
        .clone()
        .context("--edition is required (or load a saved selection with --profile)")?;

    Ok(DeployProfile {
        edition,
        language: args.selection.language.clone(),
        arch: args.selection.arch,
        apps: canonicalize_apps(&args.selection.apps),
    })
}

// ============================================
// COMMANDS
// ============================================

/// The full deployment pipeline, one linear pass
fn run_install(args: InstallArgs) -> anyhow::Result<()> {
    let selection = resolve_selection(&args)?;

    // Legacy pre-check - 2016 never reaches the configuration builder
    if is_legacy_edition(&selection.edition) {
        return Err(OdtError::UnsupportedLegacyEdition.into());
    }

    if let Some(name) = &args.save_profile {
        profiles::save_profile(name, &selection)?;
    }

    info!("Edition: Office {}", selection.edition);
    info!("Language: {}, architecture: {}", selection.language, selection.arch);
    info!("Selected applications: {}", selection.apps.join(", "));

    info!("Generating configuration file...");
    let xml = build_configuration(
        &selection.edition,
        &selection.language,
        &selection.apps,
        selection.arch,
    )?;

    let install_dir = args.dir.unwrap_or_else(installer::default_install_dir);
    installer::ensure_install_dir(&install_dir)?;
    installer::write_configuration(&install_dir, &xml)?;

    if args.config_only {
        info!("Configuration written to {} - skipping install", install_dir.display());
        return Ok(());
    }

    // Log download progress in 20% steps instead of every chunk
    let last_bucket = Cell::new(u32::MAX);
    download::download_setup(&install_dir, |percent| {
        let bucket = percent / 20;
        if bucket != last_bucket.get() {
            last_bucket.set(bucket);
            info!("Downloading setup.exe... {}%", percent.min(100));
        }
    })?;

    info!("Installing Office... this will take a while");
    installer::run_setup(&install_dir)?;

    info!("Office installation complete");
    Ok(())
}

/// Print the configuration document for inspection
fn run_generate(args: SelectionArgs) -> anyhow::Result<()> {
    let edition = args.edition.context("--edition is required")?;

    if is_legacy_edition(&edition) {
        return Err(OdtError::UnsupportedLegacyEdition.into());
    }

    let xml = build_configuration(
        &edition,
        &args.language,
        &canonicalize_apps(&args.apps),
        args.arch,
    )?;
    println!("{}", xml);
    Ok(())
}

/// Profile management subcommands
fn run_profiles(action: ProfileCommands) -> anyhow::Result<()> {
    match action {
        ProfileCommands::List => {
            let names = profiles::list_profiles();
            if names.is_empty() {
                println!("No saved profiles.");
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        ProfileCommands::Delete { name } => {
            profiles::delete_profile(&name)?;
        }
    }
    Ok(())
}

// ============================================
// TESTS
// ============================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_known_names() {
        let apps: Vec<String> = vec!["word".into(), "EXCEL".into(), "visio".into()];
        assert_eq!(canonicalize_apps(&apps), vec!["Word", "Excel", "Visio"]);
    }

    #[test]
    fn test_canonicalize_keeps_unknown_names() {
        let apps: Vec<String> = vec!["Frontpage".into()];
        assert_eq!(canonicalize_apps(&apps), vec!["Frontpage"]);
    }

    #[test]
    fn test_cli_parses_install_flags() {
        let cli = Cli::try_parse_from([
            "officedeploy",
            "install",
            "--edition",
            "2021",
            "--language",
            "vi_VN",
            "--arch",
            "32",
            "--apps",
            "Word,Excel,Visio",
            "--config-only",
        ])
        .unwrap();

        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.selection.edition.as_deref(), Some("2021"));
                assert_eq!(args.selection.language, "vi_VN");
                assert_eq!(args.selection.arch, Architecture::X86);
                assert_eq!(args.selection.apps, vec!["Word", "Excel", "Visio"]);
                assert!(args.config_only);
                assert!(args.profile.is_none());
            }
            _ => panic!("expected install command"),
        }
    }

    #[test]
    fn test_cli_rejects_profile_with_selection_flags() {
        // --profile replaces the whole selection, so every selection flag
        // conflicts with it
        for flag in [
            vec!["--edition", "2021"],
            vec!["--language", "vi_VN"],
            vec!["--arch", "32"],
            vec!["--apps", "Word"],
        ] {
            let mut argv = vec!["officedeploy", "install", "--profile", "workstation"];
            argv.extend(flag);
            let parsed = Cli::try_parse_from(argv.iter().copied());
            assert!(parsed.is_err(), "expected conflict for {:?}", argv);
        }

        // --profile on its own parses fine
        assert!(
            Cli::try_parse_from(["officedeploy", "install", "--profile", "workstation"]).is_ok()
        );
    }

    fn selection(edition: &str) -> SelectionArgs {
        SelectionArgs {
            edition: Some(edition.to_string()),
            language: "en_US".to_string(),
            arch: Architecture::X64,
            apps: vec!["Word".to_string()],
        }
    }

    #[test]
    fn test_generate_refuses_legacy_edition() {
        // 2016 short-circuits as the legacy warning before the builder
        // runs - it must NOT surface as an invalid-edition error
        let err = run_generate(selection("2016")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OdtError>(),
            Some(OdtError::UnsupportedLegacyEdition)
        ));
    }

    #[test]
    fn test_install_refuses_legacy_edition() {
        let args = InstallArgs {
            selection: selection("2016"),
            dir: None,
            config_only: true,
            profile: None,
            save_profile: None,
        };
        let err = run_install(args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OdtError>(),
            Some(OdtError::UnsupportedLegacyEdition)
        ));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["officedeploy", "generate", "--edition", "365"]).unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.language, "en_US");
                assert_eq!(args.arch, Architecture::X64);
                assert!(args.apps.is_empty());
            }
            _ => panic!("expected generate command"),
        }
    }
}
