// ============================================
// configuration.rs - ODT configuration builder
// ============================================
//
// Builds the Configuration.xml document that setup.exe consumes.
// This is a pure function of (edition, language, selected apps,
// architecture) - no I/O, no shared state, safe to call from anywhere.
// The only failure mode is an unknown edition string.
//
// Document shape:
//   <Configuration ID="...">
//     <Add OfficeClientEdition="64" Channel="...">
//       <Product ID="..." PIDKEY="...">   (main suite, always present)
//         <Language ID="en-us"/>
//         <ExcludeApp ID="..."/>          (repeated)
//       </Product>
//       <Product .../>                    (Visio, only if selected)
//       <Product .../>                    (Project, only if selected)
//     </Add>
//     <Property .../> x5, <Updates/>, <RemoveMSI/>, <Display/>
//   </Configuration>
// ============================================

use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editions::{resolve_edition, EditionSpec};
use crate::error::{OdtError, Result};

// ============================================
// APPLICATION CATALOG
// ============================================

/// Suite applications the user can toggle. Apps NOT selected end up in
/// the exclusion list of every product block.
/// Visio and Project are deliberately absent: selecting them adds a
/// companion product block instead of removing an exclusion.
pub const APP_CATALOG: &[&str] = &[
    "Access",
    "OneNote",
    "PowerPoint",
    "Teams",
    "Excel",
    "Outlook",
    "Publisher",
    "Word",
];

/// These three are excluded unconditionally. The source tool never let
/// users opt in to them, and we preserve that policy.
pub const ALWAYS_EXCLUDED: &[&str] = &["OneDrive", "Groove", "Lync"];

/// Companion products that get their own <Product> block when selected
pub const COMPANION_APPS: &[&str] = &["Visio", "Project"];

/// Language used when the caller supplies an empty tag
const DEFAULT_LANGUAGE: &str = "en_US";

/// Fixed property assertions emitted after the <Add> block, in order
const PROPERTIES: &[(&str, &str)] = &[
    ("SharedComputerLicensing", "0"),
    ("FORCEAPPSHUTDOWN", "FALSE"),
    ("DeviceBasedLicensing", "0"),
    ("SCLCacheOverride", "0"),
    ("AUTOACTIVATE", "1"),
];

// ============================================
// ARCHITECTURE
// ============================================

/// Office client architecture, passed through verbatim as the
/// OfficeClientEdition attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "32")]
    X86,
    #[default]
    #[serde(rename = "64")]
    X64,
}

impl Architecture {
    /// The attribute value setup.exe expects ("32" or "64")
    pub fn tag(self) -> &'static str {
        match self {
            Architecture::X86 => "32",
            Architecture::X64 => "64",
        }
    }
}

impl std::str::FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "32" | "x86" => Ok(Architecture::X86),
            "64" | "x64" => Ok(Architecture::X64),
            other => Err(format!("invalid architecture '{}' (expected 32 or 64)", other)),
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.tag())
    }
}

// ============================================
// INPUT NORMALIZATION
// ============================================

/// Normalize a locale tag to the format setup.exe expects:
/// underscore becomes hyphen, everything lowercased ("en_US" -> "en-us").
/// Empty input falls back to the default language. No validation against
/// a real locale list - unknown tags pass through unchanged.
pub fn normalize_language_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    let tag = if trimmed.is_empty() { DEFAULT_LANGUAGE } else { trimmed };
    tag.replace('_', "-").to_lowercase()
}

/// Compute the exclusion list for a selection: every catalog app the user
/// did NOT pick (matched case-insensitively), then the always-excluded
/// trio. Catalog order is preserved so output is deterministic.
pub fn excluded_apps(selected: &[String]) -> Vec<&'static str> {
    let mut excluded: Vec<&'static str> = APP_CATALOG
        .iter()
        .copied()
        .filter(|app| !selected.iter().any(|s| s.eq_ignore_ascii_case(app)))
        .collect();
    excluded.extend_from_slice(ALWAYS_EXCLUDED);
    excluded
}

// ============================================
// DOCUMENT ASSEMBLY
// ============================================

/// Build the configuration document with a freshly generated ID.
///
/// # Arguments
/// * `edition` - "2019", "2021" or "365" (anything else fails)
/// * `language` - locale tag like "en_US"; empty defaults to en_US
/// * `selected_apps` - canonical app names the user wants installed
/// * `arch` - client architecture
///
/// # Returns
/// * `Ok(String)` - serialized UTF-8 XML with declaration
/// * `Err(InvalidEdition)` - the only error this function raises
pub fn build_configuration(
    edition: &str,
    language: &str,
    selected_apps: &[String],
    arch: Architecture,
) -> Result<String> {
    build_configuration_with_id(
        edition,
        language,
        selected_apps,
        arch,
        &Uuid::new_v4().to_string(),
    )
}

/// Same as [`build_configuration`] but with a caller-supplied document ID,
/// so tests can pin the one non-deterministic part of the output.
pub fn build_configuration_with_id(
    edition: &str,
    language: &str,
    selected_apps: &[String],
    arch: Architecture,
    document_id: &str,
) -> Result<String> {
    let spec = resolve_edition(edition)?;
    let language_tag = normalize_language_tag(language);
    let excluded = excluded_apps(selected_apps);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(
        &mut writer,
        spec,
        &language_tag,
        selected_apps,
        &excluded,
        arch,
        document_id,
    )?;

    // The writer targets an in-memory Vec and only ever emits UTF-8;
    // surface an error rather than corrupting output if that ever breaks
    let bytes = writer.into_inner();
    String::from_utf8(bytes)
        .map_err(|e| OdtError::filesystem(format!("configuration is not valid UTF-8: {}", e)))
}

/// Emit the full document through the XML writer
fn write_document(
    writer: &mut Writer<Vec<u8>>,
    spec: &EditionSpec,
    language_tag: &str,
    selected_apps: &[String],
    excluded: &[&str],
    arch: Architecture,
    document_id: &str,
) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))))?;

    let mut root = BytesStart::new("Configuration");
    root.push_attribute(("ID", document_id));
    writer.write_event(Event::Start(root))?;

    let mut add = BytesStart::new("Add");
    add.push_attribute(("OfficeClientEdition", arch.tag()));
    add.push_attribute(("Channel", spec.channel));
    writer.write_event(Event::Start(add))?;

    // Main suite - always exactly one block
    write_product(writer, spec.product_id, spec.pidkey, language_tag, excluded)?;

    // Companion products, gated strictly by selection (exact catalog names)
    if selected_apps.iter().any(|app| app == "Visio") {
        write_product(
            writer,
            spec.visio_product_id,
            Some(spec.visio_pidkey),
            language_tag,
            excluded,
        )?;
    }
    if selected_apps.iter().any(|app| app == "Project") {
        write_product(
            writer,
            spec.project_product_id,
            Some(spec.project_pidkey),
            language_tag,
            excluded,
        )?;
    }

    writer.write_event(Event::End(BytesEnd::new("Add")))?;

    // Fixed property tail
    for (name, value) in PROPERTIES {
        let mut property = BytesStart::new("Property");
        property.push_attribute(("Name", *name));
        property.push_attribute(("Value", *value));
        writer.write_event(Event::Empty(property))?;
    }

    let mut updates = BytesStart::new("Updates");
    updates.push_attribute(("Enabled", "TRUE"));
    writer.write_event(Event::Empty(updates))?;

    // Uninstall any prior MSI-based Office before installing
    writer.write_event(Event::Empty(BytesStart::new("RemoveMSI")))?;

    let mut display = BytesStart::new("Display");
    display.push_attribute(("Level", "Full"));
    display.push_attribute(("AcceptEULA", "TRUE"));
    writer.write_event(Event::Empty(display))?;

    writer.write_event(Event::End(BytesEnd::new("Configuration")))?;
    Ok(())
}

/// Emit one <Product> block: optional PIDKEY, the language element and
/// the shared exclusion list
fn write_product(
    writer: &mut Writer<Vec<u8>>,
    product_id: &str,
    pidkey: Option<&str>,
    language_tag: &str,
    excluded: &[&str],
) -> io::Result<()> {
    let mut product = BytesStart::new("Product");
    product.push_attribute(("ID", product_id));
    if let Some(key) = pidkey {
        product.push_attribute(("PIDKEY", key));
    }
    writer.write_event(Event::Start(product))?;

    let mut language = BytesStart::new("Language");
    language.push_attribute(("ID", language_tag));
    writer.write_event(Event::Empty(language))?;

    for app in excluded {
        let mut exclude = BytesStart::new("ExcludeApp");
        exclude.push_attribute(("ID", *app));
        writer.write_event(Event::Empty(exclude))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Product")))?;
    Ok(())
}
