// ============================================
// editions.rs - Office edition tables
// ============================================
//
// Maps each supported Office edition to its update channel and the
// product IDs / license keys the Office Deployment Tool expects.
// The literal values must stay exactly as they are - setup.exe matches
// them against its own catalog, so a typo here breaks the install.
// ============================================

use crate::error::{OdtError, Result};

// ============================================
// EDITION DEFINITIONS
// ============================================

/// Everything the configuration builder needs to know about one edition:
/// the update channel plus (product ID, PIDKEY) for the main suite and
/// the Visio / Project companion products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionSpec {
    /// Edition name as the user selects it (e.g. "2021")
    pub name: &'static str,
    /// Update channel / servicing track (e.g. "PerpetualVL2021")
    pub channel: &'static str,
    /// Main suite product ID
    pub product_id: &'static str,
    /// Volume license key for the main suite.
    /// None for 365 - its main product is subscription-licensed.
    pub pidkey: Option<&'static str>,
    /// Visio companion product ID
    pub visio_product_id: &'static str,
    /// Visio volume license key
    pub visio_pidkey: &'static str,
    /// Project companion product ID
    pub project_product_id: &'static str,
    /// Project volume license key
    pub project_pidkey: &'static str,
}

/// Office 2019 - perpetual volume license
pub const OFFICE_2019: EditionSpec = EditionSpec {
    name: "2019",
    channel: "PerpetualVL2019",
    product_id: "ProPlus2019Volume",
    pidkey: Some("NMMKJ-6RK4F-KMJVX-8D9MJ-6MWKP"),
    visio_product_id: "VisioPro2019Volume",
    visio_pidkey: "9BGNQ-K37YR-RQHF2-38RQ3-7VCBB",
    project_product_id: "ProjectPro2019Volume",
    project_pidkey: "B4NPR-3FKK7-T2MBV-FRQ4W-PKD2B",
};

/// Office 2021 - perpetual volume license
pub const OFFICE_2021: EditionSpec = EditionSpec {
    name: "2021",
    channel: "PerpetualVL2021",
    product_id: "ProPlus2021Volume",
    pidkey: Some("FXYTK-NJJ8C-GB6DW-3DYQT-6F7TH"),
    visio_product_id: "VisioPro2021Volume",
    visio_pidkey: "KNH8D-FGHT4-T8RK3-CTDYJ-K2HT4",
    project_product_id: "ProjectPro2021Volume",
    project_pidkey: "FTNWT-C6WBT-8HMGF-K9PRX-QV9H8",
};

/// Microsoft 365 - subscription, Current channel.
/// The main product carries no PIDKEY; the Visio/Project companions
/// still ship as 2024 volume products.
pub const OFFICE_365: EditionSpec = EditionSpec {
    name: "365",
    channel: "Current",
    product_id: "O365ProPlusRetail",
    pidkey: None,
    visio_product_id: "VisioPro2024Volume",
    visio_pidkey: "B7TN8-FJ8V3-7QYCP-HQPMV-YY89G",
    project_product_id: "ProjectPro2024Volume",
    project_pidkey: "FQQ23-N4YCY-73HQ3-FM9WC-76HF4",
};

/// All editions the tool can install, in UI order
pub const SUPPORTED_EDITIONS: &[&EditionSpec] = &[&OFFICE_2019, &OFFICE_2021, &OFFICE_365];

/// Office 2016 is still a recognized user choice, but we refuse to
/// install it. Kept out of the table on purpose - it's a policy
/// decision, not a data-mapping concern.
const LEGACY_EDITION: &str = "2016";

// ============================================
// LOOKUP
// ============================================

/// Look up the edition table entry for a user-supplied edition string.
///
/// # Arguments
/// * `edition` - Edition name, e.g. "2019", "2021", "365"
///
/// # Returns
/// * `Ok(&EditionSpec)` - matching table entry
/// * `Err(InvalidEdition)` - anything outside the supported set
pub fn resolve_edition(edition: &str) -> Result<&'static EditionSpec> {
    SUPPORTED_EDITIONS
        .iter()
        .copied()
        .find(|spec| spec.name == edition)
        .ok_or_else(|| OdtError::InvalidEdition(edition.to_string()))
}

/// Is this the unsupported legacy edition ("2016")?
/// Callers check this BEFORE resolving - 2016 gets a user-facing warning,
/// not an invalid-edition error, and never reaches the builder.
pub fn is_legacy_edition(edition: &str) -> bool {
    edition == LEGACY_EDITION
}

// ============================================
// TESTS
// ============================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported_editions() {
        let spec = resolve_edition("2019").unwrap();
        assert_eq!(spec.channel, "PerpetualVL2019");
        assert_eq!(spec.product_id, "ProPlus2019Volume");
        assert_eq!(spec.pidkey, Some("NMMKJ-6RK4F-KMJVX-8D9MJ-6MWKP"));

        let spec = resolve_edition("2021").unwrap();
        assert_eq!(spec.channel, "PerpetualVL2021");
        assert_eq!(spec.product_id, "ProPlus2021Volume");
        assert_eq!(spec.pidkey, Some("FXYTK-NJJ8C-GB6DW-3DYQT-6F7TH"));

        let spec = resolve_edition("365").unwrap();
        assert_eq!(spec.channel, "Current");
        assert_eq!(spec.product_id, "O365ProPlusRetail");
        assert_eq!(spec.pidkey, None);
    }

    #[test]
    fn test_companion_products() {
        let spec = resolve_edition("365").unwrap();
        assert_eq!(spec.visio_product_id, "VisioPro2024Volume");
        assert_eq!(spec.project_product_id, "ProjectPro2024Volume");

        let spec = resolve_edition("2021").unwrap();
        assert_eq!(spec.visio_pidkey, "KNH8D-FGHT4-T8RK3-CTDYJ-K2HT4");
        assert_eq!(spec.project_pidkey, "FTNWT-C6WBT-8HMGF-K9PRX-QV9H8");
    }

    #[test]
    fn test_resolve_invalid_edition() {
        let err = resolve_edition("2024").unwrap_err();
        assert!(matches!(err, crate::error::OdtError::InvalidEdition(_)));

        // Empty string is invalid too
        assert!(resolve_edition("").is_err());

        // 2016 is NOT in the table - legacy handling happens upstream
        assert!(resolve_edition("2016").is_err());
    }

    #[test]
    fn test_legacy_edition_check() {
        assert!(is_legacy_edition("2016"));
        assert!(!is_legacy_edition("2019"));
        assert!(!is_legacy_edition("365"));
    }
}
