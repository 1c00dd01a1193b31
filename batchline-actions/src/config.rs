//! Transfer tooling configuration
//!
//! Images and retry settings used for every transfer action the builder
//! emits.

use std::time::Duration;

/// Default image for cloud SDK shell actions
pub const DEFAULT_CLOUD_SDK_IMAGE: &str = "gcr.io/google.com/cloudsdktool/cloud-sdk:354.0.0-alpine";

/// Default image of the DRS localizer
pub const DEFAULT_DRS_LOCALIZER_IMAGE: &str = "broadinstitute/drs-localizer:latest";

/// Configuration for transfer actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    /// Image running gsutil, shell helpers and timestamp markers
    pub cloud_sdk_image: String,

    /// Image resolving and downloading `drs://` inputs
    pub drs_localizer_image: String,

    /// Attempts per file transfer before the action fails
    pub transfer_attempts: u32,

    /// Seconds to wait between transfer attempts
    pub retry_delay_seconds: u32,

    /// Schemes handled by the bulk localization script
    pub bulk_schemes: Vec<String>,

    /// Timeout applied to every transfer action
    pub action_timeout: Option<Duration>,
}

impl TransferConfig {
    /// Whether inputs with this scheme are localized in bulk
    pub fn is_bulk_scheme(&self, scheme: &str) -> bool {
        self.bulk_schemes
            .iter()
            .any(|bulk| bulk.eq_ignore_ascii_case(scheme))
    }

    pub fn with_bulk_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.bulk_schemes.push(scheme.into());
        self
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            cloud_sdk_image: DEFAULT_CLOUD_SDK_IMAGE.to_string(),
            drs_localizer_image: DEFAULT_DRS_LOCALIZER_IMAGE.to_string(),
            transfer_attempts: 3,
            retry_delay_seconds: 5,
            bulk_schemes: vec!["gs".to_string()],
            action_timeout: None,
        }
    }
}
