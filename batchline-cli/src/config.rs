//! CLI configuration
//!
//! Transfer tooling and classification settings, loaded from the
//! environment with defaults for anything unset.

use std::time::Duration;

use batchline_actions::TransferConfig;
use batchline_status::detector::DEFAULT_PREEMPTION_MARKER;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Image for gsutil transfers and timestamp markers
    pub cloud_sdk_image: String,

    /// Image resolving `drs://` inputs
    pub drs_localizer_image: String,

    /// Attempts per file transfer
    pub transfer_attempts: u32,

    /// Pause between transfer attempts
    pub retry_delay: Duration,

    /// Schemes localized by the bulk localization script
    pub bulk_schemes: Vec<String>,

    /// Timeout applied to transfer actions
    pub action_timeout: Option<Duration>,

    /// Substring identifying preempted workers in `ABORTED` errors
    pub preemption_marker: String,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        let transfer = TransferConfig::default();
        Self {
            cloud_sdk_image: transfer.cloud_sdk_image,
            drs_localizer_image: transfer.drs_localizer_image,
            transfer_attempts: transfer.transfer_attempts,
            retry_delay: Duration::from_secs(u64::from(transfer.retry_delay_seconds)),
            bulk_schemes: transfer.bulk_schemes,
            action_timeout: transfer.action_timeout,
            preemption_marker: DEFAULT_PREEMPTION_MARKER.to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognised environment variables, all optional:
    /// - BATCHLINE_CLOUD_SDK_IMAGE
    /// - BATCHLINE_DRS_LOCALIZER_IMAGE
    /// - BATCHLINE_TRANSFER_ATTEMPTS (default: 3)
    /// - BATCHLINE_RETRY_DELAY (seconds, default: 5)
    /// - BATCHLINE_BULK_SCHEMES (comma separated, default: gs)
    /// - BATCHLINE_ACTION_TIMEOUT (seconds, default: none)
    /// - BATCHLINE_PREEMPTION_MARKER
    pub fn from_env() -> Self {
        let defaults = Self::new();

        let cloud_sdk_image =
            std::env::var("BATCHLINE_CLOUD_SDK_IMAGE").unwrap_or(defaults.cloud_sdk_image);

        let drs_localizer_image = std::env::var("BATCHLINE_DRS_LOCALIZER_IMAGE")
            .unwrap_or(defaults.drs_localizer_image);

        let transfer_attempts = std::env::var("BATCHLINE_TRANSFER_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.transfer_attempts);

        let retry_delay = std::env::var("BATCHLINE_RETRY_DELAY")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry_delay);

        let bulk_schemes = std::env::var("BATCHLINE_BULK_SCHEMES")
            .ok()
            .map(|s| parse_schemes(&s))
            .unwrap_or(defaults.bulk_schemes);

        let action_timeout = std::env::var("BATCHLINE_ACTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .or(defaults.action_timeout);

        let preemption_marker = std::env::var("BATCHLINE_PREEMPTION_MARKER")
            .unwrap_or(defaults.preemption_marker);

        Self {
            cloud_sdk_image,
            drs_localizer_image,
            transfer_attempts,
            retry_delay,
            bulk_schemes,
            action_timeout,
            preemption_marker,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cloud_sdk_image.is_empty() {
            anyhow::bail!("cloud_sdk_image cannot be empty");
        }

        if self.drs_localizer_image.is_empty() {
            anyhow::bail!("drs_localizer_image cannot be empty");
        }

        if self.transfer_attempts == 0 {
            anyhow::bail!("transfer_attempts must be greater than 0");
        }

        if let Some(scheme) = self
            .bulk_schemes
            .iter()
            .find(|scheme| scheme.is_empty() || scheme.contains("://"))
        {
            anyhow::bail!("invalid bulk scheme '{}': use a bare scheme such as 'gs'", scheme);
        }

        if self.action_timeout.is_some_and(|timeout| timeout.is_zero()) {
            anyhow::bail!("action_timeout must be greater than 0");
        }

        if self.preemption_marker.is_empty() {
            anyhow::bail!("preemption_marker cannot be empty");
        }

        Ok(())
    }

    /// Transfer configuration handed to the pipeline builder
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig {
            cloud_sdk_image: self.cloud_sdk_image.clone(),
            drs_localizer_image: self.drs_localizer_image.clone(),
            transfer_attempts: self.transfer_attempts,
            retry_delay_seconds: u32::try_from(self.retry_delay.as_secs()).unwrap_or(u32::MAX),
            bulk_schemes: self.bulk_schemes.clone(),
            action_timeout: self.action_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a comma separated scheme list, dropping blanks
fn parse_schemes(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|scheme| scheme.trim().to_lowercase())
        .filter(|scheme| !scheme.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transfer_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert_eq!(config.bulk_schemes, vec!["gs".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Zero attempts should fail
        config.transfer_attempts = 0;
        assert!(config.validate().is_err());

        config.transfer_attempts = 2;

        // Scheme with separator should fail
        config.bulk_schemes = vec!["gs://".to_string()];
        assert!(config.validate().is_err());

        config.bulk_schemes = vec!["gs".to_string(), "s3".to_string()];
        assert!(config.validate().is_ok());

        config.action_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_transfer_config_conversion() {
        let config = Config {
            retry_delay: Duration::from_secs(9),
            action_timeout: Some(Duration::from_secs(600)),
            ..Config::default()
        };

        let transfer = config.transfer_config();
        assert_eq!(transfer.retry_delay_seconds, 9);
        assert_eq!(transfer.action_timeout, Some(Duration::from_secs(600)));
        assert_eq!(transfer.cloud_sdk_image, config.cloud_sdk_image);
    }

    #[test]
    fn test_parse_schemes() {
        assert_eq!(parse_schemes("gs, S3 ,,"), vec!["gs".to_string(), "s3".to_string()]);
        assert!(parse_schemes(" , ").is_empty());
    }
}
