//! Shell helpers shared by the action constructors

use batchline_core::domain::action::Action;
use batchline_core::domain::mount::Mount;

use crate::config::TransferConfig;
use crate::params::{CloudPath, ContainerPath};

/// Quotes a value for a POSIX shell
pub fn shell_escape(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Wraps `command` in a loop making `transfer_attempts` tries
pub fn with_retries(command: &str, config: &TransferConfig) -> String {
    let attempts = config.transfer_attempts.max(1);
    format!(
        "for i in $(seq {attempts}); do\n  if {command}; then\n    exit 0\n  fi\n  if [ \"$i\" -lt {attempts} ]; then sleep {delay}; fi\ndone\nexit 1",
        attempts = attempts,
        command = command,
        delay = config.retry_delay_seconds,
    )
}

/// Copies one object from durable storage into the container
pub fn localize_file(cloud_path: &CloudPath, container_path: &ContainerPath) -> String {
    let destination = shell_escape(container_path.as_str());
    format!(
        "mkdir -p \"$(dirname {destination})\" && gsutil -q cp {source} {destination}",
        source = shell_escape(cloud_path.as_str()),
        destination = destination,
    )
}

/// Runs a shell script in the cloud SDK image
pub fn cloud_sdk_shell_action(script: String, mounts: &[Mount], config: &TransferConfig) -> Action {
    let action = Action::new(
        config.cloud_sdk_image.clone(),
        vec!["/bin/sh".to_string(), "-c".to_string(), script],
    )
    .with_mounts(mounts);

    match config.action_timeout {
        Some(timeout) => action.with_timeout(timeout),
        None => action,
    }
}

/// Prints `message` prefixed with the current UTC time
pub fn timestamped_message(message: &str, config: &TransferConfig) -> Action {
    let script = format!(
        "printf '%s %s\\n' \"$(date -u '+%Y/%m/%d %H:%M:%S')\" {}",
        shell_escape(message)
    );
    Action::new(
        config.cloud_sdk_image.clone(),
        vec!["/bin/sh".to_string(), "-c".to_string(), script],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_escape() {
        assert_eq!(shell_escape("plain"), "'plain'");
        assert_eq!(shell_escape("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_with_retries_uses_attempts() {
        let config = TransferConfig {
            transfer_attempts: 4,
            retry_delay_seconds: 2,
            ..TransferConfig::default()
        };
        let script = with_retries("true", &config);
        assert!(script.starts_with("for i in $(seq 4); do"));
        assert!(script.contains("if true; then"));
        assert!(script.contains("sleep 2"));
        assert!(script.ends_with("exit 1"));
    }

    #[test]
    fn test_with_retries_makes_at_least_one_attempt() {
        let config = TransferConfig {
            transfer_attempts: 0,
            ..TransferConfig::default()
        };
        assert!(with_retries("true", &config).starts_with("for i in $(seq 1); do"));
    }

    #[test]
    fn test_localize_file_quotes_paths() {
        let command = localize_file(
            &CloudPath::new("gs://bucket/my file"),
            &ContainerPath::new("/cromwell_root/my file"),
        );
        assert!(command.contains("gsutil -q cp 'gs://bucket/my file' '/cromwell_root/my file'"));
    }

    #[test]
    fn test_cloud_sdk_shell_action_applies_timeout() {
        let config = TransferConfig {
            action_timeout: Some(std::time::Duration::from_secs(30)),
            ..TransferConfig::default()
        };
        let action = cloud_sdk_shell_action("true".to_string(), &[], &config);

        assert_eq!(action.image(), config.cloud_sdk_image);
        assert_eq!(action.commands(), ["/bin/sh", "-c", "true"]);
        assert_eq!(action.timeout(), Some(std::time::Duration::from_secs(30)));
    }
}
