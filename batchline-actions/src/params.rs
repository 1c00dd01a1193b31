//! Task parameters consumed by the builder

use serde::{Deserialize, Serialize};

/// Absolute path inside the task container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerPath(String);

impl ContainerPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A file named `name` in the same directory as this path
    pub fn sibling(&self, name: &str) -> ContainerPath {
        match self.0.rfind('/') {
            Some(index) => ContainerPath(format!("{}/{}", &self.0[..index], name)),
            None => ContainerPath(name.to_string()),
        }
    }
}

impl std::fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location in durable storage, such as `gs://bucket/path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloudPath(String);

impl CloudPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URI scheme without the `://` separator
    pub fn scheme(&self) -> Option<&str> {
        self.0
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .filter(|scheme| !scheme.is_empty())
    }

    /// Appends a path segment
    pub fn join(&self, name: &str) -> CloudPath {
        CloudPath(format!("{}/{}", self.0.trim_end_matches('/'), name))
    }
}

impl std::fmt::Display for CloudPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file the task reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInput {
    /// Logical input name, surfaced in failure diagnostics
    pub name: String,
    pub cloud_path: CloudPath,
    pub container_path: ContainerPath,
}

/// Everything the builder needs to know about one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskParameters {
    /// Image the user command runs in
    pub docker_image: String,

    /// Where the command script lives inside the container
    pub command_script_container_path: ContainerPath,

    /// Per-task root in durable storage holding the staged scripts
    pub call_root: CloudPath,

    #[serde(default)]
    pub file_inputs: Vec<FileInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_path_sibling() {
        let script = ContainerPath::new("/cromwell_root/script");
        assert_eq!(
            script.sibling("gcs_localization.sh").as_str(),
            "/cromwell_root/gcs_localization.sh"
        );
        assert_eq!(ContainerPath::new("script").sibling("x.sh").as_str(), "x.sh");
    }

    #[test]
    fn test_cloud_path_scheme_and_join() {
        let root = CloudPath::new("gs://bucket/wf/call-a/");
        assert_eq!(root.scheme(), Some("gs"));
        assert_eq!(root.join("gcs_transfer.sh").as_str(), "gs://bucket/wf/call-a/gcs_transfer.sh");

        assert_eq!(CloudPath::new("/local/file").scheme(), None);
        assert_eq!(CloudPath::new("://nothing").scheme(), None);
        assert_eq!(CloudPath::new("drs://host/id").scheme(), Some("drs"));
    }
}
