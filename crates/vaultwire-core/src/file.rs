//! The file record and file-name validation (`§3`, `§6.3`, `§12`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vaultwire_proto::ProtocolError;

/// A stored upload, keyed by `(client_id, file_name)` (I5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Owning client.
    pub client_id: [u8; 16],
    /// Name the client gave the file, already validated by
    /// [`validate_file_name`].
    pub file_name: String,
    /// Absolute path under `<root>/<client_id_hex>/` (I4).
    pub path: PathBuf,
    /// `false` while awaiting CRC confirmation, `true` once 1104 lands (I6).
    pub verified: bool,
}

impl FileRecord {
    /// Build an unverified record for a freshly written upload.
    #[must_use]
    pub fn new(client_id: [u8; 16], file_name: String, path: PathBuf) -> Self {
        Self { client_id, file_name, path, verified: false }
    }
}

/// Reject `file_name`s that could escape the per-client upload directory
/// (`§12` redesign: the original has no such check). Catches `/`, `\\`, NUL,
/// and any `..` path segment, so names like `"a/../../etc/passwd"` are
/// rejected alongside bare `".."`.
///
/// # Errors
///
/// Returns [`ProtocolError::UnsafeFileName`] if the name is empty or could
/// escape the target directory.
pub fn validate_file_name(file_name: &str) -> Result<(), ProtocolError> {
    let unsafe_name = || ProtocolError::UnsafeFileName { file_name: file_name.to_owned() };
    if file_name.is_empty() {
        return Err(unsafe_name());
    }
    if file_name.contains('/') || file_name.contains('\\') || file_name.contains('\0') {
        return Err(unsafe_name());
    }
    if file_name.split(['/', '\\']).any(|segment| segment == "..") || file_name == "." {
        return Err(unsafe_name());
    }
    Ok(())
}

/// Build the absolute on-disk path for `file_name` under a client's upload
/// directory, validating the name first.
///
/// # Errors
///
/// See [`validate_file_name`].
pub fn resolve_path(
    root: &Path,
    client_id_hex: &str,
    file_name: &str,
) -> Result<PathBuf, ProtocolError> {
    validate_file_name(file_name)?;
    Ok(root.join(client_id_hex).join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_valid() {
        assert!(validate_file_name("hello.txt").is_ok());
        assert!(validate_file_name("report_2024.csv").is_ok());
    }

    #[test]
    fn rejects_path_separators() {
        assert!(validate_file_name("a/b").is_err());
        assert!(validate_file_name("a\\b").is_err());
    }

    #[test]
    fn rejects_dot_and_dotdot() {
        assert!(validate_file_name(".").is_err());
        assert!(validate_file_name("..").is_err());
    }

    #[test]
    fn rejects_dotdot_segment_buried_in_a_longer_name() {
        assert!(validate_file_name("a/../../etc/passwd").is_err());
    }

    #[test]
    fn rejects_empty_name() {
        assert!(validate_file_name("").is_err());
    }

    #[test]
    fn resolve_path_stays_under_client_directory() {
        let path = resolve_path(Path::new("/srv/vaultwire"), "ab".repeat(16).as_str(), "x.bin")
            .expect("valid");
        assert_eq!(path, PathBuf::from("/srv/vaultwire").join("ab".repeat(16)).join("x.bin"));
    }

    #[test]
    fn resolve_path_rejects_traversal_before_joining() {
        let result =
            resolve_path(Path::new("/srv/vaultwire"), "ab".repeat(16).as_str(), "../escape");
        assert!(result.is_err());
    }
}
