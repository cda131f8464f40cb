//! Filesystem metadata access behind a small capability trait.
//!
//! Commands never look at a platform's raw status structure. They ask a
//! [`FileMetadataProvider`] for a [`FileMetadata`], which carries everything a
//! record needs: modification time, owner and group names, and mode bits.

use chrono::{DateTime, Utc};
use std::io;
use std::path::Path;

/// Metadata of a live file, as needed by records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// Owner user name (numeric id when the user has no name)
    pub owner: String,
    /// Owner group name (numeric id when the group has no name)
    pub group: String,
    /// Raw `st_mode` bits, including the file type
    pub mode: u32,
    /// Whether the path is a directory
    pub is_dir: bool,
    /// Size in bytes
    pub len: u64,
}

impl FileMetadata {
    /// Build the permission encoding stored in a record.
    pub fn permission_encoding(&self) -> crate::Result<String> {
        crate::permissions::encode(
            &self.owner,
            &self.group,
            crate::permissions::file_type_char(self.mode),
            &crate::permissions::rwx_string(self.mode),
        )
    }
}

/// Capability for reading file metadata.
pub trait FileMetadataProvider {
    /// Stat `path`, following symlinks.
    ///
    /// A missing file surfaces as an `io::Error` of kind `NotFound`.
    fn metadata(&self, path: &Path) -> io::Result<FileMetadata>;
}

/// Metadata provider for the platform the binary was built for.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeMetadata;

#[cfg(unix)]
impl FileMetadataProvider for NativeMetadata {
    fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        use std::os::unix::fs::MetadataExt;

        let meta = std::fs::metadata(path)?;
        Ok(FileMetadata {
            modified: DateTime::<Utc>::from(meta.modified()?),
            owner: user_name(meta.uid()),
            group: group_name(meta.gid()),
            mode: meta.mode(),
            is_dir: meta.is_dir(),
            len: meta.len(),
        })
    }
}

#[cfg(not(unix))]
impl FileMetadataProvider for NativeMetadata {
    fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let meta = std::fs::metadata(path)?;
        // No POSIX ownership here; synthesize a plausible mode from the
        // read-only flag.
        let perm_bits = if meta.permissions().readonly() {
            0o444
        } else {
            0o644
        };
        let type_bits = if meta.is_dir() { 0o040000 } else { 0o100000 };
        Ok(FileMetadata {
            modified: DateTime::<Utc>::from(meta.modified()?),
            owner: current_user(),
            group: "users".to_string(),
            mode: type_bits | perm_bits,
            is_dir: meta.is_dir(),
            len: meta.len(),
        })
    }
}

/// Resolve a uid to a user name, falling back to the numeric id.
#[cfg(unix)]
pub fn user_name(uid: u32) -> String {
    match nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid)) {
        Ok(Some(user)) => user.name,
        _ => uid.to_string(),
    }
}

/// Resolve a gid to a group name, falling back to the numeric id.
#[cfg(unix)]
pub fn group_name(gid: u32) -> String {
    match nix::unistd::Group::from_gid(nix::unistd::Gid::from_raw(gid)) {
        Ok(Some(group)) => group.name,
        _ => gid.to_string(),
    }
}

/// Name of the user running this process.
#[cfg(unix)]
pub fn current_user() -> String {
    let uid = nix::unistd::getuid();
    match nix::unistd::User::from_uid(uid) {
        Ok(Some(user)) => user.name,
        _ => std::env::var("USER").unwrap_or_else(|_| uid.to_string()),
    }
}

#[cfg(not(unix))]
pub fn current_user() -> String {
    std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Home directory of the current user, or an empty string if unknown.
pub fn home_directory() -> String {
    dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}
