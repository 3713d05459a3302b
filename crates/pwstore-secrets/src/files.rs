//! Permission-aware file helpers.

use std::path::Path;

use tokio::io::AsyncWriteExt;

/// Owner read/write.
pub(crate) const PRIVATE_FILE_MODE: u32 = 0o600;

/// Owner read/write, world readable.
pub(crate) const PUBLIC_FILE_MODE: u32 = 0o644;

/// Owner-only directory.
pub(crate) const PRIVATE_DIR_MODE: u32 = 0o700;

/// Write `data` to `path`, creating the file with `mode` on Unix.
///
/// The mode is applied at creation so a private file is never briefly
/// readable by others, then re-applied in case the file already existed
/// with different bits.
#[cfg_attr(not(unix), allow(unused_variables))]
pub(crate) async fn write_file(path: &Path, data: &[u8], mode: u32) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(mode);

    let mut file = options.open(path).await?;
    file.write_all(data).await?;
    file.flush().await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(mode);
        tokio::fs::set_permissions(path, perms).await?;
    }

    Ok(())
}

/// Create `dir` and any missing parents with owner-only permissions.
pub(crate) async fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(PRIVATE_DIR_MODE);
    builder.create(dir).await
}
