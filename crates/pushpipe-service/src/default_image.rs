use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// File stem of the cached default image.
pub(crate) const DEFAULT_IMAGE_NAME: &str = "fallback";

// 1x1 transparent PNG, the bundled stand-in for payload images that could
// not be downloaded.
const DEFAULT_IMAGE_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Materializes the bundled default image in the cache directory and returns
/// its path.
///
/// The file is created once per cache lifetime and reused on subsequent
/// cycles: existence is checked first, the bytes are written only if absent.
pub(crate) async fn ensure_default_image(cache_dir: &Path) -> Result<PathBuf, std::io::Error> {
    let path = cache_dir.join(format!("{DEFAULT_IMAGE_NAME}.png"));
    if path.exists() {
        return Ok(path);
    }

    tokio::fs::create_dir_all(cache_dir).await?;
    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        // Another cycle won the first-use race; the file is there.
        Err(error) if error.kind() == ErrorKind::AlreadyExists => return Ok(path),
        Err(error) => return Err(error),
    };
    file.write_all(DEFAULT_IMAGE_PNG).await?;
    file.sync_all().await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_png_on_first_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = ensure_default_image(dir.path()).await.unwrap();

        assert_eq!(path.file_name().unwrap(), "fallback.png");
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn reuses_existing_file_without_rewriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = ensure_default_image(dir.path()).await.unwrap();

        tokio::fs::write(&path, b"sentinel").await.unwrap();
        let again = ensure_default_image(dir.path()).await.unwrap();

        assert_eq!(again, path);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"sentinel");
    }
}
