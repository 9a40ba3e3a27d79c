use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Url;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Errors while fetching the payload's image.
///
/// None of these propagate to the host; the service recovers each of them
/// with the bundled default image.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DownloadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to store downloaded file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while turning a local file into a notification attachment.
#[derive(Debug, thiserror::Error)]
pub(crate) enum AttachmentError {
    #[error("attachment file is not readable: {0}")]
    Io(#[from] std::io::Error),
    #[error("attachment path is not a regular file")]
    NotAFile,
}

/// Downloads the resource at `url` into `temp_dir` and returns the path of
/// the stored file.
///
/// The body is streamed to a staging file first, then moved to a
/// uniquely-named path with a `.jpg` extension: the host validates
/// attachment content by file extension and rejects unlabeled temp files.
/// A failed download leaves no staging file behind. No timeout of its own;
/// the host's overall budget is the true deadline.
pub(crate) async fn fetch_attachment(
    client: &reqwest::Client,
    url: Url,
    temp_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(DownloadError::Status(response.status()));
    }

    let staging_path = temp_dir.join(format!("pushpipe-{}.part", Uuid::new_v4()));
    if let Err(error) = store_body(response, &staging_path).await {
        let _ = tokio::fs::remove_file(&staging_path).await;
        return Err(error);
    }

    let final_path = temp_dir.join(format!("{}.jpg", Uuid::new_v4()));
    match tokio::fs::rename(&staging_path, &final_path).await {
        Ok(()) => Ok(final_path),
        Err(error) => {
            let _ = tokio::fs::remove_file(&staging_path).await;
            Err(error.into())
        }
    }
}

/// Streams the response body into a staging file.
async fn store_body(response: reqwest::Response, path: &Path) -> Result<(), DownloadError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}

/// Constructs an attachment reference for a downloaded or cached file.
pub(crate) fn build_attachment(
    identifier: &str,
    path: &Path,
) -> Result<pushpipe_bridge::content::Attachment, AttachmentError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(AttachmentError::NotAFile);
    }
    Ok(pushpipe_bridge::content::Attachment {
        identifier: identifier.to_owned(),
        url: path.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_from_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let attachment = build_attachment("picture", file.path()).unwrap();
        assert_eq!(attachment.identifier, "picture");
        assert_eq!(attachment.url, file.path());
    }

    #[test]
    fn attachment_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jpg");
        assert!(matches!(
            build_attachment("picture", &missing),
            Err(AttachmentError::Io(_))
        ));
    }

    #[test]
    fn attachment_from_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            build_attachment("picture", dir.path()),
            Err(AttachmentError::NotAFile)
        ));
    }

    #[tokio::test]
    async fn fetch_stores_body_under_unique_jpg_name() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;
            let body = b"jpegbytes";
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: image/jpeg\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).await.unwrap();
            stream.write_all(body).await.unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let url = Url::parse(&format!("http://{address}/picture.jpg")).unwrap();
        let path = fetch_attachment(&client, url, dir.path()).await.unwrap();

        assert_eq!(path.extension().unwrap(), "jpg");
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"jpegbytes");
    }

    #[tokio::test]
    async fn fetch_from_unreachable_server_fails() {
        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let url = Url::parse("http://127.0.0.1:1/missing.jpg").unwrap();
        assert!(matches!(
            fetch_attachment(&client, url, dir.path()).await,
            Err(DownloadError::Request(_))
        ));
    }

    #[tokio::test]
    async fn interrupted_body_leaves_no_staging_file() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;
            // Promise more bytes than are sent, then hang up mid-body.
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\ntrunc")
                .await
                .unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let url = Url::parse(&format!("http://{address}/picture.jpg")).unwrap();
        assert!(fetch_attachment(&client, url, dir.path()).await.is_err());

        let mut entries = std::fs::read_dir(dir.path()).unwrap();
        assert!(entries.next().is_none());
    }

    #[tokio::test]
    async fn fetch_rejects_error_status() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;
            stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let client = reqwest::Client::new();
        let url = Url::parse(&format!("http://{address}/gone.jpg")).unwrap();
        assert!(matches!(
            fetch_attachment(&client, url, dir.path()).await,
            Err(DownloadError::Status(_))
        ));
    }
}
