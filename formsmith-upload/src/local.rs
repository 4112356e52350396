//! Local-disk uploader: files land in a directory served under a public prefix.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tracing::{debug, info};
use ulid::Ulid;

use crate::error::{Result, UploadError};
use crate::media::{MediaRef, MediaUpload};
use crate::MediaUploader;

/// Default public URL prefix for stored files.
pub const DEFAULT_PUBLIC_PREFIX: &str = "/uploads";

/// Default size limit: 10 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Stores uploads as plain files.
///
/// Files are named `<unix-millis>-<original name>` (or kept as is for
/// generated names) and addressed as `<public_prefix>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalUploader {
    dir: PathBuf,
    public_prefix: String,
    max_bytes: u64,
    allowed_types: Vec<String>,
}

impl LocalUploader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_types: vec!["image/*".to_string()],
        }
    }

    pub fn public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = prefix.into();
        self
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Accepted content types. `image/*` style entries match a whole family.
    pub fn allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn is_allowed(&self, content_type: &str) -> bool {
        self.allowed_types.iter().any(|allowed| {
            if allowed == "*/*" {
                return true;
            }
            match allowed.strip_suffix("/*") {
                Some(family) => content_type
                    .split_once('/')
                    .is_some_and(|(f, _)| f == family),
                None => allowed == content_type,
            }
        })
    }

    fn check(&self, media: &MediaUpload) -> Result<String> {
        if media.is_empty() {
            return Err(UploadError::NoFile);
        }
        if media.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: media.len(),
                limit: self.max_bytes,
            });
        }
        check_file_name(media.file_name())?;
        let content_type = media.content_type().unwrap_or_else(|| "unknown".to_string());
        if !self.is_allowed(&content_type) {
            return Err(UploadError::UnsupportedType { content_type });
        }
        Ok(content_type)
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix.trim_end_matches('/'), file_name)
    }
}

#[async_trait]
impl MediaUploader for LocalUploader {
    async fn upload(&self, media: MediaUpload) -> Result<MediaRef> {
        let content_type = self.check(&media)?;

        let file_name = if media.stamp_name() {
            format!("{}-{}", Utc::now().timestamp_millis(), media.file_name())
        } else {
            media.file_name().to_string()
        };

        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&file_name);
        atomic_write(&path, media.bytes()).await?;
        debug!(path = %path.display(), bytes = media.len(), "stored upload");

        let media_ref = MediaRef {
            url: self.url_for(&file_name),
            file_name,
            content_type,
            size: media.len(),
        };
        info!(url = %media_ref.url, "upload complete");
        Ok(media_ref)
    }
}

fn check_file_name(name: &str) -> Result<()> {
    let bad = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(UploadError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Write via a temporary sibling and rename, so a reader never sees half a file.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[test]
    fn test_allow_list_families() {
        let uploader = LocalUploader::new("unused").allowed_types(["image/*", "application/pdf"]);
        assert!(uploader.is_allowed("image/png"));
        assert!(uploader.is_allowed("image/webp"));
        assert!(uploader.is_allowed("application/pdf"));
        assert!(!uploader.is_allowed("application/zip"));
        assert!(!uploader.is_allowed("imagery/png"));
    }

    #[test]
    fn test_file_name_checks() {
        assert!(check_file_name("cat.png").is_ok());
        for bad in ["", "  ", "..", "../cat.png", "a/b.png", "a\\b.png"] {
            assert!(check_file_name(bad).is_err(), "{bad:?} accepted");
        }
    }

    #[tokio::test]
    async fn test_stamped_name_and_url() {
        let temp = TempDir::new().unwrap();
        let uploader = LocalUploader::new(temp.path().join("uploads"));

        let media_ref = uploader
            .upload(MediaUpload::new("cat.png", PNG.to_vec()))
            .await
            .unwrap();

        assert!(media_ref.file_name.ends_with("-cat.png"));
        let stamp = media_ref.file_name.trim_end_matches("-cat.png");
        assert!(stamp.parse::<i64>().is_ok());
        assert_eq!(media_ref.url, format!("/uploads/{}", media_ref.file_name));
        assert_eq!(media_ref.content_type, "image/png");

        let stored = fs::read(temp.path().join("uploads").join(&media_ref.file_name))
            .await
            .unwrap();
        assert_eq!(stored, PNG);
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let temp = TempDir::new().unwrap();
        let uploader = LocalUploader::new(temp.path());
        uploader
            .upload(MediaUpload::new("a.png", PNG.to_vec()))
            .await
            .unwrap();

        let mut entries = fs::read_dir(temp.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name();
            assert!(!name.to_string_lossy().starts_with(".tmp_"));
        }
    }

    #[tokio::test]
    async fn test_rejections_write_nothing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("uploads");
        let uploader = LocalUploader::new(&dir).max_bytes(8);

        assert!(matches!(
            uploader.upload(MediaUpload::new("a.png", Vec::new())).await,
            Err(UploadError::NoFile)
        ));
        assert!(matches!(
            uploader.upload(MediaUpload::new("a.png", PNG.to_vec())).await,
            Err(UploadError::TooLarge { size: 12, limit: 8 })
        ));
        assert!(matches!(
            uploader.upload(MediaUpload::new("a.txt", b"hi".to_vec())).await,
            Err(UploadError::UnsupportedType { .. })
        ));
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_public_prefix_is_normalised() {
        let temp = TempDir::new().unwrap();
        let uploader = LocalUploader::new(temp.path()).public_prefix("https://cdn.example.com/media/");
        let media_ref = uploader
            .upload(MediaUpload::new("x.png", PNG.to_vec()))
            .await
            .unwrap();
        assert!(media_ref
            .url
            .starts_with("https://cdn.example.com/media/"));
        assert!(!media_ref.url.contains("media//"));
    }
}
