use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use formsmith_upload::{LocalUploader, MediaUpload, MediaUploader, UploadError};
use tempfile::TempDir;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

#[tokio::test]
async fn data_url_keeps_its_generated_name() {
    let temp = TempDir::new().unwrap();
    let uploader = LocalUploader::new(temp.path());
    let url = format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(PNG));

    let media = MediaUpload::from_data_url(&url).unwrap();
    let generated = media.file_name().to_string();
    let media_ref = uploader.upload(media).await.unwrap();

    assert_eq!(media_ref.file_name, generated);
    assert_eq!(media_ref.url, format!("/uploads/{generated}"));
    assert!(temp.path().join(&generated).exists());
}

#[tokio::test]
async fn uploads_through_a_trait_object() {
    let temp = TempDir::new().unwrap();
    let uploader: Arc<dyn MediaUploader> = Arc::new(LocalUploader::new(temp.path()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let uploader = Arc::clone(&uploader);
            tokio::spawn(async move {
                uploader
                    .upload(MediaUpload::new(format!("img{i}.png"), PNG.to_vec()))
                    .await
            })
        })
        .collect();

    for handle in handles {
        let media_ref = handle.await.unwrap().unwrap();
        assert!(media_ref.url.starts_with("/uploads/"));
    }
}

#[tokio::test]
async fn from_path_reads_the_file() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("photo.png");
    tokio::fs::write(&source, PNG).await.unwrap();

    let media = MediaUpload::from_path(&source).await.unwrap();
    assert_eq!(media.file_name(), "photo.png");
    assert_eq!(media.bytes(), PNG);

    let missing = MediaUpload::from_path(&temp.path().join("nope.png")).await;
    assert!(matches!(missing, Err(UploadError::Io(_))));
}
