//! Product media archive uploader.
//!
//! Catalog ingestion sometimes leaves a product's gallery behind as a
//! single zip archive URL. The uploader materializes it: download the
//! archive, unpack the entries, push each image to the storage endpoint
//! and return the resulting public links. The engine treats any failure
//! here as "skip this product for this run", never as a fatal condition.

use std::io::{Cursor, Read};

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

/// A stored media object, as the engine attaches it to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub link: String,
}

/// A failure materializing a product's media archive.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bad archive: {0}")]
    Archive(String),

    #[error("upload rejected: {0}")]
    Upload(String),

    /// No uploader is configured for this run.
    #[error("media uploader not configured")]
    NotConfigured,
}

/// The storage collaborator: archive URL + product title + folder in,
/// public links out.
pub trait MediaUploader {
    async fn upload_archive(
        &self,
        archive_url: &str,
        product_title: &str,
        folder: &str,
    ) -> Result<Vec<MediaRecord>, MediaError>;
}

/// Placeholder uploader for runs without a media endpoint configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMedia;

impl MediaUploader for NoMedia {
    async fn upload_archive(
        &self,
        _archive_url: &str,
        _product_title: &str,
        _folder: &str,
    ) -> Result<Vec<MediaRecord>, MediaError> {
        Err(MediaError::NotConfigured)
    }
}

/// Object name for one archive entry.
///
/// Gallery images are numbered from 2: slot 1 is the product's primary
/// image, which ingestion stores separately. Entries without an extension
/// (directories, junk) yield `None` and are skipped.
#[must_use]
pub fn entry_object_name(product_title: &str, index: usize, entry_name: &str) -> Option<String> {
    if entry_name.ends_with('/') {
        return None;
    }
    let extension = entry_name.rsplit('.').next().filter(|ext| {
        !ext.is_empty() && ext.len() < entry_name.len() && !ext.contains('/')
    })?;
    Some(format!("{}_{}.{}", product_title, index + 2, extension))
}

/// Uploader pushing extracted entries to an HTTP storage endpoint via
/// multipart POST.
#[derive(Clone)]
pub struct HttpMediaUploader {
    client: reqwest::Client,
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    link: String,
}

impl HttpMediaUploader {
    #[must_use]
    pub fn new(upload_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: upload_url.into(),
        }
    }

    async fn upload_entry(
        &self,
        bytes: Vec<u8>,
        object_name: &str,
        folder: &str,
    ) -> Result<MediaRecord, MediaError> {
        let form = reqwest::multipart::Form::new()
            .text("path", format!("{folder}/{object_name}"))
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(object_name.to_string()),
            );

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Upload(format!("{status}: {body}")));
        }

        let reply: UploadResponse = response.json().await?;
        Ok(MediaRecord { link: reply.link })
    }
}

impl MediaUploader for HttpMediaUploader {
    #[instrument(skip(self), fields(archive_url, product_title))]
    async fn upload_archive(
        &self,
        archive_url: &str,
        product_title: &str,
        folder: &str,
    ) -> Result<Vec<MediaRecord>, MediaError> {
        let bytes = self
            .client
            .get(archive_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| MediaError::Archive(e.to_string()))?;

        let mut records = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| MediaError::Archive(e.to_string()))?;

            let Some(object_name) = entry_object_name(product_title, index, entry.name()) else {
                continue;
            };

            let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
            entry
                .read_to_end(&mut data)
                .map_err(|e| MediaError::Archive(e.to_string()))?;

            records.push(self.upload_entry(data, &object_name, folder).await?);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_object_name_numbers_from_two() {
        assert_eq!(
            entry_object_name("Лампа LED", 0, "photo.jpg"),
            Some("Лампа LED_2.jpg".to_string())
        );
        assert_eq!(
            entry_object_name("Лампа LED", 3, "inner/side.png"),
            Some("Лампа LED_5.png".to_string())
        );
    }

    #[test]
    fn test_entry_object_name_skips_directories() {
        assert_eq!(entry_object_name("X", 0, "gallery/"), None);
    }

    #[test]
    fn test_entry_object_name_skips_extensionless_entries() {
        assert_eq!(entry_object_name("X", 0, "README"), None);
    }
}
