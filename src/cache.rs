//! Per-session caption cache keyed by image fingerprint.

use image::DynamicImage;
use std::collections::HashMap;

use crate::client::Captioner;
use crate::error::Result;
use crate::imaging::{self, ImageFingerprint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCaption {
    pub fingerprint: ImageFingerprint,
    pub caption: String,
    /// True when no captioning call was made
    pub hit: bool,
}

/// Unbounded for the session's lifetime. Entries are written once, after a
/// successful captioning call, and never replaced.
#[derive(Debug, Default)]
pub struct CaptionCache {
    entries: HashMap<ImageFingerprint, String>,
}

impl CaptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &ImageFingerprint) -> Option<&str> {
        self.entries.get(fingerprint).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub async fn lookup_or_fetch(
        &mut self,
        image_bytes: &[u8],
        captioner: &dyn Captioner,
    ) -> Result<String> {
        let img = imaging::decode(image_bytes)?;
        let cached = self.lookup_or_fetch_decoded(&img, image_bytes, captioner).await?;
        Ok(cached.caption)
    }

    /// Like [`lookup_or_fetch`](Self::lookup_or_fetch) for an image the caller
    /// already decoded. `raw` is what gets sent to the captioner on a miss.
    pub async fn lookup_or_fetch_decoded(
        &mut self,
        img: &DynamicImage,
        raw: &[u8],
        captioner: &dyn Captioner,
    ) -> Result<CachedCaption> {
        let fingerprint = imaging::fingerprint(img)?;

        if let Some(caption) = self.entries.get(&fingerprint) {
            tracing::debug!(%fingerprint, "caption cache hit");
            return Ok(CachedCaption {
                fingerprint,
                caption: caption.clone(),
                hit: true,
            });
        }

        tracing::debug!(%fingerprint, "caption cache miss");
        let caption = captioner.caption(raw).await?;
        self.entries.insert(fingerprint.clone(), caption.clone());

        Ok(CachedCaption {
            fingerprint,
            caption,
            hit: false,
        })
    }
}
