//! Per-session context and the commands that act on it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::cache::CaptionCache;
use crate::client::{Captioner, StoryTeller};
use crate::error::{AppError, Result};
use crate::history::{StoryHistory, StoryRecord};
use crate::imaging;
use crate::pdf::{self, PdfRenderer};
use crate::story::{Character, StoryForm, StoryParams, StoryRequest};

pub const MAX_IMAGES: usize = 5;

/// One uploaded file in a batch.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptionedImage {
    pub name: String,
    pub caption: String,
    pub cached: bool,
    pub preview: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedStory {
    pub index: usize,
    pub story: String,
    pub has_pdf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_error: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub cache: CaptionCache,
    pub history: StoryHistory,
    /// Captions of the current batch, in upload order. Empty after a
    /// rejected or failed batch.
    pub captions: Vec<String>,
    pub characters: Vec<Character>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            cache: CaptionCache::new(),
            history: StoryHistory::new(),
            captions: Vec::new(),
            characters: Vec::new(),
        }
    }

    /// Captions a batch of at most [`MAX_IMAGES`] files. Oversized batches are
    /// rejected whole. A new batch always replaces the previous one, so any
    /// failure leaves the session with no captions.
    pub async fn upload_images(
        &mut self,
        files: Vec<ImageUpload>,
        captioner: &dyn Captioner,
    ) -> Result<Vec<CaptionedImage>> {
        self.captions.clear();
        if files.is_empty() {
            return Err(AppError::InvalidInput("no images uploaded".to_string()));
        }
        if files.len() > MAX_IMAGES {
            return Err(AppError::TooManyImages {
                count: files.len(),
                max: MAX_IMAGES,
            });
        }

        let mut images = Vec::with_capacity(files.len());
        for file in files {
            let img = imaging::decode(&file.bytes)?;
            let cached = self
                .cache
                .lookup_or_fetch_decoded(&img, &file.bytes, captioner)
                .await?;
            images.push(CaptionedImage {
                name: file.name,
                caption: cached.caption,
                cached: cached.hit,
                preview: imaging::preview_data_uri(&img)?,
            });
        }

        self.captions = images.iter().map(|i| i.caption.clone()).collect();
        Ok(images)
    }

    /// Adds a roster entry. Both name and gender are required so the two
    /// lists sent with a story stay aligned.
    pub fn add_character(&mut self, character: Character) -> Result<&[Character]> {
        let name = character.name.trim();
        let gender = character.gender.trim();
        if name.is_empty() || gender.is_empty() {
            return Err(AppError::InvalidInput(
                "character name and gender must not be empty".to_string(),
            ));
        }
        self.characters.push(Character {
            name: name.to_string(),
            gender: gender.to_string(),
        });
        Ok(self.characters.as_slice())
    }

    pub fn delete_character(&mut self, index: usize) -> Result<&[Character]> {
        if index >= self.characters.len() {
            return Err(AppError::InvalidInput(format!(
                "no character at index {}",
                index
            )));
        }
        self.characters.remove(index);
        Ok(self.characters.as_slice())
    }

    /// Generates a story from the current captions. Nothing is recorded if the
    /// story call fails; a failed PDF render still records the story.
    pub async fn generate_story(
        &mut self,
        form: StoryForm,
        storyteller: &dyn StoryTeller,
        renderer: Option<&dyn PdfRenderer>,
    ) -> Result<GeneratedStory> {
        let params = StoryParams::from_form(form, &self.characters)?;
        let request = StoryRequest::new(params, self.captions.clone());

        let story = storyteller.generate_story(&request).await?;
        tracing::info!(
            session = %self.id,
            words = story.split_whitespace().count(),
            "story generated"
        );

        let mut record = StoryRecord::new(request.params, request.image_captions, story);
        let mut pdf_error = None;
        if let Some(renderer) = renderer {
            match pdf::render(renderer, &record.story).await {
                Ok(bytes) => record = record.with_pdf(bytes),
                Err(e) => {
                    tracing::warn!(session = %self.id, "PDF export failed: {}", e);
                    pdf_error = Some(e.to_string());
                }
            }
        }

        let generated = GeneratedStory {
            index: 0,
            story: record.story.clone(),
            has_pdf: record.has_pdf(),
            pdf_error,
        };
        self.history.append(record);

        Ok(GeneratedStory {
            index: self.history.len() - 1,
            ..generated
        })
    }

    pub fn pdf(&self, index: usize) -> Result<&[u8]> {
        let record = self
            .history
            .get(index)
            .ok_or(AppError::StoryNotFound(index))?;
        record
            .pdf
            .as_deref()
            .ok_or(AppError::PdfNotAvailable(index))
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    /// Unix millis of the last lookup
    last_used: AtomicI64,
}

impl SessionEntry {
    fn new(handle: SessionHandle) -> Self {
        Self {
            handle,
            last_used: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    fn touch(&self) {
        self.last_used
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }
}

/// Live sessions. Each session sits behind its own async mutex, held for the
/// whole command, so one session's actions run one at a time.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Session::new(id)));
        self.sessions
            .write()
            .await
            .insert(id, SessionEntry::new(handle));
        tracing::info!(session = %id, "session started");
        id
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(&id).ok_or(AppError::SessionNotFound(id))?;
        entry.touch();
        Ok(entry.handle.clone())
    }

    /// Ends a session, dropping its cache and history.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                tracing::info!(session = %id, "session ended");
                Ok(())
            }
            None => Err(AppError::SessionNotFound(id)),
        }
    }

    /// Drops every session not looked up within `max_idle` of `now`.
    /// Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> usize {
        let idle_ms = i64::try_from(max_idle.as_millis()).unwrap_or(i64::MAX);
        let cutoff = now.timestamp_millis().saturating_sub(idle_ms);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.last_used.load(Ordering::Relaxed) >= cutoff;
            if !keep {
                tracing::info!(session = %id, "session expired");
            }
            keep
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
