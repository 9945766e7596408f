use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::history::StoryRecord;
use crate::page::INDEX_HTML;
use crate::session::{CaptionedImage, GeneratedStory, ImageUpload};
use crate::story::{Character, StoryForm, StoryParams};
use crate::AppState;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub pdf_enabled: bool,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub images: Vec<CaptionedImage>,
    pub captions: Vec<String>,
}

#[derive(Serialize)]
pub struct CharactersResponse {
    pub characters: Vec<Character>,
}

#[derive(Serialize)]
pub struct StorySummary {
    pub index: usize,
    #[serde(flatten)]
    pub params: StoryParams,
    pub image_captions: Vec<String>,
    pub story: String,
    pub has_pdf: bool,
    pub created_at: DateTime<Utc>,
}

impl StorySummary {
    fn new(index: usize, record: &StoryRecord) -> Self {
        Self {
            index,
            params: record.params.clone(),
            image_captions: record.image_captions.clone(),
            story: record.story.clone(),
            has_pdf: record.has_pdf(),
            created_at: record.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub stories: Vec<StorySummary>,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id,
            pdf_enabled: state.pdf.is_some(),
        }),
    )
}

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let limit = state.max_upload_bytes;
    let multipart_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::UploadTooLarge { limit }
        } else {
            AppError::InvalidInput(e.body_text())
        }
    };

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("image {}", files.len() + 1));
        let bytes = field.bytes().await.map_err(multipart_error)?;
        files.push(ImageUpload {
            name,
            bytes: bytes.to_vec(),
        });
    }

    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let images = session
        .upload_images(files, state.captioner.as_ref())
        .await?;

    Ok(Json(UploadResponse {
        images,
        captions: session.captions.clone(),
    }))
}

pub async fn list_characters(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CharactersResponse>> {
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;
    Ok(Json(CharactersResponse {
        characters: session.characters.clone(),
    }))
}

pub async fn add_character(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(character): Json<Character>,
) -> Result<Json<CharactersResponse>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let characters = session.add_character(character)?.to_vec();
    Ok(Json(CharactersResponse { characters }))
}

pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<CharactersResponse>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let characters = session.delete_character(index)?.to_vec();
    Ok(Json(CharactersResponse { characters }))
}

pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(form): Json<StoryForm>,
) -> Result<Json<GeneratedStory>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let generated = session
        .generate_story(form, state.storyteller.as_ref(), state.pdf.as_deref())
        .await?;
    Ok(Json(generated))
}

pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>> {
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;
    let stories = session
        .history
        .list_all()
        .enumerate()
        .map(|(i, record)| StorySummary::new(i, record))
        .collect();
    Ok(Json(HistoryResponse { stories }))
}

pub async fn download_pdf(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<impl IntoResponse> {
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;
    let bytes = session.pdf(index)?.to_vec();

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"story_{}.pdf\"", index + 1),
            ),
        ],
        bytes,
    ))
}
