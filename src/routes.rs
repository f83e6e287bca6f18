use crate::AppState;
use crate::encode::Upload;
use crate::error::ApiError;
use crate::fal::{AURA_SR_MODEL, LUMA_DREAM_MACHINE_MODEL, Text2VideoInput, UpscaleInput};
use axum::extract::{Extension, Multipart};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

#[derive(Serialize, Deserialize)]
pub struct MediaUrl {
    pub url: String,
}

#[derive(Serialize, Deserialize)]
pub struct UpscaleResponse {
    pub image: MediaUrl,
}

#[derive(Serialize, Deserialize)]
pub struct Text2VideoRequest {
    pub prompt: String,
}

#[derive(Serialize, Deserialize)]
pub struct Text2VideoResponse {
    pub video: MediaUrl,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider_configured: bool,
}

/// Readiness probe; reports whether a provider credential is present.
#[axum::debug_handler]
pub async fn healthz(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider_configured: state.provider_configured(),
    })
}

/// `POST /api/image-upscale`: multipart `image` field in, upscaled image URL out.
#[axum::debug_handler]
pub async fn upscale_image(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<Json<UpscaleResponse>, ApiError> {
    let upload = read_image_field(multipart).await?;
    info!(
        content_type = upload.content_type(),
        size = upload.size(),
        "Received image for upscaling"
    );

    // Validation and encoding happen before the credential check, so an
    // oversized upload gets its 400 even on a misconfigured server
    let data_uri = upload
        .to_data_uri()
        .map_err(|err| ApiError::invalid_input(err.to_string()))?;

    let provider = state.provider()?;
    let result = provider
        .subscribe(AURA_SR_MODEL, &UpscaleInput::new(data_uri))
        .await
        .map_err(|err| ApiError::upstream("Failed to upscale image", err))?;

    let url = result
        .pointer("/image/url")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::malformed_upstream("Failed to get upscaled image URL from API"))?;

    info!(url, "Image upscaled");
    Ok(Json(UpscaleResponse {
        image: MediaUrl {
            url: url.to_string(),
        },
    }))
}

/// `POST /api/text2video`: JSON prompt in, generated video URL out.
#[axum::debug_handler]
pub async fn text_to_video(
    Extension(state): Extension<AppState>,
    Json(request): Json<Text2VideoRequest>,
) -> Result<Json<Text2VideoResponse>, ApiError> {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::invalid_input("Prompt is required"));
    }

    info!(prompt_len = prompt.len(), "Received text2video prompt");

    let provider = state.provider()?;
    let input = Text2VideoInput {
        prompt: prompt.to_string(),
    };
    let result = provider
        .subscribe(LUMA_DREAM_MACHINE_MODEL, &input)
        .await
        .map_err(|err| ApiError::upstream("Failed to generate video", err))?;

    let url = result
        .pointer("/video/url")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::malformed_upstream("Failed to get video URL from API"))?;

    info!(url, "Video generated");
    Ok(Json(Text2VideoResponse {
        video: MediaUrl {
            url: url.to_string(),
        },
    }))
}

/// Pull the `image` part out of the multipart body.
async fn read_image_field(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::invalid_input(format!("Invalid multipart request: {err}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::invalid_input(format!("Failed to read image field: {err}")))?;

        return Ok(Upload::new(content_type, bytes));
    }

    Err(ApiError::invalid_input("Image is required"))
}
