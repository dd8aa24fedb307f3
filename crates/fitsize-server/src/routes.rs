use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        DefaultBodyLimit, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fitsize_core::{compress, validate_upload, LogSink};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

pub const MESSAGE_HEADER: &str = "x-compression-message";
pub const QUALITY_HEADER: &str = "x-compression-quality";
pub const STATUS_HEADER: &str = "x-compression-status";

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn compress_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/compress", post(compress_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// The two form fields the endpoint understands.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    target_size: Option<String>,
}

async fn read_form(multipart: &mut Multipart, limit: usize) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::from_multipart(e, limit))?;
                form.file = Some((filename, bytes.to_vec()));
            }
            Some("targetSize") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_multipart(e, limit))?;
                form.target_size = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn compress_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    // A body that isn't multipart at all simply carries no file
    let form = match multipart {
        Ok(mut multipart) => read_form(&mut multipart, state.max_upload_bytes).await?,
        Err(rejection) => {
            log::debug!("rejecting non-multipart upload: {}", rejection);
            UploadForm::default()
        }
    };

    let target_size = form.target_size.as_deref();
    let limit = state.max_upload_bytes;
    let validated = match form.file {
        Some((name, bytes)) => validate_upload(Some((name.as_str(), bytes)), target_size, limit),
        None => validate_upload(None, target_size, limit),
    }
    .map_err(|e| {
        log::debug!("upload rejected: {}", e);
        ApiError::from(e)
    })?;

    let filename = validated.filename.clone();
    let download_name = validated.download_name();
    let options = state.options.clone();

    let outcome =
        tokio::task::spawn_blocking(move || compress(&validated.request, &options, &LogSink))
            .await
            .map_err(|e| {
                log::error!("Compression request failed: {}", e);
                ApiError::internal()
            })?;

    let compressed = outcome.map_err(|e| {
        log::error!("Error compressing {}: {}", filename, e);
        ApiError::from(e)
    })?;

    let result = compressed.result;
    log::info!("Successfully compressed {}: {}", filename, result.message);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(compressed.mime_type));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(format!("attachment; filename=\"{download_name}\""))?,
    );
    headers.insert(MESSAGE_HEADER, header_value(result.message)?);
    headers.insert(QUALITY_HEADER, HeaderValue::from(u16::from(result.achieved_quality)));
    headers.insert(STATUS_HEADER, HeaderValue::from_static(result.status.as_str()));

    Ok((StatusCode::OK, headers, result.encoded).into_response())
}

fn header_value(value: String) -> Result<HeaderValue, ApiError> {
    HeaderValue::try_from(value).map_err(|e| {
        log::error!("invalid response header: {}", e);
        ApiError::internal()
    })
}
