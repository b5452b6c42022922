use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::time::Instant;

use super::AppState;
use crate::error::CheckError;
use crate::image_check;
use crate::json_output::{CheckResponse, ServiceInfo};
use crate::utils::{format_bytes, format_duration};

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// `POST /check-image`
///
/// Rejected images are a normal 200 answer with `success: false`; only
/// request problems (bad form, undecodable file, unknown type) are errors.
pub async fn check_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CheckResponse>, CheckError> {
    let start = Instant::now();

    let mut multipart = multipart.map_err(|rejection| CheckError::Multipart {
        status: rejection.status().as_u16(),
        message: rejection.body_text(),
    })?;
    let form = UploadForm::read(&mut multipart).await?;

    let image = form.image.ok_or(CheckError::MissingField("image"))?;
    let label = form.image_type.ok_or(CheckError::MissingField("image_type"))?;
    let upload_size = image.len();

    // Decoding is CPU-bound, keep it off the async workers
    let decoder = state.decoder.clone();
    let task_label = label.clone();
    let result = tokio::task::spawn_blocking(move || {
        image_check::check_image(decoder.as_ref(), &image, &task_label)
    })
    .await
    .map_err(|e| CheckError::Internal(format!("check task failed: {}", e)))??;

    log::info!(
        "check-image type={} upload={} size={} success={} in {}",
        label,
        format_bytes(upload_size),
        result.attributes.size_label(),
        result.success,
        format_duration(start.elapsed())
    );
    if !result.success {
        log::debug!("check-image rejected: {}", result.message);
    }

    Ok(Json(CheckResponse::from(&result)))
}

#[derive(Debug, Default)]
struct UploadForm {
    image: Option<Bytes>,
    image_type: Option<String>,
}

impl UploadForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, CheckError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("image") => form.image = Some(field.bytes().await.map_err(multipart_error)?),
                Some("image_type") => {
                    form.image_type = Some(field.text().await.map_err(multipart_error)?)
                }
                other => log::debug!("Ignoring form field {:?}", other),
            }
        }

        Ok(form)
    }
}

fn multipart_error(err: MultipartError) -> CheckError {
    CheckError::Multipart {
        status: err.status().as_u16(),
        message: err.body_text(),
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_client_error() {
            log::warn!("check-image refused ({}): {}", status.as_u16(), self);
        } else {
            log::error!("check-image failed ({}): {}", status.as_u16(), self);
        }

        (status, Json(CheckResponse::from(&self))).into_response()
    }
}
