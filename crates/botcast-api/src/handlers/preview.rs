//! Template preview handler

use axum::Json;
use botcast_core::template;
use botcast_service::{PreviewRequest, PreviewResponse};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;

/// Render a template against sample variables
///
/// POST /preview
///
/// Rendering is pure; placeholders without a supplied value stay
/// verbatim so authoring mistakes are visible in the preview.
pub async fn preview_template(
    ValidatedJson(request): ValidatedJson<PreviewRequest>,
) -> ApiResult<Json<PreviewResponse>> {
    let rendered = template::render(&request.template, &request.vars);
    Ok(Json(PreviewResponse { rendered }))
}
