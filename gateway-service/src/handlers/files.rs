use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    Json,
};
use bytes::Bytes;

use crate::error::{AppError, AppResult};
use crate::models::{FileListing, MessageResponse, PageQuery};
use crate::AppState;

/// Multipart field carrying the uploaded file
const FILE_FIELD: &str = "file";

/// A file part pulled out of a multipart body
#[derive(Debug)]
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Store the uploaded file under its original filename
///
/// POST /upload
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MessageResponse>> {
    let mut multipart = multipart?;
    tracing::info!("Received file upload request");

    let file = read_file_field(&mut multipart)
        .await?
        .ok_or(AppError::MissingField(FILE_FIELD))?;

    tracing::info!(
        "File received: filename={}, size={} bytes, content_type={:?}",
        file.filename,
        file.data.len(),
        file.content_type
    );

    state
        .objects
        .put_object(&file.filename, file.data, file.content_type)
        .await?;

    tracing::info!("File uploaded successfully: key={}", file.filename);
    Ok(Json(MessageResponse::new("File uploaded successfully!")))
}

/// One page of object keys in the bucket
///
/// GET /list_files
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<FileListing>> {
    let page = state.objects.list_objects(query.page_token).await?;
    tracing::debug!(
        "Listed {} files (more: {})",
        page.items.len(),
        page.next_page_token.is_some()
    );
    Ok(Json(page.into()))
}

/// Scan fields until a `file` part with a filename shows up. Browsers send an
/// empty filename when no file was chosen; such parts are skipped.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("unknown").to_string();
        tracing::debug!("Processing field: {}", field_name);

        if field_name != FILE_FIELD {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field.bytes().await?;

        if filename.is_empty() {
            tracing::debug!("Skipping file part without a filename");
            continue;
        }

        return Ok(Some(UploadedFile {
            filename,
            content_type,
            data,
        }));
    }

    Ok(None)
}
