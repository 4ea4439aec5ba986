use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::models::{MetadataListing, PageQuery};
use crate::AppState;

/// One scan page of the file metadata table
///
/// GET /get_file_metadata
pub async fn get_file_metadata(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<MetadataListing>> {
    let page = state.metadata.scan_items(query.page_token).await?;
    tracing::debug!(
        "Scanned {} metadata items (more: {})",
        page.items.len(),
        page.next_page_token.is_some()
    );
    Ok(Json(page.into()))
}
