//! Tree listing handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use crate::auth::CredentialProvider;
use crate::transfer::{box_folder_id, ResourcePath};
use crate::tree::{from_box_entries, from_dm_listing, TreeNode, ROOT_NODE_ID};
use crate::web::dto::TreeQuery;
use crate::web::error::{ApiError, BOX_LOGIN_REQUIRED, LOGIN_REQUIRED};
use crate::web::middleware::CurrentSession;

use super::AppState;

/// GET /dm/getTreeNode - Children of a data-management tree node.
///
/// `#` lists hubs; hubs list projects; projects list their root folder;
/// folders list their contents; items list their versions.
pub async fn dm_tree_node(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Vec<TreeNode>>, ApiError> {
    let credential = session
        .data_management_credentials()
        .ok_or_else(|| ApiError::unauthorized(LOGIN_REQUIRED))?;

    if query.id == ROOT_NODE_ID {
        let hubs = state.dm.list_hubs(&credential).await?;
        return Ok(Json(from_dm_listing(&hubs, true)));
    }

    let node = ResourcePath::parse(&query.id)?;
    let parent = node.parent_id.as_deref().unwrap_or_default();
    debug!(kind = %node.kind, id = %node.id, "Expanding tree node");

    let nodes = match node.kind.as_str() {
        "hubs" => from_dm_listing(&state.dm.list_hub_projects(&credential, &node.id).await?, true),
        "projects" => {
            let project = state.dm.get_project(&credential, parent, &node.id).await?;
            let contents = state
                .dm
                .list_folder_contents(&credential, &project.project_id, &project.root_folder_id)
                .await?;
            from_dm_listing(&contents, true)
        }
        "folders" => {
            let contents = state
                .dm
                .list_folder_contents(&credential, parent, &node.id)
                .await?;
            from_dm_listing(&contents, true)
        }
        "items" => {
            let versions = state
                .dm
                .list_item_versions(&credential, parent, &node.id)
                .await?;
            from_dm_listing(&versions, false)
        }
        _ => Vec::new(),
    };

    Ok(Json(nodes))
}

/// GET /box/getTreeNode - Children of a Box folder.
pub async fn box_tree_node(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Vec<TreeNode>>, ApiError> {
    let credential = session
        .box_credentials()
        .ok_or_else(|| ApiError::unauthorized(BOX_LOGIN_REQUIRED))?;

    let entries = state
        .boxes
        .list_folder_items(&credential, box_folder_id(&query.id))
        .await?;
    Ok(Json(from_box_entries(&entries)))
}
