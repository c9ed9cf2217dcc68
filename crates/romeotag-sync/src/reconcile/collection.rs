use romeotag_core::{CoreError, LibraryScope, resolve_collection_key};

use crate::error::Result;
use crate::source::{ItemQuery, RecordSource};

/// Build the item query for a run, resolving a collection name to its key.
///
/// An unknown name is an error rather than a fallback to the whole library.
pub async fn scoped_query(
    source: &dyn RecordSource,
    scope: &LibraryScope,
    collection: Option<&str>,
) -> Result<ItemQuery> {
    let query = ItemQuery::new(scope.clone());
    let Some(name) = collection else {
        return Ok(query);
    };

    let collections = source.list_collections(scope).await?;
    let key = resolve_collection_key(&collections, name)
        .ok_or_else(|| CoreError::CollectionNotFound(name.to_string()))?;
    tracing::info!(collection = %name, key, "resolved collection");
    Ok(query.in_collection(key))
}
