//! Helpers shared by the MongoDB repositories.

use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Collection;
use serde::de::DeserializeOwned;

use crate::domain::dto::common::{Page, PageRequest};
use crate::errors::{AppError, AppResult};

const DUPLICATE_KEY: i32 = 11000;

pub(crate) fn db_err(e: mongodb::error::Error) -> AppError {
    AppError::DatabaseError(e.to_string())
}

pub(crate) fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        *e.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == DUPLICATE_KEY
    )
}

/// Collects every document matching `filter`, newest first.
pub(crate) async fn find_all<T>(collection: &Collection<T>, filter: Document) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    collection
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .await
        .map_err(db_err)?
        .try_collect()
        .await
        .map_err(db_err)
}

/// One page of the whole collection, newest first.
pub(crate) async fn find_page<T>(collection: &Collection<T>, page: PageRequest) -> AppResult<Page<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let total = collection.count_documents(doc! {}).await.map_err(db_err)?;

    let items = collection
        .find(doc! {})
        .sort(doc! { "created_at": -1, "_id": -1 })
        .skip(page.skip())
        .limit(page.limit as i64)
        .await
        .map_err(db_err)?
        .try_collect()
        .await
        .map_err(db_err)?;

    Ok(Page { items, total, request: page })
}
