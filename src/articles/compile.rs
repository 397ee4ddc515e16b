//! Compilation membership for articles.
//!
//! A compilation is a reader-curated collection. Membership checks run in
//! the same transaction as the link mutation so two concurrent requests
//! cannot both pass the duplicate guard.

use diesel_async::AsyncConnection;
use tracing::info;

use crate::{
    access,
    context::RequestContext,
    db::{self, DbConnection},
    error::ServiceError,
};

/// Add an article to one of the caller's compilations.
///
/// An article that already belongs to any compilation is rejected, which
/// also means one article can never be listed in two compilations.
///
/// # Errors
/// `NotFound` when the compilation or article is absent or the article is
/// invisible to the caller, `Forbidden` when the compilation belongs to a
/// different user, `Conflict` on duplicate membership.
pub async fn compilate(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    compilation_id: i32,
    article_id: i32,
) -> Result<(), ServiceError> {
    let viewer = ctx
        .viewer()
        .ok_or_else(|| ServiceError::forbidden("authentication required"))?;
    conn.transaction::<_, ServiceError, _>(|conn| {
        Box::pin(async move {
            let compilation = db::get_compilation(conn, compilation_id)
                .await?
                .ok_or(ServiceError::NotFound {
                    entity: "compilation",
                    id: compilation_id,
                })?;
            if !viewer.owns(compilation.user_id) {
                return Err(ServiceError::forbidden(
                    "only the compilation owner may change its contents",
                ));
            }
            let article = db::get_article(conn, article_id)
                .await?
                .ok_or_else(|| ServiceError::article_not_found(article_id))?;
            if !access::can_view(Some(viewer), article.status, article.user_id) {
                return Err(ServiceError::article_not_found(article_id));
            }
            if db::is_in_any_compilation(conn, article_id).await? {
                return Err(ServiceError::conflict(format!(
                    "article {article_id} already belongs to a compilation"
                )));
            }
            db::add_member(conn, compilation_id, article_id).await?;
            info!(compilation_id, article_id, "article added to compilation");
            Ok(())
        })
    })
    .await
}

/// Remove an article from one of the caller's compilations.
///
/// # Errors
/// `NotFound` when the compilation is absent, `Forbidden` when it belongs
/// to a different user, `Conflict` when the article is not a member.
pub async fn uncompilate(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    compilation_id: i32,
    article_id: i32,
) -> Result<(), ServiceError> {
    let viewer = ctx
        .viewer()
        .ok_or_else(|| ServiceError::forbidden("authentication required"))?;
    conn.transaction::<_, ServiceError, _>(|conn| {
        Box::pin(async move {
            let compilation = db::get_compilation(conn, compilation_id)
                .await?
                .ok_or(ServiceError::NotFound {
                    entity: "compilation",
                    id: compilation_id,
                })?;
            if !viewer.owns(compilation.user_id) {
                return Err(ServiceError::forbidden(
                    "only the compilation owner may change its contents",
                ));
            }
            if !db::is_member(conn, compilation_id, article_id).await? {
                return Err(ServiceError::conflict(format!(
                    "article {article_id} is not part of compilation {compilation_id}"
                )));
            }
            db::remove_member(conn, compilation_id, article_id).await?;
            info!(compilation_id, article_id, "article removed from compilation");
            Ok(())
        })
    })
    .await
}
