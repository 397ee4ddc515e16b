//! Draft lifecycle operations: creation, editing, submission, and the
//! moderation status transitions.
//!
//! Every mutating operation runs inside a single transaction so concurrent
//! requests against the same article serialise at the storage layer.

use chrono::Utc;
use diesel_async::AsyncConnection;
use tracing::info;

use super::hydrate;
use crate::{
    access,
    context::{RequestContext, Role, Viewer},
    db::{self, DbConnection},
    dto::ArticleDto,
    error::ServiceError,
    language::Language,
    models::{ArticleChangeset, NewArticle},
    preview::DEFAULT_PREVIEW_LENGTH,
    status::{ArticleStatus, StatusAction, transition},
};

/// The complete editable payload used when submitting for moderation.
#[derive(Clone, Debug)]
pub struct DraftContent {
    pub title: String,
    pub content: String,
    pub language: Language,
    pub category_ids: Vec<i32>,
    pub tags: Vec<String>,
    /// Explicit preview; derived from the content when absent.
    pub preview: Option<String>,
}

/// A partial draft edit; absent fields are left unmodified.
#[derive(Clone, Debug, Default)]
pub struct DraftUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub preview: Option<String>,
    pub language: Option<Language>,
    pub category_ids: Option<Vec<i32>>,
    pub tags: Option<Vec<String>>,
    pub original_article_id: Option<i32>,
}

/// The caller, required to hold an article-writing role.
fn writing_viewer(ctx: &RequestContext) -> Result<&Viewer, ServiceError> {
    let viewer = ctx
        .viewer()
        .ok_or_else(|| ServiceError::forbidden("authentication required"))?;
    if viewer.role == Role::User {
        return Err(ServiceError::forbidden("only authors may manage articles"));
    }
    Ok(viewer)
}

/// Create a new draft owned by the caller. Only a title is required.
///
/// # Errors
/// `Forbidden` for anonymous callers or callers without a writing role.
pub async fn create_draft(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    title: &str,
    language: Option<Language>,
) -> Result<ArticleDto, ServiceError> {
    let viewer = writing_viewer(ctx)?;
    if title.trim().is_empty() {
        return Err(ServiceError::validation("title must not be empty"));
    }
    let now = Utc::now().naive_utc();
    let article = db::create_article(
        conn,
        &NewArticle {
            user_id: viewer.id,
            title,
            content: None,
            preview: None,
            status: ArticleStatus::Draft,
            language: language.unwrap_or(ctx.locale),
            original_article_id: None,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;
    info!(article_id = article.id, author = %viewer.username, "draft created");
    hydrate(conn, ctx, article).await
}

/// Apply a partial edit to a draft.
///
/// Tag names resolve case-insensitively against existing tags, creating
/// rows for unmatched names; duplicates collapse to one link.
///
/// # Errors
/// `NotFound` when the article is absent or invisible to the caller,
/// `Forbidden` when the caller is not the owner, `Conflict` when the
/// article is not in draft status.
pub async fn update_draft(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
    update: DraftUpdate,
) -> Result<ArticleDto, ServiceError> {
    let viewer = writing_viewer(ctx)?;
    let update = &update;
    let article = conn
        .transaction::<_, ServiceError, _>(|conn| {
            Box::pin(async move {
                let article = db::get_article(conn, article_id)
                    .await?
                    .ok_or_else(|| ServiceError::article_not_found(article_id))?;
                if !access::can_view(Some(viewer), article.status, article.user_id) {
                    return Err(ServiceError::article_not_found(article_id));
                }
                transition(article.status, StatusAction::EditDraft, viewer, article.user_id)?;

                if let Some(original) = update.original_article_id {
                    check_original_reference(conn, article_id, original).await?;
                }

                let changes = ArticleChangeset {
                    title: update.title.as_deref(),
                    content: update.content.as_deref(),
                    preview: update.preview.as_deref(),
                    language: update.language,
                    original_article_id: update.original_article_id.map(Some),
                    updated_at: Some(Utc::now().naive_utc()),
                };
                db::update_article(conn, article_id, &changes).await?;

                if let Some(category_ids) = update.category_ids.as_deref() {
                    replace_categories(conn, article_id, category_ids).await?;
                }
                if let Some(tags) = update.tags.as_deref() {
                    replace_tags(conn, article_id, tags).await?;
                }

                db::get_article(conn, article_id)
                    .await?
                    .ok_or_else(|| ServiceError::article_not_found(article_id))
            })
        })
        .await?;
    hydrate(conn, ctx, article).await
}

/// Full update: replace all editable fields atomically and submit the
/// draft for moderation.
///
/// # Errors
/// Same taxonomy as [`update_draft`]; additionally `Conflict` when a
/// concurrent transition moved the article out of draft first.
pub async fn submit(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
    content: DraftContent,
) -> Result<ArticleDto, ServiceError> {
    let viewer = writing_viewer(ctx)?;
    let content = &content;
    let article = conn
        .transaction::<_, ServiceError, _>(|conn| {
            Box::pin(async move {
                let article = db::get_article(conn, article_id)
                    .await?
                    .ok_or_else(|| ServiceError::article_not_found(article_id))?;
                if !access::can_view(Some(viewer), article.status, article.user_id) {
                    return Err(ServiceError::article_not_found(article_id));
                }
                let next = transition(
                    article.status,
                    StatusAction::SubmitForModeration,
                    viewer,
                    article.user_id,
                )?;

                let preview = content.preview.clone().unwrap_or_else(|| {
                    crate::preview::truncate(&content.content, DEFAULT_PREVIEW_LENGTH)
                });
                let changes = ArticleChangeset {
                    title: Some(&content.title),
                    content: Some(&content.content),
                    preview: Some(&preview),
                    language: Some(content.language),
                    original_article_id: None,
                    updated_at: Some(Utc::now().naive_utc()),
                };
                db::update_article(conn, article_id, &changes).await?;
                replace_categories(conn, article_id, &content.category_ids).await?;
                replace_tags(conn, article_id, &content.tags).await?;

                if !db::update_status_guarded(conn, article_id, article.status, next).await? {
                    return Err(stale_transition(article_id, article.status));
                }
                info!(article_id, "draft submitted for moderation");
                db::get_article(conn, article_id)
                    .await?
                    .ok_or_else(|| ServiceError::article_not_found(article_id))
            })
        })
        .await?;
    hydrate(conn, ctx, article).await
}

/// Publish an article: admins from moderation, owners from hidden.
///
/// # Errors
/// See [`transition`]; stale concurrent transitions surface as `Conflict`.
pub async fn publish(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
) -> Result<ArticleStatus, ServiceError> {
    transition_status(conn, ctx, article_id, StatusAction::Publish).await
}

/// Hide a published article; owner only.
///
/// # Errors
/// See [`transition`]; stale concurrent transitions surface as `Conflict`.
pub async fn hide(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
) -> Result<ArticleStatus, ServiceError> {
    transition_status(conn, ctx, article_id, StatusAction::Hide).await
}

/// Block an article; admin only, from any status except draft or blocked.
///
/// # Errors
/// See [`transition`]; stale concurrent transitions surface as `Conflict`.
pub async fn block(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
) -> Result<ArticleStatus, ServiceError> {
    transition_status(conn, ctx, article_id, StatusAction::Block).await
}

/// Return a blocked article to draft; admin only.
///
/// # Errors
/// See [`transition`]; stale concurrent transitions surface as `Conflict`.
pub async fn unblock(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
) -> Result<ArticleStatus, ServiceError> {
    transition_status(conn, ctx, article_id, StatusAction::Unblock).await
}

/// Delete an article; owning author only, any status. Removes compilation
/// membership and detaches dependent comments and views.
///
/// # Errors
/// `NotFound` when absent or invisible, `Forbidden` for non-owners.
pub async fn delete(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
) -> Result<(), ServiceError> {
    let viewer = ctx
        .viewer()
        .ok_or_else(|| ServiceError::forbidden("authentication required"))?;
    conn.transaction::<_, ServiceError, _>(|conn| {
        Box::pin(async move {
            let article = db::get_article(conn, article_id)
                .await?
                .ok_or_else(|| ServiceError::article_not_found(article_id))?;
            if !access::can_view(Some(viewer), article.status, article.user_id) {
                return Err(ServiceError::article_not_found(article_id));
            }
            if !viewer.owns(article.user_id) {
                return Err(ServiceError::forbidden(
                    "only the owning author may delete an article",
                ));
            }
            db::delete_article_cascade(conn, article_id).await?;
            info!(article_id, "article deleted");
            Ok(())
        })
    })
    .await
}

async fn transition_status(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
    action: StatusAction,
) -> Result<ArticleStatus, ServiceError> {
    let viewer = ctx
        .viewer()
        .ok_or_else(|| ServiceError::forbidden("authentication required"))?;
    conn.transaction::<_, ServiceError, _>(|conn| {
        Box::pin(async move {
            let article = db::get_article(conn, article_id)
                .await?
                .ok_or_else(|| ServiceError::article_not_found(article_id))?;
            if !access::can_view(Some(viewer), article.status, article.user_id) {
                return Err(ServiceError::article_not_found(article_id));
            }
            let next = transition(article.status, action, viewer, article.user_id)?;
            if !db::update_status_guarded(conn, article_id, article.status, next).await? {
                return Err(stale_transition(article_id, article.status));
            }
            info!(article_id, from = %article.status, to = %next, "status transition");
            Ok(next)
        })
    })
    .await
}

fn stale_transition(article_id: i32, status: ArticleStatus) -> ServiceError {
    ServiceError::conflict(format!(
        "article {article_id} left status {status} under a concurrent request"
    ))
}

async fn check_original_reference(
    conn: &mut DbConnection,
    article_id: i32,
    original: i32,
) -> Result<(), ServiceError> {
    if original == article_id {
        return Err(ServiceError::validation(
            "an article cannot reference itself as its original",
        ));
    }
    if db::get_article(conn, original).await?.is_none() {
        return Err(ServiceError::validation(format!(
            "original article {original} does not exist"
        )));
    }
    Ok(())
}

async fn replace_categories(
    conn: &mut DbConnection,
    article_id: i32,
    category_ids: &[i32],
) -> Result<(), ServiceError> {
    for &category_id in category_ids {
        if db::get_category(conn, category_id).await?.is_none() {
            return Err(ServiceError::validation(format!(
                "category {category_id} does not exist"
            )));
        }
    }
    db::set_article_categories(conn, article_id, category_ids).await?;
    Ok(())
}

/// Resolve the requested tag names and relink the article to the result.
/// Duplicate names, whatever their casing, collapse to one link.
async fn replace_tags(
    conn: &mut DbConnection,
    article_id: i32,
    names: &[String],
) -> Result<(), ServiceError> {
    let mut tag_ids: Vec<i32> = Vec::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            continue;
        }
        let tag = db::resolve_tag(conn, name.trim()).await?;
        if !tag_ids.contains(&tag.id) {
            tag_ids.push(tag.id);
        }
    }
    db::set_article_tags(conn, article_id, &tag_ids).await?;
    Ok(())
}
