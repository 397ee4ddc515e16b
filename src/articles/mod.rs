//! Article service: listing, fetching, recommendations, and the draft
//! lifecycle.
//!
//! Handlers resolve the caller's identity and locale into a
//! [`RequestContext`] before calling in; every operation here returns a
//! typed [`ServiceError`] the transport layer maps onto its own codes.

mod compile;
mod lifecycle;


pub use self::{
    compile::{compilate, uncompilate},
    lifecycle::{
        DraftContent,
        DraftUpdate,
        block,
        create_draft,
        delete,
        hide,
        publish,
        submit,
        unblock,
        update_draft,
    },
};

use tracing::debug;

use crate::{
    access,
    context::RequestContext,
    db::{self, DbConnection},
    dto::{ArticleDto, ArticlePage},
    error::ServiceError,
    models::Article,
    preview::DEFAULT_PREVIEW_LENGTH,
    query::{ArticleFilter, ArticleSort, PageRequest},
    search::{SearchGateway, SearchRequest},
};

/// Number of similar articles returned by [`recommend`].
pub const RECOMMENDATION_LIMIT: usize = 5;

/// A full listing request: structured filter, optional free-text query,
/// ordering, and pagination.
#[derive(Clone, Debug, Default)]
pub struct ListRequest {
    pub filter: ArticleFilter,
    pub search: Option<String>,
    pub sort: ArticleSort,
    pub page: PageRequest,
}

/// List articles visible to the caller, paginated.
///
/// A free-text query narrows the structured result to the ids the search
/// gateway returns; the structured sort order still decides the final
/// ordering. List entries never carry full content, and entries without a
/// stored preview get one derived from their content.
///
/// # Errors
/// `Validation` when a feed or viewed filter is requested anonymously;
/// search and storage failures are passed through.
pub async fn list(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    gateway: &dyn SearchGateway,
    request: ListRequest,
) -> Result<ArticlePage, ServiceError> {
    let mut filter = request.filter;
    if (filter.feed || filter.viewed) && ctx.viewer().is_none() {
        return Err(ServiceError::validation(
            "feed and viewed filters require an authenticated caller",
        ));
    }

    if let Some(text) = request.search.as_deref() {
        if !text.trim().is_empty() {
            let hits = gateway.search(&SearchRequest::new(text)).await?;
            debug!(hits = hits.len(), "free-text query narrowed listing");
            filter.search_ids = Some(hits);
        }
    }

    let total = db::count_articles(conn, &filter, ctx).await?;
    let rows = db::list_articles(conn, &filter, ctx, request.sort, request.page).await?;
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let dto = hydrate(conn, ctx, row).await?;
        items.push(dto.without_content());
    }
    Ok(ArticlePage {
        items,
        page: request.page.index,
        page_size: request.page.size,
        total,
    })
}

/// Fetch a single article by id, recording a view for authenticated
/// callers.
///
/// # Errors
/// `NotFound` when the article does not exist or the caller may not see
/// it; the two cases are indistinguishable by design.
pub async fn fetch(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article_id: i32,
) -> Result<ArticleDto, ServiceError> {
    let article = db::get_article(conn, article_id)
        .await?
        .ok_or_else(|| ServiceError::article_not_found(article_id))?;
    if !access::can_view(ctx.viewer(), article.status, article.user_id) {
        return Err(ServiceError::article_not_found(article_id));
    }
    if let Some(viewer) = ctx.viewer() {
        db::record_view(conn, viewer.id, article_id).await?;
    }
    hydrate(conn, ctx, article).await
}

/// Similar published articles, best-effort.
///
/// Builds a disjunctive query from the source article's categories, tags,
/// title, and content. Results are always restricted to published
/// articles in the caller's accepted languages, whatever the caller's
/// role, and capped at [`RECOMMENDATION_LIMIT`].
///
/// # Errors
/// `NotFound` when the source article is absent or inaccessible.
pub async fn recommend(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    gateway: &dyn SearchGateway,
    article_id: i32,
) -> Result<Vec<ArticleDto>, ServiceError> {
    let article = db::get_article(conn, article_id)
        .await?
        .ok_or_else(|| ServiceError::article_not_found(article_id))?;
    if !access::can_view(ctx.viewer(), article.status, article.user_id) {
        return Err(ServiceError::article_not_found(article_id));
    }

    let mut text = article.title.clone();
    if let Some(content) = article.content.as_deref() {
        text.push(' ');
        text.push_str(content);
    }
    for tag in db::tag_names_for_article(conn, article_id).await? {
        text.push(' ');
        text.push_str(&tag);
    }
    for category in db::category_names_for_article(conn, article_id, ctx.locale).await? {
        text.push(' ');
        text.push_str(&category);
    }

    // One extra hit absorbs the source article matching itself.
    let hits = gateway
        .search(&SearchRequest::new(text).with_limit(RECOMMENDATION_LIMIT + 1))
        .await?;
    let similar: Vec<i32> = hits
        .into_iter()
        .filter(|&id| id != article_id)
        .take(RECOMMENDATION_LIMIT)
        .collect();

    // Recommendations are published-only for everyone, so the lookup runs
    // under an anonymous visibility class rather than the caller's own.
    let published_ctx = RequestContext {
        viewer: None,
        locale: ctx.locale,
        accepted_languages: ctx.accepted_languages.clone(),
    };
    let filter = ArticleFilter {
        search_ids: Some(similar),
        ..ArticleFilter::default()
    };
    let rows = db::list_articles(
        conn,
        &filter,
        &published_ctx,
        ArticleSort::default(),
        PageRequest {
            index: 0,
            size: u32::try_from(RECOMMENDATION_LIMIT).unwrap_or(5),
        },
    )
    .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let dto = hydrate(conn, ctx, row).await?;
        items.push(dto.without_content());
    }
    Ok(items)
}

/// Resolve an article row's relations into a DTO.
async fn hydrate(
    conn: &mut DbConnection,
    ctx: &RequestContext,
    article: Article,
) -> Result<ArticleDto, ServiceError> {
    let author = db::get_user(conn, article.user_id)
        .await?
        .map(|user| user.username)
        .unwrap_or_default();
    let categories = db::category_names_for_article(conn, article.id, ctx.locale).await?;
    let tags = db::tag_names_for_article(conn, article.id).await?;
    Ok(ArticleDto::from_article(
        article,
        author,
        categories,
        tags,
        DEFAULT_PREVIEW_LENGTH,
    ))
}
