//! Article row helpers and the listing executor.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::{
    context::RequestContext,
    models::{Article, ArticleChangeset, NewArticle},
    query::{ArticleFilter, ArticleSort, PageRequest},
    status::ArticleStatus,
};

/// Look up an article by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_article(conn: &mut DbConnection, article_id: i32) -> QueryResult<Option<Article>> {
    use crate::schema::articles::dsl as a;
    a::articles
        .filter(a::id.eq(article_id))
        .select(Article::as_select())
        .first::<Article>(conn)
        .await
        .optional()
}

/// Insert an article and return the stored row.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_article(
    conn: &mut DbConnection,
    article: &NewArticle<'_>,
) -> QueryResult<Article> {
    use crate::schema::articles::dsl as a;
    diesel::insert_into(a::articles)
        .values(article)
        .returning(Article::as_returning())
        .get_result(conn)
        .await
}

/// Apply a partial changeset to an article row.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn update_article(
    conn: &mut DbConnection,
    article_id: i32,
    changes: &ArticleChangeset<'_>,
) -> QueryResult<usize> {
    use crate::schema::articles::dsl as a;
    diesel::update(a::articles.filter(a::id.eq(article_id)))
        .set(changes)
        .execute(conn)
        .await
}

/// Write a status transition, guarded on the expected current status.
///
/// Returns `false` when no row matched, meaning a concurrent transition got
/// there first; the caller surfaces that as a conflict rather than writing
/// a stale status.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn update_status_guarded(
    conn: &mut DbConnection,
    article_id: i32,
    expected: ArticleStatus,
    next: ArticleStatus,
) -> QueryResult<bool> {
    use crate::schema::articles::dsl as a;
    let now = chrono::Utc::now().naive_utc();
    let affected = diesel::update(
        a::articles
            .filter(a::id.eq(article_id))
            .filter(a::status.eq(expected)),
    )
    .set((a::status.eq(next), a::updated_at.eq(now)))
    .execute(conn)
    .await?;
    Ok(affected == 1)
}

/// Delete an article and everything it owns: join-table links, views, and
/// comments. Runs inside the caller's transaction.
///
/// # Errors
/// Returns any error produced by the delete queries.
#[must_use = "handle the result"]
pub async fn delete_article_cascade(
    conn: &mut DbConnection,
    article_id: i32,
) -> QueryResult<usize> {
    use crate::schema::{
        article_categories::dsl as ac,
        article_tags::dsl as at,
        article_views::dsl as v,
        articles::dsl as a,
        comments::dsl as cm,
        compilation_articles::dsl as ca,
    };
    diesel::delete(ac::article_categories.filter(ac::article_id.eq(article_id)))
        .execute(conn)
        .await?;
    diesel::delete(at::article_tags.filter(at::article_id.eq(article_id)))
        .execute(conn)
        .await?;
    diesel::delete(ca::compilation_articles.filter(ca::article_id.eq(article_id)))
        .execute(conn)
        .await?;
    diesel::delete(v::article_views.filter(v::article_id.eq(article_id)))
        .execute(conn)
        .await?;
    diesel::delete(cm::comments.filter(cm::article_id.eq(article_id)))
        .execute(conn)
        .await?;
    diesel::delete(a::articles.filter(a::id.eq(article_id)))
        .execute(conn)
        .await
}

/// Execute a filtered, sorted, paginated article listing.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_articles(
    conn: &mut DbConnection,
    filter: &ArticleFilter,
    ctx: &RequestContext,
    sort: ArticleSort,
    page: PageRequest,
) -> QueryResult<Vec<Article>> {
    let (offset, limit) = page.bounds();
    let query = crate::query::sorted(crate::query::filtered(filter, ctx), sort);
    query
        .limit(limit)
        .offset(offset)
        .load::<Article>(conn)
        .await
}

/// Count the rows a filtered listing would return across all pages.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn count_articles(
    conn: &mut DbConnection,
    filter: &ArticleFilter,
    ctx: &RequestContext,
) -> QueryResult<i64> {
    crate::query::filtered(filter, ctx)
        .count()
        .get_result(conn)
        .await
}
