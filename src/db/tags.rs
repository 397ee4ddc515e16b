//! Tag resolution and article/tag link helpers.
//!
//! Tag names are unique case-insensitively via the normalised `name_lower`
//! column. `resolve_tag` is the find-or-create primitive: the unique
//! constraint arbitrates concurrent creation, and a losing writer fetches
//! the winner's row instead of surfacing a constraint violation.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{NewTag, Tag};

/// Find a tag by name, ignoring case.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn find_tag(conn: &mut DbConnection, tag_name: &str) -> QueryResult<Option<Tag>> {
    use crate::schema::tags::dsl as t;
    t::tags
        .filter(t::name_lower.eq(tag_name.to_lowercase()))
        .select(Tag::as_select())
        .first::<Tag>(conn)
        .await
        .optional()
}

/// Find the tag with this name or create it; the first writer's casing wins.
///
/// The insert carries `ON CONFLICT DO NOTHING` so a concurrent creation of
/// the same name never aborts the enclosing transaction; the conflicting
/// writer simply reads the row the winner inserted.
///
/// # Errors
/// Returns any error produced by the lookup or insertion queries.
#[must_use = "handle the result"]
pub async fn resolve_tag(conn: &mut DbConnection, tag_name: &str) -> QueryResult<Tag> {
    use crate::schema::tags::dsl as t;
    let lowered = tag_name.to_lowercase();
    let inserted = diesel::insert_into(t::tags)
        .values(&NewTag {
            name: tag_name,
            name_lower: &lowered,
        })
        .on_conflict(t::name_lower)
        .do_nothing()
        .returning(Tag::as_returning())
        .get_result(conn)
        .await
        .optional()?;
    match inserted {
        Some(tag) => Ok(tag),
        None => find_tag(conn, tag_name)
            .await?
            .ok_or(diesel::result::Error::NotFound),
    }
}

/// Replace the tag set linked to an article.
///
/// # Errors
/// Returns any error produced by the delete or insert queries.
#[must_use = "handle the result"]
pub async fn set_article_tags(
    conn: &mut DbConnection,
    article_id: i32,
    tag_ids: &[i32],
) -> QueryResult<()> {
    use crate::schema::article_tags::dsl as at;
    diesel::delete(at::article_tags.filter(at::article_id.eq(article_id)))
        .execute(conn)
        .await?;
    for &tag_id in tag_ids {
        diesel::insert_into(at::article_tags)
            .values((at::article_id.eq(article_id), at::tag_id.eq(tag_id)))
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Names of the tags linked to an article.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn tag_names_for_article(
    conn: &mut DbConnection,
    article_id: i32,
) -> QueryResult<Vec<String>> {
    use crate::schema::{article_tags::dsl as at, tags::dsl as t};
    at::article_tags
        .inner_join(t::tags)
        .filter(at::article_id.eq(article_id))
        .order(t::name.asc())
        .select(t::name)
        .load::<String>(conn)
        .await
}
