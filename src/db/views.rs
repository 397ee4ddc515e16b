//! Article view tracking.
//!
//! One row per (user, article), enforced by a unique constraint. A repeat
//! view refreshes `updated_at`. The write is a single upsert so concurrent
//! first views by the same user collapse into one row with no application
//! locking.

use chrono::Utc;
use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::NewArticleView;

/// Record that a user viewed an article, upserting the (user, article) row.
///
/// # Errors
/// Returns any error produced by the upsert query.
#[must_use = "handle the result"]
pub async fn record_view(
    conn: &mut DbConnection,
    viewer_id: i32,
    viewed_article_id: i32,
) -> QueryResult<()> {
    use crate::schema::article_views::dsl as v;
    let now = Utc::now().naive_utc();
    diesel::insert_into(v::article_views)
        .values(&NewArticleView {
            user_id: viewer_id,
            article_id: viewed_article_id,
            created_at: now,
            updated_at: now,
        })
        .on_conflict((v::user_id, v::article_id))
        .do_update()
        .set(v::updated_at.eq(now))
        .execute(conn)
        .await
        .map(|_| ())
}

/// Number of view rows recorded for an article.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn view_count(conn: &mut DbConnection, viewed_article_id: i32) -> QueryResult<i64> {
    use crate::schema::article_views::dsl as v;
    v::article_views
        .filter(v::article_id.eq(viewed_article_id))
        .count()
        .get_result(conn)
        .await
}
