//! Author subscriptions backing the feed filter.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;

/// Subscribe a user to an author's articles. Re-subscribing is a no-op.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn subscribe(
    conn: &mut DbConnection,
    subscriber: i32,
    author: i32,
) -> QueryResult<usize> {
    use crate::schema::subscriptions::dsl as s;
    diesel::insert_into(s::subscriptions)
        .values((s::subscriber_id.eq(subscriber), s::author_id.eq(author)))
        .on_conflict((s::subscriber_id, s::author_id))
        .do_nothing()
        .execute(conn)
        .await
}

/// Remove a subscription, returning the affected row count.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn unsubscribe(
    conn: &mut DbConnection,
    subscriber: i32,
    author: i32,
) -> QueryResult<usize> {
    use crate::schema::subscriptions::dsl as s;
    diesel::delete(
        s::subscriptions
            .filter(s::subscriber_id.eq(subscriber))
            .filter(s::author_id.eq(author)),
    )
    .execute(conn)
    .await
}

/// Ids of the authors this user subscribes to.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn subscribed_author_ids(
    conn: &mut DbConnection,
    subscriber: i32,
) -> QueryResult<Vec<i32>> {
    use crate::schema::subscriptions::dsl as s;
    s::subscriptions
        .filter(s::subscriber_id.eq(subscriber))
        .select(s::author_id)
        .load::<i32>(conn)
        .await
}
