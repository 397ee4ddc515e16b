//! Compilation records and article membership.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{Compilation, NewCompilation};

/// Insert a compilation and return its id.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_compilation(
    conn: &mut DbConnection,
    compilation: &NewCompilation<'_>,
) -> QueryResult<i32> {
    use crate::schema::compilations::dsl as c;
    diesel::insert_into(c::compilations)
        .values(compilation)
        .returning(c::id)
        .get_result(conn)
        .await
}

/// Look up a compilation by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_compilation(
    conn: &mut DbConnection,
    compilation_id: i32,
) -> QueryResult<Option<Compilation>> {
    use crate::schema::compilations::dsl as c;
    c::compilations
        .filter(c::id.eq(compilation_id))
        .select(Compilation::as_select())
        .first::<Compilation>(conn)
        .await
        .optional()
}

/// Whether the article belongs to any compilation at all.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn is_in_any_compilation(
    conn: &mut DbConnection,
    member_article_id: i32,
) -> QueryResult<bool> {
    use crate::schema::compilation_articles::dsl as ca;
    let count: i64 = ca::compilation_articles
        .filter(ca::article_id.eq(member_article_id))
        .count()
        .get_result(conn)
        .await?;
    Ok(count > 0)
}

/// Whether the article belongs to this specific compilation.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn is_member(
    conn: &mut DbConnection,
    target_compilation_id: i32,
    member_article_id: i32,
) -> QueryResult<bool> {
    use crate::schema::compilation_articles::dsl as ca;
    let count: i64 = ca::compilation_articles
        .filter(ca::compilation_id.eq(target_compilation_id))
        .filter(ca::article_id.eq(member_article_id))
        .count()
        .get_result(conn)
        .await?;
    Ok(count > 0)
}

/// Add an article to a compilation.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn add_member(
    conn: &mut DbConnection,
    target_compilation_id: i32,
    member_article_id: i32,
) -> QueryResult<usize> {
    use crate::schema::compilation_articles::dsl as ca;
    diesel::insert_into(ca::compilation_articles)
        .values((
            ca::compilation_id.eq(target_compilation_id),
            ca::article_id.eq(member_article_id),
        ))
        .execute(conn)
        .await
}

/// Remove an article from a compilation, returning the affected row count.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn remove_member(
    conn: &mut DbConnection,
    target_compilation_id: i32,
    member_article_id: i32,
) -> QueryResult<usize> {
    use crate::schema::compilation_articles::dsl as ca;
    diesel::delete(
        ca::compilation_articles
            .filter(ca::compilation_id.eq(target_compilation_id))
            .filter(ca::article_id.eq(member_article_id)),
    )
    .execute(conn)
    .await
}

/// Remove an article from every compilation it belongs to.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn remove_from_all(
    conn: &mut DbConnection,
    member_article_id: i32,
) -> QueryResult<usize> {
    use crate::schema::compilation_articles::dsl as ca;
    diesel::delete(ca::compilation_articles.filter(ca::article_id.eq(member_article_id)))
        .execute(conn)
        .await
}
