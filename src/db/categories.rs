//! Category helpers and localised translation lookups.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::{
    language::Language,
    models::{Category, CategoryTranslation, NewCategory, NewCategoryTranslation},
};

/// Insert a category and return its id.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_category(
    conn: &mut DbConnection,
    category: &NewCategory<'_>,
) -> QueryResult<i32> {
    use crate::schema::categories::dsl as c;
    diesel::insert_into(c::categories)
        .values(category)
        .returning(c::id)
        .get_result(conn)
        .await
}

/// Insert a translation row for a category.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn add_translation(
    conn: &mut DbConnection,
    translation: &NewCategoryTranslation<'_>,
) -> QueryResult<usize> {
    use crate::schema::category_translations::dsl as ct;
    diesel::insert_into(ct::category_translations)
        .values(translation)
        .execute(conn)
        .await
}

/// Look up a category by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_category(conn: &mut DbConnection, category_id: i32) -> QueryResult<Option<Category>> {
    use crate::schema::categories::dsl as c;
    c::categories
        .filter(c::id.eq(category_id))
        .select(Category::as_select())
        .first::<Category>(conn)
        .await
        .optional()
}

/// All translation rows for a category.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn translations_for_category(
    conn: &mut DbConnection,
    category_id: i32,
) -> QueryResult<Vec<CategoryTranslation>> {
    use crate::schema::category_translations::dsl as ct;
    ct::category_translations
        .filter(ct::category_id.eq(category_id))
        .select(CategoryTranslation::as_select())
        .load::<CategoryTranslation>(conn)
        .await
}

/// Category ids linked to an article.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn category_ids_for_article(
    conn: &mut DbConnection,
    article_id: i32,
) -> QueryResult<Vec<i32>> {
    use crate::schema::article_categories::dsl as ac;
    ac::article_categories
        .filter(ac::article_id.eq(article_id))
        .select(ac::category_id)
        .load::<i32>(conn)
        .await
}

/// Localised names of the categories linked to an article, resolved against
/// the preferred language.
///
/// # Errors
/// Returns any error produced by the underlying database queries.
#[must_use = "handle the result"]
pub async fn category_names_for_article(
    conn: &mut DbConnection,
    article_id: i32,
    preferred: Language,
) -> QueryResult<Vec<String>> {
    let ids = category_ids_for_article(conn, article_id).await?;
    let mut names = Vec::with_capacity(ids.len());
    for id in ids {
        let translations = translations_for_category(conn, id).await?;
        let localized: Vec<(Language, String)> = translations
            .into_iter()
            .map(|row| (row.language, row.name))
            .collect();
        if let Some(name) = crate::localize::resolve(&localized, preferred) {
            names.push(name.to_owned());
        }
    }
    Ok(names)
}

/// Replace the category set linked to an article.
///
/// # Errors
/// Returns any error produced by the delete or insert queries.
#[must_use = "handle the result"]
pub async fn set_article_categories(
    conn: &mut DbConnection,
    article_id: i32,
    category_ids: &[i32],
) -> QueryResult<()> {
    use crate::schema::article_categories::dsl as ac;
    diesel::delete(ac::article_categories.filter(ac::article_id.eq(article_id)))
        .execute(conn)
        .await?;
    for &category_id in category_ids {
        diesel::insert_into(ac::article_categories)
            .values((
                ac::article_id.eq(article_id),
                ac::category_id.eq(category_id),
            ))
            .execute(conn)
            .await?;
    }
    Ok(())
}
