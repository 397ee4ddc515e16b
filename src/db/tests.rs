#![cfg(feature = "sqlite")]
//! Query-layer tests over an in-memory database.

use chrono::Utc;
use diesel_async::AsyncConnection;

use super::*;
use crate::{
    context::{RequestContext, Role, Viewer},
    language::Language,
    models::{
        Article,
        NewArticle,
        NewCategory,
        NewCategoryTranslation,
        NewUser,
    },
    query::{ArticleFilter, ArticleSort, PageRequest},
    status::ArticleStatus,
};

async fn migrated_conn() -> DbConnection {
    let mut conn = DbConnection::establish(":memory:")
        .await
        .expect("in-memory database");
    run_migrations(&mut conn).await.expect("migrations");
    conn
}

async fn seed_author(conn: &mut DbConnection, name: &str) -> i32 {
    create_user(
        conn,
        &NewUser {
            username: name,
            password: "hash",
            role: Role::Author.as_str(),
        },
    )
    .await
    .expect("user insert")
}

async fn seed_published(
    conn: &mut DbConnection,
    user_id: i32,
    title: &str,
    language: Language,
) -> Article {
    let now = Utc::now().naive_utc();
    create_article(
        conn,
        &NewArticle {
            user_id,
            title,
            content: Some("body"),
            preview: None,
            status: ArticleStatus::Published,
            language,
            original_article_id: None,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("article insert")
}

fn anonymous() -> RequestContext {
    RequestContext::anonymous(Language::En)
}

#[tokio::test]
async fn migrations_apply_cleanly_and_are_idempotent() {
    let mut conn = migrated_conn().await;
    run_migrations(&mut conn).await.expect("second run");
}

#[tokio::test]
async fn resolve_tag_collapses_case_variants() {
    let mut conn = migrated_conn().await;
    let first = resolve_tag(&mut conn, "Java").await.expect("first");
    let second = resolve_tag(&mut conn, "JAVA").await.expect("second");
    let third = resolve_tag(&mut conn, "java").await.expect("third");

    assert_eq!(first.id, second.id);
    assert_eq!(first.id, third.id);
    // The first spelling to arrive wins the display name.
    assert_eq!(third.name, "Java");

    let found = find_tag(&mut conn, "jAvA").await.expect("lookup");
    assert_eq!(found.map(|tag| tag.id), Some(first.id));
}

#[tokio::test]
async fn set_article_tags_replaces_the_link_set() {
    let mut conn = migrated_conn().await;
    let author = seed_author(&mut conn, "author").await;
    let article = seed_published(&mut conn, author, "Tagged", Language::En).await;
    let rust = resolve_tag(&mut conn, "rust").await.expect("tag");
    let tokio_tag = resolve_tag(&mut conn, "tokio").await.expect("tag");

    set_article_tags(&mut conn, article.id, &[rust.id, tokio_tag.id])
        .await
        .expect("link");
    set_article_tags(&mut conn, article.id, &[tokio_tag.id])
        .await
        .expect("relink");

    let names = tag_names_for_article(&mut conn, article.id)
        .await
        .expect("names");
    assert_eq!(names, vec!["tokio".to_owned()]);
}

#[tokio::test]
async fn category_names_fall_back_across_languages() {
    let mut conn = migrated_conn().await;
    let author = seed_author(&mut conn, "author").await;
    let article = seed_published(&mut conn, author, "Categorised", Language::En).await;
    let category = create_category(&mut conn, &NewCategory { image_url: None })
        .await
        .expect("category");
    add_translation(
        &mut conn,
        &NewCategoryTranslation {
            category_id: category,
            language: Language::Ru,
            name: "Наука",
            description: None,
        },
    )
    .await
    .expect("translation");
    set_article_categories(&mut conn, article.id, &[category])
        .await
        .expect("link");

    // No English translation exists, so the single available one is used.
    let names = category_names_for_article(&mut conn, article.id, Language::En)
        .await
        .expect("names");
    assert_eq!(names, vec!["Наука".to_owned()]);

    add_translation(
        &mut conn,
        &NewCategoryTranslation {
            category_id: category,
            language: Language::En,
            name: "Science",
            description: None,
        },
    )
    .await
    .expect("translation");
    let names = category_names_for_article(&mut conn, article.id, Language::En)
        .await
        .expect("names");
    assert_eq!(names, vec!["Science".to_owned()]);
}

#[tokio::test]
async fn guarded_status_update_rejects_a_stale_expectation() {
    let mut conn = migrated_conn().await;
    let author = seed_author(&mut conn, "author").await;
    let article = seed_published(&mut conn, author, "Guarded", Language::En).await;

    let moved = update_status_guarded(
        &mut conn,
        article.id,
        ArticleStatus::Published,
        ArticleStatus::Hidden,
    )
    .await
    .expect("first update");
    assert!(moved);

    // The row is now hidden, so the same expectation no longer holds.
    let stale = update_status_guarded(
        &mut conn,
        article.id,
        ArticleStatus::Published,
        ArticleStatus::Hidden,
    )
    .await
    .expect("second update");
    assert!(!stale);

    let row = get_article(&mut conn, article.id)
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(row.status, ArticleStatus::Hidden);
}

#[tokio::test]
async fn listing_filters_by_tag_author_and_language() {
    let mut conn = migrated_conn().await;
    let mira = seed_author(&mut conn, "mira").await;
    let pavel = seed_author(&mut conn, "pavel").await;
    let tagged = seed_published(&mut conn, mira, "Tagged piece", Language::En).await;
    let russian = seed_published(&mut conn, pavel, "Русская статья", Language::Ru).await;
    let tag = resolve_tag(&mut conn, "Databases").await.expect("tag");
    set_article_tags(&mut conn, tagged.id, &[tag.id])
        .await
        .expect("link");

    let ctx = anonymous();
    let by_tag = ArticleFilter {
        tag: Some("data".to_owned()),
        ..ArticleFilter::default()
    };
    let rows = list_articles(&mut conn, &by_tag, &ctx, ArticleSort::default(), PageRequest::default())
        .await
        .expect("tag filter");
    assert_eq!(rows.iter().map(|a| a.id).collect::<Vec<_>>(), vec![tagged.id]);

    let by_author = ArticleFilter {
        author: Some("pavel".to_owned()),
        ..ArticleFilter::default()
    };
    let ru_ctx = RequestContext::anonymous(Language::Ru);
    let rows = list_articles(
        &mut conn,
        &by_author,
        &ru_ctx,
        ArticleSort::default(),
        PageRequest::default(),
    )
    .await
    .expect("author filter");
    assert_eq!(rows.iter().map(|a| a.id).collect::<Vec<_>>(), vec![russian.id]);

    // The anonymous English context never sees the Russian article.
    let rows = list_articles(
        &mut conn,
        &ArticleFilter::default(),
        &ctx,
        ArticleSort::default(),
        PageRequest::default(),
    )
    .await
    .expect("language filter");
    assert_eq!(rows.iter().map(|a| a.id).collect::<Vec<_>>(), vec![tagged.id]);

    let total = count_articles(&mut conn, &ArticleFilter::default(), &ctx)
        .await
        .expect("count");
    assert_eq!(total, 1);
}

#[tokio::test]
async fn viewed_filter_tracks_recorded_views() {
    let mut conn = migrated_conn().await;
    let author = seed_author(&mut conn, "author").await;
    let reader_id = create_user(
        &mut conn,
        &NewUser {
            username: "reader",
            password: "hash",
            role: Role::User.as_str(),
        },
    )
    .await
    .expect("reader");
    let seen = seed_published(&mut conn, author, "Seen", Language::En).await;
    seed_published(&mut conn, author, "Unseen", Language::En).await;
    record_view(&mut conn, reader_id, seen.id).await.expect("view");

    let reader = Viewer {
        id: reader_id,
        username: "reader".to_owned(),
        role: Role::User,
    };
    let ctx = RequestContext::authenticated(reader, Language::En);
    let filter = ArticleFilter {
        viewed: true,
        ..ArticleFilter::default()
    };
    let rows = list_articles(&mut conn, &filter, &ctx, ArticleSort::default(), PageRequest::default())
        .await
        .expect("viewed filter");
    assert_eq!(rows.iter().map(|a| a.id).collect::<Vec<_>>(), vec![seen.id]);
}

#[tokio::test]
async fn cascade_delete_removes_dependent_rows() {
    let mut conn = migrated_conn().await;
    let author = seed_author(&mut conn, "author").await;
    let article = seed_published(&mut conn, author, "Doomed", Language::En).await;
    let tag = resolve_tag(&mut conn, "ephemeral").await.expect("tag");
    set_article_tags(&mut conn, article.id, &[tag.id])
        .await
        .expect("link");
    record_view(&mut conn, author, article.id).await.expect("view");

    delete_article_cascade(&mut conn, article.id)
        .await
        .expect("delete");

    assert!(get_article(&mut conn, article.id).await.expect("fetch").is_none());
    let names = tag_names_for_article(&mut conn, article.id)
        .await
        .expect("names");
    assert!(names.is_empty());
    let views = view_count(&mut conn, article.id).await.expect("count");
    assert_eq!(views, 0);
}
