//! Manage database connections and domain queries.
//!
//! This module tree exposes helpers for creating pooled Diesel connections,
//! running embedded migrations, and executing application queries grouped
//! by domain concern. Helpers take `&mut DbConnection` so callers control
//! transaction scope.

mod articles;
mod categories;
mod compilations;
mod connection;
mod migrations;
mod subscriptions;
mod tags;
mod users;
mod views;

#[cfg(test)]
mod tests;

pub use self::{
    articles::{
        count_articles,
        create_article,
        delete_article_cascade,
        get_article,
        list_articles,
        update_article,
        update_status_guarded,
    },
    categories::{
        add_translation,
        category_ids_for_article,
        category_names_for_article,
        create_category,
        get_category,
        set_article_categories,
        translations_for_category,
    },
    compilations::{
        add_member,
        create_compilation,
        get_compilation,
        is_in_any_compilation,
        is_member,
        remove_from_all,
        remove_member,
    },
    connection::{Backend, DbConnection, DbPool, MIGRATIONS, establish_pool},
    migrations::{apply_migrations, run_migrations},
    subscriptions::{subscribe, subscribed_author_ids, unsubscribe},
    tags::{find_tag, resolve_tag, set_article_tags, tag_names_for_article},
    users::{create_user, get_user, get_user_by_name},
    views::{record_view, view_count},
};
