diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
        password -> Text,
        role -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    articles (id) {
        id -> Integer,
        user_id -> Integer,
        title -> Text,
        content -> Nullable<Text>,
        preview -> Nullable<Text>,
        status -> Text,
        language -> Text,
        original_article_id -> Nullable<Integer>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    categories (id) {
        id -> Integer,
        image_url -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    category_translations (id) {
        id -> Integer,
        category_id -> Integer,
        language -> Text,
        name -> Text,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    tags (id) {
        id -> Integer,
        name -> Text,
        name_lower -> Text,
    }
}

diesel::table! {
    article_categories (article_id, category_id) {
        article_id -> Integer,
        category_id -> Integer,
    }
}

diesel::table! {
    article_tags (article_id, tag_id) {
        article_id -> Integer,
        tag_id -> Integer,
    }
}

diesel::table! {
    compilations (id) {
        id -> Integer,
        user_id -> Integer,
        title -> Text,
        description -> Nullable<Text>,
        image_url -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    compilation_articles (compilation_id, article_id) {
        compilation_id -> Integer,
        article_id -> Integer,
    }
}

diesel::table! {
    article_views (id) {
        id -> Integer,
        user_id -> Integer,
        article_id -> Integer,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    subscriptions (subscriber_id, author_id) {
        subscriber_id -> Integer,
        author_id -> Integer,
    }
}

diesel::table! {
    comments (id) {
        id -> Integer,
        article_id -> Integer,
        user_id -> Integer,
        body -> Text,
        created_at -> Timestamp,
    }
}

diesel::joinable!(articles -> users (user_id));
diesel::joinable!(category_translations -> categories (category_id));
diesel::joinable!(article_categories -> articles (article_id));
diesel::joinable!(article_categories -> categories (category_id));
diesel::joinable!(article_tags -> articles (article_id));
diesel::joinable!(article_tags -> tags (tag_id));
diesel::joinable!(compilations -> users (user_id));
diesel::joinable!(compilation_articles -> compilations (compilation_id));
diesel::joinable!(compilation_articles -> articles (article_id));
diesel::joinable!(article_views -> users (user_id));
diesel::joinable!(article_views -> articles (article_id));
diesel::joinable!(comments -> articles (article_id));
diesel::joinable!(comments -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    articles,
    categories,
    category_translations,
    tags,
    article_categories,
    article_tags,
    compilations,
    compilation_articles,
    article_views,
    subscriptions,
    comments,
);
