//! Transport-facing data shapes.
//!
//! List responses never carry full content; single fetch does. Preview
//! text is always populated, derived from the content when the stored
//! preview is empty.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    language::Language,
    models::{Article, Category, CategoryTranslation, Compilation},
    status::ArticleStatus,
};

/// An article as returned to callers.
#[derive(Clone, Debug, Serialize)]
pub struct ArticleDto {
    pub id: i32,
    pub title: String,
    pub preview: String,
    /// Present on single fetch only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub status: ArticleStatus,
    pub language: Language,
    pub author: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_article_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ArticleDto {
    /// Build a DTO from a loaded row plus its resolved relations.
    pub(crate) fn from_article(
        article: Article,
        author: String,
        categories: Vec<String>,
        tags: Vec<String>,
        preview_length: usize,
    ) -> Self {
        let preview = article.preview.filter(|p| !p.is_empty()).unwrap_or_else(|| {
            article
                .content
                .as_deref()
                .map(|content| crate::preview::truncate(content, preview_length))
                .unwrap_or_default()
        });
        Self {
            id: article.id,
            title: article.title,
            preview,
            content: article.content,
            status: article.status,
            language: article.language,
            author,
            categories,
            tags,
            original_article_id: article.original_article_id,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }

    /// The list-response shape: same article without its content.
    #[must_use]
    pub fn without_content(mut self) -> Self {
        self.content = None;
        self
    }
}

/// One page of a listing, with the total across all pages.
#[derive(Clone, Debug, Serialize)]
pub struct ArticlePage {
    pub items: Vec<ArticleDto>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

/// A category with its name and description resolved to one language.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CategoryDto {
    /// Resolve a category against its translation rows. `None` when no
    /// translation carries a usable name.
    #[must_use]
    pub fn resolve(
        category: &Category,
        translations: &[CategoryTranslation],
        preferred: Language,
    ) -> Option<Self> {
        let names: Vec<(Language, String)> = translations
            .iter()
            .map(|row| (row.language, row.name.clone()))
            .collect();
        let name = crate::localize::resolve(&names, preferred)?.to_owned();
        let descriptions: Vec<(Language, String)> = translations
            .iter()
            .map(|row| (row.language, row.description.clone().unwrap_or_default()))
            .collect();
        let description = crate::localize::resolve(&descriptions, preferred).map(str::to_owned);
        Some(Self {
            id: category.id,
            name,
            description,
            image_url: category.image_url.clone(),
        })
    }
}

/// A compilation as returned to callers.
#[derive(Clone, Debug, Serialize)]
pub struct CompilationDto {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<Compilation> for CompilationDto {
    fn from(compilation: Compilation) -> Self {
        Self {
            id: compilation.id,
            owner_id: compilation.user_id,
            title: compilation.title,
            description: compilation.description,
            image_url: compilation.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use rstest::rstest;

    use super::*;
    use crate::status::ArticleStatus;

    fn article(content: Option<&str>, preview: Option<&str>) -> Article {
        let at = NaiveDateTime::default();
        Article {
            id: 7,
            user_id: 1,
            title: "Title".to_owned(),
            content: content.map(str::to_owned),
            preview: preview.map(str::to_owned),
            status: ArticleStatus::Published,
            language: Language::En,
            original_article_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn dto(content: Option<&str>, preview: Option<&str>) -> ArticleDto {
        ArticleDto::from_article(
            article(content, preview),
            "mira".to_owned(),
            vec![],
            vec![],
            20,
        )
    }

    #[rstest]
    fn preview_is_derived_when_absent_or_empty() {
        assert_eq!(dto(Some("short body"), None).preview, "short body");
        assert_eq!(dto(Some("short body"), Some("")).preview, "short body");
        assert_eq!(dto(Some("short body"), Some("stored")).preview, "stored");
        assert_eq!(dto(None, None).preview, "");
    }

    fn translation(language: Language, name: &str, description: Option<&str>) -> CategoryTranslation {
        CategoryTranslation {
            id: 0,
            category_id: 3,
            language,
            name: name.to_owned(),
            description: description.map(str::to_owned),
        }
    }

    #[rstest]
    fn category_resolves_name_and_description_independently() {
        let category = Category {
            id: 3,
            image_url: None,
            created_at: NaiveDateTime::default(),
        };
        let translations = [
            translation(Language::En, "Science", None),
            translation(Language::Ru, "Наука", Some("Научные статьи")),
        ];

        let resolved = CategoryDto::resolve(&category, &translations, Language::En)
            .expect("name available");
        assert_eq!(resolved.name, "Science");
        // The English row has no description, so the Russian one fills in.
        assert_eq!(resolved.description.as_deref(), Some("Научные статьи"));

        assert!(CategoryDto::resolve(&category, &[], Language::En).is_none());
    }

    #[rstest]
    fn compilation_dto_keeps_the_owner() {
        let at = NaiveDateTime::default();
        let dto = CompilationDto::from(Compilation {
            id: 4,
            user_id: 11,
            title: "Favourites".to_owned(),
            description: None,
            image_url: None,
            created_at: at,
            updated_at: at,
        });
        assert_eq!(dto.owner_id, 11);
        let json = serde_json::to_value(&dto).expect("serialise");
        assert!(json.get("description").is_none());
    }

    #[rstest]
    fn list_shape_omits_content_entirely() {
        let listed = dto(Some("short body"), None).without_content();
        let json = serde_json::to_value(&listed).expect("serialise");
        assert!(json.get("content").is_none());
        assert_eq!(json["preview"], "short body");
        assert_eq!(json["status"], "PUBLISHED");
        assert_eq!(json["language"], "EN");
    }
}
