//! Article listing specification.
//!
//! [`ArticleFilter`] collects the independent, each-optional predicates a
//! listing may carry; [`filtered`] composes them with logical AND into one
//! boxed diesel query. The viewer's visibility class is always part of the
//! composition, never optional, so a listing can only ever return rows the
//! access policy would also allow on single fetch.

use diesel::prelude::*;

use crate::{
    access::{self, Visibility},
    context::RequestContext,
    db::Backend,
    language::Language,
    schema::articles,
    status::ArticleStatus,
};

/// Default page size applied when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on caller-specified page sizes.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Optional structured predicates for an article listing.
#[derive(Clone, Debug, Default)]
pub struct ArticleFilter {
    /// Restrict to articles linked to this category.
    pub category_id: Option<i32>,
    /// Restrict to articles whose tag set matches this name,
    /// case-insensitive substring.
    pub tag: Option<String>,
    /// Restrict to articles by this author username.
    pub author: Option<String>,
    /// Restrict to these languages; always intersected with the caller's
    /// accepted languages.
    pub languages: Option<Vec<Language>>,
    /// Restrict to authors the caller subscribes to.
    pub feed: bool,
    /// Restrict to articles the caller has viewed.
    pub viewed: bool,
    /// Restrict to this id set (produced by the search gateway).
    pub search_ids: Option<Vec<i32>>,
}

/// Field an article listing may be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Caller-specified ordering; defaults to newest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArticleSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for ArticleSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

/// Zero-based pagination request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            index: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Effective (offset, limit) with the size clamped to [1, `MAX_PAGE_SIZE`].
    #[must_use]
    pub fn bounds(self) -> (i64, i64) {
        let size = i64::from(self.size.clamp(1, MAX_PAGE_SIZE));
        (i64::from(self.index) * size, size)
    }
}

pub(crate) type BoxedArticleQuery<'a> = articles::BoxedQuery<'a, Backend>;

/// The language set a listing is allowed to return: the requested set
/// intersected with the caller's accepted languages, or the accepted
/// languages themselves when the caller requested none.
#[must_use]
pub fn effective_languages(filter: &ArticleFilter, ctx: &RequestContext) -> Vec<Language> {
    filter.languages.as_ref().map_or_else(
        || ctx.accepted_languages.clone(),
        |requested| {
            requested
                .iter()
                .copied()
                .filter(|lang| ctx.accepted_languages.contains(lang))
                .collect()
        },
    )
}

/// Compose the filter into a boxed query over the articles table.
pub(crate) fn filtered<'a>(
    filter: &'a ArticleFilter,
    ctx: &'a RequestContext,
) -> BoxedArticleQuery<'a> {
    use crate::schema::{
        article_categories::dsl as ac,
        article_tags::dsl as at,
        article_views::dsl as v,
        articles::dsl as a,
        subscriptions::dsl as s,
        tags::dsl as t,
        users::dsl as u,
    };

    let mut query = a::articles.into_boxed();

    if let Some(category) = filter.category_id {
        let members = ac::article_categories
            .filter(ac::category_id.eq(category))
            .select(ac::article_id);
        query = query.filter(a::id.eq_any(members));
    }

    if let Some(tag) = filter.tag.as_deref() {
        let pattern = format!("%{}%", tag.to_lowercase());
        let tagged = at::article_tags
            .inner_join(t::tags)
            .filter(t::name_lower.like(pattern))
            .select(at::article_id);
        query = query.filter(a::id.eq_any(tagged));
    }

    if let Some(author) = filter.author.as_deref() {
        let authors = u::users.filter(u::username.eq(author)).select(u::id);
        query = query.filter(a::user_id.eq_any(authors));
    }

    query = query.filter(a::language.eq_any(effective_languages(filter, ctx)));

    if filter.feed {
        let viewer_id = ctx.viewer().map_or(-1, |viewer| viewer.id);
        let followed = s::subscriptions
            .filter(s::subscriber_id.eq(viewer_id))
            .select(s::author_id);
        query = query.filter(a::user_id.eq_any(followed));
    }

    if filter.viewed {
        let viewer_id = ctx.viewer().map_or(-1, |viewer| viewer.id);
        let seen = v::article_views
            .filter(v::user_id.eq(viewer_id))
            .select(v::article_id);
        query = query.filter(a::id.eq_any(seen));
    }

    if let Some(ids) = filter.search_ids.clone() {
        query = query.filter(a::id.eq_any(ids));
    }

    match access::visibility(ctx.viewer()) {
        Visibility::Everything => {}
        Visibility::PublishedOrOwn(viewer_id) => {
            query = query.filter(
                a::status
                    .eq(ArticleStatus::Published)
                    .or(a::user_id.eq(viewer_id)),
            );
        }
        Visibility::PublishedOnly => {
            query = query.filter(a::status.eq(ArticleStatus::Published));
        }
    }

    query
}

/// Apply the requested ordering, with id as a stable tie-breaker.
pub(crate) fn sorted(query: BoxedArticleQuery<'_>, sort: ArticleSort) -> BoxedArticleQuery<'_> {
    use crate::schema::articles::dsl as a;
    let query = match (sort.field, sort.direction) {
        (SortField::CreatedAt, SortDirection::Ascending) => query.order(a::created_at.asc()),
        (SortField::CreatedAt, SortDirection::Descending) => query.order(a::created_at.desc()),
        (SortField::UpdatedAt, SortDirection::Ascending) => query.order(a::updated_at.asc()),
        (SortField::UpdatedAt, SortDirection::Descending) => query.order(a::updated_at.desc()),
        (SortField::Title, SortDirection::Ascending) => query.order(a::title.asc()),
        (SortField::Title, SortDirection::Descending) => query.order(a::title.desc()),
    };
    query.then_order_by(a::id.desc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sort_is_newest_first() {
        let sort = ArticleSort::default();
        assert_eq!(sort.field, SortField::CreatedAt);
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn page_bounds_clamp_oversized_requests() {
        let page = PageRequest {
            index: 2,
            size: 1000,
        };
        let (offset, limit) = page.bounds();
        assert_eq!(limit, i64::from(MAX_PAGE_SIZE));
        assert_eq!(offset, 2 * i64::from(MAX_PAGE_SIZE));
    }

    #[test]
    fn zero_page_size_becomes_one() {
        let page = PageRequest { index: 0, size: 0 };
        assert_eq!(page.bounds(), (0, 1));
    }

    #[test]
    fn requested_languages_intersect_accepted() {
        let ctx = crate::context::RequestContext::anonymous(Language::En);
        let filter = ArticleFilter {
            languages: Some(vec![Language::En, Language::Ru]),
            ..ArticleFilter::default()
        };
        assert_eq!(effective_languages(&filter, &ctx), vec![Language::En]);
    }

    #[test]
    fn absent_languages_default_to_accepted() {
        let ctx = crate::context::RequestContext::anonymous(Language::Ru)
            .with_accepted_languages(vec![Language::Ru, Language::En]);
        let filter = ArticleFilter::default();
        assert_eq!(
            effective_languages(&filter, &ctx),
            vec![Language::Ru, Language::En]
        );
    }
}
