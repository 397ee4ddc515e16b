//! Free-text search gateway.
//!
//! The core treats search as an external indexed-query provider: given a
//! query it returns relevance-ranked article ids, capped at a limit. The
//! id set is then intersected with the structured predicates by the query
//! builder; the structured sort order decides the final ordering, not
//! relevance. Indexing is eventually consistent and happens outside any
//! database transaction.
//!
//! [`MemoryIndex`] is the in-process implementation used by tests and small
//! deployments; production deployments implement [`SearchGateway`] against
//! a dedicated engine.

use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use thiserror::Error;

/// Fuzziness applied when the caller does not specify one.
pub const DEFAULT_FUZZINESS: u8 = 1;
/// Result cap applied when the caller does not specify one.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Which article fields a query matches against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchFields {
    pub title: bool,
    pub content: bool,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            title: true,
            content: true,
        }
    }
}

/// A free-text query against the article index.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    pub text: String,
    pub fields: SearchFields,
    /// Maximum edit distance tolerated per query term.
    pub fuzziness: u8,
    pub limit: usize,
}

impl SearchRequest {
    /// A query over both fields with default fuzziness and limit.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: SearchFields::default(),
            fuzziness: DEFAULT_FUZZINESS,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Failure talking to the search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search backend unavailable: {0}")]
    Backend(String),
}

/// External collaborator contract: ranked, length-bounded id lookup.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Relevance-ranked article ids matching the request, best first,
    /// capped at `request.limit`.
    ///
    /// # Errors
    /// Returns [`SearchError`] when the backend cannot be reached.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<i32>, SearchError>;
}

#[derive(Debug, Default)]
struct Document {
    title_tokens: Vec<String>,
    content_tokens: Vec<String>,
}

/// In-process token index with bounded edit-distance matching.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    documents: RwLock<HashMap<i32, Document>>,
}

impl MemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index or re-index an article's text. Called after the owning
    /// transaction commits; the index may lag the table.
    pub fn index(&self, article_id: i32, title: &str, content: &str) {
        let document = Document {
            title_tokens: tokenize(title),
            content_tokens: tokenize(content),
        };
        if let Ok(mut documents) = self.documents.write() {
            documents.insert(article_id, document);
        }
    }

    /// Drop an article from the index.
    pub fn remove(&self, article_id: i32) {
        if let Ok(mut documents) = self.documents.write() {
            documents.remove(&article_id);
        }
    }

    fn score(document: &Document, terms: &[String], request: &SearchRequest) -> usize {
        terms
            .iter()
            .filter(|term| {
                let in_title = request.fields.title
                    && document
                        .title_tokens
                        .iter()
                        .any(|token| within_distance(term, token, request.fuzziness));
                let in_content = request.fields.content
                    && document
                        .content_tokens
                        .iter()
                        .any(|token| within_distance(term, token, request.fuzziness));
                in_title || in_content
            })
            .count()
    }
}

#[async_trait]
impl SearchGateway for MemoryIndex {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<i32>, SearchError> {
        let terms = tokenize(&request.text);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let documents = self
            .documents
            .read()
            .map_err(|e| SearchError::Backend(e.to_string()))?;
        let mut scored: Vec<(usize, i32)> = documents
            .iter()
            .map(|(&id, document)| (Self::score(document, &terms, request), id))
            .filter(|&(score, _)| score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(request.limit);
        Ok(scored.into_iter().map(|(_, id)| id).collect())
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

/// Bounded Levenshtein check: true when `a` and `b` are within `max` edits.
fn within_distance(a: &str, b: &str, max: u8) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max = usize::from(max);
    if a.len().abs_diff(b.len()) > max {
        return false;
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()] <= max
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("rust", "rust", true)]
    #[case("rust", "runt", true)]
    #[case("rust", "crust", true)]
    #[case("rust", "roast", false)]
    #[case("rust", "python", false)]
    fn edit_distance_one(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        assert_eq!(within_distance(a, b, 1), expected);
    }

    #[tokio::test]
    async fn ranks_by_matched_term_count() {
        let index = MemoryIndex::new();
        index.index(1, "Rust memory model", "stack and heap layout");
        index.index(2, "Rust ownership explained", "ownership borrowing lifetimes");
        index.index(3, "Gardening", "tomatoes");
        let hits = index
            .search(&SearchRequest::new("rust ownership"))
            .await
            .expect("search");
        assert_eq!(hits, vec![2, 1]);
    }

    #[tokio::test]
    async fn fuzzy_matches_one_typo() {
        let index = MemoryIndex::new();
        index.index(7, "Databases", "transactional storage");
        let hits = index
            .search(&SearchRequest::new("datbases"))
            .await
            .expect("search");
        assert_eq!(hits, vec![7]);
    }

    #[tokio::test]
    async fn empty_query_matches_nothing() {
        let index = MemoryIndex::new();
        index.index(1, "Title", "content");
        let hits = index
            .search(&SearchRequest::new("  "))
            .await
            .expect("search");
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let index = MemoryIndex::new();
        for id in 0..20 {
            index.index(id, "common topic", "shared words");
        }
        let hits = index
            .search(&SearchRequest::new("common").with_limit(5))
            .await
            .expect("search");
        assert_eq!(hits.len(), 5);
    }

    #[tokio::test]
    async fn removed_documents_stop_matching() {
        let index = MemoryIndex::new();
        index.index(1, "ephemeral", "text");
        index.remove(1);
        let hits = index
            .search(&SearchRequest::new("ephemeral"))
            .await
            .expect("search");
        assert!(hits.is_empty());
    }
}
