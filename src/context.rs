//! Request-scoped caller identity and localisation context.
//!
//! The surrounding transport resolves authentication and the
//! `Accept-Language` negotiation before the core runs; the core only ever
//! reads the result. The context is passed explicitly into every service
//! call rather than living in ambient per-request state.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Role attached to an authenticated user account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Author,
    Admin,
}

impl Role {
    /// The code stored in the database for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Author => "AUTHOR",
            Self::Admin => "ADMIN",
        }
    }

    /// Parse a stored role code, defaulting unknown codes to [`Role::User`].
    ///
    /// Rows written by older deployments may carry codes this build does not
    /// know; treating them as the least-privileged role fails safe.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "ADMIN" => Self::Admin,
            "AUTHOR" => Self::Author,
            _ => Self::User,
        }
    }
}

/// The resolved identity of an authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewer {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl Viewer {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Whether this viewer owns the article with the given author id.
    #[must_use]
    pub const fn owns(&self, owner_id: i32) -> bool {
        self.id == owner_id
    }
}

/// Per-request context: who is asking, and in which languages.
///
/// `accepted_languages` is never empty; it always contains at least the
/// resolved locale.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub viewer: Option<Viewer>,
    pub locale: Language,
    pub accepted_languages: Vec<Language>,
}

impl RequestContext {
    /// Context for an anonymous request in the given locale.
    #[must_use]
    pub fn anonymous(locale: Language) -> Self {
        Self {
            viewer: None,
            locale,
            accepted_languages: vec![locale],
        }
    }

    /// Context for an authenticated request in the given locale.
    #[must_use]
    pub fn authenticated(viewer: Viewer, locale: Language) -> Self {
        Self {
            viewer: Some(viewer),
            locale,
            accepted_languages: vec![locale],
        }
    }

    /// Replace the accepted language list, keeping it non-empty.
    #[must_use]
    pub fn with_accepted_languages(mut self, languages: Vec<Language>) -> Self {
        if languages.is_empty() {
            self.accepted_languages = vec![self.locale];
        } else {
            self.accepted_languages = languages;
        }
        self
    }

    #[must_use]
    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_context_accepts_its_locale() {
        let ctx = RequestContext::anonymous(Language::En);
        assert!(ctx.viewer().is_none());
        assert_eq!(ctx.accepted_languages, vec![Language::En]);
    }

    #[test]
    fn empty_language_list_falls_back_to_locale() {
        let ctx = RequestContext::anonymous(Language::Ru).with_accepted_languages(Vec::new());
        assert_eq!(ctx.accepted_languages, vec![Language::Ru]);
    }

    #[test]
    fn unknown_role_code_degrades_to_user() {
        assert_eq!(Role::from_code("SUPERUSER"), Role::User);
        assert_eq!(Role::from_code("ADMIN"), Role::Admin);
    }
}
