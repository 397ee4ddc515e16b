//! Article status lifecycle and its transition rules.
//!
//! Every status change travels through [`transition`], a pure function over
//! (current status, action, actor, owner). Service code never writes a
//! status the table below does not produce.
//!
//! | From                 | To         | Action              | Actor         |
//! |----------------------|------------|---------------------|---------------|
//! | Draft                | Draft      | EditDraft           | owning author |
//! | Draft                | Moderation | SubmitForModeration | owning author |
//! | Moderation           | Published  | Publish             | admin         |
//! | Hidden               | Published  | Publish             | owning author |
//! | Published            | Hidden     | Hide                | owning author |
//! | not Draft or Blocked | Blocked    | Block               | admin         |
//! | Blocked              | Draft      | Unblock             | admin         |

use std::{fmt, str::FromStr};

use diesel::{
    backend::Backend,
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    serialize::{self, Output, ToSql},
    sql_types::Text,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::Viewer;

/// Lifecycle status of an article.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArticleStatus {
    Draft,
    Moderation,
    Published,
    Hidden,
    Blocked,
}

/// An operation that asks for a status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusAction {
    EditDraft,
    SubmitForModeration,
    Publish,
    Hide,
    Block,
    Unblock,
}

/// Why a requested transition was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The (status, action) pair is not in the transition table. Maps to a
    /// conflict: the article is in the wrong state for this operation.
    #[error("cannot {action} an article while it is {status}")]
    InvalidTransition {
        status: ArticleStatus,
        action: StatusAction,
    },
    /// The transition exists but this actor may not trigger it.
    #[error("{action} on a {status} article is not permitted for this user")]
    NotPermitted {
        status: ArticleStatus,
        action: StatusAction,
    },
}

/// Error raised when a stored status code is not recognised.
#[derive(Debug, Error)]
#[error("unknown article status: {0}")]
pub struct UnknownStatus(String);

impl ArticleStatus {
    /// The code stored in the database for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Moderation => "MODERATION",
            Self::Published => "PUBLISHED",
            Self::Hidden => "HIDDEN",
            Self::Blocked => "BLOCKED",
        }
    }

    /// Whether full field edits (title, content, categories, tags) are
    /// allowed in this status.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EditDraft => "edit",
            Self::SubmitForModeration => "submit",
            Self::Publish => "publish",
            Self::Hide => "hide",
            Self::Block => "block",
            Self::Unblock => "unblock",
        };
        f.write_str(name)
    }
}

impl FromStr for ArticleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "MODERATION" => Ok(Self::Moderation),
            "PUBLISHED" => Ok(Self::Published),
            "HIDDEN" => Ok(Self::Hidden),
            "BLOCKED" => Ok(Self::Blocked),
            _ => Err(UnknownStatus(s.to_owned())),
        }
    }
}

impl<DB> ToSql<Text, DB> for ArticleStatus
where
    DB: Backend,
    str: ToSql<Text, DB>,
{
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, DB>) -> serialize::Result {
        self.as_str().to_sql(out)
    }
}

impl<DB> FromSql<Text, DB> for ArticleStatus
where
    DB: Backend,
    String: FromSql<Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        let raw = String::from_sql(bytes)?;
        raw.parse().map_err(Into::into)
    }
}

/// Actor requirement attached to a transition table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Actor {
    Owner,
    Admin,
}

/// Look up the transition table row for (current, action).
///
/// Returns the required actor and the resulting status, or `None` when the
/// pair is not a legal transition at all.
const fn table_row(current: ArticleStatus, action: StatusAction) -> Option<(Actor, ArticleStatus)> {
    use ArticleStatus as S;
    use StatusAction as A;
    match (current, action) {
        (S::Draft, A::EditDraft) => Some((Actor::Owner, S::Draft)),
        (S::Draft, A::SubmitForModeration) => Some((Actor::Owner, S::Moderation)),
        (S::Moderation, A::Publish) => Some((Actor::Admin, S::Published)),
        (S::Hidden, A::Publish) => Some((Actor::Owner, S::Published)),
        (S::Published, A::Hide) => Some((Actor::Owner, S::Hidden)),
        (S::Moderation | S::Published | S::Hidden, A::Block) => Some((Actor::Admin, S::Blocked)),
        (S::Blocked, A::Unblock) => Some((Actor::Admin, S::Draft)),
        _ => None,
    }
}

/// Decide a status transition.
///
/// # Errors
/// Returns [`TransitionError::InvalidTransition`] when the (status, action)
/// pair is outside the table, and [`TransitionError::NotPermitted`] when the
/// pair exists but `viewer` is not the required actor. The actor check only
/// runs for pairs inside the table, so a wrong-state request surfaces as a
/// conflict even for an admin.
pub fn transition(
    current: ArticleStatus,
    action: StatusAction,
    viewer: &Viewer,
    owner_id: i32,
) -> Result<ArticleStatus, TransitionError> {
    let Some((required, next)) = table_row(current, action) else {
        return Err(TransitionError::InvalidTransition {
            status: current,
            action,
        });
    };
    let permitted = match required {
        Actor::Admin => viewer.is_admin(),
        Actor::Owner => viewer.owns(owner_id),
    };
    if permitted {
        Ok(next)
    } else {
        Err(TransitionError::NotPermitted {
            status: current,
            action,
        })
    }
}
