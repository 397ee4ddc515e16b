//! Content languages and their database representation.
//!
//! Languages are stored as upper-case text codes so that migrations stay
//! readable and new languages can be added without a schema change.

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

/// A language an article or translation may be written in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    En,
    Ru,
}

/// Error raised when a stored language code is not recognised.
#[derive(Debug, Error)]
#[error("unknown language code: {0}")]
pub struct UnknownLanguage(String);

impl Language {
    /// The code stored in the database for this language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Ru => "RU",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EN" => Ok(Self::En),
            "RU" => Ok(Self::Ru),
            _ => Err(UnknownLanguage(s.to_owned())),
        }
    }
}

impl<DB> ToSql<Text, DB> for Language
where
    DB: Backend,
    str: ToSql<Text, DB>,
{
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, DB>) -> serialize::Result {
        self.as_str().to_sql(out)
    }
}

impl<DB> FromSql<Text, DB> for Language
where
    DB: Backend,
    String: FromSql<Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        let raw = String::from_sql(bytes)?;
        raw.parse().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Language::En, "EN")]
    #[case(Language::Ru, "RU")]
    fn round_trips_through_code(#[case] lang: Language, #[case] code: &str) {
        assert_eq!(lang.as_str(), code);
        assert_eq!(code.parse::<Language>().expect("parse"), lang);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("en".parse::<Language>().expect("parse"), Language::En);
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!("XX".parse::<Language>().is_err());
    }
}
