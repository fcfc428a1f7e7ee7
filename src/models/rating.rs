//! Self-reported recall rating. The textual form ("again", "hard", "good",
//! "easy") is the wire and storage format and must stay byte-identical.

use crate::error::ReviewError;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString, IntoStaticStr};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Rating {
    /// Failed to recall the shortcut
    Again,
    /// Recalled with significant difficulty
    Hard,
    /// Recalled with some effort
    Good,
    /// Recalled with no difficulty
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Parses a rating token from an untyped source (form input, JSON field,
    /// database column). Matching is exact; "Good" or " good" are rejected.
    pub fn parse(token: &str) -> Result<Self, ReviewError> {
        Rating::from_str(token).map_err(|_| ReviewError::InvalidRating(token.to_string()))
    }
}

impl ToSql for Rating {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Rating {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let token = value.as_str()?;
        Rating::parse(token).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip() {
        for rating in Rating::ALL {
            let token = rating.as_str();
            assert_eq!(rating.to_string(), token);
            assert_eq!(Rating::parse(token).unwrap(), rating);

            let json = serde_json::to_string(&rating).unwrap();
            assert_eq!(json, format!("\"{}\"", token));
            let back: Rating = serde_json::from_str(&json).unwrap();
            assert_eq!(back, rating);
        }
    }

    #[test]
    fn test_exact_tokens() {
        let tokens: Vec<&str> = Rating::ALL.iter().map(Rating::as_str).collect();
        assert_eq!(tokens, ["again", "hard", "good", "easy"]);
    }

    #[test]
    fn test_unknown_token_is_invalid_rating() {
        assert_eq!(
            Rating::parse("perfect"),
            Err(ReviewError::InvalidRating("perfect".to_string()))
        );
        assert!(Rating::parse("Good").is_err());
        assert!(Rating::parse("").is_err());
        assert!(serde_json::from_str::<Rating>("\"meh\"").is_err());
    }
}
