//! Query-string handling shared by the proxy routes.
//!
//! Values arrive as strings. An empty value counts as absent everywhere.

use std::collections::HashMap;

use serde::Deserialize;
use supawatch_common::{Error, MediaKind, Result};

/// Raw query parameters of one request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    /// Non-empty value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Values of all `names`, or [`Error::MissingParameters`] listing every
    /// one that is absent or empty.
    pub fn require<const N: usize>(&self, names: [&str; N]) -> Result<[&str; N]> {
        validate_required(&self.0, &names)?;
        Ok(names.map(|name| self.get(name).unwrap_or_default()))
    }

    /// 1-based page number, defaulting to 1.
    pub fn page(&self) -> Result<u32> {
        match self.get("page") {
            None => Ok(1),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(page) if page >= 1 => Ok(page),
                _ => Err(Error::invalid(
                    "page",
                    format!("expected a positive integer, got '{raw}'"),
                )),
            },
        }
    }

    /// `type=tv` selects series, anything else movies.
    pub fn media_kind(&self) -> MediaKind {
        match self.get("type") {
            Some("tv") => MediaKind::Tv,
            _ => MediaKind::Movie,
        }
    }

    /// Boolean flag accepting `true`/`false`.
    pub fn flag(&self, name: &str, default: bool) -> Result<bool> {
        match self.get(name) {
            None => Ok(default),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(Error::invalid(
                name,
                format!("expected true or false, got '{other}'"),
            )),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Fail with every required name that is absent or empty.
pub fn validate_required(params: &HashMap<String, String>, names: &[&str]) -> Result<()> {
    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| params.get(*name).map_or(true, |v| v.is_empty()))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::missing(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn require_returns_values_in_order() {
        let q = params(&[("season", "2"), ("id", "1399")]);
        assert_eq!(q.require(["id", "season"]).unwrap(), ["1399", "2"]);
    }

    #[test]
    fn require_lists_every_missing_name() {
        let q = params(&[("id", "")]);
        let err = q.require(["id", "season"]).unwrap_err();
        assert_eq!(err, Error::missing(["id", "season"]));
        assert_eq!(err.to_string(), "Missing required parameters: id, season");
    }

    #[test]
    fn page_defaults_and_validates() {
        assert_eq!(params(&[]).page().unwrap(), 1);
        assert_eq!(params(&[("page", "")]).page().unwrap(), 1);
        assert_eq!(params(&[("page", "3")]).page().unwrap(), 3);
        assert!(params(&[("page", "0")]).page().is_err());
        assert!(params(&[("page", "two")]).page().is_err());
    }

    #[test]
    fn media_kind_falls_back_to_movie() {
        assert_eq!(params(&[("type", "tv")]).media_kind(), MediaKind::Tv);
        assert_eq!(params(&[("type", "person")]).media_kind(), MediaKind::Movie);
        assert_eq!(params(&[]).media_kind(), MediaKind::Movie);
    }

    #[test]
    fn flag_parsing() {
        assert!(!params(&[]).flag("include_adult", false).unwrap());
        assert!(params(&[("include_adult", "true")]).flag("include_adult", false).unwrap());
        assert!(params(&[("include_adult", "yes")]).flag("include_adult", false).is_err());
    }
}
