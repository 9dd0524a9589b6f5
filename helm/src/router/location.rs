use std::collections::BTreeMap;
use std::fmt;

use url::{form_urlencoded, Url};

use crate::error::{HelmError, Result};

/// A navigable address: path plus query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
    query: BTreeMap<String, String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            path,
            query: BTreeMap::new(),
        }
    }

    /// Parse `"/main/discussions?discussionId=3"` style strings.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse("helm://app/")?.join(input.trim())?;
        if url.scheme() != "helm" {
            return Err(HelmError::Internal(format!("not an in-app location: {input}")));
        }

        let mut location = Location::new(url.path());
        for (key, value) in url.query_pairs() {
            location.query.insert(key.into_owned(), value.into_owned());
        }
        Ok(location)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            write!(f, "?{encoded}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_and_query() {
        let location = Location::parse("/main/discussions?discussionId=12").unwrap();
        assert_eq!(location.path(), "/main/discussions");
        assert_eq!(location.query("discussionId"), Some("12"));
    }

    #[test]
    fn test_display_roundtrips_encoded_query() {
        let location = Location::new("/main/discussions").with_query("discussionId", "a b");
        let text = location.to_string();
        assert_eq!(text, "/main/discussions?discussionId=a+b");
        assert_eq!(Location::parse(&text).unwrap(), location);
    }

    #[test]
    fn test_relative_input_gets_leading_slash() {
        assert_eq!(Location::new("login").path(), "/login");
        assert_eq!(Location::parse("signup").unwrap().path(), "/signup");
    }

    #[test]
    fn test_foreign_url_rejected() {
        assert!(Location::parse("https://example.com/login").is_err());
    }
}
