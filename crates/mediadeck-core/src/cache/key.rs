use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Identity of a cached query: a use-case tag plus its canonical
/// parameters.
///
/// Two keys are equal exactly when the tag and the JSON encoding of the
/// parameters match, so `SearchParams { query: "dune", .. }` and a second
/// value built the same way share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    tag: &'static str,
    params: Option<String>,
}

impl QueryKey {
    /// A parameterless key.
    pub const fn new(tag: &'static str) -> Self {
        Self { tag, params: None }
    }

    /// Key over `params`, canonicalised as JSON.
    pub fn with_params<P>(tag: &'static str, params: &P) -> Self
    where
        P: Serialize + fmt::Debug + ?Sized,
    {
        let params = serde_json::to_string(params).unwrap_or_else(|e| {
            warn!(tag, error = %e, "query params not serializable, keying by debug output");
            format!("{params:?}")
        });
        Self {
            tag,
            params: Some(params),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn params(&self) -> Option<&str> {
        self.params.as_deref()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Some(params) => write!(f, "{}:{params}", self.tag),
            None => f.write_str(self.tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediadeck_api::models::SearchParams;

    #[test]
    fn equal_params_produce_equal_keys() {
        let a = QueryKey::with_params("search-movies", &SearchParams::new("dune"));
        let b = QueryKey::with_params("search-movies", &SearchParams::new("dune"));
        let c = QueryKey::with_params("search-movies", &SearchParams::new("dune").page(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, QueryKey::with_params("search-tv", &SearchParams::new("dune")));
    }

    #[test]
    fn display_includes_params() {
        assert_eq!(QueryKey::new("dashboard-stats").to_string(), "dashboard-stats");
        assert_eq!(QueryKey::with_params("tag", &7_u64).to_string(), "tag:7");
    }
}
