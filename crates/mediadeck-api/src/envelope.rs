// Result envelope and paging types shared by every endpoint.
//
// Wire shape:
//   { "status": "success" | "error", "data": T | null, "messages": [..] | null }
// The tagged `ApiResult` replaces the loose envelope so that a failed result
// has no data slot at all.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ── Wire envelope ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum EnvelopeStatus {
    Success,
    Error,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEnvelope {
    pub status: EnvelopeStatus,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub messages: Option<Vec<String>>,
}

// ── ApiResult ────────────────────────────────────────────────────────

/// Details of an application-level failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiFailure {
    /// HTTP status when the failure came from a non-2xx response.
    pub http_status: Option<u16>,
    /// Human-readable diagnostics, in server order.
    pub messages: Vec<String>,
}

impl ApiFailure {
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            http_status: None,
            messages,
        }
    }

    /// All messages joined for single-line display.
    pub fn summary(&self) -> String {
        if self.messages.is_empty() {
            match self.http_status {
                Some(code) => format!("request failed (HTTP {code})"),
                None => "request failed".into(),
            }
        } else {
            self.messages.join("; ")
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.http_status == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status == Some(404)
    }
}

/// Outcome of a call that reached the server and got a well-formed answer.
///
/// Callers must branch on this; a successful transport does not imply a
/// successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    Success(T),
    Failure(ApiFailure),
}

impl<T> ApiResult<T> {
    /// Build a failure from plain messages.
    pub fn failure<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Failure(ApiFailure::new(
            messages.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Diagnostics of a failed result; empty on success.
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(f) => &f.messages,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Success(data) => ApiResult::Success(f(data)),
            Self::Failure(failure) => ApiResult::Failure(failure),
        }
    }

    pub fn into_result(self) -> Result<T, ApiFailure> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl<T: DeserializeOwned> ApiResult<T> {
    /// Type the `data` of a parsed envelope.
    ///
    /// An `"error"` envelope discards whatever `data` it carried.
    pub(crate) fn from_envelope(
        raw: RawEnvelope,
        http_status: Option<u16>,
    ) -> Result<Self, serde_json::Error> {
        match raw.status {
            EnvelopeStatus::Success => serde_json::from_value(raw.data).map(Self::Success),
            EnvelopeStatus::Error => Ok(Self::Failure(ApiFailure {
                http_status,
                messages: raw.messages.unwrap_or_default(),
            })),
        }
    }
}

// ── Paging ───────────────────────────────────────────────────────────

/// One page of a server-side list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

/// `ceil(total_count / page_size)`; zero when the page size is zero.
pub fn total_pages_for(total_count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        0
    } else {
        total_count.div_ceil(u64::from(page_size))
    }
}

impl<T> PagedList<T> {
    /// Build a page, truncating `items` to `page_size` and deriving
    /// `total_pages` from `total_count`.
    pub fn new(mut items: Vec<T>, page_number: u32, page_size: u32, total_count: u64) -> Self {
        items.truncate(usize::try_from(page_size).unwrap_or(usize::MAX));
        Self {
            items,
            page_number,
            page_size,
            total_count,
            total_pages: total_pages_for(total_count, page_size),
        }
    }

    /// Slice page `page_number` (1-based) out of a complete list.
    pub fn paginate(all: Vec<T>, page_number: u32, page_size: u32) -> Self {
        let total_count = u64::try_from(all.len()).unwrap_or(u64::MAX);
        let size = usize::try_from(page_size).unwrap_or(usize::MAX);
        let skip = usize::try_from(page_number.saturating_sub(1))
            .unwrap_or(usize::MAX)
            .saturating_mul(size);
        let items = all.into_iter().skip(skip).take(size).collect();
        Self::new(items, page_number, page_size, total_count)
    }

    pub fn empty(page_size: u32) -> Self {
        Self::new(Vec::new(), 1, page_size, 0)
    }

    /// `true` when the page satisfies the size and page-count invariants.
    pub fn is_consistent(&self) -> bool {
        u64::try_from(self.items.len()).unwrap_or(u64::MAX) <= u64::from(self.page_size)
            && self.total_pages == total_pages_for(self.total_count, self.page_size)
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page_number) < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn parse<T: DeserializeOwned>(value: serde_json::Value) -> ApiResult<T> {
        let raw: RawEnvelope = serde_json::from_value(value).unwrap();
        ApiResult::from_envelope(raw, None).unwrap()
    }

    #[test]
    fn error_envelope_never_exposes_data() {
        let result: ApiResult<String> = parse(json!({
            "status": "error",
            "data": "should be ignored",
            "messages": ["X not found"]
        }));
        assert_eq!(result.data(), None);
        assert_eq!(result.messages(), ["X not found".to_string()]);
    }

    #[test]
    fn void_success_accepts_null_data() {
        let result: ApiResult<()> = parse(json!({ "status": "success", "data": null }));
        assert!(result.is_success());

        let missing: ApiResult<()> = parse(json!({ "status": "success" }));
        assert!(missing.is_success());
    }

    #[test]
    fn success_with_wrong_shape_is_a_decode_error() {
        let raw: RawEnvelope =
            serde_json::from_value(json!({ "status": "success", "data": "nope" })).unwrap();
        assert!(ApiResult::<Vec<u32>>::from_envelope(raw, None).is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PagedList::paginate((0..47).collect::<Vec<_>>(), 1, 10);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.items.len(), 10);
        assert!(page.is_consistent());

        let last = PagedList::paginate((0..47).collect::<Vec<_>>(), 5, 10);
        assert_eq!(last.items, vec![40, 41, 42, 43, 44, 45, 46]);
        assert!(!last.has_next_page());
    }

    #[test]
    fn new_truncates_oversized_pages() {
        let page = PagedList::new(vec![1, 2, 3, 4], 1, 3, 4);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn zero_page_size_has_no_pages() {
        assert_eq!(total_pages_for(10, 0), 0);
        let page: PagedList<u8> = PagedList::new(vec![1], 1, 0, 10);
        assert!(page.items.is_empty());
    }

    #[test]
    fn paged_list_uses_camel_case() {
        let page: PagedList<u8> = serde_json::from_value(json!({
            "items": [1, 2],
            "pageNumber": 1,
            "pageSize": 2,
            "totalCount": 3,
            "totalPages": 2
        }))
        .unwrap();
        assert_eq!(page.total_count, 3);
        assert!(page.has_next_page());
    }
}
