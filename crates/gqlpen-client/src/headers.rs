use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One editable header row. Rows with an empty key are kept in the settings but never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Headers sent with a request, in the order they were first declared.
pub type RequestHeaders = IndexMap<String, String>;

/// Union of the global and the request-specific headers, keyed by lowercased name. On a key
/// collision the specific value wins and keeps the position of the global one.
pub fn merge_headers(global: &[Header], specific: &[Header]) -> RequestHeaders {
    let mut headers = RequestHeaders::with_capacity(global.len() + specific.len());

    for header in global.iter().chain(specific) {
        if header.key.is_empty() {
            continue;
        }

        headers.insert(header.key.to_lowercase(), header.value.clone());
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_headers_override_global_ones() {
        let global = [Header::new("A", "1")];
        let specific = [Header::new("A", "2"), Header::new("B", "3")];

        let merged = merge_headers(&global, &specific);

        assert_eq!(
            merged.into_iter().collect::<Vec<_>>(),
            [("a".to_owned(), "2".to_owned()), ("b".to_owned(), "3".to_owned())]
        );
    }

    #[test]
    fn rows_without_a_key_are_skipped() {
        let global = [Header::new("", "ignored"), Header::new("x-app-id", "623996f3")];

        let merged = merge_headers(&global, &[Header::default()]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged["x-app-id"], "623996f3");
    }

    #[test]
    fn names_differing_in_case_are_the_same_header() {
        let global = [Header::new("Authorization", "global"), Header::new("x-app-id", "623996f3")];
        let specific = [Header::new("AUTHORIZATION", "Bearer token")];

        let merged = merge_headers(&global, &specific);

        assert_eq!(
            merged.into_iter().collect::<Vec<_>>(),
            [
                ("authorization".to_owned(), "Bearer token".to_owned()),
                ("x-app-id".to_owned(), "623996f3".to_owned())
            ]
        );
    }

    #[test]
    fn later_rows_of_the_same_list_win() {
        let specific = [Header::new("authorization", "old"), Header::new("authorization", "new")];

        let merged = merge_headers(&[], &specific);

        assert_eq!(merged["authorization"], "new");
    }
}
