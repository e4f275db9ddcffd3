use serde::{Deserialize, Serialize};

/// One document of the catalog search response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Book {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: Option<Vec<String>>,
    #[serde(default)]
    pub cover_i: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<Book>,
}

/// Book as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookItem {
    pub key: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapCount {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_tolerates_missing_optionals() {
        let raw = r#"{
            "numFound": 2,
            "docs": [
                {"key": "/works/OL1W", "title": "Teaching", "author_name": ["A. Author", "B"], "cover_i": 42},
                {"key": "/works/OL2W", "title": "Learning"}
            ]
        }"#;
        let resp: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.docs.len(), 2);
        assert_eq!(resp.docs[0].cover_i, Some(42));
        assert_eq!(resp.docs[1].author_name, None);
    }

    #[test]
    fn missing_docs_reads_as_empty() {
        let resp: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.docs.is_empty());
    }
}
