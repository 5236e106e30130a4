use serde::{Deserialize, Serialize};

/// A subscribed feed as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    pub created_at: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// One ingested article. Timestamps stay as the raw backend strings and are
/// parsed at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub feed_id: i64,
    #[serde(default)]
    pub feed: Option<Feed>,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
    pub items: Vec<T>,
}

impl<T> Paginated<T> {
    /// Total pages, never less than one so page controls stay well-formed.
    pub fn total_pages(&self) -> u32 {
        self.pages.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Body of `POST /feeds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeed {
    pub url: String,
    pub title: String,
}

/// Query string of `GET /articles`. Unset filters are left off the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleQuery {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
}

impl ArticleQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size,
            ..Default::default()
        }
    }

    /// Sets the free-text search; blank input clears it.
    pub fn with_search(mut self, search: &str) -> Self {
        let trimmed = search.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserializes_backend_shape() {
        let json = r#"{
            "id": 3,
            "feed_id": 1,
            "feed": {
                "id": 1,
                "url": "https://coin.example/rss",
                "title": "Coin News",
                "description": null,
                "last_updated": null,
                "created_at": "2024-05-01T10:00:00",
                "is_active": true
            },
            "title": "Bitcoin rallies",
            "link": "https://coin.example/a/3",
            "description": "<p>Up <b>5%</b></p>",
            "content": null,
            "author": null,
            "published_at": "2024-05-02T08:30:00",
            "created_at": "2024-05-02T08:31:00",
            "updated_at": null,
            "is_new": true
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.id, 3);
        assert_eq!(article.feed.as_ref().unwrap().title, "Coin News");
        assert_eq!(article.published_at.as_deref(), Some("2024-05-02T08:30:00"));
        assert!(article.is_new);
    }

    #[test]
    fn test_total_pages_never_zero() {
        let empty: Paginated<Article> = Paginated {
            total: 0,
            page: 1,
            size: 15,
            pages: 0,
            items: vec![],
        };
        assert_eq!(empty.total_pages(), 1);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_query_omits_unset_filters() {
        let query = ArticleQuery::new(2, 15);
        let encoded = serde_urlencoded::to_string(&query).unwrap();
        assert_eq!(encoded, "page=2&size=15");

        let query = ArticleQuery::new(1, 15).with_search("bitcoin");
        let encoded = serde_urlencoded::to_string(&query).unwrap();
        assert_eq!(encoded, "page=1&size=15&search=bitcoin");
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let query = ArticleQuery::new(0, 15).with_search("   ");
        assert_eq!(query.page, 1);
        assert!(query.search.is_none());
    }
}
