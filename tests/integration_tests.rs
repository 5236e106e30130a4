//! Integration tests for the BitPulse reader
//!
//! These tests drive the full router against a mocked aggregation backend,
//! from configuration loading through to rendered pages.

use std::io::Write;
use tempfile::NamedTempFile;

mod common {
    use std::sync::Arc;

    use axum_test::TestServer;
    use bitpulse_reader::config::Config;
    use bitpulse_reader::i18n::Language;
    use bitpulse_reader::routes::{router, AppState};
    use serde_json::{json, Value};
    use wiremock::MockServer;

    /// Router wired to `backend`, rendering English by default
    pub fn create_server(backend: &MockServer) -> TestServer {
        let config = Config {
            backend_url: format!("{}/api", backend.uri()),
            language: Language::En,
            ..Config::default()
        };
        let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
        TestServer::new(router(state)).expect("Failed to start test server")
    }

    pub fn feed(id: i64, title: &str) -> Value {
        json!({
            "id": id,
            "url": format!("https://feed{}.example.com/rss", id),
            "title": title,
            "description": "<p>Crypto <i>coverage</i></p>",
            "last_updated": "2024-05-01T10:00:00",
            "created_at": "2024-05-01T09:00:00",
            "is_active": true
        })
    }

    pub fn article(id: i64, title: &str, published_at: &str) -> Value {
        json!({
            "id": id,
            "feed_id": 1,
            "feed": feed(1, "Coin Desk"),
            "title": title,
            "link": format!("https://coindesk.example.com/a/{}", id),
            "description": "<div>Prices <strong>rallied</strong> overnight</div>",
            "content": null,
            "author": "Staff",
            "published_at": published_at,
            "created_at": published_at,
            "updated_at": null,
            "is_new": false
        })
    }

    pub fn page(page: u32, total: u64, size: u32, items: Vec<Value>) -> Value {
        json!({
            "total": total,
            "page": page,
            "size": size,
            "pages": (total + size as u64 - 1) / size as u64,
            "items": items
        })
    }
}

#[cfg(test)]
mod config_integration_tests {
    use super::*;
    use bitpulse_reader::config::Config;
    use bitpulse_reader::i18n::Language;

    #[test]
    fn test_load_shipped_config() {
        // Test loading the bitpulse.toml shipped with the project
        let config = Config::load("bitpulse.toml");
        assert!(config.is_ok(), "Failed to load bitpulse.toml: {:?}", config.err());

        let config = config.unwrap();
        assert_eq!(config.language, Language::Fa);
        assert_eq!(config.fallback_language, Language::En);
        assert_eq!(config.display.page_size, 15);
        assert_eq!(config.display.landing_limit, 12);
    }

    #[test]
    fn test_config_round_trip() {
        let toml_content = r#"
            backend_url = "https://news.example.com/api"
            fetch_retries = 3
            language = "en"

            [display]
            page_size = 20
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.backend_url, "https://news.example.com/api");
        assert_eq!(config.fetch_retries, 3);
        assert_eq!(config.language, Language::En);
        assert_eq!(config.display.page_size, 20);

        // Unset values fall back to defaults
        assert_eq!(config.display.landing_limit, 12);
        assert_eq!(config.display.truncate_length, 120);
        assert_eq!(config.cache_ttl, 30);
    }
}

#[cfg(test)]
mod reader_integration_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_browse_search_and_paginate() {
        let backend = MockServer::start().await;
        let first: Vec<_> = (1..=15)
            .map(|i| article(i, &format!("Market update {}", i), "2024-01-10T08:00:00"))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("page", "1"))
            .and(query_param("size", "15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 20, 15, first)))
            .mount(&backend)
            .await;
        let second: Vec<_> = (16..=20)
            .map(|i| article(i, &format!("Market update {}", i), "2024-01-10T08:00:00"))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(2, 20, 15, second)))
            .mount(&backend)
            .await;
        let server = create_server(&backend);

        let response = server.get("/articles").await;
        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Market update 15"));
        assert!(!body.contains("Market update 16"));
        // Old articles show an absolute date
        assert!(body.contains("Jan 10, 2024"));
        assert!(body.contains("Prices rallied overnight"));

        let response = server.get("/articles").add_query_param("page", "2").await;
        let body = response.text();
        assert!(body.contains("Market update 20"));
        assert!(body.contains("aria-disabled=\"true\">Next"));
    }

    #[tokio::test]
    async fn test_search_is_trimmed_before_reaching_backend() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("search", "solana"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(
                1,
                1,
                15,
                vec![article(1, "Solana outage", "2024-01-10T08:00:00")],
            )))
            .expect(1)
            .mount(&backend)
            .await;
        let server = create_server(&backend);

        let response = server
            .get("/articles")
            .add_query_param("search", "  solana ")
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Solana outage"));
    }

    #[tokio::test]
    async fn test_repeat_visits_are_served_from_cache() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/feeds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([feed(1, "Coin Desk")])))
            .expect(1)
            .mount(&backend)
            .await;
        let server = create_server(&backend);

        for _ in 0..3 {
            let response = server.get("/feeds").await;
            response.assert_status_ok();
            assert!(response.text().contains("Coin Desk"));
        }
    }

    #[tokio::test]
    async fn test_unknown_language_falls_back() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/feeds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&backend)
            .await;
        let server = create_server(&backend);

        let persian = server.get("/feeds").add_query_param("lang", "fa").await;
        assert!(persian.text().contains("dir=\"rtl\""));

        let unknown = server.get("/feeds").add_query_param("lang", "de").await;
        let body = unknown.text();
        assert!(body.contains("dir=\"ltr\""));
        assert!(body.contains("No feeds found"));
    }

    #[tokio::test]
    async fn test_add_then_remove_feed() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/feeds"))
            .respond_with(ResponseTemplate::new(201).set_body_json(feed(4, "The Block")))
            .expect(1)
            .mount(&backend)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/feeds/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&backend)
            .await;
        let server = create_server(&backend);

        let added = server
            .post("/feeds")
            .add_query_param("lang", "en")
            .form(&[("url", "https://theblock.example/rss"), ("title", "The Block")])
            .await;
        assert_eq!(added.status_code(), StatusCode::SEE_OTHER);

        let removed = server
            .post("/feeds/4/delete")
            .add_query_param("lang", "en")
            .form(&[("confirm", "yes")])
            .await;
        assert_eq!(removed.status_code(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_unreachable_backend_renders_error_states() {
        let backend = MockServer::start().await;
        let server = create_server(&backend);
        // No mocks mounted: every backend call answers 404

        let home = server.get("/").await;
        home.assert_status_ok();
        assert!(home.text().contains("Error loading news"));

        let articles = server.get("/articles").await;
        articles.assert_status_ok();
        assert!(articles.text().contains("Error loading news"));

        let feeds = server.get("/feeds").await;
        feeds.assert_status_ok();
        assert!(feeds.text().contains("class=\"error\""));
    }
}
