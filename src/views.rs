use chrono::{DateTime, Utc};

use crate::direction::TextDirection;
use crate::i18n::Language;
use crate::models::{Article, Feed};
use crate::text;
use crate::time;

/// Display-ready article, independent of where the article came from.
#[derive(Debug, Clone)]
pub struct ArticleCard {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: String,
    pub feed_title: Option<String>,
    pub is_new: bool,
    pub dir: &'static str,
    pub align: &'static str,
}

impl ArticleCard {
    pub fn new(article: &Article, lang: Language, now: DateTime<Utc>, summary_len: usize) -> Self {
        let direction = TextDirection::detect(&article.title);

        Self {
            id: article.id,
            title: article.title.clone(),
            link: article.link.clone(),
            summary: text::summarize(article.description.as_deref().unwrap_or(""), summary_len),
            published: time::describe(article.published_at.as_deref(), now, lang),
            feed_title: article
                .feed
                .as_ref()
                .map(|f| f.title.clone())
                .filter(|t| !t.is_empty()),
            is_new: article.is_new,
            dir: direction.as_attr(),
            align: direction.align(),
        }
    }
}

/// Cards for a whole collection, in backend order, optionally capped.
pub fn article_cards(
    articles: &[Article],
    limit: Option<usize>,
    lang: Language,
    now: DateTime<Utc>,
    summary_len: usize,
) -> Vec<ArticleCard> {
    articles
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|a| ArticleCard::new(a, lang, now, summary_len))
        .collect()
}

#[derive(Debug, Clone)]
pub struct FeedRow {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub refreshed: String,
    pub is_active: bool,
    pub dir: &'static str,
}

impl FeedRow {
    pub fn new(feed: &Feed, lang: Language, now: DateTime<Utc>) -> Self {
        Self {
            id: feed.id,
            title: feed.title.clone(),
            url: feed.url.clone(),
            description: feed
                .description
                .as_deref()
                .map(|d| text::summarize(d, text::DEFAULT_SUMMARY_LENGTH))
                .unwrap_or_default(),
            refreshed: time::describe(feed.last_updated.as_deref(), now, lang),
            is_active: feed.is_active,
            dir: TextDirection::detect(&feed.title).as_attr(),
        }
    }
}
