use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::cache::{CacheKey, QueryCache};
use crate::client::{ApiClient, ApiError};
use crate::config::Config;
use crate::feeds::{DeleteForm, FeedForm, Mutation, MutationGuard};
use crate::i18n::{Labels, Language, MessageKey};
use crate::models::{Article, ArticleQuery, Feed, Paginated};
use crate::pagination::{ArticleBrowser, LoadState, PageControls, Resolution};
use crate::views::{article_cards, ArticleCard, FeedRow};

const FEEDS: &str = "feeds";
const ARTICLES: &str = "articles";

pub struct AppState {
    pub client: ApiClient,
    pub cache: QueryCache,
    pub mutations: MutationGuard,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = ApiClient::new(
            &config.backend_url,
            config.request_timeout(),
            config.fetch_retries,
        )?;

        Ok(Self {
            client,
            cache: QueryCache::new(config.cache_ttl()),
            mutations: MutationGuard::new(),
            config,
        })
    }

    fn language(&self, requested: Option<&str>) -> Language {
        Language::resolve(requested, self.config.language, self.config.fallback_language)
    }

    async fn feeds(&self) -> Result<Vec<Feed>, ApiError> {
        self.cache
            .get_or_fetch(CacheKey::endpoint(FEEDS), || self.client.list_feeds())
            .await
    }

    async fn articles(&self, query: &ArticleQuery) -> Result<Paginated<Article>, ApiError> {
        self.cache
            .get_or_fetch(CacheKey::new(ARTICLES, query), || self.client.list_articles(query))
            .await
    }

    /// Feed mutations change both the feed list and which articles exist.
    async fn invalidate_after_mutation(&self) {
        self.cache.invalidate(FEEDS).await;
        self.cache.invalidate(ARTICLES).await;
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/articles", get(articles))
        .route("/feeds", get(feeds).post(add_feed))
        .route("/feeds/:id/delete", get(confirm_delete).post(delete_feed))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Page furniture shared by every template.
pub struct Chrome {
    pub labels: Labels,
    pub lang: &'static str,
    pub dir: &'static str,
    pub other_lang: &'static str,
}

impl Chrome {
    pub fn new(lang: Language) -> Self {
        let other = match lang {
            Language::Fa => Language::En,
            Language::En => Language::Fa,
        };
        Self {
            labels: Labels::new(lang),
            lang: lang.code(),
            dir: lang.direction().as_attr(),
            other_lang: other.code(),
        }
    }
}

// Template structs
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub search: String,
    pub cards: Vec<ArticleCard>,
    pub failed: bool,
}

#[derive(Template)]
#[template(path = "articles.html")]
pub struct ArticlesTemplate {
    pub chrome: Chrome,
    pub search: String,
    pub cards: Vec<ArticleCard>,
    pub failed: bool,
    pub pager: Option<Pager>,
}

pub struct Pager {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub links: Vec<PageLink>,
}

pub struct PageLink {
    pub label: String,
    pub href: String,
    pub current: bool,
}

#[derive(Template)]
#[template(path = "feeds.html")]
pub struct FeedsTemplate {
    pub chrome: Chrome,
    pub rows: Vec<FeedRow>,
    pub failed: bool,
    pub notice: Option<String>,
    pub form_url: String,
    pub form_title: String,
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub chrome: Chrome,
    pub feed_id: i64,
    pub feed_title: String,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", self.0),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub search: String,
    pub lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArticlesQuery {
    pub page: Option<u32>,
    #[serde(default)]
    pub search: String,
    /// Search term the page was rendered with, to detect a changed search
    pub prev_search: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedsQuery {
    pub status: Option<String>,
    pub lang: Option<String>,
}

#[derive(Serialize)]
struct PageParams<'a> {
    page: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    search: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    prev_search: &'a str,
    lang: &'a str,
}

fn page_href(page: u32, search: &str, lang: Language) -> Result<String, serde_urlencoded::ser::Error> {
    let query = serde_urlencoded::to_string(PageParams {
        page,
        search,
        prev_search: search,
        lang: lang.code(),
    })?;
    Ok(format!("/articles?{}", query))
}

fn pager(
    controls: &PageControls,
    search: &str,
    lang: Language,
) -> Result<Pager, serde_urlencoded::ser::Error> {
    let previous = controls
        .previous
        .map(|p| page_href(p, search, lang))
        .transpose()?;
    let next = controls
        .next
        .map(|p| page_href(p, search, lang))
        .transpose()?;
    let links = controls
        .buttons
        .iter()
        .map(|b| {
            Ok(PageLink {
                label: lang.localize_digits(&b.number.to_string()),
                href: page_href(b.number, search, lang)?,
                current: b.current,
            })
        })
        .collect::<Result<Vec<_>, serde_urlencoded::ser::Error>>()?;

    Ok(Pager {
        previous,
        next,
        links,
    })
}

fn feeds_page(
    lang: Language,
    feeds: Result<Vec<Feed>, ApiError>,
    notice: Option<String>,
    form: FeedForm,
) -> FeedsTemplate {
    let now = Utc::now();
    let (rows, failed) = match feeds {
        Ok(feeds) => (feeds.iter().map(|f| FeedRow::new(f, lang, now)).collect(), false),
        Err(e) => {
            warn!("Failed to load feeds: {}", e);
            (Vec::new(), true)
        }
    };

    FeedsTemplate {
        chrome: Chrome::new(lang),
        rows,
        failed,
        notice,
        form_url: form.url,
        form_title: form.title,
    }
}

fn feeds_redirect(lang: Language, status: Option<&str>) -> Redirect {
    match status {
        Some(status) => Redirect::to(&format!("/feeds?lang={}&status={}", lang.code(), status)),
        None => Redirect::to(&format!("/feeds?lang={}", lang.code())),
    }
}

// Route handlers
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HomeQuery>,
) -> impl IntoResponse {
    let lang = state.language(params.lang.as_deref());
    let display = &state.config.display;
    let query = ArticleQuery::new(1, display.landing_limit).with_search(&params.search);

    let (cards, failed) = match state.articles(&query).await {
        Ok(page) => (
            article_cards(
                &page.items,
                Some(display.landing_limit as usize),
                lang,
                Utc::now(),
                display.truncate_length,
            ),
            false,
        ),
        Err(e) => {
            warn!("Failed to load latest articles: {}", e);
            (Vec::new(), true)
        }
    };

    HtmlTemplate(HomeTemplate {
        chrome: Chrome::new(lang),
        search: params.search,
        cards,
        failed,
    })
}

pub async fn articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArticlesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lang = state.language(params.lang.as_deref());
    let display = &state.config.display;

    let previous_search = params.prev_search.as_deref().unwrap_or(&params.search);
    let mut browser =
        ArticleBrowser::resume(display.page_size, previous_search, params.page.unwrap_or(1));
    browser.set_search(&params.search);

    // A second round only happens when the requested page was past the end
    for _ in 0..2 {
        let ticket = browser.begin();
        let result = state.articles(&ticket.query).await;
        if browser.complete(ticket, result) != Resolution::Reload {
            break;
        }
    }

    let (cards, failed) = match browser.state() {
        LoadState::Loaded(page) => (
            article_cards(&page.items, None, lang, Utc::now(), display.truncate_length),
            false,
        ),
        _ => (Vec::new(), true),
    };
    let pager = browser
        .controls()
        .map(|controls| pager(&controls, browser.search(), lang))
        .transpose()?;

    Ok(HtmlTemplate(ArticlesTemplate {
        chrome: Chrome::new(lang),
        search: browser.search().to_string(),
        cards,
        failed,
        pager,
    }))
}

pub async fn feeds(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedsQuery>,
) -> impl IntoResponse {
    let lang = state.language(params.lang.as_deref());
    let notice = match params.status.as_deref() {
        Some("added") => Some(lang.text(MessageKey::FeedAdded).to_string()),
        Some("removed") => Some(lang.text(MessageKey::FeedRemoved).to_string()),
        _ => None,
    };

    HtmlTemplate(feeds_page(lang, state.feeds().await, notice, FeedForm::default()))
}

pub async fn add_feed(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
    Form(form): Form<FeedForm>,
) -> Response {
    let lang = state.language(params.lang.as_deref());

    let new_feed = match form.validate() {
        Ok(new_feed) => new_feed,
        Err(_) => {
            let notice = Some(lang.text(MessageKey::RequiredFields).to_string());
            let page = feeds_page(lang, state.feeds().await, notice, form);
            return (StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response();
        }
    };

    let Some(_permit) = state.mutations.try_start(Mutation::Add(new_feed.url.clone())) else {
        let notice = Some(lang.text(MessageKey::MutationInProgress).to_string());
        let page = feeds_page(lang, state.feeds().await, notice, form);
        return (StatusCode::CONFLICT, HtmlTemplate(page)).into_response();
    };

    match state.client.create_feed(&new_feed).await {
        Ok(created) => {
            match created {
                Some(feed) => info!("Added feed {} ({}) as id {}", feed.title, feed.url, feed.id),
                None => info!("Added feed {} ({})", new_feed.title, new_feed.url),
            }
            state.invalidate_after_mutation().await;
            feeds_redirect(lang, Some("added")).into_response()
        }
        Err(e) => {
            warn!("Failed to add feed {}: {}", new_feed.url, e);
            let notice = Some(lang.text(MessageKey::MutationFailed).to_string());
            let page = feeds_page(lang, state.feeds().await, notice, form);
            (StatusCode::BAD_GATEWAY, HtmlTemplate(page)).into_response()
        }
    }
}

pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    Path(feed_id): Path<i64>,
    Query(params): Query<LangQuery>,
) -> impl IntoResponse {
    let lang = state.language(params.lang.as_deref());
    let feed_title = state
        .feeds()
        .await
        .ok()
        .and_then(|feeds| feeds.into_iter().find(|f| f.id == feed_id))
        .map(|f| f.title)
        .unwrap_or_else(|| format!("#{}", feed_id));

    HtmlTemplate(ConfirmDeleteTemplate {
        chrome: Chrome::new(lang),
        feed_id,
        feed_title,
    })
}

pub async fn delete_feed(
    State(state): State<Arc<AppState>>,
    Path(feed_id): Path<i64>,
    Query(params): Query<LangQuery>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let lang = state.language(params.lang.as_deref());

    if !form.confirmed() {
        info!("Delete of feed {} not confirmed, skipping", feed_id);
        return feeds_redirect(lang, None).into_response();
    }

    let Some(_permit) = state.mutations.try_start(Mutation::Delete(feed_id)) else {
        let notice = Some(lang.text(MessageKey::MutationInProgress).to_string());
        let page = feeds_page(lang, state.feeds().await, notice, FeedForm::default());
        return (StatusCode::CONFLICT, HtmlTemplate(page)).into_response();
    };

    match state.client.delete_feed(feed_id).await {
        Ok(()) => {
            info!("Removed feed {}", feed_id);
            state.invalidate_after_mutation().await;
            feeds_redirect(lang, Some("removed")).into_response()
        }
        Err(e) => {
            warn!("Failed to remove feed {}: {}", feed_id, e);
            let notice = Some(lang.text(MessageKey::MutationFailed).to_string());
            let page = feeds_page(lang, state.feeds().await, notice, FeedForm::default());
            (StatusCode::BAD_GATEWAY, HtmlTemplate(page)).into_response()
        }
    }
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
