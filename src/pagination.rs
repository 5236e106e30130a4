//! Page and search state for the article listings.

use tracing::{debug, warn};

use crate::client::ApiError;
use crate::models::{Article, ArticleQuery, Paginated};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded(Paginated<Article>),
    Error(String),
}

/// Handle for one issued fetch. Only the most recently issued ticket may
/// update the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    pub query: ArticleQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// Superseded by a newer ticket; the response was dropped
    Stale,
    /// The requested page was past the end and has been clamped; fetch again
    Reload,
}

/// Pagination/search controller for the all-articles view.
#[derive(Debug, Clone)]
pub struct ArticleBrowser {
    page: u32,
    page_size: u32,
    search: String,
    known_pages: Option<u32>,
    issued: u64,
    state: LoadState,
}

impl ArticleBrowser {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            search: String::new(),
            known_pages: None,
            issued: 0,
            state: LoadState::Idle,
        }
    }

    /// Restores the position a previous render left behind.
    pub fn resume(page_size: u32, search: &str, page: u32) -> Self {
        let mut browser = Self::new(page_size);
        browser.search = search.to_string();
        browser.go_to_page(page);
        browser
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Updates the search term. A changed term always returns to page 1.
    /// Returns whether a reload is needed.
    pub fn set_search(&mut self, search: &str) -> bool {
        if search == self.search {
            return false;
        }
        self.search = search.to_string();
        self.page = 1;
        self.known_pages = None;
        true
    }

    /// Moves to `page`, bounded below by 1 and above by the last known page
    /// count. Returns whether a reload is needed.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        let mut target = page.max(1);
        if let Some(pages) = self.known_pages {
            target = target.min(pages);
        }
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    pub fn query(&self) -> ArticleQuery {
        ArticleQuery::new(self.page, self.page_size).with_search(&self.search)
    }

    /// Starts a fetch for the current position.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.state = LoadState::Loading;
        Ticket {
            seq: self.issued,
            query: self.query(),
        }
    }

    /// Applies a backend response, unless a newer fetch has been issued since
    /// `ticket`. The collection is replaced wholesale.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Paginated<Article>, ApiError>,
    ) -> Resolution {
        if ticket.seq != self.issued {
            debug!("Dropping stale response for ticket {} (latest {})", ticket.seq, self.issued);
            return Resolution::Stale;
        }

        match result {
            Ok(page) => {
                let pages = page.total_pages();
                self.known_pages = Some(pages);
                if self.page > pages {
                    self.page = pages;
                    self.state = LoadState::Idle;
                    return Resolution::Reload;
                }
                self.state = LoadState::Loaded(page);
            }
            Err(e) => {
                warn!("Failed to load articles: {}", e);
                self.state = LoadState::Error(e.to_string());
            }
        }
        Resolution::Applied
    }

    /// Page controls for the loaded collection, if any.
    pub fn controls(&self) -> Option<PageControls> {
        match &self.state {
            LoadState::Loaded(page) => Some(PageControls::new(self.page, page.total_pages())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub number: u32,
    pub current: bool,
}

/// Previous/next plus one numbered button per page, with no elision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub current: u32,
    pub total_pages: u32,
    pub previous: Option<u32>,
    pub next: Option<u32>,
    pub buttons: Vec<PageButton>,
}

impl PageControls {
    pub fn new(current: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        let current = current.clamp(1, total_pages);

        Self {
            current,
            total_pages,
            previous: (current > 1).then(|| current - 1),
            next: (current < total_pages).then(|| current + 1),
            buttons: (1..=total_pages)
                .map(|number| PageButton {
                    number,
                    current: number == current,
                })
                .collect(),
        }
    }
}
