//! User-visible strings for the two supported UI languages.
//!
//! Every string the templates render has a [`MessageKey`]; lookups are
//! exhaustive matches, so adding a key without translating it fails to build.

use serde::Deserialize;

use crate::direction::TextDirection;
use crate::time::{Calendar, RelativeTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fa,
    En,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fa" => Some(Language::Fa),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// Picks the requested language, else `default`; an unknown code falls
    /// back to `fallback`.
    pub fn resolve(requested: Option<&str>, default: Language, fallback: Language) -> Self {
        match requested.map(str::trim).filter(|c| !c.is_empty()) {
            None => default,
            Some(code) => Language::from_code(code).unwrap_or(fallback),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Fa => "fa",
            Language::En => "en",
        }
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Language::Fa => TextDirection::Rtl,
            Language::En => TextDirection::Ltr,
        }
    }

    pub fn calendar(self) -> Calendar {
        match self {
            Language::Fa => Calendar::Jalali,
            Language::En => Calendar::Gregorian,
        }
    }

    pub fn text(self, key: MessageKey) -> &'static str {
        match self {
            Language::Fa => persian(key),
            Language::En => english(key),
        }
    }

    /// Renders a relative time in this language.
    pub fn relative(self, time: &RelativeTime) -> String {
        let rendered = match (self, time) {
            (Language::Fa, RelativeTime::JustNow) => "همین حالا".to_string(),
            (Language::Fa, RelativeTime::Minutes(n)) => format!("{} دقیقه پیش", n),
            (Language::Fa, RelativeTime::Hours(n)) => format!("{} ساعت پیش", n),
            (Language::Fa, RelativeTime::Days(n)) => format!("{} روز پیش", n),
            (Language::En, RelativeTime::JustNow) => "just now".to_string(),
            (Language::En, RelativeTime::Minutes(1)) => "1 minute ago".to_string(),
            (Language::En, RelativeTime::Minutes(n)) => format!("{} minutes ago", n),
            (Language::En, RelativeTime::Hours(1)) => "1 hour ago".to_string(),
            (Language::En, RelativeTime::Hours(n)) => format!("{} hours ago", n),
            (Language::En, RelativeTime::Days(1)) => "1 day ago".to_string(),
            (Language::En, RelativeTime::Days(n)) => format!("{} days ago", n),
            (_, RelativeTime::On(date)) => self.calendar().format(*date),
        };
        self.localize_digits(&rendered)
    }

    /// Swaps ASCII digits for the language's native digits.
    pub fn localize_digits(self, s: &str) -> String {
        match self {
            Language::En => s.to_string(),
            Language::Fa => s
                .chars()
                .map(|c| match c.to_digit(10) {
                    Some(d) if c.is_ascii_digit() => {
                        char::from_u32(0x06F0 + d).unwrap_or(c)
                    }
                    _ => c,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    SiteName,
    HeroTitle,
    HeroTagline,
    NavHome,
    NavArticles,
    NavFeeds,
    LatestNews,
    AllArticles,
    ViewAllArticles,
    SearchPlaceholder,
    Search,
    Loading,
    NoArticles,
    ErrorLoadingArticles,
    New,
    ReadMore,
    Previous,
    Next,
    ManageFeeds,
    AddFeed,
    Adding,
    RemoveFeed,
    FeedUrl,
    FeedTitle,
    NoFeeds,
    Error,
    RequiredFields,
    ConfirmDeleteFeed,
    Confirm,
    Cancel,
    FeedAdded,
    FeedRemoved,
    MutationFailed,
    MutationInProgress,
}

fn persian(key: MessageKey) -> &'static str {
    use MessageKey::*;
    match key {
        SiteName => "بیت‌پالس",
        HeroTitle => "اخبار رمزارزها را یکجا دنبال کن!",
        HeroTagline => "جدیدترین اخبار و تحلیل‌های رمزارزی از معتبرترین منابع، همه در یکجا",
        NavHome => "خانه",
        NavArticles => "مشاهده اخبار",
        NavFeeds => "مدیریت خوراک‌ها",
        LatestNews => "آخرین اخبار رمزارزها",
        AllArticles => "همه اخبار",
        ViewAllArticles => "مشاهده همه اخبار",
        SearchPlaceholder => "جستجو در اخبار...",
        Search => "جستجو",
        Loading => "در حال بارگذاری...",
        NoArticles => "هیچ مقاله‌ای یافت نشد",
        ErrorLoadingArticles => "خطا در بارگذاری اخبار",
        New => "جدید",
        ReadMore => "بیشتر بخوانید →",
        Previous => "قبلی",
        Next => "بعدی",
        ManageFeeds => "مدیریت خوراک‌ها",
        AddFeed => "افزودن خوراک",
        Adding => "در حال افزودن...",
        RemoveFeed => "حذف خوراک",
        FeedUrl => "آدرس خوراک",
        FeedTitle => "عنوان خوراک",
        NoFeeds => "هیچ خوراکی یافت نشد",
        Error => "خطا",
        RequiredFields => "آدرس و عنوان خوراک الزامی است",
        ConfirmDeleteFeed => "آیا از حذف این خوراک مطمئن هستید؟",
        Confirm => "بله، حذف شود",
        Cancel => "انصراف",
        FeedAdded => "خوراک افزوده شد",
        FeedRemoved => "خوراک حذف شد",
        MutationFailed => "انجام عملیات ممکن نشد، دوباره تلاش کنید",
        MutationInProgress => "این عملیات در حال انجام است",
    }
}

fn english(key: MessageKey) -> &'static str {
    use MessageKey::*;
    match key {
        SiteName => "BitPulse",
        HeroTitle => "Follow all crypto news in one place!",
        HeroTagline => "The latest crypto news and analysis from trusted sources, all together",
        NavHome => "Home",
        NavArticles => "Browse News",
        NavFeeds => "Manage Feeds",
        LatestNews => "Latest Crypto News",
        AllArticles => "All News",
        ViewAllArticles => "View All News",
        SearchPlaceholder => "Search news...",
        Search => "Search",
        Loading => "Loading...",
        NoArticles => "No articles found",
        ErrorLoadingArticles => "Error loading news",
        New => "NEW",
        ReadMore => "Read More →",
        Previous => "Previous",
        Next => "Next",
        ManageFeeds => "Manage Feeds",
        AddFeed => "Add Feed",
        Adding => "Adding...",
        RemoveFeed => "Remove Feed",
        FeedUrl => "Feed URL",
        FeedTitle => "Feed Title",
        NoFeeds => "No feeds found",
        Error => "Error",
        RequiredFields => "Feed URL and title are required",
        ConfirmDeleteFeed => "Are you sure you want to remove this feed?",
        Confirm => "Yes, remove it",
        Cancel => "Cancel",
        FeedAdded => "Feed added",
        FeedRemoved => "Feed removed",
        MutationFailed => "The operation failed, please try again",
        MutationInProgress => "This operation is already in progress",
    }
}

/// All labels for one language, resolved up front for the templates.
#[derive(Debug, Clone)]
pub struct Labels {
    pub site_name: &'static str,
    pub hero_title: &'static str,
    pub hero_tagline: &'static str,
    pub nav_home: &'static str,
    pub nav_articles: &'static str,
    pub nav_feeds: &'static str,
    pub latest_news: &'static str,
    pub all_articles: &'static str,
    pub view_all_articles: &'static str,
    pub search_placeholder: &'static str,
    pub search: &'static str,
    pub loading: &'static str,
    pub no_articles: &'static str,
    pub error_loading_articles: &'static str,
    pub new: &'static str,
    pub read_more: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub manage_feeds: &'static str,
    pub add_feed: &'static str,
    pub adding: &'static str,
    pub remove_feed: &'static str,
    pub feed_url: &'static str,
    pub feed_title: &'static str,
    pub no_feeds: &'static str,
    pub error: &'static str,
    pub confirm_delete_feed: &'static str,
    pub confirm: &'static str,
    pub cancel: &'static str,
}

impl Labels {
    pub fn new(lang: Language) -> Self {
        use MessageKey::*;
        Self {
            site_name: lang.text(SiteName),
            hero_title: lang.text(HeroTitle),
            hero_tagline: lang.text(HeroTagline),
            nav_home: lang.text(NavHome),
            nav_articles: lang.text(NavArticles),
            nav_feeds: lang.text(NavFeeds),
            latest_news: lang.text(LatestNews),
            all_articles: lang.text(AllArticles),
            view_all_articles: lang.text(ViewAllArticles),
            search_placeholder: lang.text(SearchPlaceholder),
            search: lang.text(Search),
            loading: lang.text(Loading),
            no_articles: lang.text(NoArticles),
            error_loading_articles: lang.text(ErrorLoadingArticles),
            new: lang.text(New),
            read_more: lang.text(ReadMore),
            previous: lang.text(Previous),
            next: lang.text(Next),
            manage_feeds: lang.text(ManageFeeds),
            add_feed: lang.text(AddFeed),
            adding: lang.text(Adding),
            remove_feed: lang.text(RemoveFeed),
            feed_url: lang.text(FeedUrl),
            feed_title: lang.text(FeedTitle),
            no_feeds: lang.text(NoFeeds),
            error: lang.text(Error),
            confirm_delete_feed: lang.text(ConfirmDeleteFeed),
            confirm: lang.text(Confirm),
            cancel: lang.text(Cancel),
        }
    }
}
