use crate::CrawlerError;
use lazy_regex::regex;
use regex::Regex;
use reqwest::Url;
use std::{borrow::Borrow, fmt, str::FromStr};

pub const DEFAULT_BASE_URL: &str = "http://www.realestate.com.au";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Buy,
    Rent,
    Sold,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Buy => "buy",
            Category::Rent => "rent",
            Category::Sold => "sold",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CrawlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Category::Buy),
            "rent" => Ok(Category::Rent),
            "sold" => Ok(Category::Sold),
            other => Err(CrawlerError::InvalidCategory(other.to_string())),
        }
    }
}

/// Turns free text into the location fragment used in search urls.
///
/// Comma runs are encoded first, then whitespace runs collapse to `+`, so
/// `"North Sydney, NSW"` becomes `north+sydney%2c+nsw`.
pub fn normalize_location(text: &str) -> String {
    let text = regex!(",+").replace_all(text, "%2c");
    let text = regex!(r"\s+").replace_all(text.borrow(), "+");
    text.to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    category: Category,
    location: String,
}

impl SearchQuery {
    pub fn new(category: Category, location_text: &str) -> Result<Self, CrawlerError> {
        if location_text.trim().is_empty() {
            return Err(CrawlerError::InvalidQuery);
        }
        Ok(SearchQuery {
            category,
            location: normalize_location(location_text),
        })
    }

    /// Parses both the category and the location as typed on the command line.
    pub fn parse(category: &str, location_text: &str) -> Result<Self, CrawlerError> {
        SearchQuery::new(category.parse()?, location_text)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn urls(&self, base: &Url) -> Result<SearchUrls, CrawlerError> {
        let template = PageTemplate {
            base: base.clone(),
            prefix: format!("/{}/in-{}", self.category, self.location),
        };
        let seed = template.page("", 1)?;
        let allow = Regex::new(&format!(
            "/{}/in-{}.*/list-",
            self.category,
            regex::escape(&self.location)
        ))?;
        Ok(SearchUrls {
            seed,
            template,
            allow,
        })
    }
}

/// Search result url shape: `/{category}/in-{location}{qualifier}/list-{page}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    base: Url,
    prefix: String,
}

impl PageTemplate {
    pub fn page(&self, qualifier: &str, page: u32) -> Result<Url, CrawlerError> {
        Ok(self
            .base
            .join(&format!("{}{}/list-{}", self.prefix, qualifier, page))?)
    }
}

#[derive(Debug, Clone)]
pub struct SearchUrls {
    pub seed: Url,
    pub template: PageTemplate,
    pub allow: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub url: String,
    /// 1-based index from the `/list-N` suffix, 0 when there is none.
    pub page: u32,
}

impl PageRef {
    pub fn new<S: Into<String>>(url: S) -> Self {
        let url = url.into();
        let page = regex!(r"/list-(\d+)")
            .captures(&url)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0);
        PageRef { url, page }
    }
}
