use super::{child_elements, features::Feature, ListingRecord};
use crate::{query::SearchUrls, Crawler};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref LISTING: Selector = Selector::parse(r#"div[class*="listingInfo"]"#).expect(E);
    static ref VCARD_LINK: Selector = Selector::parse("a").expect(E);
    static ref A: Selector = Selector::parse("a[href]").expect(E);
}

#[derive(Debug, Clone)]
pub struct RealestateCrawler {
    base: Url,
    /// Base host without `www.`, links on it or its subdomains are followed.
    domain: String,
    allow: Regex,
}

impl RealestateCrawler {
    pub fn new(base: Url, allow: Regex) -> Self {
        let host = base.host_str().unwrap_or_default();
        let domain = host.strip_prefix("www.").unwrap_or(host).to_string();
        RealestateCrawler {
            base,
            domain,
            allow,
        }
    }

    pub fn for_search(base: &Url, urls: &SearchUrls) -> Self {
        RealestateCrawler::new(base.clone(), urls.allow.clone())
    }

    /// Lazily yields one record per listing block in document order.
    pub fn listings<'a>(&'a self, doc: &'a Html) -> impl Iterator<Item = ListingRecord> + 'a {
        doc.select(&LISTING).map(move |block| self.parse_listing(block))
    }

    fn parse_listing(&self, block: ElementRef<'_>) -> ListingRecord {
        let price = child_elements(block, "div", "propertyStats")
            .flat_map(|stats| stats.text())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .join(",");

        let anchors = child_elements(block, "div", "vcard")
            .flat_map(|vcard| vcard.select(&VCARD_LINK))
            .collect::<Vec<_>>();
        let address = anchors
            .first()
            .map(|a| a.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        // Zero or several candidate links leave the url empty.
        let hrefs = anchors
            .iter()
            .filter_map(|a| a.value().attr("href"))
            .collect::<Vec<_>>();
        let url = match hrefs.as_slice() {
            [href] => self
                .base
                .join(href.trim())
                .map(|u| u.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };

        ListingRecord {
            bed: Feature::Bed.count(block),
            bath: Feature::Bath.count(block),
            car: Feature::Car.count(block),
            price,
            address,
            url,
        }
    }

    /// The base domain or a subdomain of it, over http or https on any port.
    fn same_site(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        match url.host_str() {
            Some(host) => {
                host == self.domain
                    || host
                        .strip_suffix(self.domain.as_str())
                        .map_or(false, |sub| sub.ends_with('.'))
            }
            None => false,
        }
    }
}

impl Crawler for RealestateCrawler {
    type Record = ListingRecord;

    fn extract_records(&self, doc: &Html) -> Vec<ListingRecord> {
        self.listings(doc).collect()
    }

    fn extract_links(&self, doc: &Html, page_url: &Url) -> Vec<String> {
        doc.select(&A)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter_map(|l| page_url.join(l).ok())
            .filter(|u| self.same_site(u))
            .map(|mut u| {
                u.set_fragment(None);
                u.to_string()
            })
            .filter(|u| self.allow.is_match(u))
            .collect()
    }
}
