mod crawler;
pub mod features;

pub use crawler::RealestateCrawler;

use crate::writer::CsvRecord;
use scraper::ElementRef;
use serde::Serialize;

/// Summary of one listing as shown on a search results page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    pub bed: u32,
    pub bath: u32,
    pub car: u32,
    pub price: String,
    pub address: String,
    pub url: String,
}

impl CsvRecord for ListingRecord {
    const HEADER: &'static [&'static str] = &["bed", "bath", "car", "price", "address", "url"];
}

/// Direct children of `parent` named `name` whose class contains `class`.
pub(crate) fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'a str,
    class: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| {
            el.value().name() == name
                && el.value().attr("class").map_or(class.is_empty(), |c| c.contains(class))
        })
}
