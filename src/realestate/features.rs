//! Bed, bath and car counts.
//!
//! Each count sits in a `dl` as an icon `dt` (`rui-icon-bed`, ...) followed
//! by a `dd` holding the number. Markup changes on the site only need to
//! be reflected here.

use super::child_elements;
use scraper::ElementRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Bed,
    Bath,
    Car,
}

impl Feature {
    pub fn icon_class(self) -> &'static str {
        match self {
            Feature::Bed => "rui-icon-bed",
            Feature::Bath => "rui-icon-bath",
            Feature::Car => "rui-icon-car",
        }
    }

    /// The number next to this feature's icon, 0 when missing or not a number.
    pub fn count(self, block: ElementRef<'_>) -> u32 {
        child_elements(block, "dl", "")
            .flat_map(|dl| child_elements(dl, "dt", self.icon_class()))
            .next()
            .and_then(|dt| {
                dt.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|el| el.value().name() == "dd")
            })
            .and_then(|dd| dd.text().collect::<String>().trim().parse().ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn counts(html: &str) -> (u32, u32, u32) {
        let doc = Html::parse_fragment(&format!(r#"<div class="listingInfo">{}</div>"#, html));
        let selector = Selector::parse("div.listingInfo").unwrap();
        let block = doc.select(&selector).next().unwrap();
        (
            Feature::Bed.count(block),
            Feature::Bath.count(block),
            Feature::Car.count(block),
        )
    }

    #[test]
    fn test_counts() {
        let html = r#"<dl>
            <dt class="rui-icon rui-icon-bed">Bedrooms</dt><dd>4</dd>
            <dt class="rui-icon rui-icon-bath">Bathrooms</dt><dd> 2 </dd>
            <dt class="rui-icon rui-icon-car">Car spaces</dt><dd>1</dd>
        </dl>"#;
        assert_eq!(counts(html), (4, 2, 1));
    }

    #[test]
    fn test_missing_or_garbage() {
        let html = r#"<dl>
            <dt class="rui-icon rui-icon-bath">Bathrooms</dt><dd>two</dd>
            <dt class="rui-icon rui-icon-car">Car spaces</dt>
        </dl>"#;
        assert_eq!(counts(html), (0, 0, 0));
        assert_eq!(counts("<p>No features</p>"), (0, 0, 0));
    }

    #[test]
    fn test_first_following_dd() {
        let html = r#"<dl>
            <dt class="rui-icon-car">Cars</dt><span>ignored</span><dd>3</dd><dd>9</dd>
        </dl>"#;
        assert_eq!(counts(html).2, 3);
    }

    #[test]
    fn test_nested_dl_ignored() {
        let html = r#"<div><dl><dt class="rui-icon-bed"></dt><dd>5</dd></dl></div>"#;
        assert_eq!(counts(html), (0, 0, 0));
    }
}
