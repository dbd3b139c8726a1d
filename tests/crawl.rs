use mockito::Matcher;
use pretty_assertions::assert_eq;
use realestate_crawler::{query::SearchQuery, run_search, CrawlConfig, CrawlerError};
use reqwest::Url;
use std::time::Duration;

const PAGE_1: &str = r#"<html><body>
  <div class="listingInfo">
    <div class="propertyStats"><p>$750,000</p></div>
    <div class="vcard"><a href="/property-123">12 Smith St</a></div>
    <dl>
      <dt class="rui-icon rui-icon-bed"></dt><dd>3</dd>
      <dt class="rui-icon rui-icon-bath"></dt><dd>2</dd>
      <dt class="rui-icon rui-icon-car"></dt><dd>1</dd>
    </dl>
  </div>
  <a href="/buy/in-north+sydney%2c+nsw/list-1">1</a>
  <a href="/buy/in-north+sydney%2c+nsw/list-2">2</a>
  <a href="/sold/in-north+sydney%2c+nsw/list-1">Sold</a>
</body></html>"#;

#[tokio::test]
async fn test_search_to_csv() {
    let mut server = mockito::Server::new_async().await;
    let page_1 = server
        .mock("GET", Matcher::Regex(r"^/buy/in-north\+sydney%2c\+nsw/list-1$".into()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(PAGE_1)
        .expect(1)
        .create_async()
        .await;
    let page_2 = server
        .mock("GET", Matcher::Regex(r"^/buy/in-north\+sydney%2c\+nsw/list-2$".into()))
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let sold = server
        .mock("GET", Matcher::Regex("^/sold/".into()))
        .expect(0)
        .create_async()
        .await;

    let config = CrawlConfig {
        base_url: Url::parse(&server.url()).unwrap(),
        timeout: Duration::from_secs(5),
        ..CrawlConfig::default()
    };
    let query = SearchQuery::parse("buy", "North Sydney, NSW").unwrap();
    assert_eq!(query.location(), "north+sydney%2c+nsw");

    let mut out = Vec::new();
    let summary = run_search(&query, &config, &mut out, std::future::pending())
        .await
        .unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.records, 1);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!(
            "bed,bath,car,price,address,url\n3,2,1,\"$750,000\",12 Smith St,{}/property-123\n",
            server.url()
        )
    );
    page_1.assert_async().await;
    page_2.assert_async().await;
    sold.assert_async().await;
}

#[test]
fn test_invalid_search_never_crawls() {
    assert!(matches!(
        SearchQuery::parse("lease", "Tempe"),
        Err(CrawlerError::InvalidCategory(_))
    ));
    assert!(matches!(
        SearchQuery::parse("buy", ""),
        Err(CrawlerError::InvalidQuery)
    ));
}
