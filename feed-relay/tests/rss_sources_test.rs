mod common;

use chrono::{TimeZone, Utc};
use common::init_tracing;
use feed_relay::{
    rss_utils::{time, url},
    DeliveryPayload, DeviantArtSource, FeedParser, FeedSource, FeedSpec, FetchConfig, Fetcher, PacingConfig,
    PinterestBoardSource, RelayConfig, RelayError, RssFeedSource,
};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOARD_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>art</title>
    <link>https://www.pinterest.com/someone/art/</link>
    <description>A board</description>
    <item>
      <title>One</title>
      <link>https://www.pinterest.com/pin/111/</link>
      <description>&lt;a href="https://www.pinterest.com/pin/111/"&gt;&lt;img src="https://i.pinimg.com/236x/aa/bb/one.jpg"&gt;&lt;/a&gt;Nice</description>
      <pubDate>Mon, 05 Oct 2026 10:00:00 GMT</pubDate>
      <guid>https://www.pinterest.com/pin/111/</guid>
    </item>
    <item>
      <title>Two</title>
      <link>https://www.pinterest.com/pin/222/</link>
      <description>no picture here</description>
      <pubDate>Sun, 04 Oct 2026 10:00:00 GMT</pubDate>
      <guid>https://www.pinterest.com/pin/222/</guid>
    </item>
    <item>
      <title>Three</title>
      <link>https://www.pinterest.com/pin/333/</link>
      <description>&lt;img src="https://i.pinimg.com/236x/cc/dd/three.jpg"&gt;</description>
      <guid>https://www.pinterest.com/pin/333/</guid>
    </item>
  </channel>
</rss>"#;

const MEDIA_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>gallery</title>
    <link>https://example.com/</link>
    <description>Gallery</description>
    <item>
      <title>Piece</title>
      <link>https://example.com/artist/art/piece-1</link>
      <pubDate>Fri, 16 Oct 2026 08:00:00 GMT</pubDate>
      <media:thumbnail url="https://images.example.com/236x/piece-1.jpg" height="150" width="150"/>
    </item>
  </channel>
</rss>"#;

const MEDIA_CONTENT_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>photos</title>
    <link>https://example.com/</link>
    <description>Photos</description>
    <item>
      <title>Shot</title>
      <link>https://example.com/artist/shot-1</link>
      <pubDate>Thu, 15 Oct 2026 08:00:00 GMT</pubDate>
      <media:content url="https://cdn.example.com/full/shot-1" type="image/jpeg" medium="image"/>
    </item>
  </channel>
</rss>"#;

const ENCODED_CONTENT_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>blog</title>
    <link>https://example.com/</link>
    <description>Blog</description>
    <item>
      <title>Post</title>
      <link>https://example.com/artist/post-1</link>
      <description>Text only</description>
      <content:encoded><![CDATA[<p>New piece</p><img alt="x" src="https://i.example.com/236x/post-1.png?a=1&amp;b=2">]]></content:encoded>
      <pubDate>Wed, 14 Oct 2026 08:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

#[tokio::test]
async fn test_rss_feed_source_pulls_board() {
    init_tracing();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/someone/art.rss"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BOARD_RSS))
        .mount(&server)
        .await;

    let fetcher = Arc::new(Fetcher::new(FetchConfig::default()).unwrap());
    let source = RssFeedSource::new(format!("{}/someone/art.rss", server.uri()), fetcher);

    let items = source.pull().await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].link, "https://www.pinterest.com/pin/111/");
    assert_eq!(items[0].image_url.as_deref(), Some("https://i.pinimg.com/236x/aa/bb/one.jpg"));
    assert_eq!(items[0].published_at, Some(Utc.with_ymd_and_hms(2026, 10, 5, 10, 0, 0).unwrap()));

    assert!(items[1].image_url.is_none());
    assert!(!items[1].is_usable());

    assert!(items[2].published_at.is_none());
    assert_eq!(items[2].image_url.as_deref(), Some("https://i.pinimg.com/236x/cc/dd/three.jpg"));
}

#[tokio::test]
async fn test_rss_feed_source_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = Arc::new(Fetcher::new(FetchConfig::default()).unwrap());
    let source = RssFeedSource::new(format!("{}/broken.rss", server.uri()), fetcher);

    assert!(source.pull().await.is_err());
}

#[tokio::test]
async fn test_rss_feed_source_rejects_non_feed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>login</body></html>"))
        .mount(&server)
        .await;

    let fetcher = Arc::new(Fetcher::new(FetchConfig::default()).unwrap());
    let source = RssFeedSource::new(server.uri(), fetcher);

    assert!(source.pull().await.is_err());
}

#[test]
fn test_parser_reads_media_thumbnail() {
    let parsed = FeedParser::new().parse_feed(MEDIA_RSS).unwrap();

    assert_eq!(parsed.title.as_deref(), Some("gallery"));
    assert_eq!(parsed.items.len(), 1);
    assert_eq!(
        parsed.items[0].image_url.as_deref(),
        Some("https://images.example.com/236x/piece-1.jpg")
    );
    assert!(parsed.items[0].is_usable());
}

#[tokio::test]
async fn test_fetcher_rejects_oversize_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(2 * 1024 * 1024)))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(FetchConfig {
        max_feed_size_mb: 1,
        ..FetchConfig::default()
    })
    .unwrap();

    let result = fetcher.fetch_feed(&server.uri()).await;
    assert!(matches!(result, Err(RelayError::FeedTooLarge { size_mb: 2 })));
}

#[test]
fn test_parser_reads_typed_media_content() {
    let parsed = FeedParser::new().parse_feed(MEDIA_CONTENT_RSS).unwrap();

    assert_eq!(parsed.items.len(), 1);
    assert_eq!(
        parsed.items[0].image_url.as_deref(),
        Some("https://cdn.example.com/full/shot-1")
    );
}

#[test]
fn test_parser_falls_back_to_content_body_image() {
    let parsed = FeedParser::new().parse_feed(ENCODED_CONTENT_RSS).unwrap();

    assert_eq!(parsed.items.len(), 1);
    assert_eq!(
        parsed.items[0].image_url.as_deref(),
        Some("https://i.example.com/236x/post-1.png?a=1&b=2")
    );
}

#[test]
fn test_preset_feed_urls() {
    assert_eq!(
        PinterestBoardSource::feed_url("tholoooo", "art"),
        "https://www.pinterest.com/tholoooo/art.rss"
    );
    assert_eq!(
        DeviantArtSource::feed_url("rhads"),
        "https://backend.deviantart.com/rss.xml?type=deviation&q=by%3Arhads+sort%3Atime+meta%3Aall"
    );

    let fetcher = Arc::new(Fetcher::new(FetchConfig::default()).unwrap());
    let board = PinterestBoardSource::new("tholoooo", "aesthetic", fetcher.clone());
    assert_eq!(board.url(), "https://www.pinterest.com/tholoooo/aesthetic.rss");
    assert_eq!(board.source_name(), "Pinterest: tholoooo/aesthetic");
    assert!(board.source_id().starts_with("pinterest_"));

    let artist = DeviantArtSource::for_artist("pypr", fetcher);
    assert_eq!(artist.source_name(), "DeviantArt: pypr");
    assert!(artist.url().contains("by%3Apypr"));
}

#[test]
fn test_feed_specs() {
    assert_eq!(
        FeedSpec::pinterest("tholoooo/art").unwrap(),
        FeedSpec::PinterestBoard {
            user: "tholoooo".to_string(),
            board: "art".to_string()
        }
    );
    assert!(FeedSpec::pinterest("just-a-user").is_err());
    assert!(FeedSpec::pinterest("a/b/c").is_err());

    let fetcher = Arc::new(Fetcher::new(FetchConfig::default()).unwrap());
    let source = FeedSpec::DeviantArt("lemmino".to_string()).into_source(fetcher);
    assert_eq!(source.source_name(), "DeviantArt: lemmino");
}

#[test]
fn test_config_validation() {
    let feeds = vec![FeedSpec::pinterest("tholoooo/art").unwrap()];
    assert!(RelayConfig::new(feeds.clone(), -1002283087300).validate().is_ok());

    assert!(RelayConfig::new(Vec::new(), 1).validate().is_err());
    assert!(RelayConfig::new(vec![FeedSpec::Rss("ftp://example.com/feed".to_string())], 1)
        .validate()
        .is_err());

    let mut config = RelayConfig::new(feeds, 1);
    config.pacing = PacingConfig::new(30, 5);
    assert!(config.validate().is_err());
}

#[test]
fn test_pacing_stays_in_range() {
    let pacing = PacingConfig::default();
    for _ in 0..500 {
        let pause = pacing.next_pause().as_secs();
        assert!((5..30).contains(&pause));
    }
    assert_eq!(PacingConfig::new(7, 7).next_pause().as_secs(), 7);
}

#[test]
fn test_caption_format() {
    let payload = DeliveryPayload::for_item("https://www.pinterest.com/pin/111/", "https://i.pinimg.com/originals/a.jpg");
    assert_eq!(payload.caption, "[src](https://www.pinterest.com/pin/111/)");
    assert_eq!(payload.image_url, "https://i.pinimg.com/originals/a.jpg");

    let payload = DeliveryPayload::for_item("https://en.wikipedia.org/wiki/Foo_(bar)", "x");
    assert_eq!(payload.caption, "[src](https://en.wikipedia.org/wiki/Foo_(bar\\))");
}

#[test]
fn test_url_utilities() {
    assert!(url::is_valid_rss_url("https://example.com/feed.xml"));
    assert!(url::is_valid_rss_url("http://example.com/rss"));
    assert!(!url::is_valid_rss_url("ftp://example.com/feed"));
    assert!(!url::is_valid_rss_url("invalid-url"));

    assert_eq!(url::extract_domain("https://www.pinterest.com/feed"), Some("www.pinterest.com".to_string()));
    assert_eq!(url::extract_domain("invalid-url"), None);

    assert_eq!(
        url::author_from_link("https://www.deviantart.com/rhads/art/some-piece-123"),
        Some("rhads".to_string())
    );
    assert_eq!(url::author_from_link("https://www.deviantart.com/rhads"), None);
    assert_eq!(url::author_from_link("not a link"), None);
}

#[test]
fn test_format_duration() {
    use std::time::Duration;

    assert_eq!(time::format_duration(Duration::from_secs(17)), "17s");
    assert_eq!(time::format_duration(Duration::from_secs(600)), "10m");
    assert_eq!(time::format_duration(Duration::from_secs(7200)), "2h");
    assert_eq!(time::format_duration(Duration::from_secs(3 * 86400)), "3d");
}
