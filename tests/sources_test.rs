use chrono::{Duration, SecondsFormat, Utc};
use mockito::Matcher;
use news_chat_compare::news::sources::{
    BraveSearchSource, FeedSource, GuardianSource, HackerNewsSource, HtmlSearchSource, NewsApiSource,
    NewsSourceAdapter, WikipediaSource, EMPTY_SNIPPET,
};
use news_chat_compare::news::{Query, RecencyPolicy, RecencyWindow, SearchFocus};
use news_chat_compare::topic::NEWS_API_TECH_TERMS;

const NEWS_KEY: &str = "0123456789abcdef0123456789abcdef";

fn window() -> RecencyWindow {
    RecencyWindow::ending_at(Utc::now(), 2)
}

fn hours_ago_rfc3339(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn path(prefix: &str) -> Matcher {
    Matcher::Regex(format!("^{}", prefix))
}

#[tokio::test]
async fn newsapi_sends_key_and_maps_articles() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", path("/v2/everything"))
        .match_header("x-api-key", NEWS_KEY)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), format!("Nvidia earnings {}", NEWS_API_TECH_TERMS)),
            Matcher::UrlEncoded("sortBy".into(), "publishedAt".into()),
            Matcher::UrlEncoded("language".into(), "en".into()),
            Matcher::UrlEncoded("pageSize".into(), "5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "status": "ok",
                "totalResults": 3,
                "articles": [
                    {"title": "Nvidia tops forecasts", "url": "https://a.example/1", "description": "Data center sales soared.", "content": null},
                    {"title": "[Removed]", "url": "https://removed.com", "description": "[Removed]"},
                    {"title": "Chip stocks climb", "url": "https://a.example/2", "description": "", "content": "<p>Semis rallied</p> [+1200 chars]"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let source = NewsApiSource::new(NEWS_KEY.into(), format!("{}/v2/everything", server.url()));
    let items = source.fetch(&Query::new("Nvidia earnings", SearchFocus::Tech), &window()).await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title(), "Nvidia tops forecasts");
    assert_eq!(items[0].snippet(), "Data center sales soared.");
    assert_eq!(items[1].snippet(), "Semis rallied [+1200 chars]");
    mock.assert_async().await;
}

#[tokio::test]
async fn error_status_collapses_to_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", path("/v2/everything"))
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(r#"{"status":"error","code":"rateLimited"}"#)
        .create_async()
        .await;

    let source = NewsApiSource::new(NEWS_KEY.into(), format!("{}/v2/everything", server.url()));
    let query = Query::new("AI", SearchFocus::General);

    assert!(source.search(&query, &window()).await.is_err());
    assert!(source.fetch(&query, &window()).await.is_empty());
}

#[tokio::test]
async fn malformed_body_collapses_to_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", path("/search"))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let source = GuardianSource::new("test".into(), server.url());
    assert!(source.fetch(&Query::new("AI", SearchFocus::Tech), &window()).await.is_empty());
}

#[tokio::test]
async fn unreachable_host_collapses_to_empty() {
    // Nothing listens on port 9 locally.
    let source = HackerNewsSource::new("http://127.0.0.1:9".into());
    assert!(source.fetch(&Query::new("OpenAI", SearchFocus::Tech), &window()).await.is_empty());
}

#[tokio::test]
async fn guardian_drops_articles_outside_window() {
    let mut server = mockito::Server::new_async().await;
    let body = format!(
        r#"{{"response": {{"status": "ok", "results": [
            {{"webTitle": "Fresh AI story", "webUrl": "https://g.example/fresh", "webPublicationDate": "{}",
              "fields": {{"trailText": "<strong>New</strong> model released", "bodyText": "long body"}}}},
            {{"webTitle": "Old AI story", "webUrl": "https://g.example/old", "webPublicationDate": "{}",
              "fields": {{"trailText": "old news"}}}},
            {{"webTitle": "No fields", "webUrl": "https://g.example/bare", "webPublicationDate": "{}"}}
        ]}}}}"#,
        hours_ago_rfc3339(3),
        hours_ago_rfc3339(24 * 5),
        hours_ago_rfc3339(1),
    );
    let mock = server
        .mock("GET", path("/search"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api-key".into(), "test".into()),
            Matcher::UrlEncoded("section".into(), "technology".into()),
            Matcher::UrlEncoded("order-by".into(), "newest".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let source = GuardianSource::new("test".into(), server.url());
    let items = source.fetch(&Query::new("new model", SearchFocus::Tech), &window()).await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title(), "Fresh AI story");
    assert_eq!(items[0].snippet(), "New model released");
    assert_eq!(items[1].snippet(), EMPTY_SNIPPET);
    mock.assert_async().await;
}

#[tokio::test]
async fn newsapi_general_focus_searches_a_year_by_relevance() {
    let mut server = mockito::Server::new_async().await;
    let query = Query::new("pizza dough hydration", SearchFocus::General);
    let window = RecencyPolicy::default().window_for(&query);
    let mock = server
        .mock("GET", path("/v2/everything"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "pizza dough hydration".into()),
            Matcher::UrlEncoded("from".into(), window.from_date().format("%Y-%m-%d").to_string()),
            Matcher::UrlEncoded("sortBy".into(), "relevancy".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "ok", "articles": [{"title": "Hydration explained", "url": "https://a.example/h", "description": "Wetter dough, airier crust."}]}"#)
        .create_async()
        .await;

    let source = NewsApiSource::new(NEWS_KEY.into(), format!("{}/v2/everything", server.url()));
    let items = source.fetch(&query, &window).await;

    assert_eq!(window.days(), 365);
    assert_eq!(items.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn guardian_general_focus_keeps_older_relevant_articles() {
    let mut server = mockito::Server::new_async().await;
    let body = format!(
        r#"{{"response": {{"status": "ok", "results": [
            {{"webTitle": "Pizza dough guide", "webUrl": "https://g.example/pizza", "webPublicationDate": "{}",
              "fields": {{"trailText": "Flour, water, time."}}}},
            {{"webTitle": "Undated explainer", "webUrl": "https://g.example/undated"}}
        ]}}}}"#,
        hours_ago_rfc3339(24 * 30),
    );
    let mock = server
        .mock("GET", path("/search"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "best pizza dough recipe".into()),
            Matcher::UrlEncoded("order-by".into(), "relevance".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let source = GuardianSource::new("test".into(), server.url());
    // A narrow window still must not drop general results.
    let items = source
        .fetch(&Query::new("best pizza dough recipe", SearchFocus::General), &window())
        .await;

    let titles: Vec<&str> = items.iter().map(|i| i.title()).collect();
    assert_eq!(titles, vec!["Pizza dough guide", "Undated explainer"]);
    assert_eq!(items[0].snippet(), "Flour, water, time.");
    mock.assert_async().await;
}

#[tokio::test]
async fn hackernews_uses_keywords_and_links_discussions() {
    let mut server = mockito::Server::new_async().await;
    let fresh = (Utc::now() - Duration::hours(2)).timestamp();
    let stale = (Utc::now() - Duration::days(4)).timestamp();
    let body = format!(
        r#"{{"hits": [
            {{"title": "Show HN: tiny LLM", "url": null, "story_text": "<p>I built it</p>", "created_at_i": {fresh}, "objectID": "42", "points": 10, "num_comments": 3}},
            {{"title": "Nvidia driver update", "url": "https://nv.example/driver", "story_text": null, "created_at_i": {fresh}, "objectID": "43", "points": 7, "num_comments": 1}},
            {{"title": "Ancient thread", "url": "https://old.example", "created_at_i": {stale}, "objectID": "1"}}
        ]}}"#
    );
    let mock = server
        .mock("GET", path("/search_by_date"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "happened Nvidia".into()),
            Matcher::UrlEncoded("tags".into(), "story".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let source = HackerNewsSource::new(server.url());
    let items = source
        .fetch(&Query::new("What happened with Nvidia today?", SearchFocus::Tech), &window())
        .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].url(), "https://news.ycombinator.com/item?id=42");
    assert_eq!(items[0].snippet(), "I built it");
    assert_eq!(items[1].snippet(), "7 points and 1 comments on Hacker News");
    mock.assert_async().await;
}

#[tokio::test]
async fn brave_sends_token_and_freshness() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", path("/res/v1/news/search"))
        .match_header("x-subscription-token", "brave-token-0123456789abcdef")
        .match_query(Matcher::UrlEncoded("freshness".into(), "pw".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"type": "news", "results": [
                {{"title": "AI <strong>chips</strong> shortage", "url": "https://b.example/1", "description": "Supply is tight.", "page_age": "{}"}},
                {{"title": "Chip glut ends", "url": "https://b.example/2", "description": "Six days old.", "page_age": "{}"}},
                {{"title": "Undated chip note", "url": "https://b.example/3"}}
            ]}}"#,
            (Utc::now() - Duration::hours(6)).format("%Y-%m-%dT%H:%M:%S"),
            (Utc::now() - Duration::days(6)).format("%Y-%m-%dT%H:%M:%S"),
        ))
        .create_async()
        .await;

    let source = BraveSearchSource::new("brave-token-0123456789abcdef".into(), server.url());
    let items = source.fetch(&Query::new("AI chips", SearchFocus::General), &window()).await;

    let titles: Vec<&str> = items.iter().map(|i| i.title()).collect();
    assert_eq!(titles, vec!["AI chips shortage", "Undated chip note"]);
    assert_eq!(items[1].snippet(), EMPTY_SNIPPET);
    mock.assert_async().await;
}

#[tokio::test]
async fn wikipedia_summary_respects_edit_time() {
    let mut server = mockito::Server::new_async().await;
    let fresh = format!(
        r#"{{"title": "Portal:Current events", "extract": "Ongoing events  around the world.", "timestamp": "{}",
            "content_urls": {{"desktop": {{"page": "https://en.wikipedia.org/wiki/Portal:Current_events"}}}}}}"#,
        hours_ago_rfc3339(1)
    );
    server
        .mock("GET", "/page/summary/Portal:Current_events")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(fresh)
        .create_async()
        .await;
    let stale = format!(r#"{{"title": "Old page", "extract": "Stale.", "timestamp": "{}"}}"#, hours_ago_rfc3339(24 * 30));
    server
        .mock("GET", "/page/summary/Old_page")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(stale)
        .create_async()
        .await;

    let query = Query::new("anything", SearchFocus::General);

    let items = WikipediaSource::new(server.url(), "Portal:Current_events".into())
        .fetch(&query, &window())
        .await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "Wikipedia: Portal:Current events");
    assert_eq!(items[0].snippet(), "Ongoing events around the world.");
    assert_eq!(items[0].url(), "https://en.wikipedia.org/wiki/Portal:Current_events");

    let items = WikipediaSource::new(server.url(), "Old page".into()).fetch(&query, &window()).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn feed_keeps_recent_and_undated_entries() {
    let mut server = mockito::Server::new_async().await;
    let fresh = (Utc::now() - Duration::hours(5)).to_rfc2822();
    let stale = (Utc::now() - Duration::days(10)).to_rfc2822();
    let body = format!(
        r#"<?xml version="1.0"?><rss><channel><title>"openai" - Google News</title>
<item><title>OpenAI launches agent</title><link>https://f.example/1</link><pubDate>{fresh}</pubDate><description>&lt;a href="x"&gt;OpenAI launches agent&lt;/a&gt;</description></item>
<item><title>Old OpenAI memo</title><link>https://f.example/2</link><pubDate>{stale}</pubDate></item>
<item><title>Undated OpenAI note</title><link>https://f.example/3</link></item>
</channel></rss>"#
    );
    let mock = server
        .mock("GET", path("/rss/search"))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "openai agent when:2d".into()),
            Matcher::UrlEncoded("hl".into(), "en-US".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/rss+xml")
        .with_body(body)
        .create_async()
        .await;

    let source = FeedSource::new(server.url());
    let items = source.fetch(&Query::new("openai agent", SearchFocus::Tech), &window()).await;

    let titles: Vec<&str> = items.iter().map(|i| i.title()).collect();
    assert_eq!(titles, vec!["OpenAI launches agent", "Undated OpenAI note"]);
    assert_eq!(items[0].snippet(), "OpenAI launches agent");
    mock.assert_async().await;
}

#[tokio::test]
async fn html_search_reads_result_blocks() {
    let mut server = mockito::Server::new_async().await;
    let page = r#"<html><body>
<div class="result"><a class="result__a" href="https://h.example/1">Anthropic raises funding</a>
<a class="result__snippet">The round values the company at a new high.</a></div>
</body></html>"#;
    let mock = server
        .mock("GET", path("/html/"))
        .match_query(Matcher::UrlEncoded("q".into(), "Anthropic funding news".into()))
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(page)
        .create_async()
        .await;

    let source = HtmlSearchSource::new(server.url());
    let items = source.fetch(&Query::new("Anthropic funding", SearchFocus::General), &window()).await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].url(), "https://h.example/1");
    assert_eq!(items[0].snippet(), "The round values the company at a new high.");
    mock.assert_async().await;
}
