use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::USER_AGENT;
use tracing::{debug, info};

use crate::error::{ReelError, ReelResult};

pub const TRENDS_RSS_URL: &str = "https://trends.google.com/trending/rss";

static ITEM_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<item>.*?<title>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</title>")
        .expect("item title pattern is valid")
});

/// Returns the top trending search for `geo` from the Google Trends feed.
pub async fn fetch_trending_topic(
    client: &reqwest::Client,
    feed_url: &str,
    geo: &str,
) -> ReelResult<String> {
    debug!("Fetching trends feed {} (geo={})", feed_url, geo);
    let body = client
        .get(feed_url)
        .query(&[("geo", geo)])
        .header(USER_AGENT, "autoreel/0.1")
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(|e| ReelError::SourceUnavailable(e.to_string()))?
        .text()
        .await
        .map_err(|e| ReelError::SourceUnavailable(e.to_string()))?;

    let topic = first_item_title(&body)
        .ok_or_else(|| ReelError::SourceUnavailable(format!("no trending items for geo {}", geo)))?;
    info!("Trending topic → {}", topic);
    Ok(topic)
}

fn first_item_title(feed: &str) -> Option<String> {
    let raw = ITEM_TITLE.captures(feed)?.get(1)?.as_str();
    let title = unescape_xml(raw.trim());
    if title.is_empty() { None } else { Some(title) }
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
