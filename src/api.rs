//! Stack Exchange search client. One query, one GET, one decoded batch of
//! [`QuestionRow`]s — no retries, no caching.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use serde::Deserialize;

use crate::types::QuestionRow;

const SEARCH_URL: &str = "https://api.stackexchange.com/2.3/search";
const SITE: &str = "stackoverflow";

/// Shared HTTP client. The API always gzips responses, so the gzip feature
/// must stay enabled on reqwest.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(20))
        .user_agent(concat!("stackoverflow-searcher/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| anyhow!("failed to build http client: {e}"))
}

/// Run a title search and map the response to view-model rows.
/// `visited_ids` seeds each row's tri-state visited flag at construction.
pub async fn search(
    client: &reqwest::Client,
    query: &str,
    visited_ids: &HashSet<i64>,
) -> Result<Vec<QuestionRow>> {
    let resp = client
        .get(SEARCH_URL)
        .query(&[
            ("order", "desc"),
            ("sort", "activity"),
            ("intitle", query),
            ("site", SITE),
        ])
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("search request failed ({status}): {body}"));
    }

    let parsed: SearchResponse = resp.json().await?;
    tracing::debug!(
        items = parsed.items.len(),
        quota_remaining = parsed.quota_remaining,
        "search response decoded"
    );
    Ok(rows_from(parsed, visited_ids))
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<QuestionDto>,
    #[serde(default)]
    quota_remaining: Option<i64>,
}

/// Wire shape of one question. Every field may be missing; `creation_date`
/// is epoch seconds.
#[derive(Deserialize)]
struct QuestionDto {
    question_id: Option<i64>,
    title: Option<String>,
    tags: Option<Vec<String>>,
    score: Option<i64>,
    answer_count: Option<i64>,
    view_count: Option<i64>,
    is_answered: Option<bool>,
    creation_date: Option<i64>,
    link: Option<String>,
    owner: Option<OwnerDto>,
}

#[derive(Deserialize, Default)]
struct OwnerDto {
    display_name: Option<String>,
    profile_image: Option<String>,
}

fn rows_from(resp: SearchResponse, visited_ids: &HashSet<i64>) -> Vec<QuestionRow> {
    resp.items
        .into_iter()
        .map(|item| {
            let owner = item.owner.unwrap_or_default();
            QuestionRow::new()
                .visited(item.question_id.map(|id| visited_ids.contains(&id)))
                .question_id(item.question_id)
                .title(item.title.unwrap_or_default())
                .tags(item.tags)
                .votes(item.score)
                .answers(item.answer_count)
                .views(item.view_count)
                .answered(item.is_answered)
                .creation_date(
                    item.creation_date
                        .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
                )
                .link(item.link.unwrap_or_default())
                .owner_profile_image_url(owner.profile_image.unwrap_or_default())
                .owner_display_name(owner.display_name.unwrap_or_default())
        })
        .collect()
}
