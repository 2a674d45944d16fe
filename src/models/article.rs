//! Article data structures, as listed and fetched from the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A top-list entry. Metadata only, no body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub url: String,

    /// Short description shown in the listing (may be empty)
    pub description: String,

    pub published_at: Option<DateTime<Utc>>,

    /// Author display name (may be empty)
    pub author: String,
}

/// A fully fetched article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub author: String,

    /// Listing description, used when the body yields no paragraphs
    pub summary: String,

    /// Raw body as returned by the provider
    pub body_html: String,
}

impl Article {
    /// Merge a detail payload into its listing entry.
    ///
    /// Detail fields win; the listing fills in whatever the detail omits.
    pub fn from_detail(summary: &ArticleSummary, detail: ApiArticle) -> Self {
        let published_at = detail
            .published_at
            .or(detail.created_at)
            .or(summary.published_at);
        let author = detail
            .user
            .and_then(|u| u.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| summary.author.clone());

        Self {
            id: summary.id.clone(),
            title: non_empty(detail.title).unwrap_or_else(|| summary.title.clone()),
            url: non_empty(detail.url).unwrap_or_else(|| summary.url.clone()),
            published_at,
            author,
            summary: summary.description.clone(),
            body_html: detail.body_html.unwrap_or_default(),
        }
    }
}

/// Provider payload shared by the list and detail endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiArticle {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ApiArticle> for ArticleSummary {
    fn from(api: ApiArticle) -> Self {
        Self {
            title: non_empty(api.title).unwrap_or_else(|| "Untitled".to_string()),
            url: api.url.unwrap_or_default(),
            description: api.description.unwrap_or_default(),
            published_at: api.published_at.or(api.created_at),
            author: api.user.and_then(|u| u.name).unwrap_or_default(),
            id: api.id,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// An id as stored by DEV.to (number) or by us (string).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Accept ids as JSON numbers or strings.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Accept a sequence of ids, each a JSON number or string.
pub(crate) fn deserialize_ids<'de, D, C>(deserializer: D) -> std::result::Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: FromIterator<String>,
{
    let raw = Vec::<RawId>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids() {
        let numeric: ApiArticle = serde_json::from_str(r#"{"id": 1234}"#).unwrap();
        let text: ApiArticle = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(numeric.id, "1234");
        assert_eq!(text.id, "abc");
    }

    #[test]
    fn test_summary_from_listing() {
        let api: ApiArticle = serde_json::from_str(
            r#"{
                "id": 7,
                "title": "Ownership explained",
                "description": "A short intro",
                "url": "https://dev.to/someone/ownership",
                "published_at": "2026-09-01T10:00:00Z",
                "user": {"name": "Sam"}
            }"#,
        )
        .unwrap();

        let summary = ArticleSummary::from(api);
        assert_eq!(summary.id, "7");
        assert_eq!(summary.author, "Sam");
        assert_eq!(summary.description, "A short intro");
        assert!(summary.published_at.is_some());
    }

    #[test]
    fn test_detail_falls_back_to_listing() {
        let summary = ArticleSummary {
            id: "7".into(),
            title: "Listing title".into(),
            url: "https://dev.to/a".into(),
            description: "desc".into(),
            published_at: None,
            author: "Sam".into(),
        };
        let detail: ApiArticle = serde_json::from_str(
            r#"{"id": 7, "title": "", "created_at": "2026-09-02T08:00:00Z", "body_html": "<p>x</p>"}"#,
        )
        .unwrap();

        let article = Article::from_detail(&summary, detail);
        assert_eq!(article.title, "Listing title");
        assert_eq!(article.url, "https://dev.to/a");
        assert_eq!(article.author, "Sam");
        assert_eq!(article.summary, "desc");
        assert_eq!(article.body_html, "<p>x</p>");
        assert_eq!(
            article.published_at.map(|d| d.to_rfc3339()),
            Some("2026-09-02T08:00:00+00:00".to_string())
        );
    }
}
