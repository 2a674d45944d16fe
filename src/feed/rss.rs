//! RSS 2.0 serialization.

use std::collections::HashSet;
use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{AppError, Result};
use crate::feed::excerpt::{ExcerptLimits, excerpt, to_html};
use crate::models::{Article, FeedConfig};

const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Channel-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
}

impl From<&FeedConfig> for Channel {
    fn from(config: &FeedConfig) -> Self {
        Self {
            title: config.title.clone(),
            link: config.link.clone(),
            description: config.description.clone(),
        }
    }
}

/// One `<item>` of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub author: String,
    /// HTML excerpt, escaped again on output
    pub description: String,
}

impl FeedItem {
    /// Derive a feed item from a fetched article.
    pub fn from_article(article: &Article, limits: ExcerptLimits) -> Self {
        let paragraphs = excerpt(&article.body_html, &article.summary, limits);
        let guid = if article.url.is_empty() {
            article.id.clone()
        } else {
            article.url.clone()
        };

        Self {
            title: article.title.clone(),
            link: article.url.clone(),
            guid,
            pub_date: article.published_at,
            author: article.author.clone(),
            description: to_html(&paragraphs),
        }
    }
}

/// Convert articles to feed items, keeping order and the first of any guid.
pub fn items_from_articles(articles: &[Article], limits: ExcerptLimits) -> Vec<FeedItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(articles.len());
    for article in articles {
        let item = FeedItem::from_article(article, limits);
        if seen.insert(item.guid.clone()) {
            items.push(item);
        } else {
            log::debug!("Dropping duplicate feed item {}", item.guid);
        }
    }
    items
}

/// Serialize a channel and its items as an RSS 2.0 document.
///
/// `built_at` is the only value not derived from the input, so equal inputs
/// with an equal `built_at` give byte-identical output.
pub fn build_feed(channel: &Channel, items: &[FeedItem], built_at: DateTime<Utc>) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(AppError::feed)?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:content", CONTENT_NS));
    rss.push_attribute(("xmlns:dc", DC_NS));
    writer.write_event(Event::Start(rss)).map_err(AppError::feed)?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .map_err(AppError::feed)?;

    write_text(&mut writer, "title", &channel.title)?;
    write_text(&mut writer, "link", &channel.link)?;
    write_text(&mut writer, "description", &channel.description)?;
    write_text(&mut writer, "lastBuildDate", &built_at.to_rfc2822())?;

    for item in items {
        write_item(&mut writer, item)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .map_err(AppError::feed)?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .map_err(AppError::feed)?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(AppError::feed)
}

fn write_item(writer: &mut Writer<Cursor<Vec<u8>>>, item: &FeedItem) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("item")))
        .map_err(AppError::feed)?;

    write_text(writer, "title", &item.title)?;
    write_text(writer, "link", &item.link)?;

    let is_permalink = item.guid == item.link;
    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", if is_permalink { "true" } else { "false" }));
    writer.write_event(Event::Start(guid)).map_err(AppError::feed)?;
    writer
        .write_event(Event::Text(BytesText::new(&item.guid)))
        .map_err(AppError::feed)?;
    writer
        .write_event(Event::End(BytesEnd::new("guid")))
        .map_err(AppError::feed)?;

    if let Some(pub_date) = item.pub_date {
        write_text(writer, "pubDate", &pub_date.to_rfc2822())?;
    }
    if !item.author.trim().is_empty() {
        write_text(writer, "dc:creator", &item.author)?;
    }
    write_text(writer, "description", &item.description)?;
    write_text(writer, "content:encoded", &item.description)?;

    writer
        .write_event(Event::End(BytesEnd::new("item")))
        .map_err(AppError::feed)?;
    Ok(())
}

fn write_text(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(AppError::feed)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(AppError::feed)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(AppError::feed)?;
    Ok(())
}
