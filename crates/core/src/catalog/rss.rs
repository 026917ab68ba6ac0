//! Minimal RSS 2.0 item reader.
//!
//! Only the `<item>` fields the normalizer needs are collected. Everything
//! outside items (channel metadata, images, ...) is skipped.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::FeedError;

/// Raw fields of one `<item>`, as found in the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssItem {
    pub guid: String,
    pub title: String,
    pub link: String,
    /// `<description>`, usually HTML inside CDATA.
    pub description: String,
    /// `<content:encoded>`, used when `<description>` is empty.
    pub content: String,
    pub pub_date: String,
    /// Text of every `<category>` element.
    pub categories: Vec<String>,
    /// `url` attribute of `<enclosure>`.
    pub enclosure_url: Option<String>,
    /// `url` attribute of the first `<media:content>`.
    pub media_content_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Guid,
    Title,
    Link,
    Description,
    Content,
    PubDate,
    Category,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"guid" => Some(Self::Guid),
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"description" => Some(Self::Description),
            b"content:encoded" => Some(Self::Content),
            b"pubDate" => Some(Self::PubDate),
            b"category" => Some(Self::Category),
            _ => None,
        }
    }
}

impl RssItem {
    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Guid => self.guid = value,
            Field::Title => self.title = value,
            Field::Link => self.link = value,
            Field::Description => self.description = value,
            Field::Content => self.content = value,
            Field::PubDate => self.pub_date = value,
            Field::Category => {
                if !value.is_empty() {
                    self.categories.push(value);
                }
            }
        }
    }

    fn capture_media(&mut self, element: &BytesStart<'_>) {
        match element.name().as_ref() {
            b"enclosure" if self.enclosure_url.is_none() => {
                self.enclosure_url = url_attribute(element);
            }
            b"media:content" if self.media_content_url.is_none() => {
                self.media_content_url = url_attribute(element);
            }
            _ => {}
        }
    }
}

/// Read every `<item>` of an RSS document.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the document is not well-formed.
pub fn parse_items(xml: &str) -> Result<Vec<RssItem>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<RssItem> = None;
    // The field being read and the tag that opened it. Elements nested inside
    // a field (unescaped HTML) are ignored, their text still accumulates.
    let mut open: Option<(Field, Vec<u8>)> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let tag = element.name().as_ref().to_vec();
                if tag == b"item" {
                    current = Some(RssItem::default());
                    open = None;
                } else if let Some(item) = current.as_mut() {
                    if open.is_none() {
                        item.capture_media(&element);
                        if let Some(field) = Field::from_tag(&tag) {
                            open = Some((field, tag));
                            text.clear();
                        }
                    }
                }
            }
            Event::Empty(element) => {
                if let Some(item) = current.as_mut() {
                    item.capture_media(&element);
                }
            }
            Event::Text(t) => {
                if open.is_some() {
                    let value = t
                        .unescape()
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned().into());
                    push_text(&mut text, &value);
                }
            }
            Event::CData(c) => {
                if open.is_some() {
                    push_text(&mut text, &String::from_utf8_lossy(&c));
                }
            }
            Event::End(element) => {
                let tag = element.name();
                if tag.as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                    open = None;
                } else if let (Some(item), Some((field, opened))) = (current.as_mut(), &open) {
                    if opened.as_slice() == tag.as_ref() {
                        item.set(*field, text.trim().to_string());
                        open = None;
                        text.clear();
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

fn push_text(buffer: &mut String, value: &str) {
    if !buffer.is_empty() {
        buffer.push(' ');
    }
    buffer.push_str(value);
}

fn url_attribute(element: &BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"url")
        .map(|attr| {
            attr.unescape_value()
                .unwrap_or_else(|_| Cow::Owned(String::from_utf8_lossy(&attr.value).into_owned()))
                .trim()
                .to_string()
        })
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Galeri Tenun</title>
    <link>https://example.id</link>
    <item>
      <guid>https://example.id/p/1</guid>
      <title><![CDATA[Kain Songket Palembang]]></title>
      <link>https://example.id/p/1</link>
      <description><![CDATA[<p>Songket <b>benang emas</b></p>]]></description>
      <pubDate>Tue, 10 Jun 2025 08:00:00 +0700</pubDate>
      <category>Sumatra</category>
      <enclosure url="https://cdn.example.id/1.jpg" type="image/jpeg" length="0"/>
    </item>
    <item>
      <title>Selendang &amp; Syal</title>
      <media:content url="https://cdn.example.id/2.jpg" medium="image">
        <media:title>ignored</media:title>
      </media:content>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_items_reads_fields() {
        let items = parse_items(FEED).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.guid, "https://example.id/p/1");
        assert_eq!(first.title, "Kain Songket Palembang");
        assert_eq!(first.description, "<p>Songket <b>benang emas</b></p>");
        assert_eq!(first.pub_date, "Tue, 10 Jun 2025 08:00:00 +0700");
        assert_eq!(first.categories, vec!["Sumatra"]);
        assert_eq!(first.enclosure_url.as_deref(), Some("https://cdn.example.id/1.jpg"));
        assert_eq!(first.media_content_url, None);
    }

    #[test]
    fn test_parse_items_sparse_item() {
        let items = parse_items(FEED).unwrap();
        let second = &items[1];

        assert_eq!(second.title, "Selendang & Syal");
        assert!(second.guid.is_empty());
        assert!(second.link.is_empty());
        assert_eq!(second.media_content_url.as_deref(), Some("https://cdn.example.id/2.jpg"));
    }

    #[test]
    fn test_channel_title_is_not_an_item_field() {
        let items = parse_items(FEED).unwrap();
        assert!(items.iter().all(|item| item.title != "Galeri Tenun"));
    }

    #[test]
    fn test_parse_items_mismatched_tags_is_error() {
        let result = parse_items("<rss><channel><item><title>x</link></item></channel></rss>");
        assert!(matches!(result, Err(FeedError::Xml(_))));
    }

    #[test]
    fn test_parse_items_empty_feed() {
        let items = parse_items("<rss><channel></channel></rss>").unwrap();
        assert!(items.is_empty());
    }
}
