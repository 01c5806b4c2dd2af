//! Wire format decoding
//!
//! Turns response bodies into raw, loosely-typed structures:
//!
//! - [`decode_feed`]: RSS search/listing results (`t=search`, `t=tvsearch`, `/rss`, ...)
//! - [`decode_comments`]: the `t=comments` feed
//! - [`decode_capabilities`]: the `t=caps` document
//! - [`decode_error_envelope`]: a bare `<error code=".." description=".."/>`
//!
//! Typed domain records are produced later by [`crate::normalize`].

pub mod caps;
pub mod date;
mod reader;

use chrono::{DateTime, Utc};
use quick_xml::events::BytesStart;
use serde::{Deserialize, Serialize};

use crate::error::{NewznabError, Result};

pub use caps::{CapsResponse, decode_capabilities};

/// `<error code=".." description=".."/>` carried on the root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: i32,
    pub description: String,
}

impl ErrorEnvelope {
    /// Code 0 is how some indexers say "no error"
    pub fn is_error(&self) -> bool {
        self.code != 0
    }
}

impl From<ErrorEnvelope> for NewznabError {
    fn from(envelope: ErrorEnvelope) -> Self {
        NewznabError::Indexer {
            code: envelope.code,
            description: envelope.description,
        }
    }
}

/// Channel metadata; informational only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawChannel {
    pub title: String,
    pub description: String,
    pub link: String,
    /// `newznab:response offset=".."`
    pub offset: Option<i64>,
    /// `newznab:response total=".."`
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub length: i64,
    pub mime_type: String,
}

/// One `newznab:attr` / `torznab:attr` pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttr {
    pub name: String,
    pub value: String,
}

impl RawAttr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub guid: String,
    pub comments: String,
    /// Item-level `<size>` element, 0 when absent
    pub size: i64,
    pub enclosure: Option<Enclosure>,
    pub pub_date: Option<DateTime<Utc>>,
    /// Attributes in document order
    pub attributes: Vec<RawAttr>,
}

impl RawItem {
    /// Size to use when no non-zero `size` attribute is present
    pub fn fallback_size(&self) -> i64 {
        if self.size != 0 {
            return self.size;
        }
        self.enclosure.as_ref().map(|e| e.length).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeed {
    /// Non-zero error envelope; when set, `items` is empty
    pub error: Option<ErrorEnvelope>,
    pub channel: RawChannel,
    pub items: Vec<RawItem>,
}

/// A `t=comments` entry; the date stays textual so a bad one can be skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawComment {
    pub title: String,
    pub description: String,
    pub pub_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCommentFeed {
    pub error: Option<ErrorEnvelope>,
    pub comments: Vec<RawComment>,
}

/// Decode an RSS result feed.
///
/// A present but unparseable `<pubDate>` fails the whole decode; the feed
/// format guarantees RFC 1123 there, unlike attribute dates.
pub fn decode_feed(body: &[u8]) -> Result<RawFeed> {
    let doc = reader::read_document(body)?;

    if let Some(error) = doc.error.filter(ErrorEnvelope::is_error) {
        return Ok(RawFeed {
            error: Some(error),
            channel: doc.channel,
            items: Vec::new(),
        });
    }
    if !doc.has_channel {
        return Err(NewznabError::malformed(format!(
            "expected an RSS <channel>, found <{}>",
            doc.root
        )));
    }

    let items = doc
        .items
        .into_iter()
        .map(|fields| {
            let pub_date = match fields.pub_date {
                Some(raw) => Some(date::parse_rfc1123z(&raw).map_err(|e| {
                    NewznabError::malformed(format!("invalid pubDate {:?}: {}", raw, e))
                })?),
                None => None,
            };

            Ok(RawItem {
                title: fields.title,
                description: fields.description,
                link: fields.link,
                guid: fields.guid,
                comments: fields.comments,
                size: fields.size.trim().parse().unwrap_or(0),
                enclosure: fields.enclosure,
                pub_date,
                attributes: fields.attributes,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RawFeed {
        error: None,
        channel: doc.channel,
        items,
    })
}

/// Decode a `t=comments` feed
pub fn decode_comments(body: &[u8]) -> Result<RawCommentFeed> {
    let doc = reader::read_document(body)?;

    if let Some(error) = doc.error.filter(ErrorEnvelope::is_error) {
        return Ok(RawCommentFeed {
            error: Some(error),
            comments: Vec::new(),
        });
    }
    if !doc.has_channel {
        return Err(NewznabError::malformed(format!(
            "expected an RSS <channel>, found <{}>",
            doc.root
        )));
    }

    let comments = doc
        .items
        .into_iter()
        .map(|fields| RawComment {
            title: fields.title,
            description: fields.description,
            pub_date: fields.pub_date.unwrap_or_default(),
        })
        .collect();

    Ok(RawCommentFeed {
        error: None,
        comments,
    })
}

/// Extract a non-zero error envelope from an arbitrary body, if it is one.
///
/// Used on non-success HTTP responses, where the body may or may not be XML.
pub fn decode_error_envelope(body: &[u8]) -> Option<ErrorEnvelope> {
    reader::read_document(body)
        .ok()
        .and_then(|doc| doc.error)
        .filter(ErrorEnvelope::is_error)
}

/// Read `code` / `description` from a root element
pub(crate) fn read_error_envelope(e: &BytesStart<'_>) -> Result<Option<ErrorEnvelope>> {
    let Some(code) = reader::attr(e, "code") else {
        return Ok(None);
    };
    let code = code
        .trim()
        .parse()
        .map_err(|_| NewznabError::malformed(format!("non-numeric error code {:?}", code)))?;

    Ok(Some(ErrorEnvelope {
        code,
        description: reader::attr(e, "description").unwrap_or_default(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use pretty_assertions::assert_eq;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:newznab="http://www.newznab.com/DTD/2010/feeds/attributes/">
  <channel>
    <title>indexer</title>
    <item>
      <title>Oldboy.2003.1080p.BluRay</title>
      <guid isPermaLink="true">https://indexer.example/details/0f3c</guid>
      <link>https://indexer.example/getnzb/0f3c.nzb</link>
      <comments>https://indexer.example/details/0f3c#comments</comments>
      <pubDate>Sat, 18 Jan 2025 14:30:00 +0000</pubDate>
      <size>4096</size>
      <description>Oldboy</description>
      <enclosure url="https://indexer.example/getnzb/0f3c.nzb" length="2048" type="application/x-nzb"/>
      <newznab:attr name="category" value="2000"/>
      <newznab:attr name="category" value="2040"/>
      <newznab:attr name="imdb" value="0364569"/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_decode_feed() {
        let feed = decode_feed(FEED.as_bytes()).unwrap();
        assert!(feed.error.is_none());
        assert_eq!(feed.channel.title, "indexer");
        assert_eq!(feed.items.len(), 1);

        let item = &feed.items[0];
        assert_eq!(item.title, "Oldboy.2003.1080p.BluRay");
        assert_eq!(item.guid, "https://indexer.example/details/0f3c");
        assert_eq!(item.size, 4096);
        assert_eq!(item.pub_date.map(|d| d.year()), Some(2025));
        assert_eq!(
            item.enclosure.as_ref().map(|e| e.url.as_str()),
            Some("https://indexer.example/getnzb/0f3c.nzb")
        );
        assert_eq!(
            item.attributes,
            vec![
                RawAttr::new("category", "2000"),
                RawAttr::new("category", "2040"),
                RawAttr::new("imdb", "0364569"),
            ]
        );
    }

    #[test]
    fn test_bad_pub_date_fails_decode() {
        let xml = FEED.replace("Sat, 18 Jan 2025 14:30:00 +0000", "yesterday");
        let err = decode_feed(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, NewznabError::MalformedResponse(_)));
    }

    #[test]
    fn test_pub_date_with_wrong_weekday() {
        let xml = FEED.replace("Sat, 18 Jan 2025", "Fri, 18 Jan 2025");
        let feed = decode_feed(xml.as_bytes()).unwrap();
        assert_eq!(
            feed.items[0].pub_date.map(|d| d.to_rfc3339()).as_deref(),
            Some("2025-01-18T14:30:00+00:00")
        );
    }

    #[test]
    fn test_error_envelope() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<error code="100" description="Incorrect user credentials"/>"#;
        let feed = decode_feed(xml).unwrap();
        assert_eq!(
            feed.error,
            Some(ErrorEnvelope {
                code: 100,
                description: "Incorrect user credentials".to_string(),
            })
        );
        assert!(feed.items.is_empty());
        assert_eq!(decode_error_envelope(xml).map(|e| e.code), Some(100));
    }

    #[test]
    fn test_error_code_takes_precedence_over_items() {
        let xml = br#"<rss code="201" description="Incorrect parameter"><channel>
            <item><title>x</title><pubDate>garbage</pubDate></item>
        </channel></rss>"#;
        let feed = decode_feed(xml).unwrap();
        assert_eq!(feed.error.map(|e| e.code), Some(201));
        assert!(feed.items.is_empty());
    }

    #[test]
    fn test_non_numeric_error_code_is_malformed() {
        let err = decode_feed(br#"<error code="abc" description="x"/>"#).unwrap_err();
        assert!(matches!(err, NewznabError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_channel_is_malformed() {
        let err = decode_feed(b"<html><body>maintenance</body></html>").unwrap_err();
        assert!(matches!(err, NewznabError::MalformedResponse(_)));
        assert_eq!(decode_error_envelope(b"<html/>"), None);
        assert_eq!(decode_error_envelope(b"not xml <"), None);
    }

    #[test]
    fn test_empty_channel() {
        let feed = decode_feed(b"<rss><channel><title>t</title></channel></rss>").unwrap();
        assert!(feed.items.is_empty());
    }

    #[test]
    fn test_fallback_size() {
        let mut item = RawItem {
            enclosure: Some(Enclosure {
                length: 2048,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(item.fallback_size(), 2048);

        item.size = 4096;
        assert_eq!(item.fallback_size(), 4096);

        item.enclosure = None;
        item.size = 0;
        assert_eq!(item.fallback_size(), 0);
    }

    #[test]
    fn test_decode_comments_keeps_bad_dates_as_text() {
        let xml = br#"<rss><channel>
            <item><title>great</title><description>works fine</description><pubDate>Sat, 18 Jan 2025 14:30:00 +0000</pubDate></item>
            <item><title>meh</title><description>missing par2</description><pubDate>last week</pubDate></item>
        </channel></rss>"#;
        let feed = decode_comments(xml).unwrap();
        assert!(feed.error.is_none());
        assert_eq!(feed.comments.len(), 2);
        assert_eq!(feed.comments[0].description, "works fine");
        assert_eq!(feed.comments[1].pub_date, "last week");
    }
}
