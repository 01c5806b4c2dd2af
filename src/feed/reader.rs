//! Event-driven reader for RSS documents with Newznab extensions
//!
//! Produces a loosely-typed [`Document`]: everything is kept as text so the
//! feed and comment decoders can apply their own strictness rules.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Enclosure, ErrorEnvelope, RawAttr, RawChannel};
use crate::error::{NewznabError, Result};

#[derive(Debug, Default)]
pub(crate) struct Document {
    pub root: String,
    pub error: Option<ErrorEnvelope>,
    pub has_channel: bool,
    pub channel: RawChannel,
    pub items: Vec<ItemFields>,
}

/// One `<item>` with every child still in textual form
#[derive(Debug, Default)]
pub(crate) struct ItemFields {
    pub title: String,
    pub description: String,
    pub link: String,
    pub guid: String,
    pub comments: String,
    pub size: String,
    pub pub_date: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub attributes: Vec<RawAttr>,
}

pub(crate) fn read_document(body: &[u8]) -> Result<Document> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut doc = Document::default();
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<ItemFields> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = local_name(e);
                doc.open(&path, &name, e, &mut current)?;
                path.push(name);
            }
            Event::Empty(ref e) => {
                let name = local_name(e);
                doc.open(&path, &name, e, &mut current)?;
                doc.close(&name, &mut current);
            }
            Event::End(_) => {
                if let Some(name) = path.pop() {
                    doc.close(&name, &mut current);
                }
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| NewznabError::malformed(format!("bad text content: {}", err)))?;
                doc.text(&path, &text, &mut current);
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e);
                doc.text(&path, &text, &mut current);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = path.last() {
        return Err(NewznabError::malformed(format!(
            "document ended inside <{}>",
            open
        )));
    }
    if doc.root.is_empty() {
        return Err(NewznabError::malformed("no root element"));
    }

    Ok(doc)
}

impl Document {
    fn open(
        &mut self,
        path: &[String],
        name: &str,
        e: &BytesStart<'_>,
        current: &mut Option<ItemFields>,
    ) -> Result<()> {
        let parent = path.last().map(String::as_str);

        match (parent, name) {
            (None, _) => {
                if !self.root.is_empty() {
                    return Err(NewznabError::malformed("multiple root elements"));
                }
                self.root = name.to_string();
                self.error = super::read_error_envelope(e)?;
            }
            (Some(_), "channel") if path.len() == 1 => self.has_channel = true,
            (Some("channel"), "item") => *current = Some(ItemFields::default()),
            (Some("channel"), "response") => {
                self.channel.offset = attr(e, "offset").and_then(|v| v.trim().parse().ok());
                self.channel.total = attr(e, "total").and_then(|v| v.trim().parse().ok());
            }
            (Some("item"), "attr") => {
                if let Some(item) = current.as_mut() {
                    item.attributes.push(RawAttr {
                        name: attr(e, "name").unwrap_or_default(),
                        value: attr(e, "value").unwrap_or_default(),
                    });
                }
            }
            (Some("item"), "enclosure") => {
                if let Some(item) = current.as_mut() {
                    item.enclosure = Some(Enclosure {
                        url: attr(e, "url").unwrap_or_default(),
                        length: attr(e, "length")
                            .and_then(|v| v.trim().parse().ok())
                            .unwrap_or(0),
                        mime_type: attr(e, "type").unwrap_or_default(),
                    });
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn close(&mut self, name: &str, current: &mut Option<ItemFields>) {
        if name == "item" {
            if let Some(item) = current.take() {
                self.items.push(item);
            }
        }
    }

    fn text(&mut self, path: &[String], text: &str, current: &mut Option<ItemFields>) {
        let [.., parent, element] = path else {
            return;
        };

        match (parent.as_str(), current.as_mut()) {
            ("item", Some(item)) => {
                let field = match element.as_str() {
                    "title" => &mut item.title,
                    "description" => &mut item.description,
                    "link" => &mut item.link,
                    "guid" => &mut item.guid,
                    "comments" => &mut item.comments,
                    "size" => &mut item.size,
                    "pubDate" => item.pub_date.get_or_insert_with(String::new),
                    _ => return,
                };
                field.push_str(text);
            }
            ("channel", _) => {
                let field = match element.as_str() {
                    "title" => &mut self.channel.title,
                    "description" => &mut self.channel.description,
                    "link" => &mut self.channel.link,
                    _ => return,
                };
                field.push_str(text);
            }
            _ => {}
        }
    }
}

pub(crate) fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

/// Unescaped value of the attribute whose local name is `key`
pub(crate) fn attr(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key.as_bytes())
        .map(|a| match a.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&a.value).to_string(),
        })
}
