//! `t=caps` document decoding
//!
//! ```xml
//! <caps>
//!   <server title="..."/>
//!   <limits max="100" default="50"/>
//!   <searching>
//!     <search available="yes" supportedParams="q"/>
//!     <tv-search available="yes" supportedParams="q,rid,tvdbid,season,ep"/>
//!   </searching>
//!   <categories>
//!     <category id="5000" name="TV"><subcat id="5040" name="HD"/></category>
//!   </categories>
//! </caps>
//! ```

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::reader::{attr, local_name};
use super::{ErrorEnvelope, read_error_envelope};
use crate::error::{NewznabError, Result};
use crate::types::{Capabilities, CapsCategory, SearchMode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapsResponse {
    pub error: Option<ErrorEnvelope>,
    pub capabilities: Capabilities,
}

pub fn decode_capabilities(body: &[u8]) -> Result<CapsResponse> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut response = CapsResponse::default();
    let mut root: Option<String> = None;
    let mut path: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = local_name(e);
                handle_element(&mut response, &mut root, &path, &name, e)?;
                path.push(name);
            }
            Event::Empty(ref e) => {
                let name = local_name(e);
                handle_element(&mut response, &mut root, &path, &name, e)?;
            }
            Event::End(_) => {
                path.pop();
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

    match root.as_deref() {
        Some("caps") => Ok(response),
        _ if response.error.as_ref().is_some_and(ErrorEnvelope::is_error) => Ok(response),
        Some(other) => Err(NewznabError::malformed(format!(
            "expected <caps>, found <{}>",
            other
        ))),
        None => Err(NewznabError::malformed("no root element")),
    }
}

fn handle_element(
    response: &mut CapsResponse,
    root: &mut Option<String>,
    path: &[String],
    name: &str,
    e: &BytesStart<'_>,
) -> Result<()> {
    let caps = &mut response.capabilities;

    match (path.last().map(String::as_str), name) {
        (None, _) => {
            if root.is_some() {
                return Err(NewznabError::malformed("multiple root elements"));
            }
            *root = Some(name.to_string());
            response.error = read_error_envelope(e)?;
        }
        (Some("caps"), "server") => caps.server_title = attr(e, "title"),
        (Some("caps"), "limits") => {
            caps.limits_default = attr(e, "default").and_then(|v| v.trim().parse().ok());
            caps.limits_max = attr(e, "max").and_then(|v| v.trim().parse().ok());
        }
        (Some("searching"), "search") => caps.search = search_mode(e),
        (Some("searching"), "tv-search") => caps.tv_search = search_mode(e),
        (Some("searching"), "movie-search") => caps.movie_search = search_mode(e),
        (Some("searching"), "audio-search" | "music-search") => caps.audio_search = search_mode(e),
        (Some("searching"), "book-search") => caps.book_search = search_mode(e),
        (Some("categories"), "category") => caps.categories.push(category(e)),
        (Some("category"), "subcat") => {
            if let Some(parent) = caps.categories.last_mut() {
                parent.subcategories.push(category(e));
            }
        }
        _ => {}
    }

    Ok(())
}

fn search_mode(e: &BytesStart<'_>) -> SearchMode {
    SearchMode {
        available: attr(e, "available").is_some_and(|v| v.eq_ignore_ascii_case("yes")),
        supported_params: attr(e, "supportedParams")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn category(e: &BytesStart<'_>) -> CapsCategory {
    CapsCategory {
        id: attr(e, "id").unwrap_or_default(),
        name: attr(e, "name").unwrap_or_default(),
        subcategories: Vec::new(),
    }
}
