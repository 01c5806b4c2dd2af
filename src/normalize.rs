//! Attribute normalization
//!
//! Newznab carries most of a result's data in an open-ended list of
//! `<newznab:attr name=".." value=".."/>` pairs. Each known name maps to an
//! [`AttributeRule`] describing how to convert the value and which field of
//! [`SearchRecord`] receives it. Unknown names land in
//! [`SearchRecord::unmatched_attrs`].
//!
//! Normalization never fails: a value that does not convert leaves its field
//! at the zero value and the rest of the row is kept.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::{trace, warn};

use crate::feed::RawItem;
use crate::feed::date::{ATTRIBUTE_DATE_FORMATS, parse_first};
use crate::types::SearchRecord;

/// Where a record came from, stamped onto every record for later lookups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Source {
    pub endpoint: String,
    pub api_key: String,
}

impl Source {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntField {
    Size,
    Grabs,
    Comments,
    Seeders,
    Peers,
    Rating,
    ImdbYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatField {
    ImdbScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    AirDate,
    UsenetDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Id,
    Genre,
    TvDbId,
    TvRageId,
    TvMazeId,
    Info,
    Season,
    Episode,
    TvTitle,
    ImdbId,
    ImdbTitle,
    CoverUrl,
    Resolution,
    InfoHash,
}

/// How an attribute value is converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Int(IntField),
    Float(FloatField),
    Date(DateField),
    Text(TextField),
    /// Repeatable; appended in document order
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRule {
    pub name: &'static str,
    pub conversion: Conversion,
    /// Seeing this attribute at all means the result is a torrent
    pub marks_torrent: bool,
}

const fn rule(name: &'static str, conversion: Conversion) -> AttributeRule {
    AttributeRule {
        name,
        conversion,
        marks_torrent: false,
    }
}

const fn torrent_rule(name: &'static str, conversion: Conversion) -> AttributeRule {
    AttributeRule {
        name,
        conversion,
        marks_torrent: true,
    }
}

/// Every attribute name the normalizer understands
pub static ATTRIBUTE_RULES: &[AttributeRule] = &[
    rule("size", Conversion::Int(IntField::Size)),
    rule("grabs", Conversion::Int(IntField::Grabs)),
    rule("comments", Conversion::Int(IntField::Comments)),
    torrent_rule("seeders", Conversion::Int(IntField::Seeders)),
    torrent_rule("peers", Conversion::Int(IntField::Peers)),
    rule("rating", Conversion::Int(IntField::Rating)),
    rule("imdbyear", Conversion::Int(IntField::ImdbYear)),
    rule("imdbscore", Conversion::Float(FloatField::ImdbScore)),
    rule("tvairdate", Conversion::Date(DateField::AirDate)),
    rule("usenetdate", Conversion::Date(DateField::UsenetDate)),
    rule("guid", Conversion::Text(TextField::Id)),
    rule("genre", Conversion::Text(TextField::Genre)),
    rule("tvdbid", Conversion::Text(TextField::TvDbId)),
    rule("rageid", Conversion::Text(TextField::TvRageId)),
    rule("tvmazeid", Conversion::Text(TextField::TvMazeId)),
    rule("info", Conversion::Text(TextField::Info)),
    rule("season", Conversion::Text(TextField::Season)),
    rule("episode", Conversion::Text(TextField::Episode)),
    rule("tvtitle", Conversion::Text(TextField::TvTitle)),
    rule("imdb", Conversion::Text(TextField::ImdbId)),
    rule("imdbtitle", Conversion::Text(TextField::ImdbTitle)),
    rule("coverurl", Conversion::Text(TextField::CoverUrl)),
    rule("resolution", Conversion::Text(TextField::Resolution)),
    torrent_rule("infohash", Conversion::Text(TextField::InfoHash)),
    rule("category", Conversion::Category),
];

static RULES_BY_NAME: Lazy<HashMap<&'static str, AttributeRule>> =
    Lazy::new(|| ATTRIBUTE_RULES.iter().map(|r| (r.name, *r)).collect());

/// Look up the rule for an attribute name (exact, case-sensitive match)
pub fn rule_for(name: &str) -> Option<&'static AttributeRule> {
    RULES_BY_NAME.get(name)
}

/// Build a [`SearchRecord`] from one feed item
pub fn normalize(item: &RawItem, source: &Source) -> SearchRecord {
    let mut record = SearchRecord {
        title: item.title.clone(),
        description: item.description.clone(),
        pub_date: item.pub_date,
        download_url: item
            .enclosure
            .as_ref()
            .map(|e| e.url.clone())
            .unwrap_or_default(),
        source_endpoint: source.endpoint.clone(),
        source_api_key: source.api_key.clone(),
        ..Default::default()
    };

    for attr in &item.attributes {
        match rule_for(&attr.name) {
            Some(rule) => apply(&mut record, rule, &attr.value),
            None => {
                trace!(attr_name = %attr.name, attr_value = %attr.value, "Unknown newznab attribute");
                record
                    .unmatched_attrs
                    .insert(attr.name.clone(), attr.value.clone());
            }
        }
    }

    if record.size == 0 {
        record.size = item.fallback_size();
    }

    record
}

fn apply(record: &mut SearchRecord, rule: &AttributeRule, value: &str) {
    match rule.conversion {
        Conversion::Int(field) => set_int(record, field, parse_int(value)),
        Conversion::Float(FloatField::ImdbScore) => {
            record.imdb_score = value.trim().parse::<f32>().unwrap_or(0.0);
        }
        Conversion::Date(field) => {
            let parsed = parse_first(value, ATTRIBUTE_DATE_FORMATS);
            if parsed.is_none() {
                warn!(attr_name = rule.name, date_string = value, "Failed to parse date attribute");
            }
            match field {
                DateField::AirDate => record.air_date = parsed,
                DateField::UsenetDate => record.usenet_date = parsed,
            }
        }
        Conversion::Text(field) => *text_slot(record, field) = value.to_string(),
        Conversion::Category => record.category.push(value.to_string()),
    }

    if rule.marks_torrent {
        record.is_torrent = true;
    }
}

fn set_int(record: &mut SearchRecord, field: IntField, value: i64) {
    let narrow = i32::try_from(value).unwrap_or(0);
    match field {
        IntField::Size => record.size = value,
        IntField::Grabs => record.num_grabs = narrow,
        IntField::Comments => record.num_comments = narrow,
        IntField::Seeders => record.seeders = narrow,
        IntField::Peers => record.peers = narrow,
        IntField::Rating => record.rating = narrow,
        IntField::ImdbYear => record.imdb_year = narrow,
    }
}

fn text_slot(record: &mut SearchRecord, field: TextField) -> &mut String {
    match field {
        TextField::Id => &mut record.id,
        TextField::Genre => &mut record.genre,
        TextField::TvDbId => &mut record.tv_db_id,
        TextField::TvRageId => &mut record.tv_rage_id,
        TextField::TvMazeId => &mut record.tv_maze_id,
        TextField::Info => &mut record.info,
        TextField::Season => &mut record.season,
        TextField::Episode => &mut record.episode,
        TextField::TvTitle => &mut record.tv_title,
        TextField::ImdbId => &mut record.imdb_id,
        TextField::ImdbTitle => &mut record.imdb_title,
        TextField::CoverUrl => &mut record.cover_url,
        TextField::Resolution => &mut record.resolution,
        TextField::InfoHash => &mut record.info_hash,
    }
}

/// Base-10 parse that falls back to the leading numeric prefix ("12abc" -> 12),
/// then to 0.
fn parse_int(value: &str) -> i64 {
    let value = value.trim();
    if let Ok(n) = value.parse() {
        return n;
    }

    let sign_len = usize::from(value.starts_with(['+', '-']));
    let digits = value[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    value[..sign_len + digits].parse().unwrap_or(0)
}
