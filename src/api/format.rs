use axum::http::{header, HeaderMap};
use serde::Serialize;
use thiserror::Error;

use crate::api::envelope::{Envelope, ResultView};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Response serialization negotiated per request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    /// Parse a path suffix (`json` / `xml`). Anything else is not a route.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Xml => "application/xml",
        }
    }

    /// An explicit suffix wins; otherwise `Accept` may ask for XML ahead of JSON.
    pub fn negotiate(suffix: Option<Format>, headers: &HeaderMap) -> Self {
        if let Some(format) = suffix {
            return format;
        }

        let accept = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let xml_at = ["application/xml", "text/xml"]
            .iter()
            .filter_map(|m| accept.find(m))
            .min();
        let json_at = accept.find("application/json");

        match (xml_at, json_at) {
            (Some(x), Some(j)) if x < j => Format::Xml,
            (Some(_), None) => Format::Xml,
            _ => Format::Json,
        }
    }
}

/// Split `"12.xml"` into `("12", Some("xml"))`; a bare `"12"` has no suffix.
pub fn split_suffix(segment: &str) -> (&str, Option<&str>) {
    match segment.rsplit_once('.') {
        Some((stem, suffix)) => (stem, Some(suffix)),
        None => (segment, None),
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML serialization failed: {0}")]
    Xml(String),
}

/// Serialized body plus its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Render an envelope in the requested format
pub fn render(format: Format, envelope: &Envelope) -> Result<Rendered, FormatError> {
    let body = match format {
        Format::Json => match envelope {
            Envelope::Result(item) => serde_json::to_vec(item)?,
            Envelope::Results(collection) => serde_json::to_vec(collection)?,
            Envelope::Message(message) => serde_json::to_vec(message)?,
        },
        Format::Xml => render_xml(envelope)?.into_bytes(),
    };

    Ok(Rendered {
        content_type: format.content_type(),
        body,
    })
}

/// Collection as `<results><result>..</result>..</results>`
#[derive(Serialize)]
struct XmlResults<'a> {
    result: Vec<&'a ResultView>,
}

fn render_xml(envelope: &Envelope) -> Result<String, FormatError> {
    let doc = match envelope {
        Envelope::Result(item) => quick_xml::se::to_string_with_root("result", &item.result),
        Envelope::Results(collection) => {
            let wrapped = XmlResults {
                result: collection.results.iter().map(|item| &item.result).collect(),
            };
            quick_xml::se::to_string_with_root("results", &wrapped)
        }
        Envelope::Message(message) => quick_xml::se::to_string_with_root("message", message),
    }
    .map_err(|e| FormatError::Xml(e.to_string()))?;

    Ok(format!("{}{}", XML_DECLARATION, doc))
}

/// Quoted MD5 fingerprint of the JSON serialization of `value`
pub fn etag<T: Serialize + ?Sized>(value: &T) -> Result<String, FormatError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(format!("\"{:x}\"", md5::compute(bytes)))
}
