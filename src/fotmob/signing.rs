use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use md5::{Digest, Md5};
use scraper::{Html, Selector};
use serde::Serialize;

use crate::error::{Error, Result};

/// Static text the FotMob web client appends to every body before hashing.
const SIGNING_KEY: &str = include_str!("signing_key.txt");

const VERSION_SELECTOR: &str = r#"span[class*="VersionNumber"]"#;

/// The signed part of an `x-mas` token. Field order matters: it is hashed as serialized.
#[derive(Debug, Clone, Serialize)]
pub struct TokenBody<'a> {
    pub url: &'a str,
    pub code: i64,
    pub foo: &'a str,
}

#[derive(Serialize)]
struct TokenEnvelope<'a> {
    body: &'a TokenBody<'a>,
    signature: String,
}

/// Uppercase hex MD5 of the serialized body followed by the signing key.
pub fn signature(body: &TokenBody<'_>) -> Result<String> {
    let mut hasher = Md5::new();
    hasher.update(serde_json::to_string(body)?.as_bytes());
    hasher.update(SIGNING_KEY.as_bytes());
    Ok(hex::encode_upper(hasher.finalize()))
}

/// Build the `x-mas` header value for a request path.
///
/// `code` is the request time in unix milliseconds and `version` the client build
/// scraped from the homepage.
pub fn auth_token(path: &str, code: i64, version: &str) -> Result<String> {
    let body = TokenBody { url: path, code, foo: version };
    let envelope = TokenEnvelope { signature: signature(&body)?, body: &body };
    Ok(BASE64.encode(serde_json::to_string(&envelope)?))
}

/// Pull the web client version out of the FotMob homepage markup.
pub fn scrape_version(html: &str) -> Result<String> {
    let selector = Selector::parse(VERSION_SELECTOR)
        .map_err(|e| Error::SigningVersion(format!("bad selector: {:?}", e)))?;
    let document = Html::parse_document(html);
    let version = document
        .select(&selector)
        .next()
        .map(|span| span.text().collect::<String>())
        .map(|text| text.trim().to_string())
        .unwrap_or_default();
    if version.is_empty() {
        return Err(Error::SigningVersion("no VersionNumber span on homepage".to_string()));
    }
    Ok(version)
}
