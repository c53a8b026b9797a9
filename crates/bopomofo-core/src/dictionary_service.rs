//! Dictionary-service dispatch: parses the host's service list and builds
//! the URL to open for a looked-up phrase. No network I/O happens here —
//! the host is handed a finished URL string and decides how to open it.

use serde::Deserialize;

/// The literal placeholder a `url_template` replaces with the encoded phrase.
const ENCODED_PLACEHOLDER: &str = "(encoded)";

#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryService {
    pub name: String,
    pub url_template: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceList {
    services: Vec<DictionaryService>,
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryServiceError {
    #[error("invalid dictionary service JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parses the `{"services": [...]}` document the host supplies.
pub fn parse_services(json: &str) -> Result<Vec<DictionaryService>, DictionaryServiceError> {
    let list: ServiceList = serde_json::from_str(json)?;
    Ok(list.services)
}

/// Percent-encodes `phrase` and substitutes it for `(encoded)` in the
/// service's `url_template`.
pub fn build_url(service: &DictionaryService, phrase: &str) -> String {
    service
        .url_template
        .replace(ENCODED_PLACEHOLDER, &percent_encode(phrase))
}

/// Minimal percent-encoding sufficient for phrase lookups: everything
/// outside `[A-Za-z0-9._~-]` is escaped as UTF-8 bytes.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(*byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
