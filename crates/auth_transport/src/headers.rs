use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::TransportError;

pub const HEADER_AUTHORIZATION: &str = "authorization";

#[must_use]
pub fn bearer_value(token: &str) -> String {
    format!("Bearer {}", token.trim())
}

/// Convert a deterministic header map into reqwest's representation.
pub fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut out = HeaderMap::new();
    for (key, value) in headers {
        out.insert(
            HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| TransportError::InvalidHeader(format!("invalid header key: {key}")))?,
            HeaderValue::from_str(value).map_err(|_| {
                TransportError::InvalidHeader(format!("invalid header value for {key}"))
            })?,
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{bearer_value, to_header_map};

    #[test]
    fn bearer_value_trims_token_whitespace() {
        assert_eq!(bearer_value(" tok "), "Bearer tok");
    }

    #[test]
    fn header_map_conversion_rejects_invalid_keys() {
        let mut headers = BTreeMap::new();
        headers.insert("bad key".to_owned(), "value".to_owned());
        assert!(to_header_map(&headers).is_err());
    }
}
