use std::collections::HashMap;

use crate::provider::errors::ProviderError;

/// Parse a key-value form body: one `key:value` pair per line.
pub(crate) fn parse_kvform(body: &str) -> Result<HashMap<String, String>, ProviderError> {
    let mut pairs = HashMap::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(ProviderError::MalformedResponse(format!(
                "line without separator: {line}"
            )));
        };
        pairs.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(pairs)
}
