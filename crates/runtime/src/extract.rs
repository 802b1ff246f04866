//! Heuristic demo-URL extraction from coordinator payloads.
//!
//! The coordinator's response shape is not contractually stable, so the
//! URL is mined from the payload by a fixed precedence of strategies.
//! Later strategies trade precision for robustness and never override an
//! earlier, stronger match:
//!
//! 1. a fully-qualified demo URL anywhere in the payload
//! 2. a `…/730/` host-prefix URL, completed with the deterministic filename
//! 3. a bare `replayN.valve.net` host, with scheme, path, and filename
//!    synthesized
//! 4. a loose `/730/<filename>.dem` path fragment next to a host, with the
//!    URL reconstructed from the two
//!
//! Everything operates on the flattened string leaves of the payload:
//! object keys and values, array elements, and byte-buffer-looking integer
//! arrays decoded as UTF-8 with undecodable bytes dropped.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static RE_FULL_DEMO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://replay\d+\.valve\.net/730/\d{1,30}_\d{1,15}\.dem(?:\.bz2)?")
        .expect("full demo url regex")
});

static RE_730_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://replay\d+\.valve\.net/730/?$").expect("730 prefix regex")
});

static RE_REPLAY_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(replay\d+\.valve\.net)").expect("replay host regex"));

/// Searches `payload` for a downloadable demo URL.
///
/// Pure function: `match_id` and `token` are only used to synthesize the
/// deterministic filename for the fallback strategies. Returns `None` when
/// no strategy matches; absence is a valid, non-error outcome.
pub fn extract(payload: &Value, match_id: u64, token: u64) -> Option<String> {
    let mut strings = Vec::new();
    collect_strings(payload, &mut strings);

    for s in &strings {
        if let Some(found) = RE_FULL_DEMO_URL.find(s) {
            return Some(found.as_str().to_string());
        }
    }

    let filename = demo_filename(match_id, token);

    for s in &strings {
        let trimmed = s.trim();
        if RE_730_PREFIX.is_match(trimmed) {
            return Some(format!("{}/{filename}", trimmed.trim_end_matches('/')));
        }
    }

    for s in &strings {
        if let Some(caps) = RE_REPLAY_HOST.captures(s) {
            return Some(format!("http://{}/730/{filename}", &caps[1]));
        }
    }

    for s in &strings {
        if let Some(url) = reconstruct_loose(s, match_id, token) {
            return Some(url);
        }
    }

    None
}

/// Canonical demo filename for a match: zero-padded ids, bz2-compressed.
pub fn demo_filename(match_id: u64, token: u64) -> String {
    format!("{match_id:021}_{token:010}.dem.bz2")
}

/// Last-resort reconstruction from a loose `/730/<ids>.dem` path fragment.
///
/// Fires only when the same string also names the replay host; the path is
/// taken from `/730/` up to the first whitespace, with trailing quote or
/// comma noise stripped.
fn reconstruct_loose(s: &str, match_id: u64, token: u64) -> Option<String> {
    let needle = format!("/730/{match_id:021}_{token:010}.dem");
    let at = s.find(&needle)?;
    let host = &RE_REPLAY_HOST.captures(s)?[1];
    let tail = s[at..].split_whitespace().next()?;
    let tail = tail.trim_end_matches(['"', '\'', ',']);
    Some(format!("http://{host}{tail}"))
}

/// Flattens `value` into its string leaves, in document order.
fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Object(map) => {
            for (key, val) in map {
                out.push(key.clone());
                collect_strings(val, out);
            }
        }
        Value::Array(items) => {
            if let Some(bytes) = as_byte_buffer(items) {
                let text: String = String::from_utf8_lossy(&bytes)
                    .chars()
                    .filter(|c| *c != char::REPLACEMENT_CHARACTER)
                    .collect();
                out.push(text);
            } else {
                for item in items {
                    collect_strings(item, out);
                }
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Treats an all-small-integer array as a raw byte buffer.
fn as_byte_buffer(items: &[Value]) -> Option<Vec<u8>> {
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|v| v.as_u64().filter(|n| *n <= 255).map(|n| n as u8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_url_returned_verbatim() {
        let payload = json!({
            "note": "see https://replay189.valve.net/730/000000000000000123456_0000000789.dem.bz2 now"
        });
        assert_eq!(
            extract(&payload, 123456, 789).as_deref(),
            Some("https://replay189.valve.net/730/000000000000000123456_0000000789.dem.bz2")
        );
    }

    #[test]
    fn full_url_without_bz2_suffix() {
        let payload = json!(["https://replay3.valve.net/730/000000000000000000042_0000000007.dem"]);
        assert_eq!(
            extract(&payload, 42, 7).as_deref(),
            Some("https://replay3.valve.net/730/000000000000000000042_0000000007.dem")
        );
    }

    #[test]
    fn prefix_url_gets_deterministic_filename() {
        let payload = json!({"demo": "https://replay42.valve.net/730/"});
        assert_eq!(
            extract(&payload, 123456, 789).as_deref(),
            Some("https://replay42.valve.net/730/000000000000000123456_0000000789.dem.bz2")
        );
    }

    #[test]
    fn bare_host_synthesizes_url() {
        let payload = json!({"info": "host: replay7.valve.net"});
        assert_eq!(
            extract(&payload, 1, 1).as_deref(),
            Some("http://replay7.valve.net/730/000000000000000000001_0000000001.dem.bz2")
        );
    }

    #[test]
    fn full_url_wins_over_weaker_matches() {
        // Both a bare host and a full URL present: the full URL wins even
        // though the bare host appears first in document order.
        let payload = json!([
            "server replay9.valve.net is busy",
            "https://replay189.valve.net/730/000000000000000123456_0000000789.dem.bz2"
        ]);
        assert_eq!(
            extract(&payload, 123456, 789).as_deref(),
            Some("https://replay189.valve.net/730/000000000000000123456_0000000789.dem.bz2")
        );
    }

    #[test]
    fn url_found_in_object_key() {
        let payload = json!({
            "https://replay11.valve.net/730/": "available"
        });
        assert_eq!(
            extract(&payload, 5, 5).as_deref(),
            Some("https://replay11.valve.net/730/000000000000000000005_0000000005.dem.bz2")
        );
    }

    #[test]
    fn byte_buffer_is_decoded() {
        let bytes: Vec<u8> =
            b"https://replay2.valve.net/730/000000000000000000009_0000000003.dem.bz2".to_vec();
        let payload = json!({ "raw": bytes });
        assert_eq!(
            extract(&payload, 9, 3).as_deref(),
            Some("https://replay2.valve.net/730/000000000000000000009_0000000003.dem.bz2")
        );
    }

    #[test]
    fn absence_when_nothing_matches() {
        let payload = json!({
            "matchid": 123456,
            "status": "ready",
            "watchable": [{"tv_port": 27020}]
        });
        assert_eq!(extract(&payload, 123456, 789), None);
    }

    #[test]
    fn loose_path_reconstruction() {
        let s = "mirror replay5.valve.net serves \"/730/000000000000000000001_0000000001.dem.bz2\", maybe";
        assert_eq!(
            reconstruct_loose(s, 1, 1).as_deref(),
            Some("http://replay5.valve.net/730/000000000000000000001_0000000001.dem.bz2")
        );
        assert_eq!(reconstruct_loose("no host here /730/x.dem", 1, 1), None);
    }

    #[test]
    fn deterministic_filename_padding() {
        assert_eq!(demo_filename(1, 1), "000000000000000000001_0000000001.dem.bz2");
        assert_eq!(
            demo_filename(3230642215713767580, 23991),
            "003230642215713767580_0000023991.dem.bz2"
        );
    }
}
