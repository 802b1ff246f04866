//! Match share-code codec.
//!
//! A share-code is an opaque string of the form
//! `CSGO-xxxxx-xxxxx-xxxxx-xxxxx-xxxxx` where each `x` is a digit from a
//! 57-character alphabet. The 25 digits form one big-endian base-57 integer
//! (least-significant digit first in the string) packing, from the low bits
//! up: a 64-bit match id, a 64-bit outcome id, and a 16-bit token.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const ALPHABET: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZabcdefhijkmnopqrstuvwxyz23456789";
const CODE_DIGITS: usize = 25;

/// Identifiers decoded from a share-code. Immutable, request-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub match_id: u64,
    pub outcome_id: u64,
    /// 16 bits on the wire, widened for convenience.
    pub token: u64,
}

/// Errors from share-code decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareCodeError {
    /// The code is not 25 alphabet digits in the expected grouping.
    #[error("malformed share code: {0:?}")]
    Malformed(String),
    /// A token larger than 16 bits cannot be represented in a share-code.
    #[error("token {0} does not fit in a share code")]
    TokenOutOfRange(u64),
}

/// Decodes a share-code into its match identifiers.
///
/// Accepts the canonical `CSGO-` prefixed form as well as the bare 25-digit
/// form with or without dash grouping, matching what the coordinator's own
/// tooling accepts.
pub fn decode(code: &str) -> Result<MatchRequest, ShareCodeError> {
    let digits = normalize(code).ok_or_else(|| ShareCodeError::Malformed(code.to_string()))?;

    // The string stores the least-significant digit first, so accumulate
    // from the back. 25 base-57 digits need three 64-bit limbs.
    let mut limbs = [0u64; 3];
    for &d in digits.iter().rev() {
        let mut carry = d as u128;
        for limb in &mut limbs {
            let v = (*limb as u128) * ALPHABET.len() as u128 + carry;
            *limb = v as u64;
            carry = v >> 64;
        }
    }

    Ok(MatchRequest {
        match_id: limbs[0],
        outcome_id: limbs[1],
        token: limbs[2] & 0xFFFF,
    })
}

/// Encodes match identifiers back into a canonical share-code.
pub fn encode(req: &MatchRequest) -> Result<String, ShareCodeError> {
    if req.token > 0xFFFF {
        return Err(ShareCodeError::TokenOutOfRange(req.token));
    }

    let mut limbs = [req.match_id, req.outcome_id, req.token];
    let mut digits = [0u8; CODE_DIGITS];
    for digit in &mut digits {
        // Divide the 192-bit value by 57, most-significant limb first.
        let mut rem = 0u64;
        for limb in limbs.iter_mut().rev() {
            let v = ((rem as u128) << 64) | *limb as u128;
            *limb = (v / ALPHABET.len() as u128) as u64;
            rem = (v % ALPHABET.len() as u128) as u64;
        }
        *digit = ALPHABET[rem as usize];
    }

    let mut out = String::with_capacity(5 + CODE_DIGITS + 5);
    out.push_str("CSGO");
    for group in digits.chunks(5) {
        out.push('-');
        out.push_str(std::str::from_utf8(group).expect("alphabet is ascii"));
    }
    Ok(out)
}

/// Strips the prefix and grouping, returning alphabet indices, or `None`
/// when the shape or characters are wrong.
fn normalize(code: &str) -> Option<Vec<u8>> {
    let body = code.strip_prefix("CSGO-").or_else(|| code.strip_prefix("CSGO")).unwrap_or(code);

    let mut digits = Vec::with_capacity(CODE_DIGITS);
    for (i, ch) in body.bytes().enumerate() {
        if ch == b'-' {
            // Dashes are only valid between 5-digit groups.
            if i == 0 || (digits.len() % 5 != 0) {
                return None;
            }
            continue;
        }
        let idx = ALPHABET.iter().position(|&a| a == ch)?;
        if digits.len() == CODE_DIGITS {
            return None;
        }
        digits.push(idx as u8);
    }

    (digits.len() == CODE_DIGITS).then_some(digits)
}
