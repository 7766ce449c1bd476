use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Fixed key used only to turn both secrets into equal-length tags so the
/// final comparison runs in constant time.
const COMPARISON_KEY: &[u8] = b"ingesta-raw/x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// No expected secret is configured; the check is not enforced.
    Unconfigured,
    Unauthorized,
    Authorized,
}

pub fn authenticate(expected: Option<&str>, supplied: Option<&str>) -> AuthDecision {
    let Some(expected) = expected else {
        return AuthDecision::Unconfigured;
    };
    let Some(supplied) = supplied else {
        return AuthDecision::Unauthorized;
    };
    if secrets_match(expected.as_bytes(), supplied.as_bytes()) {
        AuthDecision::Authorized
    } else {
        AuthDecision::Unauthorized
    }
}

fn secrets_match(expected: &[u8], supplied: &[u8]) -> bool {
    let Ok(mut expected_mac) = HmacSha256::new_from_slice(COMPARISON_KEY) else {
        return false;
    };
    expected_mac.update(expected);
    let expected_tag = expected_mac.finalize().into_bytes();

    let Ok(mut supplied_mac) = HmacSha256::new_from_slice(COMPARISON_KEY) else {
        return false;
    };
    supplied_mac.update(supplied);
    supplied_mac.verify_slice(&expected_tag).is_ok()
}
