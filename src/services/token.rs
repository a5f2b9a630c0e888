use crate::error::{ApiError, Result};
use crate::models::session::{SIGNIFICANT_COOKIES, Session};
use base64::{Engine as _, engine::general_purpose};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};
use std::sync::LazyLock;
use xxhash_rust::xxh3::xxh3_64;

/// The significant cookie names in their wire order.
///
/// Tokens never spell out cookie names; each value sits at the position its
/// name hashes to. Both sides derive the same order from the same constant
/// list, so the name table never has to travel.
static COOKIE_ORDER: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut names = SIGNIFICANT_COOKIES.to_vec();
    names.sort_by_key(|name| xxh3_64(name.as_bytes()));
    names
});

/// Encodes a session into a compact, URL-safe token.
///
/// Cookie values are laid out positionally (empty slot for an absent
/// cookie), gzipped and base64-encoded without padding. Encoding the same
/// session twice yields the same token.
pub fn encode(session: &Session) -> Result<String> {
    let slots: Vec<&str> = COOKIE_ORDER
        .iter()
        .map(|name| session.get(name).unwrap_or(""))
        .collect();
    let joined = slots.join(";");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(joined.as_bytes())
        .map_err(|e| ApiError::ServerError(format!("failed to compress session: {e}")))?;
    let compressed = encoder
        .finish()
        .map_err(|e| ApiError::ServerError(format!("failed to compress session: {e}")))?;

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(compressed))
}

/// Decodes a token back into the session it was built from.
///
/// Any token not produced by [`encode`] (bad base64, bad gzip stream, wrong
/// slot count) comes back as [`ApiError::MalformedToken`].
pub fn decode(token: &str) -> Result<Session> {
    let compressed = general_purpose::URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| ApiError::MalformedToken)?;

    let mut joined = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut joined)
        .map_err(|_| ApiError::MalformedToken)?;

    let slots: Vec<&str> = joined.split(';').collect();
    if slots.len() != COOKIE_ORDER.len() {
        return Err(ApiError::MalformedToken);
    }

    let mut session = Session::new();
    for (name, value) in COOKIE_ORDER.iter().zip(slots) {
        if !value.is_empty() {
            session.insert(name, value);
        }
    }
    Ok(session)
}
