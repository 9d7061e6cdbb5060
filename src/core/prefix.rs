//! Short, mutually unique digest prefixes for display

use crate::utils::MIN_PREFIX_LEN;

/// Return the shortest prefixes (at least [`MIN_PREFIX_LEN`] chars) that tell
/// `a` and `b` apart.
///
/// When no length up to the longer input disambiguates them (equal digests,
/// or one being a prefix of the other) both inputs are returned unchanged.
/// Digests are hex, so byte slicing is always on a char boundary; non-ASCII
/// input falls back to the full strings rather than panicking.
pub fn shortest_unique_prefixes(a: &str, b: &str) -> (String, String) {
    let max_len = a.len().max(b.len());

    for len in MIN_PREFIX_LEN..=max_len {
        if a.len() < len || b.len() < len {
            break;
        }
        let (Some(pa), Some(pb)) = (a.get(..len), b.get(..len)) else {
            break;
        };
        if pa != pb {
            return (pa.to_string(), pb.to_string());
        }
    }

    (a.to_string(), b.to_string())
}
