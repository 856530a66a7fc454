//! UID generation for new todos.

use chrono::Utc;
use uuid::Uuid;

const RANDOM_LEN: usize = 8;
const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a UID of the form `<nanos>-<8 random chars>[@<hostname>]`.
///
/// Collisions are not checked; the timestamp plus random suffix is the whole
/// guarantee.
pub fn generate_uid() -> String {
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);

    // bytes 6 and 8 carry the version and variant bits
    let random: String = Uuid::new_v4()
        .as_bytes()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 6 && *i != 8)
        .take(RANDOM_LEN)
        .map(|(_, b)| char::from(ALPHABET[usize::from(*b) % ALPHABET.len()]))
        .collect();

    match hostname() {
        Some(host) => format!("{}-{}@{}", nanos, random, host),
        None => format!("{}-{}", nanos, random),
    }
}

fn hostname() -> Option<String> {
    let host = gethostname::gethostname().to_string_lossy().trim().to_string();
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_uid_format() {
        let re = Regex::new(r"^\d+-[0-9a-z]{8}(@\S+)?$").unwrap();
        let uid = generate_uid();
        assert!(re.is_match(&uid), "unexpected uid: {}", uid);
    }

    #[test]
    fn test_uid_has_host_suffix() {
        let uid = generate_uid();
        if let Some(host) = hostname() {
            assert!(uid.ends_with(&format!("@{}", host)));
        }
    }

    #[test]
    fn test_uids_differ() {
        assert_ne!(generate_uid(), generate_uid());
    }
}
