//! Account and message-id extraction from social post URLs.
//!
//! Handles the link formats seen in token metadata in the wild:
//! bare profile links, full status links, and links dragging along
//! query strings or fragments. A URL that does not contain one of the
//! known hosts (or no `/status/` segment when deriving the post id) is
//! an expected, frequent outcome and simply yields `None`.

/// Hosts whose path layout we know: `<host>/<account>/status/<id>`.
const SOCIAL_HOSTS: [&str; 2] = ["x.com", "twitter.com"];

/// Extract the normalized account name from a social post URL.
///
/// The account is the path segment right after the host. Normalization
/// lowercases and strips every character that is not alphanumeric or
/// an underscore.
pub fn extract_account(url: &str) -> Option<String> {
    // Fragments never carry path information
    let url = url.split('#').next().unwrap_or(url);
    // The account sits before any /status/ segment
    let url = url.split("/status/").next().unwrap_or(url);

    let parts: Vec<&str> = url.split('/').collect();
    for (i, part) in parts.iter().enumerate() {
        if SOCIAL_HOSTS.contains(part) {
            if let Some(segment) = parts.get(i + 1) {
                let account: String = segment
                    .to_lowercase()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                    .collect();
                if !account.is_empty() {
                    return Some(account);
                }
            }
            return None;
        }
    }
    None
}

/// Extract the post id from a social status URL.
///
/// The id is whatever follows `/status/`, with any trailing fragment
/// or query string removed.
pub fn extract_message_id(url: &str) -> Option<String> {
    let after = url.split("/status/").nth(1)?;
    let id = after
        .split('#')
        .next()
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("");
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_account_plain() {
        assert_eq!(
            extract_account("https://x.com/alice/status/999"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn test_extract_account_twitter_host() {
        assert_eq!(
            extract_account("https://twitter.com/Bob_Dev"),
            Some("bob_dev".to_string())
        );
    }

    #[test]
    fn test_extract_account_sanitizes_and_lowercases() {
        assert_eq!(
            extract_account("https://x.com/Ali-ce.42/status/1"),
            Some("alice42".to_string())
        );
    }

    #[test]
    fn test_extract_account_fragment_stripped() {
        assert_eq!(
            extract_account("https://x.com/alice#section"),
            Some("alice".to_string())
        );
    }

    #[test]
    fn test_extract_account_unknown_host() {
        assert_eq!(extract_account("https://example.com/alice/status/1"), None);
    }

    #[test]
    fn test_extract_account_host_without_path() {
        assert_eq!(extract_account("https://x.com"), None);
    }

    #[test]
    fn test_extract_message_id_plain() {
        assert_eq!(
            extract_message_id("https://x.com/alice/status/999"),
            Some("999".to_string())
        );
    }

    #[test]
    fn test_extract_message_id_query_and_fragment() {
        assert_eq!(
            extract_message_id("https://x.com/alice/status/999?x=1#y"),
            Some("999".to_string())
        );
    }

    #[test]
    fn test_extract_message_id_no_status_segment() {
        assert_eq!(extract_message_id("https://x.com/alice"), None);
    }

    #[test]
    fn test_round_trip_full_url() {
        // For https://x.com/<acct>/status/<id>?x=1#y both extractors agree
        let url = "https://x.com/Alice/status/12345?utm=1#reply";
        assert_eq!(extract_account(url), Some("alice".to_string()));
        assert_eq!(extract_message_id(url), Some("12345".to_string()));
    }
}
