//! User-Agent string sent with every request.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/gallery-grab";

/// Default User-Agent (identifies the tool and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("gallery-grab/{version} (+{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_version_and_project_url() {
        let ua = default_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL: {ua}");
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("gallery-grab/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
        );
    }
}
