//! User-Agent sent with every discovery and asset request.
//!
//! The service answers the widget's scripted clients; requests identify
//! themselves the same way the widget's API tooling does.

/// Fixed identifying User-Agent header value.
const STUDIO_USER_AGENT: &str = "PostmanRuntime/7.31.3";

/// Default User-Agent for all requests of a run.
#[must_use]
pub(crate) fn default_user_agent() -> &'static str {
    STUDIO_USER_AGENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_identifies_runtime_and_version() {
        let ua = default_user_agent();
        let (product, version) = ua.split_once('/').unwrap_or_default();
        assert_eq!(product, "PostmanRuntime");
        assert_eq!(version.split('.').count(), 3, "version must be x.y.z: {ua}");
    }
}
