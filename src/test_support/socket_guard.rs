use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_SOCKETS_VAR: &str = "STUDIO_DOWNLOADER_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    std::env::var(REQUIRE_SOCKETS_VAR)
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Starts a mock server, or returns `None` when localhost sockets are unavailable
/// (sandboxed CI). Panics instead when the require variable is set.
#[track_caller]
pub(crate) fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let location = Location::caller();
    let can_bind = TcpListener::bind("127.0.0.1:0").is_ok();
    async move {
        if can_bind {
            return Some(MockServer::start().await);
        }
        let message = format!(
            "[socket-bound-test] {}:{} cannot bind a localhost socket",
            location.file(),
            location.line()
        );
        assert!(!sockets_required(), "{message}; {REQUIRE_SOCKETS_VAR} is set");
        eprintln!("{message}; skipping");
        None
    }
}
