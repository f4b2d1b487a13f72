//! Test-only helpers shared by unit tests.

pub(crate) mod socket_guard;
