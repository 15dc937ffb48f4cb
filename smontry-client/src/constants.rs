/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The client identifier sent as `User-Agent` and `sentry_client`.
pub const CLIENT: &str = concat!("smontry/", env!("CARGO_PKG_VERSION"));

/// The Sentry protocol version spoken by this client.
pub const PROTOCOL_VERSION: u16 = 7;

/// The `platform` reported for events that do not declare one.
///
/// Receivers key grouping and rendering on this value, so it stays on the identifier that earlier
/// releases of this client reported.
pub const DEFAULT_PLATFORM: &str = "python";

/// The endpoint type for single-event submissions.
pub const STORE_URL_TYPE: &str = "store";
