//! Canonical structured event names used across `rabbitmq-destination`.

// Batch lifecycle events.
pub const SEND_START: &str = "send_start";
pub const SEND_DONE: &str = "send_done";
pub const SEND_FAILED: &str = "send_failed";
pub const SEND_CANCELLED: &str = "send_cancelled";

// Per-record pipeline events.
pub const SERIALIZE_EMPTY: &str = "serialize_empty";
pub const SERIALIZE_FAILED: &str = "serialize_failed";
pub const PUBLISH_ATTEMPT: &str = "publish_attempt";
pub const PUBLISH_OK: &str = "publish_ok";
pub const PUBLISH_FAILED: &str = "publish_failed";

// Channel acquisition events.
pub const CHANNEL_CREATE: &str = "channel_create";
pub const CHANNEL_REPLACE: &str = "channel_replace";
pub const CHANNEL_CREATE_FAILED: &str = "channel_create_failed";

// Broker adapter events.
pub const BROKER_CONNECTED: &str = "broker_connected";
pub const BROKER_CHANNEL_OPENED: &str = "broker_channel_opened";
