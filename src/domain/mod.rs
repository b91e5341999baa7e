pub mod alert;
pub mod errors;
pub mod ports;
pub mod recency_cache;
pub mod template;

pub use alert::{Alert, AlertKind, Priority};
pub use template::{Level, NotificationTemplate};
