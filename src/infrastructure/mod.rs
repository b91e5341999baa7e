pub mod ai;
pub mod broadcast_hub;
pub mod collectors;
pub mod http_client_factory;
pub mod notifiers;
pub mod processors;
pub mod ticker_resolver;

pub use broadcast_hub::BroadcastHub;
pub use ticker_resolver::TickerResolver;
