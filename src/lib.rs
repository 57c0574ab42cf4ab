pub mod configuration;
pub mod error;
pub mod expression;
pub mod notifications;
pub mod notifier;
pub mod session;
pub mod telemetry;
pub mod traits;
