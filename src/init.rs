use crate::layer::LoggerLayer;
use crate::logger::Logger;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

pub use tracing::subscriber::SetGlobalDefaultError;

/// Install `logger` as the backend of the global `tracing` subscriber.
///
/// Every `tracing` event in the process is then formatted and written by
/// `logger`, with its context fields attached. The logger's level decides
/// which events are kept.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already installed.
pub fn init_tracing(logger: Logger) -> Result<(), SetGlobalDefaultError> {
    let subscriber = Registry::default().with(LoggerLayer::new(logger));
    tracing::subscriber::set_global_default(subscriber)
}
