//! Application state shared by all handlers.

use pixdrop_core::Config;
use pixdrop_processing::ImageTranscoder;
use pixdrop_storage::Storage;
use std::sync::Arc;

/// Everything a request needs, built once by [`crate::setup::initialize_app`].
///
/// Nothing in here is mutated after startup; the storage directory is the only
/// state shared between requests.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub transcoder: ImageTranscoder,
}
