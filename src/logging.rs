//! Tracing subscriber setup for embedders and tests.

use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Installs a fmt subscriber filtered by `DRAGSELECT_LOG`, then `RUST_LOG`,
/// then `dragselect=info`. Safe to call more than once; also a no-op when
/// the embedder already installed a global subscriber.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
