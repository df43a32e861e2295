use imovel_core::Config;
use imovel_storage::ImageStore;

use crate::request_log::RequestLog;

/// Shared application state, passed to handlers via `State<Arc<AppState>>`.
///
/// The request log lives here rather than behind a static accessor so tests
/// and the binary each construct their own instance.
pub struct AppState {
    pub config: Config,
    pub store: ImageStore,
    pub request_log: RequestLog,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = ImageStore::new(&config.upload_dir, config.public_base_url.clone()).await?;
        let request_log = RequestLog::new(config.request_log_capacity);

        tracing::info!(
            upload_dir = %config.upload_dir.display(),
            max_files = config.max_files_per_upload,
            max_file_size_bytes = config.max_file_size_bytes,
            "Application state initialized"
        );

        Ok(AppState {
            config,
            store,
            request_log,
        })
    }
}
