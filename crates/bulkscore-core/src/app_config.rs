use std::path::PathBuf;

/// Runtime settings for a bulk scoring run, read from the environment.
///
/// The API credential is not part of this struct: it arrives on the command
/// line and is held by the scoring client only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub results_dir: PathBuf,
    pub log_level: String,
    /// `None` means requests wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub progress_interval: u32,
    pub reference_column: String,
}
