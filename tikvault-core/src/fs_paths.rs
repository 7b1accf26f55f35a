use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "TIKVAULT_DATA_DIR";

pub fn app_data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::data_dir().map(|d| d.join("tikvault"))
}

pub fn default_downloads_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
