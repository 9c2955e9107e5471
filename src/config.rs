//! Config module for vidgrab

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct Config {
    #[clap(env = "VIDGRAB_HOST", default_value = "0.0.0.0:5000")]
    pub host: String,

    /// Downloader executable, a name looked up on PATH or an absolute path
    #[clap(long, env = "VIDGRAB_DOWNLOADER_BIN", default_value = "yt-dlp")]
    pub downloader_bin: String,

    /// Wall-clock limit for a single downloader run, in seconds
    #[clap(long, env = "VIDGRAB_DOWNLOAD_TIMEOUT", default_value_t = 180)]
    pub download_timeout: u64,

    /// How many downloader processes may run at the same time; further
    /// requests wait their turn
    #[clap(long, env = "VIDGRAB_MAX_DOWNLOADS", default_value_t = 4)]
    pub max_downloads: usize,

    /// Directory the stylesheet and form script are served from
    #[clap(long, env = "VIDGRAB_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout)
    }
}
