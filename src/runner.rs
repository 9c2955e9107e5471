//! Spawning and supervising the downloader process.
//!
//! The child gets its own process group so a timeout can take down the
//! whole tree (yt-dlp forks ffmpeg for merges). The URL is always the
//! final positional argument of a fixed argv. Nothing is ever passed
//! through a shell.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::artifact::ARTIFACT_STEM;
use crate::error::{DownloadError, Result};
use crate::validate::MediaFormat;

/// Builds the downloader invocation for one request: `--no-playlist`
/// always, extraction flags by format, `-o` template, then the URL. The
/// extension placeholder in the template is expanded by the tool itself.
pub fn build_command(bin: &Path, format: MediaFormat, url: &str, workdir: &Path) -> Command {
    let template = workdir.join(format!("{ARTIFACT_STEM}.%(ext)s"));

    let mut cmd = Command::new(bin);
    cmd.arg("--no-playlist");
    match format {
        MediaFormat::Mp3 => {
            cmd.args(["-x", "--audio-format", "mp3"]);
        }
        MediaFormat::Mp4 => {
            cmd.args([
                "-f",
                "mp4/bestvideo+bestaudio/best",
                "--merge-output-format",
                "mp4",
            ]);
        }
    }
    cmd.arg("-o").arg(template).arg(url);

    cmd.current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    {
        // Own group, so killpg() reaches forked helpers too.
        cmd.process_group(0);
    }
    cmd
}

/// Runs the downloader to completion or to the wall-clock limit,
/// whichever comes first. On timeout the entire process group is killed
/// before the error is returned.
#[tracing::instrument(skip(bin, workdir, limit))]
pub async fn run(
    bin: &Path,
    format: MediaFormat,
    url: &str,
    workdir: &Path,
    limit: Duration,
) -> Result<()> {
    let mut cmd = build_command(bin, format, url, workdir);
    debug!(command = ?cmd.as_std(), "spawning downloader");

    let child = cmd.spawn().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DownloadError::ToolMissing(bin.display().to_string()),
        _ => DownloadError::Io(e),
    })?;
    let pid = child.id();

    let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
        Ok(waited) => waited?,
        Err(_elapsed) => {
            // The group sweep takes the child and anything it forked;
            // kill_on_drop covers the child again once the wait future
            // goes away.
            kill_process_group(pid);
            warn!(
                url,
                limit_secs = limit.as_secs(),
                "downloader timed out, process group killed"
            );
            return Err(DownloadError::Timeout(limit));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        warn!(
            url,
            status = %output.status,
            stderr = %last_stderr_line(&stderr),
            "downloader failed"
        );
        return Err(DownloadError::ProcessFailed {
            status: output.status,
            stderr,
        });
    }

    debug!(url, "downloader finished");
    Ok(())
}

/// The tool prints its actual complaint on the last non-empty stderr line;
/// that is the part worth putting in the log line.
fn last_stderr_line(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pid) = pid else { return };
    // The child is its own group leader, so the group id equals its pid.
    // An error here just means the group is already gone.
    unsafe {
        libc::killpg(pid as libc::pid_t, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
