//! Request validation: URL shape, platform allow-list, format selection.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Cheap scheme gate applied before full parsing, case-insensitive.
static HTTP_SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Host fragments that put a URL on the allow-list. Matching is a plain
/// case-insensitive substring check over the whole URL, so subdomains and
/// short links (`youtu.be`, `m.youtube.com`) come along for free.
const PLATFORM_FRAGMENTS: &[(Platform, &[&str])] = &[
    (Platform::YouTube, &["youtube.com", "youtu.be"]),
    (Platform::KlingAi, &["klingai", "kling.ai"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    KlingAi,
    Unknown,
}

impl Platform {
    pub fn detect(url: &str) -> Platform {
        let lowered = url.to_lowercase();
        for (platform, fragments) in PLATFORM_FRAGMENTS {
            if fragments.iter().any(|fragment| lowered.contains(fragment)) {
                return *platform;
            }
        }
        Platform::Unknown
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::KlingAi => "Kling AI",
            Platform::Unknown => "Unknown",
        }
    }
}

/// True when the string is an absolute http(s) URL with a real host.
/// `Url::parse` alone is too permissive here (it accepts `file:` and
/// friends), so the scheme is gated first.
pub fn is_valid_http_url(raw: &str) -> bool {
    if !HTTP_SCHEME_RE.is_match(raw) {
        return false;
    }
    match Url::parse(raw) {
        Ok(url) => url.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}

/// The two deliverable shapes the service offers. Everything about the
/// response (downloader flags, MIME type, attachment name) keys off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFormat {
    #[default]
    Mp4,
    Mp3,
}

impl MediaFormat {
    /// Parses a form token. Whitespace and case are forgiven, unknown
    /// formats are not.
    pub fn parse(token: &str) -> Option<MediaFormat> {
        match token.trim().to_lowercase().as_str() {
            "mp4" => Some(MediaFormat::Mp4),
            "mp3" => Some(MediaFormat::Mp3),
            _ => None,
        }
    }

    /// MIME type for the response, fixed by the requested format rather
    /// than sniffed from the artifact.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "video/mp4",
            MediaFormat::Mp3 => "audio/mpeg",
        }
    }

    /// Filename offered in the Content-Disposition header.
    pub fn attachment_name(&self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "downloaded.mp4",
            MediaFormat::Mp3 => "downloaded.mp3",
        }
    }
}
