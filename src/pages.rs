//! Server-rendered HTML. One landing page with an optional notice slot,
//! plus a small 404 page for the fallback route.

/// Escapes text for interpolation into HTML body or attribute context.
pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub fn home() -> String {
    render("", "")
}

/// The landing page with an error notice above the form. Used by the error
/// responder so a failed download lands the user back on a usable form.
pub fn home_with_notice(error: &str) -> String {
    render(error, "")
}

fn render(error: &str, success: &str) -> String {
    let error_block = if error.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="alert error" role="alert">{}</div>"#,
            escape_html(error)
        )
    };
    let success_block = if success.is_empty() {
        String::new()
    } else {
        format!(
            r#"<div class="alert success" role="status">{}</div>"#,
            escape_html(success)
        )
    };

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Educational Video Downloader</title>
    <link rel="stylesheet" href="/static/style.css" />
    <script defer src="/static/app.js"></script>
  </head>
  <body>
    <main class="card">
      <h1>YouTube &amp; Kling AI Downloader</h1>
      <p class="note">This tool is for <strong>educational purposes only</strong>. Download only content you own or have explicit permission to use.</p>
      {error_block}
      {success_block}
      <form action="/download" method="post" id="download-form">
        <label for="url">Video URL</label>
        <input id="url" name="url" type="url" placeholder="https://www.youtube.com/watch?v=..." required />
        <small id="platform-preview" class="hint">Detected platform: waiting for URL&hellip;</small>

        <label for="format">Download format</label>
        <select id="format" name="format">
          <option value="mp4">MP4 (video)</option>
          <option value="mp3">MP3 (audio only)</option>
        </select>

        <button type="submit" id="submit-btn">Download</button>
      </form>
    </main>
  </body>
</html>
"#
    )
}

pub fn not_found() -> String {
    r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Not Found</title>
    <link rel="stylesheet" href="/static/style.css" />
  </head>
  <body>
    <main class="card">
      <h1>404</h1>
      <p class="note">Nothing lives at this address. <a href="/">Back to the downloader</a>.</p>
    </main>
  </body>
</html>
"#
    .to_string()
}
