//! Server-rendered HTML pages for the encrypt and decrypt tools.
//!
//! Every dynamic value goes through [`escape_html`] before it is interpolated.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use url::Url;

use crate::util::escape_html;

const STYLE: &str = r#"
  :root {
    color-scheme: light;
    --bg: #f8fafc; --fg: #0f172a; --card: #ffffff; --border: #e2e8f0;
    --muted: #475569; --link: #2563eb; --error: #b91c1c; --ok: #15803d;
  }
  @media (prefers-color-scheme: dark) {
    :root {
      color-scheme: dark;
      --bg: #0b1220; --fg: #e2e8f0; --card: #0f172a; --border: #1e293b;
      --muted: #cbd5e1; --link: #93c5fd; --error: #fca5a5; --ok: #86efac;
    }
  }
  body {
    margin: 0; min-height: 100vh; display: flex; align-items: center;
    justify-content: center; padding: 24px; background: var(--bg); color: var(--fg);
    font-family: 'Inter', 'Segoe UI', system-ui, -apple-system, sans-serif;
  }
  .card {
    width: min(640px, 100%); background: var(--card); border: 1px solid var(--border);
    border-radius: 16px; padding: 32px 28px;
    box-shadow: 0 24px 60px -25px rgba(15, 23, 42, 0.45);
  }
  .badge { font-family: monospace; font-size: 13px; color: var(--muted); }
  h1 { margin: 8px 0 12px; font-size: 24px; }
  p { color: var(--muted); line-height: 1.6; }
  label { display: block; margin: 16px 0 6px; font-weight: 600; }
  input, textarea {
    width: 100%; box-sizing: border-box; padding: 10px; border-radius: 8px;
    border: 1px solid var(--border); background: var(--bg); color: var(--fg); font: inherit;
  }
  textarea { min-height: 96px; font-family: monospace; }
  button {
    margin-top: 20px; padding: 10px 18px; border: 0; border-radius: 8px;
    background: var(--link); color: #fff; font-weight: 600; cursor: pointer;
  }
  .alert { margin: 16px 0; padding: 12px 14px; border-radius: 8px; border: 1px solid var(--border); }
  .alert.error { color: var(--error); }
  .alert.success { color: var(--ok); }
  .alert a { color: var(--link); word-break: break-all; font-weight: 600; }
  .home { margin-top: 18px; font-size: 14px; }
  .home a { color: var(--link); text-decoration: none; font-weight: 600; }
"#;

/// An HTML page with its HTTP status.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub title: String,
    pub body: String,
}

impl Page {
    pub fn new(title: impl Into<String>, body: String) -> Self {
        Self {
            status: StatusCode::OK,
            title: title.into(),
            body,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn render(&self) -> String {
        format!(
            r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <meta name="referrer" content="no-referrer" />
    <title>{title}</title>
    <style>{style}</style>
  </head>
  <body>
    <div class="card">
{body}
    </div>
  </body>
</html>"#,
            title = escape_html(&self.title),
            style = STYLE,
            body = self.body,
        )
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        (self.status, Html(self.render())).into_response()
    }
}

fn alert(kind: &str, message: &str) -> String {
    format!(
        r#"      <div class="alert {kind}">{}</div>"#,
        escape_html(message)
    )
}

/// Landing page linking to both tools.
pub fn home() -> Page {
    Page::new(
        "secret-link",
        r#"      <span class="badge">/</span>
      <h1>Password-protected links</h1>
      <p>Lock a URL behind a password and share the resulting link. The link
      carries everything needed to recover the URL except the password, and
      nothing is stored on this server.</p>
      <p><a href="/secret/encrypt">Protect a URL</a> &middot;
      <a href="/secret/decrypt">Open a protected link</a></p>"#
            .to_string(),
    )
}

/// Encrypt form, optionally pre-filled with a URL and showing an error.
pub fn encrypt_form(url: &str, error: Option<&str>) -> Page {
    let error = error.map(|e| alert("error", e)).unwrap_or_default();
    Page::new(
        "Protect a URL",
        format!(
            r#"      <span class="badge">/secret/encrypt</span>
      <h1>Protect a URL with a password</h1>
      <p>Enter a URL and a password. You will be redirected to a decrypt link
      that only opens with the same password.</p>
{error}
      <form method="post" action="/secret/encrypt/view">
        <label for="url">URL to protect</label>
        <input id="url" name="url" type="url" placeholder="https://example.com/private" value="{url}" required />
        <label for="password">Password</label>
        <input id="password" name="password" type="password" placeholder="Enter password" required />
        <button type="submit">Encrypt and redirect</button>
      </form>"#,
            url = escape_html(url),
        ),
    )
}

/// What the decrypt page should show besides the form.
#[derive(Debug, Clone, Default)]
pub struct DecryptView<'a> {
    pub secret: &'a str,
    pub error: Option<&'a str>,
    pub resolved_url: Option<&'a str>,
}

/// Decrypt form, plus the recovered link once decryption succeeded.
pub fn decrypt_form(view: DecryptView<'_>) -> Page {
    let notice = if view.secret.trim().is_empty()
        && view.resolved_url.is_none()
        && view.error.is_none()
    {
        alert(
            "error",
            "A secret query parameter is required before decryption can begin.",
        )
    } else {
        String::new()
    };
    let error = view.error.map(|e| alert("error", e)).unwrap_or_default();
    let result = view.resolved_url.map(resolved_link).unwrap_or_default();

    Page::new(
        "Decrypt a protected URL",
        format!(
            r#"      <span class="badge">/secret/decrypt</span>
      <h1>Decrypt a protected URL</h1>
      <p>Enter the password used during encryption to reveal the original
      destination.</p>
{notice}
{error}
{result}
      <form method="post" action="/secret/decrypt">
        <label for="secret">Encrypted secret</label>
        <textarea id="secret" name="secret" placeholder="Paste the secret from /secret/encrypt" required>{secret}</textarea>
        <label for="password">Password</label>
        <input id="password" name="password" type="password" placeholder="Enter password" autofocus required />
        <button type="submit">Decrypt</button>
      </form>"#,
            secret = escape_html(view.secret),
        ),
    )
}

/// Only http(s) destinations become clickable; anything else is shown as text.
fn resolved_link(url: &str) -> String {
    let escaped = escape_html(url);
    let followable = Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false);

    if followable {
        format!(
            r#"      <div class="alert success">Decryption successful<br /><a href="{escaped}" rel="noreferrer">{escaped}</a></div>"#
        )
    } else {
        format!(
            r#"      <div class="alert success">Decryption successful<br /><code>{escaped}</code></div>"#
        )
    }
}

/// Generic error card.
pub fn error_card(title: &str, message: &str, show_home_link: bool) -> Page {
    let home = if show_home_link {
        r#"      <p class="home"><a href="/">Return home</a></p>"#
    } else {
        ""
    };
    Page::new(
        title,
        format!(
            "      <h1>{}</h1>\n      <p>{}</p>\n{home}",
            escape_html(title),
            escape_html(message)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_page_links_http_urls() {
        let page = decrypt_form(DecryptView {
            secret: "abc",
            error: None,
            resolved_url: Some("https://example.com/a?b=1&c=2"),
        });
        let html = page.render();
        assert!(html.contains(r#"<a href="https://example.com/a?b=1&amp;c=2""#));
        assert!(html.contains(">abc</textarea>"));
    }

    #[test]
    fn decrypt_page_does_not_link_script_urls() {
        let page = decrypt_form(DecryptView {
            secret: "abc",
            error: None,
            resolved_url: Some("javascript:alert(1)"),
        });
        let html = page.render();
        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("<code>javascript:alert(1)</code>"));
    }

    #[test]
    fn decrypt_page_warns_when_secret_missing() {
        let html = decrypt_form(DecryptView::default()).render();
        assert!(html.contains("A secret query parameter is required"));
    }

    #[test]
    fn decrypt_page_shows_one_alert_for_missing_secret() {
        let html = decrypt_form(DecryptView {
            error: Some("A secret is required before decryption can begin."),
            ..Default::default()
        })
        .render();
        assert!(!html.contains("A secret query parameter is required"));
        assert_eq!(html.matches(r#"class="alert error""#).count(), 1);
    }

    #[test]
    fn encrypt_form_escapes_prefilled_url() {
        let html = encrypt_form(r#""><script>"#, Some("Both URL and password are required.")).render();
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
        assert!(html.contains("Both URL and password are required."));
    }

    #[test]
    fn error_card_home_link_is_optional() {
        assert!(error_card("Not found", "nope", true).render().contains("Return home"));
        assert!(!error_card("Not found", "nope", false).render().contains("Return home"));
    }
}
