//! Telegraph page publishing.
//!
//! Posts the formatted report fragment to https://telegra.ph and returns the
//! public page URL. The API wants content as a DOM node array rather than
//! raw HTML, so the fragment is converted by a converter that understands
//! exactly the tags the formatter emits.

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::core::config;
use crate::core::error::AppError;

/// Short name shown on anonymously created Telegraph accounts.
const ACCOUNT_SHORT_NAME: &str = "MediaPeek";

#[derive(Deserialize)]
struct TelegraphResponse<T> {
    ok: bool,
    result: Option<T>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct PageResult {
    url: String,
}

#[derive(Deserialize)]
struct AccountResult {
    access_token: Option<String>,
}

/// Client for the Telegraph page-hosting API.
///
/// The access token comes from `TELEGRAPH_ACCESS_TOKEN`; without one, an
/// anonymous account is created on first publish and its token reused for
/// the process lifetime.
pub struct TelegraphClient {
    http: reqwest::Client,
    base_url: String,
    token: Mutex<Option<String>>,
}

impl TelegraphClient {
    /// Creates a client against the production Telegraph API.
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url("https://api.telegra.ph", config::TELEGRAPH_ACCESS_TOKEN.clone())
    }

    /// Creates a client against an arbitrary API endpoint.
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config::network::telegraph_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token: Mutex::new(token),
        })
    }

    /// Publishes a fragment under the given title, returning the page URL.
    pub async fn publish(&self, title: &str, fragment: &str) -> Result<String, AppError> {
        let token = self.ensure_token().await?;
        let content = html_to_nodes(fragment);

        let response = self
            .http
            .post(format!("{}/createPage", self.base_url))
            .json(&json!({
                "access_token": token,
                "title": title,
                "content": content,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::HttpStatus(response.status()));
        }

        let parsed: TelegraphResponse<PageResult> = response.json().await?;
        if !parsed.ok {
            return Err(AppError::Publish(
                parsed.error.unwrap_or_else(|| "unknown Telegraph error".to_string()),
            ));
        }

        parsed
            .result
            .map(|page| page.url)
            .ok_or_else(|| AppError::Publish("Telegraph returned no page".to_string()))
    }

    /// Returns the cached token, creating an anonymous account if needed.
    async fn ensure_token(&self) -> Result<String, AppError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }

        log::info!("No Telegraph token configured, creating an anonymous account");

        let response = self
            .http
            .post(format!("{}/createAccount", self.base_url))
            .json(&json!({
                "short_name": ACCOUNT_SHORT_NAME,
                "author_name": ACCOUNT_SHORT_NAME,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::HttpStatus(response.status()));
        }

        let parsed: TelegraphResponse<AccountResult> = response.json().await?;
        if !parsed.ok {
            return Err(AppError::Publish(
                parsed.error.unwrap_or_else(|| "account creation failed".to_string()),
            ));
        }

        let token = parsed
            .result
            .and_then(|account| account.access_token)
            .ok_or_else(|| AppError::Publish("Telegraph returned no access token".to_string()))?;

        *guard = Some(token.clone());
        Ok(token)
    }
}

/// Converts a formatter fragment into Telegraph DOM nodes.
///
/// Only the tags the formatter produces are recognized (`h4`, `pre`, `br`);
/// any other `<` is literal text, so un-escaped report content cannot break
/// the page structure.
pub fn html_to_nodes(fragment: &str) -> Vec<Value> {
    let mut nodes: Vec<Value> = Vec::new();
    let mut rest = fragment;

    while !rest.is_empty() {
        match rest.find('<') {
            None => {
                push_text(&mut nodes, rest);
                break;
            }
            Some(at) => {
                if at > 0 {
                    push_text(&mut nodes, &rest[..at]);
                }
                let tail = &rest[at..];

                if let Some(after) = tail.strip_prefix("<br>") {
                    nodes.push(json!({ "tag": "br" }));
                    rest = after;
                } else if let Some((inner, after)) = take_element(tail, "h4") {
                    nodes.push(json!({ "tag": "h4", "children": [inner] }));
                    rest = after;
                } else if let Some((inner, after)) = take_element(tail, "pre") {
                    nodes.push(json!({ "tag": "pre", "children": [inner] }));
                    rest = after;
                } else {
                    // Literal '<' in report content
                    push_text(&mut nodes, "<");
                    rest = &tail[1..];
                }
            }
        }
    }

    nodes
}

/// Appends text, merging with a preceding text node.
fn push_text(nodes: &mut Vec<Value>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Value::String(prev)) = nodes.last_mut() {
        prev.push_str(text);
    } else {
        nodes.push(Value::String(text.to_string()));
    }
}

/// Splits `<tag>inner</tag>` off the front of `s`.
fn take_element<'a>(s: &'a str, tag: &str) -> Option<(&'a str, &'a str)> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let body = s.strip_prefix(open.as_str())?;
    let end = body.find(close.as_str())?;
    Some((&body[..end], &body[end + close.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nodes_for_single_block() {
        let nodes = html_to_nodes("<h4>🗒 General</h4><pre>Format : MKV\n</pre>");

        assert_eq!(
            nodes,
            vec![
                json!({ "tag": "h4", "children": ["🗒 General"] }),
                json!({ "tag": "pre", "children": ["Format : MKV\n"] }),
            ]
        );
    }

    #[test]
    fn test_nodes_with_br_separator() {
        let nodes = html_to_nodes("<pre>a</pre><br><pre>b</pre>");

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1], json!({ "tag": "br" }));
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        let nodes = html_to_nodes("<pre>Width < Height\n</pre>");

        assert_eq!(nodes, vec![json!({ "tag": "pre", "children": ["Width < Height\n"] })]);
    }

    #[test]
    fn test_unrecognized_markup_stays_literal() {
        let nodes = html_to_nodes("before <b>bold</b> after");

        assert_eq!(nodes, vec![Value::String("before <b>bold</b> after".to_string())]);
    }

    #[test]
    fn test_empty_fragment() {
        assert!(html_to_nodes("").is_empty());
    }
}
