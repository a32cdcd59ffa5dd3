// src/article.rs
//! Article data model plus the two pieces of article-level logic the engine
//! owns: newest-first ordering and reader content resolution.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// One syndicated article as delivered by the per-month data files.
///
/// Every field tolerates absence and `null` (deserialized as `""`): partial
/// records stay browsable instead of poisoning the whole month. Unknown
/// producer fields (`lang`, `updated_at`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Opaque stable identifier.
    #[serde(default, deserialize_with = "null_to_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub author: String,
    /// ISO-8601 timestamp, or `""` when the producer had none. Kept as the
    /// raw string: ordering compares these lexicographically, which is
    /// chronological for this shape.
    #[serde(default, deserialize_with = "null_to_empty")]
    pub published_at: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub source: String,
    /// Absolute URI of the original publication.
    #[serde(default, deserialize_with = "null_to_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub content_html: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub content_text: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub cover_image: String,
}

fn null_to_empty<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

/// Sort newest first. Empty `published_at` is the smallest string, so
/// undated records end up last. Stable: producer order is kept for ties.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// What the focused reading view should render for one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "body")]
pub enum ReadingContent {
    /// Sanitized `content_html` (script/style/noscript/iframe stripped).
    Html(String),
    /// `content_text` split into trimmed paragraphs.
    Text(Vec<String>),
    /// Neither body was provided; the article is link-only.
    LinkOnly(String),
}

/// Resolve the body for the reading view: `content_html`, then
/// `content_text`, then the external URL.
pub fn reading_content(article: &Article) -> ReadingContent {
    if !article.content_html.trim().is_empty() {
        return ReadingContent::Html(sanitize_html(&article.content_html));
    }
    if !article.content_text.trim().is_empty() {
        return ReadingContent::Text(split_paragraphs(&article.content_text));
    }
    ReadingContent::LinkOnly(article.url.clone())
}

/// Strip active content from stored article HTML. Paired tags go with their
/// bodies; a dangling opener/closer is removed on its own.
fn sanitize_html(html: &str) -> String {
    static RE_PAIRED: OnceCell<Regex> = OnceCell::new();
    let re_paired = RE_PAIRED.get_or_init(|| {
        Regex::new(
            r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>|<iframe\b[^>]*>.*?</iframe\s*>",
        )
        .unwrap()
    });
    static RE_DANGLING: OnceCell<Regex> = OnceCell::new();
    let re_dangling = RE_DANGLING.get_or_init(|| {
        Regex::new(r"(?is)</?(?:script|style|noscript|iframe)\b[^>]*>").unwrap()
    });

    let out = re_paired.replace_all(html, "");
    re_dangling.replace_all(&out, "").into_owned()
}

/// Split plain-text content into paragraphs on blank-line runs, decoding
/// HTML entities and dropping empties.
fn split_paragraphs(text: &str) -> Vec<String> {
    static RE_PARA: OnceCell<Regex> = OnceCell::new();
    let re_para = RE_PARA.get_or_init(|| Regex::new(r"\n{2,}").unwrap());

    re_para
        .split(text)
        .map(|p| html_escape::decode_html_entities(p.trim()).into_owned())
        .filter(|p| !p.is_empty())
        .collect()
}
