//! Source page fetching and paper link extraction
//!
//! Fetches a blog post and pulls out the arXiv papers it links to. The
//! extraction is a best-effort regex pass over the markup; registry and
//! generation correctness never depend on it.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::domain::{slugify, PaperRef};

/// Errors raised while fetching a source page
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed with status {status} for {url}")]
    Status { status: u16, url: String },
}

/// Anchor tags whose href points at an arXiv abs/pdf page
static ARXIV_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*href="[^"]*arxiv\.org/(?:abs|pdf)/(\d+\.\d+)[^"]*"[^>]*>(.*?)</a>"#)
        .expect("arxiv link pattern is valid")
});

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

static OG_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s[^>]*property="og:title"[^>]*content="([^"]*)""#).expect("og:title pattern is valid")
});

static OG_TITLE_REVERSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s[^>]*content="([^"]*)"[^>]*property="og:title""#).expect("og:title pattern is valid")
});

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid"));

/// Fetches source pages with a browser user agent
pub struct Fetcher {
    http: reqwest::Client,
}

impl Fetcher {
    pub fn from_config(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { http })
    }

    /// Fetch a page, returning its raw markup
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(%url, "fetch_html: called");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        info!(%url, bytes = body.len(), "fetch_html: fetched");
        Ok(body)
    }
}

/// Extract arXiv paper links and their context from page markup
///
/// Duplicate arXiv ids are dropped, keeping the first occurrence. The slug
/// comes from the link text when it is long enough to be meaningful, else
/// from the arXiv id.
pub fn extract_arxiv_papers(html: &str) -> Vec<PaperRef> {
    let mut papers = Vec::new();
    let mut seen_ids: Vec<String> = Vec::new();

    for cap in ARXIV_LINK.captures_iter(html) {
        let arxiv_id = cap[1].to_string();
        if seen_ids.contains(&arxiv_id) {
            continue;
        }
        seen_ids.push(arxiv_id.clone());

        let link_text = decode_entities(HTML_TAG.replace_all(&cap[2], "").trim());
        let slug = {
            let s = slugify(&link_text);
            if s.len() < 3 {
                arxiv_id.replace('.', "-")
            } else {
                s
            }
        };

        papers.push(PaperRef {
            pdf_url: format!("https://arxiv.org/pdf/{}.pdf", arxiv_id),
            title: if link_text.is_empty() {
                format!("Paper {}", arxiv_id)
            } else {
                link_text
            },
            arxiv_id,
            slug,
        });
    }

    debug!(count = papers.len(), "extract_arxiv_papers: done");
    papers
}

/// Extract the page title, preferring the og:title meta (usually cleaner)
pub fn extract_page_title(html: &str) -> Option<String> {
    if let Some(cap) = OG_TITLE.captures(html).or_else(|| OG_TITLE_REVERSED.captures(html)) {
        let title = decode_entities(cap[1].trim());
        if !title.is_empty() {
            return Some(title);
        }
    }

    TITLE_TAG
        .captures(html)
        .map(|cap| decode_entities(cap[1].trim()))
        .filter(|t| !t.is_empty())
}

/// Minimal entity decoding for the handful that show up in titles
///
/// `&amp;` is decoded last so a nested `&amp;lt;` yields `&lt;`, not `<`.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = r#"
<html>
<head>
  <meta property="og:title" content="Paper Highlights of December 2025" />
  <title>Paper Highlights of December 2025 - Substack</title>
</head>
<body>
  <p>First up, <a href="https://arxiv.org/abs/2301.00001">Emergent Misalignment</a> is great.</p>
  <p>Also see <a href="https://arxiv.org/pdf/2302.12345">CoT <b>Faithfulness</b></a>.</p>
  <p>Mentioned again: <a href="https://arxiv.org/abs/2301.00001">the same paper</a>.</p>
  <p>Unrelated: <a href="https://example.com/post">a blog</a>.</p>
</body>
</html>
"#;

    #[test]
    fn test_extracts_papers_and_dedupes() {
        let papers = extract_arxiv_papers(POST);
        assert_eq!(papers.len(), 2);

        assert_eq!(papers[0].arxiv_id, "2301.00001");
        assert_eq!(papers[0].pdf_url, "https://arxiv.org/pdf/2301.00001.pdf");
        assert_eq!(papers[0].slug, "emergent-misalignment");
        assert_eq!(papers[0].title, "Emergent Misalignment");

        // Nested markup in the link text is stripped
        assert_eq!(papers[1].title, "CoT Faithfulness");
        assert_eq!(papers[1].slug, "cot-faithfulness");
    }

    #[test]
    fn test_short_link_text_falls_back_to_arxiv_id() {
        let html = r#"<a href="https://arxiv.org/abs/2303.99999">go</a>"#;
        let papers = extract_arxiv_papers(html);
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].slug, "2303-99999");
    }

    #[test]
    fn test_no_papers() {
        assert!(extract_arxiv_papers("<p>nothing here</p>").is_empty());
    }

    #[test]
    fn test_page_title_prefers_og_title() {
        assert_eq!(
            extract_page_title(POST).as_deref(),
            Some("Paper Highlights of December 2025")
        );
    }

    #[test]
    fn test_page_title_falls_back_to_title_tag() {
        let html = "<head><title>Just a Title</title></head>";
        assert_eq!(extract_page_title(html).as_deref(), Some("Just a Title"));
    }

    #[test]
    fn test_page_title_decodes_entities() {
        let html = r#"<meta property="og:title" content="Safety &amp; Alignment" />"#;
        assert_eq!(extract_page_title(html).as_deref(), Some("Safety & Alignment"));
    }

    #[test]
    fn test_decode_entities_single_pass() {
        assert_eq!(decode_entities("A &amp; B"), "A & B");
        // An escaped entity decodes one level, not two
        assert_eq!(decode_entities("x &amp;lt; y"), "x &lt; y");
        assert_eq!(decode_entities("&quot;q&quot; &#39;s&#39;"), "\"q\" 's'");
    }

    #[test]
    fn test_page_title_none() {
        assert_eq!(extract_page_title("<body></body>"), None);
    }
}
