//! Document text extraction.
//!
//! Turns an uploaded file into a single whitespace-normalized text string.
//! PDF parsing runs on the blocking pool; Markdown and HTML markup is
//! stripped so only prose reaches the chunker.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::errors::RagError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Markdown,
    Text,
}

impl DocumentFormat {
    /// Infers the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, RagError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| RagError::UnsupportedFormat("<no extension>".to_string()))?;

        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "md" | "markdown" => Ok(DocumentFormat::Markdown),
            "txt" => Ok(DocumentFormat::Text),
            other => Err(RagError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Extracts normalized plain text from a document file.
///
/// Fails with `UnsupportedFormat` for unknown extensions and `EmptyContent`
/// when extraction yields no non-whitespace text (scanned PDFs included).
pub async fn extract_text(path: &Path) -> Result<String, RagError> {
    let format = DocumentFormat::from_path(path)?;
    let raw = match format {
        DocumentFormat::Pdf => extract_pdf(path).await?,
        DocumentFormat::Markdown => {
            let source = tokio::fs::read_to_string(path).await?;
            strip_markdown(&source)
        }
        DocumentFormat::Text => tokio::fs::read_to_string(path).await?,
    };

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(RagError::EmptyContent);
    }
    Ok(text)
}

async fn extract_pdf(path: &Path) -> Result<String, RagError> {
    let bytes = tokio::fs::read(path).await?;
    // pdf parsing is CPU-bound; keep it off the async runtime
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|err| RagError::Internal(err.to_string()))?
        .map_err(|err| RagError::Extraction(err.to_string()))
}

/// Collapses all runs of whitespace into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces Markdown to its prose: fences, heading markers, list bullets,
/// emphasis, links and inline HTML all go; the text they wrap stays.
fn strip_markdown(source: &str) -> String {
    static IMAGE: OnceLock<Regex> = OnceLock::new();
    static LINK: OnceLock<Regex> = OnceLock::new();
    let image = IMAGE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").expect("static regex"));
    let link = LINK.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("static regex"));

    let mut lines = Vec::new();
    for raw in source.lines() {
        let trimmed = raw.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }
        let line = trimmed.trim_start_matches('#').trim_start();
        let line = line.strip_prefix("> ").unwrap_or(line);
        let line = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
            .unwrap_or(line);
        lines.push(line);
    }

    let joined = lines.join("\n");
    let joined = image.replace_all(&joined, "$1");
    let joined = link.replace_all(&joined, "$1");
    let joined = joined.replace("**", "").replace("__", "").replace('`', "");
    decode_entities(&strip_html_tags(&joined))
}

/// Removes HTML tags, dropping `<script>` and `<style>` bodies entirely.
pub(crate) fn strip_html_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let lower = tail.to_ascii_lowercase();

        if lower.starts_with("<script") {
            match lower.find("</script>") {
                Some(end) => rest = &tail[end + "</script>".len()..],
                None => return out,
            }
        } else if lower.starts_with("<style") {
            match lower.find("</style>") {
                Some(end) => rest = &tail[end + "</style>".len()..],
                None => return out,
            }
        } else {
            match tail.find('>') {
                Some(close) => rest = &tail[close + 1..],
                None => return out,
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decodes the handful of entities that show up in extracted markup.
pub(crate) fn decode_entities(input: &str) -> String {
    input
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn format_inference_covers_known_extensions() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("manual.PDF")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("notes.md")).unwrap(),
            DocumentFormat::Markdown
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("image.png")),
            Err(RagError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            DocumentFormat::from_path(Path::new("Makefile")),
            Err(RagError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn markdown_markup_is_stripped() {
        let source = "# Title\n\nSome **bold** text with a [link](https://example.com).\n\n```\ncode line\n```\n\n- item one\n- item two\n";
        let text = strip_markdown(source);
        assert!(text.contains("Title"));
        assert!(text.contains("bold"));
        assert!(text.contains("link"));
        assert!(text.contains("code line"));
        assert!(text.contains("item one"));
        assert!(!text.contains('#'));
        assert!(!text.contains("**"));
        assert!(!text.contains("https://example.com"));
    }

    #[test]
    fn html_tags_and_script_bodies_are_removed() {
        let html = "<html><head><script>var x = 1;</script></head><body><h1>Hello</h1><p>World</p></body></html>";
        let text = strip_html_tags(html);
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains('<'));
        assert!(!text.contains("var x"));
    }

    #[test]
    fn normalization_collapses_whitespace() {
        assert_eq!(
            normalize_whitespace("  one\ttwo\n\nthree  "),
            "one two three"
        );
    }

    #[tokio::test]
    async fn empty_text_file_fails_with_empty_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blank.txt");
        let mut file = std::fs::File::create(&path).expect("create file");
        write!(file, "   \n\t  ").expect("write");

        assert!(matches!(
            extract_text(&path).await,
            Err(RagError::EmptyContent)
        ));
    }

    #[tokio::test]
    async fn plain_text_round_trips_normalized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "alpha beta\ngamma").expect("write");

        let text = extract_text(&path).await.expect("extract");
        assert_eq!(text, "alpha beta gamma");
    }
}
