//! Widget markup to terminal text

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|li|div|h[1-6]|tr|section|article)>").expect("valid regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r]+").expect("valid regex"));

/// Plain text lines of an HTML fragment; block boundaries become line breaks
pub fn html_to_lines(html: &str) -> Vec<String> {
    let with_breaks = BLOCK_END.replace_all(html, "\n");
    let text = TAG.replace_all(&with_breaks, "");
    let text = decode_entities(&text);

    text.lines()
        .map(|line| SPACES.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_items_become_lines() {
        let html = r#"<ul class="deadlines">
            <li><a href="/mod/quiz/view.php?id=4">Quiz &amp; review</a> <small>Due tomorrow</small></li>
            <li>Essay draft</li>
        </ul>"#;
        assert_eq!(
            html_to_lines(html),
            vec!["Quiz & review Due tomorrow", "Essay draft"]
        );
    }

    #[test]
    fn test_breaks_and_empty_markup() {
        assert_eq!(html_to_lines("one<br/>two<BR>three"), vec!["one", "two", "three"]);
        assert!(html_to_lines("<div>  </div>").is_empty());
    }
}
