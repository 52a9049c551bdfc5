//! HTML and XML text helpers

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Rewrite root-relative `href`/`src` attributes against an absolute base.
///
/// Feed readers resolve links without the page's origin.
pub fn absolutize_urls(content: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    ["href", "src"]
        .iter()
        .flat_map(|attr| ['"', '\''].map(|quote| (*attr, quote)))
        .fold(content.to_string(), |acc, (attr, quote)| {
            acc.replace(
                &format!("{}={}/", attr, quote),
                &format!("{}={}{}/", attr, quote, base),
            )
        })
}

/// Drop characters XML 1.0 does not allow
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & 'b'"), "a &amp; &apos;b&apos;");
    }

    #[test]
    fn test_absolutize_urls() {
        let html = r#"<a href="/posts/a">a</a><img src='/img.png'><a href="https://x.y/">x</a>"#;
        assert_eq!(
            absolutize_urls(html, "https://blog.balasolu.com/"),
            r#"<a href="https://blog.balasolu.com/posts/a">a</a><img src='https://blog.balasolu.com/img.png'><a href="https://x.y/">x</a>"#
        );
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("ok\u{0001}\nfine"), "ok\nfine");
    }
}
