use ammonia::Builder;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

const ALLOWED_TAGS: [&str; 15] = [
    "p", "br", "strong", "em", "u", "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "h5", "h6",
];

const ALLOWED_LINK_ATTRIBUTES: [&str; 3] = ["href", "title", "target"];

lazy_static! {
    static ref SANITIZER: Builder<'static> = {
        let mut builder = Builder::default();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>())
            .tag_attributes(HashMap::from([(
                "a",
                ALLOWED_LINK_ATTRIBUTES.iter().copied().collect::<HashSet<_>>(),
            )]))
            .generic_attributes(HashSet::new())
            .link_rel(None);
        builder
    };
}

/// Strip everything outside the formatting allow-list from user supplied HTML.
///
/// Disallowed tags are removed but their text is kept; `<script>` and
/// `<style>` bodies are dropped entirely.
pub fn sanitize_html(input: &str) -> String {
    SANITIZER.clean(input).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize_html("Hello, I would like to join."), "Hello, I would like to join.");
    }

    #[test]
    fn test_allowed_tags_kept() {
        assert_eq!(
            sanitize_html("<p>Save <strong>daily</strong></p>"),
            "<p>Save <strong>daily</strong></p>"
        );
    }

    #[test]
    fn test_script_removed() {
        let cleaned = sanitize_html("Hi<script>alert('x')</script> there");
        assert!(!cleaned.contains("script"));
        assert!(!cleaned.contains("alert"));
        assert!(cleaned.contains("Hi"));
        assert!(cleaned.contains("there"));
    }

    #[test]
    fn test_disallowed_tag_stripped_text_kept() {
        assert_eq!(sanitize_html("<div>inside</div>"), "inside");
    }

    #[test]
    fn test_link_attributes_filtered() {
        let cleaned = sanitize_html(
            r#"<a href="https://example.com" onclick="steal()" target="_blank">go</a>"#,
        );
        assert!(cleaned.contains(r#"href="https://example.com""#));
        assert!(cleaned.contains(r#"target="_blank""#));
        assert!(!cleaned.contains("onclick"));
    }

    #[test]
    fn test_javascript_href_dropped() {
        let cleaned = sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#);
        assert!(!cleaned.contains("javascript"));
    }
}
