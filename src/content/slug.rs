use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_SLUG: Regex = Regex::new(r"[^a-z0-9_\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[-\s]+").unwrap();
}

/// Generate a URL-friendly ASCII slug from a title.
///
/// Accented Latin letters are folded to their base letter and any other
/// non-ASCII character is dropped. Underscores are kept; runs of whitespace and
/// hyphens become a single `-`, and leading/trailing `-`/`_` are trimmed.
pub fn slugify(title: &str) -> String {
    let folded: String = title.to_lowercase().chars().filter_map(fold_ascii).collect();
    let cleaned = NON_SLUG.replace_all(&folded, "");
    let joined = SEPARATORS.replace_all(&cleaned, "-");
    joined.trim_matches(|c| c == '-' || c == '_').to_string()
}

fn fold_ascii(c: char) -> Option<char> {
    if c.is_ascii() {
        return Some(c);
    }
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' | 'ɛ' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ñ' | 'ń' | 'ņ' | 'ň' | 'ŋ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' | 'ɔ' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

/// Slug for the `attempt`-th collision: `base`, `base-1`, `base-2`, ...
pub fn numbered_slug(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Saving With Susu"), "saving-with-susu");
    }

    #[test]
    fn test_slugify_punctuation_dropped() {
        assert_eq!(slugify("5 Tips: Save Smarter!"), "5-tips-save-smarter");
        assert_eq!(slugify("Don't panic"), "dont-panic");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Group  --  Susu Plans "), "group-susu-plans");
        assert_eq!(slugify("_savings_tips_"), "savings_tips");
    }

    #[test]
    fn test_slugify_folds_to_ascii() {
        assert_eq!(slugify("Café Susu"), "cafe-susu");
        assert_eq!(slugify("Ɔkɔdeɛ Savings"), "okodee-savings");
        assert_eq!(slugify("Susu 日本"), "susu");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_numbered_slug() {
        assert_eq!(numbered_slug("news", 0), "news");
        assert_eq!(numbered_slug("news", 1), "news-1");
        assert_eq!(numbered_slug("news", 12), "news-12");
    }
}
