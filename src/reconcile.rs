//! Picking between the two recognition paths and normalizing the winner

use serde::Serialize;

/// Characters kept by [`clean_text`] besides letters and digits
const ALLOWED_PUNCTUATION: &[char] = &[' ', '.', ',', ':', ';', '/', '-', '(', ')', '₹', '$', '%'];

/// Which recognition path supplied the final text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Neural,
    Traditional,
}

/// Choose the path whose output is longer once trimmed.
///
/// Longer is taken to mean more complete; a tie goes to the traditional path.
pub fn choose(neural: &str, traditional: &str) -> Source {
    if traditional.trim().chars().count() >= neural.trim().chars().count() {
        Source::Traditional
    } else {
        Source::Neural
    }
}

/// The raw text of whichever path [`choose`] selects
pub fn reconcile<'a>(neural: &'a str, traditional: &'a str) -> &'a str {
    match choose(neural, traditional) {
        Source::Neural => neural,
        Source::Traditional => traditional,
    }
}

/// Collapse whitespace runs, then drop everything that is not alphanumeric
/// or allowed label punctuation.
pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let kept: String = collapsed
        .chars()
        .filter(|c| c.is_alphanumeric() || ALLOWED_PUNCTUATION.contains(c))
        .collect();

    kept.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_text_wins() {
        assert_eq!(reconcile("short", "a longer string"), "a longer string");
        assert_eq!(reconcile("a longer string", "short"), "a longer string");
    }

    #[test]
    fn test_empty_inputs_give_empty() {
        assert_eq!(reconcile("", ""), "");
    }

    #[test]
    fn test_tie_goes_to_traditional() {
        assert_eq!(choose("abcd", "wxyz"), Source::Traditional);
        assert_eq!(reconcile("abcd", "wxyz"), "wxyz");
    }

    #[test]
    fn test_length_is_measured_after_trimming() {
        // Surrounding whitespace does not make a reading longer
        assert_eq!(choose("abc", "  ab \n\n"), Source::Neural);
        // but the winner is returned untrimmed
        assert_eq!(reconcile("a", "\nab\n"), "\nab\n");
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // "₹₹" is 6 bytes but only 2 characters
        assert_eq!(choose("abc", "₹₹"), Source::Neural);
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("MRP: ₹199.00   (approx)"), "MRP: ₹199.00 (approx)");
        assert_eq!(clean_text("  Net\tWt\n\n250 g  "), "Net Wt 250 g");
    }

    #[test]
    fn test_clean_text_drops_disallowed_symbols() {
        assert_eq!(clean_text("Best*Before #12|05"), "BestBefore 1205");
        assert_eq!(clean_text("50% off / $3.99; (x)"), "50% off / $3.99; (x)");
    }

    #[test]
    fn test_clean_text_keeps_non_latin_letters() {
        assert_eq!(clean_text("दाम ₹20"), "दाम ₹20");
    }
}
