use crate::rules::RuleSet;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Four single letters separated by single dots, e.g. "f.u.c.k".
    /// Collapsed before the 3-letter pattern so the two cannot partially
    /// overlap.
    static ref DOTTED_4: Regex =
        Regex::new(r"(?i)\b([a-z])\.([a-z])\.([a-z])\.([a-z])\b").unwrap();
    /// Three single letters separated by single dots, e.g. "a.s.s".
    static ref DOTTED_3: Regex = Regex::new(r"(?i)\b([a-z])\.([a-z])\.([a-z])\b").unwrap();
    /// Maximal runs of word characters.
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// Maps every character of `text`, case-folded, through the rule set's leet
/// table. Characters without an entry pass through lowercased. The output
/// always has the same number of chars as the input.
pub(crate) fn normalize_leet(text: &str, rules: &RuleSet) -> String {
    text.chars()
        .map(|c| {
            let folded = c.to_lowercase().next().unwrap_or(c);
            rules.leet_map.get(&folded).copied().unwrap_or(folded)
        })
        .collect()
}

/// Extracts lowercase word tokens from `text` in left-to-right order,
/// duplicates retained. Dotted obfuscation is collapsed first, so
/// "f.u.c.k" yields the single token "fuck".
pub(crate) fn extract_words(text: &str) -> Vec<String> {
    let collapsed = collapse_dotted(text);
    WORD.find_iter(&collapsed.to_lowercase())
        .map(|m| m.as_str().to_owned())
        .collect()
}

fn collapse_dotted(text: &str) -> String {
    let pass = DOTTED_4.replace_all(text, "${1}${2}${3}${4}");
    DOTTED_3.replace_all(&pass, "${1}${2}${3}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leet_maps_characters() {
        let rules = RuleSet::fallback();
        assert_eq!(normalize_leet("h3ll0", &rules), "hello");
        assert_eq!(normalize_leet("5h!7", &rules), "shit");
    }

    #[test]
    fn leet_lowercases_and_passes_unmapped_through() {
        let rules = RuleSet::fallback();
        assert_eq!(normalize_leet("H3LL0 W0RLD?", &rules), "hello world?");
    }

    #[test]
    fn leet_preserves_length() {
        let rules = RuleSet::fallback();
        for text in ["", "abc", "a b c", "¡£3@!", "日本語"] {
            assert_eq!(
                normalize_leet(text, &rules).chars().count(),
                text.chars().count()
            );
        }
    }

    #[test]
    fn leet_uses_only_the_given_rules() {
        let rules = RuleSet::empty().with_leet([('4', 'u')]);
        assert_eq!(normalize_leet("f4ck", &rules), "fuck");
        assert_eq!(normalize_leet("h3ll0", &rules), "h3ll0");
    }

    #[test]
    fn extracts_words_in_order_with_duplicates() {
        assert_eq!(extract_words("Foo, bar! foo"), ["foo", "bar", "foo"]);
        assert_eq!(extract_words("snake_case stays"), ["snake_case", "stays"]);
        assert!(extract_words("... !!!").is_empty());
    }

    #[test]
    fn collapses_four_letter_dotted_pattern() {
        assert_eq!(extract_words("f.u.c.k"), ["fuck"]);
        assert_eq!(extract_words("say F.U.C.K loudly"), ["say", "fuck", "loudly"]);
    }

    #[test]
    fn collapses_three_letter_dotted_pattern() {
        assert_eq!(extract_words("a.s.s"), ["ass"]);
    }

    #[test]
    fn four_letter_pattern_wins_over_three() {
        // "a.b.c.d.e" consumes the 4-letter prefix; the leftover ".e" is
        // too short for the 3-letter pattern.
        assert_eq!(extract_words("a.b.c.d.e"), ["abcd", "e"]);
    }

    #[test]
    fn dotted_patterns_require_single_letters() {
        assert_eq!(extract_words("e.g."), ["e", "g"]);
        assert_eq!(extract_words("ab.cd.ef"), ["ab", "cd", "ef"]);
    }
}
