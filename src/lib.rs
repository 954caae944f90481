//! wordwash is a rule-based profanity filter for chat messages.
//!
//! Detection runs a staged pipeline over word and phrase rules: directed
//! insult phrases, trusted context phrases, known-safe words (the
//! "Scunthorpe problem"), then exact, leet-normalized, and compound word
//! matches. Censoring masks offending tokens with `*` while leaving mildly
//! flagged words alone.
//!
//! The crate-level functions and the [`FilterStr`] trait use a process-wide
//! default rule set, loaded once on first use from an embedded rule
//! document. Custom rules can be supplied through [`RuleSet`] and
//! [`Detector`].

use lazy_static::lazy_static;

mod detector;
mod normalize;
mod rules;

pub use detector::{Detection, Detector};
pub use rules::{RuleError, RuleSet};

lazy_static! {
    static ref DEFAULT_RULES: RuleSet =
        RuleSet::load_or_fallback(include_str!("default_rules.json"));
}

/// Returns the process-wide default rule set, loading it on first use.
///
/// Initialization happens exactly once, even under concurrent first use; no
/// caller can observe a partially built set. If the embedded rule document
/// is malformed, a minimal hardcoded fallback is substituted and a warning
/// is logged. This function never fails.
pub fn default_rules() -> &'static RuleSet {
    &DEFAULT_RULES
}

/// Classifies `text` against the default rule set.
/// See [`Detector::check`].
pub fn check(text: &str) -> Detection {
    Detector::new(default_rules()).check(text)
}

/// Censors `text` against the default rule set.
/// See [`Detector::sanitize`].
pub fn sanitize(text: &str) -> String {
    Detector::new(default_rules()).sanitize(text)
}

/// Sanitizes `text` against the default rule set, invoking `on_filtered`
/// with a diagnostic line only when censoring changed the text. Returns the
/// sanitized text and whether it changed.
/// See [`Detector::process_message`].
pub fn process_message<F: FnOnce(&str)>(text: &str, on_filtered: F) -> (String, bool) {
    Detector::new(default_rules()).process_message(text, on_filtered)
}

/// FilterStr makes it easy to check or censor a `&str` against the default
/// rule set.
pub trait FilterStr: Sized {
    /// Returns `true` if the text is classified profane.
    fn is_profane(self) -> bool;

    /// The output is a newly allocated string with profane tokens masked.
    fn sanitize(self) -> String;
}

impl FilterStr for &str {
    fn is_profane(self) -> bool {
        crate::check(self).profane
    }

    fn sanitize(self) -> String {
        crate::sanitize(self)
    }
}


use doc_comment::doctest;
doctest!("../README.md");
