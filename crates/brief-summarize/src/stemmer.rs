//! Suffix-stripping stemmer for summary terms.
//!
//! Rule order is fixed: `ing`/`ers`, then `ed`/`es`, then a trailing `s`.
//! A rule only applies when more than three characters remain.

const RULES: &[(&[&str], usize)] = &[(&["ing", "ers"], 3), (&["ed", "es"], 2), (&["s"], 1)];

/// Stem a lowercase token. Tokens of four characters or fewer pass through.
pub fn stem(token: &str) -> String {
    let len = token.chars().count();
    if len <= 4 {
        return token.to_string();
    }

    for &(suffixes, cut) in RULES {
        if len - cut > 3 && suffixes.iter().any(|s| token.ends_with(s)) {
            return token[..token.len() - cut].to_string();
        }
    }

    token.to_string()
}
