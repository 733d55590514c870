//! Message cleaning and sentence splitting.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Placeholder that replaces every URL.
pub const LINK_PLACEHOLDER: &str = "[link]";

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`\n]*`").unwrap());
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap());
static USER_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"<@!?\d+>").unwrap());
static ROLE_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"<@&\d+>").unwrap());
static CHANNEL_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"<#\d+>").unwrap());
static BROADCAST_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(?:everyone|here)\b").unwrap());

/// Strip code and quotes, replace links and mentions with placeholders.
pub fn clean_message(content: &str) -> String {
    let without_fences = FENCED_CODE.replace_all(content, " ");
    let unquoted: Vec<&str> = without_fences
        .lines()
        .filter(|line| !line.trim_start().starts_with('>'))
        .collect();
    let text = unquoted.join("\n");

    let text = INLINE_CODE.replace_all(&text, " ");
    let text = URL.replace_all(&text, |caps: &Captures| {
        let url = &caps[0];
        let kept = url.trim_end_matches(is_url_trailer);
        format!("{}{}", LINK_PLACEHOLDER, &url[kept.len()..])
    });
    let text = ROLE_MENTION.replace_all(&text, "a role");
    let text = USER_MENTION.replace_all(&text, "someone");
    let text = CHANNEL_MENTION.replace_all(&text, "a channel");
    let text = BROADCAST_MENTION.replace_all(&text, "everyone");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Punctuation that closes the surrounding sentence rather than the URL.
fn is_url_trailer(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ')' | ';' | ':')
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split on `.`, `!` and `?`, keeping the delimiter run with its sentence.
///
/// A run only ends a sentence when followed by whitespace or the end of the
/// text, so decimals like `3.5` stay intact.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if !is_terminal(c) {
            continue;
        }
        while let Some(&next) = chars.peek() {
            if !is_terminal(next) {
                break;
            }
            current.push(next);
            chars.next();
        }
        if chars.peek().map_or(true, |n| n.is_whitespace()) {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_code_and_quotes() {
        let raw = "> quoted reply\nSee this:\n```rust\nfn main() {}\n```\nand run `cargo x` now";
        assert_eq!(clean_message(raw), "See this: and run now");
    }

    #[test]
    fn test_replaces_links_and_mentions() {
        let raw = "<@123> and <@!456> check https://example.com/a?b=1 in <#789> cc <@&42> @here";
        assert_eq!(
            clean_message(raw),
            "someone and someone check [link] in a channel cc a role everyone"
        );
    }

    #[test]
    fn test_link_keeps_sentence_punctuation() {
        let cleaned = clean_message("see https://x.io. Next step (docs at www.y.io/a?b=1), ok?!");
        assert_eq!(cleaned, "see [link]. Next step (docs at [link]), ok?!");
        assert_eq!(
            split_sentences(&cleaned),
            vec!["see [link].", "Next step (docs at [link]), ok?!"]
        );
    }

    #[test]
    fn test_split_sentences_keeps_delimiters() {
        let parts = split_sentences("Ship it. Really?! Version 3.5 is out");
        assert_eq!(parts, vec!["Ship it.", "Really?!", "Version 3.5 is out"]);
    }

    #[test]
    fn test_split_sentences_drops_empties() {
        assert!(split_sentences("   ").is_empty());
        assert_eq!(split_sentences("Done."), vec!["Done."]);
    }
}
