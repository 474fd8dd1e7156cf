//! Splitting long text into passages short enough for one synthesis call

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PARAGRAPH_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n+").expect("valid regex"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static CURLY_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{201C}\u{201D}]").expect("valid regex"));
static PUNCTUATION_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\.,;:!?]*$").expect("valid regex"));

/// How long-form text is cut into passages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// One passage per non-blank line
    Newline,
    /// Sentence-aware recombination, see [`split_and_recombine_text`]
    Auto,
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::Auto
    }
}

impl std::str::FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newline" | "yes" => Ok(SplitMode::Newline),
            "auto" | "no" => Ok(SplitMode::Auto),
            _ => Err(format!("Unknown split mode: {}", s)),
        }
    }
}

/// Target and hard limit, in characters, for heuristic passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitLengths {
    #[serde(default = "default_desired_length")]
    pub desired: usize,
    #[serde(default = "default_max_length")]
    pub max: usize,
}

fn default_desired_length() -> usize {
    200
}

fn default_max_length() -> usize {
    300
}

impl Default for SplitLengths {
    fn default() -> Self {
        Self {
            desired: default_desired_length(),
            max: default_max_length(),
        }
    }
}

/// Cut `text` into ordered passages.
pub fn split_passages(text: &str, mode: SplitMode, lengths: SplitLengths) -> Vec<String> {
    match mode {
        SplitMode::Newline => split_by_newline(text),
        SplitMode::Auto => split_and_recombine_text(text, lengths.desired, lengths.max),
    }
}

/// One passage per line, blank lines dropped.
pub fn split_by_newline(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

struct Cursor<'a> {
    text: &'a [char],
    pos: isize,
    in_quote: bool,
    current: Vec<char>,
}

impl Cursor<'_> {
    fn end_pos(&self) -> isize {
        self.text.len() as isize - 1
    }

    fn char_at(&self, pos: isize) -> char {
        self.text[pos as usize]
    }

    /// Move by `delta` characters, growing or shrinking the current passage.
    fn seek(&mut self, delta: isize) -> char {
        for _ in 0..delta.unsigned_abs() {
            if delta < 0 {
                self.pos -= 1;
                self.current.pop();
            } else {
                self.pos += 1;
                self.current.push(self.char_at(self.pos));
            }
            if self.char_at(self.pos) == '"' {
                self.in_quote = !self.in_quote;
            }
        }
        self.char_at(self.pos)
    }

    /// `None` past the second to last character.
    fn peek(&self, delta: isize) -> Option<char> {
        let p = self.pos + delta;
        (p >= 0 && p < self.end_pos()).then(|| self.char_at(p))
    }

    fn take(&mut self) -> String {
        std::mem::take(&mut self.current).into_iter().collect()
    }
}

/// A missing character counts as a member of every set.
fn peeked_in(c: Option<char>, set: &str) -> bool {
    c.is_none_or(|c| set.contains(c))
}

/// Split text at sentence boundaries and recombine sentences into passages
/// close to `desired_length` characters, never longer than `max_length`.
///
/// Boundaries inside double quotes are ignored, and a closing quote followed
/// by whitespace counts as a boundary. A passage that hits `max_length`
/// without any boundary is cut at the last space. Passages consisting only
/// of whitespace or punctuation are dropped.
pub fn split_and_recombine_text(
    text: &str,
    desired_length: usize,
    max_length: usize,
) -> Vec<String> {
    let text = PARAGRAPH_BREAKS.replace_all(text, "\n");
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    let text = CURLY_QUOTES.replace_all(&text, "\"");
    let chars: Vec<char> = text.chars().collect();

    let mut cursor = Cursor {
        text: &chars,
        pos: -1,
        in_quote: false,
        current: Vec::new(),
    };
    let mut passages = Vec::new();
    let mut split_pos: Vec<isize> = Vec::new();

    while cursor.pos < cursor.end_pos() {
        let mut c = cursor.seek(1);

        if cursor.current.len() >= max_length {
            if let Some(&last_split) = split_pos.last()
                && cursor.current.len() > desired_length / 2
            {
                let back = cursor.pos - last_split;
                cursor.seek(-back);
            } else {
                while !"!?.\n ".contains(c)
                    && cursor.pos > 0
                    && cursor.current.len() > desired_length
                {
                    c = cursor.seek(-1);
                }
            }
            passages.push(cursor.take());
            split_pos.clear();
        } else if !cursor.in_quote
            && ("!?\n".contains(c) || (c == '.' && peeked_in(cursor.peek(1), "\n ")))
        {
            // swallow runs like "?!" or "..." into the same sentence
            while cursor.pos < cursor.end_pos()
                && cursor.current.len() < max_length
                && peeked_in(cursor.peek(1), "!?.")
            {
                cursor.seek(1);
            }
            split_pos.push(cursor.pos);
            if cursor.current.len() >= desired_length {
                passages.push(cursor.take());
                split_pos.clear();
            }
        } else if cursor.in_quote
            && cursor.peek(1) == Some('"')
            && peeked_in(cursor.peek(2), "\n ")
        {
            cursor.seek(2);
            split_pos.push(cursor.pos);
        }
    }
    passages.push(cursor.take());

    passages
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty() && !PUNCTUATION_ONLY.is_match(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_by_newline_drops_blank_lines() {
        assert_eq!(split_by_newline("a\nb\n\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_by_newline("one\r\n  \r\ntwo"), vec!["one", "two"]);
        assert!(split_by_newline("\n\n").is_empty());
    }

    #[test]
    fn test_split_mode_dispatch() {
        let text = "First line.\nSecond line.";
        assert_eq!(
            split_passages(text, SplitMode::Newline, SplitLengths::default()),
            vec!["First line.", "Second line."]
        );
        // heuristic mode folds short sentences into one passage
        assert_eq!(
            split_passages(text, SplitMode::Auto, SplitLengths::default()),
            vec!["First line. Second line."]
        );
    }

    #[test]
    fn test_split_mode_from_str() {
        assert_eq!("Yes".parse::<SplitMode>().unwrap(), SplitMode::Newline);
        assert_eq!("no".parse::<SplitMode>().unwrap(), SplitMode::Auto);
        assert!("maybe".parse::<SplitMode>().is_err());
    }

    #[test]
    fn test_short_text_single_passage() {
        assert_eq!(
            split_and_recombine_text("Hello world. How are you?", 200, 300),
            vec!["Hello world. How are you?"]
        );
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert!(split_and_recombine_text("", 200, 300).is_empty());
        assert!(split_and_recombine_text(" ... !? ", 200, 300).is_empty());
    }

    #[test]
    fn test_long_text_respects_max_length() {
        let sentence = "The quick brown fox jumps over the lazy dog. ";
        let text = sentence.repeat(40);
        let passages = split_and_recombine_text(&text, 200, 300);

        assert!(passages.len() > 1);
        for passage in &passages {
            assert!(passage.chars().count() <= 300, "too long: {}", passage.len());
            assert!(passage.ends_with('.'));
        }
        let rejoined: String = passages.join(" ");
        assert_eq!(rejoined, text.trim());
    }

    #[test]
    fn test_no_punctuation_cuts_at_space() {
        let text = "word ".repeat(150);
        let passages = split_and_recombine_text(&text, 200, 300);

        assert!(passages.len() > 1);
        for passage in &passages {
            assert!(passage.chars().count() <= 300);
            assert!(passage.split(' ').all(|w| w == "word"));
        }
    }

    #[test]
    fn test_curly_quotes_and_whitespace_normalized() {
        let passages = split_and_recombine_text("He said \u{201C}hi.\u{201D}\n\n\nThen   left.", 200, 300);
        assert_eq!(passages, vec!["He said \"hi.\" Then left."]);
    }
}
