//! Splitting raw text into normalized words.

/// How the input is cut into raw tokens before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Split on runs of whitespace and drop tokens that normalize to nothing.
    #[default]
    Whitespace,
    /// Split on every single `' '`. Consecutive spaces yield the empty word.
    SingleSpace,
}

/// Normalize one raw token: trim, lowercase, drop every `.`.
pub fn normalize(raw: &str) -> String {
    let word = raw.trim().to_lowercase().replace('.', "");
    // ". word" leaves a leading space once the dot is gone
    word.trim().to_string()
}

/// Lazily yield the normalized tokens of `text` in positional order.
pub fn tokenize(text: &str, mode: SplitMode) -> Box<dyn Iterator<Item = String> + '_> {
    match mode {
        SplitMode::Whitespace => Box::new(
            text.split_whitespace()
                .map(normalize)
                .filter(|w| !w.is_empty()),
        ),
        SplitMode::SingleSpace => Box::new(text.split(' ').map(normalize)),
    }
}
