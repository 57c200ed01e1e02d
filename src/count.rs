//! The offline `count` subcommand.

use std::io::{self, Read, Write};

use crate::rank::Analysis;

/// `text` when given, otherwise everything `input` yields.
pub fn read_text<R: Read>(text: Option<String>, mut input: R) -> io::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            input.read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Write `word: count` lines for the first `top` ranked entries.
pub fn write_top<W: Write>(
    out: &mut W,
    text: &str,
    top: usize,
    analysis: &Analysis,
) -> io::Result<()> {
    for entry in analysis.rank_text(text).into_iter().take(top) {
        writeln!(out, "{}: {}", entry.word, entry.count)?;
    }
    Ok(())
}
