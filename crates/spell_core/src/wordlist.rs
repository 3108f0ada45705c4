//! Dictionary helpers: reading word lists, splitting them for evaluation,
//! and measuring how many words a filter accepts.
use crate::errors::{Result, SpellError};
use crate::filter::BloomFilter;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// One token per line; surrounding whitespace trimmed, blank lines skipped.
pub fn read_words<R: BufRead>(r: R) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for line in r.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            out.push(word.to_string());
        }
    }
    Ok(out)
}

pub fn read_words_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    read_words(BufReader::new(File::open(path)?))
}

pub fn write_words<W: Write>(w: &mut W, words: &[String]) -> Result<()> {
    for word in words {
        writeln!(w, "{word}")?;
    }
    Ok(())
}

#[inline]
pub fn normalize(word: &str) -> String {
    word.to_lowercase()
}

/// Shuffles `words` and splits them into (training, testing), with
/// `floor(len * train_ratio)` words in the training half.
pub fn split_words<R: Rng + ?Sized>(
    mut words: Vec<String>,
    train_ratio: f64,
    rng: &mut R,
) -> Result<(Vec<String>, Vec<String>)> {
    if !(0.0..=1.0).contains(&train_ratio) {
        return Err(SpellError::invalid(format!("train ratio {train_ratio} is outside [0, 1]")));
    }
    words.shuffle(rng);
    let cut = (words.len() as f64 * train_ratio) as usize;
    let testing = words.split_off(cut);
    Ok((words, testing))
}

/// Fraction of `words` the filter reports as possibly present; 0.0 for no words.
pub fn positive_rate<S: AsRef<str>>(filter: &BloomFilter, words: &[S]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let hits = words
        .iter()
        .filter(|w| {
            let w: &str = (*w).as_ref();
            filter.check(w)
        })
        .count();
    hits as f64 / words.len() as f64
}
