// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Deterministic normalization of raw Unicode strings, applied identically
//! at index-build time and at query time.
//!
//! Pipeline, applied in order (the order is load-bearing, see the original
//! ICU rule chain this was ported from): accent fold, quote substitution,
//! punctuation removal, script-to-Latin, lowercase fold.

use unicode_normalization::UnicodeNormalization;

/// Curly/typographic quote characters folded to ASCII `'`.
const QUOTE_CHARS: &[char] = &['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{00B4}', '\u{0060}'];

/// Dash-like characters folded to a space, matching the original's
/// "dashes become spaces" rule (a dash is a word separator, not a
/// character to drop outright - dropping it would glue adjacent words).
const DASH_CHARS: &[char] = &['-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}'];

/// Punctuation removed outright (stripped, not replaced by a space).
const PUNCTUATION_CHARS: &[char] = &['.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{', '}', '/', '\\', '"'];

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32,
        0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F)
}

/// A pure function from raw string to normalized string. Stateless: the
/// rule set is fixed at compile time, so a value of this type carries no
/// configuration, but it exists as a type so call sites document which
/// normalization is being applied rather than calling free functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transliterator;

impl Transliterator {
    pub fn new() -> Self {
        Transliterator
    }

    /// Runs the full pipeline. Idempotent: `transliterate(transliterate(s))
    /// == transliterate(s)`, since every stage maps its output alphabet
    /// (ASCII lowercase + space + digits) to a fixed point of itself.
    pub fn transliterate(&self, input: &str) -> String {
        let accent_folded = Self::fold_accents(input);
        let unquoted = Self::fold_quotes(&accent_folded);
        let unpunctuated = Self::strip_punctuation(&unquoted);
        let latinized = Self::script_to_latin(&unpunctuated);
        latinized.to_lowercase()
    }

    /// Stage 1: Unicode NFD decomposition followed by removal of combining
    /// marks, i.e. accent/diacritic stripping ("NFD; [:M:] Remove;" from
    /// the original ICU rule string; recomposition is unnecessary here
    /// since we strip the marks rather than keep them).
    fn fold_accents(input: &str) -> String {
        input.nfd().filter(|c| !is_combining_mark(*c)).collect()
    }

    /// Stage 2: curly/typographic quotes to ASCII, dashes to spaces.
    fn fold_quotes(input: &str) -> String {
        input
            .chars()
            .map(|c| {
                if QUOTE_CHARS.contains(&c) {
                    '\''
                } else if DASH_CHARS.contains(&c) {
                    ' '
                } else {
                    c
                }
            })
            .collect()
    }

    /// Stage 3: drop a fixed punctuation set outright.
    fn strip_punctuation(input: &str) -> String {
        input.chars().filter(|c| !PUNCTUATION_CHARS.contains(c)).collect()
    }

    /// Stage 4: script transliteration to Latin for non-Latin scripts
    /// (Arabic, Cyrillic, Greek, CJK, Hebrew, Thai, ...). `deunicode`
    /// covers the same script set the original ICU translist names,
    /// mapping each non-Latin codepoint to its closest ASCII spelling.
    fn script_to_latin(input: &str) -> String {
        if input.is_ascii() {
            return input.to_string();
        }
        deunicode::deunicode(input)
    }
}
