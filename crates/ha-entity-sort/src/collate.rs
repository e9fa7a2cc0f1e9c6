//! Locale-style string collation
//!
//! Approximates the default Unicode collation order used by browsers for
//! `localeCompare`. Both strings are decomposed (NFD) first, then compared
//! in passes:
//!
//! 1. primary: base characters, case-insensitive, with whitespace before
//!    punctuation before digits before letters
//! 2. secondary: accents (`e` < `é`)
//! 3. tertiary: case (lowercase first)
//!
//! Canonically equivalent strings compare equal; any other pair is ordered
//! by decomposed code points as a last resort so the order stays total.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compare two strings in collation order
///
/// With `numeric` set, runs of ASCII digits compare by their numeric value
/// (`"item 9" < "item 10"`).
pub fn collate(a: &str, b: &str, numeric: bool) -> Ordering {
    let left = Decomposed::new(a);
    let right = Decomposed::new(b);

    primary(&left.bases, &right.bases, numeric)
        .then_with(|| left.marks.cmp(&right.marks))
        .then_with(|| tertiary(&left.bases, &right.bases))
        .then_with(|| a.nfd().cmp(b.nfd()))
}

/// A string split into its base characters and the combining marks
/// attached to each of them
struct Decomposed {
    bases: String,
    marks: Vec<String>,
}

impl Decomposed {
    fn new(s: &str) -> Self {
        let mut bases = String::with_capacity(s.len());
        let mut marks: Vec<String> = Vec::new();

        for c in s.nfd() {
            match marks.last_mut() {
                Some(last) if is_combining_mark(c) => last.push(c),
                // A leading mark has nothing to attach to and counts as a base
                _ => {
                    bases.push(c);
                    marks.push(String::new());
                }
            }
        }

        Self { bases, marks }
    }
}

/// Coarse grouping of characters, ordered as collation orders them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Whitespace,
    Punctuation,
    Digit,
    Letter,
}

fn class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_numeric() {
        CharClass::Digit
    } else if c.is_alphabetic() {
        CharClass::Letter
    } else {
        CharClass::Punctuation
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn primary(a: &str, b: &str, numeric: bool) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if numeric && x.is_ascii_digit() && y.is_ascii_digit() {
                    let ord = digit_run(&mut left).cmp_numeric(&digit_run(&mut right));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    continue;
                }

                let ord = (class_of(x), fold(x)).cmp(&(class_of(y), fold(y)));
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

/// First case difference decides: lowercase sorts before uppercase
fn tertiary(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y && fold(*x) == fold(*y))
        .map_or(Ordering::Equal, |(x, _)| {
            if x.is_lowercase() {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        })
}

struct DigitRun(String);

impl DigitRun {
    fn cmp_numeric(&self, other: &DigitRun) -> Ordering {
        let a = self.0.trim_start_matches('0');
        let b = other.0.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> DigitRun {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    DigitRun(run)
}
