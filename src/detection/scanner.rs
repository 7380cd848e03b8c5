//! Query scanner
//!
//! Walks the lowercased query left to right looking for a numeric literal
//! followed, after optional whitespace, by a unit variant. Everything else
//! is skipped. The scan never fails: a query with nothing recognisable
//! yields no occurrences.
//!
//! Only plain non-negative integers count as amounts. A literal followed by
//! `.` or `,` and more digits reads as a decimal and is skipped whole, so
//! digit-grouped amounts such as `1,000 gb` are skipped as well. A `-`
//! that opens a word is a sign, so `-5gb` is skipped; a hyphen inside a
//! word is not, so `usb-64gb` still yields `64 gb`.

use super::occurrence::QuantityOccurrence;
use crate::units::{Catalogue, VariantEntry};
use tracing::trace;

/// Scans query strings against a catalogue
#[derive(Clone, Copy, Debug)]
pub struct Scanner<'a> {
    catalogue: &'a Catalogue,
}

/// A numeric literal found in the query
struct Literal {
    /// None for fractional literals and values that overflow `u64`
    amount: Option<u64>,
    end: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(catalogue: &'a Catalogue) -> Self {
        Self { catalogue }
    }

    /// Detect quantity occurrences in scan order
    pub fn scan(&self, query: &str) -> Vec<QuantityOccurrence<'a>> {
        let catalogue: &'a Catalogue = self.catalogue;
        let chars: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
        let mut occurrences = Vec::new();
        let mut pos = 0;

        while pos < chars.len() {
            if !starts_literal(&chars, pos) {
                pos += 1;
                continue;
            }

            let literal = read_literal(&chars, pos);
            let negative = is_negative(&chars, pos);
            pos = literal.end;

            let Some(amount) = literal.amount.filter(|_| !negative) else {
                continue;
            };

            let unit_start = skip_whitespace(&chars, literal.end);
            if let Some(entry) = self.match_variant(&chars, unit_start) {
                let (field, unit) = catalogue.resolve(entry);
                trace!(
                    "Detected {} {} for field {}",
                    amount,
                    unit.name(),
                    field.name()
                );
                occurrences.push(QuantityOccurrence::new(field.name(), amount, unit));
                pos = unit_start + entry.chars.len();
            }
        }

        occurrences
    }

    /// Longest variant matching at `start`; ties resolve in declaration order
    fn match_variant(&self, chars: &[char], start: usize) -> Option<&'a VariantEntry> {
        let catalogue: &'a Catalogue = self.catalogue;
        catalogue.variant_table().iter().find(|entry| {
            let end = start + entry.chars.len();
            end <= chars.len()
                && chars[start..end] == entry.chars[..]
                && ends_on_boundary(&entry.chars, chars.get(end).copied())
        })
    }
}

/// A literal starts at a digit that does not continue a word or a number
fn starts_literal(chars: &[char], pos: usize) -> bool {
    if !chars[pos].is_ascii_digit() {
        return false;
    }
    match pos.checked_sub(1).map(|prev| chars[prev]) {
        Some(prev) => !(prev.is_alphanumeric() || prev == '.' || prev == ','),
        None => true,
    }
}

/// A `-` right before the literal is a sign unless it joins two words
fn is_negative(chars: &[char], start: usize) -> bool {
    match start.checked_sub(1) {
        Some(sign) if chars[sign] == '-' => match sign.checked_sub(1) {
            Some(prev) => !chars[prev].is_alphanumeric(),
            None => true,
        },
        _ => false,
    }
}

fn read_literal(chars: &[char], start: usize) -> Literal {
    let end = skip_digits(chars, start);
    let digits: String = chars[start..end].iter().collect();

    let has_fraction = matches!(chars.get(end).copied(), Some('.') | Some(','))
        && chars.get(end + 1).map(char::is_ascii_digit).unwrap_or(false);
    if has_fraction {
        return Literal {
            amount: None,
            end: skip_digits(chars, end + 1),
        };
    }

    Literal {
        amount: digits.parse().ok(),
        end,
    }
}

fn skip_digits(chars: &[char], mut pos: usize) -> usize {
    while chars.get(pos).map(char::is_ascii_digit).unwrap_or(false) {
        pos += 1;
    }
    pos
}

fn skip_whitespace(chars: &[char], mut pos: usize) -> usize {
    while chars.get(pos).map(|c| c.is_whitespace()).unwrap_or(false) {
        pos += 1;
    }
    pos
}

/// A variant ending in a letter or digit must not run into the next word
fn ends_on_boundary(variant: &[char], next: Option<char>) -> bool {
    match variant.last() {
        Some(last) if last.is_alphanumeric() => !next.map(char::is_alphanumeric).unwrap_or(false),
        _ => true,
    }
}
