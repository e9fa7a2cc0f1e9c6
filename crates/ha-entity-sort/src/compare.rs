//! Value comparator
//!
//! `compare` orders two extracted values under a set of [`CompareOptions`].
//! The steps run in a fixed order:
//!
//! 1. case folding of text (`ignore_case`)
//! 2. numeric coercion (`numeric`), applied when at least one side parses
//! 3. missing values: sort last, or first when `reverse` is set
//! 4. two numbers (or two instants) compare by magnitude
//! 5. `ip`: dotted quads compare octet by octet
//! 6. everything else compares as collated text
//!
//! Every branch flips with `reverse`, the missing-value rule included, so a
//! reversed sort is the exact mirror of the forward one.

use std::cmp::Ordering;

use crate::collate::collate;
use crate::value::SortValue;

/// Flags controlling a single value comparison
///
/// Derived from a `SortSpec` for each comparison; strategies that need
/// different flags build a modified copy rather than touching the spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    pub reverse: bool,
    pub ignore_case: bool,
    pub numeric: bool,
    pub ip: bool,
}

impl CompareOptions {
    /// Copy of these options with numeric coercion forced on
    pub fn with_numeric(self) -> Self {
        Self {
            numeric: true,
            ..self
        }
    }

    /// Ordering when only the left side is missing
    pub(crate) fn left_missing(&self) -> Ordering {
        if self.reverse {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// Ordering when only the right side is missing
    pub(crate) fn right_missing(&self) -> Ordering {
        self.left_missing().reverse()
    }

    /// Null-ordering rule for two optional sides
    ///
    /// `Err` carries the decided ordering when at least one side is absent;
    /// `Ok` hands both present sides back.
    pub(crate) fn order_missing<A, B>(
        &self,
        a: Option<A>,
        b: Option<B>,
    ) -> Result<(A, B), Ordering> {
        match (a, b) {
            (Some(a), Some(b)) => Ok((a, b)),
            (None, None) => Err(Ordering::Equal),
            (None, Some(_)) => Err(self.left_missing()),
            (Some(_), None) => Err(self.right_missing()),
        }
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        if self.reverse {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Compare two values under `options`
pub fn compare(a: SortValue<'_>, b: SortValue<'_>, options: &CompareOptions) -> Ordering {
    let (mut a, mut b) = (a, b);

    if options.ignore_case {
        a = a.fold_case();
        b = b.fold_case();
    }

    if options.numeric {
        let (na, nb) = (a.to_number(), b.to_number());
        // A side that fails to parse becomes missing only when the other
        // side did parse; when neither parses both keep their text.
        if na.is_some() || nb.is_some() {
            a = na.map_or(SortValue::Missing, SortValue::Number);
            b = nb.map_or(SortValue::Missing, SortValue::Number);
        }
    }

    match (&a, &b) {
        (SortValue::Missing, SortValue::Missing) => return Ordering::Equal,
        (SortValue::Missing, _) => return options.left_missing(),
        (_, SortValue::Missing) => return options.right_missing(),
        (SortValue::Number(x), SortValue::Number(y)) => {
            if x == y {
                return Ordering::Equal;
            }
            let ord = if x < y {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            return options.directed(ord);
        }
        (SortValue::Instant(x), SortValue::Instant(y)) => return options.directed(x.cmp(y)),
        _ => {}
    }

    if options.ip {
        return options.directed(compare_ip(&a.to_string(), &b.to_string()));
    }

    options.directed(collate(&a.to_string(), &b.to_string(), options.numeric))
}

/// Octet-wise comparison of two dotted quads
///
/// Exactly four positions are compared, in order, each as a plain numeric
/// comparison (never reversed). An absent or unparsable octet is a missing
/// value and sorts after a present one. The first unequal octet decides.
fn compare_ip(a: &str, b: &str) -> Ordering {
    const OCTET: CompareOptions = CompareOptions {
        reverse: false,
        ignore_case: false,
        numeric: true,
        ip: false,
    };

    let mut left = a.split('.');
    let mut right = b.split('.');

    for _ in 0..4 {
        let octet_a = SortValue::from_opt_str(left.next());
        let octet_b = SortValue::from_opt_str(right.next());
        let ord = compare(octet_a, octet_b, &OCTET);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> CompareOptions {
        CompareOptions::default()
    }

    fn cmp_str(a: &str, b: &str, options: CompareOptions) -> Ordering {
        compare(SortValue::text(a), SortValue::text(b), &options)
    }

    #[test]
    fn test_numeric_coercion_changes_order() {
        let numeric = opts().with_numeric();
        assert_eq!(cmp_str("10", "9", numeric), Ordering::Greater);
        assert_eq!(cmp_str("10", "9", opts()), Ordering::Less);
    }

    #[test]
    fn test_ignore_case() {
        let options = CompareOptions {
            ignore_case: true,
            ..opts()
        };
        assert_eq!(cmp_str("Alpha", "alpha", options), Ordering::Equal);
        assert_ne!(cmp_str("Alpha", "alpha", opts()), Ordering::Equal);
    }

    #[test]
    fn test_missing_sorts_last_then_first_when_reversed() {
        let ord = compare(SortValue::Missing, SortValue::text("x"), &opts());
        assert_eq!(ord, Ordering::Greater);

        let reversed = CompareOptions {
            reverse: true,
            ..opts()
        };
        let ord = compare(SortValue::Missing, SortValue::text("x"), &reversed);
        assert_eq!(ord, Ordering::Less);

        assert_eq!(
            compare(SortValue::Missing, SortValue::Missing, &reversed),
            Ordering::Equal
        );
    }

    #[test]
    fn test_reverse_numbers_and_text() {
        let reversed = CompareOptions {
            reverse: true,
            ..opts()
        };
        assert_eq!(
            compare(SortValue::Number(1.0), SortValue::Number(2.0), &reversed),
            Ordering::Greater
        );
        assert_eq!(cmp_str("a", "b", reversed), Ordering::Greater);
    }

    #[test]
    fn test_numbers_compare_by_magnitude_without_flag() {
        assert_eq!(
            compare(SortValue::Number(100.0), SortValue::Number(20.0), &opts()),
            Ordering::Greater
        );
    }

    #[test]
    fn test_one_sided_parse_failure_makes_that_side_missing() {
        // "unavailable" does not parse while "3" does: the failing side is
        // treated as missing and sorts after the number.
        let numeric = opts().with_numeric();
        assert_eq!(cmp_str("unavailable", "3", numeric), Ordering::Greater);
        assert_eq!(cmp_str("3", "unavailable", numeric), Ordering::Less);
    }

    #[test]
    fn test_both_sides_unparsable_keep_text() {
        let numeric = opts().with_numeric();
        assert_eq!(cmp_str("off", "on", numeric), Ordering::Less);
        assert_eq!(cmp_str("zone 10", "zone 9", numeric), Ordering::Greater);
    }

    #[test]
    fn test_ip_octets_compare_numerically() {
        let ip = CompareOptions { ip: true, ..opts() };
        assert_eq!(cmp_str("10.0.0.2", "10.0.0.10", ip), Ordering::Less);
        assert_eq!(cmp_str("10.0.0.2", "10.0.0.10", opts()), Ordering::Greater);
        assert_eq!(cmp_str("192.168.1.1", "192.168.1.1", ip), Ordering::Equal);
        assert_eq!(cmp_str("9.255.255.255", "10.0.0.0", ip), Ordering::Less);
    }

    #[test]
    fn test_ip_reverse() {
        let ip = CompareOptions {
            ip: true,
            reverse: true,
            ..opts()
        };
        assert_eq!(cmp_str("10.0.0.2", "10.0.0.10", ip), Ordering::Greater);
    }

    #[test]
    fn test_ip_malformed_octets_sort_last() {
        let ip = CompareOptions { ip: true, ..opts() };
        assert_eq!(cmp_str("10.0.0", "10.0.0.1", ip), Ordering::Greater);
        assert_eq!(cmp_str("10.0.x.1", "10.0.0.1", ip), Ordering::Greater);
        assert_eq!(cmp_str("host", "10.0.0.1", ip), Ordering::Greater);
    }

    #[test]
    fn test_numeric_takes_precedence_over_ip() {
        // Both quads parse as the number 10, so the numeric path decides.
        let both = CompareOptions {
            ip: true,
            numeric: true,
            ..opts()
        };
        assert_eq!(cmp_str("10.0.0.2", "10.0.0.10", both), Ordering::Equal);
    }

    #[test]
    fn test_instants() {
        let early = chrono::DateTime::from_timestamp(1_000, 0).unwrap();
        let late = chrono::DateTime::from_timestamp(2_000, 0).unwrap();
        assert_eq!(
            compare(SortValue::Instant(early), SortValue::Instant(late), &opts()),
            Ordering::Less
        );
        assert_eq!(
            compare(
                SortValue::Instant(early),
                SortValue::Instant(late),
                &opts().with_numeric()
            ),
            Ordering::Less
        );
    }

    #[test]
    fn test_reflexive_and_antisymmetric() {
        let values = ["b", "A", "a", "10", "9", "10.0.0.1", "", "x y"];
        let flag_sets = [
            opts(),
            opts().with_numeric(),
            CompareOptions { ip: true, ..opts() },
            CompareOptions {
                ignore_case: true,
                reverse: true,
                ..opts()
            },
        ];
        for options in flag_sets {
            for a in values {
                assert_eq!(cmp_str(a, a, options), Ordering::Equal, "{a:?} {options:?}");
                for b in values {
                    assert_eq!(
                        cmp_str(a, b, options),
                        cmp_str(b, a, options).reverse(),
                        "{a:?} vs {b:?} with {options:?}"
                    );
                    let flipped = CompareOptions {
                        reverse: !options.reverse,
                        ..options
                    };
                    assert_eq!(cmp_str(a, b, flipped), cmp_str(a, b, options).reverse());
                }
            }
        }
    }
}
