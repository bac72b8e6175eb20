//! Random password generation.
//!
//! Characters are drawn uniformly from the union of the enabled classes
//! using an OS-seeded CSPRNG.  A draw that misses an enabled class is
//! discarded and redrawn a bounded number of times; after that the
//! missing classes are patched in deterministically.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Shortest password `generate` will produce.
pub const MIN_LENGTH: usize = 4;

/// Longest password `generate` will produce.
pub const MAX_LENGTH: usize = 128;

/// Redraws attempted before falling back to patching.
const MAX_RETRIES: usize = 10;

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?";

// Without I, O, l, 0 and 1.
const UPPER_UNAMBIGUOUS: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWER_UNAMBIGUOUS: &str = "abcdefghijkmnopqrstuvwxyz";
const DIGITS_UNAMBIGUOUS: &str = "23456789";

/// Which character classes a generated password draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    /// Drop look-alike glyphs such as `0/O` and `1/l/I`.
    pub exclude_ambiguous: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

impl GenerateOptions {
    /// The character set of every enabled class, in a fixed order.
    fn classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::with_capacity(4);
        if self.uppercase {
            classes.push(if self.exclude_ambiguous {
                UPPER_UNAMBIGUOUS
            } else {
                UPPER
            });
        }
        if self.lowercase {
            classes.push(if self.exclude_ambiguous {
                LOWER_UNAMBIGUOUS
            } else {
                LOWER
            });
        }
        if self.digits {
            classes.push(if self.exclude_ambiguous {
                DIGITS_UNAMBIGUOUS
            } else {
                DIGITS
            });
        }
        if self.symbols {
            classes.push(SYMBOLS);
        }
        classes
    }
}

/// Generate a random password of `length` characters.
///
/// The result contains at least one character from every enabled class.
pub fn generate(length: usize, options: &GenerateOptions) -> Result<Zeroizing<String>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(VaultError::InvalidLength {
            length,
            min: MIN_LENGTH,
            max: MAX_LENGTH,
        });
    }

    let classes = options.classes();
    if classes.is_empty() {
        return Err(VaultError::NoCharsetSelected);
    }

    let charset: Vec<char> = classes.iter().flat_map(|c| c.chars()).collect();
    let mut rng =
        StdRng::try_from_os_rng().map_err(|e| VaultError::RandomSourceFailure(e.to_string()))?;

    let mut password = Zeroizing::new(Vec::with_capacity(length));
    for attempt in 0..=MAX_RETRIES {
        password.clear();
        password.extend((0..length).map(|_| charset[rng.random_range(0..charset.len())]));

        if covers_all(&password, &classes) {
            return Ok(Zeroizing::new(password.iter().collect()));
        }
        tracing::trace!(attempt, "generated password missed a class, redrawing");
    }

    patch_missing(&mut password, &classes);
    Ok(Zeroizing::new(password.iter().collect()))
}

fn class_of(c: char, classes: &[&str]) -> Option<usize> {
    classes.iter().position(|set| set.contains(c))
}

fn class_counts(password: &[char], classes: &[&str]) -> Vec<usize> {
    let mut counts = vec![0; classes.len()];
    for &c in password {
        if let Some(i) = class_of(c, classes) {
            counts[i] += 1;
        }
    }
    counts
}

fn covers_all(password: &[char], classes: &[&str]) -> bool {
    class_counts(password, classes).iter().all(|&n| n > 0)
}

/// Overwrite characters so every class is represented.
///
/// Each missing class replaces the first character whose own class has
/// more than one member, so a patch never removes another class.
fn patch_missing(password: &mut [char], classes: &[&str]) {
    for (missing, set) in classes.iter().enumerate() {
        let counts = class_counts(password, classes);
        if counts[missing] > 0 {
            continue;
        }
        let Some(replacement) = set.chars().next() else {
            continue;
        };
        let slot = password
            .iter()
            .position(|&c| class_of(c, classes).is_some_and(|i| counts[i] > 1));
        if let Some(slot) = slot {
            password[slot] = replacement;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(upper: bool, lower: bool, digits: bool, symbols: bool) -> GenerateOptions {
        GenerateOptions {
            uppercase: upper,
            lowercase: lower,
            digits,
            symbols,
            exclude_ambiguous: false,
        }
    }

    #[test]
    fn produces_requested_length() {
        for len in [MIN_LENGTH, 20, MAX_LENGTH] {
            let pw = generate(len, &GenerateOptions::default()).unwrap();
            assert_eq!(pw.chars().count(), len);
        }
    }

    #[test]
    fn rejects_out_of_range_length() {
        let opts = GenerateOptions::default();
        assert!(matches!(
            generate(3, &opts),
            Err(VaultError::InvalidLength { length: 3, .. })
        ));
        assert!(matches!(
            generate(129, &opts),
            Err(VaultError::InvalidLength { length: 129, .. })
        ));
    }

    #[test]
    fn rejects_empty_charset() {
        assert!(matches!(
            generate(16, &only(false, false, false, false)),
            Err(VaultError::NoCharsetSelected)
        ));
    }

    #[test]
    fn single_class_uses_only_that_class() {
        let pw = generate(32, &only(false, false, true, false)).unwrap();
        assert!(pw.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn exclude_ambiguous_drops_lookalikes() {
        let opts = GenerateOptions {
            exclude_ambiguous: true,
            ..GenerateOptions::default()
        };
        for _ in 0..20 {
            let pw = generate(64, &opts).unwrap();
            assert!(!pw.contains(['0', 'O', '1', 'l', 'I']));
        }
    }

    #[test]
    fn minimum_length_covers_four_classes() {
        for _ in 0..200 {
            let pw = generate(MIN_LENGTH, &GenerateOptions::default()).unwrap();
            let chars: Vec<char> = pw.chars().collect();
            assert!(covers_all(&chars, &GenerateOptions::default().classes()));
        }
    }

    #[test]
    fn patch_fills_every_missing_class() {
        let classes = GenerateOptions::default().classes();
        let mut pw: Vec<char> = "aaaa".chars().collect();
        patch_missing(&mut pw, &classes);
        assert!(covers_all(&pw, &classes));
        assert_eq!(pw.len(), 4);
    }

    #[test]
    fn patch_never_drops_a_present_class() {
        let classes = GenerateOptions::default().classes();
        let mut pw: Vec<char> = "A1bbbb".chars().collect();
        patch_missing(&mut pw, &classes);
        assert!(covers_all(&pw, &classes));
        assert_eq!(pw[0], 'A');
        assert_eq!(pw[1], '1');
    }
}
