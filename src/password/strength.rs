//! Advisory password strength scoring.
//!
//! The score (0–100) combines length, character variety and a rough
//! entropy estimate, minus penalties for sequential runs and repeated
//! characters.  It never blocks anything; callers decide what to do
//! with a weak result.

use std::fmt;

use serde::Serialize;

/// Passwords rejected outright, compared case-insensitively.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "qwerty",
    "abc123",
    "monkey",
    "1234567",
    "letmein",
    "trustno1",
    "dragon",
    "baseball",
    "111111",
    "iloveyou",
    "master",
    "sunshine",
    "ashley",
    "bailey",
    "passw0rd",
    "shadow",
    "123123",
    "654321",
    "superman",
    "qazwsx",
];

/// Coarse strength buckets, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StrengthLevel {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl StrengthLevel {
    fn from_score(score: u8) -> Self {
        match score {
            0..=19 => Self::VeryWeak,
            20..=39 => Self::Weak,
            40..=59 => Self::Fair,
            60..=79 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very Strong",
        };
        f.write_str(label)
    }
}

/// Result of `check_strength`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthReport {
    pub level: StrengthLevel,
    /// 0 to 100.
    pub score: u8,
    /// Suggestions for improvement; empty for very strong passwords.
    pub feedback: Vec<String>,
}

#[derive(Default)]
struct Classes {
    upper: bool,
    lower: bool,
    digit: bool,
    symbol: bool,
}

impl Classes {
    fn of(password: &str) -> Self {
        let mut classes = Self::default();
        for c in password.chars() {
            if c.is_uppercase() {
                classes.upper = true;
            } else if c.is_lowercase() {
                classes.lower = true;
            } else if c.is_numeric() {
                classes.digit = true;
            } else if !c.is_alphanumeric() && !c.is_whitespace() && !c.is_control() {
                classes.symbol = true;
            }
        }
        classes
    }

    fn charset_size(&self) -> u32 {
        let mut size = 0;
        if self.upper {
            size += 26;
        }
        if self.lower {
            size += 26;
        }
        if self.digit {
            size += 10;
        }
        if self.symbol {
            size += 32;
        }
        size
    }
}

/// Score a password.
pub fn check_strength(password: &str) -> StrengthReport {
    if is_common(password) {
        return StrengthReport {
            level: StrengthLevel::VeryWeak,
            score: 0,
            feedback: vec!["This is a commonly used password".into()],
        };
    }

    let mut feedback: Vec<String> = Vec::new();
    let length = password.chars().count();
    let mut score = length_points(length) as i64;

    if length < 6 {
        feedback.push("Password is too short (minimum 12 characters recommended)".into());
    } else if length < 8 {
        feedback.push("Password is too short (minimum 8 characters recommended)".into());
    }

    let classes = Classes::of(password);
    let checks = [
        (classes.upper, "Add uppercase letters"),
        (classes.lower, "Add lowercase letters"),
        (classes.digit, "Add numbers"),
        (classes.symbol, "Add special characters"),
    ];
    let mut variety = 0;
    for (present, hint) in checks {
        if present {
            score += 10;
            variety += 1;
        } else {
            feedback.push(hint.to_string());
        }
    }
    if variety == 4 {
        score += 10;
    }

    let entropy = estimate_entropy(length, classes.charset_size());
    score += ((entropy / 5.0) as i64).min(20);

    let chars: Vec<char> = password.chars().collect();
    if has_sequence(&chars) {
        score -= 5;
        feedback.push("Avoid sequential characters (e.g., abc, 123)".into());
    }
    if has_repeat(&chars) {
        score -= 5;
        feedback.push("Avoid repeated characters".into());
    }

    let score = score.clamp(0, 100) as u8;
    let level = StrengthLevel::from_score(score);
    if level == StrengthLevel::VeryStrong {
        feedback.clear();
    }

    StrengthReport {
        level,
        score,
        feedback,
    }
}

fn is_common(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.contains(&lowered.as_str())
}

// 0-30 points.
fn length_points(length: usize) -> usize {
    match length {
        0..=7 => length * 2,
        8..=11 => 16 + (length - 8) * 2,
        12..=15 => 24 + (length - 12),
        _ => 30,
    }
}

/// Bits of entropy for `length` characters drawn from `charset` symbols,
/// using a stepped approximation of log2.
fn estimate_entropy(length: usize, charset: u32) -> f64 {
    let bits_per_char = match charset {
        0 => return 0.0,
        1..=25 => 3.3,
        26..=35 => 4.7,
        36..=61 => 5.2,
        62..=93 => 6.0,
        _ => 6.5,
    };
    length as f64 * bits_per_char
}

fn has_sequence(chars: &[char]) -> bool {
    chars.windows(3).any(|w| {
        let (a, b, c) = (w[0] as u32, w[1] as u32, w[2] as u32);
        (a.wrapping_add(1) == b && b.wrapping_add(1) == c)
            || (a.wrapping_sub(1) == b && b.wrapping_sub(1) == c)
    })
}

fn has_repeat(chars: &[char]) -> bool {
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_passwords_score_zero() {
        for pw in ["password123", "QWERTY", "LetMeIn"] {
            let report = check_strength(pw);
            assert_eq!(report.level, StrengthLevel::VeryWeak);
            assert_eq!(report.score, 0);
        }
    }

    #[test]
    fn known_scores() {
        assert_eq!(check_strength("abc").score, 13);
        assert_eq!(check_strength("Abc123!@#def").score, 84);
        assert_eq!(check_strength("Xk9$mP2@vL4#nR8&qT3!").score, 100);
    }

    #[test]
    fn very_strong_has_no_feedback() {
        let report = check_strength("Xk9$mP2@vL4#nR8&qT3!");
        assert_eq!(report.level, StrengthLevel::VeryStrong);
        assert!(report.feedback.is_empty());
    }

    #[test]
    fn short_password_gets_length_hint() {
        let report = check_strength("aZ9!");
        assert!(report.feedback.iter().any(|f| f.contains("too short")));
    }

    #[test]
    fn sequences_and_repeats_are_penalised() {
        assert!(has_sequence(&['x', '3', '4', '5']));
        assert!(has_sequence(&['c', 'b', 'a']));
        assert!(!has_sequence(&['a', 'c', 'e']));
        assert!(has_repeat(&['z', 'z', 'z']));
        assert!(!has_repeat(&['z', 'z', 'y']));
    }

    #[test]
    fn levels_are_ordered() {
        assert!(StrengthLevel::VeryWeak < StrengthLevel::Weak);
        assert!(StrengthLevel::Strong < StrengthLevel::VeryStrong);
        assert_eq!(StrengthLevel::Fair.to_string(), "Fair");
        assert_eq!(StrengthLevel::VeryWeak.to_string(), "Very Weak");
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(StrengthLevel::from_score(19), StrengthLevel::VeryWeak);
        assert_eq!(StrengthLevel::from_score(20), StrengthLevel::Weak);
        assert_eq!(StrengthLevel::from_score(59), StrengthLevel::Fair);
        assert_eq!(StrengthLevel::from_score(80), StrengthLevel::VeryStrong);
    }
}
