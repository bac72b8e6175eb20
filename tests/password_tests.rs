//! Integration tests for password generation and strength scoring.

use std::collections::HashSet;

use passvault::errors::VaultError;
use passvault::password::{check_strength, generate, GenerateOptions, StrengthLevel};

const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?";

#[test]
fn generated_passwords_cover_every_class_and_never_repeat() {
    let options = GenerateOptions::default();
    let mut seen = HashSet::new();

    for _ in 0..100 {
        let pw = generate(20, &options).unwrap();
        assert_eq!(pw.chars().count(), 20);
        assert!(pw.chars().any(|c| c.is_ascii_uppercase()), "{}", pw.as_str());
        assert!(pw.chars().any(|c| c.is_ascii_lowercase()), "{}", pw.as_str());
        assert!(pw.chars().any(|c| c.is_ascii_digit()), "{}", pw.as_str());
        assert!(pw.chars().any(|c| SYMBOLS.contains(c)), "{}", pw.as_str());
        assert!(seen.insert(pw.as_str().to_owned()), "repeated password");
    }
}

#[test]
fn generation_rejects_bad_arguments() {
    assert!(matches!(
        generate(0, &GenerateOptions::default()),
        Err(VaultError::InvalidLength {
            length: 0,
            min: 4,
            max: 128
        })
    ));

    let none = GenerateOptions {
        uppercase: false,
        lowercase: false,
        digits: false,
        symbols: false,
        exclude_ambiguous: true,
    };
    assert!(matches!(
        generate(20, &none),
        Err(VaultError::NoCharsetSelected)
    ));
}

#[test]
fn strength_scores_are_ordered() {
    let weak = check_strength("abc");
    let medium = check_strength("Abc123!@#def");
    let strong = check_strength("Xk9$mP2@vL4#nR8&qT3!");

    assert!(weak.score < medium.score);
    assert!(medium.score < strong.score);
    assert!(weak.level < strong.level);
    assert_eq!(strong.level, StrengthLevel::VeryStrong);
}

#[test]
fn common_password_is_very_weak_regardless_of_length() {
    let report = check_strength("password123");
    assert_eq!(report.level, StrengthLevel::VeryWeak);
    assert_eq!(report.score, 0);
    assert!(!report.feedback.is_empty());
}

#[test]
fn generated_passwords_score_well() {
    let pw = generate(24, &GenerateOptions::default()).unwrap();
    assert!(check_strength(&pw).level >= StrengthLevel::Strong);
}
