//! Initial password generation for newly created users.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// Length of generated passwords.
pub const PASSWORD_LENGTH: usize = 16;

const LOWERCASE: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!#$%&*+-=?@^_";

const CLASSES: [&[u8]; 4] = [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS];

/// Generate a random password with at least one character of every class.
pub fn generate_password() -> String {
    generate_password_with(&mut rand::rng(), PASSWORD_LENGTH)
}

/// Generate a password of `length` characters from `rng`.
///
/// `length` is raised to the number of character classes if smaller.
pub fn generate_password_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let length = length.max(CLASSES.len());
    let all: Vec<u8> = CLASSES.concat();

    let mut chars: Vec<u8> = CLASSES
        .iter()
        .filter_map(|class| class.choose(rng).copied())
        .collect();
    while chars.len() < length {
        chars.push(all[rng.random_range(0..all.len())]);
    }
    chars.shuffle(rng);

    chars.into_iter().map(char::from).collect()
}
