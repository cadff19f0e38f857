//! Short random identifiers for request tokens and error incidents.

use rand::Rng;

/// Characters identifiers are drawn from.
pub const CHARS: &[u8] = b"ABCDEF1234567890";

/// Default identifier length.
pub const DEFAULT_LENGTH: usize = 8;

/// Generates an identifier of `len` characters from [`CHARS`].
///
/// A length of zero falls back to [`DEFAULT_LENGTH`].
///
/// # Example
///
/// ```
/// use minos_core::identifier;
///
/// let id = identifier::generate(8);
/// assert_eq!(id.len(), 8);
/// assert!(id.chars().all(|c| "ABCDEF1234567890".contains(c)));
/// ```
#[must_use]
pub fn generate(len: usize) -> String {
    let len = if len == 0 { DEFAULT_LENGTH } else { len };
    let mut rng = rand::thread_rng();

    (0..len)
        .map(|_| char::from(CHARS[rng.gen_range(0..CHARS.len())]))
        .collect()
}

/// Generates an identifier of [`DEFAULT_LENGTH`] characters.
#[must_use]
pub fn generate_default() -> String {
    generate(DEFAULT_LENGTH)
}
