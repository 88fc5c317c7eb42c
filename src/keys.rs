use uuid::Uuid;

/// Length of every generated url id.
pub const URL_ID_LEN: usize = 8;

/// Digits and ASCII letters, minus the easily confused `0`, `1`, `I`, `O` and `l`.
pub const ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Draw a fresh url id from a random UUID.
///
/// Ids are not guaranteed to be unique; the database enforces that.
pub fn generate_url_id() -> String {
    encode(Uuid::new_v4().as_u128())
}

/// Take the lowest [`URL_ID_LEN`] base-57 digits of `value`.
fn encode(mut value: u128) -> String {
    let base = ALPHABET.len() as u128;
    let mut id = String::with_capacity(URL_ID_LEN);
    for _ in 0..URL_ID_LEN {
        id.push(ALPHABET[(value % base) as usize] as char);
        value /= base;
    }
    id
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_have_fixed_length_and_alphabet() {
        for _ in 0..1000 {
            let id = generate_url_id();
            assert_eq!(id.len(), URL_ID_LEN);
            assert!(id.bytes().all(|b| ALPHABET.contains(&b)), "bad id {id}");
        }
    }

    #[test]
    fn alphabet_has_no_ambiguous_characters() {
        assert_eq!(ALPHABET.len(), 57);
        for c in [b'0', b'1', b'I', b'O', b'l', b'-', b'_'] {
            assert!(!ALPHABET.contains(&c));
        }
    }

    #[test]
    fn encode_uses_low_digits() {
        assert_eq!(encode(0), "22222222");
        assert_eq!(encode(1), "32222222");
        assert_eq!(encode(57), "23222222");
    }

    #[test]
    fn ids_rarely_collide() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_url_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
