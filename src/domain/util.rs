/// Folds the UTF-16 code units of a string into a 32-bit hash
/// (`hash * 31 + unit`, wrapping).
pub fn hash(to_be_hashed: &str) -> i32 {
    to_be_hashed.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    })
}

/// Derives a stable `#RRGGBB` color code (uppercase) from a string.
///
/// Not cryptographic; different strings may share a color.
pub fn str_to_rgb(s: &str) -> String {
    format!("#{:06X}", hash(s) & 0x00FF_FFFF)
}
