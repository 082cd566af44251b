/// Rolling 31-multiplier hash over UTF-16 code units with 32-bit wrapping.
///
/// The classic `(h << 5) - h + c` string hash; stable across runs and
/// platforms.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |acc, unit| {
        (unit as i32).wrapping_add(acc.wrapping_shl(5).wrapping_sub(acc))
    })
}

/// Hue in degrees (`0..360`) derived from [`string_hash`].
pub fn hue_for(s: &str) -> u16 {
    (string_hash(s).unsigned_abs() % 360) as u16
}
