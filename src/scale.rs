//! scale.rs
//!
//! Human-scale rendering of engagement counters:
//!     999 -> "999", 1000 -> "1k", 1500 -> "1.5k", 2_000_000 -> "2M"
//!
//! Values are divided down to the largest SI tier they reach and shown with at
//! most one decimal. A trailing ".0" is dropped, so round numbers stay short.
//!
//! Rounding can push a value into the next tier (999_950 would print as
//! "1000k"), so the tier is bumped when that happens.

const UNITS: [&str; 7] = ["", "k", "M", "G", "T", "P", "E"];

/// Returns `n` scaled to a short human string
pub fn scale_number(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }

    let mut tier = tier_of(n);
    let mut tenths = tenths_at(n, tier);

    // Fix rounding overflow into the next tier
    if tenths >= 10_000 && tier + 1 < UNITS.len() {
        tier += 1;
        tenths = tenths_at(n, tier);
    }

    let (whole, frac) = (tenths / 10, tenths % 10);
    if frac == 0 {
        format!("{whole}{}", UNITS[tier])
    } else {
        format!("{whole}.{frac}{}", UNITS[tier])
    }
}

/// Index into `UNITS`: how many times `n` can be divided by 1000
fn tier_of(mut n: u64) -> usize {
    let mut tier = 0;
    while n >= 1000 && tier + 1 < UNITS.len() {
        n /= 1000;
        tier += 1;
    }
    tier
}

/// `n / 1000^tier` in tenths, rounded half up. Integer math keeps 999_950 exact.
fn tenths_at(n: u64, tier: usize) -> u128 {
    let div = 1000u128.pow(tier as u32);
    (n as u128 * 10 + div / 2) / div
}
