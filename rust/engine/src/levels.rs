//! Skill level definitions for progressive training.
//!
//! Levels 1-4 partition the 34 canonical strategy keys into disjoint
//! groups of increasing difficulty; level 0 is the union of all of them
//! (no filtering). The partition is fixed configuration data, exposed
//! through read-only lookups.

use std::collections::HashSet;

use crate::errors::TrainerError;

/// Highest defined skill level.
pub const MAX_LEVEL: u8 = 4;

const LEVEL_1_KEYS: &[&str] = &[
    // hard 5-8 (always hit)
    "5", "6", "7", "8",
    // hard 17-20 (always stand)
    "17", "18", "19", "20",
    // hard 10-11 (double)
    "10", "11",
    // pairs AA/88 (always split)
    "AA", "88",
];

const LEVEL_2_KEYS: &[&str] = &[
    // hard 13-16 (hit/stand threshold)
    "13", "14", "15", "16",
    // soft A8/A9 (always stand)
    "A8", "A9",
    // pairs TT/55/22/33/77
    "TT", "55", "22", "33", "77",
];

const LEVEL_3_KEYS: &[&str] = &[
    // hard 9/12
    "9", "12",
    // soft A2-A5
    "A2", "A3", "A4", "A5",
    // pairs 44/66
    "44", "66",
];

const LEVEL_4_KEYS: &[&str] = &[
    // soft A6/A7 (hardest)
    "A6", "A7",
    // pair 99
    "99",
];

/// Display name for a skill level.
///
/// # Errors
///
/// Returns [`TrainerError::InvalidLevel`] for levels above [`MAX_LEVEL`].
pub fn level_name(level: u8) -> Result<&'static str, TrainerError> {
    match level {
        0 => Ok("All Hands"),
        1 => Ok("Fundamentals"),
        2 => Ok("Standard Decisions"),
        3 => Ok("Doubles & Complex Splits"),
        4 => Ok("Expert"),
        _ => Err(TrainerError::InvalidLevel {
            level,
            max: MAX_LEVEL,
        }),
    }
}

/// Keys belonging to one non-zero level, in their defined order.
///
/// # Errors
///
/// Returns [`TrainerError::InvalidLevel`] for level 0 (which has no list
/// of its own) and for levels above [`MAX_LEVEL`].
pub fn level_keys(level: u8) -> Result<&'static [&'static str], TrainerError> {
    match level {
        1 => Ok(LEVEL_1_KEYS),
        2 => Ok(LEVEL_2_KEYS),
        3 => Ok(LEVEL_3_KEYS),
        4 => Ok(LEVEL_4_KEYS),
        _ => Err(TrainerError::InvalidLevel {
            level,
            max: MAX_LEVEL,
        }),
    }
}

/// The set of strategy keys allowed at a level. Level 0 is the union of
/// every other level's keys.
///
/// # Errors
///
/// Returns [`TrainerError::InvalidLevel`] for levels above [`MAX_LEVEL`].
pub fn keys_for_level(level: u8) -> Result<HashSet<&'static str>, TrainerError> {
    if level == 0 {
        let mut all = HashSet::new();
        for lvl in 1..=MAX_LEVEL {
            all.extend(level_keys(lvl)?.iter().copied());
        }
        return Ok(all);
    }
    Ok(level_keys(level)?.iter().copied().collect())
}
