use crate::rolling_hash::{RollingHash, ROLLING_WINDOW};

const INSERT_COST: u32 = 1;
const REMOVE_COST: u32 = 1;
const REPLACE_COST: u32 = 2;

/// Weighted Levenshtein distance: insertions and deletions cost 1, substitutions 2.
///
/// Uses two rows of the DP table.
pub fn edit_distance(s1: &[u8], s2: &[u8]) -> u32 {
    let mut prev: Vec<u32> = (0..=s2.len() as u32).map(|i| i * REMOVE_COST).collect();
    let mut cur: Vec<u32> = vec![0; s2.len() + 1];

    for (i1, &c1) in s1.iter().enumerate() {
        cur[0] = (i1 as u32 + 1) * INSERT_COST;
        for (i2, &c2) in s2.iter().enumerate() {
            let cost_a = prev[i2 + 1] + INSERT_COST;
            let cost_d = cur[i2] + REMOVE_COST;
            let cost_r = prev[i2] + if c1 == c2 { 0 } else { REPLACE_COST };
            cur[i2 + 1] = cost_a.min(cost_d).min(cost_r);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[s2.len()]
}

/// True if both strings share a substring of at least `ROLLING_WINDOW` bytes.
///
/// Window positions are pre-filtered by their rolling sums and confirmed by a
/// direct comparison.
pub fn has_common_substring(s1: &[u8], s2: &[u8]) -> bool {
    if s1.len() < ROLLING_WINDOW || s2.len() < ROLLING_WINDOW {
        return false;
    }

    let mut roll = RollingHash::new();
    let mut hashes = Vec::with_capacity(s1.len() - ROLLING_WINDOW + 1);
    for (i, &b) in s1.iter().enumerate() {
        roll.push(b);
        if i >= ROLLING_WINDOW - 1 {
            hashes.push(roll.sum());
        }
    }

    let mut roll = RollingHash::new();
    for (j, &b) in s2.iter().enumerate() {
        roll.push(b);
        if j < ROLLING_WINDOW - 1 {
            continue;
        }
        let h = roll.sum();
        let window2 = &s2[j + 1 - ROLLING_WINDOW..=j];
        for (i, &h1) in hashes.iter().enumerate() {
            if h1 == h && &s1[i..i + ROLLING_WINDOW] == window2 {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(edit_distance(b"abcdef", b"abcdef"), 0);
        assert_eq!(edit_distance(b"", b""), 0);
    }

    #[test]
    fn test_against_empty() {
        assert_eq!(edit_distance(b"abc", b""), 3);
        assert_eq!(edit_distance(b"", b"abcd"), 4);
    }

    #[test]
    fn test_substitution_costs_two() {
        assert_eq!(edit_distance(b"abc", b"abd"), 2);
        assert_eq!(edit_distance(b"sdrt", b"/rt"), 3);
    }

    #[test]
    fn test_insert_and_delete() {
        assert_eq!(edit_distance(b"abc", b"abxc"), 1);
        assert_eq!(edit_distance(b"abxc", b"abc"), 1);
        assert_eq!(edit_distance(b"E", b"ue"), 3);
    }

    #[test]
    fn test_symmetric() {
        let a = b"rtCMPFGVk+1cvtuIye";
        let b = b"rtCMPGVk+1cvXtuIyeQ";
        assert_eq!(edit_distance(a, b), edit_distance(b, a));
    }

    #[test]
    fn test_common_substring() {
        assert!(has_common_substring(b"xxxxabcdefgyyyy", b"zzabcdefgzz"));
        assert!(!has_common_substring(b"xxxxabcdefyyyy", b"zzabcdefzz"));
        assert!(!has_common_substring(b"abcdef", b"abcdef"));
        assert!(has_common_substring(b"abcdefg", b"abcdefg"));
    }
}
