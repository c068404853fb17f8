//! Ratcliff/Obershelp word similarity, used to match query words against the
//! transliteration dictionary.
//!
//! The score is `2 * M / T`, where `T` is the total number of characters and
//! `M` the number of characters in matching blocks. Blocks are found by taking
//! the longest common block, then recursing on both sides of it. This is the
//! ratio the dictionary cutoff is tuned for. Transposed letters cost one
//! matched character, not two edits.

/// Similarity in `0.0..=1.0`, where 1.0 means identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (a_start, b_start, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_chars(&a[..a_start], &b[..b_start])
        + matching_chars(&a[a_start + size..], &b[b_start + size..])
}

/// `(a_start, b_start, len)` of the longest common block, earliest in `a` on ties.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // prev_row[j + 1]: length of the common block ending at a[i - 1], b[j]
    let mut prev_row = vec![0usize; b.len() + 1];
    let mut curr_row = vec![0usize; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        for (j, b_char) in b.iter().enumerate() {
            curr_row[j + 1] = if a_char == b_char { prev_row[j] + 1 } else { 0 };
            let len = curr_row[j + 1];
            if len > best.2 {
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ratio(a: &str, b: &str, expected: f64) {
        let ratio = similarity_ratio(a, b);
        assert!(
            (ratio - expected).abs() < 1e-9,
            "{:?} vs {:?}: got {}, expected {}",
            a,
            b,
            ratio,
            expected
        );
    }

    #[test]
    fn test_identical_and_disjoint() {
        assert_ratio("same", "same", 1.0);
        assert_ratio("", "", 1.0);
        assert_ratio("abcd", "wxyz", 0.0);
        assert_ratio("abc", "", 0.0);
    }

    #[test]
    fn test_transposed_letters_cost_one_match() {
        assert_ratio("privet", "privte", 10.0 / 12.0);
        assert_ratio("lubov", "lbuov", 8.0 / 10.0);
    }

    #[test]
    fn test_blocks_on_both_sides_count() {
        // "ly" + "ubov" around the dropped letter
        assert_ratio("lyubov", "lubov", 10.0 / 11.0);
        assert_ratio("мир", "мор", 4.0 / 6.0);
    }

    #[test]
    fn test_longest_common_block() {
        let a: Vec<char> = "xabcdy".chars().collect();
        let b: Vec<char> = "abczabcd".chars().collect();
        assert_eq!(longest_common_block(&a, &b), (1, 4, 4));
        assert_eq!(longest_common_block(&a, &[]), (0, 0, 0));
    }
}
