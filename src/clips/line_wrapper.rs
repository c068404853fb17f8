//! Splits overlong lyric lines into rows that fit on screen.
//!
//! Transcribed lines carry no punctuation, so capital letters are the only
//! hint of where a phrase starts. The capital-gap heuristic picks the widest
//! gaps between capitals as row breaks; whenever it cannot produce at least two
//! rows the line is cut near its middle instead.

/// Lines at least this many characters long are wrapped.
pub const LONG_LINE_CHARS: usize = 59;

const MAX_ROWS: usize = 3;

/// Wraps a lyric line into one to three display rows.
///
/// Never fails: blank input gives no rows, short input comes back as a single
/// trimmed row and every returned row is non-empty.
pub fn wrap(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.chars().count() < LONG_LINE_CHARS {
        return vec![trimmed.to_string()];
    }

    let chars: Vec<char> = trimmed.chars().collect();
    split_at_capitals(&chars).unwrap_or_else(|| split_at_midpoint(trimmed))
}

/// Cuts a line in two, at the first capital letter found from the middle
/// onwards or, failing that, at the first space after the middle.
pub fn split_at_midpoint(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let middle = chars.len() / 2;
    let mut capital_index = None;
    let mut space_index = None;
    for (offset, ch) in chars[middle..].iter().enumerate() {
        if ch.is_uppercase() {
            capital_index = Some(middle + offset);
            break;
        }
        if *ch == ' ' && space_index.is_none() {
            space_index = Some(middle + offset);
        }
    }

    let split = capital_index.or(space_index).unwrap_or(chars.len());
    let (head, tail) = chars.split_at(split);
    [head, tail]
        .iter()
        .map(|part| part.iter().collect::<String>().trim().to_string())
        .filter(|row| !row.is_empty())
        .collect()
}

fn split_at_capitals(chars: &[char]) -> Option<Vec<String>> {
    let capitals: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, ch)| ch.is_uppercase())
        .map(|(index, _)| index)
        .collect();
    if capitals.len() < 2 {
        return None;
    }

    // (gap to the previous capital, index of the capital)
    let mut gaps: Vec<(usize, usize)> = capitals
        .windows(2)
        .map(|pair| (pair[1] - pair[0], pair[1]))
        .collect();
    gaps.sort_by(|a, b| b.0.cmp(&a.0));

    let mut biggest_diff = 0;
    let mut smallest_str_len = LONG_LINE_CHARS;
    let mut split_points = vec![0];
    for (gap, index) in gaps {
        if split_points.len() >= MAX_ROWS {
            break;
        }
        // a sharp drop means the remaining capitals sit inside a phrase
        if split_points.len() > 1 && biggest_diff > gap * 2 {
            break;
        }
        biggest_diff = gap;
        smallest_str_len = smallest_str_len.min(gap);
        split_points.push(index);
    }
    split_points.sort_unstable();
    split_points.dedup();

    let half = smallest_str_len / 2;
    let mut rows = slice_rows(chars, &split_points);
    if rows.len() > 2 && rows[0].chars().count() + rows[1].chars().count() < half {
        split_points.remove(1);
        rows = slice_rows(chars, &split_points);
    }
    if rows.len() > 2 && rows.last().map_or(0, |row| row.chars().count()) < half {
        split_points.pop();
        rows = slice_rows(chars, &split_points);
    }

    rows.retain(|row| !row.is_empty());
    if rows.len() < 2 {
        return None;
    }
    Some(rows)
}

fn slice_rows(chars: &[char], split_points: &[usize]) -> Vec<String> {
    split_points
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = split_points.get(i + 1).copied().unwrap_or(chars.len());
            chars[start..end].iter().collect::<String>().trim().to_string()
        })
        .collect()
}
