//! Edit distance

/// Levenshtein distance between two strings, counted in Unicode scalar values
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // rows: b, columns: a
    let mut matrix = vec![vec![0usize; a_len + 1]; b_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b_len {
        for j in 1..=a_len {
            matrix[i][j] = if a_chars[j - 1] == b_chars[i - 1] {
                matrix[i - 1][j - 1]
            } else {
                1 + matrix[i - 1][j - 1]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j])
            };
        }
    }

    matrix[b_len][a_len]
}

/// Similarity in [0, 1] derived from a known distance
pub fn confidence(distance: usize, a_len: usize, b_len: usize) -> f64 {
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 1.0;
    }
    1.0 - (distance as f64 / max_len as f64)
}
