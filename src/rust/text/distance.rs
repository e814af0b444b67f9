//! String distance measures used to surface likely corrections for a human
//! to pick from before retraining.

use std::cmp::{min, Ordering};
use std::collections::HashMap;

use serde::Serialize;

/// Number of differing positions, or `None` when the strings differ in length.
pub fn hamming(a: &str, b: &str) -> Option<usize> {
    if a.chars().count() != b.chars().count() {
        return None;
    }
    Some(a.chars().zip(b.chars()).filter(|(x, y)| x != y).count())
}

/// Minimum number of single-character insertions, deletions or substitutions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        current[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            current[j] = min(min(previous[j] + 1, current[j - 1] + 1), previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Levenshtein distance that also counts adjacent transpositions as one edit
/// (optimal string alignment variant).
#[allow(clippy::needless_range_loop)]
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (len1, len2) = (a.len(), b.len());

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];
    for i in 0..=len1 {
        matrix[i][0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            matrix[i][j] = min(
                min(matrix[i - 1][j] + 1, matrix[i][j - 1] + 1),
                matrix[i - 1][j - 1] + cost,
            );
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                matrix[i][j] = min(matrix[i][j], matrix[i - 2][j - 2] + 1);
            }
        }
    }
    matrix[len1][len2]
}

fn jaro(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = min(i + window + 1, b.len());
        for j in start..end {
            if !b_matched[j] && *ca == b[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut k = 0;
    for (i, ca) in a.iter().enumerate() {
        if !a_matched[i] {
            continue;
        }
        while !b_matched[k] {
            k += 1;
        }
        if *ca != b[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions as f64 / 2.0) / m) / 3.0
}

/// Jaro-Winkler similarity in `[0, 1]`; 1 means identical.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let similarity = jaro(&a, &b);
    let prefix = a.iter().zip(b.iter()).take(4).take_while(|(x, y)| x == y).count();
    similarity + prefix as f64 * 0.1 * (1.0 - similarity)
}

fn bigrams(s: &str) -> HashMap<(char, char), usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut counts = HashMap::new();
    for pair in chars.windows(2) {
        *counts.entry((pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

/// Sørensen-Dice coefficient over character bigrams, in `[0, 1]`.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a_bigrams = bigrams(a);
    let b_bigrams = bigrams(b);
    let total: usize = a_bigrams.values().sum::<usize>() + b_bigrams.values().sum::<usize>();
    if total == 0 {
        return if a == b { 1.0 } else { 0.0 };
    }
    let shared: usize = a_bigrams.iter()
        .map(|(bigram, count)| min(*count, b_bigrams.get(bigram).copied().unwrap_or(0)))
        .sum();
    2.0 * shared as f64 / total as f64
}

/// All supported measures for one pair of strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringDistances {
    pub hamming: Option<usize>,
    pub jaro_winkler: f64,
    pub levenshtein: usize,
    pub damerau_levenshtein: usize,
    pub dice_coefficient: f64,
}

pub fn string_distances(subject: &str, test: &str) -> StringDistances {
    StringDistances {
        hamming: hamming(subject, test),
        jaro_winkler: jaro_winkler(subject, test),
        levenshtein: levenshtein(subject, test),
        damerau_levenshtein: damerau_levenshtein(subject, test),
        dice_coefficient: dice_coefficient(subject, test),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub text: String,
    pub distances: StringDistances,
}

/// The `limit` candidates closest to `subject`: highest Jaro-Winkler first,
/// then lowest Levenshtein, then alphabetical.
pub fn rank_candidates<S: AsRef<str>>(subject: &str, candidates: &[S], limit: usize) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = candidates.iter()
        .map(|candidate| Candidate {
            text: candidate.as_ref().to_string(),
            distances: string_distances(subject, candidate.as_ref()),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.distances.jaro_winkler.partial_cmp(&a.distances.jaro_winkler)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.distances.levenshtein.cmp(&b.distances.levenshtein))
            .then_with(|| a.text.cmp(&b.text))
    });
    ranked.truncate(limit);
    ranked
}
