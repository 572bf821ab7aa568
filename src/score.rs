use crate::record::Record;
use std::cmp::Ordering;
use strsim::jaro_winkler;

/// Similarity for one candidate pair, in [0, 1]. Birth years act as a hard
/// filter ahead of any name comparison: both present and different means no
/// match, regardless of the names.
pub fn score_pair(a: &Record, b: &Record, inner_threshold: f64) -> f64 {
    if let (Some(year_a), Some(year_b)) = (&a.birth_year, &b.birth_year) {
        if year_a != year_b {
            return 0.0;
        }
    }
    hybrid_jaccard(&a.name_tokens, &b.name_tokens, inner_threshold)
}

/// Jaccard over greedily matched token pairs. Every cross-set token pair
/// whose Jaro-Winkler similarity exceeds `inner_threshold` is a candidate
/// assignment; assignments are taken in order of descending similarity,
/// with exact ties broken by token position on each side, and each token
/// participates in at most one. The score is the number of assignments
/// over the exact set union.
///
/// Both inputs must be sorted and deduplicated, which is what keeps the
/// greedy pass deterministic.
pub fn hybrid_jaccard(tokens_a: &[String], tokens_b: &[String], inner_threshold: f64) -> f64 {
    let union = union_size(tokens_a, tokens_b);
    if union == 0 || tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
    for (i, token_a) in tokens_a.iter().enumerate() {
        for (j, token_b) in tokens_b.iter().enumerate() {
            let similarity = jaro_winkler(token_a, token_b);
            if similarity > inner_threshold {
                candidates.push((similarity, i, j));
            }
        }
    }
    candidates.sort_by(|x, y| {
        y.0.total_cmp(&x.0)
            .then_with(|| x.1.cmp(&y.1))
            .then_with(|| x.2.cmp(&y.2))
    });

    let mut used_a = vec![false; tokens_a.len()];
    let mut used_b = vec![false; tokens_b.len()];
    let mut matched = 0usize;
    for (_, i, j) in candidates {
        if !used_a[i] && !used_b[j] {
            used_a[i] = true;
            used_b[j] = true;
            matched += 1;
        }
    }
    matched as f64 / union as f64
}

fn union_size(a: &[String], b: &[String]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
        count += 1;
    }
    count + (a.len() - i) + (b.len() - j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tokenize_name;

    const INNER: f64 = 0.67;

    fn record(id: &str, name: &str, birth_year: Option<&str>) -> Record {
        Record {
            id: id.to_string(),
            name: name.to_string(),
            name_tokens: tokenize_name(name),
            birth_year: birth_year.map(str::to_owned),
        }
    }

    #[test]
    fn birth_year_mismatch_short_circuits() {
        let a = record("a1", "Jean Smith", Some("1920"));
        let b = record("u1", "Jean Smith", Some("1935"));
        assert_eq!(score_pair(&a, &b, INNER), 0.0);
    }

    #[test]
    fn matching_birth_years_fall_through_to_names() {
        let a = record("a1", "Jean Smith", Some("1920"));
        let b = record("u1", "Jean Smith", Some("1920"));
        assert_eq!(score_pair(&a, &b, INNER), 1.0);
    }

    #[test]
    fn absent_birth_year_never_filters() {
        let a = record("a1", "Jean Smith", None);
        let b = record("u1", "Jean Smith", Some("1920"));
        assert_eq!(score_pair(&a, &b, INNER), 1.0);
    }

    #[test]
    fn identical_non_empty_sets_score_one() {
        let tokens = tokenize_name("Jean Baptiste Smith");
        assert_eq!(hybrid_jaccard(&tokens, &tokens, INNER), 1.0);
    }

    #[test]
    fn dissimilar_sets_score_zero() {
        let a = tokenize_name("Jean Smith");
        let b = tokenize_name("Xu Wei");
        assert_eq!(hybrid_jaccard(&a, &b, INNER), 0.0);
    }

    #[test]
    fn empty_against_non_empty_scores_zero() {
        let a: Vec<String> = Vec::new();
        let b = tokenize_name("Jean Smith");
        assert_eq!(hybrid_jaccard(&a, &b, INNER), 0.0);
        assert_eq!(hybrid_jaccard(&b, &a, INNER), 0.0);
        assert_eq!(hybrid_jaccard(&a, &a, INNER), 0.0);
    }

    #[test]
    fn near_tokens_match_across_spelling_variants() {
        // "smith"/"smyth" pair up above the inner threshold; "jean" matches
        // exactly. Two assignments over a union of three distinct tokens.
        let a = tokenize_name("Jean Smith");
        let b = tokenize_name("Jean Smyth");
        let score = hybrid_jaccard(&a, &b, INNER);
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn partial_overlap_uses_the_full_union() {
        // "jean" is the only assignment; union is {jean, baptiste, smith}
        let a = tokenize_name("Jean Baptiste");
        let b = tokenize_name("Jean Smith");
        let score = hybrid_jaccard(&a, &b, INNER);
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn greedy_assignment_is_deterministic() {
        let a = tokenize_name("Ana Anna Smith");
        let b = tokenize_name("Anna Ana Smyth");
        let first = hybrid_jaccard(&a, &b, INNER);
        for _ in 0..10 {
            assert_eq!(hybrid_jaccard(&a, &b, INNER), first);
        }
    }
}
