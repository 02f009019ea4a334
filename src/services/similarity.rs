use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::Question;
use crate::services::keywords::extract_keywords;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarMatch<'a, T> {
    pub candidate: &'a T,
    pub score: f64,
}

pub fn keyword_set(text: &str) -> HashSet<String> {
    extract_keywords(text).into_iter().collect()
}

/// Jaccard similarity of the keyword sets of `a` and `b`.
///
/// An empty keyword set on either side scores 0.0, including when both are empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&keyword_set(a), &keyword_set(b))
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Candidates scoring at least `threshold` against `target`, best first.
///
/// Equal scores keep their input order.
pub fn find_similar<'a, T, F>(
    target: &str,
    candidates: &'a [T],
    text_of: F,
    threshold: f64,
) -> Vec<SimilarMatch<'a, T>>
where
    F: Fn(&T) -> &str,
{
    let target_keywords = keyword_set(target);

    let mut matches: Vec<SimilarMatch<'a, T>> = candidates
        .iter()
        .filter_map(|candidate| {
            let score = jaccard(&target_keywords, &keyword_set(text_of(candidate)));
            (score >= threshold).then_some(SimilarMatch { candidate, score })
        })
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    matches
}

pub fn find_similar_questions<'a>(
    target: &str,
    questions: &'a [Question],
    threshold: f64,
) -> Vec<SimilarMatch<'a, Question>> {
    find_similar(target, questions, |q| q.text.as_str(), threshold)
}
