use report_core::{Article, CoverageDifference, Sentiment};
use std::collections::BTreeSet;

use crate::topics::article_label;

const MAX_TOPICS_IN_PHRASE: usize = 3;

/// Unordered article pairs (i < j) in lexicographic order, at most `limit` of them
pub fn article_pairs(count: usize, limit: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..count)
        .flat_map(move |i| (i + 1..count).map(move |j| (i, j)))
        .take(limit)
}

pub fn coverage_differences(
    articles: &[Article],
    company: &str,
    limit: usize,
) -> Vec<CoverageDifference> {
    article_pairs(articles.len(), limit)
        .map(|(i, j)| compare_pair(i, &articles[i], j, &articles[j], company))
        .collect()
}

fn topic_phrase<'a>(topics: impl IntoIterator<Item = &'a String>) -> String {
    let mut picked: Vec<&str> = Vec::new();
    let mut extra = 0usize;
    for topic in topics {
        if picked.len() < MAX_TOPICS_IN_PHRASE {
            picked.push(topic.as_str());
        } else {
            extra += 1;
        }
    }
    match (picked.is_empty(), extra) {
        (true, _) => "general news".to_string(),
        (false, 0) => picked.join(", "),
        (false, n) => format!("{} and {} more", picked.join(", "), n),
    }
}

/// Topics of `own` missing from `other`; all of `own` when nothing is exclusive.
fn focus<'a>(own: &'a BTreeSet<String>, other: &'a BTreeSet<String>) -> Vec<&'a String> {
    let exclusive: Vec<&String> = own.difference(other).collect();
    if exclusive.is_empty() {
        own.iter().collect()
    } else {
        exclusive
    }
}

fn compare_pair(
    i: usize,
    a: &Article,
    j: usize,
    b: &Article,
    company: &str,
) -> CoverageDifference {
    let (label_a, label_b) = (article_label(i), article_label(j));
    let shared: Vec<&String> = a.topics.intersection(&b.topics).collect();
    let a_only: Vec<&String> = a.topics.difference(&b.topics).collect();
    let b_only: Vec<&String> = b.topics.difference(&a.topics).collect();

    let mut comparison = if a.sentiment != b.sentiment {
        format!(
            "{} takes a {} view, covering {}, while {} is {}, covering {}.",
            label_a,
            a.sentiment.adjective(),
            topic_phrase(focus(&a.topics, &b.topics)),
            label_b,
            b.sentiment.adjective(),
            topic_phrase(focus(&b.topics, &a.topics)),
        )
    } else if a_only.is_empty() && b_only.is_empty() {
        format!(
            "{} and {} are both {} and cover the same ground ({}).",
            label_a,
            label_b,
            a.sentiment.adjective(),
            topic_phrase(shared.iter().copied()),
        )
    } else {
        format!(
            "{} and {} are both {}, but {} focuses on {} while {} focuses on {}.",
            label_a,
            label_b,
            a.sentiment.adjective(),
            label_a,
            topic_phrase(focus(&a.topics, &b.topics)),
            label_b,
            topic_phrase(focus(&b.topics, &a.topics)),
        )
    };

    if !shared.is_empty() && (!a_only.is_empty() || !b_only.is_empty() || a.sentiment != b.sentiment) {
        comparison.push_str(&format!(" Both discuss {}.", topic_phrase(shared.iter().copied())));
    }

    let mut impact = tone_impact(a.sentiment, b.sentiment, company);
    if shared.is_empty() && !a.topics.is_empty() && !b.topics.is_empty() {
        impact.push_str(" The articles highlight different aspects of the story.");
    }

    CoverageDifference { comparison, impact }
}

fn tone_impact(a: Sentiment, b: Sentiment, company: &str) -> String {
    use Sentiment::*;

    match (a, b) {
        (Positive, Negative) | (Negative, Positive) => format!(
            "Conflicting coverage may leave investors uncertain about {}'s direction.",
            company
        ),
        (Positive, Positive) => format!(
            "Consistent positive coverage reinforces confidence in {}.",
            company
        ),
        (Negative, Negative) => format!(
            "Consistent negative coverage adds pressure on {}.",
            company
        ),
        (Positive, Neutral) | (Neutral, Positive) => format!(
            "Positive coverage of {} is partly offset by neutral reporting.",
            company
        ),
        (Negative, Neutral) | (Neutral, Negative) => format!(
            "Negative coverage of {} is tempered by neutral reporting.",
            company
        ),
        (Neutral, Neutral) => format!(
            "Neutral coverage suggests limited immediate impact on {}.",
            company
        ),
    }
}
