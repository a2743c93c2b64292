//! Shared vs exclusive topics across an article set.
//!
//! `common_topics` uses union-of-shared semantics: a topic is common as soon as
//! two or more articles mention it, even if the rest do not.

use report_core::{Article, TopicOverlap, UniqueTopics};
use std::collections::{BTreeMap, BTreeSet};

/// Label used for an article in topic and comparison output (1-based)
pub fn article_label(index: usize) -> String {
    format!("Article {}", index + 1)
}

/// Number of articles that mention each topic
fn topic_frequencies(articles: &[Article]) -> BTreeMap<&str, usize> {
    let mut freq: BTreeMap<&str, usize> = BTreeMap::new();
    for article in articles {
        for topic in &article.topics {
            *freq.entry(topic.as_str()).or_insert(0) += 1;
        }
    }
    freq
}

pub fn topic_overlap(articles: &[Article]) -> TopicOverlap {
    let freq = topic_frequencies(articles);

    let common_topics: BTreeSet<String> = freq
        .iter()
        .filter(|(_, count)| **count >= 2)
        .map(|(topic, _)| topic.to_string())
        .collect();

    let unique_topics = articles
        .iter()
        .enumerate()
        .map(|(i, article)| UniqueTopics {
            article: article_label(i),
            topics: article
                .topics
                .iter()
                .filter(|t| freq.get(t.as_str()).copied().unwrap_or(0) == 1)
                .cloned()
                .collect(),
        })
        .collect();

    TopicOverlap {
        common_topics,
        unique_topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::Sentiment;

    fn article(topics: &[&str]) -> Article {
        Article::new(
            "t",
            None,
            "s",
            Sentiment::Neutral,
            topics.iter().map(|t| t.to_string()),
        )
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_article_example() {
        let articles = vec![article(&["EV", "battery"]), article(&["battery", "recall"])];
        let overlap = topic_overlap(&articles);

        assert_eq!(overlap.common_topics, set(&["battery"]));
        assert_eq!(overlap.unique_topics.len(), 2);
        assert_eq!(overlap.unique_topics[0].article, "Article 1");
        assert_eq!(overlap.unique_topics[0].topics, set(&["EV"]));
        assert_eq!(overlap.unique_topics[1].article, "Article 2");
        assert_eq!(overlap.unique_topics[1].topics, set(&["recall"]));
    }

    #[test]
    fn test_partial_overlap_counts_as_common() {
        // "AI" appears in two of three articles: common under union semantics
        let articles = vec![
            article(&["AI", "chips"]),
            article(&["AI", "earnings"]),
            article(&["earnings", "layoffs"]),
        ];
        let overlap = topic_overlap(&articles);

        assert_eq!(overlap.common_topics, set(&["AI", "earnings"]));
        assert_eq!(overlap.unique_topics[0].topics, set(&["chips"]));
        assert_eq!(overlap.unique_topics[1].topics, BTreeSet::new());
        assert_eq!(overlap.unique_topics[2].topics, set(&["layoffs"]));
    }

    #[test]
    fn test_overlap_invariants() {
        let articles = vec![
            article(&["a", "b", "c"]),
            article(&["b", "d"]),
            article(&["e"]),
            article(&["c", "d", "f"]),
            article(&[]),
        ];
        let overlap = topic_overlap(&articles);

        for topic in &overlap.common_topics {
            let holders = articles.iter().filter(|a| a.topics.contains(topic)).count();
            assert!(holders >= 2, "{} held by {}", topic, holders);
        }

        for (i, entry) in overlap.unique_topics.iter().enumerate() {
            for topic in &entry.topics {
                assert!(articles[i].topics.contains(topic));
                let others = articles
                    .iter()
                    .enumerate()
                    .filter(|(j, a)| *j != i && a.topics.contains(topic))
                    .count();
                assert_eq!(others, 0);
            }
            // every topic of the article is either exclusive or common
            for topic in &articles[i].topics {
                assert!(entry.topics.contains(topic) ^ overlap.common_topics.contains(topic));
            }
        }
    }

    #[test]
    fn test_single_article_has_no_common_topics() {
        let overlap = topic_overlap(&[article(&["EV"])]);
        assert!(overlap.common_topics.is_empty());
        assert_eq!(overlap.unique_topics[0].topics, set(&["EV"]));
    }
}
