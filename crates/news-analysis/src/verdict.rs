//! Overall outlook derived from the sentiment distribution.
//!
//! Only the Positive and Negative counts vote. A strict plurality of one over
//! the other decides the outlook; equal counts are reported as mixed/neutral
//! no matter how many Neutral articles there are.

use report_core::{Sentiment, SentimentDistribution};

pub fn outlook(dist: &SentimentDistribution) -> Sentiment {
    use std::cmp::Ordering;

    match dist.positive.cmp(&dist.negative) {
        Ordering::Greater => Sentiment::Positive,
        Ordering::Less => Sentiment::Negative,
        Ordering::Equal => Sentiment::Neutral,
    }
}

pub fn verdict_text(company: &str, outlook: Sentiment) -> String {
    match outlook {
        Sentiment::Positive => format!(
            "{}'s latest news coverage is mostly positive. Potential stock growth expected.",
            company
        ),
        Sentiment::Negative => format!(
            "{}'s latest news coverage is mostly negative. Potential stock decline expected.",
            company
        ),
        Sentiment::Neutral => format!(
            "{}'s latest news coverage is mixed or neutral. No clear market direction expected.",
            company
        ),
    }
}
