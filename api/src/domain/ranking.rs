//! Scoring model for the "for you" feed.
//!
//! Every post gets three partial scores in `[0, 1]` (recency, social
//! relevance and content quality) that are blended with [`RankingWeights`].

use chrono::Duration;

const HOUR_SECS: f64 = 3_600.0;
const DAY_SECS: f64 = 86_400.0;
const WEEK_SECS: f64 = 604_800.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    pub recency: f64,
    pub social: f64,
    pub quality: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            recency: 0.5,
            social: 0.3,
            quality: 0.2,
        }
    }
}

/// How the viewer relates to the author of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Stranger,
    Following,
    Mutual,
}

impl Relationship {
    pub fn between(viewer_follows_author: bool, author_follows_viewer: bool) -> Self {
        match (viewer_follows_author, author_follows_viewer) {
            (true, true) => Relationship::Mutual,
            (true, false) => Relationship::Following,
            _ => Relationship::Stranger,
        }
    }
}

/// 1.0 inside the first hour, linear decay to 0.7 over the first day, then
/// to 0.3 over the first week, then halving every week with a 0.1 floor.
pub fn recency_score(age: Duration) -> f64 {
    let age_secs = age.num_milliseconds() as f64 / 1_000.0;
    if age_secs < HOUR_SECS {
        1.0
    } else if age_secs < DAY_SECS {
        1.0 - (age_secs / DAY_SECS) * 0.3
    } else if age_secs < WEEK_SECS {
        0.7 - ((age_secs - DAY_SECS) / (WEEK_SECS - DAY_SECS)) * 0.4
    } else {
        let weeks_old = age_secs / WEEK_SECS;
        (0.3 * 0.5_f64.powf(weeks_old - 1.0)).max(0.1)
    }
}

pub fn social_score(relationship: Relationship) -> f64 {
    match relationship {
        Relationship::Mutual => 1.0,
        Relationship::Following => 0.8,
        Relationship::Stranger => 0.2,
    }
}

pub fn quality_score(content: &str) -> f64 {
    let len = content.chars().count();
    let length_score = if (100..=200).contains(&len) {
        1.0
    } else if len < 50 {
        0.5 + len as f64 / 100.0
    } else if len > 200 {
        (0.9 + (len - 200) as f64 / 800.0).min(1.0)
    } else {
        0.7 + (len - 50) as f64 / 167.0
    };
    // any non-ASCII character counts as an emoji
    let emoji_bonus = if content.chars().any(|c| !c.is_ascii()) {
        0.1
    } else {
        0.0
    };
    (length_score + emoji_bonus).min(1.0)
}

pub fn score_post(
    content: &str,
    age: Duration,
    relationship: Relationship,
    weights: &RankingWeights,
) -> f64 {
    recency_score(age) * weights.recency
        + social_score(relationship) * weights.social
        + quality_score(content) * weights.quality
}
