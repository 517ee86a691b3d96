use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::application::error::AppError;
use crate::application::pagination::PageRequest;
use crate::application::ports::follow_repository::FollowRepository;
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::Post;
use crate::domain::ranking::{RankingWeights, Relationship, score_post};

/// How many of the newest posts are considered for ranking.
pub const CANDIDATE_LIMIT: i64 = 1000;

#[derive(Debug, Clone)]
pub struct ScoredPost {
    pub post: Post,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct RankedPage {
    pub posts: Vec<ScoredPost>,
    pub total: i64,
}

pub struct ForYouFeed<'a, P, F>
where
    P: PostRepository + ?Sized,
    F: FollowRepository + ?Sized,
{
    pub posts: &'a P,
    pub follows: &'a F,
    pub weights: RankingWeights,
}

impl<'a, P, F> ForYouFeed<'a, P, F>
where
    P: PostRepository + ?Sized,
    F: FollowRepository + ?Sized,
{
    pub async fn execute(
        &self,
        viewer_id: &str,
        page: PageRequest,
        min_score: f64,
        now: DateTime<Utc>,
    ) -> Result<RankedPage, AppError> {
        if !(0.0..=1.0).contains(&min_score) {
            return Err(AppError::Validation(
                "min_score must be between 0 and 1".into(),
            ));
        }

        let following: HashSet<String> = self
            .follows
            .following_ids(viewer_id)
            .await?
            .into_iter()
            .collect();
        let followers: HashSet<String> = self
            .follows
            .follower_ids(viewer_id)
            .await?
            .into_iter()
            .collect();

        let mut scored: Vec<ScoredPost> = self
            .posts
            .recent(CANDIDATE_LIMIT)
            .await?
            .into_iter()
            .map(|post| {
                let relationship = Relationship::between(
                    following.contains(&post.author.id),
                    followers.contains(&post.author.id),
                );
                let score = score_post(
                    &post.content,
                    now - post.created_at,
                    relationship,
                    &self.weights,
                );
                ScoredPost { post, score }
            })
            .filter(|s| s.score >= min_score)
            .collect();

        // stable sort keeps recency order among equal scores
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok(RankedPage {
            total: scored.len() as i64,
            posts: page.slice(&scored),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::post_repository::PostRepository;
    use crate::domain::posts::post::{NewPost, new_post_id};
    use crate::infrastructure::memory::InMemoryStore;

    async fn post(store: &InMemoryStore, author: &str, content: &str) -> Post {
        store
            .create(&NewPost {
                id: new_post_id(),
                author_id: author.to_string(),
                content: content.to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn ranks_followed_authors_above_strangers() {
        let store = InMemoryStore::default();
        let viewer = store.seed_user("viewer").await;
        let friend = store.seed_user("friend").await;
        let mutual = store.seed_user("mutual").await;
        let stranger = store.seed_user("stranger").await;
        store.follow(&viewer, &friend).await.unwrap();
        store.follow(&viewer, &mutual).await.unwrap();
        store.follow(&mutual, &viewer).await.unwrap();

        post(&store, &stranger, "same length").await;
        post(&store, &friend, "same length").await;
        post(&store, &mutual, "same length").await;

        let feed = ForYouFeed {
            posts: &store,
            follows: &store,
            weights: RankingWeights::default(),
        };
        let page = feed
            .execute(&viewer, PageRequest::default(), 0.0, Utc::now())
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        let authors: Vec<&str> = page
            .posts
            .iter()
            .map(|s| s.post.author.username.as_str())
            .collect();
        assert_eq!(authors, vec!["mutual", "friend", "stranger"]);
        assert!(page.posts[0].score > page.posts[1].score);
    }

    #[tokio::test]
    async fn min_score_filters_and_paginates() {
        let store = InMemoryStore::default();
        let viewer = store.seed_user("viewer").await;
        let friend = store.seed_user("friend").await;
        let stranger = store.seed_user("stranger").await;
        store.follow(&viewer, &friend).await.unwrap();
        for i in 0..3 {
            post(&store, &friend, &format!("friend post {i}")).await;
            post(&store, &stranger, &format!("stranger post {i}")).await;
        }

        let feed = ForYouFeed {
            posts: &store,
            follows: &store,
            weights: RankingWeights::default(),
        };
        // fresh short posts: strangers score ~0.69, followed ~0.87
        let page = feed
            .execute(
                &viewer,
                PageRequest::new(Some(2), Some(0)).unwrap(),
                0.8,
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.posts.len(), 2);
        assert!(page.posts.iter().all(|s| s.post.author.username == "friend"));

        let err = feed
            .execute(&viewer, PageRequest::default(), 1.5, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
