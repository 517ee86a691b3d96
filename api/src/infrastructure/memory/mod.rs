//! Process-local store implementing every repository port.
//!
//! Backs the unit and router tests; ordering and conflict rules mirror the
//! Postgres schema so the same use cases behave identically on both.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::application::pagination::PageRequest;
use crate::application::ports::follow_repository::FollowRepository;
use crate::application::ports::health_probe::HealthProbe;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::user_repository::{CreateUserError, UserRepository};
use crate::domain::posts::post::{NewPost, Post, PostAuthor, PostPage};
use crate::domain::users::user::{
    NewUser, ProfileChanges, User, UserCredentials, UserProfile, new_user_id,
};

#[derive(Debug, Clone)]
struct StoredPost {
    id: String,
    author_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: HashMap<String, UserCredentials>,
    posts: Vec<StoredPost>,
    // (follower_id, followed_id)
    follows: BTreeSet<(String, String)>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl State {
    // Strictly increasing so "newest first" never depends on clock resolution.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn profile(&self, user: &User) -> UserProfile {
        UserProfile {
            user: user.clone(),
            post_count: self.posts.iter().filter(|p| p.author_id == user.id).count() as i64,
            follower_count: self.follows.iter().filter(|(_, b)| *b == user.id).count() as i64,
            following_count: self.follows.iter().filter(|(a, _)| *a == user.id).count() as i64,
        }
    }

    fn hydrate(&self, post: &StoredPost) -> Option<Post> {
        let author = &self.users.get(&post.author_id)?.user;
        Some(Post {
            id: post.id.clone(),
            content: post.content.clone(),
            created_at: post.created_at,
            author: PostAuthor {
                id: author.id.clone(),
                username: author.username.clone(),
                display_name: author.display_name.clone(),
            },
        })
    }

    fn newest_first<F>(&self, keep: F) -> Vec<Post>
    where
        F: Fn(&StoredPost) -> bool,
    {
        let mut matching: Vec<&StoredPost> = self.posts.iter().filter(|p| keep(p)).collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        matching.into_iter().filter_map(|p| self.hydrate(p)).collect()
    }

    fn page<F>(&self, page: PageRequest, keep: F) -> PostPage
    where
        F: Fn(&StoredPost) -> bool,
    {
        let all = self.newest_first(keep);
        PostPage {
            total: all.len() as i64,
            posts: page.slice(&all),
        }
    }

    fn profiles_sorted(&self, ids: impl Iterator<Item = String>) -> Vec<UserProfile> {
        let mut profiles: Vec<UserProfile> = ids
            .filter_map(|id| self.users.get(&id))
            .map(|c| self.profile(&c.user))
            .collect();
        profiles.sort_by(|a, b| a.user.username.cmp(&b.user.username));
        profiles
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user with a placeholder hash and returns its id.
    pub async fn seed_user(&self, username: &str) -> String {
        let mut st = self.state.write().await;
        let id = new_user_id();
        let created_at = st.next_timestamp();
        st.users.insert(
            id.clone(),
            UserCredentials {
                user: User {
                    id: id.clone(),
                    username: username.to_string(),
                    email: format!("{username}@example.com"),
                    display_name: None,
                    bio: None,
                    created_at,
                },
                password_hash: String::new(),
            },
        );
        id
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, CreateUserError> {
        let mut st = self.state.write().await;
        if st.users.values().any(|c| c.user.username == user.username) {
            return Err(CreateUserError::UsernameTaken);
        }
        if st.users.values().any(|c| c.user.email == user.email) {
            return Err(CreateUserError::EmailTaken);
        }
        let created = User {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            bio: user.bio.clone(),
            created_at: st.next_timestamp(),
        };
        st.users.insert(
            created.id.clone(),
            UserCredentials {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let st = self.state.read().await;
        Ok(st.users.values().any(|c| c.user.username == username))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let st = self.state.read().await;
        Ok(st.users.values().any(|c| c.user.email == email))
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        let st = self.state.read().await;
        Ok(st.users.get(id).map(|c| c.user.clone()))
    }

    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserCredentials>> {
        let st = self.state.read().await;
        Ok(st
            .users
            .values()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn find_profile(&self, id: &str) -> anyhow::Result<Option<UserProfile>> {
        let st = self.state.read().await;
        Ok(st.users.get(id).map(|c| st.profile(&c.user)))
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let mut st = self.state.write().await;
        let Some(creds) = st.users.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.display_name {
            creds.user.display_name = Some(name.clone());
        }
        if let Some(bio) = &changes.bio {
            creds.user.bio = Some(bio.clone());
        }
        Ok(Some(creds.user.clone()))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: &NewPost) -> anyhow::Result<Post> {
        let mut st = self.state.write().await;
        if !st.users.contains_key(&post.author_id) {
            anyhow::bail!("author {} does not exist", post.author_id);
        }
        let stored = StoredPost {
            id: post.id.clone(),
            author_id: post.author_id.clone(),
            content: post.content.clone(),
            created_at: st.next_timestamp(),
        };
        st.posts.push(stored.clone());
        st.hydrate(&stored)
            .ok_or_else(|| anyhow::anyhow!("author {} vanished", post.author_id))
    }

    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Post>> {
        let st = self.state.read().await;
        Ok(st
            .posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| st.hydrate(p)))
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let mut st = self.state.write().await;
        let before = st.posts.len();
        st.posts.retain(|p| p.id != id);
        Ok(st.posts.len() < before)
    }

    async fn list_by_author(
        &self,
        author_id: &str,
        page: PageRequest,
    ) -> anyhow::Result<PostPage> {
        let st = self.state.read().await;
        Ok(st.page(page, |p| p.author_id == author_id))
    }

    async fn timeline_for(&self, user_id: &str, page: PageRequest) -> anyhow::Result<PostPage> {
        let st = self.state.read().await;
        Ok(st.page(page, |p| {
            p.author_id == user_id
                || st
                    .follows
                    .contains(&(user_id.to_string(), p.author_id.clone()))
        }))
    }

    async fn list_all(&self, page: PageRequest) -> anyhow::Result<PostPage> {
        let st = self.state.read().await;
        Ok(st.page(page, |_| true))
    }

    async fn recent(&self, limit: i64) -> anyhow::Result<Vec<Post>> {
        let st = self.state.read().await;
        let mut posts = st.newest_first(|_| true);
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn follow(&self, follower_id: &str, followed_id: &str) -> anyhow::Result<bool> {
        let mut st = self.state.write().await;
        Ok(st
            .follows
            .insert((follower_id.to_string(), followed_id.to_string())))
    }

    async fn unfollow(&self, follower_id: &str, followed_id: &str) -> anyhow::Result<bool> {
        let mut st = self.state.write().await;
        Ok(st
            .follows
            .remove(&(follower_id.to_string(), followed_id.to_string())))
    }

    async fn followers_of(&self, user_id: &str) -> anyhow::Result<Vec<UserProfile>> {
        let st = self.state.read().await;
        let ids = st
            .follows
            .iter()
            .filter(|(_, b)| b == user_id)
            .map(|(a, _)| a.clone());
        Ok(st.profiles_sorted(ids))
    }

    async fn following_of(&self, user_id: &str) -> anyhow::Result<Vec<UserProfile>> {
        let st = self.state.read().await;
        let ids = st
            .follows
            .iter()
            .filter(|(a, _)| a == user_id)
            .map(|(_, b)| b.clone());
        Ok(st.profiles_sorted(ids))
    }

    async fn follower_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        let st = self.state.read().await;
        Ok(st
            .follows
            .iter()
            .filter(|(_, b)| b == user_id)
            .map(|(a, _)| a.clone())
            .collect())
    }

    async fn following_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        let st = self.state.read().await;
        Ok(st
            .follows
            .iter()
            .filter(|(a, _)| a == user_id)
            .map(|(_, b)| b.clone())
            .collect())
    }
}

#[async_trait]
impl HealthProbe for InMemoryStore {
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::post::new_post_id;

    async fn write(store: &InMemoryStore, author: &str, content: &str) -> Post {
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
    async fn rejects_duplicate_username_and_email() {
        let store = InMemoryStore::new();
        let new_user = |username: &str, email: &str| NewUser {
            id: new_user_id(),
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
            display_name: None,
            bio: None,
        };
        store.create_user(&new_user("alice", "a@example.com")).await.unwrap();
        assert!(matches!(
            store.create_user(&new_user("alice", "b@example.com")).await,
            Err(CreateUserError::UsernameTaken)
        ));
        assert!(matches!(
            store.create_user(&new_user("bob", "a@example.com")).await,
            Err(CreateUserError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn timeline_includes_own_and_followed_newest_first() {
        let store = InMemoryStore::new();
        let alice = store.seed_user("alice").await;
        let bob = store.seed_user("bob").await;
        let carol = store.seed_user("carol").await;
        store.follow(&alice, &bob).await.unwrap();

        write(&store, &alice, "mine").await;
        write(&store, &bob, "followed").await;
        write(&store, &carol, "stranger").await;

        let page = store
            .timeline_for(&alice, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        let contents: Vec<&str> = page.posts.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["followed", "mine"]);
    }

    #[tokio::test]
    async fn follow_edges_are_unique_and_counted() {
        let store = InMemoryStore::new();
        let alice = store.seed_user("alice").await;
        let bob = store.seed_user("bob").await;
        assert!(store.follow(&alice, &bob).await.unwrap());
        assert!(!store.follow(&alice, &bob).await.unwrap());

        let profile = store.find_profile(&bob).await.unwrap().unwrap();
        assert_eq!(profile.follower_count, 1);
        assert_eq!(profile.following_count, 0);

        assert!(store.unfollow(&alice, &bob).await.unwrap());
        assert!(!store.unfollow(&alice, &bob).await.unwrap());
    }

    #[tokio::test]
    async fn timestamps_are_strictly_increasing() {
        let store = InMemoryStore::new();
        let alice = store.seed_user("alice").await;
        let first = write(&store, &alice, "one").await;
        let second = write(&store, &alice, "two").await;
        assert!(second.created_at > first.created_at);
    }
}
