//! In-memory store used by service and controller tests. Every trait
//! call counts as one round trip and can be made to fail on demand.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use error_stack::Report;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use super::{ContentStore, RelationshipStore, UserDirectory};
use crate::{
    database::{Error, Result},
    schema::{Comment, Image, ImageWithCounts, InsertComment, InsertImage, UpdateUser, User},
    types::id::{CommentId, ImageId, UserId},
};

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    users: BTreeMap<UserId, User>,
    images: BTreeMap<ImageId, Image>,
    follows: BTreeSet<(UserId, UserId)>,
    likes: BTreeSet<(UserId, ImageId)>,
    comments: BTreeMap<CommentId, Comment>,
    tags: BTreeMap<ImageId, BTreeSet<String>>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    round_trips: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, username: &str) -> UserId {
        let mut state = self.state.lock().unwrap();
        let id = UserId::new(state.next_id());
        state.users.insert(
            id,
            User {
                id,
                created_at: NaiveDateTime::default(),
                username: username.to_string(),
                name: username.to_string(),
                bio: None,
                website: None,
                email: None,
                phone: None,
                gender: None,
                profile_image_url: None,
                updated_at: None,
            },
        );
        id
    }

    pub fn tags_of(&self, image_id: ImageId) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .tags
            .get(&image_id)
            .map(|tags| tags.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Makes every following call fail like a dropped database.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn round_trip(&self) -> Result<()> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Report::new(Error::UnhealthyPool));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.round_trip()?;
        Ok(self.state.lock().unwrap().users.get(&id).cloned())
    }

    async fn update_user(&self, changes: &UpdateUser) -> Result<Option<User>> {
        self.round_trip()?;
        let mut state = self.state.lock().unwrap();
        Ok(state.users.get_mut(&changes.id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn follower_count(&self, user_id: UserId) -> Result<u64> {
        self.round_trip()?;
        let state = self.state.lock().unwrap();
        Ok(state.follows.iter().filter(|(_, b)| *b == user_id).count() as u64)
    }

    async fn following_count(&self, user_id: UserId) -> Result<u64> {
        self.round_trip()?;
        let state = self.state.lock().unwrap();
        Ok(state.follows.iter().filter(|(a, _)| *a == user_id).count() as u64)
    }

    async fn is_following(&self, follower: UserId, followee: UserId) -> Result<bool> {
        self.round_trip()?;
        let state = self.state.lock().unwrap();
        Ok(follower != followee && state.follows.contains(&(follower, followee)))
    }

    async fn follow(&self, follower: UserId, followee: UserId) -> Result<bool> {
        self.round_trip()?;
        if follower == followee {
            return Ok(false);
        }

        let mut state = self.state.lock().unwrap();
        if !state.users.contains_key(&follower) || !state.users.contains_key(&followee) {
            return Err(Report::new(Error::MissingReference));
        }
        Ok(state.follows.insert((follower, followee)))
    }

    async fn unfollow(&self, follower: UserId, followee: UserId) -> Result<bool> {
        self.round_trip()?;
        Ok(self.state.lock().unwrap().follows.remove(&(follower, followee)))
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn images_with_counts(&self, owner_id: UserId) -> Result<Vec<ImageWithCounts>> {
        self.round_trip()?;
        let state = self.state.lock().unwrap();
        let images = state
            .images
            .values()
            .filter(|image| image.owner_id == owner_id)
            .map(|image| ImageWithCounts {
                id: image.id,
                url: image.url.clone(),
                like_count: i64::try_from(state.likes.iter().filter(|(_, i)| *i == image.id).count())
                    .unwrap(),
                comment_count: i64::try_from(
                    state
                        .comments
                        .values()
                        .filter(|c| c.image_id == image.id)
                        .count(),
                )
                .unwrap(),
            })
            .collect();

        Ok(images)
    }

    async fn find_image(&self, id: ImageId) -> Result<Option<Image>> {
        self.round_trip()?;
        Ok(self.state.lock().unwrap().images.get(&id).cloned())
    }

    async fn post_image(&self, image: &InsertImage<'_>) -> Result<Image> {
        self.round_trip()?;
        let mut state = self.state.lock().unwrap();
        let row = Image {
            id: ImageId::new(state.next_id()),
            created_at: NaiveDateTime::default(),
            owner_id: image.owner_id,
            url: image.url.to_string(),
            caption: image.caption.map(str::to_string),
        };
        if !image.tags.is_empty() {
            state.tags.insert(row.id, image.tags.iter().cloned().collect());
        }
        state.images.insert(row.id, row.clone());
        Ok(row)
    }

    async fn like(&self, user_id: UserId, image_id: ImageId) -> Result<bool> {
        self.round_trip()?;
        let mut state = self.state.lock().unwrap();
        if !state.images.contains_key(&image_id) {
            return Err(Report::new(Error::MissingReference));
        }
        Ok(state.likes.insert((user_id, image_id)))
    }

    async fn unlike(&self, user_id: UserId, image_id: ImageId) -> Result<bool> {
        self.round_trip()?;
        Ok(self.state.lock().unwrap().likes.remove(&(user_id, image_id)))
    }

    async fn comment(&self, comment: &InsertComment<'_>) -> Result<Comment> {
        self.round_trip()?;
        let mut state = self.state.lock().unwrap();
        if !state.images.contains_key(&comment.image_id) {
            return Err(Report::new(Error::MissingReference));
        }

        let comment = Comment {
            id: CommentId::new(state.next_id()),
            created_at: NaiveDateTime::default(),
            author_id: comment.author_id,
            image_id: comment.image_id,
            content: comment.content.to_string(),
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete_comment(&self, id: CommentId, author_id: UserId) -> Result<bool> {
        self.round_trip()?;
        let mut state = self.state.lock().unwrap();
        match state.comments.get(&id) {
            Some(comment) if comment.author_id == author_id => {
                state.comments.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn net_zero_engagement_restores_counts() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");
        let bob = store.insert_user("bob");

        let image = store
            .post_image(&InsertImage {
                owner_id: alice,
                url: "https://cdn.example.com/1.png",
                caption: None,
                tags: &[],
            })
            .await
            .unwrap();

        store.like(alice, image.id).await.unwrap();
        let before = store.images_with_counts(alice).await.unwrap();

        store.like(bob, image.id).await.unwrap();
        let comment = store
            .comment(&InsertComment {
                author_id: bob,
                image_id: image.id,
                content: "wow",
            })
            .await
            .unwrap();

        let during = store.images_with_counts(alice).await.unwrap();
        assert_eq!(during[0].like_count, 2);
        assert_eq!(during[0].comment_count, 1);

        assert!(store.unlike(bob, image.id).await.unwrap());
        assert!(store.delete_comment(comment.id, bob).await.unwrap());

        let after = store.images_with_counts(alice).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn writes_to_missing_rows_are_rejected() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");
        let ghost = UserId::new(404);

        assert!(!store.follow(alice, alice).await.unwrap());

        let error = store.follow(alice, ghost).await.unwrap_err();
        assert!(matches!(error.current_context(), Error::MissingReference));

        let error = store.like(alice, ImageId::new(404)).await.unwrap_err();
        assert!(matches!(error.current_context(), Error::MissingReference));
    }

    #[tokio::test]
    async fn likes_are_deduplicated() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");
        let image = store
            .post_image(&InsertImage {
                owner_id: alice,
                url: "https://cdn.example.com/1.png",
                caption: None,
                tags: &[],
            })
            .await
            .unwrap();

        assert!(store.like(alice, image.id).await.unwrap());
        assert!(!store.like(alice, image.id).await.unwrap());

        let images = store.images_with_counts(alice).await.unwrap();
        assert_eq!(images[0].like_count, 1);
    }

    #[tokio::test]
    async fn comments_are_deleted_by_author_only() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice");
        let bob = store.insert_user("bob");
        let image = store
            .post_image(&InsertImage {
                owner_id: alice,
                url: "https://cdn.example.com/1.png",
                caption: None,
                tags: &[],
            })
            .await
            .unwrap();

        let comment = store
            .comment(&InsertComment {
                author_id: bob,
                image_id: image.id,
                content: "hi",
            })
            .await
            .unwrap();

        assert!(!store.delete_comment(comment.id, alice).await.unwrap());
        assert!(store.delete_comment(comment.id, bob).await.unwrap());
        assert!(!store.delete_comment(comment.id, bob).await.unwrap());
    }
}
