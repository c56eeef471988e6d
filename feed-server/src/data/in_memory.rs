use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::data::author_repository::AuthorRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::profile_repository::ProfileRepository;
use crate::domain::author::{Author, ProfileSummary};
use crate::domain::comment::{CommentRecord, NewComment};
use crate::domain::error::DomainError;
use crate::domain::feed_query::{Predicate, QueryPlan, SortKey, SortOrder};
use crate::domain::post::{DEFAULT_VISIBILITY, NewPost, Post};
use crate::domain::profile::Profile;
use crate::domain::tags::{TagGroup, group_tag_fields};

#[derive(Default)]
struct State {
    posts: Vec<Post>,
    comments: Vec<(i64, i64, i64, String, DateTime<Utc>)>,
    users: HashMap<i64, String>,
    profiles: HashMap<i64, Profile>,
    next_id: i64,
}

impl State {
    fn author(&self, id: i64) -> Option<Author> {
        self.users.get(&id).map(|name| Author {
            id,
            name: name.clone(),
            profile: self.profiles.get(&id).map(Profile::summary),
        })
    }

    fn avatar(&self, user_id: i64) -> Option<String> {
        self.profiles.get(&user_id).and_then(|p| p.image.clone())
    }

    fn upsert_profile(&mut self, mut profile: Profile) -> Profile {
        match self.profiles.get(&profile.user_id) {
            Some(existing) => {
                profile.id = existing.id;
                profile.image = existing.image.clone();
            }
            None => {
                self.next_id += 1;
                profile.id = self.next_id;
            }
        }
        self.profiles.insert(profile.user_id, profile.clone());
        profile
    }
}

/// Store double that evaluates query plans in process.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
    aggregate_reads: AtomicUsize,
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A public post whose `created_at` grows with its id.
pub fn sample_post(id: i64, author_id: i64) -> Post {
    Post {
        id,
        author_id,
        content: format!("post number {id}"),
        media_url: None,
        likes: 0,
        tags: None,
        category: None,
        visibility: DEFAULT_VISIBILITY.to_string(),
        created_at: base_time() + Duration::minutes(id),
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        let store = Self::new();
        for post in posts {
            store.insert_post(post);
        }
        store
    }

    pub fn insert_post(&self, post: Post) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(post.id);
        state.posts.push(post);
    }

    /// Registers a user; a summary also gives them a profile with placeholder names.
    pub fn add_author(&self, id: i64, name: &str, profile: Option<ProfileSummary>) {
        let mut state = self.state.lock().unwrap();
        state.users.insert(id, name.to_string());
        if let Some(summary) = profile {
            let mut profile = Profile::placeholder(id);
            profile.image = summary.image;
            profile.job_title = summary.job_title;
            state.upsert_profile(profile);
        }
    }

    pub fn profile(&self, user_id: i64) -> Option<Profile> {
        self.state.lock().unwrap().profiles.get(&user_id).cloned()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// How many aggregate queries reached the store.
    pub fn aggregate_reads(&self) -> usize {
        self.aggregate_reads.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DomainError::StoreUnavailable)
        } else {
            Ok(())
        }
    }
}

fn compare(a: &Post, b: &Post, sort: SortKey) -> std::cmp::Ordering {
    match sort {
        SortKey::Likes => a.likes.cmp(&b.likes),
        SortKey::CreatedAt | SortKey::Views => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    fn supports_views(&self) -> bool {
        false
    }

    async fn list(&self, plan: &QueryPlan) -> Result<Vec<Post>, DomainError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();
        let mut matching: Vec<Post> = state
            .posts
            .iter()
            .filter(|post| plan.matches(post))
            .cloned()
            .collect();
        matching.sort_by(|a, b| match plan.order {
            SortOrder::Asc => compare(a, b, plan.sort),
            SortOrder::Desc => compare(b, a, plan.sort),
        });

        Ok(matching
            .into_iter()
            .skip(plan.offset as usize)
            .take(plan.limit as usize)
            .collect())
    }

    async fn count(&self, predicates: &[Predicate]) -> Result<u64, DomainError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .posts
            .iter()
            .filter(|post| predicates.iter().all(|p| p.matches(post)))
            .count() as u64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();
        Ok(state.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = Post {
            id: state.next_id,
            author_id: post.author_id,
            content: post.content,
            media_url: post.media_url,
            likes: 0,
            tags: post.tags,
            category: post.category,
            visibility: post.visibility,
            created_at: base_time() + Duration::minutes(state.next_id),
        };
        state.posts.push(created.clone());
        Ok(created)
    }

    async fn increment_likes(&self, id: i64) -> Result<Option<i64>, DomainError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();
        Ok(state.posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.likes += 1;
            post.likes
        }))
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, DomainError> {
        self.aggregate_reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let state = self.state.lock().unwrap();
        let mut categories: Vec<String> = state
            .posts
            .iter()
            .filter_map(|p| p.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn tag_groups(&self, limit: usize) -> Result<Vec<TagGroup>, DomainError> {
        self.aggregate_reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let state = self.state.lock().unwrap();
        let mut groups = group_tag_fields(state.posts.iter().map(|p| p.tags.as_deref()));
        groups.truncate(limit);
        Ok(groups)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<Vec<CommentRecord>, DomainError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();
        let mut records: Vec<CommentRecord> = state
            .comments
            .iter()
            .filter(|(_, post_id, ..)| post_ids.contains(post_id))
            .map(|(id, post_id, author_id, content, created_at)| CommentRecord {
                id: *id,
                post_id: *post_id,
                author_id: *author_id,
                author_name: state.users.get(author_id).cloned(),
                author_avatar: state.avatar(*author_id),
                content: content.clone(),
                created_at: *created_at,
            })
            .collect();
        records.sort_by_key(|c| (c.created_at, c.id));
        Ok(records)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CommentRecord, DomainError> {
        self.check_available()?;
        let (id, created_at) = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = state.next_id;
            let created_at = base_time() + Duration::minutes(id);
            state.comments.push((
                id,
                comment.post_id,
                comment.author_id,
                comment.content.clone(),
                created_at,
            ));
            (id, created_at)
        };

        let state = self.state.lock().unwrap();
        Ok(CommentRecord {
            id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name: state.users.get(&comment.author_id).cloned(),
            author_avatar: state.avatar(comment.author_id),
            content: comment.content,
            created_at,
        })
    }
}

#[async_trait]
impl AuthorRepository for InMemoryStore {
    async fn find_authors(&self, ids: &[i64]) -> Result<Vec<Author>, DomainError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();
        Ok(ids.iter().filter_map(|id| state.author(*id)).collect())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_profile(&self, user_id: i64) -> Result<Option<Profile>, DomainError> {
        self.check_available()?;
        Ok(self.profile(user_id))
    }

    async fn ensure_profile(&self, user_id: i64) -> Result<Profile, DomainError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();
        if !state.users.contains_key(&user_id) {
            return Err(DomainError::UserNotFound(user_id));
        }
        match state.profiles.get(&user_id) {
            Some(profile) => Ok(profile.clone()),
            None => Ok(state.upsert_profile(Profile::placeholder(user_id))),
        }
    }

    async fn save_profile(&self, profile: &Profile) -> Result<Profile, DomainError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();
        if !state.users.contains_key(&profile.user_id) {
            return Err(DomainError::UserNotFound(profile.user_id));
        }
        Ok(state.upsert_profile(profile.clone()))
    }
}
