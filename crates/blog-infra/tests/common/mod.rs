//! Shared fixtures for the store integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use blog_core::BlogConfig;
use blog_core::domain::{Comment, Post};
use blog_core::error::RepoError;
use blog_core::ports::{
    Cache, CacheError, Clock, CommentRepository, PostQuery, PostRepository, PostTransaction,
    TransactionOptions,
};
use blog_core::services::{CacheAdapter, CommentStore, PostStore};
use blog_infra::{InMemoryCache, InMemoryDatastore};

/// Delegates to an [`InMemoryDatastore`], counting calls and optionally
/// refusing non-transactional writes.
#[derive(Default)]
pub struct ObservedDatastore {
    pub inner: InMemoryDatastore,
    pub count_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
    pub fail_writes: AtomicBool,
    /// Saved straight to the store on the next comment lookup, standing in for
    /// an edit committed while a post is being read.
    pub edit_on_comment_read: Mutex<Option<Post>>,
    /// Number of upcoming commits that lose a race against a rival writer.
    pub lost_commits: Arc<AtomicUsize>,
}

impl ObservedDatastore {
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn lose_next_commits(&self, n: usize) {
        self.lost_commits.store(n, Ordering::SeqCst);
    }

    fn refuse_write(&self) -> Result<(), RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Connection("datastore unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for ObservedDatastore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        self.inner.find_by_slug(slug).await
    }

    async fn query(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.query(query).await
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.count().await
    }

    async fn save(&self, post: &Post) -> Result<(), RepoError> {
        self.refuse_write()?;
        self.inner.save(post).await
    }

    async fn set_num_comments(&self, slug: &str, num_comments: u32) -> Result<(), RepoError> {
        self.refuse_write()?;
        self.inner.set_num_comments(slug, num_comments).await
    }

    async fn begin(
        &self,
        options: TransactionOptions,
    ) -> Result<Box<dyn PostTransaction>, RepoError> {
        Ok(Box::new(RacingTransaction {
            inner: self.inner.begin(options).await?,
            store: self.inner.clone(),
            lost_commits: Arc::clone(&self.lost_commits),
            staged: Vec::new(),
        }))
    }
}

#[async_trait]
impl CommentRepository for ObservedDatastore {
    async fn find_by_post(&self, post_slug: &str) -> Result<Vec<Comment>, RepoError> {
        let edit = self.edit_on_comment_read.lock().unwrap().take();
        if let Some(edit) = edit {
            self.inner.save(&edit).await?;
        }
        self.inner.find_by_post(post_slug).await
    }

    async fn insert(&self, post_slug: &str, comment: &Comment) -> Result<uuid::Uuid, RepoError> {
        self.inner.insert(post_slug, comment).await
    }
}

/// A transaction that, while `lost_commits` is positive, loses its commit to a
/// rival: the rival's post is written under every slug staged here, then the
/// commit fails with `RepoError::Conflict`.
struct RacingTransaction {
    inner: Box<dyn PostTransaction>,
    store: InMemoryDatastore,
    lost_commits: Arc<AtomicUsize>,
    staged: Vec<Post>,
}

#[async_trait]
impl PostTransaction for RacingTransaction {
    async fn exists(&mut self, slug: &str) -> Result<bool, RepoError> {
        self.inner.exists(slug).await
    }

    async fn put(&mut self, post: &Post) -> Result<(), RepoError> {
        self.staged.push(post.clone());
        self.inner.put(post).await
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let loses = self
            .lost_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !loses {
            return self.inner.commit().await;
        }

        for post in &self.staged {
            let mut rival = post.clone();
            rival.title = format!("Rival of {}", post.title);
            self.store.save(&rival).await?;
        }
        self.inner.rollback().await?;
        Err(RepoError::Conflict("lost commit race".to_string()))
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        self.inner.rollback().await
    }
}

/// A cache whose every operation fails with a connection error.
pub struct UnreachableCache;

#[async_trait]
impl Cache for UnreachableCache {
    async fn get(&self, _key: &str) -> Result<Vec<u8>, CacheError> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<(), CacheError> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn delete(&self, _keys: &[String]) -> Result<(), CacheError> {
        Err(CacheError::Connection("connection refused".to_string()))
    }
}

/// A clock that advances one minute per reading.
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            next: Mutex::new(Utc.with_ymd_and_hms(2013, 4, 7, 12, 0, 0).unwrap()),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + chrono::Duration::minutes(1);
        now
    }
}

pub struct Harness {
    pub datastore: Arc<ObservedDatastore>,
    pub cache: Arc<dyn Cache>,
    pub posts: PostStore,
    pub comments: CommentStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(InMemoryCache::new()))
    }

    pub fn with_cache(cache: Arc<dyn Cache>) -> Self {
        Self::build(cache, BlogConfig::default())
    }

    pub fn with_config(config: BlogConfig) -> Self {
        Self::build(Arc::new(InMemoryCache::new()), config)
    }

    fn build(cache: Arc<dyn Cache>, config: BlogConfig) -> Self {
        let datastore = Arc::new(ObservedDatastore::default());
        let posts = PostStore::new(
            datastore.clone(),
            datastore.clone(),
            CacheAdapter::new(cache.clone()),
            config,
        );
        let comments = CommentStore::new(datastore.clone(), Arc::new(SteppingClock::new()));
        Self {
            datastore,
            cache,
            posts,
            comments,
        }
    }
}

/// A post created `hours` after a fixed base time.
pub fn post_at(title: &str, hours: i64) -> Post {
    let at = Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(hours);
    let mut post = Post::new(title, format!("Text of {title}"));
    post.created = at;
    post.updated = at;
    post
}
