//! PostgreSQL datastore implementation.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbConn, DbErr,
    EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use blog_core::domain::{Comment, Post};
use blog_core::error::RepoError;
use blog_core::ports::{
    CommentRepository, PostOrder, PostQuery, PostRepository, PostTransaction, TransactionOptions,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};

/// Posts and comments stored in PostgreSQL.
///
/// Transactions run at SERIALIZABLE isolation, so a concurrent claim of the
/// same slug surfaces as `RepoError::Conflict`.
pub struct PostgresDatastore {
    pub(crate) db: DbConn,
}

impl PostgresDatastore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_db_err(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("could not serialize")
        || err_str.contains("duplicate")
        || err_str.contains("unique")
    {
        RepoError::Conflict(err_str)
    } else if matches!(e, DbErr::ConnectionAcquire(_) | DbErr::Conn(_)) {
        RepoError::Connection(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

/// Insert or overwrite a post row.
async fn upsert<C: ConnectionTrait>(conn: &C, post: &Post) -> Result<(), RepoError> {
    let slug = post.slug.as_deref().ok_or(RepoError::MissingKey)?;

    PostEntity::insert(post::ActiveModel::from_post(slug, post))
        .on_conflict(
            OnConflict::column(post::Column::Slug)
                .update_columns([
                    post::Column::Title,
                    post::Column::Text,
                    post::Column::Created,
                    post::Column::Updated,
                    post::Column::NumComments,
                    post::Column::Draft,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(map_db_err)?;

    Ok(())
}

#[async_trait]
impl PostRepository for PostgresDatastore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(slug.to_string())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn query(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let mut select = PostEntity::find();
        if !query.include_drafts {
            select = select.filter(post::Column::Draft.eq(false));
        }
        select = match query.order {
            PostOrder::CreatedDesc => select.order_by_desc(post::Column::Created),
            PostOrder::UpdatedDesc => select.order_by_desc(post::Column::Updated),
        };

        // OFFSET is a signed bigint.
        let offset = query.offset.min(i64::MAX as u64);
        let result = select
            .offset(offset)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn save(&self, post: &Post) -> Result<(), RepoError> {
        upsert(&self.db, post).await
    }

    async fn set_num_comments(&self, slug: &str, num_comments: u32) -> Result<(), RepoError> {
        let num_comments = i32::try_from(num_comments).unwrap_or(i32::MAX);
        PostEntity::update_many()
            .col_expr(post::Column::NumComments, Expr::value(num_comments))
            .filter(post::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn begin(
        &self,
        options: TransactionOptions,
    ) -> Result<Box<dyn PostTransaction>, RepoError> {
        // Every row lives in one database, so cross-group is always available.
        tracing::trace!(cross_group = options.cross_group, "Begin postgres transaction");
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await
            .map_err(map_db_err)?;

        Ok(Box::new(PostgresTransaction { txn }))
    }
}

#[async_trait]
impl CommentRepository for PostgresDatastore {
    async fn find_by_post(&self, post_slug: &str) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostSlug.eq(post_slug))
            .order_by_asc(comment::Column::Created)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, post_slug: &str, comment: &Comment) -> Result<Uuid, RepoError> {
        let id = Uuid::new_v4();
        comment::ActiveModel::from_comment(id, post_slug, comment)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(id)
    }
}

struct PostgresTransaction {
    txn: DatabaseTransaction,
}

#[async_trait]
impl PostTransaction for PostgresTransaction {
    async fn exists(&mut self, slug: &str) -> Result<bool, RepoError> {
        let found = PostEntity::find_by_id(slug.to_string())
            .one(&self.txn)
            .await
            .map_err(map_db_err)?;

        Ok(found.is_some())
    }

    async fn put(&mut self, post: &Post) -> Result<(), RepoError> {
        upsert(&self.txn, post).await
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.txn.commit().await.map_err(map_db_err)
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        self.txn.rollback().await.map_err(map_db_err)
    }
}
