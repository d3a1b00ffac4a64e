//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub slug: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub created: DateTimeWithTimeZone,
    pub updated: DateTimeWithTimeZone,
    pub num_comments: i32,
    pub draft: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for blog_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            slug: Some(model.slug),
            title: model.title,
            text: model.text,
            created: model.created.into(),
            updated: model.updated.into(),
            num_comments: u32::try_from(model.num_comments).unwrap_or(0),
            draft: model.draft,
        }
    }
}

impl ActiveModel {
    /// Build a full row for `post` stored under `slug`.
    pub fn from_post(slug: &str, post: &blog_core::domain::Post) -> Self {
        Self {
            slug: Set(slug.to_string()),
            title: Set(post.title.clone()),
            text: Set(post.text.clone()),
            created: Set(post.created.into()),
            updated: Set(post.updated.into()),
            num_comments: Set(i32::try_from(post.num_comments).unwrap_or(i32::MAX)),
            draft: Set(post.draft),
        }
    }
}
