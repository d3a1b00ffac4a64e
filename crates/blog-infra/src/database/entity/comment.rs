//! Comment entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_slug: String,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub approved: bool,
    pub created: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostSlug",
        to = "super::post::Column::Slug",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Comment.
impl From<Model> for blog_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            author: model.author,
            author_email: model.author_email,
            author_url: model.author_url,
            text: model.text,
            approved: model.approved,
            created: model.created.into(),
        }
    }
}

impl ActiveModel {
    /// Build a new row for `comment` under the post `post_slug`.
    pub fn from_comment(id: Uuid, post_slug: &str, comment: &blog_core::domain::Comment) -> Self {
        Self {
            id: Set(id),
            post_slug: Set(post_slug.to_string()),
            author: Set(comment.author.clone()),
            author_email: Set(comment.author_email.clone()),
            author_url: Set(comment.author_url.clone()),
            text: Set(comment.text.clone()),
            approved: Set(comment.approved),
            created: Set(comment.created.into()),
        }
    }
}
