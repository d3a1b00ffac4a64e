use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPost::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogPost::Slug)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogPost::Title).string().not_null())
                    .col(ColumnDef::new(BlogPost::Text).text().not_null())
                    .col(
                        ColumnDef::new(BlogPost::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlogPost::Updated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlogPost::NumComments)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BlogPost::Draft)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing pages filter on draft and sort by creation time.
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_post_draft_created")
                    .table(BlogPost::Table)
                    .col(BlogPost::Draft)
                    .col(BlogPost::Created)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlogComment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogComment::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogComment::PostSlug).string().not_null())
                    .col(ColumnDef::new(BlogComment::Author).string().not_null())
                    .col(ColumnDef::new(BlogComment::AuthorEmail).string().not_null())
                    .col(ColumnDef::new(BlogComment::AuthorUrl).string().not_null())
                    .col(ColumnDef::new(BlogComment::Text).text().not_null())
                    .col(
                        ColumnDef::new(BlogComment::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BlogComment::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_comment_post")
                            .from(BlogComment::Table, BlogComment::PostSlug)
                            .to(BlogPost::Table, BlogPost::Slug)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_comment_post_created")
                    .table(BlogComment::Table)
                    .col(BlogComment::PostSlug)
                    .col(BlogComment::Created)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogComment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BlogPost::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BlogPost {
    Table,
    Slug,
    Title,
    Text,
    Created,
    Updated,
    NumComments,
    Draft,
}

#[derive(DeriveIden)]
enum BlogComment {
    Table,
    Id,
    PostSlug,
    Author,
    AuthorEmail,
    AuthorUrl,
    Text,
    Approved,
    Created,
}
