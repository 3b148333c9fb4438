use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Artists {
    Table,
    Id,
    Name,
    Nationality,
    Image,
    Description,
    IsBand,
}

#[derive(Iden)]
enum Albums {
    Table,
    Id,
    Name,
    Cover,
    Year,
    Genre,
    ArtistId,
}

#[derive(Iden)]
enum Songs {
    Table,
    Id,
    Name,
    Songwriter,
    Lyrics,
    AlbumId,
}

#[derive(Iden)]
enum Members {
    Table,
    Id,
    Name,
    Instrument,
    Year,
    ArtistId,
    Image,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artists::Name).string().not_null())
                    .col(ColumnDef::new(Artists::Nationality).string().not_null())
                    .col(ColumnDef::new(Artists::Image).string())
                    .col(ColumnDef::new(Artists::Description).text().not_null())
                    .col(ColumnDef::new(Artists::IsBand).string().not_null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Albums::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Albums::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Albums::Name).string().not_null())
                    .col(ColumnDef::new(Albums::Cover).string())
                    .col(ColumnDef::new(Albums::Year).integer().not_null())
                    .col(ColumnDef::new(Albums::Genre).string().not_null())
                    .col(ColumnDef::new(Albums::ArtistId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-albums-artist_id")
                            .from(Albums::Table, Albums::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Songs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Songs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Songs::Name).string().not_null())
                    .col(ColumnDef::new(Songs::Songwriter).string().not_null())
                    .col(ColumnDef::new(Songs::Lyrics).text())
                    .col(ColumnDef::new(Songs::AlbumId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-songs-album_id")
                            .from(Songs::Table, Songs::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(ColumnDef::new(Members::Instrument).string().not_null())
                    .col(ColumnDef::new(Members::Year).integer().not_null())
                    .col(ColumnDef::new(Members::ArtistId).integer().not_null())
                    .col(ColumnDef::new(Members::Image).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-members-artist_id")
                            .from(Members::Table, Members::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }
}
