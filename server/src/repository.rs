use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IdenStatic,
    IntoActiveModel, Iterable, PrimaryKeyTrait, Value,
};
use std::marker::PhantomData;

/// Plain data access for one entity kind over an injected connection (or
/// transaction). Field values are addressed by column name.
pub struct Repository<'a, C, E> {
    db: &'a C,
    entity: PhantomData<E>,
}

impl<'a, C, E> Repository<'a, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }

    pub async fn all(&self) -> Result<Vec<E::Model>, DbErr> {
        E::find().all(self.db).await
    }

    fn column(field: &str) -> Result<E::Column, DbErr> {
        E::Column::iter()
            .find(|c| c.as_str() == field)
            .ok_or_else(|| {
                DbErr::Custom(format!(
                    "Table {} has no column named {}",
                    E::default().as_str(),
                    field
                ))
            })
    }

    fn assign<A>(active: &mut A, values: Vec<(&str, Value)>) -> Result<(), DbErr>
    where
        A: ActiveModelTrait<Entity = E>,
    {
        for (field, value) in values {
            active.set(Self::column(field)?, value);
        }
        Ok(())
    }
}

impl<'a, C, E> Repository<'a, C, E>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    pub async fn find(&self, id: i32) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(self.db).await
    }

    pub async fn exists(&self, id: i32) -> Result<bool, DbErr> {
        Ok(self.find(id).await?.is_some())
    }

    pub async fn insert<A>(&self, values: Vec<(&str, Value)>) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        let mut active = <A as ActiveModelTrait>::default();
        Self::assign(&mut active, values)?;
        active.insert(self.db).await
    }

    /// Merges `values` into the record with the given id. Columns missing from
    /// `values` keep their stored value. Returns `None` when no record matches.
    pub async fn update<A>(
        &self,
        id: i32,
        values: Vec<(&str, Value)>,
    ) -> Result<Option<E::Model>, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        let model = match self.find(id).await? {
            Some(model) => model,
            None => return Ok(None),
        };
        if values.is_empty() {
            return Ok(Some(model));
        }
        let mut active = model.into_active_model();
        Self::assign(&mut active, values)?;
        active.update(self.db).await.map(Some)
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let res = E::delete_by_id(id).exec(self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::database;

    fn artist(name: &'static str) -> Vec<(&'static str, Value)> {
        vec![
            ("name", name.into()),
            ("nationality", "British".into()),
            ("description", "Rock band".into()),
            ("is_band", "yes".into()),
        ]
    }

    #[tokio::test]
    async fn insert_assigns_ids() {
        let db = database().await;
        let repo = Repository::<_, entity::ArtistEntity>::new(&db);
        let a = repo
            .insert::<entity::ArtistActive>(artist("The Beatles"))
            .await
            .unwrap();
        let b = repo
            .insert::<entity::ArtistActive>(artist("Queen"))
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.image, None);
        assert_eq!(repo.all().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let db = database().await;
        let repo = Repository::<_, entity::ArtistEntity>::new(&db);
        let created = repo
            .insert::<entity::ArtistActive>(artist("Queen"))
            .await
            .unwrap();
        let updated = repo
            .update::<entity::ArtistActive>(created.id, vec![("nationality", "English".into())])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.nationality, "English");
        assert_eq!(updated.name, "Queen");
        assert_eq!(repo.find(created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn missing_records() {
        let db = database().await;
        let repo = Repository::<_, entity::AlbumEntity>::new(&db);
        assert!(!repo.exists(42).await.unwrap());
        assert!(!repo.delete(42).await.unwrap());
        assert_eq!(
            repo.update::<entity::AlbumActive>(42, vec![("year", 1970.into())])
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn unknown_column_is_an_error() {
        let db = database().await;
        let repo = Repository::<_, entity::ArtistEntity>::new(&db);
        let mut values = artist("Queen");
        values.push(("label", "EMI".into()));
        assert!(repo.insert::<entity::ArtistActive>(values).await.is_err());
        assert!(repo.all().await.unwrap().is_empty());
    }
}
