use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{FindOptions, IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::User,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_all_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)>;
    async fn update(&self, id: &str, user: User) -> AppResult<User>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, mut user: User) -> AppResult<User> {
        let result = self.collection.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = match ObjectId::parse_str(id) {
            Ok(object_id) => object_id,
            Err(_) => return Ok(None),
        };

        let user = self
            .collection
            .find_one(doc! { "_id": object_id })
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn find_all_paginated(&self, offset: i64, limit: i64) -> AppResult<(Vec<User>, i64)> {
        let total = self.collection.count_documents(doc! {}).await? as i64;

        let options = FindOptions::builder()
            .skip(Some(offset.max(0) as u64))
            .limit(Some(limit))
            .sort(doc! { "email": 1 })
            .build();

        let cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;

        Ok((users, total))
    }

    async fn update(&self, id: &str, user: User) -> AppResult<User> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::NotFound(format!("User with id '{}' not found", id)))?;

        let filter = doc! { "_id": object_id };
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .collection
            .replace_one(filter, &user)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "User with id '{}' not found",
                id
            )));
        }

        Ok(user)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .unique(true)
            .name("email_unique".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on users.email");

        Ok(())
    }
}
