use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::AttemptCounter};

#[async_trait]
pub trait AttemptCounterRepository: Send + Sync {
    async fn find(&self, subject_key: &str, date: &str) -> AppResult<Option<AttemptCounter>>;
    async fn create(&self, counter: AttemptCounter) -> AppResult<AttemptCounter>;
    async fn save(&self, counter: &AttemptCounter) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoAttemptCounterRepository {
    collection: Collection<AttemptCounter>,
}

impl MongoAttemptCounterRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("attempt_counters");
        Self { collection }
    }
}

#[async_trait]
impl AttemptCounterRepository for MongoAttemptCounterRepository {
    async fn find(&self, subject_key: &str, date: &str) -> AppResult<Option<AttemptCounter>> {
        let counter = self
            .collection
            .find_one(doc! { "subject_key": subject_key, "date": date })
            .await?;
        Ok(counter)
    }

    async fn create(&self, counter: AttemptCounter) -> AppResult<AttemptCounter> {
        self.collection.insert_one(&counter).await?;
        Ok(counter)
    }

    async fn save(&self, counter: &AttemptCounter) -> AppResult<()> {
        let filter = doc! {
            "subject_key": &counter.subject_key,
            "date": &counter.date,
        };
        let update = doc! { "$set": { "count": counter.count } };

        self.collection.update_one(filter, update).await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .name("subject_date".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "subject_key": 1, "date": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created index on attempt_counters.subject_key/date");

        Ok(())
    }
}
