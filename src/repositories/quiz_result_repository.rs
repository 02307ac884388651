use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{question::QuizCategory, QuizResult},
};

#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult>;
    async fn top_by_category(
        &self,
        category: QuizCategory,
        limit: i64,
    ) -> AppResult<Vec<QuizResult>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizResultRepository {
    collection: Collection<QuizResult>,
}

impl MongoQuizResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_results");
        Self { collection }
    }
}

#[async_trait]
impl QuizResultRepository for MongoQuizResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn top_by_category(
        &self,
        category: QuizCategory,
        limit: i64,
    ) -> AppResult<Vec<QuizResult>> {
        // Ties resolve to the earlier submission.
        let options = FindOptions::builder()
            .sort(doc! { "score": -1, "completed_at": 1 })
            .limit(Some(limit))
            .build();

        let cursor = self
            .collection
            .find(doc! { "category": category.as_str() })
            .with_options(options)
            .await?;
        let results: Vec<QuizResult> = cursor.try_collect().await?;

        Ok(results)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .name("category_score".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "category": 1, "score": -1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created index on quiz_results.category/score");

        Ok(())
    }
}
