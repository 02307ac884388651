use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::question::{QuizCategory, QuizQuestion},
};

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: QuizQuestion) -> AppResult<QuizQuestion>;
    async fn sample(
        &self,
        category: QuizCategory,
        language: &str,
        size: i64,
    ) -> AppResult<Vec<QuizQuestion>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    collection: Collection<QuizQuestion>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: QuizQuestion) -> AppResult<QuizQuestion> {
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn sample(
        &self,
        category: QuizCategory,
        language: &str,
        size: i64,
    ) -> AppResult<Vec<QuizQuestion>> {
        let pipeline = vec![
            doc! {
                "$match": {
                    "category": category.as_str(),
                    "language": language,
                }
            },
            doc! { "$sample": { "size": size } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let mut questions = Vec::new();

        while let Some(document) = cursor.try_next().await? {
            let question: QuizQuestion = bson::from_document(document)?;
            questions.push(question);
        }

        Ok(questions)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder()
            .name("category_language".to_string())
            .build();
        let model = IndexModel::builder()
            .keys(doc! { "category": 1, "language": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created index on questions.category/language");

        Ok(())
    }
}
