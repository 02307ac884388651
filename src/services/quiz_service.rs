use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    cache::TtlCache,
    errors::{AppError, AppResult},
    models::{
        domain::question::{QuestionKind, QuestionOption, QuizCategory, QuizQuestion},
        domain::{QuizResult, QuizTest, SubscriptionTier},
        dto::request::{CreateQuestionRequest, SubmitTestRequest},
        dto::response::{
            AnswerResultDto, LeaderboardEntryDto, QuizTestDto, SubmitResultDto,
        },
    },
    repositories::{QuestionRepository, QuizResultRepository},
    services::rate_limit_service::RateLimitService,
};

pub const QUESTIONS_PER_TEST: i64 = 5;

/// Issues timed tests from the question bank, grades submissions against the
/// cached test, and keeps the leaderboard fed. An in-flight test lives only
/// in the cache; submitting or letting the TTL lapse removes it.
pub struct QuizService {
    questions: Arc<dyn QuestionRepository>,
    results: Arc<dyn QuizResultRepository>,
    test_cache: Arc<TtlCache<QuizTest>>,
    limiter: Arc<RateLimitService>,
}

fn test_cache_key(subject_key: &str, category: QuizCategory, language: &str) -> String {
    format!("{}:{}:{}", subject_key, category.as_str(), language)
}

impl QuizService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn QuizResultRepository>,
        test_cache: Arc<TtlCache<QuizTest>>,
        limiter: Arc<RateLimitService>,
    ) -> Self {
        Self {
            questions,
            results,
            test_cache,
            limiter,
        }
    }

    /// Starts (or resumes) a test for the subject. An unexpired test for the
    /// same category and language is returned as-is without consuming quota;
    /// a fresh draw checks the daily limit, samples questions and counts one
    /// attempt.
    pub async fn start_test(
        &self,
        subject_key: &str,
        tier: Option<SubscriptionTier>,
        category: QuizCategory,
        language: &str,
    ) -> AppResult<QuizTestDto> {
        self.test_cache.sweep_expired(Utc::now()).await;

        let key = test_cache_key(subject_key, category, language);
        if let Some(test) = self.test_cache.get(&key).await {
            return Ok(QuizTestDto::from(&test));
        }

        let status = self.limiter.check(subject_key, tier).await?;
        if !status.allowed {
            log::warn!(
                "Rate limited {} for {} tests (limit {})",
                subject_key,
                category.as_str(),
                status.limit
            );
            return Err(AppError::RateLimited {
                remaining: 0,
                reset_at: status.reset_at,
            });
        }

        let questions = self
            .questions
            .sample(category, language, QUESTIONS_PER_TEST)
            .await?;
        if questions.is_empty() {
            return Err(AppError::NotFound(format!(
                "No {} questions available for language '{}'",
                category.as_str(),
                language
            )));
        }

        let test = QuizTest::new(subject_key, category, language, questions);
        self.test_cache
            .set_with_ttl(&key, test.clone(), Duration::seconds(test.cache_ttl_secs()))
            .await;
        self.limiter.increment(subject_key).await?;

        log::info!(
            "Issued {} test {} to {} ({} questions, {}s)",
            category.as_str(),
            test.test_id,
            subject_key,
            test.questions.len(),
            test.time_limit_secs
        );

        Ok(QuizTestDto::from(&test))
    }

    /// Grades a submission against the cached test, stores the result and
    /// retires the test. Unanswered questions count as wrong; answers for
    /// questions outside the test are rejected.
    pub async fn submit_test(
        &self,
        subject_key: &str,
        display_name: &str,
        request: SubmitTestRequest,
    ) -> AppResult<SubmitResultDto> {
        request.validate()?;

        let language = request.language();
        let key = test_cache_key(subject_key, request.category, &language);

        let test = self
            .test_cache
            .get(&key)
            .await
            .filter(|test| test.test_id == request.test_id)
            .ok_or_else(|| {
                AppError::NotFound("No test in progress for this subject".to_string())
            })?;

        let known_ids: Vec<&str> = test.questions.iter().map(|q| q.id.as_str()).collect();
        for answer in &request.answers {
            if !known_ids.contains(&answer.question_id.as_str()) {
                return Err(AppError::NotFound(format!(
                    "Question '{}' is not part of this test",
                    answer.question_id
                )));
            }
        }

        let answered: HashMap<&str, &[String]> = request
            .answers
            .iter()
            .map(|answer| {
                (
                    answer.question_id.as_str(),
                    answer.selected_option_ids.as_slice(),
                )
            })
            .collect();

        let mut answer_results = Vec::with_capacity(test.questions.len());
        let mut score: i64 = 0;

        for question in &test.questions {
            let selected = answered
                .get(question.id.as_str())
                .copied()
                .unwrap_or(&[]);
            let correct = grade_question(question, selected);
            if correct {
                score += 1;
            }
            answer_results.push(AnswerResultDto {
                question_id: question.id.clone(),
                correct,
            });
        }

        let total = test.questions.len() as i64;
        self.results
            .create(QuizResult::new(
                subject_key,
                display_name,
                request.category,
                score,
                total,
            ))
            .await?;
        self.test_cache.invalidate(&key).await;

        log::info!(
            "Graded test {} for {}: {}/{}",
            test.test_id,
            subject_key,
            score,
            total
        );

        Ok(SubmitResultDto {
            test_id: test.test_id,
            score,
            total,
            answers: answer_results,
        })
    }

    /// Adds a question to the bank. Option and question ids are assigned
    /// here; callers only supply content.
    pub async fn add_question(&self, request: CreateQuestionRequest) -> AppResult<QuizQuestion> {
        request.validate()?;

        let correct_count = request.options.iter().filter(|option| option.correct).count();
        if correct_count == 0 {
            return Err(AppError::ValidationError(
                "At least one option must be correct".to_string(),
            ));
        }
        match request.kind {
            QuestionKind::Single | QuestionKind::Bool if correct_count != 1 => {
                return Err(AppError::ValidationError(
                    "Single-answer questions need exactly one correct option".to_string(),
                ));
            }
            QuestionKind::Bool if request.options.len() != 2 => {
                return Err(AppError::ValidationError(
                    "Boolean questions need exactly two options".to_string(),
                ));
            }
            _ => {}
        }

        let options = request
            .options
            .into_iter()
            .map(|option| QuestionOption {
                id: Uuid::new_v4().to_string(),
                text: option.text,
                correct: option.correct,
                explanation: option.explanation.unwrap_or_default(),
            })
            .collect();

        let question = QuizQuestion {
            id: Uuid::new_v4().to_string(),
            category: request.category,
            language: request.language.to_lowercase(),
            prompt: request.prompt,
            kind: request.kind,
            options,
            created_at: Some(Utc::now()),
        };

        let question = self.questions.create(question).await?;
        log::info!(
            "Added {} question {} ({})",
            question.category.as_str(),
            question.id,
            question.language
        );

        Ok(question)
    }

    pub async fn leaderboard(
        &self,
        category: QuizCategory,
        limit: i64,
    ) -> AppResult<Vec<LeaderboardEntryDto>> {
        let results = self.results.top_by_category(category, limit).await?;
        Ok(results.into_iter().map(LeaderboardEntryDto::from).collect())
    }
}

/// Single and boolean questions need the one correct option selected alone.
/// Multi-choice needs every correct option and nothing else.
fn grade_question(question: &QuizQuestion, selected: &[String]) -> bool {
    let correct_ids: Vec<&str> = question
        .options
        .iter()
        .filter(|option| option.correct)
        .map(|option| option.id.as_str())
        .collect();

    match question.kind {
        QuestionKind::Single | QuestionKind::Bool => {
            selected.len() == 1 && !correct_ids.is_empty() && selected[0] == correct_ids[0]
        }
        QuestionKind::Multi => {
            !correct_ids.is_empty()
                && correct_ids
                    .iter()
                    .all(|id| selected.iter().any(|s| s == id))
                && selected.iter().all(|s| correct_ids.contains(&s.as_str()))
        }
    }
}
