use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::{
    errors::AppResult,
    models::domain::{AttemptCounter, SubscriptionTier},
    repositories::AttemptCounterRepository,
};

pub const ANONYMOUS_DAILY_LIMIT: i64 = 3;
pub const FREE_DAILY_LIMIT: i64 = 5;
pub const UNLIMITED: i64 = -1;

/// Snapshot of a subject's remaining daily test starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub remaining: i64,
    pub limit: i64,
    pub reset_at: DateTime<Utc>,
}

/// Daily test-start allowance for a subject. `None` is an anonymous caller.
pub fn daily_limit(tier: Option<SubscriptionTier>) -> i64 {
    match tier {
        None => ANONYMOUS_DAILY_LIMIT,
        Some(SubscriptionTier::Free) => FREE_DAILY_LIMIT,
        Some(SubscriptionTier::Pro) | Some(SubscriptionTier::Premium) => UNLIMITED,
    }
}

pub struct RateLimitService {
    counters: Arc<dyn AttemptCounterRepository>,
}

impl RateLimitService {
    pub fn new(counters: Arc<dyn AttemptCounterRepository>) -> Self {
        Self { counters }
    }

    /// Reads the subject's counter for the current local day without
    /// consuming quota.
    pub async fn check(
        &self,
        subject_key: &str,
        tier: Option<SubscriptionTier>,
    ) -> AppResult<RateLimitStatus> {
        let limit = daily_limit(tier);
        let reset_at = next_local_midnight();

        if limit == UNLIMITED {
            return Ok(RateLimitStatus {
                allowed: true,
                remaining: UNLIMITED,
                limit,
                reset_at,
            });
        }

        let count = self
            .counters
            .find(subject_key, &today())
            .await?
            .map(|counter| counter.count)
            .unwrap_or(0);

        Ok(RateLimitStatus {
            allowed: count < limit,
            remaining: (limit - count).max(0),
            limit,
            reset_at,
        })
    }

    /// Records one consumed attempt for today. Find-then-save rather than an
    /// atomic upsert, so concurrent increments for the same subject can
    /// undercount. Acceptable for a coarse daily quota.
    pub async fn increment(&self, subject_key: &str) -> AppResult<()> {
        let date = today();

        match self.counters.find(subject_key, &date).await? {
            Some(mut counter) => {
                counter.count += 1;
                self.counters.save(&counter).await?;
            }
            None => {
                self.counters
                    .create(AttemptCounter::new(subject_key, &date))
                    .await?;
            }
        }

        Ok(())
    }
}

/// Current day bucket in the server's local timezone, "YYYY-MM-DD".
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Start of the next local day, as a UTC instant. Falls back to now + 24h
/// when the local midnight is ambiguous (DST transitions).
pub fn next_local_midnight() -> DateTime<Utc> {
    let tomorrow = Local::now().date_naive() + Duration::days(1);
    let midnight = tomorrow.and_time(NaiveTime::MIN);

    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc::now() + Duration::days(1))
}
