use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Premium,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Premium => "premium",
        }
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    pub has_payment: bool,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(email: &str, password_hash: &str, display_name: &str) -> Self {
        User {
            id: None,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            display_name: display_name.to_string(),
            is_admin: false,
            is_super_admin: false,
            has_payment: false,
            subscription_tier: SubscriptionTier::Free,
            subscription_expires_at: None,
            created_at: Some(Utc::now()),
        }
    }

    /// The tier that actually applies right now: a paid tier counts only while
    /// the payment flag is set and the expiry, when present, is in the future.
    pub fn effective_tier(&self, now: DateTime<Utc>) -> SubscriptionTier {
        if !self.subscription_tier.is_paid() || !self.has_payment {
            return SubscriptionTier::Free;
        }

        match self.subscription_expires_at {
            Some(expires_at) if expires_at <= now => SubscriptionTier::Free,
            _ => self.subscription_tier,
        }
    }
}
