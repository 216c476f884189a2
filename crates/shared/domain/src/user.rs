//! User profile as seen by this core.
//!
//! Users are owned by the external identity provider; only the fields the
//! navigation and admin tooling need are read here.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: Option<String>,
    /// Free-text role column kept for display only; grants live in `user_roles`
    pub role_label: Option<String>,
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Age in whole years on `today`, when a date of birth is known.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.dob.and_then(|dob| age_between(dob, today))
    }
}

/// Completed years between `dob` and `today`; `None` for future dates.
pub fn age_between(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    if dob > today {
        return None;
    }
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
