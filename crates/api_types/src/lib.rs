use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod birthday {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct BirthdayView {
        pub id: String,
        pub celebrant_id: String,
        pub celebrant_name: Option<String>,
        pub organizer_id: Option<String>,
        pub organizer_name: Option<String>,
        pub celebration_date: NaiveDate,
        pub gift_description: String,
        pub total_amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BirthdayList {
        pub birthdays: Vec<BirthdayView>,
    }

    /// Role of the caller relative to one birthday.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CallerRole {
        Celebrant,
        Organizer,
        Contributor,
        Outsider,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BirthdayDetailResponse {
        pub birthday: BirthdayView,
        pub role: CallerRole,
        pub contributions: Vec<super::contribution::ContributionView>,
    }

    /// Partial update: absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BirthdayUpdate {
        pub celebration_date: Option<NaiveDate>,
        pub gift_description: Option<String>,
        pub total_amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GenerateResponse {
        pub created_count: usize,
        pub birthdays: Vec<BirthdayView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitResponse {
        pub total_amount_minor: i64,
        pub contributor_count: u64,
        pub per_person_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub contributor_count: i64,
        pub assigned_minor: i64,
        pub paid_minor: i64,
        pub unpaid_minor: i64,
    }
}

pub mod contribution {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionNew {
        pub birthday_id: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ContributionView {
        pub id: String,
        pub birthday_id: String,
        pub contributor_id: String,
        pub amount_minor: Option<i64>,
        pub paid: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionList {
        pub contributions: Vec<ContributionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionUpdate {
        pub paid: bool,
    }
}

pub mod gift {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GiftNew {
        pub name: String,
        pub description: Option<String>,
        pub link: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct GiftView {
        pub id: String,
        pub user_id: String,
        pub name: String,
        pub description: Option<String>,
        pub link: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GiftList {
        pub gifts: Vec<GiftView>,
    }

    /// Partial update: absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GiftUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub link: Option<String>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub email: String,
        pub password: String,
        pub first_name: String,
        pub last_name: String,
        pub nickname: Option<String>,
        pub birth_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        pub nickname: Option<String>,
        pub birth_date: Option<NaiveDate>,
        pub bank_details: Option<serde_json::Value>,
    }

    /// Partial update: absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub nickname: Option<String>,
        pub birth_date: Option<NaiveDate>,
        pub bank_details: Option<serde_json::Value>,
    }
}
