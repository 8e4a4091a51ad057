use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub rating: i64,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: i64,
    #[serde(default)]
    pub review: String,
}

fn default_rating() -> i64 {
    5
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Homepage payload: the featured reviews plus stats over all of them.
#[derive(Debug, Serialize)]
pub struct ReviewBoard {
    pub reviews: Vec<Review>,
    pub count: usize,
    pub average_rating: f64,
}
