use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{AddReviewRequest, ContactRequest, Review, ReviewBoard};

/// How many high-rated reviews the homepage shows.
const FEATURED_LIMIT: usize = 6;
const FEATURED_MIN_RATING: i64 = 4;

pub struct FeedbackService {
    supabase: Arc<SupabaseClient>,
}

impl FeedbackService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    /// Featured reviews (rating >= 4, newest first, capped) plus count and
    /// average over ALL reviews, one decimal.
    pub async fn board(&self) -> Result<ReviewBoard, AppError> {
        let featured = self
            .supabase
            .select(
                "reviews",
                &format!(
                    "rating=gte.{}&order=created_at.desc&limit={}",
                    FEATURED_MIN_RATING, FEATURED_LIMIT
                ),
            )
            .await?;

        let all = self.supabase.select("reviews", "").await?;

        Ok(ReviewBoard {
            reviews: parse_reviews(featured),
            count: all.len(),
            average_rating: average_rating(&all),
        })
    }

    pub async fn add_review(&self, request: AddReviewRequest) -> Result<Review, AppError> {
        let record = json!({
            "name": request.name.unwrap_or_else(|| "Anonymous".to_string()),
            "rating": request.rating.clamp(1, 5),
            "review": request.review,
            "created_at": Utc::now().to_rfc3339(),
        });

        let rows = self.supabase.insert("reviews", record).await?;
        let review = parse_reviews(rows).into_iter().next().ok_or_else(|| {
            AppError::Storage("insert returned no representation".to_string())
        })?;

        info!("New review from {} ({} stars)", review.name, review.rating);
        Ok(review)
    }

    pub async fn add_contact_message(&self, request: ContactRequest) -> Result<(), AppError> {
        let record = json!({
            "name": request.name,
            "email": request.email,
            "subject": request.subject.unwrap_or_else(|| "General Inquiry".to_string()),
            "message": request.message,
            "status": "unread",
            "created_at": Utc::now().to_rfc3339(),
        });

        self.supabase.insert("contact_messages", record).await?;
        info!("Contact message received from {}", request.email);
        Ok(())
    }
}

fn parse_reviews(rows: Vec<Value>) -> Vec<Review> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Review>(row) {
            Ok(review) => Some(review),
            Err(err) => {
                warn!("Skipping malformed review row: {}", err);
                None
            }
        })
        .collect()
}

fn average_rating(rows: &[Value]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let sum: i64 = rows
        .iter()
        .map(|row| row.get("rating").and_then(Value::as_i64).unwrap_or(0))
        .sum();
    let avg = sum as f64 / rows.len() as f64;
    (avg * 10.0).round() / 10.0
}
