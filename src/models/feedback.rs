use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A `feedbacks` document. `order_details` is a denormalized display
/// snapshot of the referenced order, frozen at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<ObjectId>,
    pub order_details: String,
    pub rating: i64,
    pub comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_quality: Option<i64>,
    pub recommend: String,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub order_id: Option<String>,

    #[validate(
        required(message = "Rating must be between 1 and 5"),
        range(min = 1, max = 5, message = "Rating must be between 1 and 5")
    )]
    pub rating: Option<i64>,

    pub comments: Option<String>,

    #[validate(range(min = 1, max = 5, message = "Service quality must be between 1 and 5"))]
    pub service_quality: Option<i64>,

    #[validate(custom(function = "validate_recommend", message = "Invalid recommendation value"))]
    pub recommend: Option<String>,
}

fn validate_recommend(value: &str) -> Result<(), ValidationError> {
    match value {
        "yes" | "no" | "maybe" => Ok(()),
        _ => Err(ValidationError::new("recommend")),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub order_details: String,
    pub rating: i64,
    pub comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_quality: Option<i64>,
    pub recommend: String,
    pub created_at: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        FeedbackResponse {
            id: feedback.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: feedback.user_id.to_hex(),
            order_id: feedback.order_id.map(|id| id.to_hex()),
            order_details: feedback.order_details,
            rating: feedback.rating,
            comments: feedback.comments,
            service_quality: feedback.service_quality,
            recommend: feedback.recommend,
            created_at: feedback.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitFeedbackResponse {
    pub message: String,
    pub feedback: FeedbackResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: Option<i64>) -> SubmitFeedbackRequest {
        SubmitFeedbackRequest {
            order_id: None,
            rating,
            comments: None,
            service_quality: None,
            recommend: None,
        }
    }

    #[test]
    fn rating_in_range_is_accepted() {
        for rating in 1..=5 {
            assert!(request(Some(rating)).validate().is_ok());
        }
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(request(Some(0)).validate().is_err());
        assert!(request(Some(6)).validate().is_err());
    }

    #[test]
    fn missing_rating_is_rejected() {
        assert!(request(None).validate().is_err());
    }

    #[test]
    fn service_quality_is_optional_but_bounded() {
        let mut req = request(Some(4));
        req.service_quality = Some(3);
        assert!(req.validate().is_ok());

        req.service_quality = Some(6);
        assert!(req.validate().is_err());
    }

    #[test]
    fn recommend_must_be_a_known_value() {
        for value in ["yes", "no", "maybe"] {
            let mut req = request(Some(4));
            req.recommend = Some(value.to_string());
            assert!(req.validate().is_ok());
        }

        let mut req = request(Some(4));
        req.recommend = Some("definitely".to_string());
        assert!(req.validate().is_err());
    }
}
