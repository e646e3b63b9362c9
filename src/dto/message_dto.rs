use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessagePayload {
    pub receiver_id: Uuid,
    #[validate(length(min = 1))]
    pub receiver_role: String,
    /// Trimmed-empty content is rejected in the service before any
    /// insert happens, on top of this length check.
    #[validate(length(min = 1))]
    pub content: String,
}
