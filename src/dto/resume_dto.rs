use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitResumePayload {
    /// Location of the uploaded file in external object storage; the
    /// bytes themselves never pass through this service.
    #[validate(url)]
    pub resume_url: String,
    pub bio: Option<String>,
    pub skills: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewResumePayload {
    #[validate(length(min = 1))]
    pub status: String,
    pub feedback: Option<String>,
    pub optimized_content: Option<String>,
}
