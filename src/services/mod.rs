pub mod application_service;
pub mod auth_service;
pub mod company_service;
pub mod job_service;
pub mod meeting_service;
pub mod message_service;
pub mod notification_service;
pub mod resume_service;
