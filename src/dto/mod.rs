pub mod auth_dto;
pub mod job_dto;
pub mod meeting_dto;
pub mod message_dto;
pub mod resume_dto;
