pub mod applications;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod meetings;
pub mod messages;
pub mod notifications;
pub mod resumes;
pub mod setup;
