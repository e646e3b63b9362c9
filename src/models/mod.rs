pub mod application;
pub mod company;
pub mod job;
pub mod meeting;
pub mod message;
pub mod notification;
pub mod resume;
pub mod user;
