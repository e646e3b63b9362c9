pub mod cache;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod events;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::cache::QueryCache;
use crate::events::ChangeHub;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    company_service::CompanyService, job_service::JobService, meeting_service::MeetingService,
    message_service::MessageService, notification_service::NotificationService,
    resume_service::ResumeService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: QueryCache,
    pub events: ChangeHub,
    pub auth_service: AuthService,
    pub message_service: MessageService,
    pub meeting_service: MeetingService,
    pub notification_service: NotificationService,
    pub resume_service: ResumeService,
    pub company_service: CompanyService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let cache = QueryCache::new();
        let events = ChangeHub::default();

        let auth_service = AuthService::new(pool.clone());
        let message_service = MessageService::new(pool.clone());
        let meeting_service = MeetingService::new(pool.clone());
        let notification_service = NotificationService::new(pool.clone(), events.clone());
        let resume_service = ResumeService::new(pool.clone());
        let company_service = CompanyService::new(pool.clone());
        let job_service = JobService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone());

        Self {
            pool,
            cache,
            events,
            auth_service,
            message_service,
            meeting_service,
            notification_service,
            resume_service,
            company_service,
            job_service,
            application_service,
        }
    }
}
