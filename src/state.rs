//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AuthService, ClickService, LinkService, ProfileService};
use crate::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgSessionRepository, PgUserRepository,
};
use crate::infrastructure::rate_limit::RateLimiter;

pub type AppLinkService = LinkService<PgLinkRepository>;
pub type AppClickService = ClickService<PgLinkRepository, PgClickRepository>;
pub type AppProfileService = ProfileService<PgUserRepository, PgLinkRepository>;
pub type AppAuthService = AuthService<PgSessionRepository, PgUserRepository>;

/// Services and handles shared by all requests. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    pub click_service: Arc<AppClickService>,
    pub profile_service: Arc<AppProfileService>,
    pub auth_service: Arc<AppAuthService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub pool: Arc<PgPool>,
    /// Trust proxy headers when resolving the client IP.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires repositories and services over one connection pool.
    pub fn new(
        pool: Arc<PgPool>,
        rate_limiter: Arc<dyn RateLimiter>,
        signing_secret: String,
        conflict_retries: usize,
        behind_proxy: bool,
    ) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
        let click_repository = Arc::new(PgClickRepository::new(pool.clone()));
        let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
        let session_repository = Arc::new(PgSessionRepository::new(pool.clone()));

        Self {
            link_service: Arc::new(LinkService::new(
                link_repository.clone(),
                rate_limiter.clone(),
                conflict_retries,
            )),
            click_service: Arc::new(ClickService::new(
                link_repository.clone(),
                click_repository,
                rate_limiter.clone(),
            )),
            profile_service: Arc::new(ProfileService::new(
                user_repository.clone(),
                link_repository,
            )),
            auth_service: Arc::new(AuthService::new(
                session_repository,
                user_repository,
                signing_secret,
            )),
            rate_limiter,
            pool,
            behind_proxy,
        }
    }
}
