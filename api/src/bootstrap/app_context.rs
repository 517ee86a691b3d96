use std::sync::Arc;

use crate::application::ports::follow_repository::FollowRepository;
use crate::application::ports::health_probe::HealthProbe;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::domain::ranking::RankingWeights;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    follow_repo: Arc<dyn FollowRepository>,
    health_probe: Arc<dyn HealthProbe>,
    ranking_weights: RankingWeights,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        follow_repo: Arc<dyn FollowRepository>,
        health_probe: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            follow_repo,
            health_probe,
            ranking_weights: RankingWeights::default(),
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn post_repo(&self) -> Arc<dyn PostRepository> {
        self.services.post_repo.clone()
    }

    pub fn follow_repo(&self) -> Arc<dyn FollowRepository> {
        self.services.follow_repo.clone()
    }

    pub fn health_probe(&self) -> Arc<dyn HealthProbe> {
        self.services.health_probe.clone()
    }

    pub fn ranking_weights(&self) -> RankingWeights {
        self.services.ranking_weights
    }
}
