use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ApplicationService, AuthService, DashboardService, JobService, LogOtpDispatcher,
    OtpDispatcher, PasswordResetService, ProfileService, SeaOrmApplicationService,
    SeaOrmAuthService, SeaOrmDashboardService, SeaOrmJobService, SeaOrmPasswordResetService,
    SeaOrmProfileService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub password_reset_service: Arc<dyn PasswordResetService>,

    pub profile_service: Arc<dyn ProfileService>,

    pub job_service: Arc<dyn JobService>,

    pub application_service: Arc<dyn ApplicationService>,

    pub dashboard_service: Arc<dyn DashboardService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_dispatcher(config, Arc::new(LogOtpDispatcher)).await
    }

    /// Builds the state with a custom channel for password reset codes.
    pub async fn with_dispatcher(
        config: Config,
        dispatcher: Arc<dyn OtpDispatcher>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let config_arc = Arc::new(RwLock::new(config));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), config_arc.clone()))
            as Arc<dyn AuthService>;

        let password_reset_service = Arc::new(SeaOrmPasswordResetService::new(
            store.clone(),
            config_arc.clone(),
            dispatcher,
        )) as Arc<dyn PasswordResetService>;

        let profile_service =
            Arc::new(SeaOrmProfileService::new(store.clone())) as Arc<dyn ProfileService>;

        let job_service = Arc::new(SeaOrmJobService::new(store.clone())) as Arc<dyn JobService>;

        let application_service =
            Arc::new(SeaOrmApplicationService::new(store.clone())) as Arc<dyn ApplicationService>;

        let dashboard_service =
            Arc::new(SeaOrmDashboardService::new(store.clone())) as Arc<dyn DashboardService>;

        Ok(Self {
            config: config_arc,
            store,
            auth_service,
            password_reset_service,
            profile_service,
            job_service,
            application_service,
            dashboard_service,
        })
    }
}
