use crate::clients::{IdentityClient, ProfileClient, TransactionClient};
use crate::config::AppConfig;
use crate::login::LoginService;
use crate::registration::RegistrationService;
use crate::session::{FileCache, SessionStore};
use std::sync::Arc;
use tracing::{error, info};

/// Runs the in-process identity service and document store.
///
/// `BankSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the identity, profile and transaction actors
/// - **Dependency Wiring**: Handing the clients to the registration and login services
///
/// # Example
///
/// ```ignore
/// let system = BankSystem::new(&AppConfig::default());
/// let provisioned = system.registration().register(form).await?;
/// system.shutdown().await?;
/// ```
pub struct BankSystem {
    pub identity_client: IdentityClient,
    pub profile_client: ProfileClient,
    pub transaction_client: TransactionClient,
    config: AppConfig,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl BankSystem {
    /// Spawns every actor. Must be called inside a Tokio runtime.
    pub fn new(config: &AppConfig) -> Self {
        let buffer = config.mailbox_buffer;
        let (identity_actor, identity_client) = crate::identity_actor::new(buffer);
        let (profile_actor, profile_client) =
            crate::profile_actor::new(buffer, config.enforce_unique_phone);
        let (transaction_actor, transaction_client) = crate::transaction_actor::new(buffer);

        let identity_handle = tokio::spawn(identity_actor.run(()));
        let profile_handle = tokio::spawn(profile_actor.run(()));
        let transaction_handle = tokio::spawn(transaction_actor.run(()));

        info!(
            policy = %config.account_number_policy,
            unique_phone = config.enforce_unique_phone,
            compensate = config.compensate_partial_failures,
            "Bank system started"
        );

        Self {
            identity_client,
            profile_client,
            transaction_client,
            config: config.clone(),
            handles: vec![identity_handle, profile_handle, transaction_handle],
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registration(&self) -> RegistrationService {
        RegistrationService::new(
            self.identity_client.clone(),
            self.profile_client.clone(),
            self.config.provisioning_policy(),
        )
    }

    pub fn login(&self, sessions: SessionStore) -> LoginService {
        LoginService::new(self.identity_client.clone(), self.profile_client.clone(), sessions)
    }

    /// File-backed when `session_dir` is configured, otherwise in memory.
    pub fn session_store(&self) -> SessionStore {
        match &self.config.session_dir {
            Some(dir) => SessionStore::new(Arc::new(FileCache::new(dir.clone()))),
            None => SessionStore::in_memory(),
        }
    }

    /// Drops the system's clients and waits for every actor to stop.
    ///
    /// Actors stop once every clone of their client is gone, so services handed out
    /// by [`registration`](Self::registration) or [`login`](Self::login) must be
    /// dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.identity_client);
        drop(self.profile_client);
        drop(self.transaction_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
