use anyhow::{anyhow, Context, Result};
use bankify::config::AppConfig;
use bankify::dashboard::load_dashboard;
use bankify::lifecycle::{setup_tracing, BankSystem};
use bankify::login::LoginForm;
use bankify::model::{TransactionCreate, TransactionKind};
use bankify::registration::{RegistrationForm, VerificationDispatch};
use chrono::{Duration, Local, Utc};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let config = AppConfig::from_env().context("loading configuration")?;

    info!("Starting bank system");
    let system = BankSystem::new(&config);

    let form = RegistrationForm {
        phone: "+233241234567".to_string(),
        email: "ama.mensah@example.com".to_string(),
        password: "s3cret-pass".to_string(),
        first_name: "Ama".to_string(),
        last_name: "Mensah".to_string(),
        date_of_birth: "3/14/1990".to_string(),
        request_id: Some(Uuid::new_v4()),
    };

    let registration = system.registration();
    let provisioned = registration
        .register(form.clone())
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    let profile = provisioned.profile;
    info!(
        identity_id = %profile.identity_id,
        account_number = %profile.account_number,
        "Account provisioned"
    );

    // Same request_id: answered from the stored profile
    let replay = registration.register(form).await.map_err(|e| anyhow!(e.user_message()))?;
    info!(replayed = replay.replayed, "Registration resubmitted");

    let sessions = system.session_store();
    let login = system.login(sessions.clone());
    let credentials = LoginForm {
        account_number: profile.account_number.clone(),
        password: "s3cret-pass".to_string(),
    };

    match login.login(credentials.clone()).await {
        Ok(_) => warn!("Signed in before verifying the email"),
        Err(e) => info!(message = %e.user_message(), "Login refused"),
    }

    // Follow the link from the verification mail
    match provisioned.verification {
        VerificationDispatch::Sent(email) => {
            system
                .identity_client
                .confirm_email(profile.identity_id.clone(), email.token)
                .await?;
            info!(to = %email.to, "Email verified");
        }
        other => return Err(anyhow!("verification mail not sent: {:?}", other)),
    }

    let now = Utc::now();
    let seed = [
        (TransactionKind::Deposit, 250.0, 3),
        (TransactionKind::Airtime, 10.0, 2),
        (TransactionKind::Transfer, 75.5, 1),
    ];
    for (kind, amount, hours_ago) in seed {
        let at = now - Duration::hours(hours_ago);
        let mut txn = TransactionCreate::new(profile.identity_id.clone(), kind, amount, at);
        if kind == TransactionKind::Transfer {
            txn.recipient_name = Some("Kwame Asante".to_string());
        }
        system.transaction_client.record(txn).await?;
    }

    let session = async { login.login(credentials).await }
        .instrument(tracing::info_span!("home"))
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    let view = load_dashboard(&system.transaction_client, &session, Local::now()).await?;
    info!("{}, {}", view.greeting, view.first_name);
    info!("{} | Account {}", view.full_name, view.account_number);
    info!("Available balance {}", view.available_balance);
    for line in &view.recent {
        info!("{:<28} {:>10}  {}", line.title, line.amount, line.subtitle);
    }

    sessions.clear().await?;
    drop(login);
    drop(registration);
    system.shutdown().await.map_err(|e| anyhow!(e))?;

    info!("Application completed successfully");
    Ok(())
}
