use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tupy_service::config::Config;
use tupy_service::domain::user::models::CreateUserCommand;
use tupy_service::domain::user::models::EmailAddress;
use tupy_service::domain::user::models::Password;
use tupy_service::domain::user::models::PersonName;
use tupy_service::domain::user::models::ProvisionOutcome;
use tupy_service::domain::user::models::UserRole;
use tupy_service::domain::user::ports::UserServicePort;
use tupy_service::domain::user::service::UserService;
use tupy_service::outbound::database::PostgresDatabase;

/// Provision the configured administrator account, once.
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tupy_service=info,create_admin_user=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let admin = &config.admin;

    let command = CreateUserCommand {
        email: EmailAddress::new(admin.email.clone())?,
        first_name: PersonName::new(admin.first_name.clone())?,
        last_name: PersonName::new(admin.last_name.clone())?,
        password: Password::new(admin.password.clone())?,
        role: UserRole::Admin,
    };

    let pg_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    let user_service = UserService::new(Arc::new(PostgresDatabase::new(pg_pool)));

    match user_service.provision_user(command).await? {
        ProvisionOutcome::Created => {
            tracing::info!(email = %admin.email, "Admin user created")
        }
        ProvisionOutcome::AlreadyExists => {
            tracing::info!(email = %admin.email, "Admin user already exists")
        }
    }

    Ok(())
}
