use std::sync::Arc;

use hotfix_site::blog::BlogStore;
use hotfix_site::config::{MailConfig, ServerConfig};
use hotfix_site::contact::Dispatcher;
use hotfix_site::error::Error;
use hotfix_site::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Install rustls crypto provider before any TLS usage (SMTP relay)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Warning: a rustls crypto provider was already installed");
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let server_config = ServerConfig::from_env()?;
    let mail_config = MailConfig::from_env()?;

    eprintln!("HOTFIX site v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Listening: http://{}", server_config.listen_addr());
    eprintln!("   Contact API: POST /api/contact");
    eprintln!("   Blog API: GET /api/blog");
    eprintln!(
        "   Mail: {:?} -> {} (from {})",
        mail_config.backend, mail_config.to_address, mail_config.from_address
    );

    if !mail_config.is_configured() {
        // Keep serving; the contact endpoint answers 500 until this is fixed.
        tracing::error!("Mail credential is not set; contact submissions cannot be delivered");
    }

    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new(mail_config)),
        blog: Arc::new(BlogStore::builtin()),
    };
    let app = server::router(state, &server_config.allowed_origins);

    server::serve(&server_config, app).await?;
    Ok(())
}
