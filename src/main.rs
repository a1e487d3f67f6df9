use std::sync::Arc;

use anyhow::Context;
use register_wizard::client::HttpSubmissionClient;
use register_wizard::config::WizardConfig;
use register_wizard::photo::{Camera, FrameFileCamera, NoCamera};
use register_wizard::registration::{RegistrationWizard, WizardDeps};
use register_wizard::session::{LogNavigator, SessionStore};
use register_wizard::terminal::{TerminalOutcome, TerminalWizard};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = WizardConfig::from_env().context("Failed to load configuration")?;

    eprintln!("📝 Register Wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.register_url());
    match &config.camera_frame {
        Some(frame) => eprintln!("   Camera: {}", frame.display()),
        None => eprintln!("   Camera: none (set REGISTER_CAMERA_FRAME to enable)"),
    }
    eprintln!("   Ctrl-C cancels.\n");

    let client = HttpSubmissionClient::from_config(&config)
        .context("Failed to build HTTP client")?;
    let camera: Arc<dyn Camera> = match &config.camera_frame {
        Some(frame) => Arc::new(FrameFileCamera::new(frame.clone())),
        None => Arc::new(NoCamera),
    };
    let session = SessionStore::new();

    let wizard = RegistrationWizard::new(WizardDeps {
        client: Arc::new(client),
        camera,
        session: Arc::new(session.clone()),
        navigator: Arc::new(LogNavigator),
    });

    // Ctrl-C tears the wizard down, cancelling any read or submit in flight.
    let cancel = wizard.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut terminal = TerminalWizard::new(
        wizard,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );
    match terminal.run().await? {
        TerminalOutcome::Registered => {
            if let Some(user) = session.current_user() {
                eprintln!("Signed in as {}", user.display_name().unwrap_or("new user"));
            }
            Ok(())
        }
        TerminalOutcome::Aborted => {
            eprintln!("\nRegistration not completed.");
            std::process::exit(1);
        }
    }
}
