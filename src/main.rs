use std::sync::Arc;

use mimalloc::MiMalloc;
use modules::{
    batch::load,
    common::signal::CancelToken,
    dispatch::DispatchEngine,
    error::{code::ErrorCode, BulkMailerResult},
    logger,
    settings::cli::SETTINGS,
    transport::{EmailAddress, SmtpTransport},
    utils::shutdown::shutdown_signal,
};
use tracing::{info, warn};

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
  ____        _ _    __  __       _ _
 | __ ) _   _| | | _|  \/  | __ _(_) | ___ _ __
 |  _ \| | | | | |/ / |\/| |/ _` | | |/ _ \ '__|
 | |_) | |_| | |   <| |  | | (_| | | |  __/ |
 |____/ \__,_|_|_|\_\_|  |_|\__,_|_|_|\___|_|

"#;

#[tokio::main]
async fn main() -> BulkMailerResult<()> {
    logger::initialize_logging();
    info!("{}", LOGO);
    info!("Starting bulkmailer");
    info!("Version:  {}", bulkmailer_version!());

    let report = match run().await {
        Ok(report) => report,
        Err(error) => {
            eprintln!("{:?}", error);
            return Err(error);
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&report)
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))?
    );
    Ok(())
}

async fn run() -> BulkMailerResult<modules::dispatch::report::DispatchReport> {
    let batch = load::assemble(&SETTINGS)?;
    let from = sender_identity()?;
    let transport = Arc::new(SmtpTransport::from_settings(&SETTINGS)?);
    let engine = DispatchEngine::new(transport, from);

    let cancel = CancelToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            warn!("Shutdown requested, finishing in-flight sends");
            cancel.cancel();
        }
    });

    engine.dispatch_with_cancel(batch, cancel).await
}

fn sender_identity() -> BulkMailerResult<EmailAddress> {
    let address = SETTINGS.bulkmailer_from.clone().ok_or_else(|| {
        raise_error!(
            "Sender address is not configured, set --bulkmailer-from".into(),
            ErrorCode::MissingConfiguration
        )
    })?;
    validate_email!(&address)?;
    Ok(EmailAddress {
        name: SETTINGS.bulkmailer_from_name.clone(),
        address,
    })
}
