use glimpse_fake::{demo, Dependencies, LogFormat, ServiceConfig, ServiceError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    dotenv::dotenv().ok();

    let config = ServiceConfig::from_env()?;
    init_tracing(config.log_format);

    let Dependencies {
        mut orchestrator,
        handle,
        ..
    } = Dependencies::new(&config);

    let driver = handle.clone();
    let driver_task = tokio::spawn(async move {
        if let Err(e) = demo::run(&driver, demo::DEFAULT_IDLE_TIMEOUT).await {
            error!(error = %e, "Demo driver failed");
        }
        driver.shutdown();
    });

    let shutdown = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C");
        }
        shutdown.shutdown();
    });

    let stats = orchestrator.run().await?;
    driver_task.abort();

    info!(
        tasks_spawned = stats.tasks_spawned,
        failures = stats.failures,
        "Glimpse fake service stopped"
    );
    Ok(())
}
