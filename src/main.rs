use fact_checker::{
    api::{build_router, AppState},
    FactCheckerFactory, Settings,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = Settings::load()?;
    let address = settings.bind_address();

    // Provider is built and validated once, before the listener opens
    let factory = FactCheckerFactory::new(settings);
    let checker = factory.select()?;
    info!("Using fact checker provider: {}", checker.provider());

    let router = build_router(AppState { checker });

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server listening on {}", address);

    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
