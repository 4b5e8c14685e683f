use talker_api::{build_router, state::AppState};
use talker_config::Settings;
use talker_db::SupabaseClient;
use talker_services::OpenAiService;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "talker_api=debug,talker_services=debug,talker_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config; both provider secrets are mandatory.
    let settings = Settings::load()?;
    settings.validate()?;
    info!("Starting Talker API on {}:{}", settings.app.host, settings.app.port);

    // Clients are built once here and shared by every request.
    let openai = OpenAiService::new(&settings.openai);
    let store = SupabaseClient::from_settings(&settings);

    let app_state = AppState::new(settings.clone(), openai, store);
    let app = build_router(app_state);

    // Start server
    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
