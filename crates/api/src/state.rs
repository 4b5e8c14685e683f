use std::sync::Arc;

use talker_config::Settings;
use talker_db::SupabaseClient;
use talker_services::OpenAiService;

/// Shared handles, built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub openai: Arc<OpenAiService>,
    pub store: Arc<SupabaseClient>,
}

impl AppState {
    pub fn new(settings: Settings, openai: OpenAiService, store: SupabaseClient) -> Self {
        Self {
            settings,
            openai: Arc::new(openai),
            store: Arc::new(store),
        }
    }
}
