//! Concrete clients for the policy store, language model and speech synthesis,
//! plus selection from configuration.

pub mod elevenlabs;
pub mod openai;
pub mod postgres;
pub mod rest;

use bima_core::{LanguageModel, PolicyStore, SpeechSynthesizer};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;

pub use elevenlabs::ElevenLabsSpeech;
pub use openai::{OpenAiModel, UnconfiguredModel};
pub use postgres::PostgresPolicyStore;
pub use rest::RestPolicyStore;

/// DATABASE_URL wins over Supabase. With neither, recommendations use fallback data.
pub async fn create_policy_store(
    config: &ServiceConfig,
    http: &reqwest::Client,
) -> Option<Arc<dyn PolicyStore>> {
    if let Some(database_url) = &config.database_url {
        info!("Using PostgreSQL policy store");
        match PostgresPolicyStore::connect(database_url).await {
            Ok(store) => return Some(Arc::new(store)),
            Err(e) => error!(
                "Failed to connect to PostgreSQL: {}. Trying other policy sources.",
                e
            ),
        }
    }

    if let Some(supabase) = &config.supabase {
        info!(url = %supabase.url, "Using Supabase policy store");
        return Some(Arc::new(RestPolicyStore::new(http.clone(), supabase)));
    }

    error!(
        "No policy store configured (set DATABASE_URL or SUPABASE_URL and SUPABASE_ANON_KEY). \
         Recommendations will use fallback plans."
    );
    None
}

pub fn create_language_model(config: &ServiceConfig) -> Arc<dyn LanguageModel> {
    match &config.openai_api_key {
        Some(key) => {
            info!(model = %config.openai_model, "Using OpenAI language model");
            Arc::new(OpenAiModel::new(key, config.openai_model.clone()))
        }
        None => {
            error!("OPENAI_API_KEY not set; the assistant will answer with apologies");
            Arc::new(UnconfiguredModel)
        }
    }
}

pub fn create_speech(
    config: &ServiceConfig,
    http: &reqwest::Client,
) -> Option<Arc<dyn SpeechSynthesizer>> {
    match &config.elevenlabs_api_key {
        Some(key) => {
            info!("Using ElevenLabs speech synthesis");
            Some(Arc::new(ElevenLabsSpeech::new(http.clone(), key.clone())))
        }
        None => {
            warn!("ELEVENLABS_API_KEY not set; replies will have no audio");
            None
        }
    }
}
