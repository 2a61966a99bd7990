use sigil_core::SigilConfig;
use sigil_engine::Engine;

/// Shared application state.
pub struct AppState {
    pub engine: Engine,
}

impl AppState {
    pub async fn init(cfg: &SigilConfig) -> anyhow::Result<Self> {
        let storage = sigil_storage::create_storage(&cfg.storage)?;
        let engine = Engine::new(storage, cfg).await?;
        Ok(Self { engine })
    }
}
