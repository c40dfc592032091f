use std::sync::Arc;

use crate::services::{
    draft_saver::DraftSaver, platform_client::PlatformApi, wizard_service::SessionRegistry,
};

/// Shared by every worker; handed to handlers as `web::Data<AppState>`.
pub struct AppState {
    pub platform: Arc<dyn PlatformApi>,
    pub drafts: DraftSaver,
    pub sessions: SessionRegistry,
    pub whatsapp_number: String,
}

impl AppState {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        drafts: DraftSaver,
        sessions: SessionRegistry,
        whatsapp_number: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            drafts,
            sessions,
            whatsapp_number: whatsapp_number.into(),
        }
    }
}
