use std::{sync::Arc, time::Duration};

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use wayantrails_booking::{
    config::Config,
    db,
    routes,
    services::{
        draft_saver::DraftSaver,
        draft_store::{DraftStore, MemoryDraftStore, MongoDraftStore},
        platform_client::HttpPlatformClient,
        wizard_service::SessionRegistry,
    },
    AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = Config::from_env();

    let store: Arc<dyn DraftStore> = match &config.mongodb_uri {
        Some(uri) => match db::mongo::create_mongo_client(uri).await {
            Ok(client) => Arc::new(MongoDraftStore::new(client)),
            Err(e) => {
                log::error!("MongoDB unavailable ({}), keeping drafts in memory", e);
                Arc::new(MemoryDraftStore::new())
            }
        },
        None => Arc::new(MemoryDraftStore::new()),
    };
    log::info!("Draft store: {}", store.backend());

    let drafts = DraftSaver::spawn(store, config.draft_save_debounce);

    let platform = HttpPlatformClient::new(&config.platform_api_url, config.platform_timeout)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    log::info!("Platform API: {}", config.platform_api_url);

    let state = web::Data::new(AppState::new(
        Arc::new(platform),
        drafts,
        SessionRegistry::new(config.session_idle_timeout),
        config.whatsapp_number.clone(),
    ));

    let reaper_state = state.clone();
    let reap_every = (config.session_idle_timeout / 4).max(Duration::from_secs(1));
    actix_web::rt::spawn(async move { reaper_state.sessions.run_reaper(reap_every).await });

    log::info!("Attempting to bind to {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
