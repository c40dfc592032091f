use actix_web::web;

pub mod health;
pub mod quote;
pub mod room_types;
pub mod wizard;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/resorts/{resort_id}")
                        .route("/room-types", web::get().to(room_types::get_room_types))
                        .route("/quote", web::post().to(quote::get_quote))
                        .route("/wizard", web::post().to(wizard::open)),
                )
                .service(
                    web::scope("/wizard/{session_id}")
                        .route("", web::get().to(wizard::get))
                        .route("", web::delete().to(wizard::cancel))
                        .route("/draft", web::patch().to(wizard::update_draft))
                        .route("/next", web::post().to(wizard::next))
                        .route("/back", web::post().to(wizard::back))
                        .route("/submit", web::post().to(wizard::submit))
                        .route("/whatsapp", web::get().to(wizard::whatsapp)),
                ),
        );
}
