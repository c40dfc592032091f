use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let platform_result = check_platform_api(&state);
    health
        .services
        .insert("platform_api".to_string(), platform_result.clone());

    let drafts_result = ServiceStatus {
        status: "ok".to_string(),
        details: Some(format!("Drafts stored in {}", state.drafts.backend())),
    };
    health
        .services
        .insert("draft_store".to_string(), drafts_result);

    let sessions_result = ServiceStatus {
        status: "ok".to_string(),
        details: Some(format!("{} open wizard sessions", state.sessions.len().await)),
    };
    health
        .services
        .insert("wizard_sessions".to_string(), sessions_result);

    if platform_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_platform_api(state: &AppState) -> ServiceStatus {
    let base_url = state.platform.base_url();
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Platform API configured at {}", base_url)),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("PLATFORM_API_URL is not an http(s) URL: {:?}", base_url)),
        }
    }
}
