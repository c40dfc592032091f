pub mod booking_service;
pub mod draft_saver;
pub mod draft_store;
pub mod platform_client;
pub mod pricing_service;
pub mod whatsapp_service;
pub mod wizard_service;
