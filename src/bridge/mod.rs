pub mod client;
pub mod decoder;
pub mod template;

pub use client::BridgeClient;
pub use template::TemplateCatalog;
