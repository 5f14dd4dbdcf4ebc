// src/infrastructure/mod.rs
pub mod api;
pub mod config;
pub mod http;
pub mod identity;
pub mod renderer;
pub mod session_store;
pub mod storage;

pub use api::HttpNoteRepository;
pub use config::Config;
pub use identity::HttpIdentityProvider;
pub use renderer::BrowserRenderer;
pub use session_store::FileSessionStore;
pub use storage::HttpAttachmentStore;
