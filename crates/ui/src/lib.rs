pub mod app;
pub mod auth;
pub mod context;
pub mod routes;
pub mod vm;
pub mod views;

pub use app::App;
pub use auth::AuthHandle;
pub use context::{AppContext, UiApp, build_app_context};
