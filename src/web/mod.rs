pub mod routes;
pub mod sns;

pub use routes::{create_router, AppState, Response};
