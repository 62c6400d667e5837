pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod store;

pub use router::build_router;
