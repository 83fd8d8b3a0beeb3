pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod secrets;

pub use config::Config;
pub use error::GscError;
pub use router::{GscState, gsc_router};
