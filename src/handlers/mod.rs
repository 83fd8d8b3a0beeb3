pub mod cars;
pub mod heartbeat;
