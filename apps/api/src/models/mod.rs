pub mod dossie;
pub mod metrics;
pub mod response;
pub mod satellite;
pub mod scheduled_send;
