// Account management for the dashboard: list with latest metrics, register,
// pause/resume, remove.

pub mod handlers;
