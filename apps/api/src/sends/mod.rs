// Campaign send commands: schedule, force an immediate run through the
// satellite's Apps Script webhook, cancel a pending schedule.

pub mod handlers;
pub mod trigger;
pub mod webhook;
