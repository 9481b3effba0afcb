// Read side of recorded lead replies for the dashboard.

pub mod handlers;
