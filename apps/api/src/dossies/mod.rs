// Follow-up research requests raised by ingestion for interested leads.

pub mod handlers;
