//! Aggregate status counters derived from a raw sheet grid.
//!
//! Every data cell is compared, trimmed and lowercased, against a fixed
//! token list and increments at most one counter. A row carrying several
//! status tokens is counted once per token.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetrics {
    pub sent: u32,
    pub opened: u32,
    pub replied: u32,
    pub bounced: u32,
    pub failed: u32,
    pub opt_out: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    Sent,
    Opened,
    Replied,
    Bounced,
    Failed,
    OptOut,
}

const STATUS_TOKENS: &[(Counter, &[&str])] = &[
    (Counter::Sent, &["sent", "enviado"]),
    (Counter::Opened, &["opened", "aberto"]),
    (Counter::Replied, &["replied", "respondido"]),
    (Counter::Bounced, &["bounced", "devolvido"]),
    (Counter::Failed, &["failed", "erro", "error"]),
    (Counter::OptOut, &["optout", "opt-out", "unsubscribed"]),
];

fn match_token(cell: &str) -> Option<Counter> {
    let normalized = cell.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    STATUS_TOKENS
        .iter()
        .find(|(_, tokens)| tokens.contains(&normalized.as_str()))
        .map(|(counter, _)| *counter)
}

impl SheetMetrics {
    fn bump(&mut self, counter: Counter) {
        let slot = match counter {
            Counter::Sent => &mut self.sent,
            Counter::Opened => &mut self.opened,
            Counter::Replied => &mut self.replied,
            Counter::Bounced => &mut self.bounced,
            Counter::Failed => &mut self.failed,
            Counter::OptOut => &mut self.opt_out,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Scans all rows after the header. When no "sent" token is found and at
/// least one data row exists, `sent` falls back to the data row count.
pub fn parse_metrics(grid: &[Vec<String>]) -> SheetMetrics {
    let mut metrics = SheetMetrics::default();

    for row in grid.iter().skip(1) {
        for value in row {
            if let Some(counter) = match_token(value) {
                metrics.bump(counter);
            }
        }
    }

    if metrics.sent == 0 && grid.len() > 1 {
        metrics.sent = u32::try_from(grid.len() - 1).unwrap_or(u32::MAX);
    }

    metrics
}
