//! Ingestion batch: one pass over every active satellite.
//!
//! Flow per batch: acquire token → list active satellites → for each satellite,
//! strictly in sequence: fetch grid → parse + persist metrics → parse leads →
//! for each replied lead not yet recorded: classify, draft, persist, notify and
//! raise a dossiê request when the lead is interested.
//!
//! Only token acquisition and the satellite listing abort the batch. Anything
//! that goes wrong inside one satellite is captured in that satellite's
//! result entry.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::auth::TokenSource;
use crate::classification::{LeadClassifier, LeadTag};
use crate::errors::AppError;
use crate::models::dossie::NewDossieRequest;
use crate::models::response::NewEmailResponse;
use crate::models::satellite::Satellite;
use crate::notify::{escape_markdown, Channel, Notifier};
use crate::sheets::leads::{parse_leads, LeadRecord};
use crate::sheets::metrics::{parse_metrics, SheetMetrics};
use crate::sheets::{Grid, SheetSource};
use crate::store::Store;
use crate::text::truncate_chars;

const RESPONSE_EXCERPT_CHARS: usize = 200;
const DRAFT_EXCERPT_CHARS: usize = 250;

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct IngestReport {
    pub success: bool,
    pub results: Vec<SatelliteResult>,
}

#[derive(Debug, Serialize)]
pub struct SatelliteResult {
    pub satellite: String,
    #[serde(flatten)]
    pub outcome: SatelliteOutcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SatelliteOutcome {
    Success {
        metrics: SheetMetrics,
        leads_processed: usize,
        new_responses: usize,
        follow_ups: usize,
    },
    Failure {
        error: String,
    },
}

impl SatelliteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SatelliteOutcome::Success { .. })
    }
}

/// What happened to one newly recorded reply.
struct RecordedReply {
    follow_up: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Ingestor
// ────────────────────────────────────────────────────────────────────────────

/// Holds every collaborator the batch needs. Built once at startup.
pub struct Ingestor {
    tokens: Arc<dyn TokenSource>,
    sheets: Arc<dyn SheetSource>,
    classifier: Arc<dyn LeadClassifier>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn Store>,
    range: String,
}

impl Ingestor {
    pub fn new(
        tokens: Arc<dyn TokenSource>,
        sheets: Arc<dyn SheetSource>,
        classifier: Arc<dyn LeadClassifier>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn Store>,
        range: String,
    ) -> Self {
        Self {
            tokens,
            sheets,
            classifier,
            notifier,
            store,
            range,
        }
    }

    /// Runs one batch. Returns `Err` only when no work could start at all.
    pub async fn run(&self) -> Result<IngestReport, AppError> {
        let token = self.tokens.access_token().await?;
        let satellites = self.store.list_active_satellites().await?;
        info!("Ingesting {} active satellite(s)", satellites.len());

        let mut results = Vec::with_capacity(satellites.len());
        for satellite in &satellites {
            let outcome = match self.process_satellite(&token, satellite).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Error processing {}: {e:#}", satellite.alias);
                    SatelliteOutcome::Failure {
                        error: format!("{e:#}"),
                    }
                }
            };
            results.push(SatelliteResult {
                satellite: satellite.alias.clone(),
                outcome,
            });
        }

        let failed = results.iter().filter(|r| !r.outcome.is_success()).count();
        info!(
            "Ingestion finished: {} ok, {} failed",
            results.len() - failed,
            failed
        );

        Ok(IngestReport {
            success: true,
            results,
        })
    }

    async fn process_satellite(
        &self,
        token: &str,
        satellite: &Satellite,
    ) -> anyhow::Result<SatelliteOutcome> {
        info!("Processing satellite {}", satellite.alias);

        let grid = self.fetch_or_empty(satellite, token).await;

        let metrics = parse_metrics(&grid);
        if let Err(e) = self.store.insert_metrics(satellite.id, &metrics).await {
            error!("Failed to insert metrics for {}: {e}", satellite.alias);
        }

        let leads = parse_leads(&grid);
        let mut new_responses = 0;
        let mut follow_ups = 0;

        for lead in leads.iter().filter(|l| l.replied) {
            let Some(reply_text) = lead.response_text.as_deref() else {
                continue;
            };

            match self
                .store
                .find_response_id(satellite.id, &lead.email)
                .await
            {
                Ok(Some(_)) => {
                    debug!("Reply from {} already recorded, skipping", lead.email);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        "Dedupe check failed for {} on {}: {e}; skipping lead",
                        lead.email, satellite.alias
                    );
                    continue;
                }
            }

            let recorded = self
                .record_reply(satellite, lead, reply_text)
                .await
                .with_context(|| format!("recording reply from {}", lead.email))?;

            new_responses += 1;
            if recorded.follow_up {
                follow_ups += 1;
            }
        }

        Ok(SatelliteOutcome::Success {
            metrics,
            leads_processed: leads.len(),
            new_responses,
            follow_ups,
        })
    }

    /// An unreachable sheet reads as an empty one.
    async fn fetch_or_empty(&self, satellite: &Satellite, token: &str) -> Grid {
        match self
            .sheets
            .fetch_range(&satellite.sheet_id, token, &self.range)
            .await
        {
            Ok(grid) => grid,
            Err(e) => {
                warn!(
                    "Failed to fetch sheet {} ({}): {e}",
                    satellite.sheet_id, satellite.alias
                );
                Grid::new()
            }
        }
    }

    async fn record_reply(
        &self,
        satellite: &Satellite,
        lead: &LeadRecord,
        reply_text: &str,
    ) -> anyhow::Result<RecordedReply> {
        let company = lead.company.as_deref();

        let tag = match &lead.tag {
            Some(existing) => existing.clone(),
            None => self
                .classifier
                .classify(reply_text, company)
                .await
                .as_str()
                .to_string(),
        };

        let draft = match &lead.draft_reply {
            Some(existing) => Some(existing.clone()),
            None => self.classifier.draft_reply(reply_text, company).await,
        };

        let response_id = self
            .store
            .insert_response(&NewEmailResponse {
                satellite_id: satellite.id,
                sender_email: satellite.alias.clone(),
                recipient_email: lead.email.clone(),
                response_content: Some(reply_text.to_string()),
                lead_name: lead.name.clone(),
                lead_company: lead.company.clone(),
                lead_website: lead.website.clone(),
                lead_city: lead.city.clone(),
                lead_tag: tag.clone(),
                gpt_response: draft.clone(),
                gpt_responded_at: draft.as_ref().map(|_| Utc::now()),
            })
            .await?;
        info!(
            "Recorded reply from {} on {} as {}",
            lead.email, satellite.alias, tag
        );

        self.alert(
            Channel::Responses,
            &format!(
                "🔔 *Nova resposta*\n\n*Satélite:* {}\n*Email:* {}\n*Tag:* {}\n\n{}",
                escape_markdown(&satellite.alias),
                escape_markdown(&lead.email),
                escape_markdown(&tag),
                escape_markdown(truncate_chars(reply_text, RESPONSE_EXCERPT_CHARS))
            ),
        )
        .await;

        if let Some(draft) = &draft {
            self.alert(
                Channel::Drafts,
                &format!(
                    "🤖 *Rascunho de resposta*\n\n*Satélite:* {}\n*Email:* {}\n\n{}",
                    escape_markdown(&satellite.alias),
                    escape_markdown(&lead.email),
                    escape_markdown(truncate_chars(draft, DRAFT_EXCERPT_CHARS))
                ),
            )
            .await;
        }

        let follow_up = tag == LeadTag::Interesse.as_str();
        if follow_up {
            self.store
                .insert_dossie(&NewDossieRequest {
                    satellite_id: satellite.id,
                    response_id,
                    lead_email: lead.email.clone(),
                    lead_name: lead.name.clone(),
                    lead_company: lead.company.clone(),
                    lead_website: lead.website.clone(),
                    lead_city: lead.city.clone(),
                })
                .await
                .context("creating dossiê request")?;
            info!("Dossiê requested for {}", lead.email);
        }

        Ok(RecordedReply { follow_up })
    }

    async fn alert(&self, channel: Channel, text: &str) {
        if let Err(e) = self.notifier.notify(channel, text).await {
            warn!("Notification to {channel:?} failed: {e}");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
