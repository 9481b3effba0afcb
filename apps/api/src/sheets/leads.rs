//! Lead extraction from a sheet grid using header-name heuristics.
//!
//! Column lookup is a case-insensitive substring match. Fields are resolved
//! in declaration order and a column claimed by an earlier field is not
//! offered to later ones, so "Resposta GPT" lands on the draft field and
//! never shadows the lead's own "Resposta".

use std::collections::HashMap;

use serde::Serialize;

use super::cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Email,
    DraftReply,
    Replied,
    ResponseText,
    Tag,
    Company,
    Website,
    City,
    Name,
    Status,
}

const FIELD_CANDIDATES: &[(LeadField, &[&str])] = &[
    (LeadField::Email, &["email", "e-mail"]),
    (LeadField::DraftReply, &["resposta gpt", "gpt", "rascunho", "draft"]),
    (LeadField::Replied, &["respondeu", "replied"]),
    (LeadField::ResponseText, &["resposta", "response", "reply"]),
    (LeadField::Tag, &["tag"]),
    (LeadField::Company, &["empresa", "company"]),
    (LeadField::Website, &["website", "site"]),
    (LeadField::City, &["cidade", "city"]),
    (LeadField::Name, &["nome", "name"]),
    (LeadField::Status, &["status"]),
];

/// Email falls back to the first column when no header matches.
const EMAIL_FALLBACK_COLUMN: usize = 0;

/// A prospect row parsed from the sheet. Rebuilt on every ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeadRecord {
    pub email: String,
    pub company: Option<String>,
    pub name: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub status: Option<String>,
    pub replied: bool,
    pub tag: Option<String>,
    pub response_text: Option<String>,
    pub draft_reply: Option<String>,
}

/// Field → column index, resolved once per grid.
#[derive(Debug, Default)]
pub struct ColumnMap {
    columns: HashMap<LeadField, usize>,
}

impl ColumnMap {
    pub fn resolve(header: &[String]) -> Self {
        let normalized: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut columns = HashMap::new();

        for (field, candidates) in FIELD_CANDIDATES {
            let found = normalized.iter().enumerate().find(|(idx, h)| {
                !h.is_empty()
                    && !columns.values().any(|claimed| claimed == idx)
                    && candidates.iter().any(|c| h.contains(c))
            });
            if let Some((idx, _)) = found {
                columns.insert(*field, idx);
            }
        }

        Self { columns }
    }

    pub fn get(&self, field: LeadField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    fn value(&self, row: &[String], field: LeadField) -> Option<String> {
        self.get(field)
            .map(|idx| cell(row, idx).trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
    }
}

/// Extracts one `LeadRecord` per data row whose email cell is non-empty and
/// contains `@`. Other rows are skipped silently.
pub fn parse_leads(grid: &[Vec<String>]) -> Vec<LeadRecord> {
    let Some(header) = grid.first() else {
        return Vec::new();
    };
    let columns = ColumnMap::resolve(header);
    let email_idx = columns.get(LeadField::Email).unwrap_or(EMAIL_FALLBACK_COLUMN);

    grid.iter()
        .skip(1)
        .filter_map(|row| {
            let email = cell(row, email_idx).trim();
            if email.is_empty() || !email.contains('@') {
                return None;
            }

            let replied = columns
                .value(row, LeadField::Replied)
                .map(|v| v.eq_ignore_ascii_case("yes"))
                .unwrap_or(false);

            Some(LeadRecord {
                email: email.to_string(),
                company: columns.value(row, LeadField::Company),
                name: columns.value(row, LeadField::Name),
                website: columns.value(row, LeadField::Website),
                city: columns.value(row, LeadField::City),
                status: columns.value(row, LeadField::Status),
                replied,
                tag: columns.value(row, LeadField::Tag),
                response_text: columns.value(row, LeadField::ResponseText),
                draft_reply: columns.value(row, LeadField::DraftReply),
            })
        })
        .collect()
}
