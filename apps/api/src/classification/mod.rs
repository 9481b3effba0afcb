//! Lead reply classification and reply drafting.
//!
//! Both operations degrade instead of failing: no API key or any LLM error
//! yields `LeadTag::Indefinido` for classification and `None` for drafts.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{ChatMessage, CompletionParams, LlmClient, Role};
use crate::text::truncate_chars;

pub mod prompts;

use prompts::{CLASSIFY_PROMPT, CLASSIFY_SYSTEM, DRAFT_PROMPT, DRAFT_SYSTEM};

/// Reply text is cut to this many characters before it reaches the model.
pub const MAX_REPLY_CHARS: usize = 1000;

const CLASSIFY_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.1,
    max_tokens: 20,
};
const DRAFT_PARAMS: CompletionParams = CompletionParams {
    temperature: 0.7,
    max_tokens: 300,
};

/// Closed category set for lead replies, plus the `Indefinido` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadTag {
    #[serde(rename = "INTERESSE")]
    Interesse,
    #[serde(rename = "DESINTERESSE")]
    Desinteresse,
    #[serde(rename = "CURIOSO")]
    Curioso,
    #[serde(rename = "DÚVIDA")]
    Duvida,
    #[serde(rename = "OPT_OUT")]
    OptOut,
    #[serde(rename = "REDIRECIONAMENTO")]
    Redirecionamento,
    #[serde(rename = "FORA_DO_ESCRITÓRIO")]
    ForaDoEscritorio,
    #[serde(rename = "INDEFINIDO")]
    Indefinido,
}

impl LeadTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadTag::Interesse => "INTERESSE",
            LeadTag::Desinteresse => "DESINTERESSE",
            LeadTag::Curioso => "CURIOSO",
            LeadTag::Duvida => "DÚVIDA",
            LeadTag::OptOut => "OPT_OUT",
            LeadTag::Redirecionamento => "REDIRECIONAMENTO",
            LeadTag::ForaDoEscritorio => "FORA_DO_ESCRITÓRIO",
            LeadTag::Indefinido => "INDEFINIDO",
        }
    }

    /// Maps raw model output onto the closed set. Surrounding quotes, periods
    /// and markdown emphasis are stripped; spaces and hyphens read as
    /// underscores; accents are optional. Anything else is `Indefinido`.
    pub fn from_model_output(raw: &str) -> LeadTag {
        let normalized = raw
            .trim()
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '.' | '*' | '`'))
            .trim()
            .to_uppercase()
            .replace([' ', '-'], "_");

        match normalized.as_str() {
            "INTERESSE" => LeadTag::Interesse,
            "DESINTERESSE" => LeadTag::Desinteresse,
            "CURIOSO" => LeadTag::Curioso,
            "DÚVIDA" | "DUVIDA" => LeadTag::Duvida,
            "OPT_OUT" | "OPTOUT" => LeadTag::OptOut,
            "REDIRECIONAMENTO" => LeadTag::Redirecionamento,
            "FORA_DO_ESCRITÓRIO" | "FORA_DO_ESCRITORIO" => LeadTag::ForaDoEscritorio,
            _ => LeadTag::Indefinido,
        }
    }
}

impl fmt::Display for LeadTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification and drafting backend. Implementations never fail; they
/// degrade to `Indefinido` / `None`.
#[async_trait]
pub trait LeadClassifier: Send + Sync {
    async fn classify(&self, reply_text: &str, company: Option<&str>) -> LeadTag;

    async fn draft_reply(&self, reply_text: &str, company: Option<&str>) -> Option<String>;
}

/// `LeadClassifier` backed by the chat-completions client.
pub struct LlmLeadClassifier {
    llm: LlmClient,
}

impl LlmLeadClassifier {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

fn render_prompt(template: &str, reply_text: &str, company: Option<&str>) -> String {
    template
        .replace("{company}", company.unwrap_or("não informada"))
        .replace("{reply}", truncate_chars(reply_text, MAX_REPLY_CHARS))
}

#[async_trait]
impl LeadClassifier for LlmLeadClassifier {
    async fn classify(&self, reply_text: &str, company: Option<&str>) -> LeadTag {
        if !self.llm.is_configured() {
            return LeadTag::Indefinido;
        }

        let prompt = render_prompt(CLASSIFY_PROMPT, reply_text, company);
        let messages = [
            ChatMessage {
                role: Role::System,
                content: CLASSIFY_SYSTEM,
            },
            ChatMessage {
                role: Role::User,
                content: &prompt,
            },
        ];

        match self.llm.complete(&messages, CLASSIFY_PARAMS).await {
            Ok(text) => {
                let tag = LeadTag::from_model_output(&text);
                if tag == LeadTag::Indefinido {
                    warn!("Unrecognized classification output: {:?}", text);
                }
                tag
            }
            Err(e) => {
                warn!("Lead classification failed: {e}");
                LeadTag::Indefinido
            }
        }
    }

    async fn draft_reply(&self, reply_text: &str, company: Option<&str>) -> Option<String> {
        if !self.llm.is_configured() || reply_text.trim().is_empty() {
            return None;
        }

        let prompt = render_prompt(DRAFT_PROMPT, reply_text, company);
        let messages = [
            ChatMessage {
                role: Role::System,
                content: DRAFT_SYSTEM,
            },
            ChatMessage {
                role: Role::User,
                content: &prompt,
            },
        ];

        match self.llm.complete(&messages, DRAFT_PARAMS).await {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                warn!("Reply draft generation failed: {e}");
                None
            }
        }
    }
}
