//! Interactive modelling session
//!
//! Owns the current assumptions and the projection derived from them. Every
//! edit replaces the assumptions wholesale and recomputes the projection from
//! scratch.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::advisor::{Advisor, TextGenerator};
use crate::assumptions::{Assumptions, AssumptionsUpdate, BusinessType};
use crate::projection::{FinancialData, ProjectionEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelSession {
    business_type: BusinessType,
    assumptions: Assumptions,
    data: FinancialData,
    chat_history: Vec<ChatMessage>,
}

impl ModelSession {
    /// SaaS session with template assumptions
    pub fn new() -> Self {
        Self::with_assumptions(BusinessType::SaaS, Assumptions::saas_template())
    }

    pub fn with_assumptions(business_type: BusinessType, assumptions: Assumptions) -> Self {
        let data = project(business_type, &assumptions);
        Self {
            business_type,
            assumptions,
            data,
            chat_history: Vec::new(),
        }
    }

    pub fn business_type(&self) -> BusinessType {
        self.business_type
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn data(&self) -> &FinancialData {
        &self.data
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    /// Merge an edit into the assumptions and recompute
    pub fn apply(&mut self, update: &AssumptionsUpdate) -> &FinancialData {
        self.assumptions = self.assumptions.merge(update);
        self.data = project(self.business_type, &self.assumptions);
        &self.data
    }

    /// Switch business type; assumptions reset to that type's template
    pub fn set_business_type(&mut self, business_type: BusinessType) -> &FinancialData {
        info!("Switching business type to {}", business_type);
        self.business_type = business_type;
        self.assumptions = Assumptions::template_for(business_type);
        self.data = project(business_type, &self.assumptions);
        &self.data
    }

    /// Ask the advisor about the current projection
    ///
    /// Blank questions are ignored and return `None`. Otherwise both the
    /// question and the reply are appended to the chat history.
    pub async fn send_message<G: TextGenerator>(
        &mut self,
        question: &str,
        advisor: &Advisor<G>,
    ) -> Option<&ChatMessage> {
        if question.trim().is_empty() {
            return None;
        }

        self.chat_history.push(ChatMessage::new(Sender::User, question));
        let answer = advisor.ask(question, &self.data, &self.assumptions).await;
        self.chat_history.push(ChatMessage::new(Sender::Ai, answer));
        self.chat_history.last()
    }
}

fn project(business_type: BusinessType, assumptions: &Assumptions) -> FinancialData {
    ProjectionEngine::for_business(business_type, assumptions.clone()).run()
}

impl Default for ModelSession {
    fn default() -> Self {
        Self::new()
    }
}
