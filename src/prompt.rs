use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::news::NormalizedContext;
use crate::topic::REFUSAL_MESSAGE;

/// Fixed prompt layouts, chosen once per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    /// The question, then the news context.
    Plain,
    /// Answer only from the supplied context, refuse otherwise.
    StrictContextOnly,
    /// Tech/AI assistant persona with the refusal text baked in.
    TechGated,
    /// Tells the model it is one of three answering side by side.
    MultiModelDisclosure,
}

impl FromStr for TemplateKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "plain" => Ok(TemplateKind::Plain),
            "strict" | "strict-context-only" => Ok(TemplateKind::StrictContextOnly),
            "tech-gated" | "tech" => Ok(TemplateKind::TechGated),
            "multi-model" | "multi-model-disclosure" => Ok(TemplateKind::MultiModelDisclosure),
            other => Err(AppError::ConfigError(format!("Invalid prompt template: {}", other))),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::Plain => "plain",
            TemplateKind::StrictContextOnly => "strict",
            TemplateKind::TechGated => "tech-gated",
            TemplateKind::MultiModelDisclosure => "multi-model",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
}

pub fn compose(question: &str, context: &NormalizedContext, template: TemplateKind) -> Prompt {
    let news = context.formatted_text();
    let text = match template {
        TemplateKind::Plain => plain(question, news),
        TemplateKind::StrictContextOnly => strict_context_only(question, news),
        TemplateKind::TechGated => tech_gated(question, news),
        TemplateKind::MultiModelDisclosure => multi_model_disclosure(question, news),
    };
    Prompt { text }
}

fn plain(question: &str, news: &str) -> String {
    let mut result = String::with_capacity(question.len() + news.len() + 80);
    result.push_str(question);
    result.push_str("\n\nNews context (may be useful for time-sensitive questions):\n");
    result.push_str(news);
    result
}

fn strict_context_only(question: &str, news: &str) -> String {
    format!(
        "Answer the question using ONLY the news context below.\n\
         Rules:\n\
         1. Do not rely on prior knowledge for anything time-sensitive.\n\
         2. If the context does not contain the answer, say that you do not have current information about it.\n\
         3. Cite the numbered articles you used.\n\n\
         News context:\n{}\n\n\
         Question: {}",
        news, question
    )
}

fn tech_gated(question: &str, news: &str) -> String {
    format!(
        "You are a Tech/AI news assistant. You only discuss technology, AI, software, hardware and the tech industry.\n\
         If the question is not about technology, reply with exactly: \"{}\"\n\
         Prefer the news context below for anything recent and mention the date when it matters.\n\n\
         News context:\n{}\n\n\
         Question: {}",
        REFUSAL_MESSAGE, news, question
    )
}

fn multi_model_disclosure(question: &str, news: &str) -> String {
    format!(
        "You are one of three AI models answering the same question side by side; the user will compare the answers.\n\
         Be accurate and concise, and say so plainly when you are unsure or your information may be outdated.\n\n\
         News context:\n{}\n\n\
         Question: {}",
        news, question
    )
}
