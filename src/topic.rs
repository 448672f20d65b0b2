//! Keyword classification for Tech/AI-only deployments, and the query
//! helpers the news sources share.

/// Returned instead of an answer when the gate rejects a question.
pub const REFUSAL_MESSAGE: &str = "I can only answer questions about technology and AI. Please ask about tech companies, AI models, chips, software, or other technology news.";

// Matched as substrings of the lower-cased question.
const TECH_PHRASES: &[&str] = &[
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "neural network",
    "openai",
    "chatgpt",
    "gpt-",
    "anthropic",
    "claude",
    "gemini",
    "google",
    "deepmind",
    "microsoft",
    "copilot",
    "nvidia",
    "tsmc",
    "semiconductor",
    "chip",
    "amazon",
    "tesla",
    "robot",
    "software",
    "hardware",
    "startup",
    "silicon valley",
    "tech",
    "cloud",
    "data center",
    "datacenter",
    "cyber",
    "quantum",
    "crypto",
    "blockchain",
    "open source",
    "programming",
    "developer",
    "computer",
    "smartphone",
    "algorithm",
    "hugging face",
    "mistral",
    "llama",
];

// These would fire inside ordinary words ("said", "pineapple"), so they
// only count as whole words.
const TECH_WORDS: &[&str] = &[
    "ai", "ml", "llm", "llms", "gpu", "gpus", "cpu", "aws", "meta", "xai", "api", "agi", "amd", "intel", "apple",
];

/// OR-list appended to primary news API queries in tech focus.
pub const NEWS_API_TECH_TERMS: &str = "(AI OR artificial intelligence OR OpenAI OR ChatGPT OR Claude OR Anthropic OR Google OR Gemini OR Microsoft OR Nvidia OR chip OR semiconductor OR GPU OR LLM OR machine learning OR tech OR technology)";

/// Shorter OR-list for the content search API, which caps query complexity.
pub const CONTENT_API_TECH_TERMS: &str = "(AI OR OpenAI OR ChatGPT OR Anthropic OR Nvidia OR tech OR technology OR software OR chip OR LLM)";

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "an", "and", "any", "are", "at", "be", "before", "by", "can", "did", "do",
    "does", "for", "from", "has", "have", "how", "in", "is", "it", "its", "latest", "me", "new", "news",
    "of", "on", "or", "recent", "tell", "than", "that", "the", "this", "to", "today", "was", "week",
    "what", "whats", "when", "where", "which", "who", "why", "will", "with",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TopicGate;

impl TopicGate {
    pub fn new() -> Self {
        TopicGate
    }

    pub fn is_in_scope(&self, question: &str) -> bool {
        let lower = question.to_lowercase();

        if TECH_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            return true;
        }

        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| TECH_WORDS.contains(&word))
    }
}

/// Up to five significant words of the question, for sources that AND
/// every term together and return nothing for a full sentence.
pub fn search_keywords(question: &str) -> String {
    question
        .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '.')
        .map(|word| word.trim_matches(|c: char| c == '-' || c == '.'))
        .filter(|word| !word.is_empty())
        .filter(|word| {
            let lower = word.to_lowercase();
            !STOP_WORDS.contains(&lower.as_str()) && (word.len() > 2 || TECH_WORDS.contains(&lower.as_str()))
        })
        .take(5)
        .collect::<Vec<_>>()
        .join(" ")
}
