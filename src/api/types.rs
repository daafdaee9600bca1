//! Wire types for the article generation service.
//!
//! All request and response bodies are JSON. The field order and spelling of
//! [`CreateArticleRequest`] are part of the service contract, including the
//! always-empty `keywords` list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The status value that ends the waiting phase and triggers the content fetch.
pub const TERMINAL_STATUS: &str = "Completed";

/// Social-media platforms the service can write for.
///
/// Serialized as the exact capitalized names the service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    Twitter,
    LinkedIn,
    TikTok,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::TikTok,
    ];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Facebook => write!(f, "Facebook"),
            Platform::Twitter => write!(f, "Twitter"),
            Platform::LinkedIn => write!(f, "LinkedIn"),
            Platform::TikTok => write!(f, "TikTok"),
        }
    }
}

/// Languages the service can generate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Sinhala,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Sinhala];
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Sinhala => write!(f, "Sinhala"),
        }
    }
}

/// Body of the POST `/article` creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateArticleRequest {
    pub platform: Platform,
    pub language: Language,
    pub title: String,
    /// Always empty; the shape is required by the endpoint.
    pub keywords: Vec<String>,
}

impl CreateArticleRequest {
    pub fn new(platform: Platform, language: Language, title: String) -> Self {
        Self {
            platform,
            language,
            title,
            keywords: Vec::new(),
        }
    }
}

/// Response of the creation endpoint — the opaque article identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticleResponse {
    pub id: String,
}

/// One message on the status stream. Extra fields are tolerated and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: String,
}

impl StatusEvent {
    /// True for the single status value that triggers content retrieval.
    pub fn is_terminal(&self) -> bool {
        self.status == TERMINAL_STATUS
    }
}

/// The generated article, fetched once per identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleContent {
    pub title: String,
    pub content: String,
}
