pub mod client;
pub mod error;
pub mod stream;
pub mod types;

pub use client::{ArticleClient, ArticleService};
pub use error::ApiError;
pub use stream::StatusStream;
pub use types::{
    ArticleContent, CreateArticleRequest, CreateArticleResponse, Language, Platform, StatusEvent,
};
