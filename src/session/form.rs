use crate::api::{CreateArticleRequest, Language, Platform};

/// The user-entered form fields.
///
/// All three start empty and are reset together on refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub platform: Option<Platform>,
    pub language: Option<Language>,
    pub title: String,
}

impl FormState {
    /// Reset every field to its initial empty value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// A form can be submitted once both selections are made and the title
    /// holds something other than whitespace.
    pub fn is_submittable(&self) -> bool {
        self.platform.is_some() && self.language.is_some() && !self.title.trim().is_empty()
    }

    /// Package the form as a creation request, keyword list empty.
    pub fn to_request(&self) -> Option<CreateArticleRequest> {
        Some(CreateArticleRequest::new(
            self.platform?,
            self.language?,
            self.title.clone(),
        ))
    }
}
