mod form;
mod record;
mod state;

pub use form::FormState;
pub use record::{SessionOutcome, SessionRecord};
pub use state::{Effect, Event, Phase, Session};
