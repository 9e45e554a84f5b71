//! Newsfeed core: article model, request composition and the pure load-cycle state machine.
mod article;
mod effect;
mod error;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use article::ArticleRecord;
pub use effect::{Effect, LoadNotice};
pub use error::{FailureReason, FetchError, TransportKind};
pub use msg::Msg;
pub use query::{
    build_request_url, QuerySettings, SettingsOverrides, DEFAULT_API_KEY, DEFAULT_ENDPOINT,
    DEFAULT_ORDER_BY, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_TERM,
};
pub use state::{CycleId, LoadPhase, LoadState};
pub use update::update;
pub use view_model::{EmptyState, LoadViewModel};
