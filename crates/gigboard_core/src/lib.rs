//! Gigboard core: pure state machine, filter engine and view-model helpers.
mod effect;
mod filter;
pub mod fuzzy;
mod msg;
mod pagination;
mod record;
mod session;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::{
    normalize_term, visible_jobs, FilterState, LocationCategory, MatchMode, REMOTE_LOCATION,
};
pub use fuzzy::{FuzzyHit, FuzzyMatcher};
pub use msg::Msg;
pub use pagination::{LoadedPage, PageMerge, PageRequest, PageStatus, Pagination, DEFAULT_PAGE_SIZE};
pub use record::{JobId, JobRecord, RecordStore};
pub use session::{
    parse_callback, AuthAction, AuthCallback, AuthForm, AuthMessage, AuthMode, CallbackKind,
    Session, User,
};
pub use state::{AppState, BoardSettings};
pub use update::update;
pub use view_model::{AppViewModel, AuthFormView, JobCardView, Screen, MISSING_DATE};
