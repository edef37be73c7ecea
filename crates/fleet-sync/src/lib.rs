pub mod avatar;
pub mod controller;
pub mod fetcher;
pub mod memory;
pub mod page;
pub mod provider;
pub mod report;
pub mod scheduler;
pub mod screen;
pub mod scroll;
pub mod search;
pub mod session;
pub mod state;

pub use avatar::{avatar_source, AvatarLoader, AvatarOutcome, AvatarSource};
pub use controller::ListController;
pub use fetcher::{FetchOutcome, RemoteListFetcher};
pub use memory::{InMemoryImageProvider, InMemoryProvider};
pub use page::{PageRequest, PageResult, TotalCount};
pub use provider::{EntityPage, ImageProvider, ListProvider, Paging, ProviderSlot};
pub use report::{ErrorReporter, LogReporter, RetryHandle};
pub use scheduler::{AutoRefresh, RefreshTarget, SchedulerState};
pub use screen::ListScreen;
pub use scroll::{should_load_next_page, ScrollLoader};
pub use search::SearchController;
pub use session::SyncSession;
pub use state::{CollectionState, ListSnapshot};
