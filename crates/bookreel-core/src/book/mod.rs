mod event;
mod models;
mod search;
mod term;

pub use event::{spawn_search, SearchEvent};
pub use models::ItemRecord;
pub use search::{normalize_response, BookSearch, OpenLibraryClient};
pub use term::{SearchTerm, TermSource};
