//! Core library for tdx: todos stored as iCalendar VTODO files in a vdir.

pub mod add;
pub mod collection;
pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod ics;
pub mod item;
pub mod sort;
pub mod template;
pub mod uid;
pub mod vdir;

pub use add::{AddInput, DateMatch, DatePhraseParser, NoDates};
pub use collection::Collection;
pub use config::TdxConfig;
pub use error::{TdxError, TdxResult};
pub use filter::FilterOptions;
pub use item::{Item, Priority, Status, StatusFilter, Tag, Transition};
pub use sort::SortKey;
pub use vdir::Vdir;
