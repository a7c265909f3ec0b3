//! Schedule indexing.
//!
//! Each point has one [`SchedulePage`] per UTC day, holding the runs that
//! arrive and depart there in two [`Timeline`]s. Transfer discovery reads
//! departure timelines to find onward runs inside a transfer window.

mod index;
mod page;
mod timeline;

pub use index::index_runs;
pub use page::{SchedulePage, SchedulePageId};
pub use timeline::Timeline;
