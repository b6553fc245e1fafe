//! Host-side half of the pipeline: time windows, the paginated listing
//! walk and normalization into `WorkItem`s.

pub mod fetcher;
pub mod github;
pub mod normalize;
pub mod window;

pub use fetcher::{FetchMode, ItemFetcher};
pub use github::{GitHubClient, RawItem};
pub use window::TimeWindow;
