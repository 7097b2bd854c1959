pub mod dispatcher;
pub mod indexer;

pub use dispatcher::{Dispatched, Dispatcher};
pub use indexer::{Indexer, IndexerError, IndexerStats};
