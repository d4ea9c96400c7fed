pub mod config;
pub mod corpus;
pub mod errors;
pub mod metrics;
pub mod results;
pub mod search;

pub use config::{EncodingMode, SearchConfig};
pub use corpus::{Corpus, CorpusLoader};
pub use errors::{ErrorKind, SearchError, SearchResult};
pub use results::{MatchEvent, SearchResult as SearchOutput, WorkerReport};
pub use search::{search, search_with_config, Searcher};
