pub mod alphabeta;
pub mod movegen;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{SearchParams, SearchResult, Searcher};
pub use movegen::{generate_ordered, ScoredMove};
