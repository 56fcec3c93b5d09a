//! Label and definition text indices with exact, substring and fuzzy scoring

pub mod normalize;
pub mod result;
pub mod similarity;
pub mod text_index;

pub use normalize::normalize;
pub use result::{MatchScore, SearchResult};
pub use similarity::{DamerauLevenshtein, JaroWinkler, SimilarityKind, StringSimilarity};
pub use text_index::{score_match, FieldRole, IndexKind, SearchOptions, TextIndex, DEFAULT_NUM_RESULTS};
