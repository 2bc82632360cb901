pub mod candidate;
pub mod record;

pub use candidate::Candidate;
pub use record::{EnrichedRecord, MovieRecord, RecordKey};
