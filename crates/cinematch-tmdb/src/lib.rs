//! cinematch TMDB — movie source client, resolution and the dataset pipeline.

pub mod error;
pub mod http;
pub mod pipeline;
pub mod resolver;
pub mod source;

#[cfg(test)]
mod testing;

pub use error::{Result, TmdbError};
pub use pipeline::{DatasetPipeline, GenerateOptions, RunSummary};
pub use resolver::{Resolution, Resolver, Unresolved};
pub use source::{MovieDetails, MovieSource, TmdbSource};
