//! Batch driver: input store → diff → resolve → merge → rules → output store.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use cinematch_core::merge::{self, Dataset};
use cinematch_core::storage::{incremental_path, load_dataset, load_input, save_dataset};
use cinematch_core::{AppConfig, CinematchError, MetadataRules, MovieRecord, RecordKey, Result};
use tracing::{debug, info, warn};

use crate::resolver::{Resolution, Resolver};
use crate::source::MovieSource;

/// Progress is logged every this many resolved inputs.
const PROGRESS_INTERVAL: usize = 50;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Reuse records from an existing output file and resolve only new keys.
    pub incremental: bool,
}

impl GenerateOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            incremental: false,
        }
    }

    pub fn incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Input records sent through the resolver.
    pub processed: usize,
    /// Records resolved in this run.
    pub identified: usize,
    pub with_imdb_id: usize,
    pub with_poster: usize,
    pub unresolved: usize,
    /// Records carried over from the prior dataset.
    pub survivors: usize,
    pub output_total: usize,
    /// Set when an incremental file was written.
    pub incremental_file: Option<PathBuf>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} movies. Identified {}. Outputs {} movies with {} IMDB IDs and {} TMDB poster paths.",
            self.processed, self.identified, self.output_total, self.with_imdb_id, self.with_poster
        )?;
        if self.survivors > 0 {
            write!(f, " {} survived from the prior dataset.", self.survivors)?;
        }
        Ok(())
    }
}

pub struct DatasetPipeline<S: MovieSource> {
    resolver: Resolver<S>,
    rules: MetadataRules,
}

impl<S: MovieSource> DatasetPipeline<S> {
    pub fn new(source: S, config: &AppConfig) -> Self {
        Self {
            resolver: Resolver::new(source, config),
            rules: config.rules.clone(),
        }
    }

    pub fn resolver(&self) -> &Resolver<S> {
        &self.resolver
    }

    /// Generate the output dataset described by `options`.
    ///
    /// Fatal: unreadable or malformed input, a missing prior dataset in
    /// incremental mode, a merge collision, and write failures. Records that
    /// cannot be resolved are skipped and counted.
    pub async fn generate(&self, options: &GenerateOptions) -> Result<RunSummary> {
        let inputs = unique_inputs(load_input(&options.input)?);
        info!("'{}' is successfully opened.", options.input.display());

        let input_keys: HashSet<RecordKey> = inputs.iter().map(MovieRecord::key).collect();
        let (keys_to_resolve, survivors) = if options.incremental {
            let diff = self.diff_against_prior(&input_keys, &options.output)?;
            (diff.keys_to_resolve, diff.survivors)
        } else {
            (input_keys, Dataset::new())
        };

        let mut summary = RunSummary {
            survivors: survivors.len(),
            ..Default::default()
        };
        let mut resolved = Dataset::new();

        for record in &inputs {
            if !keys_to_resolve.contains(&record.key()) {
                debug!("Already exists in '{}': {}", options.output.display(), record.label());
                continue;
            }

            summary.processed += 1;
            match self.resolver.resolve(record).await? {
                Resolution::Resolved(entry) => {
                    summary.identified += 1;
                    summary.with_imdb_id += usize::from(entry.imdb_id.is_some());
                    summary.with_poster += usize::from(entry.has_poster());
                    resolved.insert(*entry)?;
                }
                Resolution::Unresolved(reason) => {
                    summary.unresolved += 1;
                    warn!("Skip: {reason}: {}", record.label());
                }
            }

            if summary.processed % PROGRESS_INTERVAL == 0 {
                info!(
                    "Processed {} movies. Outputs {} movies with {} IMDB IDs and {} TMDB poster paths.",
                    summary.processed,
                    resolved.len(),
                    summary.with_imdb_id,
                    summary.with_poster
                );
            }
        }

        let resolved_keys: Vec<RecordKey> = resolved.keys().collect();
        let mut dataset = merge::merge(resolved, survivors)?;

        self.rules.apply(&mut dataset, &inputs);

        if options.incremental {
            let path = incremental_path(&options.output);
            let fresh: Vec<_> = resolved_keys
                .iter()
                .filter_map(|key| dataset.get(key).cloned())
                .collect();
            save_dataset(&path, &fresh)?;
            info!("Incremental mode: wrote {} new movies to '{}'", fresh.len(), path.display());
            summary.incremental_file = Some(path);
        }

        dataset.sort_for_output();
        save_dataset(&options.output, dataset.records())?;
        summary.output_total = dataset.len();

        info!("'{}' is successfully generated. {summary}", options.output.display());
        Ok(summary)
    }

    fn diff_against_prior(
        &self,
        input_keys: &HashSet<RecordKey>,
        output: &Path,
    ) -> Result<merge::Diff> {
        if !output.exists() {
            return Err(CinematchError::PriorDatasetMissing(output.to_path_buf()));
        }
        let diff = merge::diff(input_keys, load_dataset(output)?);
        info!(
            "Incremental mode: {} movies to be processed, {} movies to be survived from '{}'",
            diff.keys_to_resolve.len(),
            diff.survivors.len(),
            output.display()
        );
        Ok(diff)
    }
}

/// Drop repeated keys, keeping the first occurrence.
fn unique_inputs(records: Vec<MovieRecord>) -> Vec<MovieRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.key());
            if !fresh {
                warn!("Duplicate input entry {}, keeping the first one", record.key());
            }
            fresh
        })
        .collect()
}
