//! Recursive dispatch of records to decomposers.
//!
//! The [`Feeder`] selects a decomposer for each record, runs it, and re-feeds every
//! record it emits until only terminal records remain. Terminal records go to the
//! caller's callback in the order they are produced (depth-first).
//!
//! # Example
//!
//! ```rust,no_run
//! use decanter::core::config::DecanterConfig;
//! use decanter::core::feeder::Feeder;
//! use decanter::types::Data;
//!
//! # fn main() -> decanter::Result<()> {
//! let feeder = Feeder::with_default_decomposers(DecanterConfig::default())?;
//! for text in feeder.extract(Data::from_path("slides.tar"))? {
//!     println!("{}", text.body());
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::budget::ByteBudget;
use crate::core::config::DecanterConfig;
use crate::decomposers::register_default_decomposers;
use crate::plugins::registry::{DecomposerRegistry, get_decomposer_registry};
use crate::plugins::{DecomposeContext, Decomposer, Emit};
use crate::types::{Data, Record, RecordInfo, TextData};
use crate::{DecanterError, Result};
use std::sync::{Arc, RwLock};

/// Result of extracting one input of a batch.
#[derive(Debug)]
pub struct FeedOutcome {
    /// Info of the top-level input.
    pub source: Arc<RecordInfo>,
    /// Text records of the input, or the error that aborted it.
    pub result: Result<Vec<TextData>>,
}

/// Drives records through the decomposers of a registry.
pub struct Feeder {
    registry: Arc<RwLock<DecomposerRegistry>>,
    config: DecanterConfig,
}

impl Feeder {
    /// Create a feeder over `registry`.
    pub fn new(registry: Arc<RwLock<DecomposerRegistry>>, config: DecanterConfig) -> Self {
        Self { registry, config }
    }

    /// Create a feeder over a private registry holding the built-in decomposers.
    pub fn with_default_decomposers(config: DecanterConfig) -> Result<Self> {
        let mut registry = DecomposerRegistry::new();
        register_default_decomposers(&mut registry, &config)?;
        Ok(Self::new(Arc::new(RwLock::new(registry)), config))
    }

    /// Create a feeder over the process-wide registry.
    pub fn global(config: DecanterConfig) -> Self {
        Self::new(get_decomposer_registry(), config)
    }

    pub fn config(&self) -> &DecanterConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<RwLock<DecomposerRegistry>> {
        &self.registry
    }

    /// Decompose `data` recursively, handing every terminal record to `callback`.
    ///
    /// Terminal records are usually [`Record::Text`]. A container entry that no
    /// decomposer accepts is terminal too and arrives as [`Record::Data`]; its stream is
    /// only readable during the callback.
    ///
    /// # Errors
    ///
    /// - `UnsupportedFormat` if no decomposer accepts `data` itself
    /// - `LimitExceeded` if nesting passes `max_depth` or entry reads pass `max_total_bytes`
    /// - any decomposer error, or an error returned by `callback`
    pub fn feed<F>(&self, data: Data<'_>, mut callback: F) -> Result<()>
    where
        F: FnMut(Record<'_>) -> Result<()>,
    {
        let run = FeedRun {
            decomposers: self.snapshot()?,
            config: &self.config,
            budget: ByteBudget::new(self.config.max_total_bytes),
        };

        let Some(decomposer) = run.select(data.info()) else {
            return Err(DecanterError::UnsupportedFormat(format!(
                "no decomposer accepts {}",
                data.info().describe()
            )));
        };

        let decomposer = Arc::clone(decomposer);
        run.decompose(&decomposer, data, 0, &mut callback)
    }

    /// Decompose `data` and collect its text records.
    ///
    /// Terminal entries that are not text are skipped.
    pub fn extract(&self, data: Data<'_>) -> Result<Vec<TextData>> {
        let mut texts = Vec::new();
        self.feed(data, |record| {
            match record {
                Record::Text(text) => texts.push(text),
                Record::Data(entry) => {
                    tracing::debug!(entry = %entry.info().describe(), "Skipping entry no decomposer accepts");
                }
            }
            Ok(())
        })?;
        Ok(texts)
    }

    /// Extract several inputs independently.
    ///
    /// A failing input does not affect the others; every input yields one outcome, in
    /// input order.
    pub fn extract_all<'a, I>(&self, inputs: I) -> Vec<FeedOutcome>
    where
        I: IntoIterator<Item = Data<'a>>,
    {
        inputs
            .into_iter()
            .map(|data| {
                let source = data.info().clone();
                let result = self.extract(data);
                if let Err(e) = &result {
                    tracing::warn!(input = %source.describe(), error = %e, "Input failed");
                }
                FeedOutcome { source, result }
            })
            .collect()
    }

    fn snapshot(&self) -> Result<Vec<Arc<dyn Decomposer>>> {
        let registry = self
            .registry
            .read()
            .map_err(|e| DecanterError::LockPoisoned(format!("Decomposer registry lock poisoned: {}", e)))?;
        Ok(registry.all())
    }
}

/// State of one top-level feed.
struct FeedRun<'f> {
    decomposers: Vec<Arc<dyn Decomposer>>,
    config: &'f DecanterConfig,
    budget: ByteBudget,
}

impl FeedRun<'_> {
    /// Eligible decomposer with the smallest score; the earliest registered wins ties.
    fn select(&self, info: &RecordInfo) -> Option<&Arc<dyn Decomposer>> {
        self.decomposers
            .iter()
            .filter(|decomposer| decomposer.target(info))
            .filter_map(|decomposer| decomposer.target_score(info).map(|score| (score, decomposer)))
            .min_by_key(|(score, _)| *score)
            .map(|(score, decomposer)| {
                tracing::debug!(record = %info.describe(), decomposer = decomposer.name(), score, "Selected decomposer");
                decomposer
            })
    }

    fn decompose(
        &self,
        decomposer: &Arc<dyn Decomposer>,
        data: Data<'_>,
        depth: usize,
        callback: &mut Emit<'_>,
    ) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(DecanterError::LimitExceeded(format!(
                "{} is nested {} levels deep, limit is {}",
                data.info().describe(),
                depth,
                self.config.max_depth
            )));
        }

        let ctx = DecomposeContext::new(self.config, &self.budget, depth);
        decomposer.decompose(data, &ctx, &mut |child: Record<'_>| self.route(child, depth + 1, callback))
    }

    fn route(&self, record: Record<'_>, depth: usize, callback: &mut Emit<'_>) -> Result<()> {
        match self.select(record.info()) {
            Some(decomposer) => {
                let decomposer = Arc::clone(decomposer);
                self.decompose(&decomposer, record.into_data(), depth, callback)
            }
            None => callback(record),
        }
    }
}
