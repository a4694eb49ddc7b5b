//! Decomposer plugin trait.
//!
//! A decomposer judges whether it applies to a record and, when selected, splits the
//! record into nested records or extracts its text.

use crate::Result;
use crate::core::budget::{BudgetedReader, ByteBudget};
use crate::core::config::DecanterConfig;
use crate::plugins::Plugin;
use crate::types::{Data, Record, RecordInfo};
use std::io::Read;

/// Sink a decomposer hands its output records to.
///
/// Records may borrow from the decomposer's container and are only valid for the
/// duration of the call.
pub type Emit<'e> = dyn FnMut(Record<'_>) -> Result<()> + 'e;

/// Per-call state handed to [`Decomposer::decompose`].
#[derive(Debug, Clone, Copy)]
pub struct DecomposeContext<'c> {
    config: &'c DecanterConfig,
    budget: &'c ByteBudget,
    depth: usize,
}

impl<'c> DecomposeContext<'c> {
    pub fn new(config: &'c DecanterConfig, budget: &'c ByteBudget, depth: usize) -> Self {
        Self { config, budget, depth }
    }

    pub fn config(&self) -> &'c DecanterConfig {
        self.config
    }

    pub fn budget(&self) -> &'c ByteBudget {
        self.budget
    }

    /// Nesting depth of the record being decomposed; 0 for top-level inputs.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Wrap a container entry reader so its bytes count against the feed's byte ceiling.
    ///
    /// Container decomposers must read entry content through this.
    pub fn meter<R: Read>(&self, reader: R) -> BudgetedReader<'c, R> {
        self.budget.meter(reader)
    }
}

/// Trait for decomposer plugins.
///
/// # Selection
///
/// The feeder keeps every registered decomposer whose [`target`](Decomposer::target)
/// holds and picks the one with the smallest [`target_score`](Decomposer::target_score).
/// Ties go to the decomposer registered first. Score bands:
///
/// - `< 0`: confident format match; built-in decomposers use `-1`
/// - `0..=99`: heuristic match
/// - `>= 100`: fallback, e.g. a remote extraction service
///
/// # Example
///
/// ```rust
/// use decanter::plugins::{Decomposer, DecomposeContext, Emit, Plugin};
/// use decanter::types::{Data, Record, RecordInfo, TextData};
/// use decanter::Result;
/// use std::io::Read;
///
/// struct PlainText;
///
/// impl Plugin for PlainText {
///     fn name(&self) -> &str { "plain-text" }
///     fn version(&self) -> String { "1.0.0".to_string() }
///     fn initialize(&self) -> Result<()> { Ok(()) }
///     fn shutdown(&self) -> Result<()> { Ok(()) }
/// }
///
/// impl Decomposer for PlainText {
///     fn target(&self, info: &RecordInfo) -> bool {
///         info.extension() == Some("md")
///     }
///
///     fn decompose(&self, data: Data<'_>, _ctx: &DecomposeContext<'_>, emit: &mut Emit<'_>) -> Result<()> {
///         let source = data.info().clone();
///         let mut body = String::new();
///         data.into_reader()?.read_to_string(&mut body)?;
///         emit(Record::Text(TextData::new(body, &source)))
///     }
/// }
/// ```
pub trait Decomposer: Plugin {
    /// Cheap membership test on the record's extension or declared MIME type.
    fn target(&self, info: &RecordInfo) -> bool;

    /// Priority of this decomposer for `info`; `None` when it does not apply.
    fn target_score(&self, info: &RecordInfo) -> Option<i32> {
        self.target(info).then_some(-1)
    }

    /// Decompose `data`, handing every produced record to `emit`.
    ///
    /// # Errors
    ///
    /// - `DecanterError::MalformedContainer` - the container structure is corrupt
    /// - `DecanterError::MalformedMarkup` - an XML part failed to parse
    /// - `DecanterError::Io` - the record could not be read
    /// - any error returned by `emit`, which must be propagated unchanged
    fn decompose(&self, data: Data<'_>, ctx: &DecomposeContext<'_>, emit: &mut Emit<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextData;

    struct Upper;

    impl Plugin for Upper {
        fn name(&self) -> &str {
            "upper"
        }
        fn version(&self) -> String {
            "1.0.0".to_string()
        }
        fn initialize(&self) -> Result<()> {
            Ok(())
        }
        fn shutdown(&self) -> Result<()> {
            Ok(())
        }
    }

    impl Decomposer for Upper {
        fn target(&self, info: &RecordInfo) -> bool {
            info.mime_type() == Some("text/x-lower")
        }

        fn decompose(&self, data: Data<'_>, ctx: &DecomposeContext<'_>, emit: &mut Emit<'_>) -> Result<()> {
            let source = data.info().clone();
            let mut body = String::new();
            ctx.meter(data.into_reader()?).read_to_string(&mut body)?;
            emit(Record::Text(TextData::new(body.to_uppercase(), &source)))
        }
    }

    #[test]
    fn test_default_target_score() {
        let matching = RecordInfo::new(None, Some("text/x-lower".to_string()));
        let other = RecordInfo::new(Some("a.bin".to_string()), None);
        assert_eq!(Upper.target_score(&matching), Some(-1));
        assert_eq!(Upper.target_score(&other), None);
    }

    #[test]
    fn test_decompose_emits_through_sink() {
        let config = DecanterConfig::default();
        let budget = ByteBudget::new(1024);
        let ctx = DecomposeContext::new(&config, &budget, 0);

        let mut bodies = Vec::new();
        let data = Data::from_bytes(b"abc".to_vec()).with_mime_type("text/x-lower");
        Upper
            .decompose(data, &ctx, &mut |record: Record<'_>| {
                bodies.push(record.into_text().unwrap().into_body());
                Ok(())
            })
            .unwrap();

        assert_eq!(bodies, vec!["ABC".to_string()]);
        assert_eq!(budget.consumed(), 3);
    }
}
