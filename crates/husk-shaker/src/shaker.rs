//! The shaking driver.
//!
//! A run goes `Parsing → Indexing → Traversing → Reconstructing → Done`.
//! Input that does not parse is copied to the output unchanged instead
//! (`FallbackCopy`); that is the only way parsing can end a run early.

use std::io::{Read, Write};

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, debug_span, trace, warn};

use crate::analysis::Analysis;
use crate::artifact::{ArtifactStore, MemoryArtifactStore, UnitId};
use crate::config::ShakerConfig;
use crate::dependency::DependencyComputer;
use crate::element::NodeId;
use crate::error::{Result, ShakeError, ShakePhase};
use crate::indexer::{IndexedProgram, TopLevelElementIndexer};
use crate::oxc::ast::Program;
use crate::oxc::{Allocator, Parser, ParserReturn, SemanticBuilder};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShakeOutcome {
    /// Unreachable top-level items were removed.
    Shaken,
    /// The input did not parse and was copied verbatim.
    FallbackCopy { reason: String },
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShakeReport {
    /// Total bytes written to the output.
    pub bytes_written: u64,
    pub outcome: ShakeOutcome,
    /// Top-level items emitted.
    pub items_kept: usize,
    /// Top-level items dropped.
    pub items_removed: usize,
    pub elements: usize,
    pub globals: usize,
    pub entry_points: usize,
    /// Qualified names of dropped elements, in source order.
    pub removed: Vec<String>,
}

impl ShakeReport {
    fn fallback(bytes_written: u64, reason: String) -> Self {
        Self {
            bytes_written,
            outcome: ShakeOutcome::FallbackCopy { reason },
            items_kept: 0,
            items_removed: 0,
            elements: 0,
            globals: 0,
            entry_points: 0,
            removed: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ShakeOutcome::FallbackCopy { .. })
    }
}

/// Result of [`TreeShaker::shake_str`].
#[derive(Debug, Clone)]
pub struct ShakeOutput {
    pub code: String,
    pub report: ShakeReport,
}

/// Removes unreachable top-level declarations from generated JavaScript.
///
/// Every run is independent: the element graph, worklist and virtual-name
/// set are built fresh and dropped when the run ends, so one shaker can be
/// reused across units.
///
/// # Example
///
/// ```
/// use husk_shaker::TreeShaker;
///
/// let shaker = TreeShaker::default();
/// let output = shaker
///     .shake_str("function used(){} function unused(){} RunEntry(used);")
///     .unwrap();
/// assert_eq!(output.code, "function used(){}\nRunEntry(used);\n");
/// assert_eq!(output.report.removed, vec!["unused"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeShaker {
    config: ShakerConfig,
}

impl TreeShaker {
    /// Create a shaker after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ShakeError::InvalidConfig`] when a marker name is unusable.
    pub fn new(config: ShakerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ShakerConfig {
        &self.config
    }

    /// Shake the artifact `unit.extension` from `store` into `output`.
    ///
    /// The artifact is opened twice: once to parse it and once to copy the
    /// retained byte ranges. The output is assembled in memory and written
    /// with a single call, so a failed run leaves `output` untouched apart
    /// from what a failing writer itself accepted.
    ///
    /// # Errors
    ///
    /// - [`ShakeError::Io`] when the artifact cannot be read or the output
    ///   cannot be written.
    /// - [`ShakeError::SourceMismatch`] when the second read differs from the
    ///   first.
    ///
    /// # Panics
    ///
    /// Panics on malformed marker calls, see
    /// [`TopLevelElementIndexer::index`].
    pub fn shake(
        &self,
        store: &dyn ArtifactStore,
        unit: &UnitId,
        extension: &str,
        output: &mut dyn Write,
    ) -> Result<ShakeReport> {
        let span = debug_span!("shake", unit = %unit, extension);
        let _guard = span.enter();

        debug!(phase = %ShakePhase::Parsing, "reading input");
        let input = read_artifact(store, unit, extension, ShakePhase::Parsing)?;

        let Ok(source) = std::str::from_utf8(&input) else {
            return fallback_copy(&input, "input is not valid UTF-8".to_string(), output);
        };
        let allocator = Allocator::default();
        let program = match self.parse(&allocator, source) {
            Ok(program) => program,
            Err(reason) => return fallback_copy(&input, reason, output),
        };

        debug!(phase = %ShakePhase::Indexing, "indexing top-level elements");
        let mut indexed = TopLevelElementIndexer::new(&self.config).index(program);

        debug!(phase = %ShakePhase::Traversing, "computing reachable set");
        let reachable = traverse(&mut indexed);

        debug!(phase = %ShakePhase::Reconstructing, reachable = reachable.len(), "copying retained items");
        let reread = read_artifact(store, unit, extension, ShakePhase::Reconstructing)?;
        if reread != input {
            return Err(ShakeError::SourceMismatch {
                parsed: input.len(),
                reread: reread.len(),
            });
        }

        let mut buffer = Vec::with_capacity(reread.len());
        let mut items_kept = 0;
        for (index, item) in indexed.items.iter().enumerate() {
            if !reachable.contains(&NodeId::new(index)) {
                continue;
            }
            let range = item.span.start as usize..item.span.end as usize;
            buffer.extend_from_slice(&reread[range]);
            buffer.push(b'\n');
            items_kept += 1;
        }
        output
            .write_all(&buffer)
            .and_then(|()| output.flush())
            .map_err(ShakeError::io(ShakePhase::Reconstructing))?;

        let report = ShakeReport {
            bytes_written: buffer.len() as u64,
            outcome: ShakeOutcome::Shaken,
            items_kept,
            items_removed: indexed.items.len() - items_kept,
            elements: indexed.graph.len(),
            globals: indexed.globals.len(),
            entry_points: indexed.entry_points.len(),
            removed: removed_elements(&indexed, &reachable),
        };
        debug!(
            phase = %ShakePhase::Done,
            bytes = report.bytes_written,
            kept = report.items_kept,
            removed = report.items_removed,
            "shake finished"
        );
        Ok(report)
    }

    /// Shake source text held in memory.
    ///
    /// # Errors
    ///
    /// Only fails on the conditions [`TreeShaker::shake`] documents; with an
    /// in-memory source and sink that does not happen in practice.
    pub fn shake_str(&self, source: &str) -> Result<ShakeOutput> {
        let unit = UnitId::new("input");
        let store = MemoryArtifactStore::new().with_artifact(unit.clone(), "js", source);
        let mut buffer: Vec<u8> = Vec::new();
        let report = self.shake(&store, &unit, "js", &mut buffer)?;
        Ok(ShakeOutput {
            code: String::from_utf8_lossy(&buffer).into_owned(),
            report,
        })
    }

    /// Index and traverse `source` without producing output.
    ///
    /// Returns `None` when the source does not parse.
    pub fn analyze(&self, source: &str) -> Option<Analysis> {
        let allocator = Allocator::default();
        let program = self.parse(&allocator, source).ok()?;
        let mut indexed = TopLevelElementIndexer::new(&self.config).index(program);
        let reachable = traverse(&mut indexed);
        Some(Analysis::new(&indexed, &reachable))
    }

    /// Parse `source`, returning the reason on failure.
    ///
    /// Any diagnostic counts as a failure: a program the parser had to
    /// recover cannot be sliced back into its original statements safely.
    /// Early errors (`break` outside a loop, duplicate labels, redeclared
    /// `let`, `import` in a script) are only reported by the semantic pass,
    /// so that runs too.
    fn parse<'a>(
        &self,
        allocator: &'a Allocator,
        source: &'a str,
    ) -> std::result::Result<&'a Program<'a>, String> {
        let ParserReturn {
            program,
            errors,
            panicked,
            ..
        } = Parser::new(allocator, source, self.config.source_kind.to_oxc()).parse();

        if let Some(error) = errors.first() {
            return Err(error.to_string());
        }
        if panicked {
            return Err("parser aborted".to_string());
        }

        let program: &'a Program<'a> = allocator.alloc(program);
        let semantic = SemanticBuilder::new()
            .with_check_syntax_error(true)
            .build(program);
        if let Some(error) = semantic.errors.first() {
            return Err(error.to_string());
        }
        Ok(program)
    }
}

fn read_artifact(
    store: &dyn ArtifactStore,
    unit: &UnitId,
    extension: &str,
    phase: ShakePhase,
) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    store
        .open(unit, extension)
        .and_then(|mut reader| reader.read_to_end(&mut bytes))
        .map_err(ShakeError::io(phase))?;
    Ok(bytes)
}

fn fallback_copy(input: &[u8], reason: String, output: &mut dyn Write) -> Result<ShakeReport> {
    warn!(%reason, bytes = input.len(), "input does not parse, copying it unchanged");
    output
        .write_all(input)
        .and_then(|()| output.flush())
        .map_err(ShakeError::io(ShakePhase::FallbackCopy))?;
    Ok(ShakeReport::fallback(input.len() as u64, reason))
}

/// Worklist traversal from globals and entry points to a fixpoint.
///
/// The worklist is a stack. Order only changes which intermediate
/// dependency sets are seen, never the final set: virtual names and
/// instantiation flags only grow.
pub(crate) fn traverse(indexed: &mut IndexedProgram<'_, '_>) -> FxHashSet<NodeId> {
    let mut worklist: Vec<NodeId> = indexed
        .globals
        .iter()
        .chain(&indexed.entry_points)
        .copied()
        .collect();
    let mut processed = FxHashSet::default();
    let items = &indexed.items;
    let mut computer = DependencyComputer::new(&mut indexed.graph);

    while let Some(node) = worklist.pop() {
        if !processed.insert(node) {
            continue;
        }
        let Some(statement) = items[node.index()].statement else {
            continue;
        };
        let dependencies = computer.compute(statement);
        trace!(node = node.index(), dependencies = dependencies.len(), "processed");

        let graph = computer.graph();
        for id in dependencies {
            let element = &graph[id];
            for next in [element.node(), element.inherits_decl()].into_iter().flatten() {
                if !processed.contains(&next) {
                    worklist.push(next);
                }
            }
        }
    }

    processed
}

fn removed_elements(indexed: &IndexedProgram<'_, '_>, reachable: &FxHashSet<NodeId>) -> Vec<String> {
    let mut removed: Vec<_> = indexed
        .graph
        .iter()
        .filter_map(|(_, element)| {
            let node = element.node()?;
            (!reachable.contains(&node)).then_some((node, element.qualified_name().to_string()))
        })
        .collect();
    removed.sort_by_key(|(node, _)| *node);
    removed.into_iter().map(|(_, name)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Returns different contents on every open.
    struct ChangingStore {
        opened: std::cell::Cell<usize>,
    }

    impl ArtifactStore for ChangingStore {
        fn open(&self, _unit: &UnitId, _extension: &str) -> io::Result<Box<dyn Read + '_>> {
            let count = self.opened.get();
            self.opened.set(count + 1);
            let text = if count == 0 { "x = 1;" } else { "x = 22;" };
            Ok(Box::new(text.as_bytes()))
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let err = TreeShaker::new(ShakerConfig::default().with_entry_marker("a-b")).unwrap_err();
        assert!(matches!(err, ShakeError::InvalidConfig(_)));
    }

    #[test]
    fn write_failure_is_fatal() {
        let store = MemoryArtifactStore::new().with_artifact("app", "js", "console.log(1);");
        let err = TreeShaker::default()
            .shake(&store, &UnitId::new("app"), "js", &mut FailingWriter)
            .unwrap_err();
        assert_eq!(err.phase(), Some(ShakePhase::Reconstructing));
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let store = MemoryArtifactStore::new();
        let err = TreeShaker::default()
            .shake(&store, &UnitId::new("app"), "js", &mut Vec::<u8>::new())
            .unwrap_err();
        assert_eq!(err.phase(), Some(ShakePhase::Parsing));
    }

    #[test]
    fn changed_input_is_not_reconstructed() {
        let store = ChangingStore {
            opened: std::cell::Cell::new(0),
        };
        let mut output: Vec<u8> = Vec::new();
        let err = TreeShaker::default()
            .shake(&store, &UnitId::new("app"), "js", &mut output)
            .unwrap_err();
        assert!(matches!(
            err,
            ShakeError::SourceMismatch {
                parsed: 6,
                reread: 7
            }
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn non_utf8_input_is_copied() {
        let bytes = vec![b'x', b'=', 0xff, b';'];
        let store = MemoryArtifactStore::new().with_artifact("app", "js", bytes.clone());
        let mut output: Vec<u8> = Vec::new();
        let report = TreeShaker::default()
            .shake(&store, &UnitId::new("app"), "js", &mut output)
            .unwrap();
        assert!(report.is_fallback());
        assert_eq!(output, bytes);
        assert_eq!(report.bytes_written, 4);
    }

    #[test]
    fn report_counts_items() {
        let output = TreeShaker::default()
            .shake_str(
                "\"use strict\";
                 function A(){}
                 A.prototype.run = function(){};
                 function B(){}
                 RunEntry(A);",
            )
            .unwrap();
        let report = output.report;
        assert_eq!(report.outcome, ShakeOutcome::Shaken);
        assert_eq!(report.items_kept, 3);
        assert_eq!(report.items_removed, 2);
        assert_eq!(report.elements, 3);
        assert_eq!(report.globals, 1);
        assert_eq!(report.entry_points, 1);
        assert_eq!(report.removed, vec!["A.prototype.run", "B"]);
        assert_eq!(report.bytes_written, output.code.len() as u64);
    }

    #[test]
    fn report_serializes_outcome_with_tag() {
        let report = ShakeReport::fallback(3, "Unexpected token".to_string());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["kind"], "fallback_copy");
        assert_eq!(json["outcome"]["reason"], "Unexpected token");
    }
}
