//! # husk-shaker
//!
//! Reachability-based removal of unreferenced top-level declarations from
//! generated JavaScript.
//!
//! The input is the flattened output of a code generator: one program where
//! every class, method and helper of an application sits at the top level.
//! Most of it is never used. The shaker keeps only what is reachable from
//! the program's globals and entry-point calls and drops everything else,
//! statement by statement, without rewriting what it keeps.
//!
//! ## Overview
//!
//! ```text
//! ┌──────────┐   ┌──────────────────────┐   ┌──────────────────────┐
//! │  Parser  │──▶│ TopLevelElementIndexer│──▶│ ElementGraph          │
//! │  (oxc)   │   │ (one pass, top level) │   │ globals, entry points │
//! └──────────┘   └──────────────────────┘   └──────────┬───────────┘
//!                                                      │
//!                                                      ▼
//!                ┌──────────────────────┐   ┌──────────────────────┐
//!                │ Reconstruction       │◀──│ Worklist traversal    │
//!                │ (byte-range copy)    │   │ + DependencyComputer  │
//!                └──────────────────────┘   └──────────────────────┘
//! ```
//!
//! - **Elements** are named top-level constructs: function and class
//!   declarations, static members (`B.create = …`), prototype members
//!   (`A.prototype.run = …`, *virtual*) and variable statements.
//! - **Globals** are every other top-level statement. They are always kept.
//! - **Entry points** are top-level calls to the entry marker
//!   (`RunEntry(main)` by default).
//!
//! A prototype member is only kept when its name is referenced somewhere
//! reachable *and* its type is instantiated with `new`. Inheritance between
//! types is declared with the inheritance marker (`$inherits(Sub, Super)`).
//!
//! ## Quick Start
//!
//! ```rust
//! use husk_shaker::{ShakeOutcome, TreeShaker};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = r#"
//! function Greeter(){}
//! Greeter.prototype.greet = function(){ return "hi"; };
//! Greeter.prototype.unused = function(){};
//! function main(){ new Greeter().greet(); }
//! RunEntry(main);
//! "#;
//!
//! let output = TreeShaker::default().shake_str(source)?;
//! assert_eq!(output.report.outcome, ShakeOutcome::Shaken);
//! assert!(!output.code.contains("unused"));
//! # Ok(())
//! # }
//! ```
//!
//! Input that does not parse is copied unchanged and reported as
//! [`ShakeOutcome::FallbackCopy`]; it is never an error.
//!
//! ## Artifacts
//!
//! [`TreeShaker::shake`] reads its input through an [`ArtifactStore`] keyed by
//! a [`UnitId`] and an extension, and writes to any [`std::io::Write`].
//! [`FsArtifactStore`] and [`MemoryArtifactStore`] cover files on disk and
//! in-memory sources.

pub mod oxc {
    //! OXC types used by this crate, re-exported so callers and tests use the
    //! same versions.

    /// Re-export allocator - required for all OXC AST operations
    pub use oxc_allocator::Allocator;

    /// Re-export AST types
    pub use oxc_ast::ast;

    /// Re-export AST visitor trait
    pub use oxc_ast_visit::Visit;

    /// Re-export span types for source location tracking
    pub use oxc_span::{GetSpan, SourceType, Span};

    /// Re-export parser
    pub use oxc_parser::{Parser, ParserReturn};

    /// Re-export scope flags passed to function visitors
    pub use oxc_semantic::ScopeFlags;

    /// Re-export semantic builder used to surface early errors
    pub use oxc_semantic::SemanticBuilder;
}

pub mod analysis;
pub mod artifact;
pub mod config;
pub mod dependency;
pub mod element;
pub mod error;
pub mod indexer;
mod path;
mod scope;
pub mod shaker;

pub use analysis::{Analysis, ElementSummary};
pub use artifact::{ArtifactStore, FsArtifactStore, MemoryArtifactStore, UnitId};
pub use config::{
    DEFAULT_ENTRY_MARKER, DEFAULT_INHERITS_MARKER, IdentifierError, ShakerConfig, SourceKind,
    check_identifier,
};
pub use dependency::{Dependencies, DependencyComputer};
pub use element::{ElementGraph, ElementId, JavascriptElement, JavascriptElementBuilder, NodeId};
pub use error::{Result, ShakeError, ShakePhase};
pub use indexer::{IndexedProgram, TopLevelElementIndexer, TopLevelItem};
pub use shaker::{ShakeOutcome, ShakeOutput, ShakeReport, TreeShaker};
