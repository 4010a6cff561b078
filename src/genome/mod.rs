//! Genome — trait definitions (loci) and their live parameters.
//!
//! ```text
//! GenomeDef (YAML / JSON)
//!   ↓  validate + build rules
//! GenomeStore { loci, defaults }  +  RuleMatrix
//! ```
//!
//! Two definitions can be bred into a third with [`recombine`].

pub mod definition;
pub mod inspector;
pub mod locus;
pub mod recombinator;
pub mod store;
pub mod validator;

pub use definition::{GenomeDef, GenomeMetadata, BUILTIN_GENOME_YAML};
pub use locus::{CategoryWeights, Distribution, Locus, RangeValues, StanceRole};
pub use recombinator::{recombine, Recombinator, DEFAULT_SAFETY_ANCHORS};
pub use store::{GenomeStore, SetDefaultOutcome};
pub use validator::{validate, Severity, ValidationIssue};
