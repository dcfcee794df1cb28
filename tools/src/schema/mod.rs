//! Configuration schema validation
//!
//! Decides whether a YAML configuration document conforms to one of several
//! versioned JSON schemas, tried in priority order.
//!
//! ## Pipeline
//!
//! 1. [`normalize`]: read the YAML file and convert it to a JSON value
//! 2. [`loader`]: fetch each candidate schema by URI scheme (`file`, `https`, ...)
//! 3. [`engine`]: resolve `$ref`s, compile, check the document
//! 4. [`validator`]: loop over [`candidates`], first match wins
//!
//! Normalization failures end the request. Schema fetch, parse and compile
//! failures only rule out one candidate. When nothing matches, the last
//! validation error is reported in preference to infrastructure errors.

pub mod candidates;
pub mod engine;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod validator;

pub use candidates::{
    CandidateList, EmptyCandidateList, InvalidSchemaIdentifier, SchemaCandidate, resolve_identifier,
};
pub use error::SchemaError;
pub use loader::{
    DEFAULT_FETCH_TIMEOUT, FileLoader, HttpLoader, LoaderRegistry, LoaderRegistryBuilder,
    SchemaLoader,
};
pub use validator::{SchemaValidator, ValidationOutcome, ValidatorConfig};
