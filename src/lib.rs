pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod eval;
pub mod export;
pub mod expr;
pub mod print;
pub mod schema;
pub mod utils;
pub mod value;

pub use config::Configuration;
pub use context::EvalContext;
pub use document::Body;
pub use error::ConfigError;
pub use eval::{build_configuration_tree, Evaluator, Pass};
pub use print::{print_tree, render_tree};
pub use schema::{BlockKind, BodySchema, SchemaRegistry};
pub use value::Value;
