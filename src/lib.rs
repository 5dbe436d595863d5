pub mod config;
pub mod document;
pub mod error;
pub mod grammar;
pub mod grouper;
pub mod hashing;
pub mod highlight;
pub mod language;
pub mod locator;
pub mod parser;
pub mod planner;
pub mod selector;
pub mod session;
pub mod state;
pub mod statement;

pub use error::{LogbossError, Result};
pub use locator::{DetectionPolicy, Locator, MethodFilter, locate};
pub use statement::{SourceLocation, Statement, StatementKind};
