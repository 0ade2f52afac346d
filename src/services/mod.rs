pub mod matcher;
pub mod pattern_compiler;
pub mod query_validator;

pub use matcher::{matches, QueryMatcher};
pub use pattern_compiler::{
    compile_pattern, expand_shortcuts, CompiledPattern, MatchSpan, PatternError,
};
pub use query_validator::QueryValidator;
