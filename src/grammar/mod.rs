pub mod eliminate_left_recursion;
pub mod error;
pub mod grammar;
pub mod left_factoring;
pub mod ll1_parsing_table;
pub mod nullable_first_follow;
pub mod parse;
pub mod pipeline;
pub mod pretty_print;
pub use grammar::Grammar;

pub const EPSILON: &str = "ε";
pub const END_MARK: &str = "$";
