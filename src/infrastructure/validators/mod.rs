//! Parsing of collaborator replies into domain values

pub mod structured_output;

pub use structured_output::{
    parse_problem_config, parse_verification_report, strip_markdown_code_blocks,
};
