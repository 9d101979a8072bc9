pub mod helpers;

pub use helpers::{to_dash_case, to_dash_case_split_on, to_identifier_case};
