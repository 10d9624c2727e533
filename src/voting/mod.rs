pub mod ranked;
pub mod validate;

pub use ranked::calculate_results;
pub use validate::validate_ballot;
