pub mod detector;
pub mod machine;
pub mod mealplan;

pub use detector::DetectorFlow;
pub use machine::{FlowState, RequestFlow};
pub use mealplan::MealplanFlow;
