//! Feature preparation for the prediction path.
//!
//! - categorical fields → one-hot indicators (`one_hot`)
//! - alignment to the trained columns (`align`)
//! - weather column scaling (`scaler`)
//! - the dormant label encoder artifact (`label`)

pub mod align;
pub mod label;
pub mod one_hot;
pub mod scaler;

pub use align::reconcile;
pub use label::LabelEncoder;
pub use one_hot::expand;
pub use scaler::Scaler;
