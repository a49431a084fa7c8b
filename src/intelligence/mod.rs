pub mod engine;
pub mod evaluate;
pub mod extract;
pub mod messages;
pub mod organize;
pub mod range;
pub mod registry;
pub mod rules;
pub mod types;

pub use engine::DefaultLabInterpreter;
pub use evaluate::{evaluate, evaluate_with};
pub use extract::{extract, try_extract, ExtractionError, RawRecord};
pub use organize::organize;
pub use range::{Judgment, RangeSpec};
pub use types::{Interpretation, LabInterpreter};
