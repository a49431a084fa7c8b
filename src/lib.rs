//! Labwise: lab result interpretation and decision support.
//!
//! A stored test record goes through two stages, each callable on its own:
//! [`organize`] resolves every registered field into a per-category report
//! structure, and [`evaluate`] runs the clinical rule table over that
//! structure to produce ranked recommendations.

pub mod config;
pub mod intelligence;
pub mod models;

pub use config::{EngineConfig, PatternMode};
pub use intelligence::{
    evaluate, evaluate_with, extract, organize, DefaultLabInterpreter, Interpretation,
    LabInterpreter, RawRecord,
};
pub use models::{
    Category, FieldDefinition, LabValue, OrganizedResult, Recommendation, Severity,
};

use tracing_subscriber::EnvFilter;

/// Install a global tracing subscriber for hosts that do not bring their own.
/// Honors `RUST_LOG`, otherwise [`config::default_log_filter`]. Later calls are no-ops.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} v{} logging initialized", config::APP_NAME, config::APP_VERSION);
    }
}
