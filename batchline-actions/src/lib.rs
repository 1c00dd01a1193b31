//! Batchline Actions
//!
//! Compiles a task's localization requirements into the ordered list of
//! container steps submitted to the remote batch service.
//!
//! Every function here is a pure transformation of its inputs. The only
//! failure is an input whose scheme no strategy can localize, which aborts
//! construction of the whole list.

pub mod config;
pub mod delocalization;
pub mod error;
pub mod localization;
pub mod params;
pub mod pipeline;
pub mod shell;
pub mod singleton;
pub mod timestamp;

pub use config::TransferConfig;
pub use delocalization::build_delocalization_actions;
pub use error::{BuildError, Result};
pub use localization::build_localization_actions;
pub use params::{CloudPath, ContainerPath, FileInput, TaskParameters};
pub use pipeline::{PipelineBuilder, build_user_action};
pub use singleton::{DrsStrategy, HttpStrategy, SingletonStrategy, StrategyRegistry};
pub use timestamp::annotate_timestamped_actions;
