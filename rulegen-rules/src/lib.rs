//! Rule authoring model for the rulegen workspace.
//!
//! A rule is a header (`id`, `level`, optional `frequency`/`timeframe`) plus
//! an ordered list of typed conditions. Conditions are edited through
//! [`ConditionModel`] and rendered into the engine's XML dialect by
//! [`serialize`]. Rendering is total: malformed input produces malformed
//! output rather than an error. [`lint`] and [`validate`] are an optional
//! layer on top.

mod attributes;
mod condition;
mod error;
mod lint;
mod model;
mod rule;
mod serializer;
mod tag;

pub use attributes::{is_default_value, AttributeBag};
pub use condition::{Condition, ConditionId, ConditionPatch};
pub use error::RuleError;
pub use lint::{lint, lint_with, validate, LintRule, LintWarning, Severity};
pub use model::ConditionModel;
pub use rule::{RuleDraft, RuleHeader, MAX_LEVEL, MIN_LEVEL};
pub use serializer::{serialize, serialize_with, Escape, SerializeOptions};
pub use tag::{AttributeKey, RenderClass, RuleTag, MATCH_TYPES, NEGATE_VALUES};
