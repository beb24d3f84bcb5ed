//! Per-tier decisions about which failures end a candidate chain.

use serde::{Deserialize, Serialize};
use ukiyo_error::FailureClass;

/// What the chain does after a candidate fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureAction {
    /// Stop and report this failure
    Abort,
    /// Log at warn and try the next candidate
    Skip,
    /// Log at debug and try the next candidate
    SkipQuietly,
}

/// Maps each [`FailureClass`] to a [`FailureAction`].
///
/// The default aborts on credential failures, silently skips unknown models
/// and skips everything else with a warning.
///
/// # Examples
///
/// ```
/// use ukiyo_error::FailureClass;
/// use ukiyo_models::{FailureAction, FailurePolicy};
///
/// let policy = FailurePolicy::default();
/// assert_eq!(policy.action(FailureClass::Credential), FailureAction::Abort);
/// assert_eq!(policy.action(FailureClass::NotFound), FailureAction::SkipQuietly);
///
/// let lenient = FailurePolicy::default().with_credential(FailureAction::Skip);
/// assert_eq!(lenient.action(FailureClass::Credential), FailureAction::Skip);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePolicy {
    credential: FailureAction,
    not_found: FailureAction,
    transient: FailureAction,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self {
            credential: FailureAction::Abort,
            not_found: FailureAction::SkipQuietly,
            transient: FailureAction::Skip,
        }
    }
}

impl FailurePolicy {
    /// Action for a failure class.
    pub fn action(&self, class: FailureClass) -> FailureAction {
        match class {
            FailureClass::Credential => self.credential,
            FailureClass::NotFound => self.not_found,
            FailureClass::Transient => self.transient,
        }
    }

    /// Override the action for credential failures.
    pub fn with_credential(mut self, action: FailureAction) -> Self {
        self.credential = action;
        self
    }

    /// Override the action for unknown models.
    pub fn with_not_found(mut self, action: FailureAction) -> Self {
        self.not_found = action;
        self
    }

    /// Override the action for transient failures.
    pub fn with_transient(mut self, action: FailureAction) -> Self {
        self.transient = action;
        self
    }
}
