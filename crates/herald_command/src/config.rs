//! Dispatch policies.

/// What the dispatcher does with a line whose command token matches nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnknownCommandPolicy {
    /// Do nothing.
    #[default]
    Ignore,
    /// Send an `unknown-command` failure to the reporter.
    Report,
}

/// What registration does when a label is already taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AliasCollisionPolicy {
    /// The newest registration owns the label; a warning is logged.
    #[default]
    Overwrite,
    /// Registration fails with an alias collision error.
    Reject,
    /// The existing owner keeps the label.
    KeepFirst,
}

/// Configuration for the command dispatcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Handling of unknown command tokens.
    pub unknown_command: UnknownCommandPolicy,

    /// Handling of label collisions at registration.
    pub alias_collision: AliasCollisionPolicy,
}

impl DispatchConfig {
    /// Creates a configuration that reports unknown commands and rejects
    /// label collisions.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            unknown_command: UnknownCommandPolicy::Report,
            alias_collision: AliasCollisionPolicy::Reject,
        }
    }

    /// Builder method to set the unknown command policy.
    #[must_use]
    pub fn with_unknown_command(mut self, policy: UnknownCommandPolicy) -> Self {
        self.unknown_command = policy;
        self
    }

    /// Builder method to set the alias collision policy.
    #[must_use]
    pub fn with_alias_collision(mut self, policy: AliasCollisionPolicy) -> Self {
        self.alias_collision = policy;
        self
    }
}
