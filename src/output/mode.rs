use crate::error::ConvertError;

/// What an invocation does with its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Validate against the expected tree and fail on any finding.
    #[default]
    Check,
    /// Overwrite the expected tree with the actual output. Human-supervised only.
    Recharacterize,
}

impl RunMode {
    /// Resolve the mode from explicit caller flags.
    ///
    /// Requesting both is a [`ConvertError::ModeConflict`]; requesting neither
    /// means [`RunMode::Check`].
    pub fn resolve(check: bool, recharacterize: bool) -> Result<Self, ConvertError> {
        match (check, recharacterize) {
            (true, true) => Err(ConvertError::ModeConflict),
            (false, true) => Ok(RunMode::Recharacterize),
            _ => Ok(RunMode::Check),
        }
    }

    pub fn is_check(self) -> bool {
        self == RunMode::Check
    }
}
