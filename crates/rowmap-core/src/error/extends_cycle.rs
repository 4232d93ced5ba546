use super::Error;

/// Error when result maps inherit from each other in a loop.
#[derive(Debug)]
pub(super) struct ExtendsCycleError {
    chain: Vec<String>,
}

impl std::error::Error for ExtendsCycleError {}

impl core::fmt::Display for ExtendsCycleError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "result map inheritance cycle: {}", self.chain.join(" -> "))
    }
}

impl Error {
    /// Creates an extends cycle error. `chain` lists the result map ids in
    /// inheritance order, starting and ending with the same id.
    pub fn extends_cycle(chain: Vec<String>) -> Error {
        Error::from(super::ErrorKind::ExtendsCycle(ExtendsCycleError { chain }))
    }

    /// Returns `true` if this error is an extends cycle error.
    pub fn is_extends_cycle(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::ExtendsCycle(_))
    }
}
