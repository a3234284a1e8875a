/// Errors raised by match-result containers
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A raw scan id already has an MSP-based result in the container
    #[error("Raw scan {0} already has an MSP-based match result")]
    DuplicateMspKey(usize),
}
