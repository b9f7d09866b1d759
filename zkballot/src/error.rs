use thiserror::Error;

/// Structural errors: the input is malformed before any cryptographic
/// statement can even be evaluated (bad encodings, out-of-range values,
/// entropy failure). Never raised for a well-formed-but-false proof.
#[derive(Debug, Error)]
pub enum Error {
    #[error("zkballot: invalid point encoding - not a group element")]
    InvalidPoint,

    #[error("zkballot: scalar out of range")]
    ScalarOutOfRange,

    #[error("zkballot: JSON error deserializing record: {0}")]
    JSONDeserialization(#[from] serde_json::Error),

    #[error("zkballot: entropy source failure: {0}")]
    EntropyFailure(#[from] rand_core::Error),
}

/// Validation errors: either a structural error surfaced while checking a
/// statement, a cryptographically false statement, or a protocol-bound
/// violation. The `Structural` variant keeps the two classes separable so
/// callers can tell "this ballot is garbage" from "this ballot is lying".
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0}")]
    Structural(#[from] Error),

    #[error("zkballot validation: challenge shares do not sum to the transcript hash")]
    ChallengeSumMismatch,

    #[error("zkballot validation: branch {0} commitments do not match the transcript")]
    BranchCommitmentMismatch(u8),

    #[error("zkballot validation: discrete-log proof equation failed")]
    DlogEquationFailed,

    #[error("zkballot validation: ballot does not match its embedded proof")]
    ProofBindingMismatch,

    #[error("zkballot validation: tally proof does not certify the aggregate decryption")]
    ResultProofMismatch,

    #[error("zkballot validation: aggregate does not match the recovered count")]
    TallyEquationFailed,

    #[error("zkballot validation: authority secret does not match the declared public key")]
    AuthorityKeyMismatch,

    #[error("zkballot validation: recovered count exceeds the number of ballots")]
    CountExceedsBallots,

    #[error("zkballot validation: maximum number of voters reached")]
    VoterCapacityReached,

    #[error("zkballot validation: minimum number of voters not reached")]
    MinVotersNotMet,

    #[error("zkballot validation: tally already produced")]
    VoteClosed,

    #[error("zkballot validation: no tally result")]
    NoTallyResult,

    #[error("zkballot validation: invalid voter bounds")]
    InvalidVoterBounds,

    #[error("zkballot validation: mismatched ballot kind")]
    MismatchedBallotKind,
}

impl ValidationError {
    /// True when the failure is a malformed input rather than a false statement.
    pub fn is_structural(&self) -> bool {
        matches!(self, ValidationError::Structural(_))
    }
}
