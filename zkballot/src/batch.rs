//! Batch operations consumed by the CLI and other orchestration layers:
//! generate ballots from a batch specification, partition a collection into
//! accepted and rejected ballots, and run a whole tally in one call.

use crate::group;
use crate::serde_hex::{Hex, PointHex, ScalarHex};
use crate::{BinaryBallot, BinaryTally, BinaryTallyResult, Error, ValidationError};
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, RngCore};

/// One voter's entry in a ballot-generation batch.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BallotRequest {
    /// The voter's secret scalar.
    #[serde(rename = "a", with = "ScalarHex")]
    pub secret: Scalar,

    /// The voter's identity bytes; the ballot proof is bound to them.
    #[serde(rename = "address", with = "hex_serde")]
    pub voter: Vec<u8>,

    /// The bit being cast.
    #[serde(rename = "v")]
    pub value: bool,
}

/// Batch specification: the authority public key plus per-voter entries.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BallotBatch {
    #[serde(rename = "gk", with = "PointHex")]
    pub authority_public: RistrettoPoint,

    pub requests: Vec<BallotRequest>,
}

/// The authority-side inputs to a batch tally.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TallyAuthority {
    #[serde(rename = "k", with = "ScalarHex")]
    pub secret: Scalar,

    /// The authority's identity bytes; the decryption proof is bound to
    /// their digest.
    #[serde(with = "hex_serde")]
    pub address: Vec<u8>,
}

/// Generate one ballot per request, each bound to its voter's identity.
///
/// Any structural problem in the batch (bad authority key, out-of-range
/// secret) aborts the whole run.
pub fn generate_ballots<R: RngCore + CryptoRng>(
    rng: &mut R,
    batch: &BallotBatch,
) -> Result<Vec<BinaryBallot>, Error> {
    group::ensure_element(&batch.authority_public)?;

    batch
        .requests
        .iter()
        .map(|request| {
            BinaryBallot::new(
                rng,
                request.value,
                &request.secret,
                &batch.authority_public,
                &request.voter,
            )
        })
        .collect()
}

/// Verify a ballot collection, splitting it into the accepted ballots and
/// the binding values of the rejected ones.
///
/// Rejection covers both structurally broken and cryptographically false
/// ballots; neither aborts the partition.
pub fn partition_ballots(ballots: Vec<BinaryBallot>) -> (Vec<BinaryBallot>, Vec<Vec<u8>>) {
    let mut accepted = Vec::with_capacity(ballots.len());
    let mut rejected = Vec::new();

    for ballot in ballots {
        match ballot.verify() {
            Ok(()) => accepted.push(ballot),
            Err(_) => rejected.push(ballot.binding_data().to_vec()),
        }
    }

    (accepted, rejected)
}

/// Partition, aggregate and decrypt a ballot collection in one call.
///
/// Returns the tally result plus the binding values of the rejected
/// ballots. The authority secret being out of range is a structural error
/// that aborts the whole batch.
pub fn run_tally<R: RngCore + CryptoRng>(
    rng: &mut R,
    authority: &TallyAuthority,
    ballots: Vec<BinaryBallot>,
) -> Result<(BinaryTallyResult, Vec<Vec<u8>>), ValidationError> {
    if !group::is_in_range(&authority.secret) {
        return Err(Error::ScalarOutOfRange.into());
    }
    let gk = group::mul_base(&authority.secret);

    let (accepted, rejected) = partition_ballots(ballots);
    let tally = BinaryTally::aggregate(&gk, &accepted)?;
    let result = tally.tally(rng, &authority.secret, &group::id_digest(&authority.address))?;

    Ok((result, rejected))
}
