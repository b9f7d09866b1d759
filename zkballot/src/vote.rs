use crate::group;
use crate::{Ballot, BinaryBallot, BinaryTally, BinaryTallyResult, ValidationError};
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use indexmap::IndexMap;
use rand_core::{CryptoRng, RngCore};

/// A single yes/no voting session.
///
/// Holds the accepted ballots keyed by voter digest and the running
/// homomorphic aggregate, enforces the participation bounds, and runs the
/// tally exactly once. Two logical states: open (no result yet) and closed
/// (result produced, immutable thereafter).
///
/// All mutation goes through `&mut self`, so casts are serialized against
/// each other and against the tally by construction; the finalized result
/// can be read concurrently once the session is closed.
pub struct BinaryVote {
    gk: RistrettoPoint,
    auth_digest: [u8; 32],

    min_voters: usize,
    max_voters: usize,

    ballots: IndexMap<[u8; 32], BinaryBallot>,

    h_sum: RistrettoPoint,
    y_sum: RistrettoPoint,

    result: Option<BinaryTallyResult>,
}

impl BinaryVote {
    /// Open a session under the authority key `gk`, bound to the authority's
    /// address and accepting between `min_voters` and `max_voters` voters.
    pub fn new(
        min_voters: usize,
        max_voters: usize,
        gk: &RistrettoPoint,
        auth_addr: &[u8],
    ) -> Result<BinaryVote, ValidationError> {
        group::ensure_element(gk)?;
        if max_voters == 0 || min_voters > max_voters {
            return Err(ValidationError::InvalidVoterBounds);
        }

        Ok(BinaryVote {
            gk: *gk,
            auth_digest: group::id_digest(auth_addr),
            min_voters,
            max_voters,
            ballots: IndexMap::new(),
            h_sum: RistrettoPoint::identity(),
            y_sum: RistrettoPoint::identity(),
            result: None,
        })
    }

    /// Cast a ballot for the voter identified by `voter_addr`.
    ///
    /// A later cast for the same voter replaces the earlier one: the old
    /// ballot's contribution is subtracted from the running aggregate before
    /// the new one is added. Every cast re-verifies its ballot, and all
    /// checks run before the aggregate is touched, so a rejected cast leaves
    /// no partial state behind.
    pub fn cast(&mut self, ballot: Ballot, voter_addr: &[u8]) -> Result<(), ValidationError> {
        if self.result.is_some() {
            return Err(ValidationError::VoteClosed);
        }

        let ballot = ballot
            .into_binary()
            .ok_or(ValidationError::MismatchedBallotKind)?;
        ballot.verify()?;

        let digest = group::id_digest(voter_addr);
        if let Some(old) = self.ballots.get(&digest) {
            let (old_h, old_y) = (old.h, old.y);
            self.h_sum -= old_h;
            self.y_sum -= old_y;
        } else if self.ballots.len() >= self.max_voters {
            return Err(ValidationError::VoterCapacityReached);
        }

        self.h_sum += ballot.h;
        self.y_sum += ballot.y;
        self.ballots.insert(digest, ballot);

        Ok(())
    }

    /// Tally the session with the authority secret `k` and close it.
    ///
    /// The brute-force bound is the number of ballots accepted at this
    /// moment, which is exactly the number contributing to the aggregate
    /// snapshot being decrypted.
    pub fn tally<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
        k: &Scalar,
    ) -> Result<(), ValidationError> {
        if self.result.is_some() {
            return Err(ValidationError::VoteClosed);
        }
        if self.ballots.len() < self.min_voters {
            return Err(ValidationError::MinVotersNotMet);
        }

        let snapshot =
            BinaryTally::from_aggregate(&self.gk, self.h_sum, self.y_sum, self.ballots.len())?;
        let result = snapshot.tally(rng, k, &self.auth_digest)?;

        self.result = Some(result);
        Ok(())
    }

    /// Verify the stored tally result.
    pub fn verify_tally(&self) -> Result<(), ValidationError> {
        match &self.result {
            Some(result) => result.verify(),
            None => Err(ValidationError::NoTallyResult),
        }
    }

    pub fn authority_public_key(&self) -> RistrettoPoint {
        self.gk
    }

    /// Number of currently accepted ballots (replacements do not add).
    pub fn num_ballots(&self) -> usize {
        self.ballots.len()
    }

    /// The currently accepted ballot for a voter, if any.
    pub fn ballot_for(&self, voter_addr: &[u8]) -> Option<&BinaryBallot> {
        self.ballots.get(&group::id_digest(voter_addr))
    }

    /// The running aggregate `(H, Y)`.
    pub fn current_aggregate(&self) -> (RistrettoPoint, RistrettoPoint) {
        (self.h_sum, self.y_sum)
    }

    pub fn tally_result(&self) -> Option<&BinaryTallyResult> {
        self.result.as_ref()
    }
}
