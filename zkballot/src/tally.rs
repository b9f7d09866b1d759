use crate::group;
use crate::serde_hex::{Hex, PointHex, ScalarHex};
use crate::{BinaryBallot, DlogProof, Error, ValidationError};
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Homomorphic aggregate of a set of accepted ballots:
/// `H = sum h_i` and `Y = sum y_i`, with the ballot count bounding the
/// brute-force count recovery.
#[derive(Debug, Clone)]
pub struct BinaryTally {
    gk: RistrettoPoint,
    h_sum: RistrettoPoint,
    y_sum: RistrettoPoint,
    num_ballots: usize,
}

impl BinaryTally {
    /// Aggregate a ballot collection under the authority key `gk`.
    ///
    /// Every ballot is verified; the first invalid one aborts the
    /// aggregation. Callers holding mixed input partition it first (see
    /// [`partition_ballots`](crate::partition_ballots)).
    pub fn aggregate(
        gk: &RistrettoPoint,
        ballots: &[BinaryBallot],
    ) -> Result<BinaryTally, ValidationError> {
        group::ensure_element(gk)?;

        let mut h_sum = RistrettoPoint::identity();
        let mut y_sum = RistrettoPoint::identity();
        for ballot in ballots {
            ballot.verify()?;
            h_sum += ballot.h;
            y_sum += ballot.y;
        }

        Ok(BinaryTally {
            gk: *gk,
            h_sum,
            y_sum,
            num_ballots: ballots.len(),
        })
    }

    /// Build a tally from an already-maintained running aggregate.
    pub fn from_aggregate(
        gk: &RistrettoPoint,
        h_sum: RistrettoPoint,
        y_sum: RistrettoPoint,
        num_ballots: usize,
    ) -> Result<BinaryTally, Error> {
        group::ensure_element(gk)?;

        Ok(BinaryTally {
            gk: *gk,
            h_sum,
            y_sum,
            num_ballots,
        })
    }

    /// Decrypt the aggregate with the authority secret `k` and certify the
    /// decryption.
    ///
    /// `k` must match the public key the ballots were aggregated under.
    /// The yes-count is recovered from `Y - k*H = count*G` by stepping the
    /// running point one `G` at a time; the search is bounded by the ballot
    /// count, so corrupted input fails hard instead of walking the group.
    pub fn tally<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        k: &Scalar,
        auth_data: &[u8],
    ) -> Result<BinaryTallyResult, ValidationError> {
        if !group::is_in_range(k) {
            return Err(Error::ScalarOutOfRange.into());
        }
        if group::mul_base(k) != self.gk {
            return Err(ValidationError::AuthorityKeyMismatch);
        }

        // X = k*H
        let x = &self.h_sum * k;

        let count = if x == self.y_sum {
            0
        } else {
            // count*G = Y - X
            let target = self.y_sum - x;
            let g = group::basepoint();
            let mut acc = RistrettoPoint::identity();
            let mut count: u64 = 0;
            loop {
                count += 1;
                acc += g;
                if acc == target {
                    break count;
                }
                if count as usize >= self.num_ballots {
                    return Err(ValidationError::CountExceedsBallots);
                }
            }
        };

        let proof = DlogProof::prove(rng, k, &self.h_sum, auth_data)?;

        Ok(BinaryTallyResult {
            count,
            x,
            y: self.y_sum,
            proof,
        })
    }

    pub fn num_ballots(&self) -> usize {
        self.num_ballots
    }
}

/// The outcome of a tally: the recovered yes-count, the aggregate points,
/// and a proof that the decryption used the declared authority secret.
///
/// Immutable once produced; verifiable with no extra state.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryTallyResult {
    pub count: u64,
    pub x: RistrettoPoint,
    pub y: RistrettoPoint,
    pub proof: DlogProof,
}

impl BinaryTallyResult {
    /// Check `count*G + X == Y` and verify the embedded decryption proof,
    /// which must certify exactly the `X` reported here.
    pub fn verify(&self) -> Result<(), ValidationError> {
        group::ensure_element(&self.x)?;
        group::ensure_element(&self.y)?;

        if group::mul_base(&Scalar::from(self.count)) + self.x != self.y {
            return Err(ValidationError::TallyEquationFailed);
        }

        if self.proof.y != self.x {
            return Err(ValidationError::ResultProofMismatch);
        }

        self.proof.verify()
    }

    /// Unpack from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

// Wire form: the embedded proof record omits its statement point, which is
// the top-level `x`; it is re-injected on load.

#[derive(Serialize, Deserialize)]
struct BinaryTallyResultRecord {
    v: u64,
    #[serde(with = "PointHex")]
    x: RistrettoPoint,
    #[serde(with = "PointHex")]
    y: RistrettoPoint,
    proof: CompressedDlogProof,
}

#[derive(Serialize, Deserialize)]
struct CompressedDlogProof {
    #[serde(with = "hex_serde")]
    data: Vec<u8>,
    #[serde(with = "PointHex")]
    h: RistrettoPoint,
    #[serde(with = "PointHex")]
    t: RistrettoPoint,
    #[serde(with = "ScalarHex")]
    r: Scalar,
}

impl Serialize for BinaryTallyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BinaryTallyResultRecord {
            v: self.count,
            x: self.x,
            y: self.y,
            proof: CompressedDlogProof {
                data: self.proof.data.clone(),
                h: self.proof.base,
                t: self.proof.t,
                r: self.proof.r,
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BinaryTallyResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = BinaryTallyResultRecord::deserialize(deserializer)?;

        Ok(BinaryTallyResult {
            count: record.v,
            x: record.x,
            y: record.y,
            proof: DlogProof {
                data: record.proof.data,
                base: record.proof.h,
                y: record.x,
                t: record.proof.t,
                r: record.proof.r,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_rng(seed: u8) -> ChaCha20Rng {
        ChaCha20Rng::from_seed([seed; 32])
    }

    fn ballots_for(
        rng: &mut ChaCha20Rng,
        gk: &RistrettoPoint,
        values: &[bool],
    ) -> Vec<BinaryBallot> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let a = group::random_scalar(rng).unwrap();
                BinaryBallot::new(rng, *value, &a, gk, format!("voter-{}", i).as_bytes()).unwrap()
            })
            .collect()
    }

    #[test]
    fn recovers_the_exact_count() {
        let mut rng = test_rng(40);
        let k = group::random_scalar(&mut rng).unwrap();
        let gk = group::mul_base(&k);

        let ballots = ballots_for(&mut rng, &gk, &[true, false, true, true, false]);
        let tally = BinaryTally::aggregate(&gk, &ballots).unwrap();
        let result = tally.tally(&mut rng, &k, b"authority").unwrap();

        assert_eq!(result.count, 3);
        result.verify().unwrap();
    }

    #[test]
    fn zero_yes_votes_need_no_search() {
        let mut rng = test_rng(41);
        let k = group::random_scalar(&mut rng).unwrap();
        let gk = group::mul_base(&k);

        let ballots = ballots_for(&mut rng, &gk, &[false, false, false]);
        let tally = BinaryTally::aggregate(&gk, &ballots).unwrap();
        let result = tally.tally(&mut rng, &k, b"authority").unwrap();

        assert_eq!(result.count, 0);
        result.verify().unwrap();
    }

    #[test]
    fn all_yes_votes_hit_the_bound_exactly() {
        let mut rng = test_rng(42);
        let k = group::random_scalar(&mut rng).unwrap();
        let gk = group::mul_base(&k);

        let ballots = ballots_for(&mut rng, &gk, &[true, true, true]);
        let tally = BinaryTally::aggregate(&gk, &ballots).unwrap();
        let result = tally.tally(&mut rng, &k, b"authority").unwrap();

        assert_eq!(result.count, 3);
        result.verify().unwrap();
    }

    #[test]
    fn wrong_authority_secret_is_rejected() {
        let mut rng = test_rng(43);
        let k = group::random_scalar(&mut rng).unwrap();
        let gk = group::mul_base(&k);

        let ballots = ballots_for(&mut rng, &gk, &[true, false]);
        let tally = BinaryTally::aggregate(&gk, &ballots).unwrap();

        let other = group::random_scalar(&mut rng).unwrap();
        assert!(matches!(
            tally.tally(&mut rng, &other, b"authority"),
            Err(ValidationError::AuthorityKeyMismatch)
        ));
    }

    #[test]
    fn corrupted_aggregate_aborts_instead_of_walking_the_group() {
        let mut rng = test_rng(44);
        let k = group::random_scalar(&mut rng).unwrap();
        let gk = group::mul_base(&k);

        // An aggregate claiming 2 ballots whose exponent gap is 5.
        let h_sum = group::mul_base(&group::random_scalar(&mut rng).unwrap());
        let y_sum = &h_sum * &k + group::mul_base(&Scalar::from(5u64));
        let tally = BinaryTally::from_aggregate(&gk, h_sum, y_sum, 2).unwrap();

        assert!(matches!(
            tally.tally(&mut rng, &k, b"authority"),
            Err(ValidationError::CountExceedsBallots)
        ));
    }

    #[test]
    fn invalid_ballot_aborts_aggregation() {
        let mut rng = test_rng(45);
        let k = group::random_scalar(&mut rng).unwrap();
        let gk = group::mul_base(&k);

        let mut ballots = ballots_for(&mut rng, &gk, &[true, false, true]);
        ballots[1].proof.r1 += Scalar::one();
        assert!(BinaryTally::aggregate(&gk, &ballots).is_err());
    }

    #[test]
    fn tampered_result_fails_verification() {
        let mut rng = test_rng(46);
        let k = group::random_scalar(&mut rng).unwrap();
        let gk = group::mul_base(&k);

        let ballots = ballots_for(&mut rng, &gk, &[true, true, false]);
        let tally = BinaryTally::aggregate(&gk, &ballots).unwrap();
        let result = tally.tally(&mut rng, &k, b"authority").unwrap();

        let mut wrong_count = result.clone();
        wrong_count.count += 1;
        assert!(matches!(
            wrong_count.verify(),
            Err(ValidationError::TallyEquationFailed)
        ));

        let mut wrong_statement = result.clone();
        wrong_statement.x += group::basepoint();
        wrong_statement.y += group::basepoint();
        assert!(matches!(
            wrong_statement.verify(),
            Err(ValidationError::ResultProofMismatch)
        ));
    }

    #[test]
    fn json_round_trip_is_exact() {
        let mut rng = test_rng(47);
        let k = group::random_scalar(&mut rng).unwrap();
        let gk = group::mul_base(&k);

        let ballots = ballots_for(&mut rng, &gk, &[true, false, false, true]);
        let tally = BinaryTally::aggregate(&gk, &ballots).unwrap();
        let result = tally.tally(&mut rng, &k, b"authority").unwrap();

        let encoded = serde_json::to_vec(&result).unwrap();
        let decoded = BinaryTallyResult::from_json(&encoded).unwrap();
        assert_eq!(result, decoded);
        decoded.verify().unwrap();

        // The embedded proof record carries no copy of the statement point.
        let json: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert!(json["proof"].get("y").is_none());
    }
}
