// Prove v in {0, 1} given h = a*G and y = a*GK + v*G, where
//   a  - the voter's secret
//   GK - the authority's public key
//
// Standard OR-composition: the branch matching the real value runs an honest
// sigma-protocol first move, the other branch is simulated by sampling its
// challenge share and response and deriving the commitments they would have
// produced. A single Fiat-Shamir challenge ties the two shares together, so
// at most one branch can be simulated.

use crate::group;
use crate::serde_hex::{Hex, PointHex, ScalarHex};
use crate::{Error, ValidationError};
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::MultiscalarMul;
use rand_core::{CryptoRng, RngCore};

/// Disjunctive proof transcript. Branch 1 claims `y = a*GK` (a "no" vote),
/// branch 2 claims `y - G = a*GK` (a "yes" vote); the transcript does not
/// reveal which branch was real.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BinaryProof {
    /// Auxiliary binding value, e.g. a digest of the voter's identity.
    /// Makes the transcript non-malleable across voters.
    #[serde(with = "hex_serde")]
    pub data: Vec<u8>,

    /// The voter's public commitment `h = a*G`.
    #[serde(with = "PointHex")]
    pub h: RistrettoPoint,

    /// The authority public key the vote is encrypted under.
    #[serde(with = "PointHex")]
    pub gk: RistrettoPoint,

    /// The encrypted vote `y = a*GK + v*G`.
    #[serde(with = "PointHex")]
    pub y: RistrettoPoint,

    #[serde(with = "ScalarHex")]
    pub d1: Scalar,
    #[serde(with = "ScalarHex")]
    pub d2: Scalar,
    #[serde(with = "ScalarHex")]
    pub r1: Scalar,
    #[serde(with = "ScalarHex")]
    pub r2: Scalar,

    #[serde(with = "PointHex")]
    pub a1: RistrettoPoint,
    #[serde(with = "PointHex")]
    pub b1: RistrettoPoint,
    #[serde(with = "PointHex")]
    pub a2: RistrettoPoint,
    #[serde(with = "PointHex")]
    pub b2: RistrettoPoint,
}

impl BinaryProof {
    /// Prove that the vote encrypted under `gk` with the secret `a` is a bit,
    /// binding the transcript to `data`.
    pub fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        value: bool,
        a: &Scalar,
        gk: &RistrettoPoint,
        data: &[u8],
    ) -> Result<BinaryProof, Error> {
        group::ensure_element(gk)?;
        if !group::is_in_range(a) {
            return Err(Error::ScalarOutOfRange);
        }

        let g = group::basepoint();
        let h = group::mul_base(a);

        // y = a*GK, plus G iff the vote is "yes"
        let mut y = gk * a;
        if value {
            y += g;
        }

        // Honest first move, shared by whichever branch is real.
        let w = group::random_scalar(rng)?;
        let commit_a = group::mul_base(&w);
        let commit_b = gk * &w;

        let (d1, r1, a1, b1, d2, r2, a2, b2);
        if !value {
            // Branch 1 is real; simulate branch 2 against y - G.
            let sim_d = group::random_scalar(rng)?;
            let sim_r = group::random_scalar(rng)?;
            a2 = RistrettoPoint::multiscalar_mul(&[sim_r, sim_d], &[g, h]);
            b2 = RistrettoPoint::multiscalar_mul(&[sim_r, sim_d], &[*gk, y - g]);
            a1 = commit_a;
            b1 = commit_b;

            let c = group::hash_to_scalar(data, &[&h, &y, &a1, &b1, &a2, &b2]);
            d2 = sim_d;
            r2 = sim_r;
            d1 = c - d2;
            r1 = w - d1 * a;
        } else {
            // Branch 2 is real; simulate branch 1 against y.
            let sim_d = group::random_scalar(rng)?;
            let sim_r = group::random_scalar(rng)?;
            a1 = RistrettoPoint::multiscalar_mul(&[sim_r, sim_d], &[g, h]);
            b1 = RistrettoPoint::multiscalar_mul(&[sim_r, sim_d], &[*gk, y]);
            a2 = commit_a;
            b2 = commit_b;

            let c = group::hash_to_scalar(data, &[&h, &y, &a1, &b1, &a2, &b2]);
            d1 = sim_d;
            r1 = sim_r;
            d2 = c - d1;
            r2 = w - d2 * a;
        }

        Ok(BinaryProof {
            data: data.to_vec(),
            h,
            gk: *gk,
            y,
            d1,
            d2,
            r1,
            r2,
            a1,
            b1,
            a2,
            b2,
        })
    }

    fn validate(&self) -> Result<(), Error> {
        for scalar in &[self.d1, self.d2, self.r1, self.r2] {
            if !group::is_in_range(scalar) {
                return Err(Error::ScalarOutOfRange);
            }
        }
        for point in &[
            self.h, self.gk, self.y, self.a1, self.b1, self.a2, self.b2,
        ] {
            group::ensure_element(point)?;
        }
        Ok(())
    }

    /// Verify the transcript.
    ///
    /// Malformed transcripts surface as structural errors; a well-formed but
    /// false transcript fails the challenge-share sum or one of the four
    /// branch commitment re-derivations.
    pub fn verify(&self) -> Result<(), ValidationError> {
        self.validate()?;

        let g = group::basepoint();

        // d1 + d2 == H(data, h, y, a1, b1, a2, b2)
        let c = group::hash_to_scalar(
            &self.data,
            &[&self.h, &self.y, &self.a1, &self.b1, &self.a2, &self.b2],
        );
        if self.d1 + self.d2 != c {
            return Err(ValidationError::ChallengeSumMismatch);
        }

        // a1 == r1*G + d1*h, b1 == r1*GK + d1*y
        let a1 = RistrettoPoint::multiscalar_mul(&[self.r1, self.d1], &[g, self.h]);
        let b1 = RistrettoPoint::multiscalar_mul(&[self.r1, self.d1], &[self.gk, self.y]);
        if a1 != self.a1 || b1 != self.b1 {
            return Err(ValidationError::BranchCommitmentMismatch(1));
        }

        // a2 == r2*G + d2*h, b2 == r2*GK + d2*(y - G)
        let a2 = RistrettoPoint::multiscalar_mul(&[self.r2, self.d2], &[g, self.h]);
        let b2 = RistrettoPoint::multiscalar_mul(&[self.r2, self.d2], &[self.gk, self.y - g]);
        if a2 != self.a2 || b2 != self.b2 {
            return Err(ValidationError::BranchCommitmentMismatch(2));
        }

        Ok(())
    }
}
