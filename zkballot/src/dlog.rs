// Fiat-Shamir proof of knowledge of x such that y = x*base.
//
// The base is an arbitrary group element, not necessarily the canonical
// generator: the tally authority proves knowledge of its secret relative to
// the aggregated voter commitment.

use crate::group;
use crate::serde_hex::{Hex, PointHex, ScalarHex};
use crate::{Error, ValidationError};
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::MultiscalarMul;
use rand_core::{CryptoRng, RngCore};

/// Non-interactive Schnorr-style transcript, bound to an auxiliary `data`
/// value chosen by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DlogProof {
    #[serde(with = "hex_serde")]
    pub data: Vec<u8>,

    /// The base the exponent relates, `h`.
    #[serde(rename = "h", with = "PointHex")]
    pub base: RistrettoPoint,

    /// The resulting point `y = x*h`.
    #[serde(with = "PointHex")]
    pub y: RistrettoPoint,

    /// Commitment `t = v*h` for the sampled nonce `v`.
    #[serde(with = "PointHex")]
    pub t: RistrettoPoint,

    /// Response `r = v - c*x`.
    #[serde(with = "ScalarHex")]
    pub r: Scalar,
}

impl DlogProof {
    /// Prove knowledge of `x` such that `y = x*base`.
    pub fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        x: &Scalar,
        base: &RistrettoPoint,
        data: &[u8],
    ) -> Result<DlogProof, Error> {
        group::ensure_element(base)?;
        if !group::is_in_range(x) {
            return Err(Error::ScalarOutOfRange);
        }

        let y = base * x;

        // v <-- Z_q^*, t = v*h
        let v = group::random_scalar(rng)?;
        let t = base * &v;

        // c = H(data, h, y, t)
        let c = group::hash_to_scalar(data, &[base, &y, &t]);

        // r = v - c*x
        let r = v - c * x;

        Ok(DlogProof {
            data: data.to_vec(),
            base: *base,
            y,
            t,
            r,
        })
    }

    fn validate(&self) -> Result<(), Error> {
        group::ensure_element(&self.base)?;
        group::ensure_element(&self.y)?;
        group::ensure_element(&self.t)?;
        if !group::is_in_range(&self.r) {
            return Err(Error::ScalarOutOfRange);
        }
        Ok(())
    }

    /// Verify the transcript: recompute the challenge and check
    /// `r*h + c*y == t`. Malformed transcripts surface as structural errors,
    /// a false statement as [`ValidationError::DlogEquationFailed`].
    pub fn verify(&self) -> Result<(), ValidationError> {
        self.validate()?;

        let c = group::hash_to_scalar(&self.data, &[&self.base, &self.y, &self.t]);

        let t = RistrettoPoint::multiscalar_mul(&[self.r, c], &[self.base, self.y]);
        if t != self.t {
            return Err(ValidationError::DlogEquationFailed);
        }

        Ok(())
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

    #[test]
    fn proves_and_verifies_under_arbitrary_base() {
        let mut rng = test_rng(1);
        let base = group::mul_base(&group::random_scalar(&mut rng).unwrap());
        let x = group::random_scalar(&mut rng).unwrap();

        let proof = DlogProof::prove(&mut rng, &x, &base, b"auth").unwrap();
        assert_eq!(proof.y, base * x);
        proof.verify().unwrap();
    }

    #[test]
    fn tampered_response_fails() {
        let mut rng = test_rng(2);
        let base = group::mul_base(&group::random_scalar(&mut rng).unwrap());
        let x = group::random_scalar(&mut rng).unwrap();

        let mut proof = DlogProof::prove(&mut rng, &x, &base, b"auth").unwrap();
        proof.r += Scalar::one();
        assert!(matches!(
            proof.verify(),
            Err(ValidationError::DlogEquationFailed)
        ));
    }

    #[test]
    fn tampered_binding_data_fails() {
        let mut rng = test_rng(3);
        let base = group::mul_base(&group::random_scalar(&mut rng).unwrap());
        let x = group::random_scalar(&mut rng).unwrap();

        let mut proof = DlogProof::prove(&mut rng, &x, &base, b"auth").unwrap();
        proof.data = b"htua".to_vec();
        assert!(matches!(
            proof.verify(),
            Err(ValidationError::DlogEquationFailed)
        ));
    }

    #[test]
    fn zero_response_is_structural() {
        let mut rng = test_rng(4);
        let base = group::mul_base(&group::random_scalar(&mut rng).unwrap());
        let x = group::random_scalar(&mut rng).unwrap();

        let mut proof = DlogProof::prove(&mut rng, &x, &base, b"auth").unwrap();
        proof.r = Scalar::zero();
        assert!(matches!(
            proof.verify(),
            Err(ValidationError::Structural(Error::ScalarOutOfRange))
        ));
    }

    #[test]
    fn out_of_range_secret_is_rejected() {
        let mut rng = test_rng(5);
        let base = group::basepoint();
        assert!(matches!(
            DlogProof::prove(&mut rng, &Scalar::zero(), &base, b"auth"),
            Err(Error::ScalarOutOfRange)
        ));
    }

    #[test]
    fn json_round_trip_is_exact() {
        let mut rng = test_rng(6);
        let base = group::mul_base(&group::random_scalar(&mut rng).unwrap());
        let x = group::random_scalar(&mut rng).unwrap();

        let proof = DlogProof::prove(&mut rng, &x, &base, b"auth").unwrap();
        let encoded = serde_json::to_vec(&proof).unwrap();
        let decoded: DlogProof = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(proof, decoded);
    }
}
