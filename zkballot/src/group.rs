//! Group arithmetic layer over the ristretto255 prime-order group.
//!
//! Everything the higher layers need from the curve goes through here:
//! scalar sampling, canonical decoding, the Fiat-Shamir transcript hash and
//! identity digests. No other module does raw group plumbing.

use crate::Error;
use curve25519_dalek::constants;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use digest::Digest;
use rand_core::{CryptoRng, RngCore};
use sha2::{Sha256, Sha512};

/// The canonical group generator.
pub fn basepoint() -> RistrettoPoint {
    constants::RISTRETTO_BASEPOINT_POINT
}

/// Scalar multiplication of the canonical generator, using the precomputed
/// basepoint table.
pub fn mul_base(x: &Scalar) -> RistrettoPoint {
    x * &constants::RISTRETTO_BASEPOINT_TABLE
}

/// Sample a uniform scalar in `[1, N-1]`.
///
/// A zero draw is retried; an entropy failure is returned to the caller
/// rather than retried forever.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Scalar, Error> {
    loop {
        let mut wide = [0u8; 64];
        rng.try_fill_bytes(&mut wide)?;
        let scalar = Scalar::from_bytes_mod_order_wide(&wide);
        if scalar != Scalar::zero() {
            return Ok(scalar);
        }
    }
}

/// True iff `x` is in `[1, N-1]`. In-memory scalars are canonical by
/// construction, so only the zero case is left to rule out.
pub fn is_in_range(x: &Scalar) -> bool {
    *x != Scalar::zero()
}

/// Reject the identity, which is never a valid key, commitment or
/// ciphertext component in this protocol.
pub fn ensure_element(point: &RistrettoPoint) -> Result<(), Error> {
    if *point == RistrettoPoint::identity() {
        return Err(Error::InvalidPoint);
    }
    Ok(())
}

/// Canonical 32-byte encoding of a point.
pub fn encode_point(point: &RistrettoPoint) -> [u8; 32] {
    point.compress().to_bytes()
}

/// Decode a canonical 32-byte point encoding.
pub fn decode_point(bytes: &[u8]) -> Result<RistrettoPoint, Error> {
    if bytes.len() != 32 {
        return Err(Error::InvalidPoint);
    }
    CompressedRistretto::from_slice(bytes)
        .decompress()
        .ok_or(Error::InvalidPoint)
}

/// Decode a canonical 32-byte scalar encoding, rejecting zero.
pub fn decode_scalar(bytes: &[u8]) -> Result<Scalar, Error> {
    if bytes.len() != 32 {
        return Err(Error::ScalarOutOfRange);
    }
    let mut buf = [0u8; 32];
    buf.copy_from_slice(bytes);
    let scalar = Scalar::from_canonical_bytes(buf).ok_or(Error::ScalarOutOfRange)?;
    if !is_in_range(&scalar) {
        return Err(Error::ScalarOutOfRange);
    }
    Ok(scalar)
}

/// Fiat-Shamir challenge: SHA-512 over the auxiliary data followed by the
/// canonical encodings of each bound point, reduced to a scalar.
///
/// The concatenation order is fixed and is itself part of the protocol's
/// binding; callers must pass points in the order their protocol specifies.
pub fn hash_to_scalar(data: &[u8], points: &[&RistrettoPoint]) -> Scalar {
    let mut hasher = Sha512::new();
    hasher.update(data);
    for point in points {
        hasher.update(point.compress().as_bytes());
    }
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&hasher.finalize());
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Fixed-width digest of an identity (voter or authority address).
pub fn id_digest(address: &[u8]) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(address));
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn random_scalar_is_in_range() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        for _ in 0..32 {
            let x = random_scalar(&mut rng).unwrap();
            assert!(is_in_range(&x));
        }
    }

    #[test]
    fn point_decoding_round_trips() {
        let mut rng = ChaCha20Rng::from_seed([8u8; 32]);
        let x = random_scalar(&mut rng).unwrap();
        let point = mul_base(&x);
        let decoded = decode_point(point.compress().as_bytes()).unwrap();
        assert_eq!(point, decoded);
    }

    #[test]
    fn non_canonical_encodings_are_rejected() {
        assert!(matches!(decode_point(&[0xffu8; 32]), Err(Error::InvalidPoint)));
        assert!(matches!(decode_point(&[1u8; 7]), Err(Error::InvalidPoint)));
        assert!(matches!(
            decode_scalar(&[0xffu8; 32]),
            Err(Error::ScalarOutOfRange)
        ));
        assert!(matches!(
            decode_scalar(&[0u8; 32]),
            Err(Error::ScalarOutOfRange)
        ));
    }

    #[test]
    fn challenge_depends_on_every_input() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let p1 = mul_base(&random_scalar(&mut rng).unwrap());
        let p2 = mul_base(&random_scalar(&mut rng).unwrap());
        let c = hash_to_scalar(b"data", &[&p1, &p2]);
        assert_ne!(c, hash_to_scalar(b"tada", &[&p1, &p2]));
        assert_ne!(c, hash_to_scalar(b"data", &[&p2, &p1]));
        assert_ne!(c, hash_to_scalar(b"data", &[&p1]));
    }
}
