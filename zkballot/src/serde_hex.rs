// Hex-string field encodings for the wire records.
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use std::borrow::Cow;

pub use hex_buffer_serde::Hex;

// a single-purpose type for use in `#[serde(with)]`
pub enum PointHex {}

impl Hex<RistrettoPoint> for PointHex {
    type Error = String;

    fn create_bytes(point: &RistrettoPoint) -> Cow<[u8]> {
        point.compress().to_bytes().to_vec().into()
    }

    fn from_bytes(bytes: &[u8]) -> Result<RistrettoPoint, String> {
        if bytes.len() != 32 {
            return Err("invalid point encoding - wrong length".to_string());
        }
        CompressedRistretto::from_slice(bytes)
            .decompress()
            .ok_or_else(|| "invalid point encoding - not a group element".to_string())
    }
}

// a single-purpose type for use in `#[serde(with)]`
pub enum ScalarHex {}

impl Hex<Scalar> for ScalarHex {
    type Error = String;

    fn create_bytes(scalar: &Scalar) -> Cow<[u8]> {
        scalar.to_bytes().to_vec().into()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Scalar, String> {
        if bytes.len() != 32 {
            return Err("invalid scalar encoding - wrong length".to_string());
        }
        let mut buf = [0u8; 32];
        buf.copy_from_slice(bytes);
        let scalar =
            Scalar::from_canonical_bytes(buf).ok_or_else(|| "scalar out of range".to_string())?;
        if scalar == Scalar::zero() {
            return Err("scalar out of range".to_string());
        }
        Ok(scalar)
    }
}
