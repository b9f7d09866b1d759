use crate::group;
use crate::serde_hex::{Hex, PointHex, ScalarHex};
use crate::Error;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, RngCore};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A secret scalar with its derived public point. Used for both the tally
/// authority and individual voters.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    pub secret: Scalar,
    pub public: RistrettoPoint,
}

impl KeyPair {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<KeyPair, Error> {
        let secret = group::random_scalar(rng)?;
        Ok(KeyPair {
            public: group::mul_base(&secret),
            secret,
        })
    }

    /// Unpack from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

pub fn generate_keypair() -> Result<KeyPair, Error> {
    let mut csprng = rand::rngs::OsRng {};
    KeyPair::generate(&mut csprng)
}

#[derive(Serialize, Deserialize)]
struct KeyPairRecord {
    #[serde(with = "ScalarHex")]
    k: Scalar,
    #[serde(with = "PointHex")]
    public: RistrettoPoint,
}

impl Serialize for KeyPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        KeyPairRecord {
            k: self.secret,
            public: self.public,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeyPair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = KeyPairRecord::deserialize(deserializer)?;

        // The stored public point must actually belong to the secret.
        if group::mul_base(&record.k) != record.public {
            return Err(D::Error::custom("public point does not match the secret"));
        }

        Ok(KeyPair {
            secret: record.k,
            public: record.public,
        })
    }
}
