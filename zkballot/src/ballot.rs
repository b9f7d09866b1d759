use crate::group;
use crate::serde_hex::{Hex, PointHex, ScalarHex};
use crate::{BinaryProof, Error, ValidationError};
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use num_enum::TryFromPrimitive;
use rand_core::{CryptoRng, RngCore};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A yes/no ballot: the voter's public commitment `h = a*G`, the encrypted
/// vote `y = a*GK + v*G`, and a disjunctive proof that `v` is a bit.
///
/// Immutable once created; independently verifiable with no extra state.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryBallot {
    pub h: RistrettoPoint,
    pub y: RistrettoPoint,
    pub proof: BinaryProof,
}

impl BinaryBallot {
    /// Encrypt `value` under the authority key `gk` with the voter secret `a`
    /// and prove the result well-formed, bound to `data`.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        value: bool,
        a: &Scalar,
        gk: &RistrettoPoint,
        data: &[u8],
    ) -> Result<BinaryBallot, Error> {
        group::ensure_element(gk)?;
        if !group::is_in_range(a) {
            return Err(Error::ScalarOutOfRange);
        }

        let proof = BinaryProof::prove(rng, value, a, gk, data)?;

        Ok(BinaryBallot {
            h: proof.h,
            y: proof.y,
            proof,
        })
    }

    /// Verify the ballot: `h` and `y` must be proper group elements, the
    /// embedded proof must bind exactly this `(h, y)` pair (proofs are not
    /// transferable across ballots), and the proof itself must verify.
    pub fn verify(&self) -> Result<(), ValidationError> {
        group::ensure_element(&self.h)?;
        group::ensure_element(&self.y)?;

        if self.h != self.proof.h || self.y != self.proof.y {
            return Err(ValidationError::ProofBindingMismatch);
        }

        self.proof.verify()
    }

    /// The auxiliary value the embedded proof is bound to.
    pub fn binding_data(&self) -> &[u8] {
        &self.proof.data
    }
}

// Wire form: top-level `h` and `y` plus a compressed proof record that omits
// the redundant copies of the two points; they are re-injected on load.

#[derive(Serialize, Deserialize)]
struct BinaryBallotRecord {
    #[serde(with = "PointHex")]
    h: RistrettoPoint,
    #[serde(with = "PointHex")]
    y: RistrettoPoint,
    proof: CompressedBinaryProof,
}

#[derive(Serialize, Deserialize)]
struct CompressedBinaryProof {
    #[serde(with = "hex_serde")]
    data: Vec<u8>,
    #[serde(with = "PointHex")]
    gk: RistrettoPoint,
    #[serde(with = "ScalarHex")]
    d1: Scalar,
    #[serde(with = "ScalarHex")]
    d2: Scalar,
    #[serde(with = "ScalarHex")]
    r1: Scalar,
    #[serde(with = "ScalarHex")]
    r2: Scalar,
    #[serde(with = "PointHex")]
    a1: RistrettoPoint,
    #[serde(with = "PointHex")]
    b1: RistrettoPoint,
    #[serde(with = "PointHex")]
    a2: RistrettoPoint,
    #[serde(with = "PointHex")]
    b2: RistrettoPoint,
}

impl Serialize for BinaryBallot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BinaryBallotRecord {
            h: self.h,
            y: self.y,
            proof: CompressedBinaryProof {
                data: self.proof.data.clone(),
                gk: self.proof.gk,
                d1: self.proof.d1,
                d2: self.proof.d2,
                r1: self.proof.r1,
                r2: self.proof.r2,
                a1: self.proof.a1,
                b1: self.proof.b1,
                a2: self.proof.a2,
                b2: self.proof.b2,
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BinaryBallot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = BinaryBallotRecord::deserialize(deserializer)?;

        group::ensure_element(&record.h).map_err(D::Error::custom)?;
        group::ensure_element(&record.y).map_err(D::Error::custom)?;

        Ok(BinaryBallot {
            h: record.h,
            y: record.y,
            proof: BinaryProof {
                data: record.proof.data,
                h: record.h,
                gk: record.proof.gk,
                y: record.y,
                d1: record.proof.d1,
                d2: record.proof.d2,
                r1: record.proof.r1,
                r2: record.proof.r2,
                a1: record.proof.a1,
                b1: record.proof.b1,
                a2: record.proof.a2,
                b2: record.proof.b2,
            },
        })
    }
}

/// Discriminant for the supported ballot kinds.
#[derive(TryFromPrimitive, Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum BallotKind {
    Binary = 0,
}

/// A ballot of any kind. Binary yes/no ballots are the only kind today; the
/// tag keeps room for non-binary schemes without disturbing this contract.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind")]
#[serde(rename_all = "snake_case")]
pub enum Ballot {
    Binary(BinaryBallot),
}

impl Ballot {
    pub fn kind(&self) -> BallotKind {
        match self {
            Ballot::Binary(_) => BallotKind::Binary,
        }
    }

    pub fn verify(&self) -> Result<(), ValidationError> {
        match self {
            Ballot::Binary(ballot) => ballot.verify(),
        }
    }

    /// The auxiliary binding value of the embedded proof.
    pub fn binding_data(&self) -> &[u8] {
        match self {
            Ballot::Binary(ballot) => ballot.binding_data(),
        }
    }

    pub fn into_binary(self) -> Option<BinaryBallot> {
        match self {
            Ballot::Binary(ballot) => Some(ballot),
        }
    }

    /// Unpack from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl From<BinaryBallot> for Ballot {
    fn from(ballot: BinaryBallot) -> Self {
        Ballot::Binary(ballot)
    }
}
