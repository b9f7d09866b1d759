use super::*;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::convert::TryFrom;

#[test]
fn end_to_end_binary_vote() {
    let mut rng = ChaCha20Rng::from_seed([80u8; 32]);

    // Authority key pair
    let authority = KeyPair::generate(&mut rng).unwrap();

    // Five voters cast [yes, yes, no, no, yes]
    let values = [true, true, false, false, true];
    let mut vote = BinaryVote::new(1, 16, &authority.public, b"authority-addr").unwrap();

    for (i, value) in values.iter().enumerate() {
        let voter = KeyPair::generate(&mut rng).unwrap();
        let addr = format!("voter-addr-{}", i);

        let ballot = BinaryBallot::new(
            &mut rng,
            *value,
            &voter.secret,
            &authority.public,
            addr.as_bytes(),
        )
        .unwrap();

        // Each ballot verifies on its own before being cast.
        ballot.verify().unwrap();
        vote.cast(ballot.into(), addr.as_bytes()).unwrap();
    }
    assert_eq!(vote.num_ballots(), 5);

    // Tally and check the result end to end.
    vote.tally(&mut rng, &authority.secret).unwrap();
    let result = vote.tally_result().unwrap();
    assert_eq!(result.count, 3);
    vote.verify_tally().unwrap();

    // The published record verifies independently after a round trip.
    let encoded = serde_json::to_vec(result).unwrap();
    let decoded = BinaryTallyResult::from_json(&encoded).unwrap();
    decoded.verify().unwrap();
    assert_eq!(&decoded, result);
}

#[test]
fn randomized_session_recovers_the_exact_count() {
    let mut rng = ChaCha20Rng::from_seed([81u8; 32]);
    let authority = KeyPair::generate(&mut rng).unwrap();

    let n = 20;
    let mut vote = BinaryVote::new(1, n, &authority.public, b"auth").unwrap();

    let mut expected = 0u64;
    for i in 0..n {
        // Derive the bit from the RNG so the distribution varies per run seed.
        let value = random_scalar(&mut rng).unwrap().to_bytes()[0] & 1 == 1;
        if value {
            expected += 1;
        }

        let voter = KeyPair::generate(&mut rng).unwrap();
        let addr = format!("voter-{}", i);
        let ballot =
            BinaryBallot::new(&mut rng, value, &voter.secret, &authority.public, addr.as_bytes())
                .unwrap();
        vote.cast(ballot.into(), addr.as_bytes()).unwrap();
    }

    vote.tally(&mut rng, &authority.secret).unwrap();
    assert_eq!(vote.tally_result().unwrap().count, expected);
    vote.verify_tally().unwrap();
}

#[test]
fn replaced_ballots_change_the_outcome() {
    let mut rng = ChaCha20Rng::from_seed([82u8; 32]);
    let authority = KeyPair::generate(&mut rng).unwrap();
    let mut vote = BinaryVote::new(1, 8, &authority.public, b"auth").unwrap();

    // Two voters say yes.
    for addr in &[b"v1".as_ref(), b"v2".as_ref()] {
        let voter = KeyPair::generate(&mut rng).unwrap();
        let ballot =
            BinaryBallot::new(&mut rng, true, &voter.secret, &authority.public, addr).unwrap();
        vote.cast(ballot.into(), addr).unwrap();
    }

    // The first voter changes their mind.
    let voter = KeyPair::generate(&mut rng).unwrap();
    let ballot =
        BinaryBallot::new(&mut rng, false, &voter.secret, &authority.public, b"v1").unwrap();
    vote.cast(ballot.into(), b"v1").unwrap();

    vote.tally(&mut rng, &authority.secret).unwrap();
    assert_eq!(vote.tally_result().unwrap().count, 1);
    vote.verify_tally().unwrap();
}

#[test]
fn ballot_kind_discriminant_round_trips() {
    assert_eq!(BallotKind::try_from(0u8).unwrap(), BallotKind::Binary);
    assert!(BallotKind::try_from(1u8).is_err());

    let mut rng = ChaCha20Rng::from_seed([83u8; 32]);
    let authority = KeyPair::generate(&mut rng).unwrap();
    let voter = KeyPair::generate(&mut rng).unwrap();
    let ballot: Ballot =
        BinaryBallot::new(&mut rng, true, &voter.secret, &authority.public, b"v")
            .unwrap()
            .into();
    assert_eq!(ballot.kind() as u8, 0);
}
