use std::path::Path;
use zkballot::BallotBatch;

pub fn command_ballot(matches: &clap::ArgMatches) {
    let input = matches.value_of("INPUT").unwrap();
    let out = matches.value_of("OUT").unwrap();

    let bytes = match std::fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("zkballot ballot: unable to read {}: {}", input, e);
            std::process::exit(1);
        }
    };
    let batch: BallotBatch = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        eprintln!("zkballot ballot: unable to parse {}: {}", input, e);
        std::process::exit(1);
    });

    let mut csprng = rand::rngs::OsRng {};
    let ballots = zkballot::generate_ballots(&mut csprng, &batch).unwrap_or_else(|e| {
        eprintln!("zkballot ballot: {}", e);
        std::process::exit(1);
    });

    // A one-entry batch writes a single ballot object.
    if ballots.len() == 1 {
        crate::write_json(Path::new(out), &ballots[0]);
    } else {
        crate::write_json(Path::new(out), &ballots);
    }
    println!("{} ballot(s) written to {}", ballots.len(), out);
}
