use std::path::Path;
use zkballot::TallyAuthority;

pub fn command_tally(matches: &clap::ArgMatches) {
    let auth_file = matches.value_of("AUTH").unwrap();
    let ballot_file = matches.value_of("BALLOTS").unwrap();
    let out_dir = Path::new(matches.value_of("OUT_DIR").unwrap());
    if !out_dir.is_dir() {
        eprintln!("zkballot tally: {} is not a directory", out_dir.display());
        std::process::exit(1);
    }

    let bytes = match std::fs::read(auth_file) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("zkballot tally: unable to read {}: {}", auth_file, e);
            std::process::exit(1);
        }
    };
    let authority: TallyAuthority = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        eprintln!("zkballot tally: unable to parse {}: {}", auth_file, e);
        std::process::exit(1);
    });

    let ballots = crate::read_ballots(ballot_file);

    let mut csprng = rand::rngs::OsRng {};
    let (result, rejected) =
        zkballot::run_tally(&mut csprng, &authority, ballots).unwrap_or_else(|e| {
            eprintln!("zkballot tally: {}", e);
            std::process::exit(1);
        });
    let rejected: Vec<String> = rejected.iter().map(hex::encode).collect();

    crate::write_json(&out_dir.join("tally-result.json"), &result);
    crate::write_json(&out_dir.join("rejected-voters.json"), &rejected);

    println!("yes-count: {}", result.count);
    if !rejected.is_empty() {
        eprintln!("{} ballot(s) rejected", rejected.len());
    }
}
