use std::path::Path;

pub fn command_verify(matches: &clap::ArgMatches) {
    let input = matches.value_of("INPUT").unwrap();
    let out_dir = Path::new(matches.value_of("OUT_DIR").unwrap());
    if !out_dir.is_dir() {
        eprintln!("zkballot verify: {} is not a directory", out_dir.display());
        std::process::exit(1);
    }

    let ballots = crate::read_ballots(input);
    let total = ballots.len();

    let (accepted, rejected) = zkballot::partition_ballots(ballots);
    let rejected: Vec<String> = rejected.iter().map(hex::encode).collect();

    crate::write_json(&out_dir.join("accepted-ballots.json"), &accepted);
    crate::write_json(&out_dir.join("rejected-voters.json"), &rejected);

    println!("{} of {} ballot(s) accepted", accepted.len(), total);
    if !rejected.is_empty() {
        eprintln!("{} ballot(s) rejected", rejected.len());
    }
}
