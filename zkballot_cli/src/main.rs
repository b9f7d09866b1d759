use clap::{App, Arg, SubCommand};

mod command_ballot;
mod command_keygen;
mod command_tally;
mod command_verify;

fn main() {
    let matches = App::new("zkballot")
        .version("0.2")
        .about("Generates, verifies and tallies zero-knowledge yes/no ballots")
        .subcommand(
            SubCommand::with_name("keygen")
                .about("Generate a key pair")
                .arg(
                    Arg::with_name("OUT")
                        .index(1)
                        .required(true)
                        .help("Key file to write (JSON)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("ballot")
                .about("Generate ballot(s) from a batch specification")
                .arg(
                    Arg::with_name("INPUT")
                        .index(1)
                        .required(true)
                        .help("Batch specification file (JSON)"),
                )
                .arg(
                    Arg::with_name("OUT")
                        .index(2)
                        .required(true)
                        .help("Ballot file to write (JSON)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("verify")
                .about("Verify a ballot collection, partitioning accepted from rejected")
                .arg(
                    Arg::with_name("INPUT")
                        .index(1)
                        .required(true)
                        .help("Ballot file (JSON)"),
                )
                .arg(
                    Arg::with_name("OUT_DIR")
                        .index(2)
                        .required(true)
                        .help("Existing directory for the output files"),
                ),
        )
        .subcommand(
            SubCommand::with_name("tally")
                .about("Tally a ballot collection with the authority secret")
                .arg(
                    Arg::with_name("AUTH")
                        .index(1)
                        .required(true)
                        .help("Authority file (JSON: secret scalar and address)"),
                )
                .arg(
                    Arg::with_name("BALLOTS")
                        .index(2)
                        .required(true)
                        .help("Ballot file (JSON)"),
                )
                .arg(
                    Arg::with_name("OUT_DIR")
                        .index(3)
                        .required(true)
                        .help("Existing directory for the output files"),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("keygen") {
        command_keygen::command_keygen(matches);
    }
    if let Some(matches) = matches.subcommand_matches("ballot") {
        command_ballot::command_ballot(matches);
    }
    if let Some(matches) = matches.subcommand_matches("verify") {
        command_verify::command_verify(matches);
    }
    if let Some(matches) = matches.subcommand_matches("tally") {
        command_tally::command_tally(matches);
    }
}

/// Read a ballot file: either a JSON array or a single ballot object.
pub(crate) fn read_ballots(filename: &str) -> Vec<zkballot::BinaryBallot> {
    let bytes = match std::fs::read(filename) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("zkballot: unable to read {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    match serde_json::from_slice::<Vec<zkballot::BinaryBallot>>(&bytes) {
        Ok(ballots) => ballots,
        Err(_) => match serde_json::from_slice::<zkballot::BinaryBallot>(&bytes) {
            Ok(ballot) => vec![ballot],
            Err(e) => {
                eprintln!("zkballot: unable to parse {}: {}", filename, e);
                std::process::exit(1);
            }
        },
    }
}

pub(crate) fn write_json(path: &std::path::Path, value: &impl serde::Serialize) {
    let data = serde_json::to_vec_pretty(value).expect("zkballot: unexpected error packing JSON");
    if let Err(e) = std::fs::write(path, data) {
        eprintln!("zkballot: unable to write {}: {}", path.display(), e);
        std::process::exit(1);
    }
}
