use std::path::Path;

pub fn command_keygen(matches: &clap::ArgMatches) {
    let filename = matches.value_of("OUT").unwrap();

    let keypair = zkballot::generate_keypair().unwrap_or_else(|e| {
        eprintln!("zkballot keygen: {}", e);
        std::process::exit(1);
    });

    crate::write_json(Path::new(filename), &keypair);
    println!(
        "public-key: {}",
        hex::encode(zkballot::encode_point(&keypair.public))
    );
}
