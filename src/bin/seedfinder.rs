use std::env;
use std::path::PathBuf;

use seed_resolver::{ResolverConfig, Session};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("seedfinder [--config <path>] [query]");
    println!("  query: map=<map>&nightlord=<name>&slots=<slot>:<building>,...");
    println!("  example: seedfinder 'map=normal&slots=1:church,4:great_church'");
}

fn parse_args(args: &[String]) -> Result<(Option<PathBuf>, String), String> {
    let mut config = None;
    let mut query = String::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let path = args.get(i + 1).ok_or_else(|| "missing config path".to_string())?;
                config = Some(PathBuf::from(path));
                i += 2;
            }
            other if query.is_empty() => {
                query = other.to_string();
                i += 1;
            }
            other => return Err(format!("unexpected argument: {other}")),
        }
    }
    Ok((config, query))
}

fn run(args: &[String]) -> Result<(), String> {
    let (config_path, query) = parse_args(args)?;
    let config = match config_path {
        Some(path) => ResolverConfig::load(&path).map_err(|e| e.to_string())?,
        None => ResolverConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog = config.load_catalog().map_err(|e| e.to_string())?;
    let session = Session::from_query(catalog, &query, &config);
    let snapshot = session.snapshot();

    println!("phase: {:?}", snapshot.current_phase);
    println!("matches: {}", snapshot.matching_seeds.len());
    for id in &snapshot.matching_seeds {
        if let Some(seed) = session.catalog().seed(*id) {
            let lord = session
                .catalog()
                .nightlord(&seed.nightlord)
                .map_or(seed.nightlord.as_str(), |n| n.name.as_str());
            println!("  seed {:03}  {}  {}", seed.seed_id, seed.map_type, lord);
        }
    }
    if let Some(found) = snapshot.found_seed {
        println!("found: seed {found:03}");
    }
    println!("share: ?{}", session.to_query());

    let dump = toon_format::encode_default(&snapshot).map_err(|e| e.to_string())?;
    println!("{dump}");
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return;
    }
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        print_usage();
        std::process::exit(1);
    }
}
