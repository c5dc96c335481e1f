//! idseek CLI - extract UniProtKB ID mappings for a set of accessions
//!
//! Streams the multi-gigabyte `idmapping.dat.gz` / `idmapping_selected.tab.gz`
//! files once, filtering concurrently, and writes the matching rows as CSV.
//!
//! # Usage
//!
//! ```bash
//! idseek --accessions best_hits.csv \
//!        --map-file idmapping_selected.tab.gz \
//!        --id-type RefSeq --id-type GO \
//!        --outfile mappings.csv
//! ```

use idseek::filter::{run_filter, DatFilter, FilterConfig, MembershipSet, SelectedFilter};
use idseek::formats::MappingFormat;
use idseek::io::{read_accessions, write_csv_file};
use log::info;
use std::env;
use std::process;

struct Options {
    accessions: String,
    map_file: String,
    id_types: Vec<String>,
    outfile: String,
    workers: Option<usize>,
    chunk_len: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args);

    if let Err(e) = run(&options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    info!("Finished!");
}

fn run(options: &Options) -> idseek::Result<()> {
    // Validate everything user-supplied before any mapping file is opened.
    let format = MappingFormat::try_from_path(&options.map_file)?;
    format.validate_id_types(&options.id_types)?;

    let accessions = MembershipSet::new(read_accessions(&options.accessions)?);

    let mut config = FilterConfig::default();
    if let Some(workers) = options.workers {
        config.workers = workers;
    }
    if let Some(chunk_len) = options.chunk_len {
        config.chunk_len = chunk_len;
    }

    let matches = match format {
        MappingFormat::Dat => {
            let id_types: MembershipSet = options.id_types.iter().cloned().collect();
            run_filter(
                &options.map_file,
                DatFilter::new(id_types, accessions),
                &config,
            )?
        }
        MappingFormat::Selected => run_filter(
            &options.map_file,
            SelectedFilter::new(&options.id_types, accessions)?,
            &config,
        )?,
    };

    write_csv_file(
        &options.outfile,
        &format.csv_header(&options.id_types),
        &matches,
    )
}

fn parse_args(args: &[String]) -> Options {
    let mut accessions = None;
    let mut map_file = None;
    let mut id_types = Vec::new();
    let mut outfile = "IDmapping.parsed.csv".to_string();
    let mut workers = None;
    let mut chunk_len = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--accessions" | "-a" => {
                accessions = Some(require_value(args, i, "--accessions"));
                i += 2;
            }
            "--map-file" | "-m" => {
                map_file = Some(require_value(args, i, "--map-file"));
                i += 2;
            }
            "--id-type" | "-i" => {
                id_types.push(require_value(args, i, "--id-type"));
                i += 2;
            }
            "--outfile" | "-o" => {
                outfile = require_value(args, i, "--outfile");
                i += 2;
            }
            "--workers" => {
                workers = Some(require_parsed(args, i, "--workers"));
                i += 2;
            }
            "--chunk-size" => {
                chunk_len = Some(require_parsed(args, i, "--chunk-size"));
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--version" | "-V" => {
                println!("idseek {}", idseek::VERSION);
                process::exit(0);
            }
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                eprintln!("Run 'idseek --help' for usage.");
                process::exit(1);
            }
        }
    }

    let (accessions, map_file) = match (accessions, map_file) {
        (Some(a), Some(m)) => (a, m),
        _ => {
            eprintln!("Error: --accessions and --map-file are required");
            eprintln!("Run 'idseek --help' for usage.");
            process::exit(1);
        }
    };

    if id_types.is_empty() {
        eprintln!("Error: at least one --id-type is required");
        eprintln!("Run 'idseek --help' for usage.");
        process::exit(1);
    }

    Options {
        accessions,
        map_file,
        id_types,
        outfile,
        workers,
        chunk_len,
    }
}

fn require_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires a value", flag);
            process::exit(1);
        }
    }
}

fn require_parsed(args: &[String], i: usize, flag: &str) -> usize {
    let raw = require_value(args, i, flag);
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            eprintln!("Error: {} requires a positive integer, got '{}'", flag, raw);
            process::exit(1);
        }
    }
}

fn print_help() {
    println!("idseek {}", idseek::VERSION);
    println!("Extract UniProtKB ID mappings for a set of accessions");
    println!();
    println!("USAGE:");
    println!("    idseek --accessions FILE --map-file FILE --id-type TYPE... [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -a, --accessions FILE  CSV of UniProtKB accessions (column 3, header skipped)");
    println!("    -m, --map-file FILE    idmapping.dat.gz or idmapping_selected.tab.gz");
    println!("    -i, --id-type TYPE     ID field to extract; repeat for multiple fields");
    println!("    -o, --outfile FILE     Output CSV path (default: IDmapping.parsed.csv)");
    println!("        --workers N        Filter worker threads (default: CPU count)");
    println!("        --chunk-size N     Lines per dispatched batch (default: 1024)");
    println!("    -h, --help             Show this help message");
    println!("    -V, --version          Show version");
    println!();
    println!("The mapping file's basename selects the layout: 'idmapping' is the");
    println!("free-form three-column file, 'idmapping_selected' the fixed-column");
    println!("table. Requested --id-type values are checked against the layout's");
    println!("known labels before the file is opened.");
}
