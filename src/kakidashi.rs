use clap::{Parser, ValueEnum};
use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use mondaihenkan::libmondai::convert::extract_text;
use mondaihenkan::libmondai::error::Error;
use mondaihenkan::libmondai::normalize::normalize;
use mondaihenkan::libmondai::question::parse;
use mondaihenkan::libmondai::strip::strip;
use std::fs;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Stage {
    /// Text with the RTF markup removed
    Stripped,
    /// Stripped text with blank lines and residue dropped
    Normalized,
    /// Parsed questions as JSON
    Questions,
}

#[derive(Parser, Debug)]
#[command(name = "書き出し (Kakidashi)")]
#[command(version, about, long_about = None)]
struct Args {
    file: PathBuf,
    #[arg(short, long, value_enum, default_value_t = Stage::Questions)]
    stage: Stage,
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
    #[arg(long)]
    compact: bool,
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    if let Err(err) = run(args) {
        error!("{:?}", err);
        eprintln!("{}", format!("Error: {}", err).red());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    info!("{}", format!("Reading {:?} ({:?})", args.file, args.stage).cyan());
    let raw = fs::read(&args.file)?;

    let output = match args.stage {
        Stage::Stripped => strip(&raw),
        Stage::Normalized => normalize(&strip(&raw)),
        Stage::Questions => {
            let questions = parse(&extract_text(&raw))?;
            info!("{}", format!("Found {} questions.", questions.len()).blue());
            if args.compact {
                serde_json::to_string(&questions)?
            } else {
                serde_json::to_string_pretty(&questions)?
            }
        }
    };

    match args.out {
        Some(path) => {
            fs::write(&path, output)?;
            info!("{}", format!("Wrote {:?}", path).green());
        }
        None => println!("{}", output),
    }
    Ok(())
}
