use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, error};
use mondaihenkan::libmondai::convert::{convert_file, find_rtf_files, ConvertOptions};
use mondaihenkan::libmondai::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "問題変換 (Mondaihenkan)")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the RTF files
    indir: PathBuf,
    #[arg(long, value_name = "DIR", default_value = "qti_output")]
    outdir: PathBuf,
    #[arg(short, long, default_value = "error")]
    log_level: String,
    /// Report documents that fail and carry on with the rest
    #[arg(short, long)]
    keep_going: bool,
    /// Only write the zip, without the unpacked package next to it
    #[arg(long)]
    no_tree: bool,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    if let Err(err) = run(args) {
        error!("[Batch] {:?}", err);
        eprintln!("{}", format!("Error: {}", err).red());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    fs::create_dir_all(&args.outdir)?;
    let files = find_rtf_files(&args.indir)?;
    debug!("[Batch] Files: {:?}", files);

    let options = ConvertOptions {
        outdir: args.outdir,
        write_tree: !args.no_tree,
    };

    let mut failed = 0;
    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{}", format!("Converting {}...", name).cyan());

        match convert_file(&file, &options) {
            Ok(summary) => {
                let archive = summary
                    .archive
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                println!(
                    "  → {} ({} questions)",
                    archive.green(),
                    summary.question_count
                );
            }
            Err(err) if args.keep_going => {
                error!("[Batch] {:?}: {}", file, err);
                println!("{}", format!("  ✘ {}: {}", name, err).red());
                failed += 1;
            }
            Err(err) => return Err(err),
        }
    }

    println!("Done.");
    if failed > 0 {
        return Err(Error::BatchFailed { failed });
    }
    Ok(())
}
