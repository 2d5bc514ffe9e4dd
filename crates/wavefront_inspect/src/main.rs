pub(crate) mod meta;
pub(crate) mod report;
pub(crate) mod utils;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::{fs::File, io::BufReader, path::Path};
use structopt::StructOpt;
use walkdir::WalkDir;
use wavefront::ObjReader;

use report::Summary;

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "wavefront_inspect")]
struct CliArgs {
    /// A `.obj` file or a folder to search for `.obj` files
    input: String,
    /// Also count the triangles of every face
    #[structopt(short = "t", long = "triangles")]
    triangles: bool,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

/// Happens during setup or after all files were processed
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Input does not exist: {0}")]
    InputNonExistent(String),
    #[error("{0} file(s) could not be parsed")]
    FailedFiles(usize),
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    if !args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    } else {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    }

    inspect(args)
}

fn inspect(args: CliArgs) -> Result<()> {
    let input_path = Path::new(&args.input);
    if !input_path.exists() {
        return Err(CliError::InputNonExistent(input_path.display().to_string()).into());
    }

    let mut failed = 0;
    for entry in WalkDir::new(input_path) {
        let path = match &entry {
            Err(err) => {
                warn!("Error parsing path: {}", err);
                continue;
            }
            Ok(entry) => entry.path(),
        };

        if path.is_dir() {
            continue;
        }

        // check extension
        if let Some(Some(extension)) = path.extension().map(|x| x.to_str()) {
            match extension.to_ascii_lowercase().as_ref() {
                "obj" => {
                    if let Err(err) = process(path, args.triangles) {
                        error!("{:?}", err);
                        failed += 1;
                    }
                }
                "toml" => debug!("Ignored toml file: {}", &path.display()),
                _ => warn!("Could not handle path: {}", &path.display()),
            }
        } else {
            warn!(
                "Ignored file \"{}\", because no file extension was found.",
                path.display()
            );
        }
    }

    if failed > 0 {
        return Err(CliError::FailedFiles(failed).into());
    }

    Ok(())
}

fn process(path: &Path, triangles: bool) -> Result<()> {
    info!("Processing Wavefront `.obj`-file: `{}`", path.display());
    let options = meta::load(path)?;

    let file =
        File::open(path).with_context(|| format!("Could not open file: {}", path.display()))?;
    let mut reader = ObjReader::with_options(options);
    let model = reader
        .parse(BufReader::new(file))
        .with_context(|| format!("Could not parse model: {}", path.display()))?;

    println!("{}", path.display());
    print!("{}", Summary::new(&model, reader.vertex_tables(), triangles));

    Ok(())
}
