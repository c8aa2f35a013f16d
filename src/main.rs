use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{debug, LevelFilter};

use swingify::{swing_xml_with_report, Options, SwingError};

#[derive(Parser)]
#[command(name = "swingify")]
#[command(about = "Swingifies a MusicXML score and prints the result to stdout")]
struct Args {
    /// MusicXML file to read
    input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML file with color options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Notes or noteheads of this color keep the beat they open straight ('NONE' disables)
    #[arg(long)]
    no_swing_color: Option<String>,

    /// Notes or noteheads of this color become rests ('NONE' disables)
    #[arg(long)]
    silence_color: Option<String>,

    /// More logging; repeat for trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{}", error_line(&e));
        process::exit(1);
    }
}

fn error_line(e: &SwingError) -> String {
    format!("Error: {}", e)
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn run(args: &Args) -> Result<(), SwingError> {
    let mut options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if let Some(color) = &args.no_swing_color {
        options = options.with_no_swing_color(color.as_str());
    }
    if let Some(color) = &args.silence_color {
        options = options.with_silence_color(color.as_str());
    }
    debug!("Options: {:?}", options);

    let source = fs::read_to_string(&args.input)?;
    let (xml, report) = swing_xml_with_report(&source, &options)?;
    debug!("{:?}", report);

    match &args.output {
        Some(path) => {
            fs::write(path, &xml)?;
            eprintln!("Wrote swung MusicXML to {}", path.display());
        }
        None => print!("{}", xml),
    }
    Ok(())
}
