//! asciify CLI - Convert images to ASCII art

use asciify::{AsciiArt, AsciifyError, Charset, Converter, Interpolation, Rounding, Setting};
use clap::{CommandFactory, Parser};
use log::{error, info};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "asciify", about = "Convert images to ASCII art")]
struct Args {
    /// Input image files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output width in characters, before detail scaling
    #[arg(short, long)]
    width: Option<u32>,
    /// Row compensation for character cells taller than wide
    #[arg(short = 'r', long)]
    height_ratio: Option<f64>,
    /// Glyph ramp, darkest first
    #[arg(short, long)]
    charset: Option<String>,
    /// Scale factor applied to both output dimensions
    #[arg(short, long)]
    detail: Option<f64>,
    /// Resampling filter (nearest, triangle, catmull-rom, gaussian, lanczos3)
    #[arg(long)]
    filter: Option<Interpolation>,
    /// Rounding of fractional dimensions (nearest, floor)
    #[arg(long)]
    rounding: Option<Rounding>,
    /// Reverse the glyph ramp, for dark text on a light background
    #[arg(short, long)]
    invert: bool,
    /// JSON object of settings, applied before the flags above
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Write the result to this file instead of stdout
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,
    /// Write one <name>.txt per input into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Print the effective settings as JSON before converting
    #[arg(long)]
    print_settings: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), AsciifyError> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.output.is_some() && args.inputs.len() > 1 {
        Args::command()
            .error(
                clap::error::ErrorKind::ArgumentConflict,
                "--output takes a single input; use --output-dir for several",
            )
            .exit();
    }

    let converter = build_converter(&args)?;

    if args.print_settings {
        println!("{}", serde_json::to_string_pretty(converter.settings())?);
    }
    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    // Conversions share the settings read-only; output stays in input order
    let results: Vec<_> = args
        .inputs
        .par_iter()
        .map(|input| (input, converter.convert_path(input)))
        .collect();

    let mut failures = 0;
    for (input, result) in results {
        match result.and_then(|art| emit(&args, input, &art)) {
            Ok(()) => info!("converted {}", input.display()),
            Err(e) => {
                error!("{}: {e}", input.display());
                eprintln!("asciify: {}: {e}", input.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Settings file first, then flags, then `--invert` on the resulting ramp.
fn build_converter(args: &Args) -> Result<Converter, AsciifyError> {
    let mut converter = Converter::new();
    if let Some(path) = &args.settings {
        converter.update_settings_json_str(&std::fs::read_to_string(path)?)?;
    }
    converter.update_settings(flag_updates(args)?)?;
    if args.invert {
        let reversed = converter.settings().charset().reversed();
        converter.update_settings([Setting::Charset(reversed)])?;
    }
    Ok(converter)
}

fn flag_updates(args: &Args) -> Result<Vec<Setting>, AsciifyError> {
    let mut updates = Vec::new();
    if let Some(width) = args.width {
        updates.push(Setting::Width(width));
    }
    if let Some(ratio) = args.height_ratio {
        updates.push(Setting::HeightRatio(ratio));
    }
    if let Some(charset) = &args.charset {
        updates.push(Setting::Charset(Charset::new(charset)?));
    }
    if let Some(detail) = args.detail {
        updates.push(Setting::Detail(detail));
    }
    if let Some(filter) = args.filter {
        updates.push(Setting::Filter(filter));
    }
    if let Some(rounding) = args.rounding {
        updates.push(Setting::Rounding(rounding));
    }
    Ok(updates)
}

fn emit(args: &Args, input: &Path, art: &AsciiArt) -> Result<(), AsciifyError> {
    if let Some(dir) = &args.output_dir {
        let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
        name.push(".txt");
        return art.save(dir.join(name));
    }
    if let Some(path) = &args.output {
        return art.save(path);
    }

    let mut stdout = std::io::stdout().lock();
    art.write_to(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("asciify").chain(argv.iter().copied()))
    }

    fn settings_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_flags_no_updates() {
        assert!(flag_updates(&args(&["in.png"])).unwrap().is_empty());
    }

    #[test]
    fn test_flag_updates_in_field_order() {
        let updates = flag_updates(&args(&[
            "in.png", "--rounding", "floor", "-d", "0.5", "-c", "#. ", "-w", "40", "--filter", "nearest",
        ]))
        .unwrap();
        let keys: Vec<_> = updates.iter().map(Setting::key).collect();
        assert_eq!(keys, ["width", "charset", "detail", "filter", "rounding"]);
        assert_eq!(updates[0], Setting::Width(40));
    }

    #[test]
    fn test_empty_charset_flag_rejected() {
        let err = flag_updates(&args(&["in.png", "--charset", ""])).unwrap_err();
        assert!(matches!(err, AsciifyError::InvalidSettingValue { .. }));
    }

    #[test]
    fn test_flags_override_settings_file() {
        let file = settings_file(r#"{"width": 12, "detail": 2.0}"#);
        let path = file.path().to_str().unwrap();
        let converter = build_converter(&args(&["in.png", "-s", path, "-w", "30"])).unwrap();
        assert_eq!(converter.settings().width(), 30);
        assert_eq!(converter.settings().detail(), 2.0);
    }

    #[test]
    fn test_invert_applies_to_final_charset() {
        let file = settings_file(r#"{"charset": "ab"}"#);
        let path = file.path().to_str().unwrap();

        let converter = build_converter(&args(&["in.png", "-s", path, "-i"])).unwrap();
        assert_eq!(converter.settings().charset().to_string(), "ba");

        let converter = build_converter(&args(&["in.png", "-s", path, "-c", "xyz", "-i"])).unwrap();
        assert_eq!(converter.settings().charset().to_string(), "zyx");
    }

    #[test]
    fn test_bad_settings_file_is_error() {
        let file = settings_file(r#"{"sharpness": 1}"#);
        let path = file.path().to_str().unwrap();
        let err = build_converter(&args(&["in.png", "-s", path])).unwrap_err();
        assert!(matches!(err, AsciifyError::UnknownSetting(ref key) if key == "sharpness"));
    }
}
