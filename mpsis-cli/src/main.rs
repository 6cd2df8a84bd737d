use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum, command};
use log::{info, warn};
use mpsis::{
    assemble::{AssemblerOutput, assemble},
    profile::Profile,
    word::info::LineInfo,
};
use serde::Serialize;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log more detail; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Assemble a `.s` file")]
    Assemble {
        /// `.s` file to assemble
        file: PathBuf,
        /// Where to write the assembled program (default: `_<file>` next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ProfileArg::Label25)]
        profile: ProfileArg,
        #[arg(long, value_enum, default_value_t = OutputFormat::Bits)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Label25,
    Wide29,
}

impl From<ProfileArg> for Profile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Label25 => Profile::Label25,
            ProfileArg::Wide29 => Profile::Wide29,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One bit string per line
    Bits,
    /// Bit strings annotated with positions and decoded fields
    Listing,
    /// Per-line information as JSON
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    profile: Profile,
    position: usize,
    labels: &'a BTreeMap<String, usize>,
    lines: Vec<LineInfo>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Assemble {
            file,
            output,
            profile,
            format,
        } => {
            let src = std::fs::read_to_string(&file)
                .with_context(|| format!("could not read {}", file.display()))?;
            let dest = match output {
                Some(output) => output,
                None => default_output(&file)?,
            };
            let profile = Profile::from(profile);
            info!("assembling {} for {profile}", file.display());

            match assemble(&src, profile) {
                Ok(assembled) => {
                    std::fs::write(&dest, render(&assembled, format)?)
                        .with_context(|| format!("could not write {}", dest.display()))?;
                    info!("wrote {}", dest.display());
                    println!("{}", assembled.position());
                    Ok(())
                }
                Err(err) => {
                    let mut markers = err.marker_lines().join("\n");
                    markers.push('\n');
                    if let Err(write_err) = std::fs::write(&dest, markers) {
                        warn!("could not write {}: {write_err}", dest.display());
                    }
                    Err(anyhow::anyhow!("{err}"))
                }
            }
        }
    }
}

/// The input's file name prefixed with `_`, in the same directory.
fn default_output(file: &Path) -> anyhow::Result<PathBuf> {
    let name = file
        .file_name()
        .with_context(|| format!("{} is not a file", file.display()))?;
    Ok(file.with_file_name(format!("_{}", name.to_string_lossy())))
}

fn render(assembled: &AssemblerOutput, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Bits => assembled
            .lines()
            .into_iter()
            .map(|line| line + "\n")
            .collect(),
        OutputFormat::Listing => {
            let width = assembled.profile.width();
            assembled
                .info()
                .into_iter()
                .map(|info| format!("{:>4}  {:<width$}  {}\n", info.position, info.bits, info.summary))
                .collect()
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&JsonOutput {
                profile: assembled.profile,
                position: assembled.position(),
                labels: &assembled.labels,
                lines: assembled.info(),
            })?;
            json.push('\n');
            json
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_is_prefixed() {
        assert_eq!(
            default_output(Path::new("prog/count.s")).unwrap(),
            PathBuf::from("prog/_count.s")
        );
        assert!(default_output(Path::new("/")).is_err());
    }

    #[test]
    fn bits_format() {
        let assembled = assemble("nop\nlbl L\njmp L\n", Profile::Label25).unwrap();
        assert_eq!(
            render(&assembled, OutputFormat::Bits).unwrap(),
            "0000000000000000000000000\n\n1110000000000000000000001\n"
        );
    }

    #[test]
    fn json_format() {
        let assembled = assemble("lbl L\nmov 1 2\n", Profile::Label25).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render(&assembled, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["profile"], "label25");
        assert_eq!(json["position"], 2);
        assert_eq!(json["labels"]["L"], 1);
        assert_eq!(json["lines"][0]["summary"], "L:");
        assert_eq!(json["lines"][1]["word"]["read_address"], 1);
    }
}
