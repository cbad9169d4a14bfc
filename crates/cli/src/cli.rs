//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ift_client_core::{AxisRange, Tag};

use crate::{
    Envelope,
    inspect::inspect,
    resolve::{ResolveArgs, resolve},
};

#[derive(Parser)]
#[command(name = "ift-client")]
#[command(about = "Resolve incremental fonts from a directory of patches")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request text for a font and install the resolved binary
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },
    /// Print the header and coverage of a patch file
    Inspect {
        #[arg(required = true)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        decoder: Envelope,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Resolve { args } => {
                let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
                runtime.block_on(resolve(&args))?;
            }
            Commands::Inspect { file, decoder } => {
                inspect(&file, decoder)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn parse_tag(s: &str) -> Result<Tag, String> {
    Tag::new_checked(s.as_bytes()).map_err(|_| format!("Invalid tag '{s}'"))
}

/// Parses `TAG=VALUE` or `TAG=MIN:MAX`.
pub(crate) fn parse_axis(s: &str) -> Result<(Tag, AxisRange), String> {
    let (tag, value_str) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid axis format '{s}', expected TAG=VALUE or TAG=MIN:MAX"))?;
    let tag = parse_tag(tag)?;
    let parse_value = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|_| format!("Invalid value '{v}' for axis '{tag}'"))
    };
    let range = match value_str.split_once(':') {
        Some((min, max)) => AxisRange::new(parse_value(min)?, parse_value(max)?),
        None => AxisRange::point(parse_value(value_str)?),
    }
    .ok_or_else(|| format!("Axis '{tag}' needs finite values, got '{value_str}'"))?;
    Ok((tag, range))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use ift_client_core::config::DEFAULT_MAX_PATCH_ITERATIONS;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_axis() {
        let (tag, range) = parse_axis("wght=400").unwrap();
        assert_eq!(tag, Tag::new(b"wght"));
        assert_eq!(range, AxisRange::point(400.0).unwrap());

        let (_, range) = parse_axis("wdth=100:75").unwrap();
        assert_eq!(range, AxisRange::new(75.0, 100.0).unwrap());

        assert!(parse_axis("wght").is_err());
        assert!(parse_axis("wght=bold").is_err());
        assert!(parse_axis("toolong=1").is_err());
        assert!(parse_axis("wght=NaN").is_err());
        assert!(parse_axis("wght=100:inf").is_err());
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag("liga").unwrap(), Tag::new(b"liga"));
        assert!(parse_tag("").is_err());
    }

    #[test]
    fn test_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "ift-client",
            "resolve",
            "--patches",
            "patches",
            "--font-id",
            "Roboto",
            "--text",
            "Hello",
            "--text",
            "World",
            "--feature",
            "smcp",
            "--axis",
            "wght=300:700",
            "--decoder",
            "brotli",
        ])
        .unwrap();
        let Commands::Resolve { args } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.texts, vec!["Hello", "World"]);
        assert_eq!(args.features, vec![Tag::new(b"smcp")]);
        assert_eq!(args.axes, vec![(Tag::new(b"wght"), AxisRange::new(300.0, 700.0).unwrap())]);
        assert_eq!(args.decoder, Envelope::Brotli);
        assert_eq!(args.max_iterations, DEFAULT_MAX_PATCH_ITERATIONS);
        assert_eq!(args.out_dir, PathBuf::from("dist"));
    }
}
