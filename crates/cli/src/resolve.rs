//! The `resolve` command: sequential font requests against a patch directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use ift_client_core::{
    AxisRange, FontDescriptor, FontRequest, IftClient, PatchCatalog, ResolveOptions, Tag,
    config::DEFAULT_MAX_PATCH_ITERATIONS,
};
use log::info;

use crate::{
    DirectoryInstaller, Envelope,
    cli::{parse_axis, parse_tag},
};

#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// Directory holding the patch files
    #[arg(long)]
    pub patches: PathBuf,
    #[arg(long, default_value = "*.iftk")]
    pub pattern: String,
    #[arg(long)]
    pub font_id: String,
    /// Text to request; repeat for successive requests
    #[arg(long = "text", required = true)]
    pub texts: Vec<String>,
    #[arg(long = "feature", value_parser = parse_tag)]
    pub features: Vec<Tag>,
    /// TAG=VALUE or TAG=MIN:MAX
    #[arg(long = "axis", value_parser = parse_axis)]
    pub axes: Vec<(Tag, AxisRange)>,
    #[arg(long, value_enum, default_value_t)]
    pub decoder: Envelope,
    #[arg(long, default_value_t = DEFAULT_MAX_PATCH_ITERATIONS)]
    pub max_iterations: usize,
    #[arg(long, default_value = "dist")]
    pub out_dir: PathBuf,
    /// Family name to install under (default: "<font-id> IFT Font")
    #[arg(long)]
    pub family: Option<String>,
    #[arg(long)]
    pub weight: Option<String>,
    #[arg(long)]
    pub stretch: Option<String>,
}

impl ResolveArgs {
    pub fn family(&self) -> String {
        self.family.clone().unwrap_or_else(|| format!("{} IFT Font", self.font_id))
    }

    pub fn descriptor(&self) -> FontDescriptor {
        FontDescriptor { weight: self.weight.clone(), stretch: self.stretch.clone() }
    }

    /// One request per `--text`; features and axes ride along with the first.
    pub fn requests(&self) -> Vec<FontRequest> {
        self.texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let request = FontRequest::new(&self.font_id).text(text);
                if i > 0 {
                    return request;
                }
                self.axes
                    .iter()
                    .fold(request.features(self.features.iter().copied()), |request, (tag, range)| {
                        request.axis_range(*tag, *range)
                    })
            })
            .collect()
    }
}

/// Runs every request in order and installs the final font.
///
/// Returns the path the font was written to.
pub async fn resolve(args: &ResolveArgs) -> Result<PathBuf> {
    let catalog = PatchCatalog::from_dir(&args.patches, &args.pattern, &args.decoder)
        .with_context(|| format!("Failed to load patches from {}", args.patches.display()))?;
    println!("Loaded {} patches from {}", catalog.len(), args.patches.display());

    let client = IftClient::new(ResolveOptions::new().max_iterations(args.max_iterations));
    let mut installer = DirectoryInstaller::new(&args.out_dir);
    let family = args.family();
    let descriptor = args.descriptor();

    let requests = args.requests();
    let count = requests.len();
    for (i, request) in requests.iter().enumerate() {
        let binary = if i + 1 == count {
            client
                .load_font(request, &family, &descriptor, &args.decoder, &catalog, &mut installer)
                .await?
        } else {
            client
                .request_font(request, &args.decoder, &catalog)
                .await
                .with_context(|| format!("Request {} for '{}' failed", i + 1, args.font_id))?
        };
        println!("  [{}/{count}] {} bytes", i + 1, binary.len());
    }

    if let Some(state) = client.registry().get(&args.font_id) {
        info!("[{}] satisfied: {}", args.font_id, state.satisfied());
    }
    let path = installer.font_path(&family);
    println!("Installed {family} -> {}", path.display());
    Ok(path)
}
