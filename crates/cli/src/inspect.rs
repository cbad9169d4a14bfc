use std::path::Path;

use anyhow::{Context, Result};
use ift_client_core::{Decoder, Patch, TableEdit};

use crate::Envelope;

/// Prints the base, table edits and coverage of a patch file.
pub fn inspect(path: &Path, decoder: Envelope) -> Result<()> {
    let encoded =
        std::fs::read(path).with_context(|| format!("Failed to read patch: {}", path.display()))?;
    let decoded = decoder
        .decode(&encoded)
        .with_context(|| format!("Failed to decode patch: {}", path.display()))?;
    let patch =
        Patch::parse(&decoded).with_context(|| format!("Invalid patch: {}", path.display()))?;

    println!("{}", path.display());
    if patch.compatibility_id().is_none() {
        println!("  Base: none (initial font)");
    } else {
        println!("  Base: {}", patch.compatibility_id());
    }
    for edit in patch.edits() {
        match edit {
            TableEdit::Replace { tag, data } => println!("  Replace '{tag}' ({} bytes)", data.len()),
            TableEdit::Drop(tag) => println!("  Drop '{tag}'"),
        }
    }
    println!("  Coverage: {}", patch.coverage());
    Ok(())
}
