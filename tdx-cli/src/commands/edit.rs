use std::io::Write;
use std::process::Command;

use anyhow::{Context as _, Result, bail};
use chrono::Local;
use owo_colors::OwoColorize;
use tdx_core::template::{apply_template, render_template};
use tracing::debug;

use super::Context;
use crate::date_phrase::FuzzyDates;
use crate::render::{FormatOptions, render_item};

/// Open a todo in the user's editor and write back what changed.
pub fn run(ctx: &Context, id: u32) -> Result<()> {
    let vdir = ctx.vdir()?;
    let mut item = vdir.item_by_id(id)?.clone();

    let mut file = tempfile::Builder::new()
        .prefix("tdx-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(render_template(&item).as_bytes())?;
    file.flush()?;

    let editor = editor_command()?;
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("Set the VISUAL or EDITOR environment variable to edit todos");
    };

    debug!(%editor, path = %file.path().display(), "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to launch editor {:?}", editor))?;
    if !status.success() {
        bail!("Editor exited with {}", status);
    }

    let text = std::fs::read_to_string(file.path())?;
    let changed = apply_template(&mut item, &text, Local::now(), &FuzzyDates)?;
    if !changed {
        println!("{}", "No changes".dimmed());
        return Ok(());
    }

    item.save()?;

    let format = FormatOptions {
        multiline: true,
        description: true,
    };
    println!("{}", render_item(&item, format, Local::now()));
    Ok(())
}

fn editor_command() -> Result<String> {
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .ok()
        .filter(|e| !e.trim().is_empty())
        .context("Set the VISUAL or EDITOR environment variable to edit todos")
}
