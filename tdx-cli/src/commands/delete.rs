use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;

use super::{Context, confirm, pluralize, unique_ids};
use crate::render::{FormatOptions, render_item};

pub fn run(ctx: &Context, ids: &[u32], yes: bool) -> Result<()> {
    let vdir = ctx.vdir()?;
    let items = vdir.items_by_ids(&unique_ids(ids))?;

    let now = Local::now();
    for item in &items {
        println!("{}", render_item(item, FormatOptions::default(), now));
    }

    let prompt = format!("Delete {} {}?", items.len(), pluralize("todo", items.len()));
    if !confirm(&prompt, yes)? {
        println!("{}", "Nothing deleted".dimmed());
        return Ok(());
    }

    for item in &items {
        item.delete()?;
    }

    println!("Deleted: {} {}", items.len(), pluralize("todo", items.len()));
    Ok(())
}
