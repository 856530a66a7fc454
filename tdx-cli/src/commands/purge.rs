use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use tdx_core::Item;

use super::{Context, confirm, pluralize};
use crate::render::{FormatOptions, render_item};

/// Delete completed and cancelled todos, optionally from one list only.
pub fn run(ctx: &Context, list: Option<&str>, yes: bool) -> Result<()> {
    let vdir = ctx.vdir()?;

    let items: Vec<&Item> = match list {
        Some(name) => vdir.items_in(vdir.collection_by_name(name)?).iter().collect(),
        None => vdir.items().collect(),
    };
    let closed: Vec<&Item> = items.into_iter().filter(|i| i.is_closed()).collect();

    if closed.is_empty() {
        println!("{}", "No todos to purge".dimmed());
        return Ok(());
    }

    let now = Local::now();
    for item in &closed {
        println!("{}", render_item(item, FormatOptions::default(), now));
    }

    let prompt = format!("Delete {} {}?", closed.len(), pluralize("todo", closed.len()));
    if !confirm(&prompt, yes)? {
        println!("{}", "Nothing deleted".dimmed());
        return Ok(());
    }

    for item in &closed {
        item.delete()?;
    }

    println!("Deleted: {} {}", closed.len(), pluralize("todo", closed.len()));
    Ok(())
}
