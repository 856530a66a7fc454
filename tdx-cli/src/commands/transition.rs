use anyhow::Result;
use chrono::{Local, Utc};
use tdx_core::{Item, Transition};

use super::{Context, unique_ids};
use crate::render::{FormatOptions, render_item};

/// Apply a status change to every listed todo.
///
/// Every ID and transition is checked before the first file is written.
pub fn run(ctx: &Context, ids: &[u32], transition: Transition) -> Result<()> {
    let vdir = ctx.vdir()?;
    let ids = unique_ids(ids);

    let mut items: Vec<Item> = vdir.items_by_ids(&ids)?.into_iter().cloned().collect();
    for item in &items {
        item.check_transition(transition)?;
    }

    let now = Utc::now();
    for item in &mut items {
        item.apply_transition(transition, now)?;
        item.save_at(now)?;
        println!(
            "{}",
            render_item(item, FormatOptions::default(), Local::now())
        );
    }

    Ok(())
}
