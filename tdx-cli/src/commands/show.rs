use std::path::Path;

use anyhow::Result;
use tdx_core::{Item, Vdir};

use super::Context;
use crate::render::{render_full, render_raw};

/// Print every property of the given todos, by ID or by file path.
pub fn run(ctx: &Context, targets: &[String], raw: bool) -> Result<()> {
    let vdir = ctx.vdir()?;

    let items = targets
        .iter()
        .map(|target| resolve(&vdir, target))
        .collect::<Result<Vec<_>>>()?;

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if raw {
            println!("{}", render_raw(item)?);
        } else {
            print!("{}", render_full(item));
        }
    }

    Ok(())
}

/// Look a todo up by ID, or by path. A path outside the index is decoded
/// directly so decode errors reach the user.
fn resolve(vdir: &Vdir, target: &str) -> Result<Item> {
    if let Ok(id) = target.parse::<u32>() {
        return Ok(vdir.item_by_id(id)?.clone());
    }

    let path = Path::new(target);
    match vdir.item_by_path(path) {
        Ok(item) => Ok(item.clone()),
        Err(_) => Ok(Item::from_file(path)?),
    }
}
