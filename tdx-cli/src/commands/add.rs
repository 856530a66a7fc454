use anyhow::{Result, bail};
use chrono::Local;
use clap::Args;
use tdx_core::ics::PropertyKind;
use tdx_core::template::parse_due;
use tdx_core::{AddInput, Collection, Item, Priority, Vdir};

use super::Context;
use crate::date_phrase::FuzzyDates;
use crate::render::{FormatOptions, render_item};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Todo summary. A date phrase ("tomorrow", "next friday 9am") sets the
    /// due date and a standalone !, !! or !!! sets the priority
    #[arg(required = true, num_args = 1..)]
    pub summary: Vec<String>,

    /// List to add the todo to
    #[arg(short, long)]
    pub list: Option<String>,

    /// Priority: high, medium or low
    #[arg(short = 'P', long)]
    pub priority: Option<String>,

    /// Due date: "2 Jan 2006 15:04", "2 Jan 2006", a duration like "3days",
    /// or a natural date
    #[arg(short = 'D', long)]
    pub due: Option<String>,

    /// Description
    #[arg(short, long)]
    pub description: Option<String>,
}

pub fn run(ctx: &Context, args: AddArgs) -> Result<()> {
    let vdir = ctx.vdir()?;
    let list = args.list.or_else(|| ctx.config.list.clone());
    let collection = target_collection(&vdir, list.as_deref())?;

    let now = Local::now();
    let input = AddInput::parse(&args.summary.join(" "), now, &FuzzyDates);
    if input.summary.is_empty() {
        bail!("Provide a todo summary");
    }

    let priority = match args.priority {
        Some(p) => Some(p.parse::<Priority>()?),
        None => input.priority,
    };
    let due = match args.due {
        Some(d) => Some(parse_due(&d, now, &FuzzyDates)?),
        None => input.due,
    };

    let mut item = Item::new(&collection.path, &input.summary);
    item.set_priority(priority.map(|p| p.value()));
    item.set_due(due);
    item.set_text_or_remove(PropertyKind::Description, args.description.as_deref());
    item.save()?;

    println!("{}", render_item(&item, FormatOptions::default(), now));
    Ok(())
}

/// The list a new todo goes to.
///
/// A name that is not a known list yet may still be an empty directory
/// under the root.
fn target_collection(vdir: &Vdir, name: Option<&str>) -> Result<Collection> {
    match name {
        Some(name) => match vdir.collection_by_name(name) {
            Ok(collection) => Ok(collection.clone()),
            Err(err) => {
                let dir = vdir.root().join(name);
                if dir.is_dir() {
                    Ok(Collection::load(&dir)?)
                } else {
                    Err(err.into())
                }
            }
        },
        None => {
            let collections: Vec<&Collection> = vdir.collections().collect();
            match collections.as_slice() {
                [only] => Ok((*only).clone()),
                [] => bail!(
                    "No lists found in {}.\n\nCreate a list directory and add with:\n  tdx add --list <name> <summary>",
                    vdir.root().display()
                ),
                _ => bail!(
                    "Multiple lists found ({}). Use --list to specify one.",
                    vdir.collection_names().join(", ")
                ),
            }
        }
    }
}
