use anyhow::Result;
use chrono::Local;
use clap::Args;
use owo_colors::OwoColorize;
use tdx_core::sort::sort_items;
use tdx_core::{Collection, FilterOptions, Item, SortKey, StatusFilter, Tag};

use super::Context;
use crate::render::{FormatOptions, Render, render_item};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Text to search for in summaries
    pub query: Vec<String>,

    /// Only show these lists
    #[arg(short, long = "list", value_name = "LIST")]
    pub lists: Vec<String>,

    /// Status filter: NEEDS-ACTION, IN-PROCESS, COMPLETED, CANCELLED or ANY
    #[arg(short, long)]
    pub status: Option<String>,

    /// Sort keys, comma separated: priority, due, status, created
    #[arg(short = 'S', long)]
    pub sort: Option<String>,

    /// Only todos with any of these tags
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tag: Vec<String>,

    /// Hide todos with any of these tags
    #[arg(short = 'x', long = "exclude-tag", value_name = "TAG")]
    pub exclude_tag: Vec<String>,

    /// Only todos due within this many days (0 shows all)
    #[arg(short, long, default_value_t = 0)]
    pub due: u32,

    /// Show descriptions
    #[arg(short = 'D', long)]
    pub description: bool,

    /// Show due dates and descriptions on a second line
    #[arg(short, long)]
    pub multiline: bool,

    /// Print every tag in use instead of todos
    #[arg(long)]
    pub tags: bool,
}

impl ListArgs {
    fn filter_options(&self, ctx: &Context) -> Result<FilterOptions> {
        let status: StatusFilter = self
            .status
            .as_deref()
            .unwrap_or(&ctx.config.status)
            .parse()?;

        Ok(FilterOptions {
            status,
            tags: self.tag.iter().map(|t| Tag::new(t)).collect(),
            excluded_tags: self.exclude_tag.iter().map(|t| Tag::new(t)).collect(),
            due_within_days: self.due,
            text: self.query.join(" "),
        })
    }
}

pub fn run(ctx: &Context, args: ListArgs) -> Result<()> {
    let vdir = ctx.vdir()?;

    if args.tags {
        for tag in vdir.tags() {
            println!("{}", tag.as_str().blue());
        }
        return Ok(());
    }

    let collections: Vec<&Collection> = if args.lists.is_empty() {
        vdir.collections().collect()
    } else {
        args.lists
            .iter()
            .map(|name| vdir.collection_by_name(name))
            .collect::<Result<_, _>>()?
    };

    let filters = args.filter_options(ctx)?;
    let keys = SortKey::parse_list(args.sort.as_deref().unwrap_or(&ctx.config.sort))?;
    let format = FormatOptions {
        multiline: args.multiline,
        description: args.description,
    };
    let now = Local::now();

    let mut sections: Vec<(&Collection, Vec<&Item>)> = Vec::new();
    for collection in collections {
        let mut items = filters.apply(vdir.items_in(collection).iter().collect(), now);
        if items.is_empty() {
            continue;
        }
        sort_items(&mut items, &keys);
        sections.push((collection, items));
    }

    if sections.is_empty() {
        println!("{}", "No todos".dimmed());
        return Ok(());
    }

    let show_headers = sections.len() > 1;
    for (i, (collection, items)) in sections.iter().enumerate() {
        if show_headers {
            if i > 0 {
                println!();
            }
            println!("{}", collection.render());
        }
        for item in items {
            println!("{}", render_item(item, format, now));
        }
    }

    Ok(())
}
