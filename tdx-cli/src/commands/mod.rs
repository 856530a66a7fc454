pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod purge;
pub mod show;
pub mod transition;

use std::path::PathBuf;

use anyhow::Result;
use dialoguer::Confirm;
use tdx_core::{TdxConfig, Vdir};

/// Settings resolved once per invocation and handed to every command.
pub struct Context {
    pub config: TdxConfig,
    pub root: PathBuf,
}

impl Context {
    /// Build a fresh index of the vdir.
    pub fn vdir(&self) -> Result<Vdir> {
        Ok(Vdir::load(&self.root)?)
    }
}

/// Drop repeated IDs, keeping the first occurrence.
pub fn unique_ids(ids: &[u32]) -> Vec<u32> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}

/// Ask before a destructive action unless `skip` is set.
pub fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    println!();
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids_keeps_order() {
        assert_eq!(unique_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("todo", 1), "todo");
        assert_eq!(pluralize("todo", 2), "todos");
    }
}
