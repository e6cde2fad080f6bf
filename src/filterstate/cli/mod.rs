//! # CLI Layer
//!
//! This module is **one possible client** of the filterstate library. It is the
//! only place that reads arguments, touches stdout/stderr or decides exit codes.
//!
//! ## Flow
//!
//! 1. Parse arguments (`setup.rs`)
//! 2. Initialize logging from `-v`
//! 3. Load `filters.json` and build the registry (built-in catalog if absent)
//! 4. Run one panel/codec operation on the query argument
//! 5. Print the result (`render.rs`)
//!
//! Query results print as a bare query string so they can be piped back into
//! another invocation.

mod render;
mod setup;

use clap::Parser;
use filterstate::codec::{decode_multi_value, FieldValue};
use filterstate::config::{default_config_dir, FilterConfig};
use filterstate::error::Result;
use filterstate::pagination::{with_page, with_page_size, PageState};
use filterstate::panel::FilterPanel;
use filterstate::query::QueryState;
use filterstate::registry::Registry;
use render::{print_json, print_keys, print_panel, print_query};
use setup::{init_logging, Cli, Commands};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = load_registry(&cli)?;
    let panel = FilterPanel::new(&registry);

    match cli.command {
        Commands::Keys => {
            print_keys(&registry);
            Ok(())
        }
        Commands::Decode { query } => print_json(&decode_multi_value(&QueryState::parse(&query))),
        Commands::Show { query } => {
            print_panel(&panel.view(&QueryState::parse(&query)));
            Ok(())
        }
        Commands::Set { query, key, values } => {
            let next = panel.apply(&QueryState::parse(&query), &key, FieldValue::Many(values));
            print_query(&next);
            Ok(())
        }
        Commands::Child {
            query,
            param,
            value,
        } => {
            let next = panel.apply_child(&QueryState::parse(&query), &param, value);
            print_query(&next);
            Ok(())
        }
        Commands::Page { query, page, size } => {
            handle_page(QueryState::parse(&query), page, size)
        }
        Commands::Clear { query } => {
            print_query(&panel.clear(&QueryState::parse(&query)));
            Ok(())
        }
        Commands::Submit { query } => print_json(&panel.submit(&QueryState::parse(&query))),
    }
}

fn load_registry(cli: &Cli) -> Result<Registry> {
    let config = match cli.config.clone().or_else(default_config_dir) {
        Some(dir) => FilterConfig::load(dir)?,
        None => FilterConfig::default(),
    };
    config.into_registry()
}

fn handle_page(query: QueryState, page: Option<u32>, size: Option<u32>) -> Result<()> {
    if page.is_none() && size.is_none() {
        return print_json(&PageState::from_query(&query));
    }

    // size first: a size change resets the page, an explicit --page then wins
    let mut next = query;
    if let Some(size) = size {
        next = with_page_size(&next, size);
    }
    if let Some(page) = page {
        next = with_page(&next, page);
    }
    print_query(&next);
    Ok(())
}
