use colored::Colorize;
use filterstate::error::Result;
use filterstate::panel::{FieldView, PanelView};
use filterstate::query::QueryState;
use filterstate::registry::Registry;
use serde::Serialize;

const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";

pub(super) fn print_query(query: &QueryState) {
    println!("{}", query);
}

pub(super) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn print_keys(registry: &Registry) {
    for def in registry.definitions() {
        let arity = if def.multiselect { "multi" } else { "single" };
        let param = if def.param() != def.key {
            format!(" (param: {})", def.param())
        } else {
            String::new()
        };
        println!(
            "{}{}  {}  {}",
            def.key.bold(),
            param.dimmed(),
            arity.dimmed(),
            def.label
        );
    }
}

pub(super) fn print_panel(view: &PanelView) {
    for (i, field) in view.fields.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_field(field);
        for child in view.children.iter().filter(|c| c.parent == field.key) {
            let value = child.value.as_deref().unwrap_or("-");
            let marker = if child.is_default { " (default)" } else { "" };
            println!(
                "    {} = {}{}",
                child.param.cyan(),
                value,
                marker.dimmed()
            );
        }
    }
    println!();
    println!(
        "{} {}  {} {}",
        "page".bold(),
        view.page.page,
        "size".bold(),
        view.page.page_size
    );
}

fn print_field(field: &FieldView) {
    let marker = if field.is_default { " (default)" } else { "" };
    println!("{}{}", field.label.bold(), marker.dimmed());
    for option in &field.options {
        if option.selected {
            println!("  {} {}", CHECKED.green(), option.label);
        } else {
            println!("  {} {}", UNCHECKED.dimmed(), option.label.dimmed());
        }
    }
}
