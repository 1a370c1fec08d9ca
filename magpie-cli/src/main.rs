//! magpie CLI
//!
//! Clip values out of web pages with durable CSS selectors: generate a
//! robust selector for an element, bind selectors to named variables,
//! extract values into them, and paste the values into other documents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use magpie_clip::{
    ExtractMode, LoadedDocument, Store, Variable, extract_all, extract_variable, load_document,
    paste_all, paste_by_selector,
};
use magpie_dom::{DomTree, NodeId};
use magpie_html::{print_tree, serialize};
use magpie_selector::{
    SpecificityLevel, count_matches, generate, parse_selector, query_all, query_first,
};

#[derive(Parser)]
#[command(
    name = "magpie",
    version,
    about = "Clip values out of web pages with durable CSS selectors"
)]
struct Cli {
    /// Store file holding variables, sets, and templates
    #[arg(long, global = true, default_value = "magpie-store.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a robust selector for the element a rough selector hits
    Selector {
        /// Document path or URL
        doc: String,
        /// Any selector resolving to the element (first match wins)
        #[arg(long)]
        target: String,
        /// Specificity level 1-4 (out-of-range values fall back to 1)
        #[arg(long, default_value_t = 1)]
        level: u32,
    },
    /// Count and describe the elements a selector resolves to
    Verify {
        /// Document path or URL
        doc: String,
        /// Selector to probe
        selector: String,
    },
    /// Print the parsed DOM tree
    Inspect {
        /// Document path or URL
        doc: String,
    },
    /// Extract variable values from a document into the store
    Extract {
        /// Document path or URL
        doc: String,
        /// Extract only this variable (default: all with selectors)
        #[arg(long)]
        var: Option<String>,
    },
    /// Paste stored variable values into a document
    Paste {
        /// Document path or URL
        doc: String,
        /// Paste only this variable (default: all with values)
        #[arg(long)]
        var: Option<String>,
        /// Where to write the mutated document
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Manage variables
    Var {
        #[command(subcommand)]
        action: VarAction,
    },
    /// Manage saved value sets
    Set {
        #[command(subcommand)]
        action: SetAction,
    },
    /// Manage variable templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
}

#[derive(Subcommand)]
enum VarAction {
    /// Add a variable bound to a selector
    Add {
        /// Variable name
        name: String,
        /// Extraction selector
        selector: String,
        /// Extraction mode: value, text, attribute, or innerHTML
        #[arg(long, default_value = "value")]
        mode: String,
        /// Attribute name (attribute mode only)
        #[arg(long)]
        attribute: Option<String>,
        /// Dedicated paste destination selector
        #[arg(long)]
        paste_selector: Option<String>,
        /// Specificity level recorded with the variable
        #[arg(long, default_value_t = 1)]
        level: u32,
    },
    /// List variables and their current values
    List,
    /// Remove a variable by name
    Remove {
        /// Variable name
        name: String,
    },
}

#[derive(Subcommand)]
enum SetAction {
    /// Snapshot current variable values into a named set
    Save {
        /// Set name
        name: String,
    },
    /// List saved sets
    List,
    /// Restore a set's values into the variables
    Apply {
        /// Set name
        name: String,
    },
    /// Delete a set by name
    Delete {
        /// Set name
        name: String,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Capture current variable definitions as a named template
    Save {
        /// Template name
        name: String,
    },
    /// List templates
    List,
    /// Instantiate a template as fresh variables
    Apply {
        /// Template name
        name: String,
    },
    /// Delete a template by name
    Delete {
        /// Template name
        name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Selector { doc, target, level } => cmd_selector(&doc, &target, level),
        Command::Verify { doc, selector } => cmd_verify(&doc, &selector),
        Command::Inspect { doc } => cmd_inspect(&doc),
        Command::Extract { doc, var } => cmd_extract(&cli.store, &doc, var.as_deref()),
        Command::Paste { doc, var, output } => cmd_paste(&cli.store, &doc, var.as_deref(), &output),
        Command::Var { action } => cmd_var(&cli.store, &action),
        Command::Set { action } => cmd_set(&cli.store, &action),
        Command::Template { action } => cmd_template(&cli.store, &action),
    }
}

/// Load a document, surfacing parse issues on stderr.
fn load(doc: &str) -> Result<LoadedDocument> {
    let loaded = load_document(doc).with_context(|| format!("failed to load '{doc}'"))?;
    for issue in &loaded.issues {
        eprintln!("{} {issue}", "parse issue:".yellow());
    }
    Ok(loaded)
}

fn cmd_selector(doc: &str, target: &str, level: u32) -> Result<()> {
    let loaded = load(doc)?;
    let Some(node) = query_first(&loaded.dom, target) else {
        bail!("no element matches '{target}' in {doc}");
    };

    let selector = generate(&loaded.dom, node, SpecificityLevel::from_raw(level));
    if selector.is_empty() {
        bail!("no selector could be produced for '{target}'");
    }

    let matches = count_matches(&loaded.dom, &selector);
    println!("{selector}");
    if matches == 1 {
        eprintln!("{}", "unique in this document".green());
    } else {
        eprintln!(
            "{}",
            format!("best effort: resolves to {matches} element(s)").yellow()
        );
    }
    Ok(())
}

fn cmd_verify(doc: &str, selector: &str) -> Result<()> {
    let loaded = load(doc)?;
    let matches = query_all(&loaded.dom, selector);

    if let Some(parsed) = parse_selector(selector) {
        let spec = parsed.specificity;
        eprintln!("specificity ({},{},{})", spec.0, spec.1, spec.2);
    }

    match matches.len() {
        0 => println!("{}", "0 matches".red()),
        1 => println!("{}", "1 match".green()),
        n => println!("{}", format!("{n} matches").yellow()),
    }
    for id in matches {
        println!("  {}", describe(&loaded.dom, id));
    }
    Ok(())
}

fn cmd_inspect(doc: &str) -> Result<()> {
    let loaded = load(doc)?;
    print_tree(&loaded.dom, loaded.dom.root(), 0);
    Ok(())
}

fn cmd_extract(store_path: &Path, doc: &str, var: Option<&str>) -> Result<()> {
    let mut store = Store::load(store_path)?;
    let loaded = load(doc)?;
    let source = loaded.source_path.clone();

    match var {
        Some(name) => {
            if store.variable_by_name(name).is_none() {
                bail!("no variable named '{name}'");
            }
            match extract_variable(&mut store, name, &loaded.dom, Some(&source)) {
                Some(value) => println!("{name} = {value}"),
                None => println!("{}", format!("'{name}' matched nothing").yellow()),
            }
        }
        None => {
            let extracted = extract_all(&mut store, &loaded.dom, Some(&source));
            println!("{}", format!("extracted {extracted} variable(s)").green());
            for variable in &store.variables {
                if let Some(value) = &variable.value {
                    println!("  {} = {value}", variable.name);
                }
            }
        }
    }

    store.save(store_path)?;
    Ok(())
}

fn cmd_paste(store_path: &Path, doc: &str, var: Option<&str>, output: &Path) -> Result<()> {
    let store = Store::load(store_path)?;
    let mut loaded = load(doc)?;

    let pasted = match var {
        Some(name) => {
            let Some(variable) = store.variable_by_name(name) else {
                bail!("no variable named '{name}'");
            };
            let Some(value) = variable.value.as_deref() else {
                bail!("variable '{name}' holds no value");
            };
            usize::from(paste_by_selector(
                &mut loaded.dom,
                variable.paste_target(),
                value,
            ))
        }
        None => paste_all(&store, &mut loaded.dom),
    };

    std::fs::write(output, serialize(&loaded.dom))
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "{}",
        format!("pasted {pasted} value(s) into {}", output.display()).green()
    );
    Ok(())
}

fn cmd_var(store_path: &Path, action: &VarAction) -> Result<()> {
    let mut store = Store::load(store_path)?;

    match action {
        VarAction::Add {
            name,
            selector,
            mode,
            attribute,
            paste_selector,
            level,
        } => {
            if store.variable_by_name(name).is_some() {
                bail!("variable '{name}' already exists");
            }
            let mut variable = Variable::new(name, selector);
            variable.extract_mode = parse_mode(mode)?;
            variable.attribute_name = attribute.clone();
            variable.paste_selector = paste_selector.clone();
            variable.specificity_level = Some(SpecificityLevel::from_raw(*level).as_raw());
            let _ = store.add_variable(variable);
            println!("{}", format!("added '{name}'").green());
        }
        VarAction::List => {
            for variable in &store.variables {
                let value = variable.value.as_deref().unwrap_or("<empty>");
                println!(
                    "{}  {}  {}",
                    variable.name.bold(),
                    variable.selector,
                    value.dimmed()
                );
            }
        }
        VarAction::Remove { name } => {
            if store.remove_variable(name) {
                println!("{}", format!("removed '{name}'").green());
            } else {
                bail!("no variable named '{name}'");
            }
        }
    }

    store.save(store_path)?;
    Ok(())
}

fn cmd_set(store_path: &Path, action: &SetAction) -> Result<()> {
    let mut store = Store::load(store_path)?;

    match action {
        SetAction::Save { name } => {
            let _ = store.save_current_as_set(name);
            println!("{}", format!("saved set '{name}'").green());
        }
        SetAction::List => {
            for set in &store.saved_sets {
                println!(
                    "{}  {} value(s)  {}",
                    set.name.bold(),
                    set.entries.len(),
                    set.created_at.format("%Y/%m/%d %H:%M").to_string().dimmed()
                );
            }
        }
        SetAction::Apply { name } => match store.apply_set(name) {
            Some(restored) => println!("{}", format!("restored {restored} value(s)").green()),
            None => bail!("no set named '{name}'"),
        },
        SetAction::Delete { name } => {
            if !store.delete_set(name) {
                bail!("no set named '{name}'");
            }
            println!("{}", format!("deleted set '{name}'").green());
        }
    }

    store.save(store_path)?;
    Ok(())
}

fn cmd_template(store_path: &Path, action: &TemplateAction) -> Result<()> {
    let mut store = Store::load(store_path)?;

    match action {
        TemplateAction::Save { name } => {
            let _ = store.save_template(name);
            println!("{}", format!("saved template '{name}'").green());
        }
        TemplateAction::List => {
            for template in &store.variable_templates {
                println!(
                    "{}  {} definition(s)",
                    template.name.bold(),
                    template.entries.len()
                );
            }
        }
        TemplateAction::Apply { name } => match store.apply_template(name) {
            Some(created) => println!("{}", format!("created {created} variable(s)").green()),
            None => bail!("no template named '{name}'"),
        },
        TemplateAction::Delete { name } => {
            if !store.delete_template(name) {
                bail!("no template named '{name}'");
            }
            println!("{}", format!("deleted template '{name}'").green());
        }
    }

    store.save(store_path)?;
    Ok(())
}

/// Map a CLI mode string onto [`ExtractMode`].
fn parse_mode(mode: &str) -> Result<ExtractMode> {
    match mode {
        "value" => Ok(ExtractMode::Value),
        "text" => Ok(ExtractMode::Text),
        "attribute" => Ok(ExtractMode::Attribute),
        "innerHTML" | "inner-html" => Ok(ExtractMode::InnerHtml),
        other => bail!("unknown extract mode '{other}' (value, text, attribute, innerHTML)"),
    }
}

/// One-line description of an element for verify output.
fn describe(tree: &DomTree, id: NodeId) -> String {
    let Some(element) = tree.as_element(id) else {
        return String::from("<non-element>");
    };

    let mut out = format!("<{}", element.tag_name);
    if let Some(el_id) = element.id() {
        out.push_str(&format!(" id=\"{el_id}\""));
    }
    let classes = element.classes();
    if !classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", classes.join(" ")));
    }
    out.push('>');

    let text = tree.text_content(id);
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        let preview: String = trimmed.chars().take(40).collect();
        out.push_str("  ");
        out.push_str(&preview);
        if trimmed.chars().count() > 40 {
            out.push('…');
        }
    }
    out
}
