//! Line-oriented console over an inventory session.
//!
//! Each input line is tokenized (whitespace separated, double quotes group) and parsed
//! as one [`ConsoleCommand`] with clap in multicall mode, so the first token names the
//! command. Domain errors are printed and the loop carries on; only failures writing
//! to the output stop the console.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use thiserror::Error;

use stockroom_core::{DomainError, ItemId};
use stockroom_inventory::{InventorySession, SortField};

use crate::render;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unterminated quote")]
    UnterminatedQuote,
}

/// Split a line into tokens. `"..."` groups words and `\"` escapes a quote inside it.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            '\\' if in_quotes => match chars.next() {
                Some(next) => current.push(next),
                None => return Err(TokenizeError::UnterminatedQuote),
            },
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(TokenizeError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

/// Commands accepted by the console.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ConsoleCommand {
    /// Add an item
    Add {
        name: String,
        quantity: String,
        price: String,
        category: String,
    },
    /// Replace every field of an item
    Edit {
        id: ItemId,
        name: String,
        quantity: String,
        price: String,
        category: String,
    },
    /// Remove an item
    #[command(alias = "remove")]
    Rm { id: ItemId },
    /// Show the current page
    #[command(alias = "ls")]
    List,
    /// Show every item in store order
    All,
    /// Filter by name (case-insensitive substring); no text clears the search
    Search { text: Vec<String> },
    /// Price bounds; `-` or a missing value leaves that side open
    Price { min: Option<String>, max: Option<String> },
    /// Quantity bounds; `-` or a missing value leaves that side open
    Qty { min: Option<String>, max: Option<String> },
    /// Filter by exact category; no name shows every category
    Category { name: Vec<String> },
    /// Drop search text, bounds and category filter
    ClearFilters,
    /// Sort by id, name, quantity, price or category (again to reverse)
    Sort { field: SortField },
    /// Go to a page
    Page { number: usize },
    /// Next page
    Next,
    /// Previous page
    Prev,
    /// Toggle selection of items
    Select {
        #[arg(required = true)]
        ids: Vec<ItemId>,
    },
    /// Select every item on the page, or clear if all are selected
    SelectAll,
    /// Clear the selection
    ClearSelection,
    /// Delete every selected item
    BulkRm,
    /// Set the category of every selected item
    BulkCategory {
        #[arg(required = true)]
        category: Vec<String>,
    },
    /// Set the name used for the next bill
    BillName { name: Vec<String> },
    /// Bill the selected items
    Bill,
    /// List generated bills
    Bills,
    /// Inventory totals
    Summary,
    /// Write the inventory as CSV
    Export { path: Option<PathBuf> },
    /// Show recent inventory events
    History {
        #[arg(default_value_t = 10)]
        count: usize,
    },
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

impl ConsoleCommand {
    /// Parse already tokenized input.
    pub fn parse_tokens<I, T>(tokens: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        ConsoleLine::try_parse_from(tokens).map(|line| line.command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub struct Console<W> {
    session: InventorySession,
    out: W,
    interactive: bool,
}

impl<W: Write> Console<W> {
    pub fn new(session: InventorySession, out: W, interactive: bool) -> Self {
        Self {
            session,
            out,
            interactive,
        }
    }

    pub fn session(&self) -> &InventorySession {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Process lines until input ends or `quit` is entered.
    pub fn run(&mut self, input: impl BufRead) -> anyhow::Result<()> {
        if self.interactive {
            writeln!(self.out, "stockroom console; type `help` for commands")?;
            self.prompt()?;
        }
        for line in input.lines() {
            let line = line.context("failed to read input")?;
            if self.handle_line(&line)? == Flow::Quit {
                break;
            }
            self.prompt()?;
        }
        self.out.flush().context("failed to flush output")?;
        Ok(())
    }

    fn prompt(&mut self) -> std::io::Result<()> {
        if self.interactive {
            write!(self.out, "> ")?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Tokenize, parse and execute one line.
    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                writeln!(self.out, "error: {err}")?;
                return Ok(Flow::Continue);
            }
        };
        if tokens.first().is_none_or(|first| first.starts_with('#')) {
            return Ok(Flow::Continue);
        }

        match ConsoleCommand::parse_tokens(&tokens) {
            Ok(command) => self.execute(command),
            Err(err) => {
                write!(self.out, "{}", err.render())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute one command, printing recoverable errors.
    pub fn execute(&mut self, command: ConsoleCommand) -> anyhow::Result<Flow> {
        match self.apply(command) {
            Ok(flow) => Ok(flow),
            Err(CommandError::Output(err)) => Err(err).context("failed to write output"),
            Err(err) => {
                writeln!(self.out, "error: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn apply(&mut self, command: ConsoleCommand) -> Result<Flow, CommandError> {
        tracing::debug!(?command, "console command");
        match command {
            ConsoleCommand::Add {
                name,
                quantity,
                price,
                category,
            } => {
                let item = self.session.add(&name, &quantity, &price, &category)?;
                writeln!(self.out, "added #{} {}", item.id_typed(), item.name())?;
            }
            ConsoleCommand::Edit {
                id,
                name,
                quantity,
                price,
                category,
            } => {
                let item = self.session.edit(id, &name, &quantity, &price, &category)?;
                writeln!(self.out, "updated #{} {}", item.id_typed(), item.name())?;
            }
            ConsoleCommand::Rm { id } => {
                if self.session.remove(id) {
                    writeln!(self.out, "removed #{id}")?;
                } else {
                    writeln!(self.out, "no item #{id}")?;
                }
            }
            ConsoleCommand::List => self.show_page()?,
            ConsoleCommand::All => {
                let table = render::items_table(self.session.items(), self.session.selection());
                write!(self.out, "{table}")?;
            }
            ConsoleCommand::Search { text } => {
                self.session.set_search(&text.join(" "));
                self.show_page()?;
            }
            ConsoleCommand::Price { min, max } => {
                self.session.set_price_range(bound(&min), bound(&max))?;
                self.show_page()?;
            }
            ConsoleCommand::Qty { min, max } => {
                self.session.set_quantity_range(bound(&min), bound(&max))?;
                self.show_page()?;
            }
            ConsoleCommand::Category { name } => {
                self.session.set_category_filter(&name.join(" "));
                self.show_page()?;
            }
            ConsoleCommand::ClearFilters => {
                self.session.clear_filters();
                self.show_page()?;
            }
            ConsoleCommand::Sort { field } => {
                self.session.toggle_sort(field);
                self.show_page()?;
            }
            ConsoleCommand::Page { number } => {
                self.session.go_to_page(number);
                self.show_page()?;
            }
            ConsoleCommand::Next => {
                self.session.next_page();
                self.show_page()?;
            }
            ConsoleCommand::Prev => {
                self.session.previous_page();
                self.show_page()?;
            }
            ConsoleCommand::Select { ids } => {
                for id in ids {
                    let selected = self.session.toggle_selection(id)?;
                    let state = if selected { "selected" } else { "deselected" };
                    writeln!(self.out, "{state} #{id}")?;
                }
            }
            ConsoleCommand::SelectAll => {
                self.session.select_all_visible();
                writeln!(self.out, "{} selected", self.session.selection().len())?;
            }
            ConsoleCommand::ClearSelection => {
                self.session.clear_selection();
                writeln!(self.out, "selection cleared")?;
            }
            ConsoleCommand::BulkRm => {
                let removed = self.session.bulk_delete();
                writeln!(self.out, "removed {removed} item(s)")?;
            }
            ConsoleCommand::BulkCategory { category } => {
                let changed = self.session.bulk_set_category(&category.join(" "))?;
                writeln!(self.out, "updated {changed} item(s)")?;
            }
            ConsoleCommand::BillName { name } => {
                self.session.set_bill_name(&name.join(" "));
            }
            ConsoleCommand::Bill => {
                let text = render::bill(self.session.generate_bill()?);
                write!(self.out, "{text}")?;
            }
            ConsoleCommand::Bills => {
                if self.session.bills().is_empty() {
                    writeln!(self.out, "no bills yet")?;
                }
                for bill in self.session.bills().as_slice() {
                    write!(self.out, "{}", render::bill(bill))?;
                }
            }
            ConsoleCommand::Summary => {
                write!(self.out, "{}", render::summary(&self.session.summary()))?;
            }
            ConsoleCommand::Export { path } => {
                let path = path.unwrap_or_else(|| PathBuf::from(self.session.export_file_name()));
                self.export_to(&path)?;
                writeln!(
                    self.out,
                    "exported {} item(s) to {}",
                    self.session.items().len(),
                    path.display()
                )?;
            }
            ConsoleCommand::History { count } => {
                for entry in self.session.journal().tail(count) {
                    writeln!(self.out, "{}", render::journal_entry(entry))?;
                }
            }
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn show_page(&mut self) -> std::io::Result<()> {
        let text = render::page(&self.session.view(), self.session.selection());
        write!(self.out, "{text}")
    }

    fn export_to(&self, path: &Path) -> Result<(), CommandError> {
        std::fs::write(path, self.session.export_csv()).map_err(|source| CommandError::Export {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), items = self.session.items().len(), "inventory exported");
        Ok(())
    }
}

/// `-` stands for an open bound.
fn bound(raw: &Option<String>) -> &str {
    match raw.as_deref() {
        None | Some("-") => "",
        Some(value) => value,
    }
}
