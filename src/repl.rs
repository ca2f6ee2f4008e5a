use crate::error::FetchError;
use crate::filters::{Filters, KindFilter, PriceRange, PropertyType};
use crate::models::{Property, PropertyId};
use crate::page::{FetchTicket, Page, ViewMode};
use crate::render::{render_details, render_page};
use crate::sort::SortKey;
use crate::sources::ListingSource;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

pub const HELP: &str = "\
Commands:
  sort <price-asc|price-desc|rating-desc>   change listing order
  view <list|map>                           switch view
  fav <id>                                  toggle a favorite
  details <id> | close                      open or close a detail view
  kind <all|rent|buy>                       listing kind filter
  location [text]                           location filter (empty clears)
  price <min> [max]                         price range filter
  type <apartment|house|condo|townhouse|any>
  reset                                     clear all filters
  reload                                    remount and fetch again
  help | quit";

/// One user interaction with the page
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Sort(SortKey),
    View(ViewMode),
    ToggleFavorite(PropertyId),
    Details(PropertyId),
    CloseDetails,
    Kind(KindFilter),
    Location(String),
    Price { min: f64, max: Option<f64> },
    Type(Option<PropertyType>),
    ResetFilters,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid value `{value}` for `{command}`")]
    InvalidValue { command: &'static str, value: String },
}

impl Action {
    pub fn parse(line: &str) -> Result<Self, ActionError> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let action = match command {
            "sort" => Self::Sort(rest.parse().unwrap_or(SortKey::Unsorted)),
            "view" => Self::View(value_enum("view", rest)?),
            "fav" | "favorite" => Self::ToggleFavorite(id("fav", rest)?),
            "details" => Self::Details(id("details", rest)?),
            "close" => Self::CloseDetails,
            "kind" => Self::Kind(value_enum("kind", rest)?),
            "location" => Self::Location(rest.to_string()),
            "price" => {
                let mut bounds = rest.split_whitespace();
                let min = number("price", bounds.next())?;
                let max = bounds.next().map(|v| number("price", Some(v))).transpose()?;
                Self::Price { min, max }
            }
            "type" => match rest {
                "any" => Self::Type(None),
                _ => Self::Type(Some(value_enum("type", rest)?)),
            },
            "reset" => Self::ResetFilters,
            "reload" => Self::Reload,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(ActionError::Unknown(other.to_string())),
        };
        Ok(action)
    }
}

fn value_enum<T: ValueEnum>(command: &'static str, value: &str) -> Result<T, ActionError> {
    if value.is_empty() {
        return Err(ActionError::MissingArgument(command));
    }
    T::from_str(value, true).map_err(|_| ActionError::InvalidValue {
        command,
        value: value.to_string(),
    })
}

fn id(command: &'static str, value: &str) -> Result<PropertyId, ActionError> {
    if value.is_empty() {
        return Err(ActionError::MissingArgument(command));
    }
    value.parse().map_err(|_| ActionError::InvalidValue {
        command,
        value: value.to_string(),
    })
}

fn number(command: &'static str, value: Option<&str>) -> Result<f64, ActionError> {
    let value = value.ok_or(ActionError::MissingArgument(command))?;
    value.parse().map_err(|_| ActionError::InvalidValue {
        command,
        value: value.to_string(),
    })
}

/// What the loop should do after an action
#[derive(Debug, PartialEq)]
pub enum Effect {
    Render,
    Print(String),
    Reload,
    Quit,
}

/// Apply `action` to the page
pub fn apply(page: &mut Page, action: Action) -> Effect {
    match action {
        Action::Sort(key) => page.set_sort_key(key),
        Action::View(mode) => page.set_view_mode(mode),
        Action::ToggleFavorite(id) => match page.toggle_favorite(id) {
            Some(_) => {}
            None => return Effect::Print("Favorites are disabled.".to_string()),
        },
        Action::Details(id) => match page.select(id) {
            Some(property) => return Effect::Print(render_details(property)),
            None => return Effect::Print(format!("No listing with id {id}.")),
        },
        Action::CloseDetails => page.close_details(),
        Action::Kind(kind) => {
            let filters = Filters {
                kind,
                ..page.filters().clone()
            };
            page.set_filters(filters);
        }
        Action::Location(location) => {
            let filters = Filters {
                location,
                ..page.filters().clone()
            };
            page.set_filters(filters);
        }
        Action::Price { min, max } => {
            let current = page.filters().price;
            let filters = Filters {
                price: PriceRange::new(min, max.unwrap_or(current.max())),
                ..page.filters().clone()
            };
            page.set_filters(filters);
        }
        Action::Type(property_type) => {
            let filters = Filters {
                property_type,
                ..page.filters().clone()
            };
            page.set_filters(filters);
        }
        Action::ResetFilters => page.set_filters(Filters::default()),
        Action::Reload => return Effect::Reload,
        Action::Help => return Effect::Print(HELP.to_string()),
        Action::Quit => return Effect::Quit,
    }
    Effect::Render
}

type FetchTask = JoinHandle<Result<Vec<Property>, FetchError>>;

fn spawn_fetch(source: &Arc<dyn ListingSource>) -> FetchTask {
    let source = Arc::clone(source);
    tokio::spawn(async move { source.fetch_all().await })
}

async fn finished(task: &mut Option<FetchTask>) -> Result<Result<Vec<Property>, FetchError>, JoinError> {
    match task {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Interactive session. The fetch runs in the background so the page
/// renders (empty) and accepts commands while it is in flight.
pub async fn run(page: &mut Page, source: Arc<dyn ListingSource>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut ticket: Option<FetchTicket> = Some(page.mount());
    let mut task = Some(spawn_fetch(&source));
    print!("{}", render_page(page));
    println!("Type `help` for commands.");

    loop {
        tokio::select! {
            joined = finished(&mut task) => {
                task = None;
                let Some(current) = ticket.take() else {
                    continue;
                };
                match joined {
                    Ok(result) => {
                        page.commit(current, result);
                    }
                    Err(err) => warn!("Fetch task did not complete: {}", err),
                }
                print!("{}", render_page(page));
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    debug!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let action = match Action::parse(&line) {
                    Ok(action) => action,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };

                match apply(page, action) {
                    Effect::Render => print!("{}", render_page(page)),
                    Effect::Print(text) => println!("{text}"),
                    Effect::Reload => {
                        // Any task still in flight is detached; only the
                        // new mount's ticket can commit.
                        ticket = Some(page.mount());
                        task = Some(spawn_fetch(&source));
                        print!("{}", render_page(page));
                    }
                    Effect::Quit => break,
                }
            }
        }
    }

    page.unmount();
    Ok(())
}
