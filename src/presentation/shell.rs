//! Line-oriented front end for the console.
//!
//! Each input line is one user action: a navigation signal, a drag, or an
//! admin command. After every action that can change the document the
//! outline is printed again.

use std::{io::Write, path::Path, str::FromStr};

use kiosk_admin_api_types::BlockKind;
use tracing::debug;

use super::outline::outline;
use crate::{
    application::{
        admin::blocks::BlockDraft,
        console::{AdminConsole, DropPosition, NavigationReport, ReorderOutcome},
        error::AppError,
    },
    domain::{
        error::DomainError,
        ordering::{ItemId, ListKind},
    },
};

pub const HELP: &str = "\
commands:
  go <route>                          show a section (dashboard, pages, buttons, media, theme)
  show                                print the visible section
  reload                              fetch the visible section again
  drag <list> <id> before|after <id>  move an item of `buttons` or `groups`
  delete <list> <id>                  delete an item of `buttons` or `groups`
  select [slug]                       open a page in the editor, or close it
  new-page <title>                    create a page and open it
  new-group <title>                   create a button group
  text <html>                         add a text block to the open page
  upload <kind> <file>                upload a file as an image, video or pdf block
  help                                print this text
  quit                                leave the console";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Go(String),
    Show,
    Reload,
    Drag {
        list: ListKind,
        moved: ItemId,
        position: DropPosition,
        anchor: ItemId,
    },
    Delete {
        list: ListKind,
        id: ItemId,
    },
    Select(Option<String>),
    NewPage(String),
    NewGroup(String),
    Text(String),
    Upload {
        kind: BlockKind,
        file: String,
    },
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = DomainError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.starts_with('#') {
            return Ok(ShellCommand::Go(line.to_string()));
        }
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();

        match (verb, args.as_slice()) {
            ("go", [route]) => Ok(ShellCommand::Go((*route).to_string())),
            ("show", []) => Ok(ShellCommand::Show),
            ("reload", []) => Ok(ShellCommand::Reload),
            ("drag", [list, moved, position, anchor]) => Ok(ShellCommand::Drag {
                list: list.parse()?,
                moved: moved.parse()?,
                position: parse_position(position)?,
                anchor: anchor.parse()?,
            }),
            ("delete", [list, id]) => Ok(ShellCommand::Delete {
                list: list.parse()?,
                id: id.parse()?,
            }),
            ("select", []) => Ok(ShellCommand::Select(None)),
            ("select", [slug]) => Ok(ShellCommand::Select(Some((*slug).to_string()))),
            ("new-page", _) if !rest.is_empty() => Ok(ShellCommand::NewPage(rest.to_string())),
            ("new-group", _) if !rest.is_empty() => Ok(ShellCommand::NewGroup(rest.to_string())),
            ("text", _) if !rest.is_empty() => Ok(ShellCommand::Text(rest.to_string())),
            ("upload", [kind, file]) => Ok(ShellCommand::Upload {
                kind: parse_media_kind(kind)?,
                file: (*file).to_string(),
            }),
            ("help" | "?", []) => Ok(ShellCommand::Help),
            ("quit" | "exit", []) => Ok(ShellCommand::Quit),
            _ => Err(DomainError::validation(format!(
                "unrecognised command `{line}`; type `help`"
            ))),
        }
    }
}

fn parse_position(value: &str) -> Result<DropPosition, DomainError> {
    match value {
        "before" => Ok(DropPosition::Before),
        "after" => Ok(DropPosition::After),
        other => Err(DomainError::validation(format!(
            "expected `before` or `after`, got `{other}`"
        ))),
    }
}

fn parse_media_kind(value: &str) -> Result<BlockKind, DomainError> {
    match value {
        "image" => Ok(BlockKind::Image),
        "video" => Ok(BlockKind::Video),
        "pdf" => Ok(BlockKind::Pdf),
        other => Err(DomainError::validation(format!(
            "`{other}` is not a media kind (image, video, pdf)"
        ))),
    }
}

/// Whether the shell keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command against `console`, writing results to `out`.
pub async fn execute(
    console: &AdminConsole,
    command: ShellCommand,
    out: &mut (dyn Write + Send),
) -> Result<Flow, AppError> {
    debug!(?command, "shell command");
    match command {
        ShellCommand::Help => {
            writeln!(out, "{HELP}").map_err(io_error)?;
            return Ok(Flow::Continue);
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
        ShellCommand::Show => {}
        ShellCommand::Go(route) => {
            if let NavigationReport::Unresolved { route } = console.navigate(Some(&route)).await {
                writeln!(out, "no section for route `{route}`").map_err(io_error)?;
                return Ok(Flow::Continue);
            }
        }
        ShellCommand::Reload => {
            console.reload().await;
        }
        ShellCommand::Drag {
            list,
            moved,
            position,
            anchor,
        } => match console.drag(list, moved, anchor, position).await? {
            Some(ReorderOutcome::Saved { items, .. }) => {
                writeln!(out, "saved order of {items} {}", list.noun()).map_err(io_error)?;
            }
            Some(ReorderOutcome::Failed { error, .. }) => {
                writeln!(out, "order not saved: {error}").map_err(io_error)?;
            }
            None => {}
        },
        ShellCommand::Delete { list, id } => {
            console.delete_item(list, id).await?;
        }
        ShellCommand::Select(slug) => {
            console.select_page(slug.as_deref()).await;
        }
        ShellCommand::NewPage(title) => {
            console.create_page(&title, false).await?;
        }
        ShellCommand::NewGroup(title) => {
            console.create_group(&title).await?;
        }
        ShellCommand::Text(html) => {
            console.add_block(BlockDraft::text(html)).await?;
        }
        ShellCommand::Upload { kind, file } => {
            let path = Path::new(&file);
            let bytes = tokio::fs::read(path).await.map_err(|err| {
                AppError::validation(format!("failed to read `{}`: {err}", path.display()))
            })?;
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("upload.bin");
            console.upload_block(kind, name, bytes).await?;
        }
    }
    write!(out, "{}", outline(&console.document())).map_err(io_error)?;
    Ok(Flow::Continue)
}

fn io_error(err: std::io::Error) -> AppError {
    AppError::Infra(err.into())
}
