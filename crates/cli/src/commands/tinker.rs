//! Interactive shell over the application container.
//!
//! Lines are read with rustyline on a blocking thread; each verb runs on the
//! runtime through the captured handle. Errors print and the session goes on.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use kaname_core::NewUser;
use kaname_pagination::{CursorRequest, PageRequest};
use kaname_service::Container;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde_json::{Value, json};
use tokio::runtime::Handle;

use super::{Command, Context, Signature};

const PROMPT: &str = "kaname> ";

const HELP: &str = "\
help                                 show this message
config                               print the loaded configuration
users.count [search]                 count users
users.page <page> [limit] [search]   one page of users
users.cursor [column=<id|email>] [cursor|-] [limit] [search]
                                     users after a cursor (`-` for the first page)
users.find <id>                      one user by id
users.create <name> <email> <age>    insert a user
exit | quit                          leave the shell";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TinkerInput {
    Empty,
    Help,
    Config,
    Exit,
    UsersCount { search: Option<String> },
    UsersPage { page: String, limit: Option<String>, search: Option<String> },
    UsersCursor {
        cursor: Option<String>,
        limit: Option<String>,
        column: Option<String>,
        search: Option<String>,
    },
    UsersFind(i64),
    UsersCreate { name: String, email: String, age: i32 },
}

/// Parses one shell line. `Err` carries a usage message.
pub(crate) fn parse_line(line: &str) -> Result<TinkerInput, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(TinkerInput::Empty);
    };
    let rest: Vec<&str> = words.collect();
    let joined = |from: usize| Some(rest.get(from..)?.join(" ")).filter(|s| !s.is_empty());

    match verb {
        "help" => Ok(TinkerInput::Help),
        "config" => Ok(TinkerInput::Config),
        "exit" | "quit" => Ok(TinkerInput::Exit),
        "users.count" => Ok(TinkerInput::UsersCount { search: joined(0) }),
        "users.page" => {
            let page = rest.first().ok_or("usage: users.page <page> [limit] [search]")?;
            Ok(TinkerInput::UsersPage {
                page: (*page).to_owned(),
                limit: rest.get(1).map(|s| (*s).to_owned()),
                search: joined(2),
            })
        },
        "users.cursor" => {
            let (column, positional) = match rest.split_first() {
                Some((first, tail)) if first.starts_with("column=") => {
                    (first.strip_prefix("column=").map(ToOwned::to_owned), tail)
                },
                _ => (None, rest.as_slice()),
            };
            let search = Some(positional.get(2..).unwrap_or_default().join(" ")).filter(|s| !s.is_empty());
            Ok(TinkerInput::UsersCursor {
                cursor: positional.first().filter(|c| **c != "-").map(|s| (*s).to_owned()),
                limit: positional.get(1).map(|s| (*s).to_owned()),
                column,
                search,
            })
        },
        "users.find" => rest
            .first()
            .and_then(|id| id.parse().ok())
            .map(TinkerInput::UsersFind)
            .ok_or_else(|| "usage: users.find <id>".to_owned()),
        "users.create" => match rest.as_slice() {
            [name, email, age] => {
                let age = age.parse().map_err(|_| format!("age must be an integer: {age}"))?;
                Ok(TinkerInput::UsersCreate { name: (*name).to_owned(), email: (*email).to_owned(), age })
            },
            _ => Err("usage: users.create <name> <email> <age>".to_owned()),
        },
        other => Err(format!("unknown verb: {other} (try `help`)")),
    }
}

pub(crate) struct TinkerCommand {
    ctx: Context,
}

impl TinkerCommand {
    pub(crate) const fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Command for TinkerCommand {
    fn signature(&self) -> Signature {
        Signature { name: "tinker", description: "Interactive shell with the application container" }
    }

    async fn handle(&self) -> Result<()> {
        let container = Container::build(self.ctx.load_config()?).await?;
        let handle = Handle::current();
        tokio::task::spawn_blocking(move || repl(&handle, &container))
            .await
            .context("tinker session panicked")?
    }
}

fn repl(handle: &Handle, container: &Container) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("kaname tinker ({} backend). Type `help` for commands.", container.storage.kind());
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            if let Err(e) = editor.add_history_entry(line.as_str()) {
                tracing::debug!(error = %e, "failed to record shell history");
            }
        }
        match parse_line(&line) {
            Ok(TinkerInput::Exit) => break,
            Ok(TinkerInput::Empty) => {},
            Ok(TinkerInput::Help) => println!("{HELP}"),
            Ok(input) => match handle.block_on(evaluate(container, input)) {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(e) => eprintln!("error: {e:#}"),
            },
            Err(usage) => eprintln!("{usage}"),
        }
    }
    Ok(())
}

async fn evaluate(container: &Container, input: TinkerInput) -> Result<Value> {
    let users = &container.users;
    let value = match input {
        TinkerInput::Config => json!({
            "app": { "name": container.config.app.name, "host": container.config.app.host, "port": container.config.app.port },
            "database": { "backend": container.storage.kind(), "poolSize": container.config.database.pool_size },
            "auth": { "enabled": container.config.auth.jwt_secret.is_some() },
            "pagination": {
                "pageLimit": container.config.pagination.page_limit,
                "cursorLimit": container.config.pagination.cursor_limit,
                "cursorCodec": users.pagination().cursor.codec.name(),
            },
        }),
        TinkerInput::UsersCount { search } => json!(users.count_users(search.as_deref()).await?),
        TinkerInput::UsersPage { page, limit, search } => {
            let request = PageRequest::from_raw(Some(&page), limit.as_deref());
            serde_json::to_value(users.list_users(search.as_deref(), &request).await?)?
        },
        TinkerInput::UsersCursor { cursor, limit, column, search } => {
            let mut request = CursorRequest::from_raw(cursor.as_deref(), limit.as_deref());
            if let Some(column) = column {
                request = request.column(column);
            }
            serde_json::to_value(users.list_users_by_cursor(search.as_deref(), &request).await?)?
        },
        TinkerInput::UsersFind(id) => serde_json::to_value(users.get_user(id).await?)?,
        TinkerInput::UsersCreate { name, email, age } => {
            serde_json::to_value(users.create_user(NewUser::new(name, email, age)).await?)?
        },
        TinkerInput::Empty | TinkerInput::Help | TinkerInput::Exit => Value::Null,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!(parse_line("   "), Ok(TinkerInput::Empty));
        assert_eq!(parse_line("help"), Ok(TinkerInput::Help));
        assert_eq!(parse_line("quit"), Ok(TinkerInput::Exit));
        assert_eq!(parse_line("exit"), Ok(TinkerInput::Exit));
    }

    #[test]
    fn test_parse_users_page() {
        assert_eq!(
            parse_line("users.page 2 5 ada lovelace"),
            Ok(TinkerInput::UsersPage {
                page: "2".into(),
                limit: Some("5".into()),
                search: Some("ada lovelace".into()),
            })
        );
        assert!(parse_line("users.page").is_err());
    }

    #[test]
    fn test_parse_users_count_search_optional() {
        assert_eq!(parse_line("users.count"), Ok(TinkerInput::UsersCount { search: None }));
        assert_eq!(
            parse_line("users.count bob"),
            Ok(TinkerInput::UsersCount { search: Some("bob".into()) })
        );
    }

    #[test]
    fn test_parse_users_cursor() {
        assert_eq!(
            parse_line("users.cursor"),
            Ok(TinkerInput::UsersCursor { cursor: None, limit: None, column: None, search: None })
        );
        assert_eq!(
            parse_line("users.cursor 10 3"),
            Ok(TinkerInput::UsersCursor {
                cursor: Some("10".into()),
                limit: Some("3".into()),
                column: None,
                search: None,
            })
        );
    }

    #[test]
    fn test_parse_users_cursor_column_and_search() {
        assert_eq!(
            parse_line("users.cursor column=email a@example.com 5 grace hopper"),
            Ok(TinkerInput::UsersCursor {
                cursor: Some("a@example.com".into()),
                limit: Some("5".into()),
                column: Some("email".into()),
                search: Some("grace hopper".into()),
            })
        );
        assert_eq!(
            parse_line("users.cursor - 2 ada"),
            Ok(TinkerInput::UsersCursor {
                cursor: None,
                limit: Some("2".into()),
                column: None,
                search: Some("ada".into()),
            })
        );
    }

    #[test]
    fn test_parse_users_find_and_create() {
        assert_eq!(parse_line("users.find 7"), Ok(TinkerInput::UsersFind(7)));
        assert!(parse_line("users.find seven").is_err());
        assert_eq!(
            parse_line("users.create Ada ada@example.com 36"),
            Ok(TinkerInput::UsersCreate { name: "Ada".into(), email: "ada@example.com".into(), age: 36 })
        );
        assert_eq!(parse_line("users.create Ada ada@example.com old"), Err("age must be an integer: old".into()));
    }

    #[test]
    fn test_parse_unknown_verb() {
        assert!(parse_line("drop table").unwrap_err().contains("unknown verb"));
    }
}
