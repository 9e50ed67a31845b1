// src/app/shell.rs
// =============================================================================
// The interactive shell.
//
// One event loop on one thread. Two kinds of events arrive:
// 1. a line typed on stdin (a command)
// 2. a fetch finishing
//
// Fetches run concurrently inside a FuturesUnordered, so the prompt keeps
// accepting commands while requests are outstanding, and several users'
// repositories can load at the same time. The explorer's rules decide what
// is allowed to start; the loop only runs what they hand out.
//
// Commands:
//   search <query>   start a new search (no query = clear)
//   more             load the next page
//   open <n>         expand/collapse row n
//   refresh <n>      reload row n's repositories
//   clear            back to the start screen
//   list             print the current screen again
//   help             show commands
//   quit | exit      leave
// =============================================================================

use std::io::Write as _;

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::github::GithubClient;
use crate::repos::RowView;

use super::{render, run_fetch, Completion, Explorer, Fetch};

const HELP: &str = "\
Commands:
  search <query>   search GitHub users
  more             load the next page of results
  open <n>         expand or collapse user n
  refresh <n>      reload user n's repositories
  clear            clear the search
  list             show the current results
  help             show this help
  quit             exit";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    More,
    /// 1-based row number, as shown on screen.
    Open(usize),
    Refresh(usize),
    Clear,
    List,
    Help,
    Quit,
}

/// Parses one input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "search" | "s" => Command::Search(rest.to_string()),
        "more" | "m" => Command::More,
        "open" | "o" => Command::Open(row_number(rest)?),
        "refresh" | "r" => Command::Refresh(row_number(rest)?),
        "clear" => Command::Clear,
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command `{other}`. Type `help` for a list.")),
    };
    Ok(Some(command))
}

fn row_number(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Expected a row number, got `{arg}`")),
    }
}

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Fetch(Fetch),
    Render,
    Message(String),
    Quit,
}

fn apply_command(explorer: &mut Explorer, command: Command) -> Outcome {
    let fetch_or = |fetch: Option<Fetch>, idle: &str| match fetch {
        Some(fetch) => Outcome::Fetch(fetch),
        None => Outcome::Message(idle.to_string()),
    };

    match command {
        Command::Search(query) if query.trim().is_empty() => {
            explorer.input_changed(&query);
            Outcome::Render
        }
        Command::Search(_) if explorer.search().is_loading() => Outcome::Message(format!(
            "Still searching for \"{}\", wait for the results first",
            explorer.search().query().unwrap_or_default()
        )),
        Command::Search(query) => fetch_or(explorer.submit(&query), "Nothing to search for"),
        Command::More => {
            let fetch = explorer.load_more();
            fetch_or(fetch, "Nothing more to load right now")
        }
        Command::Open(n) => match explorer.toggle(n - 1) {
            Ok(Some(fetch)) => Outcome::Fetch(fetch),
            Ok(None) => Outcome::Render,
            Err(_) => Outcome::Message(format!("No user at row {n}")),
        },
        Command::Refresh(n) => match explorer.refresh(n - 1) {
            Ok(Some(fetch)) => Outcome::Fetch(fetch),
            Ok(None) if explorer.row_view(n - 1) == Some(RowView::Loading) => {
                Outcome::Message(format!("Row {n} is already loading"))
            }
            Ok(None) => Outcome::Message(format!(
                "Row {n} has no loaded repositories, `open {n}` first"
            )),
            Err(_) => Outcome::Message(format!("No user at row {n}")),
        },
        Command::Clear => {
            explorer.clear();
            Outcome::Render
        }
        Command::List => Outcome::Render,
        Command::Help => Outcome::Message(HELP.to_string()),
        Command::Quit => Outcome::Quit,
    }
}

/// Runs the shell until `quit` or end of input.
pub async fn run(client: GithubClient, per_page: u32) -> Result<()> {
    let mut explorer = Explorer::new(per_page);
    let mut pending: FuturesUnordered<BoxFuture<'static, Completion>> = FuturesUnordered::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    print!("{}", render::session(&explorer));
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => {
                        prompt()?;
                        continue;
                    }
                    Err(message) => {
                        println!("{message}");
                        prompt()?;
                        continue;
                    }
                };

                match apply_command(&mut explorer, command) {
                    Outcome::Fetch(fetch) => {
                        debug!(?fetch, "starting fetch");
                        pending.push(run_fetch(client.clone(), fetch).boxed());
                        print!("{}", render::session(&explorer));
                    }
                    Outcome::Render => print!("{}", render::session(&explorer)),
                    Outcome::Message(message) => println!("{message}"),
                    Outcome::Quit => break,
                }
                prompt()?;
            }
            Some(done) = pending.next(), if !pending.is_empty() => {
                if explorer.apply(done) {
                    println!();
                    print!("{}", render::session(&explorer));
                    prompt()?;
                }
            }
        }
    }

    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does tokio::select! do?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first
//    - The other futures are dropped, which is fine here: next_line() keeps
//      its buffered input, and the pending fetches stay in the set
//
// 2. Why `if !pending.is_empty()` on the second branch?
//    - An empty FuturesUnordered yields None right away
//    - Without the guard the loop would spin instead of waiting for input
//
// 3. Why BoxFuture?
//    - Every async fn returns its own anonymous type
//    - Boxing gives the set one concrete element type we can write down
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{SearchPage, User};

    fn loaded(count: u64, has_more: bool) -> Explorer {
        let mut explorer = Explorer::new(5);
        let Some(Fetch::Page(request)) = explorer.submit("octo") else {
            panic!("expected a page fetch");
        };
        let users = (1..=count)
            .map(|id| User {
                id,
                login: format!("octo{id}"),
                avatar_url: String::new(),
            })
            .collect();
        explorer.apply(Completion::Page(
            request,
            Ok(SearchPage {
                users,
                total_count: 20,
                has_more,
            }),
        ));
        explorer
    }

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(
            parse_command("search octo cat"),
            Ok(Some(Command::Search("octo cat".into())))
        );
        assert_eq!(parse_command("search"), Ok(Some(Command::Search(String::new()))));
        assert_eq!(parse_command("m"), Ok(Some(Command::More)));
        assert_eq!(parse_command("open 2"), Ok(Some(Command::Open(2))));
        assert_eq!(parse_command("r 1"), Ok(Some(Command::Refresh(1))));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn rejects_bad_row_numbers_and_unknown_words() {
        assert!(parse_command("open").is_err());
        assert!(parse_command("open 0").is_err());
        assert!(parse_command("refresh two").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn empty_search_clears() {
        let mut explorer = loaded(2, false);
        assert_eq!(
            apply_command(&mut explorer, Command::Search(String::new())),
            Outcome::Render
        );
        assert!(explorer.search().query().is_none());
    }

    #[test]
    fn more_twice_only_fetches_once() {
        let mut explorer = loaded(5, true);
        assert!(matches!(
            apply_command(&mut explorer, Command::More),
            Outcome::Fetch(Fetch::Page(_))
        ));
        assert!(matches!(
            apply_command(&mut explorer, Command::More),
            Outcome::Message(_)
        ));
    }

    #[test]
    fn open_uses_one_based_rows() {
        let mut explorer = loaded(2, false);
        let outcome = apply_command(&mut explorer, Command::Open(2));
        assert!(matches!(outcome, Outcome::Fetch(Fetch::Repos(ref r)) if r.login == "octo2"));
        assert!(matches!(
            apply_command(&mut explorer, Command::Open(3)),
            Outcome::Message(_)
        ));
    }

    #[test]
    fn search_while_first_page_loads_is_refused() {
        let mut explorer = Explorer::new(5);
        assert!(matches!(
            apply_command(&mut explorer, Command::Search("octo".into())),
            Outcome::Fetch(Fetch::Page(_))
        ));
        assert_eq!(
            apply_command(&mut explorer, Command::Search("rust".into())),
            Outcome::Message("Still searching for \"octo\", wait for the results first".into())
        );
        assert_eq!(explorer.search().query(), Some("octo"));
    }

    #[test]
    fn refresh_on_collapsed_row_does_not_fetch() {
        let mut explorer = loaded(2, false);
        assert_eq!(
            apply_command(&mut explorer, Command::Refresh(2)),
            Outcome::Message("Row 2 has no loaded repositories, `open 2` first".into())
        );
        assert!(!explorer.repos().is_loading(2));
    }

    #[test]
    fn refresh_while_loading_reports_it() {
        let mut explorer = loaded(1, false);
        apply_command(&mut explorer, Command::Open(1));
        assert_eq!(
            apply_command(&mut explorer, Command::Refresh(1)),
            Outcome::Message("Row 1 is already loading".into())
        );
    }
}
