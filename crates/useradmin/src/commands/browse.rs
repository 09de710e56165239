//! Interactive user table.
//!
//! Input is read line by line on a helper thread so the main loop can wait
//! for the next command and for the search quiet period at the same time.
//! Search text is only sent once no new `s` command arrived for the
//! debounce window.

use crate::cli::OutputFormat;
use crate::commands::{finish_action, flush_notices, user::print_page};
use crate::output::output_result;
use crate::prompt::{self, TermConfirm};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;
use useradmin_core::{
    ActionOutcome, Confirmation, FilterBar, FormField, FormValues, ListQuery, PaginationState,
    SortField, StatusFilter, UserDirectory, UserId, UsersPage, PAGE_SIZE_OPTIONS,
};

const HELP: &str = "\
Commands:
  n, p            next / previous page
  g <page>        go to page
  size <n>        rows per page (5, 10, 20)
  s <text>        search (applied after typing pauses)
  clear           clear the search
  f <status>      filter: all, active, inactive
  sort <column>   cycle sort on id, username or status
  i <id>          show one row
  new [--show]    create a user (--show reveals passwords)
  e <id>          edit a user
  t <id>          activate / deactivate a user
  d <id>          delete a user
  r               reload
  h               this help
  q               quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    NextPage,
    PrevPage,
    GoTo(usize),
    PageSize(usize),
    Search(String),
    ClearSearch,
    Filter(StatusFilter),
    Sort(SortField),
    Show(UserId),
    New { reveal: bool },
    Edit(UserId),
    Toggle(UserId),
    Delete(UserId),
    Reload,
    Redraw,
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let id = |rest: &str| {
        if rest.is_empty() {
            Err(format!("'{}' needs a user id", word))
        } else {
            Ok(UserId::parse(rest))
        }
    };

    match word {
        "" => Ok(Command::Redraw),
        "n" | "next" => Ok(Command::NextPage),
        "p" | "prev" => Ok(Command::PrevPage),
        "g" | "goto" => match rest.parse::<usize>() {
            Ok(page) if page >= 1 => Ok(Command::GoTo(page)),
            _ => Err("page must be a number starting at 1".to_string()),
        },
        "size" => match rest.parse::<usize>() {
            Ok(size) if PAGE_SIZE_OPTIONS.contains(&size) => Ok(Command::PageSize(size)),
            _ => Err(format!("rows per page must be one of {:?}", PAGE_SIZE_OPTIONS)),
        },
        "s" | "search" => Ok(Command::Search(rest.to_string())),
        "clear" => Ok(Command::ClearSearch),
        "f" | "filter" => match rest {
            "all" => Ok(Command::Filter(StatusFilter::All)),
            "active" => Ok(Command::Filter(StatusFilter::Active)),
            "inactive" => Ok(Command::Filter(StatusFilter::Inactive)),
            _ => Err("filter must be all, active or inactive".to_string()),
        },
        "sort" => match rest {
            "id" => Ok(Command::Sort(SortField::Id)),
            "username" => Ok(Command::Sort(SortField::Username)),
            "status" => Ok(Command::Sort(SortField::Status)),
            _ => Err("sort column must be id, username or status".to_string()),
        },
        "i" | "info" => id(rest).map(Command::Show),
        "new" => Ok(Command::New {
            reveal: rest == "--show",
        }),
        "e" | "edit" => id(rest).map(Command::Edit),
        "t" | "toggle" => id(rest).map(Command::Toggle),
        "d" | "delete" => id(rest).map(Command::Delete),
        "r" | "reload" => Ok(Command::Reload),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}', type h for help", other)),
    }
}

enum Read {
    Line(String),
    Timeout,
    Eof,
}

/// Reads stdin on request. At most one read is outstanding, and none is
/// while a command runs, so terminal prompts never compete for input.
struct LineReader {
    requests: Sender<()>,
    lines: Receiver<Option<String>>,
    outstanding: bool,
}

impl LineReader {
    fn spawn() -> Self {
        let (requests, request_rx) = mpsc::channel::<()>();
        let (line_tx, lines) = mpsc::channel();

        thread::spawn(move || {
            let stdin = io::stdin();
            for _ in request_rx {
                let mut buf = String::new();
                let line = match stdin.lock().read_line(&mut buf) {
                    Ok(0) | Err(_) => None,
                    Ok(_) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
                };
                let eof = line.is_none();
                if line_tx.send(line).is_err() || eof {
                    break;
                }
            }
        });

        Self {
            requests,
            lines,
            outstanding: false,
        }
    }

    /// Wait for the next line, giving up at `deadline` if one is set
    fn next(&mut self, deadline: Option<Instant>) -> Read {
        if !self.outstanding {
            if self.requests.send(()).is_err() {
                return Read::Eof;
            }
            self.outstanding = true;
        }

        let received = match deadline {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match self.lines.recv_timeout(wait) {
                    Ok(line) => line,
                    Err(RecvTimeoutError::Timeout) => return Read::Timeout,
                    Err(RecvTimeoutError::Disconnected) => None,
                }
            }
            None => self.lines.recv().ok().flatten(),
        };

        self.outstanding = false;
        match received {
            Some(line) => Read::Line(line),
            None => Read::Eof,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Browser<'a> {
    page: UsersPage<'a>,
    bar: FilterBar,
    format: OutputFormat,
}

impl<'a> Browser<'a> {
    fn new(client: &'a dyn UserDirectory, page_size: usize, format: OutputFormat) -> Self {
        let query = ListQuery {
            pagination: PaginationState {
                page_index: 0,
                page_size,
            },
            ..ListQuery::default()
        };
        Self {
            page: UsersPage::with_query(client, query),
            bar: FilterBar::new(),
            format,
        }
    }

    fn render(&mut self) {
        print_page(&self.page, self.format);
        let pending = if self.bar.search_deadline().is_some() {
            " (pending)".dimmed().to_string()
        } else {
            String::new()
        };
        eprintln!(
            "{} \"{}\"{}  {} {}",
            "Search:".dimmed(),
            self.bar.search_input(),
            pending,
            "Status:".dimmed(),
            status_filter_label(self.bar.status())
        );
        flush_notices(&mut self.page, self.format);
    }

    fn prompt_line(&self) {
        eprint!("{} ", ">".cyan().bold());
        let _ = io::stderr().flush();
    }

    /// Apply matured search text; returns whether anything changed
    fn poll_search(&mut self, now: Instant) -> bool {
        match self.bar.poll_search(now) {
            Some(search) => self.page.set_search(search),
            None => false,
        }
    }

    fn goto_index(&mut self, page_index: usize) -> bool {
        let state = self.page.state();
        let last = state.pagination.page_count(state.total) - 1;
        let pagination = PaginationState {
            page_index: page_index.min(last),
            page_size: state.pagination.page_size,
        };
        self.page.set_pagination(pagination)
    }

    fn apply(&mut self, command: Command, now: Instant) -> Result<Flow> {
        let pagination = self.page.state().pagination;
        match command {
            Command::NextPage => {
                if !self.goto_index(pagination.page_index + 1) {
                    eprintln!("Already on the last page");
                }
            }
            Command::PrevPage => {
                if pagination.page_index == 0 {
                    eprintln!("Already on the first page");
                } else {
                    self.goto_index(pagination.page_index - 1);
                }
            }
            Command::GoTo(page) => {
                self.goto_index(page - 1);
            }
            Command::PageSize(page_size) => {
                self.page.set_pagination(PaginationState {
                    page_index: 0,
                    page_size,
                });
            }
            Command::Search(text) => self.bar.type_search(text, now),
            Command::ClearSearch => self.bar.clear_search(now),
            Command::Filter(status) => {
                let status = self.bar.set_status(status);
                self.page.set_status_filter(status);
            }
            Command::Sort(field) => {
                let sort = self.page.state().sort.cycle(field);
                self.page.set_sort(sort);
            }
            Command::Show(id) => match self.page.row(&id) {
                Some(user) => output_result(user, self.format),
                None => eprintln!("No row with id {} on this page", id),
            },
            Command::New { reveal } => {
                self.page.open_create();
                if reveal {
                    if let Some(dialog) = self.page.dialog_mut() {
                        dialog.toggle_visibility(FormField::Password);
                        dialog.toggle_visibility(FormField::ConfirmPassword);
                    }
                }
                self.run_dialog()?;
            }
            Command::Edit(id) => match self.page.row(&id).cloned() {
                Some(user) => {
                    self.page.open_edit(&user);
                    self.run_dialog()?;
                }
                None => eprintln!("No row with id {} on this page", id),
            },
            Command::Toggle(id) => match self.page.row(&id).map(|u| (u.id.clone(), u.status)) {
                Some((id, current)) => {
                    let confirm = TermConfirm::default();
                    let outcome = self.page.toggle_status(&id, current, &confirm);
                    report(&mut self.page, outcome, self.format);
                }
                None => eprintln!("No row with id {} on this page", id),
            },
            Command::Delete(id) => match self.page.row(&id).map(|u| u.id.clone()) {
                Some(id) => {
                    let outcome = self.page.delete_user(&id, &TermConfirm::default());
                    report(&mut self.page, outcome, self.format);
                }
                None => eprintln!("No row with id {} on this page", id),
            },
            Command::Reload => {
                self.page.refresh();
            }
            Command::Redraw => {}
            Command::Help => eprintln!("{}", HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Prompt for the open dialog's fields until it is submitted or
    /// abandoned
    fn run_dialog(&mut self) -> Result<()> {
        loop {
            let Some(dialog) = self.page.dialog() else {
                return Ok(());
            };
            eprintln!("{}", dialog.title().bold());

            let mut values = FormValues::username(dialog.values().username.clone());
            values.username = prompt::text("Username", &values.username)?;
            for field in dialog.visible_fields() {
                match field {
                    FormField::Username => {}
                    FormField::Password => {
                        values.password =
                            prompt::password("Password", dialog.is_revealed(*field))?
                    }
                    FormField::ConfirmPassword => {
                        values.confirm_password =
                            prompt::password("Confirm password", dialog.is_revealed(*field))?
                    }
                }
            }
            let submit_label = dialog.submit_label();

            let outcome = self.page.submit_dialog(values);
            match outcome {
                ActionOutcome::Done | ActionOutcome::Busy => {
                    report(&mut self.page, outcome, self.format);
                    return Ok(());
                }
                _ => {
                    report(&mut self.page, outcome, self.format);
                    let retry = format!("{} again?", submit_label);
                    if !TermConfirm::default().confirm(&retry) {
                        self.page.close_dialog();
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Print an action's notices without leaving the browser on failure
fn report(page: &mut UsersPage<'_>, outcome: ActionOutcome, format: OutputFormat) {
    if let Err(e) = finish_action(page, outcome, format) {
        eprintln!("{} {}", "✗".red().bold(), e);
    }
}

fn status_filter_label(status: StatusFilter) -> &'static str {
    match status {
        StatusFilter::All => "all",
        StatusFilter::Active => "active",
        StatusFilter::Inactive => "inactive",
    }
}

pub fn handle_browse(
    client: &dyn UserDirectory,
    page_size: usize,
    format: OutputFormat,
) -> Result<()> {
    let mut browser = Browser::new(client, page_size, format);
    browser.page.refresh();
    browser.render();
    eprintln!("{}", "Type h for help, q to quit".dimmed());

    let mut reader = LineReader::spawn();
    browser.prompt_line();

    loop {
        match reader.next(browser.bar.search_deadline()) {
            Read::Timeout => {
                if browser.poll_search(Instant::now()) {
                    browser.render();
                    browser.prompt_line();
                }
            }
            Read::Eof => break,
            Read::Line(line) => {
                match parse_command(&line) {
                    Ok(command) => {
                        if browser.apply(command, Instant::now())? == Flow::Quit {
                            break;
                        }
                        browser.render();
                    }
                    Err(message) => eprintln!("{}", message),
                }
                browser.prompt_line();
            }
        }
    }

    Ok(())
}
