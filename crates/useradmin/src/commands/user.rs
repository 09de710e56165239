use crate::cli::OutputFormat;
use crate::commands::finish_action;
use crate::prompt::{self, TermConfirm};
use crate::table::{render_table, PageView};
use anyhow::{anyhow, Result};
use useradmin_core::{
    FilterState, FormValues, ListQuery, PaginationState, SortState, UserDirectory, UserId,
    UserRecord, UserStatus, UsersPage, PAGE_SIZE_OPTIONS,
};

/// Fetch the page for the controller's current query, failing on error
fn load(page: &mut UsersPage<'_>) -> Result<()> {
    if page.refresh() {
        return Ok(());
    }
    let message = page
        .drain_notices()
        .into_iter()
        .last()
        .map(|n| n.message)
        .unwrap_or_else(|| "no response".to_string());
    Err(anyhow!("Failed to list users: {}", message))
}

pub fn print_page(page: &UsersPage<'_>, format: OutputFormat) {
    let state = page.state();
    match format {
        OutputFormat::Json => {
            let view = PageView::new(&state.rows, state.total, &state.pagination);
            if let Ok(json) = serde_json::to_string_pretty(&view) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!(
                "{}",
                render_table(&state.rows, state.total, &state.pagination, &state.sort)
            );
        }
    }
}

pub fn handle_list(
    client: &dyn UserDirectory,
    query: ListQuery,
    format: OutputFormat,
) -> Result<()> {
    let mut page = UsersPage::with_query(client, query);
    load(&mut page)?;
    print_page(&page, format);
    Ok(())
}

pub fn handle_create(
    client: &dyn UserDirectory,
    username: &str,
    password: Option<&str>,
    confirm_password: Option<&str>,
    show_password: bool,
    format: OutputFormat,
) -> Result<()> {
    let (password, confirm_password) = match (password, confirm_password) {
        (Some(p), Some(c)) => (p.to_string(), c.to_string()),
        // A password given as a flag is not asked for twice
        (Some(p), None) => (p.to_string(), p.to_string()),
        (None, confirm) => {
            let p = prompt::password("Password", show_password)?;
            let c = match confirm {
                Some(c) => c.to_string(),
                None => prompt::password("Confirm password", show_password)?,
            };
            (p, c)
        }
    };

    let mut page = UsersPage::new(client);
    page.open_create();
    let outcome = page.submit_dialog(FormValues {
        username: username.to_string(),
        password,
        confirm_password,
    });
    finish_action(&mut page, outcome, format)
}

pub fn handle_edit(
    client: &dyn UserDirectory,
    id: &str,
    username: &str,
    format: OutputFormat,
) -> Result<()> {
    let id = UserId::parse(id);

    // The update carries only the id and the new username, so the
    // current record does not need to be fetched first
    let current = UserRecord {
        id,
        username: String::new(),
        status: UserStatus::Active,
    };

    let mut page = UsersPage::new(client);
    page.open_edit(&current);
    let outcome = page.submit_dialog(FormValues::username(username));
    finish_action(&mut page, outcome, format)
}

pub fn handle_toggle(
    client: &dyn UserDirectory,
    id: &str,
    current: Option<UserStatus>,
    yes: bool,
    format: OutputFormat,
) -> Result<()> {
    let id = UserId::parse(id);
    let current = match current {
        Some(status) => status,
        None => lookup(client, &id)?.status,
    };

    let mut page = UsersPage::new(client);
    let outcome = page.toggle_status(&id, current, &TermConfirm::new(yes));
    finish_action(&mut page, outcome, format)
}

pub fn handle_delete(
    client: &dyn UserDirectory,
    id: &str,
    yes: bool,
    format: OutputFormat,
) -> Result<()> {
    let id = UserId::parse(id);
    let mut page = UsersPage::new(client);
    let outcome = page.delete_user(&id, &TermConfirm::new(yes));
    finish_action(&mut page, outcome, format)
}

/// Find a user's row by searching for its id
fn lookup(client: &dyn UserDirectory, id: &UserId) -> Result<UserRecord> {
    let largest = PAGE_SIZE_OPTIONS.iter().copied().max().unwrap_or(20);
    let mut page = UsersPage::with_query(
        client,
        ListQuery {
            filter: FilterState {
                search: id.to_string(),
                ..FilterState::default()
            },
            pagination: PaginationState {
                page_index: 0,
                page_size: largest,
            },
            sort: SortState::none(),
        },
    );
    load(&mut page)?;

    page.row(id).cloned().ok_or_else(|| {
        anyhow!(
            "User {} not found in search results; pass --current active|inactive",
            id
        )
    })
}
