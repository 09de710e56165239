//! Text rendering of the user table.
//!
//! The table is a pure view over controller state: rows arrive already
//! paged and ordered by the server and are printed as-is.

use colored::Colorize;
use serde::Serialize;
use useradmin_core::{
    PaginationState, SortDirection, SortField, SortState, UserRecord, UserStatus,
    PAGE_SIZE_OPTIONS,
};

use crate::output::status_label;

/// JSON shape of a rendered page
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub users: &'a [UserRecord],
    pub total: u64,
    /// One-based page number
    pub page: usize,
    pub page_size: usize,
}

impl<'a> PageView<'a> {
    pub fn new(users: &'a [UserRecord], total: u64, pagination: &PaginationState) -> Self {
        Self {
            users,
            total,
            page: pagination.backend_page(),
            page_size: pagination.page_size,
        }
    }
}

fn header(label: &str, field: SortField, sort: &SortState) -> String {
    match sort.0 {
        Some(s) if s.field == field => match s.direction {
            SortDirection::Asc => format!("{} ▲", label),
            SortDirection::Desc => format!("{} ▼", label),
        },
        _ => label.to_string(),
    }
}

fn toggle_label(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => "deactivate",
        UserStatus::Inactive => "activate",
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Render rows with an actions column and a pagination footer
pub fn render_table(
    rows: &[UserRecord],
    total: u64,
    pagination: &PaginationState,
    sort: &SortState,
) -> String {
    let id_header = header("ID", SortField::Id, sort);
    let user_header = header("Username", SortField::Username, sort);
    let status_header = header("Status", SortField::Status, sort);

    let ids: Vec<String> = rows.iter().map(|u| u.id.to_string()).collect();
    let id_width = ids
        .iter()
        .map(|s| s.chars().count())
        .chain([id_header.chars().count()])
        .max()
        .unwrap_or(0);
    let user_width = rows
        .iter()
        .map(|u| u.username.chars().count())
        .chain([user_header.chars().count()])
        .max()
        .unwrap_or(0);
    let status_width = "Inactive".len().max(status_header.chars().count());

    let mut out = String::new();
    out.push_str(&format!(
        "{}  {}  {}  {}\n",
        pad(&id_header, id_width).bold(),
        pad(&user_header, user_width).bold(),
        pad(&status_header, status_width).bold(),
        "Actions".bold()
    ));

    if rows.is_empty() {
        out.push_str(&format!("{}\n", "No users found".dimmed()));
    }

    for (user, id) in rows.iter().zip(&ids) {
        let status_plain = match user.status {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        };
        let status_padding = " ".repeat(status_width - status_plain.len());
        out.push_str(&format!(
            "{}  {}  {}{}  {}\n",
            pad(id, id_width).cyan(),
            pad(&user.username, user_width),
            status_label(user.status),
            status_padding,
            format!("edit · {} · delete", toggle_label(user.status)).dimmed()
        ));
    }

    out.push_str(&footer(rows.len(), total, pagination));
    out
}

fn footer(shown: usize, total: u64, pagination: &PaginationState) -> String {
    let first = pagination.page_index as u64 * pagination.page_size as u64;
    let range = if shown == 0 {
        format!("0 of {}", total)
    } else {
        format!("{}–{} of {}", first + 1, first + shown as u64, total)
    };

    let sizes: Vec<String> = PAGE_SIZE_OPTIONS
        .iter()
        .map(|&size| {
            if size == pagination.page_size {
                format!("[{}]", size)
            } else {
                size.to_string()
            }
        })
        .collect();

    format!(
        "{}  ·  page {}/{}  ·  rows per page: {}",
        range,
        pagination.backend_page(),
        pagination.page_count(total),
        sizes.join(" ")
    )
    .dimmed()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use useradmin_core::UserId;

    fn rows() -> Vec<UserRecord> {
        vec![
            UserRecord {
                id: UserId::Num(1),
                username: "alice".to_string(),
                status: UserStatus::Active,
            },
            UserRecord {
                id: UserId::Num(2),
                username: "bob".to_string(),
                status: UserStatus::Inactive,
            },
        ]
    }

    #[test]
    fn rows_are_printed_in_server_order() {
        colored::control::set_override(false);
        let text = render_table(
            &rows(),
            2,
            &PaginationState::default(),
            &SortState::none(),
        );

        let alice = text.find("alice").unwrap();
        let bob = text.find("bob").unwrap();
        assert!(alice < bob);
        assert!(text.contains("edit · deactivate · delete"));
        assert!(text.contains("edit · activate · delete"));
    }

    #[test]
    fn sorted_column_gets_marker() {
        colored::control::set_override(false);
        let text = render_table(
            &rows(),
            2,
            &PaginationState::default(),
            &SortState::by(SortField::Username, SortDirection::Desc),
        );
        assert!(text.contains("Username ▼"));
        assert!(!text.contains("ID ▲"));
    }

    #[test]
    fn footer_reports_range_and_pages() {
        colored::control::set_override(false);
        let pagination = PaginationState {
            page_index: 1,
            page_size: 5,
        };
        let text = render_table(&rows(), 7, &pagination, &SortState::none());
        assert!(text.contains("6–7 of 7"));
        assert!(text.contains("page 2/2"));
        assert!(text.contains("[5] 10 20"));
    }

    #[test]
    fn empty_page_says_so() {
        colored::control::set_override(false);
        let text = render_table(&[], 0, &PaginationState::default(), &SortState::none());
        assert!(text.contains("No users found"));
        assert!(text.contains("0 of 0"));
        assert!(text.contains("page 1/1"));
    }
}
