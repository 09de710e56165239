use serde::{Deserialize, Serialize};
use std::fmt;

/// Page sizes offered by the user table
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 20];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// User identifier as sent by the backend (numeric or opaque string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Num(i64),
    Text(String),
}

impl UserId {
    /// Parse a user-supplied id. The numeric form is only used when it
    /// prints back to the exact text, so `007` or `+5` stay verbatim.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) if n.to_string() == trimmed => UserId::Num(n),
            _ => UserId::Text(trimmed.to_string()),
        }
    }

    /// Whether both ids address the same resource path, so `42` and `"42"`
    /// name the same user
    pub fn same_as(&self, other: &UserId) -> bool {
        match (self, other) {
            (UserId::Num(a), UserId::Num(b)) => a == b,
            (UserId::Text(a), UserId::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Num(n) => write!(f, "{}", n),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId::Num(n)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId::Text(s.to_string())
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }

    pub fn is_active(self) -> bool {
        self == UserStatus::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical user representation, independent of backend field naming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub status: UserStatus,
}

/// Status selector of the filter bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// The concrete status to filter on, `None` for `All`
    pub fn status(self) -> Option<UserStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(UserStatus::Active),
            StatusFilter::Inactive => Some(UserStatus::Inactive),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
}

/// Zero-based page position as seen by the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    /// One-based page number expected by the backend
    pub fn backend_page(&self) -> usize {
        self.page_index + 1
    }

    /// Number of pages needed to show `total` rows (at least one)
    pub fn page_count(&self, total: u64) -> usize {
        if self.page_size == 0 {
            return 1;
        }
        let pages = total.div_ceil(self.page_size as u64) as usize;
        pages.max(1)
    }
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Username,
    Status,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Username => "username",
            SortField::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Server-side sort model; empty means backend default order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState(pub Option<Sort>);

impl SortState {
    pub fn none() -> Self {
        SortState(None)
    }

    pub fn by(field: SortField, direction: SortDirection) -> Self {
        SortState(Some(Sort { field, direction }))
    }

    pub fn field(&self) -> Option<SortField> {
        self.0.map(|s| s.field)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.0.map(|s| s.direction)
    }

    /// Header-click cycle: none -> asc -> desc -> none.
    /// Clicking another column starts over at asc.
    pub fn cycle(self, field: SortField) -> Self {
        match self.0 {
            Some(Sort {
                field: current,
                direction: SortDirection::Asc,
            }) if current == field => SortState::by(field, SortDirection::Desc),
            Some(Sort {
                field: current,
                direction: SortDirection::Desc,
            }) if current == field => SortState::none(),
            _ => SortState::by(field, SortDirection::Asc),
        }
    }
}

/// Everything a single list request depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: FilterState,
    pub pagination: PaginationState,
    pub sort: SortState,
}

/// One page of users plus the server-reported total
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub total: u64,
}

/// Body of a user creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
}

/// Body of the edit request; never carries password fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateUser {
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_toggles_both_ways() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Inactive);
        assert_eq!(UserStatus::Inactive.toggled(), UserStatus::Active);
    }

    #[test]
    fn user_id_parse_prefers_numbers() {
        assert_eq!(UserId::parse("42"), UserId::Num(42));
        assert_eq!(UserId::parse(" 42 "), UserId::Num(42));
        assert_eq!(
            UserId::parse("65a1f0c2"),
            UserId::Text("65a1f0c2".to_string())
        );
    }

    #[test]
    fn user_id_parse_keeps_non_canonical_numbers_verbatim() {
        assert_eq!(UserId::parse("007"), UserId::Text("007".to_string()));
        assert_eq!(UserId::parse("+5"), UserId::Text("+5".to_string()));
        assert_eq!(UserId::parse("-3"), UserId::Num(-3));
        assert_eq!(UserId::parse("007").to_string(), "007");
    }

    #[test]
    fn numeric_and_text_ids_with_same_digits_are_the_same_user() {
        assert!(UserId::Num(42).same_as(&UserId::Text("42".to_string())));
        assert!(UserId::Text("42".to_string()).same_as(&UserId::Num(42)));
        assert!(!UserId::Num(7).same_as(&UserId::Text("007".to_string())));
        assert!(!UserId::Num(1).same_as(&UserId::Num(2)));
    }

    #[test]
    fn user_id_serializes_untagged() {
        assert_eq!(serde_json::to_string(&UserId::Num(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&UserId::from("abc")).unwrap(),
            "\"abc\""
        );
    }

    #[test]
    fn backend_page_is_one_based() {
        let pagination = PaginationState {
            page_index: 2,
            page_size: 10,
        };
        assert_eq!(pagination.backend_page(), 3);
    }

    #[test]
    fn page_count_rounds_up_and_never_hits_zero() {
        let pagination = PaginationState::default();
        assert_eq!(pagination.page_count(0), 1);
        assert_eq!(pagination.page_count(10), 1);
        assert_eq!(pagination.page_count(11), 2);
    }

    #[test]
    fn sort_cycle_goes_asc_desc_none() {
        let sort = SortState::none().cycle(SortField::Username);
        assert_eq!(sort, SortState::by(SortField::Username, SortDirection::Asc));
        let sort = sort.cycle(SortField::Username);
        assert_eq!(sort, SortState::by(SortField::Username, SortDirection::Desc));
        let sort = sort.cycle(SortField::Username);
        assert_eq!(sort, SortState::none());
    }

    #[test]
    fn sort_cycle_restarts_on_other_column() {
        let sort = SortState::by(SortField::Username, SortDirection::Desc).cycle(SortField::Id);
        assert_eq!(sort, SortState::by(SortField::Id, SortDirection::Asc));
    }

    #[test]
    fn status_filter_maps_to_status() {
        assert_eq!(StatusFilter::All.status(), None);
        assert_eq!(StatusFilter::Active.status(), Some(UserStatus::Active));
        assert_eq!(StatusFilter::Inactive.status(), Some(UserStatus::Inactive));
    }
}
