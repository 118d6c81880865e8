//! Filter and pagination translation for song listings.
//!
//! Callers describe a listing as an ordered list of exact-match [`Filter`]s
//! plus a [`Paginator`]. This module turns that into SQL fragments whose values
//! are always bound parameters; only column names, which come from the closed
//! [`FilterField`] set, are ever written into the statement text.

use crate::repositories::Paginator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Columns a song listing may be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Artist,
    Title,
    ReleaseDate,
    Lyrics,
    Link,
}

impl FilterField {
    /// Every filterable field, in the canonical order raw parameters are read.
    pub const ALL: [FilterField; 5] = [
        FilterField::Artist,
        FilterField::Title,
        FilterField::ReleaseDate,
        FilterField::Lyrics,
        FilterField::Link,
    ];

    /// Qualified column in the songs/artists join.
    pub fn column(self) -> &'static str {
        match self {
            FilterField::Artist => "a.name",
            FilterField::Title => "s.title",
            FilterField::ReleaseDate => "s.release_date",
            FilterField::Lyrics => "s.lyrics",
            FilterField::Link => "s.link",
        }
    }

    /// Canonical parameter name.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Artist => "artist",
            FilterField::Title => "title",
            FilterField::ReleaseDate => "release_date",
            FilterField::Lyrics => "lyrics",
            FilterField::Link => "link",
        }
    }

    /// Parameter names accepted for this field, canonical name first.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            FilterField::Artist => &["artist", "group"],
            FilterField::Title => &["title", "song"],
            FilterField::ReleaseDate => &["release_date", "releaseDate"],
            FilterField::Lyrics => &["lyrics", "text"],
            FilterField::Link => &["link"],
        }
    }

    /// Look up a field by any of its accepted parameter names.
    pub fn from_param(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.param_names().contains(&name))
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact-match constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: FilterField,
    pub value: String,
}

impl Filter {
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Options for listing songs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongQuery {
    /// ANDed together in order
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub paginator: Paginator,
}

impl SongQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact-match filter.
    pub fn filter(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.filters.push(Filter::new(field, value));
        self
    }

    pub fn paginate(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    /// Build a query from raw key/value parameters, such as a URL query string.
    ///
    /// Filters are read in the canonical [`FilterField::ALL`] order regardless
    /// of the order the parameters arrive in. Unknown keys and empty values
    /// are ignored; if a field appears more than once the first non-empty
    /// value wins. `page` and `limit` (or `size`) fall back to the paginator
    /// defaults when missing or malformed.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let params: Vec<(&str, &str)> = params.into_iter().collect();
        let lookup = |names: &[&str]| {
            params
                .iter()
                .find(|(key, value)| names.contains(key) && !value.is_empty())
                .map(|(_, value)| *value)
        };

        let filters = FilterField::ALL
            .into_iter()
            .filter_map(|field| lookup(field.param_names()).map(|value| Filter::new(field, value)))
            .collect();

        let paginator = Paginator::from_raw(lookup(&["page"]), lookup(&["limit", "size"]));

        Self { filters, paginator }
    }
}

/// A value bound into a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Integer(i64),
}

/// Predicate fragment produced from a filter list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterClause {
    /// Either empty or ` WHERE <cond> AND <cond> ...`
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl FilterClause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Range fragment produced from a paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageClause {
    /// Always ` LIMIT ? OFFSET ?`
    pub sql: &'static str,
    pub limit: i64,
    pub offset: i64,
}

impl PageClause {
    pub fn binds(&self) -> [BindValue; 2] {
        [BindValue::Integer(self.limit), BindValue::Integer(self.offset)]
    }
}

/// Translate filters into a `WHERE` fragment. An empty filter list yields an
/// empty fragment, which matches every row.
pub fn build_filter_clause(filters: &[Filter]) -> FilterClause {
    if filters.is_empty() {
        return FilterClause::default();
    }

    let conditions: Vec<String> = filters
        .iter()
        .map(|filter| format!("{} = ?", filter.field.column()))
        .collect();
    let binds = filters
        .iter()
        .map(|filter| BindValue::Text(filter.value.clone()))
        .collect();

    FilterClause {
        sql: format!(" WHERE {}", conditions.join(" AND ")),
        binds,
    }
}

/// Translate a paginator into a `LIMIT ? OFFSET ?` fragment.
pub fn build_page_clause(paginator: &Paginator) -> PageClause {
    PageClause {
        sql: " LIMIT ? OFFSET ?",
        limit: i64::from(paginator.limit()),
        offset: i64::try_from(paginator.offset()).unwrap_or(i64::MAX),
    }
}

const SONG_SELECT: &str = "SELECT \
        s.id AS id, \
        a.name AS artist, \
        s.title AS title, \
        s.release_date AS release_date, \
        s.lyrics AS lyrics, \
        s.link AS link \
     FROM songs s \
     INNER JOIN artists a ON a.id = s.artist_id";

const SONG_COUNT: &str = "SELECT COUNT(*) AS count \
     FROM songs s \
     INNER JOIN artists a ON a.id = s.artist_id";

/// Complete statements for one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SongQuerySpec {
    pub select_sql: String,
    pub select_binds: Vec<BindValue>,
    pub count_sql: String,
    pub count_binds: Vec<BindValue>,
}

pub(crate) fn build_song_query_spec(query: &SongQuery) -> SongQuerySpec {
    let filter = build_filter_clause(&query.filters);
    let page = build_page_clause(&query.paginator);

    let mut select_sql = String::from(SONG_SELECT);
    select_sql.push_str(&filter.sql);
    select_sql.push_str(" ORDER BY s.id ASC");
    select_sql.push_str(page.sql);

    let mut select_binds = filter.binds.clone();
    select_binds.extend(page.binds());

    let mut count_sql = String::from(SONG_COUNT);
    count_sql.push_str(&filter.sql);

    SongQuerySpec {
        select_sql,
        select_binds,
        count_sql,
        count_binds: filter.binds,
    }
}

pub(crate) fn build_song_count_sql(filters: &[Filter]) -> (String, Vec<BindValue>) {
    let filter = build_filter_clause(filters);
    (format!("{}{}", SONG_COUNT, filter.sql), filter.binds)
}

/// Single-row lookup statement, sharing the listing's projection.
pub(crate) fn song_by_id_sql() -> String {
    format!("{} WHERE s.id = ?", SONG_SELECT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_produce_empty_clause() {
        let clause = build_filter_clause(&[]);
        assert!(clause.is_empty());
        assert!(clause.binds.is_empty());
    }

    #[test]
    fn test_filters_are_anded_in_order_with_bound_values() {
        let filters = vec![
            Filter::new(FilterField::Title, "Hello"),
            Filter::new(FilterField::Artist, "Adele"),
        ];
        let clause = build_filter_clause(&filters);

        assert_eq!(clause.sql, " WHERE s.title = ? AND a.name = ?");
        assert_eq!(
            clause.binds,
            vec![
                BindValue::Text("Hello".to_string()),
                BindValue::Text("Adele".to_string())
            ]
        );
    }

    #[test]
    fn test_filter_values_never_reach_sql_text() {
        let filters = vec![Filter::new(FilterField::Artist, "x' OR '1'='1")];
        let clause = build_filter_clause(&filters);

        assert!(!clause.sql.contains("OR"));
        assert_eq!(clause.binds, vec![BindValue::Text("x' OR '1'='1".to_string())]);
    }

    #[test]
    fn test_page_clause() {
        let clause = build_page_clause(&Paginator::new(3, 10));
        assert_eq!(clause.sql, " LIMIT ? OFFSET ?");
        assert_eq!(clause.limit, 10);
        assert_eq!(clause.offset, 20);

        let defaulted = build_page_clause(&Paginator::default());
        assert_eq!((defaulted.limit, defaulted.offset), (10, 0));
    }

    #[test]
    fn test_song_query_spec() {
        let query = SongQuery::new()
            .filter(FilterField::Artist, "Muse")
            .paginate(Paginator::new(2, 5));
        let spec = build_song_query_spec(&query);

        assert!(spec
            .select_sql
            .ends_with(" WHERE a.name = ? ORDER BY s.id ASC LIMIT ? OFFSET ?"));
        assert_eq!(
            spec.select_binds,
            vec![
                BindValue::Text("Muse".to_string()),
                BindValue::Integer(5),
                BindValue::Integer(5)
            ]
        );
        assert!(spec.count_sql.ends_with(" WHERE a.name = ?"));
        assert_eq!(spec.count_binds, vec![BindValue::Text("Muse".to_string())]);
    }

    #[test]
    fn test_from_param_accepts_aliases() {
        assert_eq!(FilterField::from_param("group"), Some(FilterField::Artist));
        assert_eq!(FilterField::from_param("song"), Some(FilterField::Title));
        assert_eq!(
            FilterField::from_param("releaseDate"),
            Some(FilterField::ReleaseDate)
        );
        assert_eq!(FilterField::from_param("text"), Some(FilterField::Lyrics));
        assert_eq!(FilterField::from_param("link"), Some(FilterField::Link));
        assert_eq!(FilterField::from_param("artist_id"), None);
        assert_eq!(FilterField::from_param("id; DROP TABLE songs"), None);
    }

    #[test]
    fn test_song_query_from_params() {
        let params = [
            ("link", "https://example.com"),
            ("page", "2"),
            ("group", "Adele"),
            ("title", ""),
            ("unknown", "ignored"),
            ("limit", "oops"),
        ];
        let query = SongQuery::from_params(params);

        assert_eq!(
            query.filters,
            vec![
                Filter::new(FilterField::Artist, "Adele"),
                Filter::new(FilterField::Link, "https://example.com"),
            ]
        );
        assert_eq!(query.paginator, Paginator::new(2, 10));
    }

    #[test]
    fn test_song_query_from_empty_params() {
        let query = SongQuery::from_params(std::iter::empty());
        assert!(query.filters.is_empty());
        assert_eq!(query.paginator, Paginator::default());
    }

    #[test]
    fn test_song_query_deserialize_defaults() {
        let query: SongQuery = serde_json::from_str("{}").unwrap();
        assert!(query.filters.is_empty());
        assert_eq!(query.paginator, Paginator::default());

        let clause = build_page_clause(&Paginator {
            page: 0,
            page_size: 0,
        });
        assert_eq!(clause.limit, 10);
        assert_eq!(clause.offset, 0);
    }
}
