//! SQL text for the two statements a bound list ever runs: the listing query
//! and the disambiguating identifier lookup. Names come from code or config,
//! never from the user, but they are still validated and quoted so a typo in a
//! binding fails at construction instead of at the first keypress.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("{role} name cannot be empty")]
    EmptyIdentifier { role: &'static str },
    #[error("invalid {role} name `{name}`")]
    InvalidIdentifier { role: &'static str, name: String },
}

/// Sort direction appended to an `ORDER BY` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One `ORDER BY` term, e.g. `songs.track` or `albums.name DESC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: Direction,
}

impl SortKey {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let mut parts = raw.split_whitespace();
        let column = parts.next().ok_or(QueryError::EmptyIdentifier { role: "sort key" })?;
        let direction = match parts.next().map(str::to_ascii_uppercase).as_deref() {
            None | Some("ASC") => Direction::Asc,
            Some("DESC") => Direction::Desc,
            Some(_) => {
                return Err(QueryError::InvalidIdentifier {
                    role: "sort key",
                    name: raw.to_string(),
                })
            }
        };
        if parts.next().is_some() {
            return Err(QueryError::InvalidIdentifier {
                role: "sort key",
                name: raw.to_string(),
            });
        }
        validate_identifier(column, "sort key")?;
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }

    fn to_sql(&self) -> String {
        match self.direction {
            Direction::Asc => quote_identifier(&self.column),
            Direction::Desc => format!("{} DESC", quote_identifier(&self.column)),
        }
    }
}

/// Accept `name` or `table.name` where each segment is a plain SQL identifier.
pub fn validate_identifier(name: &str, role: &'static str) -> Result<(), QueryError> {
    if name.trim().is_empty() {
        return Err(QueryError::EmptyIdentifier { role });
    }
    let valid = name.split('.').all(|segment| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    });
    if valid {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier {
            role,
            name: name.to_string(),
        })
    }
}

/// Quote each dot-separated segment for SQLite.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|segment| format!("\"{}\"", segment.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Validated column bindings of one list, rendered into SQL on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    table: String,
    display_field: String,
    id_field: String,
    sort_keys: Vec<SortKey>,
}

impl ListQuery {
    pub fn new(
        table: &str,
        display_field: &str,
        id_field: &str,
        sort_keys: &[&str],
    ) -> Result<Self, QueryError> {
        validate_identifier(table, "table")?;
        validate_identifier(display_field, "display field")?;
        validate_identifier(id_field, "id field")?;

        let sort_keys = if sort_keys.is_empty() {
            vec![SortKey {
                column: display_field.to_string(),
                direction: Direction::Asc,
            }]
        } else {
            sort_keys
                .iter()
                .map(|raw| SortKey::parse(raw))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            table: table.to_string(),
            display_field: display_field.to_string(),
            id_field: id_field.to_string(),
            sort_keys,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn display_field(&self) -> &str {
        &self.display_field
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    fn select_clause(&self) -> String {
        format!(
            "SELECT {}, {} FROM {}",
            quote_identifier(&self.display_field),
            quote_identifier(&self.id_field),
            quote_identifier(&self.table)
        )
    }

    /// The row id is always the last ordering term so rows with equal sort
    /// values come back in the same order on every run.
    fn order_clause(&self) -> String {
        let mut terms: Vec<String> = self.sort_keys.iter().map(SortKey::to_sql).collect();
        terms.push(quote_identifier(&self.id_field));
        format!(" ORDER BY {}", terms.join(", "))
    }

    /// Listing statement. With a link field the filter binds to `?1`.
    pub fn list_sql(&self, link_field: Option<&str>) -> String {
        match link_field {
            Some(field) => format!(
                "{} WHERE {} = ?1{}",
                self.select_clause(),
                quote_identifier(field),
                self.order_clause()
            ),
            None => format!("{}{}", self.select_clause(), self.order_clause()),
        }
    }

    /// Identifier lookup for a display value (`?1`), narrowed to the current
    /// parent (`?2`) when the list is linked and filtered. `IS` keeps rows
    /// with a NULL display value reachable.
    pub fn lookup_sql(&self, link_field: Option<&str>) -> String {
        let display = quote_identifier(&self.display_field);
        let id = quote_identifier(&self.id_field);
        match link_field {
            Some(field) => format!(
                "{} WHERE {} IS ?1 AND {} = ?2 ORDER BY {}",
                self.select_clause(),
                display,
                quote_identifier(field),
                id
            ),
            None => format!(
                "{} WHERE {} IS ?1 ORDER BY {}",
                self.select_clause(),
                display,
                id
            ),
        }
    }
}
