use diesel::prelude::*;
use jiff_diesel::DateTime;

/// Category row as read from the database
#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Path relative to the public root, e.g. `categories/<token>.jpg`
    pub image: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Insert payload; id and timestamps come from the database
#[derive(Debug, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

/// Column set written back by a save; `updated_at` is set by the repository
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(treat_none_as_null = true)]
pub struct CategoryChanges<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: Option<&'a str>,
}

impl<'a> From<&'a Category> for CategoryChanges<'a> {
    fn from(category: &'a Category) -> Self {
        Self {
            name: &category.name,
            description: &category.description,
            image: category.image.as_deref(),
        }
    }
}
