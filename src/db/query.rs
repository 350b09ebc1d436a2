//! Dynamic WHERE-clause builder for list endpoints.
//!
//! Filters that come from trusted code are added as literal SQL; values that
//! come from query strings are always bound.

use sqlx::{sqlite::SqliteRow, FromRow, SqlitePool};

#[derive(Debug, Clone)]
pub struct ListQuery {
    table: &'static str,
    order_by: &'static str,
    conditions: Vec<String>,
    bindings: Vec<String>,
}

impl ListQuery {
    pub fn new(table: &'static str, order_by: &'static str) -> Self {
        Self {
            table,
            order_by,
            conditions: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Add a fixed condition, e.g. `is_active = 1`
    pub fn filter(mut self, condition: &'static str) -> Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// `column = ?` when a non-empty value is given
    pub fn filter_eq(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.conditions.push(format!("{} = ?", column));
            self.bindings.push(v.to_string());
        }
        self
    }

    /// `column = 1/0` for an optional boolean filter
    pub fn filter_bool(mut self, column: &'static str, value: Option<bool>) -> Self {
        if let Some(v) = value {
            self.conditions
                .push(format!("{} = {}", column, if v { 1 } else { 0 }));
        }
        self
    }

    /// Case-insensitive substring match across any of the columns
    pub fn search(mut self, columns: &[&'static str], term: Option<&str>) -> Self {
        let term = match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => return self,
        };

        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let clauses: Vec<String> = columns
            .iter()
            .map(|c| format!("LOWER({}) LIKE ? ESCAPE '\\'", c))
            .collect();
        self.conditions.push(format!("({})", clauses.join(" OR ")));
        for _ in columns {
            self.bindings.push(pattern.clone());
        }
        self
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub async fn count(&self, db: &SqlitePool) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {} {}", self.table, self.where_clause());
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for binding in &self.bindings {
            query = query.bind(binding);
        }
        query.fetch_one(db).await
    }

    /// Fetch rows in the configured order; `window` is `(limit, offset)`
    pub async fn fetch<T>(
        &self,
        db: &SqlitePool,
        window: Option<(i64, i64)>,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut sql = format!(
            "SELECT * FROM {} {} ORDER BY {}",
            self.table,
            self.where_clause(),
            self.order_by
        );
        if window.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
        }

        let mut query = sqlx::query_as::<_, T>(&sql);
        for binding in &self.bindings {
            query = query.bind(binding);
        }
        if let Some((limit, offset)) = window {
            query = query.bind(limit).bind(offset);
        }
        query.fetch_all(db).await
    }

    /// First row in order, if any
    pub async fn first<T>(&self, db: &SqlitePool) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        Ok(self.fetch(db, Some((1, 0))).await?.into_iter().next())
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_clause_composition() {
        let q = ListQuery::new("services", "created_at")
            .filter("is_active = 1")
            .filter_eq("service_type", Some("susu"))
            .filter_eq("icon", None)
            .filter_eq("title", Some(""))
            .filter_bool("is_active", Some(false));

        assert_eq!(
            q.where_clause(),
            "WHERE is_active = 1 AND service_type = ? AND is_active = 0"
        );
        assert_eq!(q.bindings, vec!["susu".to_string()]);
    }

    #[test]
    fn test_search_binds_each_column() {
        let q = ListQuery::new("blog_posts", "id").search(&["title", "excerpt"], Some(" 50%_Off "));
        assert_eq!(q.bindings.len(), 2);
        assert_eq!(q.bindings[0], "%50\\%\\_off%");
        assert!(q.where_clause().contains("LOWER(title) LIKE ?"));
        assert!(q.where_clause().contains(" OR "));
    }

    #[test]
    fn test_blank_search_ignored() {
        let q = ListQuery::new("blog_posts", "id").search(&["title"], Some("   "));
        assert_eq!(q.where_clause(), "");
    }
}
