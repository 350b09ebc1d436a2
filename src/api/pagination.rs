//! Page-number pagination for public list endpoints.

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, SqlitePool};

use super::error::ApiError;
use super::extract::RequestContext;
use crate::db::ListQuery;

pub const PAGE_SIZE: i64 = 20;

/// The `?page=` query parameter; kept as text so bad values can be reported
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// `{count, next, previous, results}`
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    /// A single page holding at most one record
    pub fn single(item: Option<T>) -> Self {
        let results: Vec<T> = item.into_iter().collect();
        Paginated {
            count: results.len() as i64,
            next: None,
            previous: None,
            results,
        }
    }
}

fn invalid_page() -> ApiError {
    ApiError::not_found("Invalid page.")
}

/// Resolve the requested page number against the number of pages.
/// Page 1 always exists, even for an empty list.
pub fn page_number(raw: Option<&str>, count: i64) -> Result<i64, ApiError> {
    let last = ((count + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let number = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => 1,
        Some("last") => last,
        Some(s) => s.parse::<i64>().map_err(|_| invalid_page())?,
    };

    if number < 1 || number > last {
        return Err(invalid_page());
    }
    Ok(number)
}

/// Run `query` for the requested page
pub async fn paginate<T>(
    db: &SqlitePool,
    query: &ListQuery,
    params: &PageParams,
    ctx: &RequestContext,
) -> Result<Paginated<T>, ApiError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let count = query.count(db).await?;
    let number = page_number(params.page.as_deref(), count)?;
    let results = query
        .fetch(db, Some((PAGE_SIZE, (number - 1) * PAGE_SIZE)))
        .await?;

    let next = (number * PAGE_SIZE < count)
        .then(|| ctx.url_with_param("page", Some(&(number + 1).to_string())));
    let previous = match number {
        1 => None,
        2 => Some(ctx.url_with_param("page", None)),
        n => Some(ctx.url_with_param("page", Some(&(n - 1).to_string()))),
    };

    Ok(Paginated {
        count,
        next,
        previous,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_bounds() {
        assert_eq!(page_number(None, 0).unwrap(), 1);
        assert_eq!(page_number(Some("1"), 0).unwrap(), 1);
        assert_eq!(page_number(Some("2"), 21).unwrap(), 2);
        assert_eq!(page_number(Some("last"), 45).unwrap(), 3);

        assert!(page_number(Some("2"), 20).is_err());
        assert!(page_number(Some("0"), 50).is_err());
        assert!(page_number(Some("abc"), 50).is_err());
    }

    #[test]
    fn test_single() {
        let page = Paginated::single(Some(7));
        assert_eq!(page.count, 1);
        assert_eq!(page.results, vec![7]);
        assert!(Paginated::<i32>::single(None).results.is_empty());
    }
}
