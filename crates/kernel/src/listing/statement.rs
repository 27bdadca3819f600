//! SQL rendering of convention listings using SeaQuery.
//!
//! Produces the page query (conventions joined with their category) and the
//! matching COUNT query from a [`ListingQuery`].

use sea_query::{
    Alias, Asterisk, Cond, Condition, Expr, Order, PostgresQueryBuilder, Query,
    SelectStatement, SimpleExpr, Value as SqlValue,
};

use super::predicate::{Operator, Predicate, Value};
use super::types::{ListingQuery, SortOrder};

/// Table holding convention rows.
pub const CONVENTION_TABLE: &str = "convention";

/// Table holding category rows.
pub const CATEGORY_TABLE: &str = "category";

/// SQL for one listing request.
pub struct ListingStatement<'a> {
    query: &'a ListingQuery,
}

impl<'a> ListingStatement<'a> {
    pub fn new(query: &'a ListingQuery) -> Self {
        Self { query }
    }

    /// Build the page SELECT with ordering and LIMIT/OFFSET.
    pub fn build(&self) -> String {
        let mut select = Query::select();

        select
            .column((Alias::new(CONVENTION_TABLE), Asterisk))
            .expr_as(
                Expr::col((Alias::new(CATEGORY_TABLE), Alias::new("name"))),
                Alias::new("category_name"),
            )
            .expr_as(
                Expr::col((Alias::new(CATEGORY_TABLE), Alias::new("slug"))),
                Alias::new("category_slug"),
            )
            .from(Alias::new(CONVENTION_TABLE));

        self.add_join(&mut select);
        self.add_filters(&mut select);

        let order = match self.query.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        select.order_by(
            (
                Alias::new(CONVENTION_TABLE),
                Alias::new(self.query.sort_by.column()),
            ),
            order,
        );
        // Stable paging across equal sort keys.
        select.order_by((Alias::new(CONVENTION_TABLE), Alias::new("id")), Order::Asc);

        select.limit(u64::from(self.query.limit));
        select.offset(self.query.offset());

        select.to_string(PostgresQueryBuilder)
    }

    /// Build the COUNT query over the same filter.
    pub fn build_count(&self) -> String {
        let mut select = Query::select();

        select
            .expr(Expr::col(Asterisk).count())
            .from(Alias::new(CONVENTION_TABLE));

        self.add_join(&mut select);
        self.add_filters(&mut select);

        select.to_string(PostgresQueryBuilder)
    }

    fn add_join(&self, select: &mut SelectStatement) {
        select.inner_join(
            Alias::new(CATEGORY_TABLE),
            Expr::col((Alias::new(CONVENTION_TABLE), Alias::new("category_id")))
                .equals((Alias::new(CATEGORY_TABLE), Alias::new("id"))),
        );
    }

    fn add_filters(&self, select: &mut SelectStatement) {
        if self.query.predicate.is_unconstrained() {
            return;
        }
        select.cond_where(condition(&self.query.predicate));
    }
}

/// Translate a predicate tree into a SeaQuery condition.
fn condition(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::Convention(c) => Cond::all().add(comparison(
            CONVENTION_TABLE,
            c.column.as_str(),
            c.operator,
            &c.value,
        )),
        Predicate::Category(c) => Cond::all().add(comparison(
            CATEGORY_TABLE,
            c.column.as_str(),
            c.operator,
            &c.value,
        )),
        Predicate::All(children) if children.is_empty() => Cond::all().add(Expr::cust("TRUE")),
        Predicate::Any(children) if children.is_empty() => Cond::all().add(Expr::cust("FALSE")),
        Predicate::All(children) => children
            .iter()
            .fold(Cond::all(), |cond, child| cond.add(condition(child))),
        Predicate::Any(children) => children
            .iter()
            .fold(Cond::any(), |cond, child| cond.add(condition(child))),
    }
}

fn comparison(table: &str, column: &str, operator: Operator, value: &Value) -> SimpleExpr {
    if operator == Operator::ContainsInsensitive {
        let pattern = contains_pattern(&value.to_string());
        return Expr::cust_with_values(format!("\"{table}\".\"{column}\" ILIKE $1"), [pattern]);
    }

    let col = Expr::col((Alias::new(table), Alias::new(column)));
    let value: SqlValue = match value {
        Value::Text(s) => s.clone().into(),
        Value::Instant(d) => (*d).into(),
        Value::Bool(b) => (*b).into(),
        Value::Id(u) => (*u).into(),
    };

    match operator {
        Operator::Eq => col.eq(value),
        Operator::Gte => col.gte(value),
        Operator::Lte => col.lte(value),
        Operator::Lt => col.lt(value),
        Operator::ContainsInsensitive => Expr::cust("FALSE"),
    }
}

/// `%text%` with any LIKE metacharacter in `text` matched literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::listing::query_builder::ConventionQueryBuilder;
    use crate::listing::types::SortField;
    use chrono::{TimeZone, Utc};

    fn query(predicate: Predicate) -> ListingQuery {
        ListingQuery::new(predicate)
    }

    #[test]
    fn unfiltered_listing_has_no_where() {
        let q = query(Predicate::always());
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains("FROM \"convention\""));
        assert!(sql.contains("INNER JOIN \"category\""));
        assert!(sql.contains("AS \"category_slug\""));
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("LIMIT 50"));
        assert!(sql.contains("OFFSET 0"));
    }

    #[test]
    fn sort_then_id_tie_breaker() {
        let mut q = query(Predicate::always());
        q.sort_by = SortField::Name;
        q.sort_order = SortOrder::Desc;
        let sql = ListingStatement::new(&q).build();

        assert!(
            sql.contains("ORDER BY \"convention\".\"name\" DESC, \"convention\".\"id\" ASC"),
            "unexpected order clause: {sql}"
        );
    }

    #[test]
    fn pagination_offset() {
        let mut q = query(Predicate::always());
        q.page = 3;
        q.limit = 20;
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains("LIMIT 20"));
        assert!(sql.contains("OFFSET 40"));
    }

    #[test]
    fn count_query_omits_paging() {
        let q = query(ConventionQueryBuilder::new().filter_popular(true).build());
        let sql = ListingStatement::new(&q).build_count();

        assert!(sql.contains("COUNT(*)"));
        assert!(sql.contains("\"convention\".\"is_popular\" ="), "{sql}");
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("ORDER BY"));
    }

    #[test]
    fn text_filters_use_ilike() {
        let q = query(ConventionQueryBuilder::new().filter_by_city("Paris").build());
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains("\"convention\".\"city\" ILIKE '%Paris%'"), "{sql}");
    }

    #[test]
    fn search_renders_disjunction() {
        let q = query(ConventionQueryBuilder::new().search("Japan").build());
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains("\"name\" ILIKE '%Japan%'"), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains("\"description\" ILIKE '%Japan%'"), "{sql}");
    }

    #[test]
    fn date_range_and_overlap() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let q = query(
            ConventionQueryBuilder::new()
                .filter_by_date_between(start, end)
                .build(),
        );
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains("\"convention\".\"start_date\" <="), "{sql}");
        assert!(sql.contains("\"convention\".\"end_date\" >="), "{sql}");
        assert!(sql.contains("2024-06-30"), "{sql}");
    }

    #[test]
    fn category_slug_filters_joined_table() {
        let q = query(
            ConventionQueryBuilder::new()
                .filter_by_category_slug("manga-anime")
                .build(),
        );
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains("\"category\".\"slug\" = 'manga-anime'"), "{sql}");
    }

    #[test]
    fn empty_any_matches_nothing() {
        let q = query(Predicate::All(vec![Predicate::Any(vec![])]));
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains("WHERE"), "{sql}");
        assert!(sql.contains("FALSE"), "{sql}");
    }

    #[test]
    fn search_wildcards_match_literally() {
        let q = query(ConventionQueryBuilder::new().search("100%_off").build());
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains(r"ILIKE E'%100\\%\\_off%'"), "{sql}");
    }

    #[test]
    fn contains_pattern_wraps_and_escapes() {
        assert_eq!(contains_pattern("Lyon"), "%Lyon%");
        assert_eq!(contains_pattern(""), "%%");
        assert_eq!(contains_pattern("50%"), r"%50\%%");
        assert_eq!(contains_pattern("ile_de"), r"%ile\_de%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn huge_page_renders_clamped_offset() {
        let mut q = query(Predicate::always());
        q.page = u32::MAX;
        q.limit = u32::MAX;
        let sql = ListingStatement::new(&q).build();

        assert!(sql.contains("LIMIT 4294967295"), "{sql}");
        assert!(sql.contains("OFFSET 9223372036854775807"), "{sql}");
    }
}
