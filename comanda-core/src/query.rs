use crate::{AsValue, Error, Record, Result, SqlWriter, Statement, Value, check_identifier};

/// One conjunctive equality condition: `column = <bound value>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, value: impl AsValue) -> Self {
        Self {
            column: column.into(),
            value: value.as_value(),
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// Description of a single query against one table.
///
/// Configuration methods take the descriptor by value and return the updated one, a
/// retained copy is never affected by later calls on another.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct QueryDef {
    pub table: String,
    pub predicates: Vec<Predicate>,
    pub order: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl QueryDef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Appends `column = value`. An absent value leaves the query unchanged.
    pub fn filter_eq(mut self, column: impl Into<String>, value: impl AsValue) -> Self {
        let value = value.as_value();
        if !value.is_null() {
            self.predicates.push(Predicate {
                column: column.into(),
                value,
            });
        }
        self
    }

    /// Last call wins.
    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            direction: if ascending {
                Direction::Asc
            } else {
                Direction::Desc
            },
        });
        self
    }

    /// Last call wins, zero removes the limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    fn check_identifiers<'a>(&self, columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
        check_identifier(&self.table)?;
        for predicate in &self.predicates {
            check_identifier(&predicate.column)?;
        }
        if let Some(order) = &self.order {
            check_identifier(&order.column)?;
        }
        for column in columns {
            check_identifier(column)?;
        }
        Ok(())
    }

    pub fn select_statement(&self, writer: &impl SqlWriter) -> Result<Statement> {
        self.check_identifiers(std::iter::empty())?;
        let mut statement = Statement::default();
        writer.write_select(&mut statement.sql, self, &mut statement.params);
        Ok(statement)
    }

    /// The column list is derived from the record's own keys.
    pub fn insert_statement(&self, writer: &impl SqlWriter, record: &Record) -> Result<Statement> {
        self.check_identifiers(record.columns())?;
        let mut statement = Statement::default();
        writer.write_insert(&mut statement.sql, &self.table, record, &mut statement.params);
        Ok(statement)
    }

    /// Without predicates the statement targets every row of the table.
    pub fn update_statement(&self, writer: &impl SqlWriter, patch: &Record) -> Result<Statement> {
        if patch.is_empty() {
            return Err(Error::msg(format!(
                "Cannot update table `{}` with an empty set of columns",
                self.table
            )));
        }
        self.check_identifiers(patch.columns())?;
        let mut statement = Statement::default();
        writer.write_update(
            &mut statement.sql,
            &self.table,
            patch,
            &self.predicates,
            &mut statement.params,
        );
        Ok(statement)
    }

    /// Without predicates the statement targets every row of the table.
    pub fn delete_statement(&self, writer: &impl SqlWriter) -> Result<Statement> {
        self.check_identifiers(std::iter::empty())?;
        let mut statement = Statement::default();
        writer.write_delete(
            &mut statement.sql,
            &self.table,
            &self.predicates,
            &mut statement.params,
        );
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenericSqlWriter;

    const WRITER: GenericSqlWriter = GenericSqlWriter;

    fn placeholders(sql: &str) -> Vec<usize> {
        sql.split('$')
            .skip(1)
            .map(|v| {
                v.chars()
                    .take_while(char::is_ascii_digit)
                    .collect::<String>()
                    .parse()
                    .expect("placeholder number")
            })
            .collect()
    }

    #[test]
    fn absent_values_are_skipped() {
        let query = QueryDef::new("orders")
            .filter_eq("store_id", None::<&str>)
            .filter_eq("status", "PRONTO")
            .filter_eq("tableNumber", Value::Null)
            .filter_eq("type", Value::Varchar(None))
            .filter_eq("id", 3);
        let statement = query.select_statement(&WRITER).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT * FROM orders WHERE status = $1 AND id = $2"
        );
        assert_eq!(
            statement.params,
            [Value::Varchar(Some("PRONTO".into())), Value::Int32(Some(3))]
        );
    }

    #[test]
    fn placeholder_count_matches_params() {
        for n in 0..8 {
            let query = (0..n).fold(QueryDef::new("products"), |q, i| {
                q.filter_eq(format!("col{}", i), if i % 3 == 2 { None } else { Some(i) })
            });
            let statement = query.select_statement(&WRITER).unwrap();
            let found = placeholders(&statement.sql);
            assert_eq!(found.len(), statement.params.len());
            assert_eq!(found, (1..=statement.params.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn trailing_clauses_last_call_wins() {
        let query = QueryDef::new("orders")
            .order_by("createdAt", true)
            .limit(10)
            .order_by("id", false)
            .limit(100);
        assert_eq!(
            query.select_statement(&WRITER).unwrap().sql,
            "SELECT * FROM orders ORDER BY id DESC LIMIT 100"
        );
        assert_eq!(
            query.limit(0).select_statement(&WRITER).unwrap().sql,
            "SELECT * FROM orders ORDER BY id DESC"
        );
    }

    #[test]
    fn descriptors_are_independent() {
        let base = QueryDef::new("orders").filter_eq("store_id", "s1");
        let narrowed = base.clone().filter_eq("status", "PRONTO");
        assert_eq!(base.predicates.len(), 1);
        assert_eq!(narrowed.predicates.len(), 2);
    }

    #[test]
    fn insert_column_list_from_record() {
        let record = Record::new().set("name", "Pizza").set("price", 32.5);
        let statement = QueryDef::new("t")
            .insert_statement(&WRITER, &record)
            .unwrap();
        assert_eq!(
            statement.sql,
            "INSERT INTO t (name, price) VALUES ($1, $2) RETURNING *"
        );
        assert_eq!(
            statement.params,
            [Value::Varchar(Some("Pizza".into())), Value::Float64(Some(32.5))]
        );
    }

    #[test]
    fn update_placeholders_are_contiguous() {
        for predicates in 0..5 {
            for columns in 1..5 {
                let query = (0..predicates).fold(QueryDef::new("orders"), |q, i| {
                    q.filter_eq(format!("p{}", i), i as i32)
                });
                let patch = (0..columns)
                    .map(|i| (format!("c{}", i), i as i32))
                    .collect::<Record>();
                let statement = query.update_statement(&WRITER, &patch).unwrap();
                let found = placeholders(&statement.sql);
                assert_eq!(found, (1..=predicates + columns).collect::<Vec<_>>());
                assert_eq!(found.len(), statement.params.len());
                let expected = (0..columns)
                    .chain(0..predicates)
                    .map(|i| Value::Int32(Some(i as i32)))
                    .collect::<Vec<_>>();
                assert_eq!(statement.params, expected);
            }
        }
    }

    #[test]
    fn update_without_columns_is_rejected() {
        assert!(
            QueryDef::new("orders")
                .update_statement(&WRITER, &Record::new())
                .is_err()
        );
    }

    #[test]
    fn unrestricted_update_and_delete() {
        let query = QueryDef::new("orders");
        assert_eq!(
            query
                .update_statement(&WRITER, &Record::new().set("status", "CANCELADO"))
                .unwrap()
                .sql,
            "UPDATE orders SET status = $1 RETURNING *"
        );
        assert_eq!(
            query.delete_statement(&WRITER).unwrap().sql,
            "DELETE FROM orders"
        );
    }

    #[test]
    fn identifiers_are_folded_and_validated() {
        let statement = QueryDef::new("orders")
            .filter_eq("tableNumber", "12")
            .order_by("createdAt", false)
            .select_statement(&WRITER)
            .unwrap();
        assert_eq!(
            statement.sql,
            "SELECT * FROM orders WHERE tablenumber = $1 ORDER BY createdat DESC"
        );
        assert!(
            QueryDef::new("orders")
                .filter_eq("id = 1 OR 1", 1)
                .select_statement(&WRITER)
                .is_err()
        );
        assert!(
            QueryDef::new("orders; DROP TABLE orders")
                .delete_statement(&WRITER)
                .is_err()
        );
    }
}
