use crate::{
    ColumnDef, ColumnDefault, ColumnType, Direction, OrderBy, Predicate, QueryDef, Record,
    TableDef, Value, separated_by,
};
use std::fmt::Write;

/// Dialect printer converting query descriptors and table definitions into SQL text.
///
/// Every `write_*` method that emits placeholders pushes the corresponding value into
/// `params`, the placeholder number is the length of `params` right after the push. This
/// keeps text and bound values aligned no matter in which order clauses are written.
pub trait SqlWriter {
    /// Identifiers are folded to lower case instead of being quoted.
    fn write_identifier(&self, out: &mut String, value: &str) {
        out.extend(value.chars().map(|c| c.to_ascii_lowercase()));
    }

    fn write_placeholder(&self, out: &mut String, index: usize) {
        let _ = write!(out, "${}", index);
    }

    fn write_bind(&self, out: &mut String, params: &mut Vec<Value>, value: &Value) {
        params.push(value.clone());
        self.write_placeholder(out, params.len());
    }

    fn write_column_type(&self, out: &mut String, value: &ColumnType) {
        match value {
            ColumnType::Uuid => out.push_str("UUID"),
            ColumnType::Serial => out.push_str("INTEGER"),
            ColumnType::Text => out.push_str("TEXT"),
            ColumnType::Boolean => out.push_str("BOOLEAN"),
            ColumnType::Integer => out.push_str("INTEGER"),
            ColumnType::BigInt => out.push_str("BIGINT"),
            ColumnType::Numeric(precision, scale) => {
                let _ = write!(out, "NUMERIC({},{})", precision, scale);
            }
            ColumnType::Json => out.push_str("JSON"),
        }
    }

    fn write_column_default(&self, out: &mut String, value: &ColumnDefault) {
        match value {
            ColumnDefault::Boolean(v) => out.push_str(if *v { "true" } else { "false" }),
            ColumnDefault::GeneratedUuid => out.push_str("uuid()"),
        }
    }

    fn write_column_def(&self, out: &mut String, column: &ColumnDef) {
        self.write_identifier(out, column.name);
        out.push(' ');
        self.write_column_type(out, &column.column_type);
        if !column.nullable && !column.primary_key {
            out.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default {
            out.push_str(" DEFAULT ");
            self.write_column_default(out, default);
        }
        if column.primary_key {
            out.push_str(" PRIMARY KEY");
        }
        if column.unique && !column.primary_key {
            out.push_str(" UNIQUE");
        }
    }

    fn write_create_table(&self, out: &mut String, table: &TableDef) {
        out.push_str("CREATE TABLE IF NOT EXISTS ");
        self.write_identifier(out, table.name);
        out.push_str(" (\n");
        separated_by(
            out,
            table.columns,
            |out, v| self.write_column_def(out, v),
            ",\n",
        );
        for unique in table.unique {
            out.push_str(",\nUNIQUE (");
            separated_by(
                out,
                unique.iter(),
                |out, v| self.write_identifier(out, v),
                ", ",
            );
            out.push(')');
        }
        out.push_str("\n)");
    }

    fn write_add_column(&self, out: &mut String, table: &str, column: &ColumnDef) {
        out.push_str("ALTER TABLE ");
        self.write_identifier(out, table);
        out.push_str(" ADD COLUMN IF NOT EXISTS ");
        self.write_column_def(out, column);
    }

    fn write_where(&self, out: &mut String, predicates: &[Predicate], params: &mut Vec<Value>) {
        if predicates.is_empty() {
            return;
        }
        out.push_str(" WHERE ");
        separated_by(
            out,
            predicates,
            |out, v| {
                self.write_identifier(out, &v.column);
                out.push_str(" = ");
                self.write_bind(out, params, &v.value);
            },
            " AND ",
        );
    }

    fn write_order_by(&self, out: &mut String, order: &OrderBy) {
        out.push_str(" ORDER BY ");
        self.write_identifier(out, &order.column);
        out.push_str(match order.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        });
    }

    fn write_limit(&self, out: &mut String, limit: u32) {
        let _ = write!(out, " LIMIT {}", limit);
    }

    fn write_select(&self, out: &mut String, query: &QueryDef, params: &mut Vec<Value>) {
        out.push_str("SELECT * FROM ");
        self.write_identifier(out, &query.table);
        self.write_where(out, &query.predicates, params);
        if let Some(order) = &query.order {
            self.write_order_by(out, order);
        }
        if let Some(limit) = query.limit {
            self.write_limit(out, limit);
        }
    }

    fn write_insert(
        &self,
        out: &mut String,
        table: &str,
        record: &Record,
        params: &mut Vec<Value>,
    ) {
        out.push_str("INSERT INTO ");
        self.write_identifier(out, table);
        if record.is_empty() {
            out.push_str(" DEFAULT VALUES");
        } else {
            out.push_str(" (");
            separated_by(
                out,
                record.columns(),
                |out, v| self.write_identifier(out, v),
                ", ",
            );
            out.push_str(") VALUES (");
            separated_by(
                out,
                record.values(),
                |out, v| self.write_bind(out, params, v),
                ", ",
            );
            out.push(')');
        }
        out.push_str(" RETURNING *");
    }

    /// The SET clause is written first, so its placeholders precede the ones of the WHERE clause.
    fn write_update(
        &self,
        out: &mut String,
        table: &str,
        patch: &Record,
        predicates: &[Predicate],
        params: &mut Vec<Value>,
    ) {
        out.push_str("UPDATE ");
        self.write_identifier(out, table);
        out.push_str(" SET ");
        separated_by(
            out,
            patch.iter(),
            |out, (column, value)| {
                self.write_identifier(out, column);
                out.push_str(" = ");
                self.write_bind(out, params, value);
            },
            ", ",
        );
        self.write_where(out, predicates, params);
        out.push_str(" RETURNING *");
    }

    fn write_delete(
        &self,
        out: &mut String,
        table: &str,
        predicates: &[Predicate],
        params: &mut Vec<Value>,
    ) {
        out.push_str("DELETE FROM ");
        self.write_identifier(out, table);
        self.write_where(out, predicates, params);
    }
}

/// Writer with the default dialect: lower case identifiers and `$n` placeholders.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl SqlWriter for GenericSqlWriter {}
