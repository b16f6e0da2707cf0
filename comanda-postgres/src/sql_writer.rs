use comanda_core::{ColumnDefault, ColumnType, SqlWriter};
use std::fmt::Write;

#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSqlWriter {}

impl SqlWriter for PostgresSqlWriter {
    fn write_column_type(&self, out: &mut String, value: &ColumnType) {
        match value {
            ColumnType::Uuid => out.push_str("UUID"),
            ColumnType::Serial => out.push_str("SERIAL"),
            ColumnType::Text => out.push_str("TEXT"),
            ColumnType::Boolean => out.push_str("BOOLEAN"),
            ColumnType::Integer => out.push_str("INTEGER"),
            ColumnType::BigInt => out.push_str("BIGINT"),
            ColumnType::Numeric(precision, scale) => {
                let _ = write!(out, "NUMERIC({},{})", precision, scale);
            }
            ColumnType::Json => out.push_str("JSONB"),
        }
    }

    fn write_column_default(&self, out: &mut String, value: &ColumnDefault) {
        match value {
            ColumnDefault::Boolean(v) => out.push_str(if *v { "true" } else { "false" }),
            ColumnDefault::GeneratedUuid => out.push_str("gen_random_uuid()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comanda_core::{MIGRATIONS, Schema};
    use indoc::indoc;

    #[test]
    fn orders_table() {
        let schema = Schema::from_migrations(&PostgresSqlWriter {}, MIGRATIONS);
        assert_eq!(
            schema.statements()[4].sql,
            indoc! {"
                CREATE TABLE IF NOT EXISTS orders (
                id SERIAL PRIMARY KEY,
                store_id UUID,
                type TEXT,
                tablenumber TEXT,
                customername TEXT,
                customerphone TEXT,
                items JSONB,
                status TEXT,
                total NUMERIC(10,2),
                createdat BIGINT,
                paymentmethod TEXT,
                deliveryaddress TEXT,
                notes TEXT,
                changefor NUMERIC(10,2),
                waitstaffname TEXT,
                couponapplied TEXT,
                discountamount NUMERIC(10,2)
                )"
            }
        );
    }

    #[test]
    fn store_profiles_table() {
        let schema = Schema::from_migrations(&PostgresSqlWriter {}, MIGRATIONS);
        assert_eq!(
            schema.statements()[0].sql,
            indoc! {"
                CREATE TABLE IF NOT EXISTS store_profiles (
                id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                logourl TEXT,
                address TEXT,
                whatsapp TEXT,
                isactive BOOLEAN DEFAULT true,
                createdat BIGINT,
                settings JSONB
                )"
            }
        );
        assert_eq!(
            schema.statements()[1].sql,
            indoc! {"
                CREATE TABLE IF NOT EXISTS categories (
                id SERIAL PRIMARY KEY,
                store_id UUID,
                name TEXT NOT NULL,
                UNIQUE (store_id, name)
                )"
            }
        );
    }

    #[test]
    fn migrations() {
        let schema = Schema::from_migrations(&PostgresSqlWriter {}, MIGRATIONS);
        let sql = schema
            .statements()
            .iter()
            .skip(5)
            .map(|v| v.sql.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            sql,
            [
                "ALTER TABLE waitstaff ADD COLUMN IF NOT EXISTS store_id UUID",
                "ALTER TABLE categories ADD COLUMN IF NOT EXISTS store_id UUID",
                "ALTER TABLE products ADD COLUMN IF NOT EXISTS store_id UUID",
                "ALTER TABLE orders ADD COLUMN IF NOT EXISTS store_id UUID",
                "ALTER TABLE products ADD COLUMN IF NOT EXISTS barcode TEXT",
            ]
        );
    }
}
