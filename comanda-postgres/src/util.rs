use crate::ValueHolder;
use comanda_core::{Error, Result, Row, RowLabeled, RowNames};

pub(crate) fn row_to_values(row: &tokio_postgres::Row) -> Result<Row> {
    (0..row.len())
        .map(|i| match row.try_get::<_, ValueHolder>(i) {
            Ok(v) => Ok(v.0),
            Err(..) => {
                let col = &row.columns()[i];
                Err(Error::msg(format!(
                    "Could not deserialize column {} `{}`: {}",
                    i,
                    col.name(),
                    col.type_()
                )))
            }
        })
        .collect()
}

/// Labels are read from the first row and shared by the following ones.
pub(crate) fn row_to_labeled(
    labels: &mut Option<RowNames>,
    row: &tokio_postgres::Row,
) -> Result<RowLabeled> {
    let labels = labels
        .get_or_insert_with(|| row.columns().iter().map(|c| c.name().to_string()).collect());
    Ok(RowLabeled::new(labels.clone(), row_to_values(row)?))
}
