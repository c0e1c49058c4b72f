use ledger_core::{Column, Error, Field, Result};

/// Names a header cell may carry for each required field, after trimming and
/// lower-casing. Some bank exports misspell "withdrawals".
const REQUIRED: &[(Field, &[&str])] = &[
    (Field::Date, &["date"]),
    (Field::Description, &["description"]),
    (Field::Deposits, &["deposits"]),
    (Field::Withdrawals, &["withdrawals", "withdrawls"]),
    (Field::Balance, &["balance"]),
];

/// Optional column written by the exporter; read back into `category`.
pub const CATEGORY_COLUMN: &str = "category";

/// Normalize a raw header cell.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Resolve a header row into the ledger's column layout.
///
/// Every required field must be present exactly once. A `category` column is
/// recognised; any other column is kept as an extra field in header order.
pub fn resolve_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Vec<Column>> {
    let mut columns = Vec::new();
    let mut extra = 0;

    for raw in headers {
        let name = normalize_header(raw);
        let field = if name == CATEGORY_COLUMN {
            Some(Field::Category)
        } else {
            REQUIRED
                .iter()
                .find(|(_, names)| names.contains(&name.as_str()))
                .map(|(field, _)| *field)
        };

        let field = match field {
            Some(f) => {
                if columns.iter().any(|c: &Column| c.field == f) {
                    return Err(Error::load(format!("duplicate column '{name}'")));
                }
                f
            }
            None => {
                extra += 1;
                Field::Extra(extra - 1)
            }
        };
        columns.push(Column::new(name, field));
    }

    let missing: Vec<&str> = REQUIRED
        .iter()
        .filter(|(field, _)| !columns.iter().any(|c| c.field == *field))
        .map(|(_, names)| names[0])
        .collect();
    if !missing.is_empty() {
        return Err(Error::load(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    Ok(columns)
}
