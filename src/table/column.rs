/// A numeric column, stored as optional `f64` values
///
/// `integer` records whether the column is integer-typed: every cell was
/// present and integral when it was loaded. Integer-typed columns are written
/// back without a decimal point.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    values: Vec<Option<f64>>,
    integer: bool,
}

impl NumericColumn {
    /// Create a numeric column from raw values
    pub fn new(values: Vec<Option<f64>>, integer: bool) -> Self {
        Self { values, integer }
    }

    /// Create a float-typed column with every value present
    pub fn from_f64(values: Vec<f64>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
            integer: false,
        }
    }

    /// Create an integer-typed column with every value present
    pub fn from_i64(values: Vec<i64>) -> Self {
        Self {
            values: values.into_iter().map(|v| Some(v as f64)).collect(),
            integer: true,
        }
    }

    /// Values of the column; `None` marks a missing cell
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Whether the column is integer-typed
    pub fn is_integer(&self) -> bool {
        self.integer
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `row`, `None` when missing or out of bounds
    pub fn get(&self, row: usize) -> Option<f64> {
        self.values.get(row).copied().flatten()
    }

    /// Value at `row` with missing cells read as `NaN`
    ///
    /// Every comparison against `NaN` is false, so a missing cell never
    /// satisfies a threshold.
    pub fn get_or_nan(&self, row: usize) -> f64 {
        self.get(row).unwrap_or(f64::NAN)
    }

    /// Copy of the column with missing cells replaced by `fill`
    ///
    /// The integer flag is kept as is: a column that had missing cells was
    /// float-typed on load and stays float-typed.
    pub fn fill_missing(&self, fill: f64) -> Self {
        Self {
            values: self.values.iter().map(|v| Some(v.unwrap_or(fill))).collect(),
            integer: self.integer,
        }
    }

    /// Element-wise `self - other`; missing on either side stays missing
    pub fn subtract(&self, other: &NumericColumn) -> Self {
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some(a - b),
                _ => None,
            })
            .collect();
        Self {
            values,
            integer: self.integer && other.integer,
        }
    }

    /// Sum of the present values (zero when every value is missing)
    pub fn sum(&self) -> f64 {
        self.values.iter().flatten().sum()
    }

    fn sum_rows(&self, rows: &[usize]) -> f64 {
        rows.iter().filter_map(|&r| self.get(r)).sum()
    }
}

/// Cell storage of a [`Column`]
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Numeric cells
    Numeric(NumericColumn),
    /// Free text cells
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Number of cells
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(n) => n.len(),
            ColumnData::Text(t) => t.len(),
        }
    }

    /// Whether there are no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cell at `row` is missing
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(n) => n.get(row).is_none(),
            ColumnData::Text(t) => t.get(row).map_or(true, Option::is_none),
        }
    }

    /// Keep the cells at the given row positions, in that order
    pub(crate) fn take(&self, rows: &[usize]) -> Self {
        match self {
            ColumnData::Numeric(n) => ColumnData::Numeric(NumericColumn {
                values: rows.iter().map(|&r| n.values[r]).collect(),
                integer: n.integer,
            }),
            ColumnData::Text(t) => ColumnData::Text(rows.iter().map(|&r| t[r].clone()).collect()),
        }
    }

    /// Reduce each group of row positions to one cell: numbers are summed,
    /// text takes the value of the first row of the group
    pub(crate) fn reduce_groups(&self, groups: &[Vec<usize>]) -> Self {
        match self {
            ColumnData::Numeric(n) => ColumnData::Numeric(NumericColumn {
                values: groups.iter().map(|rows| Some(n.sum_rows(rows))).collect(),
                integer: n.integer,
            }),
            ColumnData::Text(t) => ColumnData::Text(
                groups
                    .iter()
                    .map(|rows| rows.first().and_then(|&r| t[r].clone()))
                    .collect(),
            ),
        }
    }

    /// Text rendering of one cell, as written to CSV; empty when missing
    pub fn format_cell(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(n) => match n.get(row) {
                Some(v) if n.integer && v.is_finite() => format!("{}", v as i64),
                Some(v) => format_float(v),
                None => String::new(),
            },
            ColumnData::Text(t) => t.get(row).cloned().flatten().unwrap_or_default(),
        }
    }
}

/// Render a float-typed value the way dataframe CSV writers do: magnitudes
/// below `1e-4` or from `1e16` up use exponent form (`1.2e-50`, `1e+16`),
/// integral values keep one decimal place, everything else uses the
/// shortest round-tripping representation.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        let sign = if v > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else if v != 0.0 && (v.abs() < 1e-4 || v.abs() >= 1e16) {
        format_exponent(v)
    } else if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Shortest mantissa with a signed, at least two digit exponent
fn format_exponent(v: f64) -> String {
    let formatted = format!("{:e}", v);
    match formatted.split_once('e').map(|(m, e)| (m, e.parse::<i32>())) {
        Some((mantissa, Ok(exp))) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        _ => formatted,
    }
}

/// A named column of a [`crate::table::Table`]
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header name
    pub name: String,
    /// Cells
    pub data: ColumnData,
}

impl Column {
    /// Create a numeric column
    pub fn numeric(name: impl Into<String>, values: NumericColumn) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Create a text column
    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Numeric view of the column, if it is numeric
    pub fn as_numeric(&self) -> Option<&NumericColumn> {
        match &self.data {
            ColumnData::Numeric(n) => Some(n),
            ColumnData::Text(_) => None,
        }
    }
}
