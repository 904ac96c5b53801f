use log::info;

use crate::columns;
use crate::condition::{Conditions, RatioSelection};
use crate::table::{Column, NumericColumn, Table};

use super::{signal_columns, PipelineError};

/// Proteins detected with positive signal in every condition, with a log2
/// fold change between the two selected conditions
///
/// A protein is kept when every condition has `Count != 0` and
/// `Intensity Experiment > 0`. Both intensities of the ratio are therefore
/// positive and the added `Log2FC <num>/<den>` column is always finite.
pub fn differential_expression(
    table: &Table,
    conditions: &Conditions,
    ratio: RatioSelection,
) -> Result<Table, PipelineError> {
    if conditions.len() < 2 {
        return Err(PipelineError::InsufficientConditions(conditions.len()));
    }
    ratio.validate(conditions.len())?;

    let signal = signal_columns(table, conditions)?;
    let mask: Vec<bool> = (0..table.n_rows())
        .map(|row| {
            signal
                .iter()
                .all(|s| s.count(row) != 0.0 && s.intensity(row) > 0.0)
        })
        .collect();
    let selected = table.filter_rows(&mask)?;

    let numerator = &conditions.columns()[ratio.numerator];
    let denominator = &conditions.columns()[ratio.denominator];
    let num = selected.numeric(&numerator.intensity_experiment)?;
    let den = selected.numeric(&denominator.intensity_experiment)?;

    let log2fc = (0..selected.n_rows())
        .map(|row| Some((num.get_or_nan(row) / den.get_or_nan(row)).log2()))
        .collect();
    let name = columns::log2fc(&numerator.name, &denominator.name);

    info!(
        "{} of {} proteins are detected in all conditions; computed {}",
        selected.n_rows(),
        table.n_rows(),
        name
    );
    Ok(selected.with_column(Column::numeric(name, NumericColumn::new(log2fc, false)))?)
}
