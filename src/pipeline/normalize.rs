use log::info;

use crate::condition::Conditions;
use crate::table::{Column, Table};

use super::PipelineError;

/// Derive `Count <c>` and `Intensity Experiment <c>` for every condition
///
/// Missing raw intensities and counts are read as zero and written back to
/// the raw columns. Paired conditions subtract the control from the
/// experiment; unpaired conditions copy the experiment values. Every raw
/// column is checked before anything is derived.
pub fn normalize(table: Table, conditions: &Conditions) -> Result<Table, PipelineError> {
    info!("Normalizing intensity and count for {} conditions", conditions.len());

    for columns in conditions.columns() {
        for raw in columns.raw() {
            table.numeric(raw)?;
        }
    }

    let mut table = table;
    for columns in conditions.columns() {
        let mut intensity = table.numeric(&columns.intensity)?.fill_missing(0.0);
        let mut count = table.numeric(&columns.experiment)?.fill_missing(0.0);

        table = table
            .with_column(Column::numeric(&columns.intensity, intensity.clone()))?
            .with_column(Column::numeric(&columns.experiment, count.clone()))?;

        if let (Some(control_intensity), Some(control_experiment)) =
            (&columns.control_intensity, &columns.control_experiment)
        {
            let control_int = table.numeric(control_intensity)?.fill_missing(0.0);
            let control_cnt = table.numeric(control_experiment)?.fill_missing(0.0);
            intensity = intensity.subtract(&control_int);
            count = count.subtract(&control_cnt);

            table = table
                .with_column(Column::numeric(control_intensity, control_int))?
                .with_column(Column::numeric(control_experiment, control_cnt))?;
        }

        table = table
            .with_column(Column::numeric(&columns.count, count))?
            .with_column(Column::numeric(&columns.intensity_experiment, intensity))?;
    }

    Ok(table)
}
