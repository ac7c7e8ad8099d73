/*!
# Saving Run Outputs to CSV

Writes the sample table and the recorded stats of a run to CSV files. Enable via
the `csv` feature.
*/

use std::fmt::Display;
use std::fs::File;

use ::csv::Writer;
use ndarray::Array2;
use num_traits::Float;

use crate::error::SamplerError;
use crate::stats::StatsRecorder;

/**
Saves an `(n_samples, n_vars)` sample table as CSV.

The header is `sample,dim_0,dim_1,...`; each following row holds the sample index
and the position saved at that row.

# Examples

```rust
use adaptive_metropolis::io::csv::save_samples_csv;
use ndarray::arr2;

let samples = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
save_samples_csv(&samples, "/tmp/samples.csv")?;
# Ok::<(), adaptive_metropolis::error::SamplerError>(())
```
*/
pub fn save_samples_csv<T: Display>(
    samples: &Array2<T>,
    filename: &str,
) -> Result<(), SamplerError> {
    let mut wtr = Writer::from_writer(File::create(filename)?);

    let mut header = vec!["sample".to_string()];
    header.extend((0..samples.ncols()).map(|i| format!("dim_{}", i)));
    wtr.write_record(&header)?;

    for (idx, row) in samples.rows().into_iter().enumerate() {
        let mut record = vec![idx.to_string()];
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/**
Saves every registered stat table side by side, one CSV row per saved sample.

Scalar stats get one column named after the stat; vector stats get one column per
variable, suffixed with the variable index (`prop_S_0`, `prop_S_1`, ...).
Columns follow registration order.
*/
pub fn save_stats_csv<T: Float>(
    stats: &StatsRecorder<T>,
    filename: &str,
) -> Result<(), SamplerError> {
    let mut wtr = Writer::from_writer(File::create(filename)?);

    let mut header = vec!["sample".to_string()];
    for (kind, table) in stats.iter() {
        if kind.is_scalar() {
            header.push(kind.to_string());
        } else {
            header.extend((0..table.ncols()).map(|i| format!("{}_{}", kind, i)));
        }
    }
    wtr.write_record(&header)?;

    let n_rows = stats.iter().map(|(_, t)| t.nrows()).max().unwrap_or(0);
    for idx in 0..n_rows {
        let mut record = vec![idx.to_string()];
        for (_, table) in stats.iter() {
            record.extend(table.row(idx).iter().map(|v| v.to_string()));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
