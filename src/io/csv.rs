/*!
Saving recorded samples to CSV. Enable via the `csv` feature.
*/

use ndarray::{Array3, Axis};
use std::error::Error;
use std::fs::File;

use csv::Writer;

/// Saves sample data shaped `(chain, sample, dim)` as a CSV file.
///
/// The file gets a header row of `"chain"`, `"sample"`, and one `"dim_i"`
/// column per dimension, followed by one row per recorded sample.
///
/// # Examples
///
/// ```rust
/// use mini_monte::io::csv::save_csv;
/// use ndarray::arr3;
///
/// // 1 chain, 2 samples, 4 dimensions.
/// let data = arr3(&[[[1, 2, 3, 4], [5, 6, 7, 8]]]);
/// save_csv(&data, "/tmp/mini_monte_doc.csv").expect("Expected saving data to succeed");
/// ```
pub fn save_csv<T: std::fmt::Display>(
    data: &Array3<T>,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    let n_dims = data.shape()[2];

    let mut header: Vec<String> = vec!["chain".to_string(), "sample".to_string()];
    header.extend((0..n_dims).map(|i| format!("dim_{}", i)));
    wtr.write_record(&header)?;

    for (chain_idx, chain) in data.axis_iter(Axis(0)).enumerate() {
        for (sample_idx, sample) in chain.axis_iter(Axis(0)).enumerate() {
            let mut row = vec![chain_idx.to_string(), sample_idx.to_string()];
            row.extend(sample.iter().map(|v| v.to_string()));
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr3;
    use std::io::Read;
    use tempfile::NamedTempFile;

    #[test]
    fn save_csv_writes_header_and_rows() {
        let data = arr3(&[[[1.0, 2.0], [3.0, 4.0]], [[5.0, 6.0], [7.0, 8.0]]]);
        let file = NamedTempFile::new().expect("Expected temp file creation to succeed");
        let path = file.path().to_str().unwrap().to_string();

        save_csv(&data, &path).expect("Expected saving data to succeed");

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "chain,sample,dim_0,dim_1");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "0,0,1,2");
        assert_eq!(lines[4], "1,1,7,8");
    }
}
