use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Result, TortoiseError};
use crate::features::{Feature, FeatureVector, NUM_FEATURES};

/// One learned weight per feature, persisted as plain text with one value
/// per line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector {
    values: [f32; NUM_FEATURES],
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl WeightVector {
    pub fn zeros() -> Self {
        Self { values: [0.0; NUM_FEATURES] }
    }

    pub fn from_array(values: [f32; NUM_FEATURES]) -> Self {
        Self { values }
    }

    pub fn as_array(&self) -> &[f32; NUM_FEATURES] {
        &self.values
    }

    pub fn set(&mut self, feature: Feature, value: f32) {
        self.values[feature.index()] = value;
    }

    pub fn dot(&self, features: &FeatureVector) -> f32 {
        self.values.iter().zip(features.iter()).map(|(w, f)| w * f).sum()
    }

    /// `w[i] += step * f[i]` for every feature.
    pub fn add_scaled(&mut self, step: f32, features: &FeatureVector) {
        for (w, f) in self.values.iter_mut().zip(features.iter()) {
            *w += step * f;
        }
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|w| w.is_finite())
    }

    /// Reads a weight file.
    ///
    /// A missing file or one whose values cannot be read as finite floats
    /// yields zeros. A file with the wrong number of values is refused.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No weight file at {}, starting from zeros", path.display());
            return Ok(Self::zeros());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        let mut values = Vec::with_capacity(NUM_FEATURES);
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!("Malformed weight file {}: {}, starting from zeros", path.display(), e);
                    return Ok(Self::zeros());
                }
            };
            if record.len() != 1 {
                warn!(
                    "Weight line {:?} in {} holds {} fields, starting from zeros",
                    record.position().map(|p| p.line()),
                    path.display(),
                    record.len()
                );
                return Ok(Self::zeros());
            }
            let field = record.get(0).unwrap_or("").trim();
            match field.parse::<f32>() {
                Ok(v) if v.is_finite() => values.push(v),
                _ => {
                    warn!(
                        "Unreadable weight '{}' in {}, starting from zeros",
                        field,
                        path.display()
                    );
                    return Ok(Self::zeros());
                }
            }
        }

        if values.len() != NUM_FEATURES {
            return Err(TortoiseError::WeightCount {
                expected: NUM_FEATURES,
                found: values.len(),
            });
        }
        let mut weights = Self::zeros();
        weights.values.copy_from_slice(&values);
        info!("Loaded weights {:?} from {}", weights.values, path.display());
        Ok(weights)
    }

    /// Overwrites the weight file.
    ///
    /// The values go to a sibling temporary file first, which is then renamed
    /// over `path`, so an interrupted write never leaves a truncated vector.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp = temp_path(path);
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_path(&tmp)?;
            for w in self.values.iter() {
                writer.write_record(&[w.to_string()])?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Index<Feature> for WeightVector {
    type Output = f32;

    fn index(&self, feature: Feature) -> &f32 {
        &self.values[feature.index()]
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_zeros() {
        let dir = tempdir().unwrap();
        let w = WeightVector::load(dir.path().join("weights.txt")).unwrap();
        assert_eq!(w, WeightVector::zeros());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.txt");
        let w = WeightVector::from_array([0.5, -1.25, 3.0, 0.0, 1e-3, -7.5, 2.0]);
        w.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), NUM_FEATURES);

        let loaded = WeightVector::load(&path).unwrap();
        assert_eq!(loaded, w);
        assert_eq!(loaded.as_array().len(), NUM_FEATURES);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn saving_twice_is_byte_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.txt");
        let w = WeightVector::from_array([0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
        w.save(&path).unwrap();
        let first = fs::read(&path).unwrap();
        w.save(&path).unwrap();
        assert_eq!(first, fs::read(&path).unwrap());
    }

    #[test]
    fn wrong_line_count_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.txt");
        fs::write(&path, "1.0\n2.0\n3.0\n").unwrap();
        match WeightVector::load(&path) {
            Err(TortoiseError::WeightCount { expected, found }) => {
                assert_eq!(expected, 7);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn garbage_values_load_zeros() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.txt");
        fs::write(&path, "1.0\nabc\n3\n4\n5\n6\n7\n").unwrap();
        assert_eq!(WeightVector::load(&path).unwrap(), WeightVector::zeros());
    }

    #[test]
    fn lines_with_several_values_load_zeros() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weights.txt");
        fs::write(&path, "1.0,2.0\n".repeat(NUM_FEATURES)).unwrap();
        assert_eq!(WeightVector::load(&path).unwrap(), WeightVector::zeros());
    }

    #[test]
    fn dot_and_update() {
        let mut w = WeightVector::zeros();
        let f = [1.0, 0.0, 0.5, 0.0, 0.0, 0.0, 2.0];
        w.add_scaled(0.5, &f);
        assert_eq!(w[Feature::WaterDistance], 0.5);
        assert_eq!(w[Feature::FoodDistance], 0.25);
        assert_eq!(w[Feature::Exploration], 0.0);
        assert!((w.dot(&f) - (0.5 + 0.125 + 2.0)).abs() < 1e-6);
    }
}
