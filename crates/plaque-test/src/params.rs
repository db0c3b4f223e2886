//! Regression test parameters and operations

use plaque_core::{BinaryField, Field};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare computed values with expectations (default)
    #[default]
    Compare,
    /// Also dump fields to stderr for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "conncomp")
    pub test_name: String,
    /// Current test index (incremented before each test)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "conncomp")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(format!(
                "value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two fields for exact equality
    ///
    /// Reports the first mismatching pixel on failure.
    pub fn compare_fields<T>(&mut self, expected: &Field<T>, actual: &Field<T>) -> bool
    where
        T: Copy + PartialEq + std::fmt::Debug,
    {
        self.index += 1;

        if !expected.sizes_equal(actual) {
            self.fail(format!(
                "field comparison for index {} - dimension mismatch {:?} vs {:?}",
                self.index,
                expected.dimensions(),
                actual.dimensions()
            ));
            return false;
        }

        let width = expected.width() as usize;
        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(a, b)| a != b);

        match mismatch {
            None => true,
            Some(i) => {
                self.fail(format!(
                    "field comparison for index {} - sample mismatch at ({}, {}): {:?} vs {:?}",
                    self.index,
                    i % width,
                    i / width,
                    expected.data()[i],
                    actual.data()[i]
                ));
                false
            }
        }
    }

    /// Compare two histograms (or any count vectors) bin by bin
    pub fn compare_histograms(&mut self, expected: &[u64], actual: &[u64]) -> bool {
        self.index += 1;

        if expected.len() != actual.len() {
            self.fail(format!(
                "histogram comparison for index {} - {} bins vs {} bins",
                self.index,
                expected.len(),
                actual.len()
            ));
            return false;
        }

        match expected.iter().zip(actual).position(|(a, b)| a != b) {
            None => true,
            Some(bin) => {
                self.fail(format!(
                    "histogram comparison for index {} - bin {}: expected {}, actual {}",
                    self.index, bin, expected[bin], actual[bin]
                ));
                false
            }
        }
    }

    /// Compare two binary data arrays
    ///
    /// # Returns
    ///
    /// `true` if data is identical, `false` otherwise.
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            self.fail(format!(
                "string comparison for index {}\n\
                 sizes: {} vs {}",
                self.index,
                data1.len(),
                data2.len()
            ));
            false
        } else {
            true
        }
    }

    /// Print a binary field to stderr in display mode
    pub fn show_field(&self, label: &str, field: &BinaryField) {
        if !self.display() {
            return;
        }
        eprintln!("  {} ({}x{}):", label, field.width(), field.height());
        for y in 0..field.height() {
            let row: String = field
                .row(y)
                .iter()
                .map(|&v| if v { '#' } else { '.' })
                .collect();
            eprintln!("    {}", row);
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    fn fail(&mut self, detail: String) {
        let msg = format!("Failure in {}_reg: {}", self.test_name, detail);
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_fields() {
        let mut rp = RegParams::new("test");
        let a = BinaryField::from_points(3, 2, &[(1, 1)]).unwrap();
        let b = BinaryField::from_points(3, 2, &[(2, 1)]).unwrap();
        assert!(rp.compare_fields(&a, &a.clone()));
        assert!(!rp.compare_fields(&a, &b));
        assert!(rp.failures()[0].contains("(1, 1)"));
        assert_eq!(rp.index(), 2);
    }

    #[test]
    fn test_compare_histograms() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_histograms(&[1, 2, 3], &[1, 2, 3]));
        assert!(!rp.compare_histograms(&[1, 2, 3], &[1, 2, 4]));
        assert!(!rp.compare_histograms(&[1, 2], &[1, 2, 3]));
        assert!(!rp.cleanup());
    }
}
