//! Conformance test fixture runner
//!
//! Loads YAML fixtures written in the registry config format and runs them
//! through the production loading path:
//! YAML → `MatchConfig<String>` → `Registry::load_match()` → evaluate.
//!
//! ```yaml
//! name: segment laziness
//! match:
//!   arms:
//!     - pattern: { type: destructure, patterns: [{ type: segment }, { type: literal, value: 3 }] }
//!       action: ends-in-3
//! cases:
//!   - name: mixed tuple
//!     subject: [{ char: "*" }, "123", 3]
//!     expect: ends-in-3
//! ```
//!
//! A fixture with `expect_error` must fail to load, with an error message
//! containing that text.

use pmatch::{Match, MatchConfig, MatchError, Registry, RegistryBuilder, ValueConfig};
use serde::Deserialize;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "match")]
    pub config: MatchConfig<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    #[serde(default)]
    pub expect_error: Option<String>,
}

/// Test case: one subject and the action it should select.
///
/// `expect: null` means no arm matches.
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub subject: ValueConfig,
    pub expect: Option<String>,
}

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// The registry every fixture loads against.
#[must_use]
pub fn registry() -> Registry {
    crate::register(RegistryBuilder::new()).build()
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Compile the fixture's match expression.
    pub fn load(&self) -> Result<Match<'static, String>, MatchError> {
        registry().load_match(self.config.clone())
    }

    /// Run all test cases and return results
    pub fn run(&self) -> Result<Vec<CaseResult>, MatchError> {
        let m = self.load()?;
        self.cases
            .iter()
            .map(|case| {
                let subject = case.subject.to_value()?;
                let actual = m.evaluate(&subject).ok();
                Ok(CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == case.expect,
                    expected: case.expect.clone(),
                    actual,
                })
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        if let Some(fragment) = &self.expect_error {
            match self.load() {
                Ok(_) => panic!(
                    "Fixture '{}' loaded, but was expected to fail with '{fragment}'",
                    self.name
                ),
                Err(e) => assert!(
                    e.to_string().contains(fragment.as_str()),
                    "Fixture '{}' failed with '{e}', expected it to mention '{fragment}'",
                    self.name
                ),
            }
            return;
        }

        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to load: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAZY: &str = r#"
name: segment laziness
match:
  arms:
    - pattern: { type: destructure, patterns: [{ type: segment }, { type: literal, value: 3 }] }
      action: ends-in-3
cases:
  - name: mixed tuple
    subject: [{ char: "*" }, "123", 3]
    expect: ends-in-3
  - name: no trailing 3
    subject: [1, 2]
    expect: null
"#;

    #[test]
    fn parse_and_run_single_fixture() {
        let fixture = Fixture::from_yaml(LAZY).unwrap();
        assert_eq!(fixture.name, "segment laziness");
        assert_eq!(fixture.cases.len(), 2);

        let results = fixture.run().unwrap();
        assert!(results.iter().all(|r| r.passed));
        assert_eq!(results[1].actual, None);
    }

    #[test]
    fn parse_multiple_documents() {
        let yaml = format!("{LAZY}\n---\n{LAZY}");
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
    }

    #[test]
    fn failing_case_is_reported() {
        let yaml = r"
name: wrong expectation
match:
  arms:
    - pattern: { type: wildcard }
      action: any
cases:
  - name: expects the wrong action
    subject: 1
    expect: none
";
        let results = Fixture::from_yaml(yaml).unwrap().run().unwrap();
        assert!(!results[0].passed);
        assert_eq!(results[0].actual.as_deref(), Some("any"));
    }

    #[test]
    fn expected_load_error() {
        let yaml = r"
name: unknown predicate
match:
  arms:
    - pattern: { type: predicate, name: prime }
      action: prime
expect_error: unknown predicate
";
        let fixture = Fixture::from_yaml(yaml).unwrap();
        assert!(fixture.load().is_err());
        fixture.run_and_assert();
    }
}
