use condeval_types::{CheckCounts, CheckResult, ScenarioReport, SuiteData, Verdict};

/// Result of running a whole suite against one template.
#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    /// Template structure checks.
    pub structure: Vec<CheckResult>,
    pub scenarios: Vec<ScenarioReport>,
    pub data: SuiteData,
    pub counts: CheckCounts,
}

impl DomainReport {
    /// Every failed check across structure and scenarios.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.structure
            .iter()
            .chain(self.scenarios.iter().flat_map(|s| s.checks.iter()))
            .filter(|c| !c.passed)
    }
}
