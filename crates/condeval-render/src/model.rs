#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

/// A failed check. Passing checks are only counted, never listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableCheck {
    pub severity: RenderableSeverity,
    pub check_id: String,
    pub code: String,
    pub name: String,
    pub detail: Option<String>,
    pub help: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableScenario {
    pub name: String,
    pub passed: u32,
    pub failed: u32,
    pub failures: Vec<RenderableCheck>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub template: String,
    pub profile: String,
    pub checks_total: u32,
    pub checks_passed: u32,
    pub checks_failed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub data: RenderableData,
    pub structure_total: u32,
    pub structure_failures: Vec<RenderableCheck>,
    pub scenarios: Vec<RenderableScenario>,
}
