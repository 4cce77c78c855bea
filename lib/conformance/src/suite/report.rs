use std::fmt::{self, Display};

use eyre::bail;

const HEADER_CASE: &str = "Case";
const HEADER_OUTCOME: &str = "Outcome";

/// Verdict of a single case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every assertion held.
    Passed,
    /// An assertion failed, or the case could not be set up.
    Failed(String),
    /// The case was not run.
    Skipped(String),
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed(_) => "FAILED",
            Outcome::Skipped(_) => "skipped",
        }
    }
}

/// Verdict of a case, keyed by its `group::case` id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseReport {
    id: String,
    outcome: Outcome,
}

impl CaseReport {
    pub(crate) fn new(id: String, outcome: Outcome) -> Self {
        Self { id, outcome }
    }

    /// The `group::case` id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// What happened.
    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

/// Results of a suite run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    title: String,
    cases: Vec<CaseReport>,
}

impl Report {
    pub(crate) fn new(title: &str) -> Self {
        Self { title: title.to_owned(), cases: vec![] }
    }

    pub(crate) fn push(&mut self, case: CaseReport) {
        self.cases.push(case);
    }

    /// Every case that was selected, in execution order.
    #[must_use]
    pub fn cases(&self) -> &[CaseReport] {
        &self.cases
    }

    /// Outcome of the case with the given `group::case` id.
    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.cases.iter().find(|case| case.id == id).map(CaseReport::outcome)
    }

    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|case| case.outcome == Outcome::Passed).count()
    }

    /// Number of skipped cases.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.cases
            .iter()
            .filter(|case| matches!(case.outcome, Outcome::Skipped(_)))
            .count()
    }

    /// Failed cases.
    pub fn failed(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases
            .iter()
            .filter(|case| matches!(case.outcome, Outcome::Failed(_)))
    }

    /// Converts failures into an error listing them.
    ///
    /// # Errors
    ///
    /// Fails if any case failed.
    pub fn ensure_passed(&self) -> eyre::Result<()> {
        let failed: Vec<_> = self
            .failed()
            .map(|case| match &case.outcome {
                Outcome::Failed(reason) => format!("{}: {reason}", case.id),
                _ => case.id.clone(),
            })
            .collect();
        if failed.is_empty() {
            return Ok(());
        }
        bail!(
            "{} of {} cases failed in {}:\n{}",
            failed.len(),
            self.cases.len(),
            self.title,
            failed.join("\n")
        )
    }

    fn column_width(
        &self,
        column_value: impl FnMut(&CaseReport) -> usize,
        header: &str,
    ) -> usize {
        self.cases
            .iter()
            .map(column_value)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or_default()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width1 = self.column_width(|case| case.id.len(), HEADER_CASE);
        let width2 = self
            .column_width(|case| case.outcome.label().len(), HEADER_OUTCOME);

        writeln!(f, "{}", self.title)?;
        writeln!(f, "| {HEADER_CASE:<width1$} | {HEADER_OUTCOME:<width2$} |")?;
        writeln!(f, "| {:->width1$} | {:->width2$} |", "", "")?;

        for case in &self.cases {
            let id = &case.id;
            let label = case.outcome.label();
            write!(f, "| {id:<width1$} | {label:<width2$} |")?;
            match &case.outcome {
                Outcome::Passed => writeln!(f)?,
                Outcome::Failed(reason) | Outcome::Skipped(reason) => {
                    writeln!(f, " {reason}")?;
                }
            }
        }

        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed().count(),
            self.skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{CaseReport, Outcome, Report};

    fn report() -> Report {
        let mut report = Report::new("reference");
        report.push(CaseReport::new(
            "balance::tracks_transfers".into(),
            Outcome::Passed,
        ));
        report.push(CaseReport::new(
            "approvals::emits_approval_event".into(),
            Outcome::Failed("expected exactly one event".into()),
        ));
        report.push(CaseReport::new(
            "burning::emits_one_transfer_event".into(),
            Outcome::Skipped("fixture cannot burn".into()),
        ));
        report
    }

    #[test]
    fn counts_outcomes() {
        let report = report();
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(
            report.outcome("balance::tracks_transfers"),
            Some(&Outcome::Passed)
        );
        assert_eq!(report.outcome("balance::missing"), None);
    }

    #[test]
    fn error_when_a_case_failed() {
        let err = report().ensure_passed().expect_err("should report failure");
        let message = err.to_string();
        assert!(message.contains("1 of 3 cases failed in reference"));
        assert!(message.contains("approvals::emits_approval_event"));
    }

    #[test]
    fn passes_without_failures() {
        let mut report = Report::new("empty");
        report.push(CaseReport::new("a::b".into(), Outcome::Passed));
        report.ensure_passed().expect("should pass");
    }

    #[test]
    fn renders_table() {
        let table = report().to_string();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], "reference");
        assert!(lines[1].starts_with("| Case "));
        assert!(lines[3].contains("balance::tracks_transfers"));
        assert!(lines[4].starts_with("| approvals::emits_approval_event "));
        assert!(lines[4].contains("| FAILED "));
        assert!(lines[4].ends_with("| expected exactly one event"));
        assert!(lines[5].ends_with("| fixture cannot burn"));
        assert_eq!(lines.last(), Some(&"1 passed, 1 failed, 1 skipped"));
    }
}
