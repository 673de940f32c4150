use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Part of the file a check looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckCategory {
    /// Magic bytes and overall size
    Structure,
    /// File footer contents
    Footer,
    /// Stripe directory and stripe footers
    Stripes,
    /// Stripe and file statistics
    Statistics,
    /// Row-index streams
    RowIndex,
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckCategory::Structure => "Structure",
            CheckCategory::Footer => "Footer",
            CheckCategory::Stripes => "Stripes",
            CheckCategory::Statistics => "Statistics",
            CheckCategory::RowIndex => "Row index",
        };
        f.write_str(name)
    }
}

/// Validation check result status
#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed with warnings
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }

    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }
}

/// Individual validation check result
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// Part of the file the check looks at
    pub category: CheckCategory,
    /// Name of the validation check
    pub name: String,
    /// Result status of the check
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(category: CheckCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(
        category: CheckCategory,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(
        category: CheckCategory,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }

    /// Passed when `condition` holds, failed with `message` otherwise
    pub(crate) fn expect(
        category: CheckCategory,
        name: impl Into<String>,
        condition: bool,
        message: impl FnOnce() -> String,
    ) -> Self {
        if condition {
            Self::ok(category, name)
        } else {
            Self::failed(category, name, message())
        }
    }
}

/// Complete validation report for a columnar stripe file
#[derive(Debug)]
pub struct ValidationReport {
    /// List of individual validation check results, in execution order
    pub checks: Vec<ValidationCheck>,
    /// Path of the file that was validated
    pub file_path: String,
}

impl ValidationReport {
    /// Create a new validation report for the given file path
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Add a validation check result to the report
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// True when no check failed
    pub fn is_valid(&self) -> bool {
        !self.has_failures()
    }

    /// Check if any validation checks failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Check if any validation checks produced warnings
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_warning())
    }

    /// Count the number of successful checks
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Count the number of warnings
    pub fn warning_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_warning()).count()
    }

    /// Count the number of failures
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    /// Checks of one category, in execution order
    pub fn checks_in(&self, category: CheckCategory) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter().filter(move |c| c.category == category)
    }

    fn categories(&self) -> Vec<CheckCategory> {
        let mut categories: Vec<CheckCategory> = self.checks.iter().map(|c| c.category).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    fn verdict(&self) -> &'static str {
        if self.has_failures() {
            "Validation FAILED"
        } else if self.has_warnings() {
            "Validation PASSED with warnings"
        } else {
            "Validation PASSED"
        }
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("colstripe Validation Report").bold().cyan()));
            output.push_str(&format!("{}: {}\n", style("File").bold(), self.file_path));

            for category in self.categories() {
                output.push_str(&format!("\n{}\n", style(category).bold().underlined()));
                for check in self.checks_in(category) {
                    let line = match &check.status {
                        CheckStatus::Ok => format!("  [{}] {}\n", OK, style(&check.name).green()),
                        CheckStatus::Warning(msg) => format!(
                            "  [{}] {} - {}\n",
                            WARN,
                            style(&check.name).yellow(),
                            msg
                        ),
                        CheckStatus::Failed(msg) => format!(
                            "  [{}] {} - {}\n",
                            FAIL,
                            style(&check.name).red(),
                            msg
                        ),
                    };
                    output.push_str(&line);
                }
            }

            output.push_str(&format!(
                "\n{}: {} passed, {} warnings, {} failed\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));
            let verdict = if self.has_failures() {
                style(self.verdict()).red().bold()
            } else if self.has_warnings() {
                style(self.verdict()).yellow().bold()
            } else {
                style(self.verdict()).green().bold()
            };
            output.push_str(&format!("{}\n", verdict));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "colstripe Validation Report")?;
        writeln!(f, "File: {}", self.file_path)?;

        for category in self.categories() {
            writeln!(f)?;
            writeln!(f, "{}", category)?;
            for check in self.checks_in(category) {
                write!(f, "  [{}] {}", check.status.symbol(), check.name)?;
                match &check.status {
                    CheckStatus::Ok => writeln!(f)?,
                    CheckStatus::Warning(msg) => writeln!(f, " - WARNING: {}", msg)?,
                    CheckStatus::Failed(msg) => writeln!(f, " - FAILED: {}", msg)?,
                }
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;
        writeln!(f, "{}", self.verdict())
    }
}
