/// Normalized severity of a SARIF result.
///
/// SARIF's `level` is an open string; everything collapses into this
/// fixed set. Display order is always error, warning, note, none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
    Note,
    None,
}

impl Level {
    /// Fixed display order: most severe first.
    pub const ORDER: [Level; 4] = [Level::Error, Level::Warning, Level::Note, Level::None];

    /// Normalize a raw SARIF level string.
    ///
    /// Absent → warning; "info" → note; anything outside the SARIF
    /// level set → warning; otherwise the lower-cased value.
    pub fn from_sarif(raw: Option<&str>) -> Self {
        let raw = match raw {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return Level::Warning,
        };
        match raw.as_str() {
            "error" => Level::Error,
            "warning" => Level::Warning,
            "note" | "info" => Level::Note,
            "none" => Level::None,
            _ => Level::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
            Level::None => "none",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Level::Error => "🔴",
            Level::Warning => "🟡",
            Level::Note => "🔵",
            Level::None => "⚫",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Error => "Errors",
            Level::Warning => "Warnings",
            Level::Note => "Notes",
            Level::None => "None",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One normalized finding, flattened from a SARIF (run, result) pair.
///
/// Immutable once extracted; the whole pipeline passes these through
/// by value and never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Declared driver name of the run; "tool" when absent
    pub tool: String,

    /// Normalized severity
    pub level: Level,

    /// Rule/check id; may be empty
    pub rule: String,

    /// Trimmed message text; may be empty
    pub message: String,

    /// Repo-relative path of the first physical location; may be empty
    pub path: String,

    /// Start line of the first physical location
    pub line: Option<u32>,

    /// Human line/column range, e.g. "L12-L15 C3-C9"; may be empty
    pub region: String,

    /// Rule documentation URL from the run's rule catalog; may be empty
    pub help: String,

    /// Deep link to the file at the reported commit; may be empty
    pub link: String,

    /// Dedup signature; never shown to users
    pub dedupe_key: String,
}

/// Per-severity counts over a finding slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub error: usize,
    pub warning: usize,
    pub note: usize,
    pub none: usize,
}

impl LevelCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = LevelCounts::default();
        for f in findings {
            counts.add(f.level);
        }
        counts
    }

    pub fn add(&mut self, level: Level) {
        match level {
            Level::Error => self.error += 1,
            Level::Warning => self.warning += 1,
            Level::Note => self.note += 1,
            Level::None => self.none += 1,
        }
    }

    pub fn get(&self, level: Level) -> usize {
        match level {
            Level::Error => self.error,
            Level::Warning => self.warning,
            Level::Note => self.note,
            Level::None => self.none,
        }
    }

    pub fn total(&self) -> usize {
        self.error + self.warning + self.note + self.none
    }
}
