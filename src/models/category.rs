/// The two built-in duty categories. The store accepts any non-empty
/// category name; these are the ones the app offers by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyCategory {
    Personal,
    Company,
}

impl DutyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Company => "Company",
        }
    }

    /// Exact, case-sensitive match against the stored category names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == name)
    }

    pub fn all() -> &'static [DutyCategory] {
        &[Self::Personal, Self::Company]
    }
}

impl std::fmt::Display for DutyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
