#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Category {
    FoodAndDining,
    Transportation,
    Housing,
    Utilities,
    Entertainment,
    Shopping,
    Healthcare,
    Education,
    Travel,
    PersonalCare,
    GiftsAndDonations,
    Investments,
    Income,
    Other,
}

impl Category {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Housing => "Housing",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::PersonalCare => "Personal Care",
            Self::GiftsAndDonations => "Gifts & Donations",
            Self::Investments => "Investments",
            Self::Income => "Income",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup by display name. Also accepts the names with
    /// "and" in place of "&" so they can be typed without shell quoting.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase().replace(" and ", " & ");
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == wanted)
    }

    pub(crate) fn all() -> &'static [Category] {
        &[
            Self::FoodAndDining,
            Self::Transportation,
            Self::Housing,
            Self::Utilities,
            Self::Entertainment,
            Self::Shopping,
            Self::Healthcare,
            Self::Education,
            Self::Travel,
            Self::PersonalCare,
            Self::GiftsAndDonations,
            Self::Investments,
            Self::Income,
            Self::Other,
        ]
    }

    /// Categories a budget may target: the spending categories. `Other` is
    /// the catch-all for uncategorized spending, and money moved into
    /// investments or received as income is not spending.
    pub(crate) fn budgetable() -> impl Iterator<Item = Category> {
        Self::all().iter().copied().filter(|c| c.is_budgetable())
    }

    pub(crate) fn is_budgetable(&self) -> bool {
        !matches!(self, Self::Investments | Self::Income | Self::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
