//! Wizard steps

use std::fmt;

/// One page of the bill-splitting wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Pick a receipt image and extract it
    Upload = 1,
    /// Correct the extracted bill
    Edit = 2,
    /// List who is sharing
    Friends = 3,
    /// Choose how to split
    Split = 4,
    /// Show what everyone owes
    Result = 5,
}

impl Step {
    /// All steps in wizard order
    pub const ALL: [Step; 5] = [
        Step::Upload,
        Step::Edit,
        Step::Friends,
        Step::Split,
        Step::Result,
    ];

    /// Step number, 1-based
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Look up a step by its 1-based number
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|step| step.number() == number)
    }

    /// The following step, if any
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, if any
    pub fn prev(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Short label used in the progress header
    pub fn title(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Edit => "Edit",
            Self::Friends => "Friends",
            Self::Split => "Split",
            Self::Result => "Result",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering() {
        assert_eq!(Step::Upload.number(), 1);
        assert_eq!(Step::Result.number(), 5);
        assert_eq!(Step::from_number(3), Some(Step::Friends));
        assert_eq!(Step::from_number(0), None);
        assert_eq!(Step::from_number(6), None);
    }

    #[test]
    fn test_neighbours() {
        assert_eq!(Step::Upload.prev(), None);
        assert_eq!(Step::Upload.next(), Some(Step::Edit));
        assert_eq!(Step::Split.next(), Some(Step::Result));
        assert_eq!(Step::Result.next(), None);
        assert_eq!(Step::Result.prev(), Some(Step::Split));
    }

    #[test]
    fn test_display() {
        assert_eq!(Step::Friends.to_string(), "3 (Friends)");
    }
}
