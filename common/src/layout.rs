//! Results/map layout of the listing pages.

/// One column of results, or results plus the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsLayout {
    OneColumn,
    TwoColumn,
}

impl ResultsLayout {
    pub fn from_map_shown(map_shown: bool) -> Self {
        if map_shown {
            ResultsLayout::TwoColumn
        } else {
            ResultsLayout::OneColumn
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            ResultsLayout::OneColumn => "one-column",
            ResultsLayout::TwoColumn => "two-column",
        }
    }

    /// Class of the `<section>` holding results and map.
    pub fn container_class(self) -> String {
        format!("{} explore-projects-container", self.class())
    }

    /// Padding of the results list; it hugs the map when one is shown.
    pub fn results_class(self) -> &'static str {
        match self {
            ResultsLayout::OneColumn => "ph3",
            ResultsLayout::TwoColumn => "pl3",
        }
    }

    pub fn shows_map(self) -> bool {
        self == ResultsLayout::TwoColumn
    }
}
