//! Sort modes, comparators and the sort-control state machine.
//!
//! # Invariants
//! - Title and time axes are mutually exclusive: selecting one axis resets
//!   the other to `Default`.
//! - Each axis cycles `Default -> Asc -> Desc -> Default`.
//! - Comparators are total orders.

use crate::model::todo::TodoItem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Keep the order the store delivered.
    #[default]
    Default,
    TitleAsc,
    TitleDesc,
    TimeAsc,
    TimeDesc,
}

/// Sort control a user can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortAxis {
    Title,
    Time,
}

impl SortMode {
    /// Next mode after clicking the control for `axis`.
    pub fn next(self, axis: SortAxis) -> Self {
        match axis {
            SortAxis::Title => self.next_title(),
            SortAxis::Time => self.next_time(),
        }
    }

    /// Title control: `title-asc -> title-desc -> default`, anything else
    /// jumps to `title-asc`.
    pub fn next_title(self) -> Self {
        match self {
            Self::TitleAsc => Self::TitleDesc,
            Self::TitleDesc => Self::Default,
            Self::Default | Self::TimeAsc | Self::TimeDesc => Self::TitleAsc,
        }
    }

    /// Time control: `time-asc -> time-desc -> default`, anything else
    /// jumps to `time-asc`.
    pub fn next_time(self) -> Self {
        match self {
            Self::TimeAsc => Self::TimeDesc,
            Self::TimeDesc => Self::Default,
            Self::Default | Self::TitleAsc | Self::TitleDesc => Self::TimeAsc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::TitleAsc => "title-asc",
            Self::TitleDesc => "title-desc",
            Self::TimeAsc => "time-asc",
            Self::TimeDesc => "time-desc",
        }
    }

    /// Comparator for this mode; `None` keeps delivered order.
    pub fn comparator(self) -> Option<fn(&TodoItem, &TodoItem) -> Ordering> {
        let compare: fn(&TodoItem, &TodoItem) -> Ordering = match self {
            Self::Default => return None,
            Self::TitleAsc => title_asc,
            Self::TitleDesc => title_desc,
            Self::TimeAsc => time_asc,
            Self::TimeDesc => time_desc,
        };
        Some(compare)
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn title_asc(a: &TodoItem, b: &TodoItem) -> Ordering {
    compare_titles(&a.title, &b.title)
}

fn title_desc(a: &TodoItem, b: &TodoItem) -> Ordering {
    compare_titles(&b.title, &a.title)
}

fn time_asc(a: &TodoItem, b: &TodoItem) -> Ordering {
    a.created_at.sort_cmp(b.created_at)
}

fn time_desc(a: &TodoItem, b: &TodoItem) -> Ordering {
    b.created_at.sort_cmp(a.created_at)
}

/// Locale-style title collation.
///
/// Levels, each consulted only when the previous one ties:
/// 1. base letters, ignoring accents and case (`éclair` < `zebra`);
/// 2. accents (`resume` < `résumé`);
/// 3. case, lowercase first (`milk` < `Milk`);
/// 4. raw strings, so distinct titles never compare equal.
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    base_letters(left)
        .cmp(base_letters(right))
        .then_with(|| accented_letters(left).cmp(accented_letters(right)))
        .then_with(|| case_marks(left).cmp(case_marks(right)))
        .then_with(|| left.cmp(right))
}

fn base_letters(title: &str) -> impl Iterator<Item = char> + '_ {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(title: &str) -> impl Iterator<Item = char> + '_ {
    title.nfd().flat_map(char::to_lowercase)
}

fn case_marks(title: &str) -> impl Iterator<Item = bool> + '_ {
    title.chars().map(char::is_uppercase)
}
