use chrono::NaiveDate;

/// date range used to decide whether something falls due in a period
///
/// The first normal period of a schedule owns its start date, every later
/// period starts strictly after the due date of the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueWindow {
    /// `[start, end]`
    Closed { start: NaiveDate, end: NaiveDate },
    /// `(start, end]`
    LeftOpen { start: NaiveDate, end: NaiveDate },
}

impl DueWindow {
    pub fn for_period(start: NaiveDate, end: NaiveDate, is_first_period: bool) -> Self {
        if is_first_period {
            DueWindow::Closed { start, end }
        } else {
            DueWindow::LeftOpen { start, end }
        }
    }

    pub fn start(&self) -> NaiveDate {
        match *self {
            DueWindow::Closed { start, .. } | DueWindow::LeftOpen { start, .. } => start,
        }
    }

    pub fn end(&self) -> NaiveDate {
        match *self {
            DueWindow::Closed { end, .. } | DueWindow::LeftOpen { end, .. } => end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DueWindow::Closed { start, end } => start <= date && date <= end,
            DueWindow::LeftOpen { start, end } => start < date && date <= end,
        }
    }

    /// charges without a due date are never due in any window
    pub fn contains_due_date(&self, due_date: Option<NaiveDate>) -> bool {
        due_date.is_some_and(|date| self.contains(date))
    }
}
