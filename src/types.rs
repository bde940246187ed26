use chrono::NaiveDate;

/// Half-open calendar-year interval `[start, end_exclusive)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end_exclusive: NaiveDate,
}

impl DateRange {
    /// Build the range covering every day of `year`.
    pub fn for_year(year: i32) -> anyhow::Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| anyhow::anyhow!("Year {} is out of range", year))?;
        let end_exclusive = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .ok_or_else(|| anyhow::anyhow!("Year {} is out of range", year + 1))?;
        Ok(Self {
            start,
            end_exclusive,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last day inside the range. The Photos Library API date filter is
    /// inclusive on both ends, so this is what goes on the wire as `endDate`.
    pub fn last_day(&self) -> NaiveDate {
        self.end_exclusive.pred_opt().unwrap_or(self.start)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end_exclusive)
    }
}
