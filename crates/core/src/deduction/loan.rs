//! Loan terms validation and repayment schedule.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::DeductionError;

/// Terms requested by a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed.
    pub principal_amount: Decimal,
    /// Repayment period in months. Zero means a single repayment.
    pub duration_months: i32,
}

/// Derived repayment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSchedule {
    /// Amount due each month.
    pub monthly_installment: Decimal,
    /// Date the final installment is due.
    pub due_date: NaiveDate,
}

impl LoanTerms {
    /// Validates the requested terms.
    pub fn validate(&self) -> Result<(), DeductionError> {
        if self.principal_amount <= Decimal::ZERO {
            return Err(DeductionError::NonPositivePrincipal);
        }
        if self.duration_months < 0 {
            return Err(DeductionError::NegativeDuration);
        }
        Ok(())
    }

    /// Principal divided evenly over the duration, rounded to cents.
    ///
    /// A duration of zero or less falls back to the full principal.
    #[must_use]
    pub fn monthly_installment(&self) -> Decimal {
        if self.duration_months <= 0 {
            return self.principal_amount;
        }
        (self.principal_amount / Decimal::from(self.duration_months))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Issue date plus the duration in calendar months.
    pub fn due_date(&self, issued_on: NaiveDate) -> Result<NaiveDate, DeductionError> {
        let months = u32::try_from(self.duration_months.max(0))
            .map_err(|_| DeductionError::DurationOutOfRange(self.duration_months))?;
        issued_on
            .checked_add_months(Months::new(months))
            .ok_or(DeductionError::DurationOutOfRange(self.duration_months))
    }

    /// Validates the terms and derives the schedule.
    pub fn schedule(&self, issued_on: NaiveDate) -> Result<LoanSchedule, DeductionError> {
        self.validate()?;
        Ok(LoanSchedule {
            monthly_installment: self.monthly_installment(),
            due_date: self.due_date(issued_on)?,
        })
    }
}

/// Rejects blank loan purposes.
pub fn validate_purpose(purpose: &str) -> Result<(), DeductionError> {
    if purpose.trim().is_empty() {
        return Err(DeductionError::MissingPurpose);
    }
    Ok(())
}

/// Rejects zero or negative advance requests.
pub fn validate_advance_amount(amount: Decimal) -> Result<(), DeductionError> {
    if amount <= Decimal::ZERO {
        return Err(DeductionError::NonPositiveAdvance);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(dec!(1200), 12, dec!(100))]
    #[case(dec!(1200), 0, dec!(1200))]
    #[case(dec!(1000), 3, dec!(333.33))]
    #[case(dec!(500), 6, dec!(83.33))]
    #[case(dec!(0.05), 2, dec!(0.03))]
    fn test_monthly_installment(
        #[case] principal: Decimal,
        #[case] months: i32,
        #[case] expected: Decimal,
    ) {
        let terms = LoanTerms {
            principal_amount: principal,
            duration_months: months,
        };
        assert_eq!(terms.monthly_installment(), expected);
    }

    #[test]
    fn test_negative_duration_falls_back_to_principal() {
        let terms = LoanTerms {
            principal_amount: dec!(1200),
            duration_months: -3,
        };
        assert_eq!(terms.monthly_installment(), dec!(1200));
        assert_eq!(terms.validate(), Err(DeductionError::NegativeDuration));
    }

    #[test]
    fn test_due_date_adds_calendar_months() {
        let terms = LoanTerms {
            principal_amount: dec!(1200),
            duration_months: 12,
        };
        assert_eq!(terms.due_date(date(2024, 3, 15)).unwrap(), date(2025, 3, 15));

        let month_end = LoanTerms {
            principal_amount: dec!(100),
            duration_months: 1,
        };
        assert_eq!(
            month_end.due_date(date(2024, 1, 31)).unwrap(),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn test_zero_duration_is_due_immediately() {
        let terms = LoanTerms {
            principal_amount: dec!(1200),
            duration_months: 0,
        };
        let schedule = terms.schedule(date(2024, 6, 1)).unwrap();
        assert_eq!(schedule.monthly_installment, dec!(1200));
        assert_eq!(schedule.due_date, date(2024, 6, 1));
    }

    #[test]
    fn test_schedule_rejects_bad_principal() {
        let terms = LoanTerms {
            principal_amount: Decimal::ZERO,
            duration_months: 6,
        };
        assert_eq!(
            terms.schedule(date(2024, 6, 1)),
            Err(DeductionError::NonPositivePrincipal)
        );
    }

    #[test]
    fn test_purpose_and_advance_validation() {
        assert_eq!(validate_purpose("  "), Err(DeductionError::MissingPurpose));
        assert!(validate_purpose("fertilizer for the new block").is_ok());
        assert_eq!(
            validate_advance_amount(dec!(-5)),
            Err(DeductionError::NonPositiveAdvance)
        );
        assert!(validate_advance_amount(dec!(2500)).is_ok());
    }
}
