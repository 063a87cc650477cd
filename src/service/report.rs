//! Aggregated reporting over sales and clients.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    IndustryTotal, PeriodTotals, SummaryReport, TopClient, TrendChange, TrendsReport,
};
use crate::error::Result;
use crate::repository::{ClientRepository, DateRange, SaleRepository};
use crate::validation::{ValidationError, MIN_SALE_DATE};

const DEFAULT_TOP_CLIENTS: i64 = 5;
const MAX_TOP_CLIENTS: i64 = 100;
const SUMMARY_MONTHS: u32 = 6;

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive().with_day(1).unwrap_or(now.date_naive());
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

fn shift_months(start: DateTime<Utc>, months: u32, back: bool) -> DateTime<Utc> {
    let date = start.date_naive();
    let shifted = if back {
        date.checked_sub_months(Months::new(months))
    } else {
        date.checked_add_months(Months::new(months))
    }
    .unwrap_or(date);
    Utc.from_utc_datetime(&shifted.and_hms_opt(0, 0, 0).unwrap_or_default())
}

fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    ((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(2)
}

pub struct ReportService<S, C> {
    sales: Arc<S>,
    clients: Arc<C>,
}

impl<S: SaleRepository, C: ClientRepository> ReportService<S, C> {
    pub fn new(sales: Arc<S>, clients: Arc<C>) -> Self {
        Self { sales, clients }
    }

    /// Dashboard summary: revenue over paid and pending sales in the
    /// requested range (all time by default), a six month revenue
    /// series and a per-status breakdown.
    pub async fn summary(&self, range: DateRange) -> Result<SummaryReport> {
        let overall = self.sales.totals_overall(range).await?;
        let total_clients = self.clients.count_all().await?;
        let since = shift_months(month_start(Utc::now()), SUMMARY_MONTHS - 1, true);
        let monthly = self.sales.totals_by_month(since).await?;
        let by_status = self.sales.totals_by_status(range).await?;
        Ok(SummaryReport {
            total_revenue: overall.total,
            total_sales: overall.count,
            total_clients,
            monthly,
            by_status,
        })
    }

    pub async fn top_clients(&self, limit: Option<i64>) -> Result<Vec<TopClient>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_CLIENTS).clamp(1, MAX_TOP_CLIENTS);
        self.sales.top_clients(limit).await
    }

    /// Current period against the one of equal length immediately
    /// before it. Defaults to the current calendar month against the
    /// previous one. The change is reported as zero when the previous
    /// period had no activity.
    pub async fn trends(&self, range: DateRange) -> Result<TrendsReport> {
        let (current_start, current_end) = match (range.from, range.to) {
            (None, None) => {
                let start = month_start(Utc::now());
                (start, shift_months(start, 1, false))
            }
            (None, Some(_)) => {
                return Err(
                    ValidationError::new("from", "is required when to is given").into(),
                )
            }
            (Some(from), to) => (from, to.unwrap_or_else(Utc::now)),
        };
        if current_start >= current_end {
            return Err(ValidationError::new("from", "must be before to").into());
        }
        let previous_start = current_start - (current_end - current_start);

        let current = self
            .sales
            .period_totals(current_start, current_end)
            .await?;
        let previous = self
            .sales
            .period_totals(previous_start, current_start)
            .await?;

        Ok(TrendsReport {
            change: TrendChange {
                amount: percent_change(current.total, previous.total),
                count: percent_change(
                    Decimal::from(current.count),
                    Decimal::from(previous.count),
                ),
            },
            current,
            previous,
        })
    }

    pub async fn by_industry(&self, range: DateRange) -> Result<Vec<IndustryTotal>> {
        let rows = self.sales.totals_by_industry(range).await?;
        let grand_total: Decimal = rows.iter().map(|r| r.total).sum();
        Ok(rows
            .into_iter()
            .map(|row| {
                let average = row
                    .total
                    .checked_div(Decimal::from(row.count.max(1)))
                    .unwrap_or_default()
                    .round_dp(2);
                let percentage = if grand_total.is_zero() {
                    Decimal::ZERO
                } else {
                    (row.total / grand_total * Decimal::ONE_HUNDRED).round_dp(2)
                };
                IndustryTotal {
                    industry: row.industry.unwrap_or_else(|| "Unknown".to_string()),
                    total: row.total,
                    count: row.count,
                    average,
                    percentage,
                }
            })
            .collect())
    }

    /// Renders the sales in a date range as a PDF document. The range
    /// defaults to everything on record.
    pub async fn export_pdf(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<u8>> {
        let from = from.unwrap_or_else(|| {
            Utc.from_utc_datetime(&MIN_SALE_DATE.and_hms_opt(0, 0, 0).unwrap_or_default())
        });
        let to = to.unwrap_or_else(Utc::now);
        let sales = self.sales.list_for_export(from, to).await?;
        crate::pdf::render_sales_report(&sales, from, to)
    }

    pub async fn period_totals(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<PeriodTotals> {
        self.sales.period_totals(from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::client::MockClientRepository;
    use crate::repository::sale::{IndustryRow, MockSaleRepository};

    #[test]
    fn test_percent_change() {
        assert_eq!(
            percent_change(Decimal::from(150), Decimal::from(100)),
            Decimal::from(50)
        );
        assert_eq!(
            percent_change(Decimal::from(50), Decimal::from(100)),
            Decimal::from(-50)
        );
        assert_eq!(percent_change(Decimal::from(10), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_month_start() {
        let now = Utc.with_ymd_and_hms(2024, 6, 17, 15, 30, 0).unwrap();
        assert_eq!(
            month_start(now),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_shift_months_across_year_boundary() {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(
            shift_months(start, 5, true),
            Utc.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_by_industry_percentages() {
        let mut sales = MockSaleRepository::new();
        sales.expect_totals_by_industry().returning(|_| {
            Ok(vec![
                IndustryRow {
                    industry: Some("Technology".into()),
                    total: Decimal::from(300),
                    count: 3,
                },
                IndustryRow {
                    industry: None,
                    total: Decimal::from(100),
                    count: 1,
                },
            ])
        });
        let service = ReportService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));

        let industries = service.by_industry(DateRange::default()).await.unwrap();
        assert_eq!(industries[0].percentage, Decimal::from(75).round_dp(2));
        assert_eq!(industries[0].average, Decimal::from(100).round_dp(2));
        assert_eq!(industries[1].industry, "Unknown");
        assert_eq!(industries[1].percentage, Decimal::from(25).round_dp(2));
    }

    #[tokio::test]
    async fn test_by_industry_empty_is_all_zero() {
        let mut sales = MockSaleRepository::new();
        sales.expect_totals_by_industry().returning(|_| Ok(vec![]));
        let service = ReportService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));
        assert!(service
            .by_industry(DateRange::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_trends_zero_previous_month() {
        let mut sales = MockSaleRepository::new();
        let mut first = true;
        sales.expect_period_totals().returning(move |_, _| {
            let totals = if first {
                PeriodTotals {
                    total: Decimal::from(500),
                    count: 5,
                }
            } else {
                PeriodTotals::default()
            };
            first = false;
            Ok(totals)
        });
        let service = ReportService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));

        let trends = service.trends(DateRange::default()).await.unwrap();
        assert_eq!(trends.current.count, 5);
        assert_eq!(trends.change.amount, Decimal::ZERO);
        assert_eq!(trends.change.count, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_trends_explicit_range_uses_equal_previous_window() {
        let from = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        let prev_from = Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap();

        let mut sales = MockSaleRepository::new();
        sales
            .expect_period_totals()
            .withf(move |f, t| (*f == from && *t == to) || (*f == prev_from && *t == from))
            .times(2)
            .returning(|_, _| Ok(PeriodTotals::default()));
        let service = ReportService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));
        service
            .trends(DateRange {
                from: Some(from),
                to: Some(to),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_trends_rejects_inverted_range() {
        let from = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let mut sales = MockSaleRepository::new();
        sales.expect_period_totals().times(0);
        let service = ReportService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));
        let err = service
            .trends(DateRange {
                from: Some(from),
                to: Some(to),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_trends_rejects_to_without_from() {
        let mut sales = MockSaleRepository::new();
        sales.expect_period_totals().times(0);
        let service = ReportService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));
        let err = service
            .trends(DateRange {
                from: None,
                to: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_top_clients_defaults_and_clamps() {
        let mut sales = MockSaleRepository::new();
        sales
            .expect_top_clients()
            .withf(|limit| *limit == 5)
            .times(1)
            .returning(|_| Ok(vec![]));
        let service = ReportService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));
        service.top_clients(None).await.unwrap();

        let mut sales = MockSaleRepository::new();
        sales
            .expect_top_clients()
            .withf(|limit| *limit == 100)
            .times(1)
            .returning(|_| Ok(vec![]));
        let service = ReportService::new(Arc::new(sales), Arc::new(MockClientRepository::new()));
        service.top_clients(Some(1000)).await.unwrap();
    }
}
