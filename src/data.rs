//! Domain records and CSV ingestion into the in-memory sales ledger

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use polars::prelude::*;

/// Lifecycle state of a sales order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Draft,
    Sent,
    Confirmed,
    Done,
    Cancelled,
}

impl OrderStatus {
    /// Only confirmed and done orders count as completed sales
    pub fn is_realized(self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Done)
    }

    fn parse(value: &str) -> crate::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(OrderStatus::Draft),
            "sent" => Ok(OrderStatus::Sent),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "done" => Ok(OrderStatus::Done),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => anyhow::bail!("unknown order status: {other:?}"),
        }
    }
}

/// A sales order. Orders without a date are kept in the ledger but never
/// enter any aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub customer_id: i64,
    pub salesperson: Option<String>,
}

/// One line of an order. Realization is re-derived through the parent
/// order's status, never stored on the line itself.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub order_id: i64,
    pub product: String,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

/// Pipeline stage of a pre-sale record, counted for the funnel view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadKind {
    Lead,
    Opportunity,
}

impl LeadKind {
    fn parse(value: &str) -> crate::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lead" => Ok(LeadKind::Lead),
            "opportunity" => Ok(LeadKind::Opportunity),
            other => anyhow::bail!("unknown lead kind: {other:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub kind: LeadKind,
}

/// In-memory collection of sales records, the read-side collaborator for
/// every analytic in this crate. All queries are non-destructive; the
/// ledger persists nothing itself.
#[derive(Debug, Default)]
pub struct SalesLedger {
    orders: Vec<Order>,
    lines: Vec<OrderLine>,
    customers: Vec<Customer>,
    leads: Vec<Lead>,
}

impl SalesLedger {
    pub fn new(
        orders: Vec<Order>,
        lines: Vec<OrderLine>,
        customers: Vec<Customer>,
        leads: Vec<Lead>,
    ) -> Self {
        Self {
            orders,
            lines,
            customers,
            leads,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Orders whose status marks a completed sale
    pub fn realized_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.status.is_realized())
    }

    /// Lines whose parent order is realized
    pub fn realized_lines(&self) -> Vec<&OrderLine> {
        let realized: HashSet<i64> = self.realized_orders().map(|o| o.id).collect();
        self.lines
            .iter()
            .filter(|l| realized.contains(&l.order_id))
            .collect()
    }

    pub fn customer_name(&self, customer_id: i64) -> Option<&str> {
        self.customers
            .iter()
            .find(|c| c.id == customer_id)
            .map(|c| c.name.as_str())
    }

    pub fn count_leads(&self, kind: LeadKind) -> usize {
        self.leads.iter().filter(|l| l.kind == kind).count()
    }

    pub fn count_orders_with_status(&self, status: OrderStatus) -> usize {
        self.orders.iter().filter(|o| o.status == status).count()
    }
}

/// Load sales data from CSV files into a ledger
///
/// The sales file carries one row per order line with columns
/// `order_id, order_date, status, customer_id, customer_name, salesperson,
/// product, line_subtotal`; order totals are derived by summing line
/// subtotals. The optional leads file carries a single `kind` column of
/// `lead` / `opportunity` rows.
///
/// # Arguments
/// * `sales_path` - Path to the sales CSV file
/// * `leads_path` - Optional path to the leads CSV file
///
/// # Returns
/// * `SalesLedger` holding orders, lines, customers and leads
pub fn load_ledger(sales_path: &str, leads_path: Option<&str>) -> crate::Result<SalesLedger> {
    let df = CsvReader::from_path(sales_path)?.has_header(true).finish()?;

    if df.height() == 0 {
        anyhow::bail!("no sales rows found in {sales_path}");
    }

    // Cast up front so integer-looking columns still extract uniformly
    let order_ids = df.column("order_id")?.cast(&DataType::Int64)?;
    let order_ids = order_ids.i64()?;
    let dates = df.column("order_date")?.cast(&DataType::Utf8)?;
    let dates = dates.utf8()?;
    let statuses = df.column("status")?.cast(&DataType::Utf8)?;
    let statuses = statuses.utf8()?;
    let customer_ids = df.column("customer_id")?.cast(&DataType::Int64)?;
    let customer_ids = customer_ids.i64()?;
    let customer_names = df.column("customer_name")?.cast(&DataType::Utf8)?;
    let customer_names = customer_names.utf8()?;
    let salespersons = df.column("salesperson")?.cast(&DataType::Utf8)?;
    let salespersons = salespersons.utf8()?;
    let products = df.column("product")?.cast(&DataType::Utf8)?;
    let products = products.utf8()?;
    let subtotals = df.column("line_subtotal")?.cast(&DataType::Float64)?;
    let subtotals = subtotals.f64()?;

    let mut orders: BTreeMap<i64, Order> = BTreeMap::new();
    let mut lines = Vec::with_capacity(df.height());
    let mut customers: BTreeMap<i64, String> = BTreeMap::new();

    for row in 0..df.height() {
        let order_id = order_ids
            .get(row)
            .ok_or_else(|| anyhow::anyhow!("row {row}: missing order_id"))?;
        let customer_id = customer_ids
            .get(row)
            .ok_or_else(|| anyhow::anyhow!("row {row}: missing customer_id"))?;
        let status = statuses
            .get(row)
            .ok_or_else(|| anyhow::anyhow!("row {row}: missing status"))?;
        let status = OrderStatus::parse(status)?;
        let subtotal = subtotals.get(row).unwrap_or(0.0);
        let product = products.get(row).unwrap_or("Unknown").to_string();

        let date = match dates.get(row).map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("row {row}: bad order_date {raw:?}: {e}"))?,
            ),
            _ => None,
        };
        let salesperson = salespersons
            .get(row)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if let Some(name) = customer_names
            .get(row)
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            customers
                .entry(customer_id)
                .or_insert_with(|| name.to_string());
        }

        let order = orders.entry(order_id).or_insert_with(|| Order {
            id: order_id,
            date,
            total_amount: 0.0,
            status,
            customer_id,
            salesperson,
        });
        order.total_amount += subtotal;

        lines.push(OrderLine {
            order_id,
            product,
            subtotal,
        });
    }

    let leads = match leads_path {
        Some(path) => load_leads(path)?,
        None => Vec::new(),
    };

    let customers = customers
        .into_iter()
        .map(|(id, name)| Customer { id, name })
        .collect();

    Ok(SalesLedger::new(
        orders.into_values().collect(),
        lines,
        customers,
        leads,
    ))
}

fn load_leads(path: &str) -> crate::Result<Vec<Lead>> {
    let df = CsvReader::from_path(path)?.has_header(true).finish()?;
    let kinds = df.column("kind")?.cast(&DataType::Utf8)?;
    let kinds = kinds.utf8()?;

    let mut leads = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let kind = kinds
            .get(row)
            .ok_or_else(|| anyhow::anyhow!("row {row}: missing lead kind"))?;
        leads.push(Lead {
            kind: LeadKind::parse(kind)?,
        });
    }
    Ok(leads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "order_id,order_date,status,customer_id,customer_name,salesperson,product,line_subtotal"
        )
        .unwrap();
        writeln!(file, "1,2024-01-15,confirmed,10,Acme Corp,Alice,Widget,60.0").unwrap();
        writeln!(file, "1,2024-01-15,confirmed,10,Acme Corp,Alice,Gadget,40.0").unwrap();
        writeln!(file, "2,2024-02-10,done,11,Globex,Bob,Widget,150.0").unwrap();
        writeln!(file, "3,2024-02-12,cancelled,10,Acme Corp,Alice,Widget,999.0").unwrap();
        writeln!(file, "4,,confirmed,11,Globex,,Gadget,25.0").unwrap();
        file
    }

    #[test]
    fn test_load_ledger() {
        let file = create_test_csv();
        let ledger = load_ledger(file.path().to_str().unwrap(), None).unwrap();

        assert_eq!(ledger.orders().len(), 4);
        assert_eq!(ledger.customers().len(), 2);

        let first = ledger.orders().iter().find(|o| o.id == 1).unwrap();
        assert_eq!(first.total_amount, 100.0);
        assert_eq!(first.status, OrderStatus::Confirmed);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15));

        // Undated order survives loading but carries no date
        let undated = ledger.orders().iter().find(|o| o.id == 4).unwrap();
        assert_eq!(undated.date, None);
        assert_eq!(undated.salesperson, None);
    }

    #[test]
    fn test_realized_filters() {
        let file = create_test_csv();
        let ledger = load_ledger(file.path().to_str().unwrap(), None).unwrap();

        let realized: Vec<i64> = ledger.realized_orders().map(|o| o.id).collect();
        assert_eq!(realized, vec![1, 2, 4]);

        // Lines of the cancelled order are filtered through the parent status
        let line_total: f64 = ledger.realized_lines().iter().map(|l| l.subtotal).sum();
        assert_eq!(line_total, 275.0);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "order_id,order_date,status,customer_id,customer_name,salesperson,product,line_subtotal"
        )
        .unwrap();
        writeln!(file, "1,2024-01-15,shipped,10,Acme Corp,Alice,Widget,60.0").unwrap();

        let result = load_ledger(file.path().to_str().unwrap(), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_leads() {
        let sales = create_test_csv();
        let mut leads = NamedTempFile::new().unwrap();
        writeln!(leads, "kind").unwrap();
        writeln!(leads, "lead").unwrap();
        writeln!(leads, "lead").unwrap();
        writeln!(leads, "opportunity").unwrap();

        let ledger = load_ledger(
            sales.path().to_str().unwrap(),
            Some(leads.path().to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(ledger.count_leads(LeadKind::Lead), 2);
        assert_eq!(ledger.count_leads(LeadKind::Opportunity), 1);
    }
}
