//! Built-in sample catalog used when no catalog source is configured.

use iq_core::workspace::WorkspaceEntry;

use crate::catalog::WorkspaceCatalog;

/// Six business workspaces with descriptions rich enough to embed.
#[must_use]
pub fn sample_entries() -> Vec<WorkspaceEntry> {
    vec![
        WorkspaceEntry::new("sales", "Sales")
            .with_description("Sales orders, revenue, bookings and deals by region, city, product and period")
            .with_keywords(["sales", "revenue", "orders", "deals", "bookings", "sold"])
            .with_hint("region", "string")
            .with_hint("city", "string")
            .with_hint("amount", "number")
            .with_hint("order_date", "date"),
        WorkspaceEntry::new("inventory", "Inventory")
            .with_description("Stock levels, warehouses, SKUs, replenishment and shipments")
            .with_keywords(["inventory", "stock", "warehouse", "sku", "shipment", "supply"])
            .with_hint("sku", "string")
            .with_hint("warehouse", "string")
            .with_hint("quantity", "integer"),
        WorkspaceEntry::new("customers", "Customers")
            .with_description("Customer accounts, segments, churn, satisfaction and support tickets")
            .with_keywords(["customer", "customers", "client", "churn", "segment", "tickets"])
            .with_hint("customer_id", "string")
            .with_hint("segment", "string")
            .with_hint("signup_date", "date"),
        WorkspaceEntry::new("finance", "Finance")
            .with_description("Budgets, expenses, profit and loss, invoices and cash flow")
            .with_keywords(["finance", "budget", "expenses", "profit", "invoice", "cost"])
            .with_hint("account", "string")
            .with_hint("amount", "number")
            .with_hint("fiscal_period", "string"),
        WorkspaceEntry::new("hr", "Human Resources")
            .with_description("Employees, headcount, hiring, attrition, payroll and departments")
            .with_keywords(["employee", "employees", "headcount", "hiring", "payroll", "attrition"])
            .with_hint("employee_id", "string")
            .with_hint("department", "string")
            .with_hint("hire_date", "date"),
        WorkspaceEntry::new("marketing", "Marketing")
            .with_description("Campaigns, leads, conversions, channels and ad spend")
            .with_keywords(["marketing", "campaign", "campaigns", "leads", "conversion", "ads"])
            .with_hint("campaign_id", "string")
            .with_hint("channel", "string")
            .with_hint("spend", "number"),
    ]
}

/// The sample entries as a catalog.
#[must_use]
pub fn sample_catalog() -> WorkspaceCatalog {
    // Ids above are unique and non-empty.
    WorkspaceCatalog::new(sample_entries()).unwrap_or_default()
}
