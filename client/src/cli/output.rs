//! Terminal output

use rust_decimal::Decimal;
use shared::models::{
    ActivityLog, DashboardStats, DeliveryItem, Dispense, DispenseItem, Inspection, Requisition,
    RequisitionDetail, Stock,
};
use shared::types::{ListResponse, Meta};

use crate::notify::{Level, Notification};
use crate::routes::Resolved;

pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        match n.level {
            Level::Error => eprintln!("[{}] {}", n.title, n.message),
            Level::Success | Level::Info => println!("[{}] {}", n.title, n.message),
        }
    }
}

fn print_meta(meta: Option<&Meta>, shown: usize) {
    match meta {
        Some(m) => println!(
            "\npage {}/{} ({} total)",
            m.current_page, m.last_page, m.total
        ),
        None => println!("\n{shown} row(s)"),
    }
}

fn quantity(q: Decimal) -> String {
    q.normalize().to_string()
}

pub fn print_requisitions(list: &ListResponse<Requisition>) {
    println!(
        "{:<6} {:<16} {:<24} {:<20} {:<10} {}",
        "ID", "RIS NO", "DEPARTMENT", "REQUESTED BY", "SOURCE", "STATUS"
    );
    for r in &list.data {
        println!(
            "{:<6} {:<16} {:<24} {:<20} {:<10} {}",
            r.id,
            r.ris_no,
            r.department_name(),
            r.requested_by,
            r.source_label(),
            r.status()
        );
    }
    print_meta(list.meta.as_ref(), list.data.len());
}

pub fn print_requisition(detail: &RequisitionDetail, printable_url: &str) {
    let r = &detail.requisition;
    println!("RIS No:        {}", r.ris_no);
    println!("Department:    {}", r.department_name());
    println!("Requested by:  {} ({})", r.requested_by, r.designation);
    if let Some(purpose) = r.purpose.as_deref().filter(|p| !p.is_empty()) {
        println!("Purpose:       {purpose}");
    }
    println!("Source:        {}", r.source_label());
    println!("Status:        {}", detail.status());

    let actions: Vec<String> = detail
        .allowed_actions()
        .iter()
        .map(|a| a.to_string())
        .collect();
    if !actions.is_empty() {
        println!("Actions:       {}", actions.join(", "));
    }
    println!("Printable:     {printable_url}");

    println!(
        "\n{:<6} {:<32} {:<12} {:>10} {:>12}",
        "ITEM", "PRODUCT", "LOT", "QTY", "TOTAL"
    );
    for item in &detail.requisition_items {
        println!(
            "{:<6} {:<32} {:<12} {:>10} {:>12}",
            item.id,
            item.product.as_ref().map_or("-", |p| p.name.as_str()),
            item.lot_no.as_deref().unwrap_or("-"),
            quantity(item.quantity),
            item.line_total().map_or_else(|| "-".into(), |t| t.round_dp(2).to_string()),
        );
    }
}

pub fn print_stocks(stocks: &[Stock]) {
    println!(
        "{:<6} {:<32} {:<12} {:>10} {:<12}",
        "STOCK", "PRODUCT", "LOT", "BALANCE", "EXPIRY"
    );
    for s in stocks {
        println!(
            "{:<6} {:<32} {:<12} {:>10} {:<12}",
            s.id,
            s.product_name(),
            s.lot_no.as_deref().unwrap_or("-"),
            quantity(s.running_balance),
            s.expiry_date.map_or_else(|| "-".into(), |d| d.to_string()),
        );
    }
}

pub fn print_dispenses(list: &ListResponse<Dispense>) {
    println!(
        "{:<6} {:<18} {:<16} {:<20} {}",
        "ID", "CODE", "RIS NO", "RECEIVED BY", "STATUS"
    );
    for d in &list.data {
        println!(
            "{:<6} {:<18} {:<16} {:<20} {:?}",
            d.id,
            d.dispense_code,
            d.ris_no(),
            d.receive_by.as_deref().unwrap_or("-"),
            d.status()
        );
    }
    print_meta(list.meta.as_ref(), list.data.len());
}

pub fn print_dispense(dispense: &Dispense, items: &[DispenseItem]) {
    println!("Code:          {}", dispense.dispense_code);
    println!("RIS No:        {}", dispense.ris_no());
    println!("Status:        {:?}", dispense.status());
    if let Some(by) = &dispense.receive_by {
        println!("Received by:   {by}");
    }
    if let Some(at) = dispense.dispense_at {
        println!("Dispensed at:  {}", at.format("%Y-%m-%d %H:%M"));
    }

    println!("\n{:<32} {:>10} {:>12} {:>12}", "PRODUCT", "QTY", "PRICE", "TOTAL");
    let mut total = Decimal::ZERO;
    for item in items {
        total += item.line_total();
        println!(
            "{:<32} {:>10} {:>12} {:>12}",
            item.product.as_ref().map_or("-", |p| p.name.as_str()),
            quantity(item.quantity),
            item.unit_price.round_dp(2),
            item.line_total().round_dp(2),
        );
    }
    println!("{:>68}", total.round_dp(2));
}

fn supplier_name(inspection: &Inspection) -> &str {
    inspection
        .delivery
        .as_ref()
        .and_then(|d| d.supplier.as_ref())
        .map_or("-", |s| s.name.as_str())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn print_inspections(list: &ListResponse<Inspection>) {
    println!(
        "{:<6} {:<18} {:<28} {:<10} {}",
        "ID", "IAR NO", "SUPPLIER", "WAREHOUSE", "FORWARDED"
    );
    for i in &list.data {
        println!(
            "{:<6} {:<18} {:<28} {:<10} {}",
            i.id,
            i.iar_no,
            supplier_name(i),
            yes_no(i.for_warehouse),
            yes_no(i.is_forward)
        );
    }
    print_meta(list.meta.as_ref(), list.data.len());
}

pub fn print_inspection(inspection: &Inspection, items: &[DeliveryItem], total: Decimal) {
    println!("IAR No:        {}", inspection.iar_no);
    println!("Supplier:      {}", supplier_name(inspection));
    if let Some(date) = inspection.delivery.as_ref().and_then(|d| d.delivery_date) {
        println!("Delivered:     {date}");
    }
    println!("Forwarded:     {}", yes_no(inspection.is_forward));
    if let Some(remarks) = inspection.remarks.as_deref().filter(|r| !r.is_empty()) {
        println!("Remarks:       {remarks}");
    }

    println!(
        "\n{:<6} {:<32} {:<12} {:>10} {:>12}",
        "ID", "PRODUCT", "LOT", "QTY", "PRICE"
    );
    for item in items {
        println!(
            "{:<6} {:<32} {:<12} {:>10} {:>12}",
            item.id,
            item.product.as_ref().map_or("-", |p| p.name.as_str()),
            item.lot_no.as_deref().unwrap_or("-"),
            quantity(item.quantity),
            item.unit_price.round_dp(2),
        );
    }
    println!("{:>76}", total.round_dp(2));
}

pub fn print_dashboard(stats: &DashboardStats) {
    println!("Products:      {}", stats.product_count);
    println!("Categories:    {}", stats.category_count);
    println!("Low stock:     {}", stats.low_stock_count);
    let counts = [
        ("Requisitions", stats.requisition_count),
        ("Dispenses", stats.dispense_count),
        ("Inspections", stats.inspection_count),
        ("POs", stats.purchase_order_count),
    ];
    for (label, count) in counts {
        if let Some(count) = count {
            println!("{:<15}{count}", format!("{label}:"));
        }
    }
    if !stats.product_per_category.is_empty() {
        println!("\nPer category");
        for group in &stats.product_per_category {
            println!("  {:<28} {:>6}", group.name, group.total);
        }
    }
}

pub fn print_logs(list: &ListResponse<ActivityLog>) {
    println!("{:<18} {:<20} {:<14} {}", "WHEN", "BY", "EVENT", "SUBJECT");
    for log in &list.data {
        let subject = log
            .subject_type
            .as_deref()
            .map(|t| t.rsplit('\\').next().unwrap_or(t))
            .unwrap_or("-");
        println!(
            "{:<18} {:<20} {:<14} {subject} {}",
            log.created_at
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            log.causer_name(),
            log.description,
            log.subject_id.map_or_else(String::new, |id| format!("#{id}")),
        );
    }
    print_meta(list.meta.as_ref(), list.data.len());
}

pub fn print_route(resolved: &Resolved) {
    if resolved.redirected {
        println!("{} (redirected)", resolved.location);
    } else {
        println!("{}", resolved.location);
    }
    println!("{:?}", resolved.page);
}
