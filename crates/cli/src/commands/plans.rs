//! Plan limits listing.

use storedesk_core::PlanType;

/// Print every plan's limits to stdout.
///
/// # Errors
///
/// Returns error if JSON serialization fails.
#[allow(clippy::print_stdout)]
pub fn print(json: bool) -> Result<(), serde_json::Error> {
    if json {
        let mut plans = serde_json::Map::new();
        for plan in PlanType::ALL {
            plans.insert(plan.as_str().to_owned(), plan.limits().to_json()?);
        }
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    println!(
        "{:<12} {:>9} {:>6} {:>10} {:>8} {:>6} {:>8} {:>10}",
        "plan", "vehicles", "team", "customers", "reports", "share", "support", "price"
    );
    for plan in PlanType::ALL {
        let limits = plan.limits();
        println!(
            "{:<12} {:>9} {:>6} {:>10} {:>8} {:>6} {:>8} {:>10}",
            plan.as_str(),
            limits.max_vehicles,
            limits.max_team_members,
            limits.max_customers,
            yes_no(limits.show_advanced_reports),
            yes_no(limits.show_share_link),
            limits.support_priority.as_str(),
            limits.price(),
        );
    }
    Ok(())
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
