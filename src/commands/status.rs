use crate::models::{AssistantConfig, BusinessTable, DatasetConfig, MarketingTable, Platform};
use crate::utils::format_thousands;

pub fn run(config: &DatasetConfig) {
    println!("📊 Dataset Status ({})\n", config.dir.display());

    let (marketing, business) = super::load_or_exit(config);
    show_status(&marketing, &business);
}

fn show_status(marketing: &MarketingTable, business: &BusinessTable) {
    println!("📈 Marketing rows: {}", format_thousands(marketing.len() as u64));
    for platform in Platform::all() {
        println!(
            "   {:<9} {:>8} rows  ({})",
            platform.as_str(),
            format_thousands(marketing.count_platform(platform) as u64),
            platform.file_name()
        );
    }
    match marketing.date_range() {
        Some((first, last)) => println!("   Dates:    {} → {}", first, last),
        None => println!("   ⚠️  No marketing rows"),
    }
    if !marketing.extra_columns.is_empty() {
        println!("   Extra columns: {}", marketing.extra_columns.join(", "));
    }

    println!("\n═══════════════════════════════════════════════════════════\n");

    println!("🏢 Business rows: {}", format_thousands(business.len() as u64));
    match business.date_range() {
        Some((first, last)) => println!("   Dates:    {} → {}", first, last),
        None => println!("   ⚠️  No business rows"),
    }
    if !business.extra_columns.is_empty() {
        println!("   Extra columns: {}", business.extra_columns.join(", "));
    }

    println!("\n═══════════════════════════════════════════════════════════\n");

    let states = marketing.states();
    let tactics = marketing.tactics();
    println!("🗺️  States ({}): {}", states.len(), states.join(", "));
    println!("🎯 Tactics ({}): {}", tactics.len(), tactics.join(", "));

    let assistant = AssistantConfig::from_env();
    if assistant.is_configured() {
        println!("\n🤖 Assistant: {} ready", assistant.model);
    } else {
        println!("\n🤖 Assistant: disabled (set GEMINI_API_KEY to enable `ask`)");
    }
}
