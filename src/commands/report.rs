use crate::error::Result;
use crate::models::DatasetConfig;
use crate::services::{Filter, GroupSummary, Recommendations, Report};
use crate::utils::{format_amount, format_compact, format_metric, format_thousands};

const RULE: &str = "═══════════════════════════════════════════════════════════";

pub fn run(config: &DatasetConfig, filter: &Filter, json: bool) {
    let (marketing, business) = super::load_or_exit(config);
    let report = Report::build(&marketing, &business, filter);

    if json {
        if let Err(e) = print_json(&report) {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    print_text(&report);
}

fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_text(report: &Report) {
    println!("📊 Marketing Intelligence Report\n");
    print_selection(&report.filter);
    println!(
        "   {} marketing rows, {} business days\n",
        format_thousands(report.marketing_rows as u64),
        format_thousands(report.business_rows as u64)
    );

    if report.marketing_rows == 0 {
        println!("⚠️  No marketing rows match the selection.");
        return;
    }

    let s = &report.summary;
    println!("{}\n", RULE);
    println!("💰 Total Spend:        ${}", format_compact(s.total_spend));
    println!("📈 Attributed Revenue: ${}", format_compact(s.total_attributed_revenue));
    println!("🎯 ROAS:               {:.2}x", s.roas);
    println!("🛒 Total Orders:       {}", format_compact(s.total_orders as f64));
    println!("👥 New Customers:      {}", format_compact(s.new_customers as f64));
    println!("💵 Business Revenue:   ${}", format_compact(s.business_revenue));
    println!("🧲 CAC:                ${:.2}", s.cac);
    println!("🧾 Avg Order Value:    {}", format_metric(s.avg_order_value));

    print_groups("Channel Performance", &report.channels);
    print_groups("State Performance", &report.states);
    print_groups("Tactic Performance", &report.tactics);

    println!("\n{}\n", RULE);
    println!("📅 Daily Trends\n");
    println!("   {:<10}  {:>10}  {:>10}  {:>6}  {:>8}", "date", "spend", "revenue", "roas", "growth%");
    for t in &report.trends {
        println!(
            "   {:<10}  {:>10}  {:>10}  {:>6}  {:>8}",
            t.date,
            format_amount(t.spend),
            format_amount(t.attributed_revenue),
            format_metric(t.roas),
            format_metric(t.spend_growth)
        );
    }

    if !report.business_impact.is_empty() {
        println!("\n{}\n", RULE);
        println!("🏢 Business Impact\n");
        println!("   {:<10}  {:>10}  {:>10}  {:>7}  {:>12}", "date", "spend", "attributed", "orders", "revenue");
        for b in &report.business_impact {
            println!(
                "   {:<10}  {:>10}  {:>10}  {:>7}  {:>12}",
                b.date,
                format_amount(b.spend),
                format_amount(b.attributed_revenue),
                format_thousands(b.orders),
                format_amount(b.total_revenue)
            );
        }
    }

    if let Some(recs) = &report.recommendations {
        println!("\n{}\n", RULE);
        print_recommendations(recs);
    }
}

fn print_selection(filter: &Filter) {
    match (filter.start, filter.end) {
        (Some(start), Some(end)) => println!("   Dates:     {} → {}", start, end),
        _ => println!("   Dates:     all"),
    }
    match &filter.platforms {
        Some(platforms) => {
            let names: Vec<&str> = platforms.iter().map(|p| p.as_str()).collect();
            println!("   Platforms: {}", names.join(", "));
        }
        None => println!("   Platforms: all"),
    }
}

fn print_groups(title: &str, groups: &[GroupSummary]) {
    println!("\n{}\n", RULE);
    println!("🔹 {}\n", title);
    println!(
        "   {:<14}  {:>10}  {:>10}  {:>6}  {:>6}  {:>6}  {:>6}",
        "", "spend", "revenue", "roas", "ctr", "cpc", "cpm"
    );
    for g in groups {
        println!(
            "   {:<14}  {:>10}  {:>10}  {:>6}  {:>6}  {:>6}  {:>6}",
            g.key,
            format_amount(g.spend),
            format_amount(g.attributed_revenue),
            format_metric(g.roas),
            format_metric(g.ctr),
            format_metric(g.cpc),
            format_metric(g.cpm)
        );
    }
}

fn print_recommendations(recs: &Recommendations) {
    println!("🚀 Growth Opportunities");
    if let Some(c) = &recs.scale_channel {
        println!(
            "   • Scale {}: ROAS {:.2}x vs average {}, {}% of spend",
            c.platform,
            c.roas,
            format_metric(c.average_roas),
            format_metric(c.spend_share)
        );
    }
    if let Some(s) = &recs.expand_state {
        println!("   • Expand in {}: ROAS {:.2}x on ${} spend", s.state, s.roas, format_amount(s.spend));
    }
    if let Some(t) = &recs.optimize_tactic {
        println!("   • Lean into {}: ROAS {:.2}x", t.tactic, t.roas);
    }

    println!("\n⚡ Optimization Opportunities");
    if let Some(c) = &recs.improve_channel {
        println!(
            "   • Improve {}: ROAS {:.2}x vs average {:.2}x (CPC {} vs {})",
            c.platform,
            c.roas,
            c.average_roas,
            format_metric(c.cpc),
            format_metric(c.average_cpc)
        );
    }
    if let Some(c) = &recs.reduce_costs {
        println!("   • Reduce costs on {}: CPC ${:.2} vs benchmark ${:.2}", c.platform, c.cpc, c.benchmark_cpc);
    }
    if let Some(r) = &recs.reallocation {
        println!(
            "   • Reallocate up to ${} of ${} underperforming spend",
            format_amount(r.reallocation_potential),
            format_amount(r.underperforming_spend)
        );
    }
    if recs.improve_channel.is_none() && recs.reduce_costs.is_none() && recs.reallocation.is_none() {
        println!("   • Nothing flagged");
    }

    let i = &recs.insights;
    println!("\n💡 Strategic Insights");
    println!("   Overall ROAS:     {} ({})", format_metric(i.overall_roas.value), i.overall_roas.label);
    println!("   Efficiency Score: {}% ({})", format_metric(i.efficiency_score.value), i.efficiency_score.label);
    println!("   Growth Potential: {}% ({})", format_metric(i.growth_potential.value), i.growth_potential.label);
}
