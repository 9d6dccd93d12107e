//! # Ballast CLI Application
//!
//! Terminal demo for the weight budget engine: builds a sample season
//! project, calculates component weights from the builtin catalog, and
//! prints the weight report and fastener shopping list.

use std::io::{self, BufRead, Write};

use track_core::project::{Component, ComponentStatus, Project, ProjectSettings, Subsystem};
use track_core::rollup::WeightReport;
use track_core::shopping::shopping_list;
use track_core::units::{format_cost, format_percent, format_weight};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() {
    println!("Ballast CLI - Robot Weight Budget Tracker");
    println!("=========================================");
    println!();

    let limit_kg = prompt_f64("Enter competition weight limit (kg) [56.699]: ", 56.699);
    let safety = prompt_f64("Enter safety factor [1.10]: ", 1.10);

    println!();
    println!("Building sample project...");
    println!();

    let mut project = Project::new("Demo Robot", "1234", 2025);
    let mut settings = ProjectSettings::default();
    settings.weight_limit_kg = limit_kg;
    settings.safety_factor = safety;
    match settings.validate() {
        Ok(()) => project.settings = settings,
        Err(e) => println!("Keeping default settings: {}", e),
    }

    let drivetrain = project.add_subsystem(Subsystem::new("Drivetrain", "#34d399").with_budget(18.0));
    let arm = project.add_subsystem(Subsystem::new("Arm", "#a78bfa").with_budget(8.0));

    let aluminum = project
        .materials
        .iter()
        .find(|m| m.name.starts_with("Aluminum 6061"))
        .map(|m| m.id);
    let box_tube = project
        .profiles
        .iter()
        .find(|p| p.name.starts_with("Box Tube 1x1"))
        .map(|p| p.id);
    let structure = project.category_by_slug("structure").map(|c| c.id);
    let cots = project.category_by_slug("cots").map(|c| c.id);

    // Frame rails: calculated from profile geometry + material density
    let mut rails = Component::new(drivetrain, "Frame rails");
    rails.profile_type_id = box_tube;
    rails.material_id = aluminum;
    rails.category_id = structure;
    rails.quantity = 4;
    rails.properties.insert("length_mm".to_string(), 660.0);
    rails.status = ComponentStatus::Received;
    let rails_id = project.add_component(rails);
    if let Err(e) = project.recalculate_component(&rails_id) {
        eprintln!("Error: {}", e);
        return;
    }

    // Gearboxes: manual COTS weight
    let mut gearboxes = Component::new(drivetrain, "Gearboxes");
    gearboxes.category_id = cots;
    gearboxes.quantity = 2;
    gearboxes.unit_cost = Some(89.99);
    gearboxes.set_manual_weight(1.45);
    project.add_component(gearboxes);

    let mut arm_motor = Component::new(arm, "Arm motor");
    arm_motor.category_id = cots;
    arm_motor.unit_cost = Some(54.0);
    arm_motor.set_manual_weight(0.94);
    project.add_component(arm_motor);

    // Frame bolts: fastener usage against on-hand stock
    if let Some(fastener) = project.fasteners.first().map(|f| f.id) {
        let mut bolts = Component::new(drivetrain, "Frame bolts");
        bolts.fastener_id = Some(fastener);
        bolts.quantity = 48;
        if let Some(f) = project.fastener(fastener) {
            bolts.weight_per_unit_kg = Some(f.weight_per_unit_kg);
        }
        project.add_component(bolts);
        project.set_fastener_stock(fastener, 30);
    }

    let system = project.settings.unit_system;
    let dual = project.settings.show_dual_units;
    let report = WeightReport::compute(&project);

    println!("═══════════════════════════════════════");
    println!("  WEIGHT REPORT: {}", report.project.name);
    println!("═══════════════════════════════════════");
    println!();
    println!(
        "  Limit:     {} (effective {} at {:.2}x safety)",
        format_weight(Some(report.project.weight_limit_kg), system, dual),
        format_weight(Some(report.project.effective_limit_kg), system, dual),
        report.project.safety_factor,
    );
    println!(
        "  Total:     {} across {} components",
        format_weight(Some(report.project.total_weight_kg), system, dual),
        report.project.component_count,
    );
    println!(
        "  Used:      {} {}",
        format_percent(Some(report.project.weight_used_percent)),
        status_icon(report.project.remaining_weight_kg >= 0.0),
    );
    println!(
        "  Remaining: {}",
        format_weight(Some(report.project.remaining_weight_kg), system, dual),
    );
    println!();

    println!("Subsystems:");
    for s in &report.subsystems {
        println!(
            "  {:<12} {:>14}  budget {}",
            s.name,
            format_weight(Some(s.total_weight_kg), system, dual),
            format_percent(s.budget_used_percent),
        );
    }
    println!();

    println!("Categories:");
    for c in &report.categories {
        println!(
            "  {:<12} {:>14}  ({} units)",
            c.category_name,
            format_weight(Some(c.total_weight_kg), system, dual),
            c.total_units,
        );
    }
    println!();

    let list = shopping_list(&project);
    println!("═══════════════════════════════════════");
    println!("  FASTENER SHOPPING LIST");
    println!("═══════════════════════════════════════");
    if list.is_empty() {
        println!("  Nothing to buy.");
    }
    for item in &list {
        println!(
            "  {}: need {}, have {}, buy {} ({})",
            item.fastener_name,
            item.total_needed,
            item.total_in_stock,
            item.to_purchase,
            format_cost(item.estimated_cost),
        );
    }
    println!();

    println!("JSON Output (for LLM/API use):");
    if let Ok(json) = serde_json::to_string_pretty(&report) {
        println!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[OVER]"
    }
}
