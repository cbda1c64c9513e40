use anyhow::{Context, Result};
use chrono::Datelike;
use std::path::Path;
use tracing::{debug, warn};

use super::report::{render_chart, render_duties, render_month, render_review, render_summaries};
use crate::config::Config;
use crate::db::Database;
use crate::models::{DutyCategory, DutyType};
use crate::review::{load_review, monthly_chart, monthly_summary};
use crate::validate::{DutyForm, OccurrenceForm};

/// Flags that take a value; everything else starting with `--` is a switch.
const VALUE_FLAGS: &[&str] = &[
    "--category",
    "--title",
    "--due",
    "--start",
    "--description",
    "--amount",
    "--date",
    "--remind",
];

pub(crate) fn as_cli(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let command = args.get(1).map(String::as_str).unwrap_or("review");
    let rest = args.get(2..).unwrap_or(&[]);
    debug!(command, "dispatching");

    match command {
        "review" | "r" => cli_review(rest, db, config),
        "export" => cli_export(rest, db),
        "duties" | "ls" => cli_duties(rest, db, config),
        "month" => cli_month(rest, db, config),
        "summary" => cli_summary(rest, db, config),
        "add-duty" => cli_add_duty(rest, db),
        "edit-duty" => cli_edit_duty(rest, db),
        "complete" | "done" => cli_complete(rest, db),
        "chart" => cli_chart(rest, db, config),
        "delete-duty" => {
            let id = parse_id(positionals(rest).first().copied(), "duty")?;
            db.delete_duty(id)?;
            println!("Deleted duty #{id}");
            Ok(())
        }
        "delete-occurrence" => {
            let id = parse_id(positionals(rest).first().copied(), "occurrence")?;
            db.delete_occurrence(id)?;
            println!("Deleted occurrence #{id}");
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("organizeplus {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("OrganizePlus - track personal and company duties");
    println!();
    println!("Usage: organizeplus [command]");
    println!();
    println!("Commands:");
    println!("  review                        Monthly review of paid duties (default)");
    println!("    --category <name>           Only duties in this category");
    println!("  export [path]                 Export the monthly review to CSV");
    println!("    --category <name>           Only duties in this category");
    println!("  duties                        List duties with their last occurrence");
    println!("    --category <name>           Only duties in this category");
    println!("  month <YYYY-MM>               Occurrences recorded in one month");
    println!("    --category <name>           Category (default: Personal)");
    println!("  summary [YYYY-MM]             Done and paid per category (default: this month)");
    println!("  add-duty <title>              Create a duty");
    println!("    --due <YYYY-MM-DD>          Due date (required)");
    println!("    --start <YYYY-MM-DD>        Start date (default: due date)");
    println!("    --category <name>           Category (default: Personal)");
    println!("    --payable                   Duty is a bill with an amount");
    println!("    --description <text>        Free-form notes");
    println!("    --remind <days>             Remind 1-30 days before the due date");
    println!("  edit-duty <id>                Change a duty; takes the add-duty flags");
    println!("    --title <text>              New title");
    println!("    --actionable                Duty no longer carries an amount");
    println!("    --no-remind                 Clear the reminder");
    println!("  complete <duty-id>            Record that a duty was done");
    println!("    --amount <n>                Amount paid (payable duties)");
    println!("    --date <YYYY-MM-DD>         Completion date (default: today)");
    println!("  chart <duty-id>               Monthly history of one duty");
    println!("  delete-duty <id>              Delete a duty and its occurrences");
    println!("  delete-occurrence <id>        Delete a single occurrence");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn cli_review(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let category = flag_value(args, "--category");
    let report = load_review(db, category)?;
    print!("{}", render_review(&report, &config.currency, category));
    Ok(())
}

fn cli_export(args: &[String], db: &Database) -> Result<()> {
    let category = flag_value(args, "--category");

    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/organizeplus-review.csv")
        });

    let report = load_review(db, category)?;
    let count = crate::export::export_review_to_csv(&report, Path::new(&output_path))?;
    if count == 0 {
        println!("No paid duties to export");
    } else {
        println!("Exported {count} occurrences to {output_path}");
    }
    Ok(())
}

fn cli_duties(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let duties = db.get_duties_with_last_occurrence(flag_value(args, "--category"), today)?;
    print!("{}", render_duties(&duties, &config.currency, today));
    Ok(())
}

fn cli_month(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let raw = positionals(args)
        .first()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Missing month (YYYY-MM)"))?;
    let (year, month) = parse_year_month(raw)?;
    let category = flag_value(args, "--category").unwrap_or(DutyCategory::Personal.as_str());

    let occurrences = db.get_monthly_occurrences(category, year, month)?;
    let duties = db.get_duties_by_category(category)?;
    print!(
        "{}",
        render_month(&occurrences, &duties, &config.currency, category, year, month)
    );
    let summary = monthly_summary(category, year, month, &occurrences, &duties);
    println!();
    print!("{}", render_summaries(&[summary], &config.currency));
    Ok(())
}

fn cli_summary(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let (year, month) = match positionals(args).first() {
        Some(raw) => parse_year_month(raw)?,
        None => {
            let today = chrono::Local::now().date_naive();
            (today.year(), today.month())
        }
    };

    let mut summaries = Vec::new();
    for category in DutyCategory::all() {
        let name = category.as_str();
        let occurrences = db.get_monthly_occurrences(name, year, month)?;
        let duties = db.get_duties_by_category(name)?;
        summaries.push(monthly_summary(name, year, month, &occurrences, &duties));
    }
    print!("{}", render_summaries(&summaries, &config.currency));
    Ok(())
}

fn cli_add_duty(args: &[String], db: &Database) -> Result<()> {
    let title = positionals(args).join(" ");
    let reminder_days = parse_reminder(args)?;

    let form = DutyForm {
        title,
        description: flag_value(args, "--description").unwrap_or_default().into(),
        duty_type: if has_flag(args, "--payable") {
            DutyType::Payable
        } else {
            DutyType::Actionable
        },
        category_name: flag_value(args, "--category")
            .unwrap_or(DutyCategory::Personal.as_str())
            .into(),
        start_date: flag_value(args, "--start").map(String::from),
        due_date: flag_value(args, "--due").unwrap_or_default().into(),
        reminder_days,
    };

    let duty = form.to_duty()?;
    if DutyCategory::from_name(&duty.category_name).is_none() {
        warn!(category = %duty.category_name, "duty filed under a custom category");
    }
    let id = db.insert_duty(&duty)?;
    println!(
        "Added {} duty #{id} '{}' ({})",
        duty.duty_type.to_string().to_lowercase(),
        duty.title,
        duty.category_name
    );
    Ok(())
}

fn cli_edit_duty(args: &[String], db: &Database) -> Result<()> {
    let id = parse_id(positionals(args).first().copied(), "duty")?;
    let existing = db
        .get_duty_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Duty {id} not found"))?;

    let duty_type = match (has_flag(args, "--payable"), has_flag(args, "--actionable")) {
        (true, true) => anyhow::bail!("--payable and --actionable cannot be combined"),
        (true, false) => DutyType::Payable,
        (false, true) => DutyType::Actionable,
        (false, false) => existing.duty_type,
    };
    let reminder_days = if has_flag(args, "--no-remind") {
        if flag_value(args, "--remind").is_some() {
            anyhow::bail!("--remind and --no-remind cannot be combined");
        }
        None
    } else {
        parse_reminder(args)?.or(existing.reminder_days)
    };

    let form = DutyForm {
        title: flag_value(args, "--title").unwrap_or(&existing.title).into(),
        description: flag_value(args, "--description")
            .unwrap_or(&existing.description)
            .into(),
        duty_type,
        category_name: flag_value(args, "--category")
            .unwrap_or(&existing.category_name)
            .into(),
        start_date: Some(
            flag_value(args, "--start")
                .map(String::from)
                .unwrap_or_else(|| existing.start_date.format("%Y-%m-%d").to_string()),
        ),
        due_date: flag_value(args, "--due")
            .map(String::from)
            .unwrap_or_else(|| existing.due_date.format("%Y-%m-%d").to_string()),
        reminder_days,
    };

    let mut duty = form.to_duty()?;
    duty.id = existing.id;
    duty.created_at = existing.created_at;
    db.update_duty(&duty)?;
    println!("Updated duty #{id} '{}'", duty.title);
    Ok(())
}

fn cli_complete(args: &[String], db: &Database) -> Result<()> {
    let duty_id = parse_id(positionals(args).first().copied(), "duty")?;
    let duty = db
        .get_duty_by_id(duty_id)?
        .ok_or_else(|| anyhow::anyhow!("Duty {duty_id} not found"))?;

    let paid_amount = flag_value(args, "--amount").map(String::from);
    if paid_amount.is_some() && !duty.duty_type.is_payable() {
        warn!(duty = %duty.title, "duty is not payable, ignoring --amount");
    }

    let form = OccurrenceForm {
        duty_type: duty.duty_type,
        paid_amount,
        completed_date: flag_value(args, "--date")
            .map(String::from)
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
    };
    let occurrence = form.to_occurrence(duty_id)?;
    let id = db.insert_occurrence(&occurrence)?;
    println!(
        "Recorded occurrence #{id} for '{}' on {}",
        duty.title,
        occurrence.completed_date.format("%Y-%m-%d")
    );
    Ok(())
}

fn cli_chart(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let duty_id = parse_id(positionals(args).first().copied(), "duty")?;
    let duty = db
        .get_duty_by_id(duty_id)?
        .ok_or_else(|| anyhow::anyhow!("Duty {duty_id} not found"))?;
    let occurrences = db.get_occurrences_by_duty(duty_id)?;
    let chart = monthly_chart(&occurrences, duty.duty_type);
    print!("{}", render_chart(&duty, &chart, &config.currency));
    Ok(())
}

// ── Argument helpers ──────────────────────────────────────────

pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor the value of a flag.
pub(crate) fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_reminder(args: &[String]) -> Result<Option<u32>> {
    flag_value(args, "--remind")
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid reminder days '{raw}'"))
        })
        .transpose()
}

fn parse_year_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{raw}', expected YYYY-MM"))?;
    let year = year
        .parse::<i32>()
        .with_context(|| format!("Invalid year in '{raw}'"))?;
    let month = month
        .parse::<u32>()
        .with_context(|| format!("Invalid month in '{raw}'"))?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month must be 1-12, got {month}");
    }
    Ok((year, month))
}

fn parse_id(raw: Option<&str>, what: &str) -> Result<i64> {
    let raw = raw.ok_or_else(|| anyhow::anyhow!("Missing {what} id"))?;
    raw.trim()
        .trim_start_matches('#')
        .parse::<i64>()
        .with_context(|| format!("Invalid {what} id '{raw}'"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
