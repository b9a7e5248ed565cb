use chrono::{DateTime, Utc};
use colored::Colorize;
use rcbook::api::{CmdMessage, MessageLevel, VehicleStats};
use rcbook::config::{RcbookConfig, CONFIG_KEYS};
use rcbook::model::{Vehicle, VehicleField};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const NUMBER_WIDTH: usize = 15;
const LABEL_WIDTH: usize = 22;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// One line per record: index, number, owner and model, then age.
pub(super) fn print_vehicle_list(vehicles: &[Vehicle]) {
    for (i, vehicle) in vehicles.iter().enumerate() {
        let idx_str = format!("{:>3}. ", i + 1);
        let number = pad_to_width(vehicle.display_number(), NUMBER_WIDTH);

        let summary = [VehicleField::OwnerName, VehicleField::Model]
            .into_iter()
            .filter_map(|f| vehicle.get(f))
            .collect::<Vec<_>>()
            .join(" · ");

        let fixed_width = idx_str.width() + NUMBER_WIDTH + 1 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let summary = truncate_to_width(&summary, available);
        let padding = available.saturating_sub(summary.width());

        println!(
            "{}{} {}{}{}",
            idx_str.yellow(),
            number.bold(),
            summary,
            " ".repeat(padding),
            format_time_ago(vehicle.created_at).dimmed()
        );
    }
}

/// Every field of each record, labelled.
pub(super) fn print_full_vehicles(vehicles: &[Vehicle]) {
    for (i, vehicle) in vehicles.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!("{} {}", vehicle.display_number().bold(), vehicle.id.to_string().dimmed());
        println!("--------------------------------");
        for field in VehicleField::ALL {
            if field == VehicleField::VehicleNumber {
                continue;
            }
            let value = vehicle.get(field).unwrap_or("-");
            println!("{:<width$} {}", field.label(), value, width = LABEL_WIDTH);
        }
        println!(
            "{:<width$} {}",
            "Created",
            vehicle.created_at.format("%Y-%m-%d %H:%M"),
            width = LABEL_WIDTH
        );
        println!(
            "{:<width$} {}",
            "Updated",
            vehicle.updated_at.format("%Y-%m-%d %H:%M"),
            width = LABEL_WIDTH
        );
    }
}

pub(super) fn print_stats(stats: &VehicleStats) {
    println!("{:<16} {}", "Total vehicles", stats.total.to_string().bold());
    println!("{:<16} {}", "Light vehicles", stats.light_vehicles);
    println!("{:<16} {}", "Electric", stats.electric);
}

pub(super) fn print_choices(choices: &[(VehicleField, &[&str])]) {
    for (i, (field, values)) in choices.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", field.label().bold());
        for value in values.iter() {
            println!("  {}", value);
        }
    }
}

pub(super) fn print_config(config: &RcbookConfig) {
    for key in CONFIG_KEYS {
        let value = config.get(key).unwrap_or_default();
        if value.is_empty() {
            println!("{} = {}", key, "(unset)".dimmed());
        } else {
            println!("{} = {}", key, value);
        }
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
