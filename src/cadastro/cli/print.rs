use cadastro::api::{CmdMessage, MessageLevel, RegistryStats};
use cadastro::model::{Address, ClientRecord};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::PathBuf;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 10;
const CPF_WIDTH: usize = 16;
const TIME_WIDTH: usize = 16;
const INACTIVE_MARKER: &str = "✗";

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

/// One line per client: id, CPF, name, registration age.
pub(super) fn print_clients(records: &[ClientRecord]) {
    if records.is_empty() {
        println!("No clients found.");
        return;
    }

    for record in records {
        let marker = if record.active {
            "  ".to_string()
        } else {
            format!("{} ", INACTIVE_MARKER)
        };
        let id = fit(&record.id.to_string(), ID_WIDTH);
        let cpf = format!("{:<width$}", record.tax_id.as_str(), width = CPF_WIDTH);
        let time_ago = format_time_ago(record.registered_at);

        let fixed = marker.width() + ID_WIDTH + 1 + CPF_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let name = truncate_to_width(&record.name, available);
        let padding = available.saturating_sub(name.width());

        let name = if record.active {
            name.normal()
        } else {
            name.dimmed()
        };

        println!(
            "{}{} {}{}{}{}",
            marker.red(),
            id.yellow(),
            cpf,
            name,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_full_clients(records: &[ClientRecord]) {
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            println!("\n--------------------------------\n");
        }
        let status = if record.active {
            "active".green()
        } else {
            "inactive".red()
        };
        println!("{} [{}]", record.name.bold(), status);
        print_field("id", &record.id.to_string());
        print_field("CPF", record.tax_id.as_str());
        print_field("email", record.email.as_deref().unwrap_or("-"));
        print_field("phone", record.phone.as_deref().unwrap_or("-"));
        print_field(
            "address",
            &record
                .address
                .as_ref()
                .map(format_address)
                .unwrap_or_else(|| "-".to_string()),
        );
        print_field("registered", &format_timestamp(record.registered_at));
        if let Some(at) = record.updated_at {
            print_field("updated", &format_timestamp(at));
        }
        if let Some(at) = record.deactivated_at {
            print_field("deactivated", &format_timestamp(at));
        }
    }
}

pub(super) fn print_stats(stats: &RegistryStats) {
    println!("{}", "Registry".bold());
    print_field("total", &stats.total.to_string());
    print_field("active", &stats.active.to_string());
    print_field("inactive", &stats.inactive.to_string());
    print_field("with email", &stats.with_email.to_string());
    print_field("with phone", &stats.with_phone.to_string());
    if let Some(newest) = &stats.newest {
        print_field(
            "newest",
            &format!("{} ({})", newest.name, format_timestamp(newest.registered_at)),
        );
    }
    if !stats.top_cities.is_empty() {
        println!("\n{}", "Top cities".bold());
        for (city, count) in &stats.top_cities {
            println!("  {:<24} {}", city, count);
        }
    }
}

pub(super) fn print_backups(backups: &[PathBuf]) {
    if backups.is_empty() {
        println!("No backups found.");
        return;
    }
    for path in backups {
        println!("{}", path.display());
    }
}

fn print_field(label: &str, value: &str) {
    println!("  {:<12} {}", format!("{}:", label).dimmed(), value);
}

pub(super) fn format_address(address: &Address) -> String {
    let street = [address.street.as_deref(), address.number.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    let city = [address.city.as_deref(), address.state.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("/");
    [
        Some(street.as_str()),
        address.district.as_deref(),
        Some(city.as_str()),
        address.postal_code.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" - ")
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn fit(s: &str, width: usize) -> String {
    let shown = truncate_to_width(s, width);
    let padding = width.saturating_sub(shown.width());
    format!("{}{}", shown, " ".repeat(padding))
}

pub(super) fn truncate_to_width(s: &str, max_width: usize) -> String {
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
