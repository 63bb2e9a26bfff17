use anyhow::Result;
use chrono::{Datelike, Month, NaiveDate};
use crossterm::{
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::{self, Write};
use washdesk_client::Session;
use washdesk_core::{AttendanceRecord, Lead, RevenueSummary, Washer};
use washdesk_schedule::{group_by_day, MonthGrid, ScheduledWashSlot, ServiceType, WashSchedule};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const TODAY: Color = Color::Green;
    const WASH_DAY: Color = Color::Cyan;
    const INTERIOR: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

const WEEKDAY_HEADER: &str = "Su  Mo  Tu  We  Th  Fr  Sa";

/// Renders command output to stdout.
#[derive(Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print a month grid. Today is highlighted, days outside the month are
    /// dimmed, and days carrying a wash from `slots` get a marker.
    pub fn print_grid(&self, grid: &MonthGrid, slots: &[ScheduledWashSlot]) -> Result<()> {
        let mut stdout = io::stdout();
        let by_day = group_by_day(slots);
        let title = match Month::try_from(grid.month() as u8) {
            Ok(m) => format!("{} {}", m.name(), grid.year()),
            Err(_) => format!("{}-{:02}", grid.year(), grid.month()),
        };

        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{:^26}\n", title)),
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", WEEKDAY_HEADER)),
            ResetColor,
        )?;

        for week in grid.weeks() {
            for (i, day) in week.iter().enumerate() {
                let marker = match by_day.get(&day.date) {
                    Some(washes)
                        if washes.iter().any(|s| s.service_type != ServiceType::Exterior) =>
                    {
                        '+'
                    }
                    Some(_) => '*',
                    None => ' ',
                };
                let color = if day.is_today {
                    Colors::TODAY
                } else if !day.is_current_month {
                    Colors::DIM
                } else if marker != ' ' {
                    Colors::WASH_DAY
                } else {
                    Color::Reset
                };
                if day.is_today {
                    execute!(stdout, SetAttribute(Attribute::Bold))?;
                }
                execute!(
                    stdout,
                    SetForegroundColor(color),
                    Print(format!("{:>2}{}", day.date.day(), marker)),
                    SetAttribute(Attribute::Reset),
                    ResetColor,
                )?;
                if i < week.len() - 1 {
                    execute!(stdout, Print(" "))?;
                }
            }
            execute!(stdout, Print("\n"))?;
        }

        if !slots.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print("* wash  + interior or full service\n"),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print a generated schedule as a table.
    pub fn print_schedule(&self, schedule: &WashSchedule) -> Result<()> {
        let mut stdout = io::stdout();
        let (start, end) = schedule.window();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!(
                "{} washes, {} to {} ({} policy, {} interior)\n",
                schedule.slots().len(),
                start,
                end,
                schedule.policy(),
                schedule.interior_count(),
            )),
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "{:<4} {:<12} {:<14} {:<14} {:<10}\n",
                "#", "DATE", "SERVICE", "CAR", "WASHER"
            )),
            Print(format!("{}\n", "-".repeat(58))),
            ResetColor,
        )?;

        for slot in schedule.slots() {
            let color = match slot.service_type {
                ServiceType::Exterior => Color::Reset,
                ServiceType::Interior | ServiceType::FullService => Colors::INTERIOR,
            };
            execute!(
                stdout,
                SetForegroundColor(color),
                Print(format!(
                    "{:<4} {:<12} {:<14} {:<14} {:<10}\n",
                    slot.wash_number,
                    slot.scheduled_date.to_string(),
                    slot.service_type.to_string(),
                    slot.car_number.as_deref().or(slot.car_name.as_deref()).unwrap_or("-"),
                    slot.assigned_washer.as_deref().unwrap_or("-"),
                )),
                ResetColor,
            )?;
        }

        if !schedule.is_chronological() {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print("note: compressed dates are not in chronological order\n"),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print assigned washes (no schedule metadata available).
    pub fn print_jobs(&self, slots: &[ScheduledWashSlot]) -> Result<()> {
        if slots.is_empty() {
            return self.print_info("No washes assigned.");
        }
        let mut stdout = io::stdout();
        self.print_table_header(&format!(
            "{:<12} {:<14} {:<14} {:<14}",
            "DATE", "SERVICE", "CAR", "NUMBER"
        ))?;
        for slot in slots {
            execute!(
                stdout,
                Print(format!(
                    "{:<12} {:<14} {:<14} {:<14}\n",
                    slot.scheduled_date.to_string(),
                    slot.service_type.to_string(),
                    slot.car_name.as_deref().unwrap_or("-"),
                    slot.car_number.as_deref().unwrap_or("-"),
                )),
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_leads(&self, leads: &[Lead]) -> Result<()> {
        if leads.is_empty() {
            return self.print_info("No leads found.");
        }
        let mut stdout = io::stdout();
        self.print_table_header(&format!(
            "{:<26} {:<24} {:<12} {:<10} {:<12}",
            "ID", "CUSTOMER", "STATUS", "KIND", "CAR"
        ))?;
        for lead in leads {
            execute!(
                stdout,
                Print(format!(
                    "{:<26} {:<24} {:<12} {:<10} {:<12}\n",
                    lead.id,
                    clip(&lead.customer_name, 22),
                    lead.status.to_string(),
                    lead.wash_kind.to_string(),
                    lead.car_number.as_deref().unwrap_or("-"),
                )),
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_washers(&self, washers: &[Washer]) -> Result<()> {
        if washers.is_empty() {
            return self.print_info("No washers found.");
        }
        let mut stdout = io::stdout();
        self.print_table_header(&format!(
            "{:<26} {:<24} {:<14} {:<6}",
            "ID", "NAME", "PHONE", "ACTIVE"
        ))?;
        for washer in washers {
            let color = if washer.active { Color::Reset } else { Colors::DIM };
            execute!(
                stdout,
                SetForegroundColor(color),
                Print(format!(
                    "{:<26} {:<24} {:<14} {:<6}\n",
                    washer.id,
                    clip(&washer.name, 22),
                    washer.phone.as_deref().unwrap_or("-"),
                    if washer.active { "yes" } else { "no" },
                )),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_attendance(&self, date: NaiveDate, records: &[AttendanceRecord]) -> Result<()> {
        if records.is_empty() {
            return self.print_info(&format!("No attendance recorded for {date}."));
        }
        let mut stdout = io::stdout();
        self.print_table_header(&format!("{:<26} {:<12}", "WASHER", "STATUS"))?;
        for record in records {
            execute!(
                stdout,
                Print(format!("{:<26} {:<12}\n", record.washer_id, record.status.to_string())),
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    pub fn print_revenue(&self, summary: &RevenueSummary) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!("Revenue {} to {}\n", summary.from, summary.to)),
            ResetColor,
            Print(format!("  washes:   {}\n", summary.wash_count)),
            Print(format!("  revenue:  {:.2}\n", summary.total_revenue)),
            Print(format!("  expenses: {:.2}\n", summary.total_expenses)),
            SetForegroundColor(if summary.net() < 0.0 { Colors::ERROR } else { Colors::TODAY }),
            Print(format!("  net:      {:.2}\n", summary.net())),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_session(&self, session: Option<&Session>) -> Result<()> {
        match session {
            Some(s) => {
                let mut stdout = io::stdout();
                execute!(
                    stdout,
                    Print(format!("{} ", s.username)),
                    SetForegroundColor(Colors::DIM),
                    Print(format!(
                        "({}, since {})\n",
                        s.role,
                        s.created_at.format("%Y-%m-%d %H:%M UTC")
                    )),
                    ResetColor,
                )?;
                stdout.flush()?;
                Ok(())
            }
            None => self.print_info("Not logged in."),
        }
    }

    /// Prompt and read one line from stdin.
    pub fn read_line(&self, prompt: &str) -> Result<String> {
        let mut stdout = io::stdout();
        execute!(stdout, Print(prompt))?;
        stdout.flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(
            stderr,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stderr.flush()?;
        Ok(())
    }

    /// Print an info message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn print_table_header(&self, header: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", header)),
            Print(format!("{}\n", "-".repeat(header.len()))),
            ResetColor,
        )?;
        Ok(())
    }
}

fn clip(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("Meera", 22), "Meera");
        assert_eq!(clip("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_weekday_header_matches_grid_width() {
        // columns start every four characters
        assert_eq!(WEEKDAY_HEADER.find("Sa"), Some(6 * 4));
    }
}
