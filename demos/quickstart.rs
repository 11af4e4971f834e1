use keplerday::{format_number, CalendarKey, RotationTable};
use tracing_subscriber::EnvFilter;

fn main() -> keplerday::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let table = RotationTable::build(None)?;
    let today = CalendarKey::today();
    let equinox: CalendarKey = "03-20".parse()?;

    println!("reference year: {}", table.reference_year());
    for key in ["01-03", "03-20", "07-04", "09-23", "12-21"] {
        let entry = table.lookup(key)?;
        println!(
            "{key}: {}° at {}°/day",
            format_number(entry.angle.value(), Some("%.3f"))?,
            format_number(entry.speed.value(), Some("%.5f"))?,
        );
    }

    let entry = table.get(today)?;
    println!(
        "today ({today}): {}°, {}° past the March equinox",
        format_number(entry.angle.value(), Some("%.2f"))?,
        format_number(table.relative_angle(today, equinox)?.value(), Some("%.2f"))?,
    );
    Ok(())
}
